//! Common types used across CLI modules

use uuid::Uuid;

/// Job identifier given on the command line: a full UUID or a prefix of one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrPrefix {
    /// Full UUID
    Full(Uuid),
    /// Prefix that should uniquely identify a job
    Prefix(String),
}

impl IdOrPrefix {
    /// Attempts to parse as a full UUID first, otherwise treats as a prefix
    pub fn parse(input: &str) -> Self {
        match Uuid::parse_str(input) {
            Ok(uuid) => IdOrPrefix::Full(uuid),
            Err(_) => IdOrPrefix::Prefix(input.to_lowercase()),
        }
    }

    /// Whether `id` is the identified job
    pub fn matches(&self, id: &str) -> bool {
        match self {
            IdOrPrefix::Full(uuid) => Uuid::parse_str(id).is_ok_and(|other| other == *uuid),
            IdOrPrefix::Prefix(prefix) => id.to_lowercase().starts_with(prefix),
        }
    }
}

impl std::fmt::Display for IdOrPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdOrPrefix::Full(uuid) => write!(f, "{}", uuid),
            IdOrPrefix::Prefix(prefix) => write!(f, "{}", prefix),
        }
    }
}

impl From<&str> for IdOrPrefix {
    fn from(s: &str) -> Self {
        IdOrPrefix::parse(s)
    }
}
