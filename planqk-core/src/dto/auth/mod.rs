//! Gateway authentication DTOs

use serde::{Deserialize, Serialize};

/// OAuth2 client-credentials token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
