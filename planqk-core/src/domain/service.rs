//! Service domain types

use serde::{Deserialize, Serialize};

use crate::domain::status::Status;

/// A managed service on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lifecycle: Option<Lifecycle>,
    #[serde(default)]
    pub service_definitions: Vec<ServiceDefinition>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Service {
    /// The version the SDK operates on
    ///
    /// The platform keeps one service definition per version; the SDK always
    /// works with the first one.
    pub fn current_version(&self) -> Option<&ServiceDefinition> {
        self.service_definitions.first()
    }
}

/// A built revision of a service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub lifecycle: Option<Lifecycle>,
    /// Endpoint application jobs are sent to once the service is published
    #[serde(default)]
    pub gateway_endpoint: Option<String>,
}

/// Lifecycle stage of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifecycle {
    Created,
    Accessible,
    Published,
    #[serde(other)]
    Unknown,
}

impl Lifecycle {
    /// Stages that are listed when no explicit lifecycle filter is given
    pub const LISTED: [Lifecycle; 3] = [
        Lifecycle::Created,
        Lifecycle::Accessible,
        Lifecycle::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Created => "CREATED",
            Lifecycle::Accessible => "ACCESSIBLE",
            Lifecycle::Published => "PUBLISHED",
            Lifecycle::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build status of a service version
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    pub status: Status,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_service() {
        let service: Service = serde_json::from_value(json!({
            "id": "svc-1",
            "name": "qaoa",
            "lifecycle": "ACCESSIBLE",
            "serviceDefinitions": [
                { "id": "def-1", "gatewayEndpoint": "https://gateway.example/qaoa/1.0.0" },
                { "id": "def-2" }
            ],
            "somethingNew": true
        }))
        .unwrap();

        assert_eq!(service.lifecycle, Some(Lifecycle::Accessible));
        let version = service.current_version().unwrap();
        assert_eq!(version.id, "def-1");
        assert_eq!(
            version.gateway_endpoint.as_deref(),
            Some("https://gateway.example/qaoa/1.0.0")
        );
    }

    #[test]
    fn test_unknown_lifecycle() {
        let lifecycle: Lifecycle = serde_json::from_str("\"ARCHIVED\"").unwrap();
        assert_eq!(lifecycle, Lifecycle::Unknown);
    }

    #[test]
    fn test_service_without_definitions() {
        let service: Service = serde_json::from_value(json!({ "id": "svc-1", "name": "x" })).unwrap();
        assert!(service.current_version().is_none());
    }
}
