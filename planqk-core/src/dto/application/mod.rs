//! Application DTOs

use serde::{Deserialize, Serialize};

/// Request to create a new application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplication {
    pub name: String,
}

/// Request to subscribe an application to a service of the same organization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInternalSubscription {
    pub application_id: String,
    pub service_id: String,
}
