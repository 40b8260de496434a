//! Data pool DTOs

use serde::{Deserialize, Serialize};

/// Request to create an empty data pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDataPool {
    pub name: String,
}
