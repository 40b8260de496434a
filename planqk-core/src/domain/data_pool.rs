//! Data pool domain types

use serde::{Deserialize, Serialize};

/// A named container for input files on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One uploaded data source inside a data pool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceDescriptor {
    pub id: String,
    #[serde(default)]
    pub files: Vec<DataPoolFileEntry>,
}

/// File entry of a data source descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoolFileEntry {
    pub id: String,
    pub name: String,
}

/// Flattened view of a file stored in a data pool, keyed by file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoolFile {
    pub identifier: String,
    pub data_pool_id: String,
    pub data_source_descriptor_id: String,
    pub file_id: String,
}

impl DataPoolFile {
    /// Reference usable as job input
    pub fn to_ref(&self) -> DataPoolRef {
        DataPoolRef {
            data_pool_id: self.data_pool_id.clone(),
            data_source_descriptor_id: self.data_source_descriptor_id.clone(),
            file_id: self.file_id.clone(),
        }
    }
}

/// Reference to a file in a data pool, passed to a job instead of inline data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoolRef {
    pub data_pool_id: String,
    pub data_source_descriptor_id: String,
    pub file_id: String,
}

/// Paged listing wrapper used by the catalog endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
}
