//! File parts for multipart uploads

use std::path::Path;

use reqwest::multipart::Part;

use crate::error::{ClientError, Result};

/// In-memory file sent as one part of a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name for the upload
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ClientError::InvalidRequest(format!("Not a file path: {}", path.display()))
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::InvalidRequest(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(Self { file_name, bytes })
    }

    pub(crate) fn into_part(self) -> Part {
        Part::bytes(self.bytes).file_name(self.file_name)
    }
}
