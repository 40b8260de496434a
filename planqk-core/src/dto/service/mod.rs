//! Service DTOs

use serde::{Deserialize, Serialize};

/// Runtime used when none is configured
pub const DEFAULT_RUNTIME: &str = "PYTHON_TEMPLATE";

/// Settings for creating a managed service
///
/// The user code archive and API definition are sent alongside as file
/// parts; this struct carries the plain fields of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub name: String,
    pub description: String,
    pub milli_cpus: u32,
    pub memory_in_megabytes: u32,
    pub runtime: String,
    pub gpu_count: u32,
    pub gpu_accelerator: String,
}

impl ServiceConfig {
    /// Creates a configuration with the platform's default resources
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: "Default description.".to_string(),
            milli_cpus: 1000,
            memory_in_megabytes: 4096,
            runtime: DEFAULT_RUNTIME.to_string(),
            gpu_count: 0,
            gpu_accelerator: "NONE".to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_resources(mut self, milli_cpus: u32, memory_in_megabytes: u32) -> Self {
        self.milli_cpus = milli_cpus;
        self.memory_in_megabytes = memory_in_megabytes;
        self
    }

    pub fn with_gpu(mut self, gpu_count: u32, accelerator: impl Into<String>) -> Self {
        self.gpu_count = gpu_count;
        self.gpu_accelerator = accelerator.into();
        self
    }

    /// Text fields of the multipart create request, in wire naming
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("milliCpus", self.milli_cpus.to_string()),
            ("memoryInMegabytes", self.memory_in_megabytes.to_string()),
            ("runtime", self.runtime.clone()),
            ("gpuCount", self.gpu_count.to_string()),
            ("gpuAccelerator", self.gpu_accelerator.clone()),
        ]
    }

    /// Checks the values the platform rejects anyway, before uploading files
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("service name cannot be empty".to_string());
        }
        if self.milli_cpus == 0 {
            return Err("milli_cpus must be greater than 0".to_string());
        }
        if self.memory_in_megabytes == 0 {
            return Err("memory_in_megabytes must be greater than 0".to_string());
        }
        if self.gpu_count > 0 && self.gpu_accelerator == "NONE" {
            return Err("gpu_accelerator must be set when gpu_count > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::new("svc");
        assert_eq!(config.description, "Default description.");
        assert_eq!(config.milli_cpus, 1000);
        assert_eq!(config.memory_in_megabytes, 4096);
        assert_eq!(config.runtime, "PYTHON_TEMPLATE");
        assert_eq!(config.gpu_count, 0);
        assert_eq!(config.gpu_accelerator, "NONE");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_form_fields() {
        let fields = ServiceConfig::new("svc").with_resources(500, 2048).form_fields();
        assert!(fields.contains(&("milliCpus", "500".to_string())));
        assert!(fields.contains(&("memoryInMegabytes", "2048".to_string())));
        assert_eq!(fields.len(), 7);
    }

    #[test]
    fn test_validation() {
        assert!(ServiceConfig::new(" ").validate().is_err());
        assert!(ServiceConfig::new("svc").with_resources(0, 1).validate().is_err());
        assert!(ServiceConfig::new("svc").with_gpu(1, "NONE").validate().is_err());
        assert!(ServiceConfig::new("svc").with_gpu(1, "NVIDIA_TESLA_T4").validate().is_ok());
    }
}
