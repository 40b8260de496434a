//! Job DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::data_pool::DataPoolRef;

/// Input of a service job
///
/// Either inline data uploaded with the request, or a reference to a file
/// that already lives in a data pool.
#[derive(Debug, Clone, PartialEq)]
pub enum JobInput {
    DataUpload { data: Value, params: Value },
    DataPool { data_ref: DataPoolRef, params: Value },
}

impl JobInput {
    pub fn params(&self) -> &Value {
        match self {
            JobInput::DataUpload { params, .. } | JobInput::DataPool { params, .. } => params,
        }
    }

    /// Build the create request for the given service definition
    pub fn into_request(
        self,
        service_definition_id: impl Into<String>,
    ) -> Result<CreateJob, serde_json::Error> {
        let service_definition_id = service_definition_id.into();
        let request = match self {
            JobInput::DataUpload { data, params } => CreateJob {
                service_definition_id,
                input_data: Some(serde_json::to_string(&data)?),
                input_data_ref: None,
                parameters: serde_json::to_string(&params)?,
                persist_result: true,
            },
            JobInput::DataPool { data_ref, params } => CreateJob {
                service_definition_id,
                input_data: None,
                input_data_ref: Some(data_ref),
                parameters: serde_json::to_string(&params)?,
                persist_result: true,
            },
        };
        Ok(request)
    }
}

/// Request to start a service job
///
/// `input_data` and `parameters` are JSON documents encoded as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJob {
    pub service_definition_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data_ref: Option<DataPoolRef>,
    pub parameters: String,
    pub persist_result: bool,
}

/// Body of an application job sent to a service gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationJobRequest {
    pub data: Value,
    pub params: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_upload_request() {
        let input = JobInput::DataUpload {
            data: json!({"x": [1, 2]}),
            params: json!({"reps": 3}),
        };
        let request = input.into_request("def-1").unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "serviceDefinitionId": "def-1",
                "inputData": "{\"x\":[1,2]}",
                "parameters": "{\"reps\":3}",
                "persistResult": true
            })
        );
    }

    #[test]
    fn test_data_pool_request() {
        let input = JobInput::DataPool {
            data_ref: DataPoolRef {
                data_pool_id: "pool".into(),
                data_source_descriptor_id: "dsd".into(),
                file_id: "file".into(),
            },
            params: json!({}),
        };
        let body = serde_json::to_value(input.into_request("def-1").unwrap()).unwrap();

        assert!(body.get("inputData").is_none());
        assert_eq!(body["inputDataRef"]["dataPoolId"], "pool");
        assert_eq!(body["parameters"], "{}");
    }
}
