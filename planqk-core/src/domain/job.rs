//! Service job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::status::Status;

/// Execution record of a service job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub status: Status,
    #[serde(default)]
    pub service_definition: Option<ServiceDefinitionRef>,
    /// Job output as a JSON-encoded string, present once the job finished
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
}

/// Reference from a job to the service definition it runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinitionRef {
    pub id: String,
}

impl Job {
    /// Id of the service definition this job belongs to
    pub fn service_definition_id(&self) -> Option<&str> {
        self.service_definition.as_ref().map(|d| d.id.as_str())
    }

    /// Decode the `result` field of the persisted job output
    ///
    /// The platform stores the whole response of the service as a string; the
    /// payload the service produced sits under its `result` key. Output
    /// without that key is a decoding error.
    pub fn decoded_result(&self) -> Option<Result<Value, serde_json::Error>> {
        self.result.as_deref().map(|raw| {
            let mut parsed: Value = serde_json::from_str(raw)?;
            parsed
                .get_mut("result")
                .map(Value::take)
                .ok_or_else(|| <serde_json::Error as serde::de::Error>::missing_field("result"))
        })
    }

    /// Wall-clock run time, when both timestamps are present and RFC 3339
    pub fn duration(&self) -> Option<chrono::Duration> {
        let started = parse_timestamp(self.started_at.as_deref()?)?;
        let ended = parse_timestamp(self.ended_at.as_deref()?)?;
        Some(ended.signed_duration_since(started))
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(result: Option<&str>) -> Job {
        Job {
            id: "job-1".into(),
            status: Status::Succeeded,
            service_definition: Some(ServiceDefinitionRef { id: "def-1".into() }),
            result: result.map(str::to_string),
            created_at: None,
            started_at: Some("2024-03-01T10:00:00Z".into()),
            ended_at: Some("2024-03-01T10:01:30Z".into()),
        }
    }

    #[test]
    fn test_decoded_result() {
        let job = job(Some(r#"{"result": {"model": [1, 2]}, "metadata": {}}"#));
        let result = job.decoded_result().unwrap().unwrap();
        assert_eq!(result, json!({"model": [1, 2]}));
    }

    #[test]
    fn test_decoded_result_missing_key() {
        let without_key = job(Some(r#"{"other": 1}"#));
        let err = without_key.decoded_result().unwrap().unwrap_err();
        assert!(err.to_string().contains("missing field `result`"));

        let explicit_null = job(Some(r#"{"result": null}"#));
        assert_eq!(explicit_null.decoded_result().unwrap().unwrap(), Value::Null);
    }

    #[test]
    fn test_decoded_result_invalid_json() {
        let invalid = job(Some("not json"));
        assert!(invalid.decoded_result().unwrap().is_err());
        assert!(job(None).decoded_result().is_none());
    }

    #[test]
    fn test_duration() {
        assert_eq!(job(None).duration().unwrap().num_seconds(), 90);
    }

    #[test]
    fn test_deserialize_job() {
        let job: Job = serde_json::from_value(json!({
            "id": "job-2",
            "status": "RUNNING",
            "serviceDefinition": { "id": "def-9", "name": "ignored" }
        }))
        .unwrap();
        assert_eq!(job.status, Status::Running);
        assert_eq!(job.service_definition_id(), Some("def-9"));
        assert!(job.duration().is_none());
    }
}
