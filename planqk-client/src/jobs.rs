//! Service job endpoints

use planqk_core::domain::job::Job;
use planqk_core::domain::status::Status;
use planqk_core::dto::job::JobInput;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use crate::PlanqkClient;
use crate::error::{ClientError, Result};
use crate::poller::{self, PollConfig, TerminalStates};
use crate::services::version_of;

impl PlanqkClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Start a job on the current version of a service and wait for it
    ///
    /// # Arguments
    /// * `service_name` - Name of the managed service
    /// * `input` - Inline data or a data pool reference, plus parameters
    /// * `poll` - How long and how often to check the job status
    ///
    /// # Returns
    /// The job as reported after it reached a terminal status
    ///
    /// # Example
    /// ```no_run
    /// # use planqk_client::{PlanqkClient, PollConfig};
    /// # use planqk_core::dto::job::JobInput;
    /// # use serde_json::json;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = PlanqkClient::new("my-api-key")?;
    /// let job = client
    ///     .trigger_service_job(
    ///         "my-service",
    ///         JobInput::DataUpload { data: json!({}), params: json!({}) },
    ///         PollConfig::default(),
    ///     )
    ///     .await?;
    /// println!("{} finished: {}", job.id, job.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn trigger_service_job(
        &self,
        service_name: &str,
        input: JobInput,
        poll: PollConfig,
    ) -> Result<Job> {
        let version = self.get_version(service_name).await?;
        let request = input.into_request(version.id)?;

        let response = self
            .platform(Method::POST, "/jobs")
            .json(&request)
            .send()
            .await?;
        let job: Job = self.handle_response(response).await?;

        info!("Started service job: {}", job.id);
        self.wait_for_service_job_to_be_finished(&job.id, poll)
            .await?;

        self.get_service_job(&job.id).await
    }

    /// Get a service job by ID
    pub async fn get_service_job(&self, job_id: &str) -> Result<Job> {
        let response = self
            .platform(Method::GET, &format!("/jobs/{}", job_id))
            .send()
            .await?;

        self.handle_response(response).await
    }

    pub async fn get_service_job_status(&self, job_id: &str) -> Result<Status> {
        Ok(self.get_service_job(job_id).await?.status)
    }

    /// Get the decoded result of a finished service job
    ///
    /// The platform stores the service response as a JSON string; this
    /// returns the value under its `result` key.
    pub async fn get_service_job_result(&self, job_id: &str) -> Result<Value> {
        let job = self.get_service_job(job_id).await?;
        debug!("Get result of service job {}", job_id);

        match job.decoded_result() {
            Some(result) => Ok(result?),
            None => Err(ClientError::NotFound(format!("result of job {}", job_id))),
        }
    }

    /// Delete a service job
    pub async fn remove_service_job(&self, job_id: &str) -> Result<bool> {
        let response = self
            .platform(Method::DELETE, &format!("/jobs/{}", job_id))
            .send()
            .await?;
        self.handle_empty_response(response).await?;

        info!("Service job {} removed", job_id);
        Ok(true)
    }

    /// Wait until a service job finished
    ///
    /// # Returns
    /// `true` if the job succeeded, `false` if it failed or was cancelled
    pub async fn wait_for_service_job_to_be_finished(
        &self,
        job_id: &str,
        poll: PollConfig,
    ) -> Result<bool> {
        let fetch = move || async move { self.get_service_job_status(job_id).await };

        let description = format!("service job {}", job_id);
        Ok(poller::poll(&description, fetch, &TerminalStates::job(), &poll).await?)
    }

    // =============================================================================
    // Job Listings
    // =============================================================================

    /// List all service jobs of the account
    pub async fn get_all_service_jobs(&self) -> Result<Vec<Job>> {
        let response = self.platform(Method::GET, "/jobs").send().await?;
        self.handle_response(response).await
    }

    /// List the jobs that ran on the current version of a service
    pub async fn get_service_jobs(&self, service_name: &str) -> Result<Vec<Job>> {
        let version = self.get_version(service_name).await?;
        let jobs = self.get_all_service_jobs().await?;

        Ok(jobs
            .into_iter()
            .filter(|job| job.service_definition_id() == Some(version.id.as_str()))
            .collect())
    }

    /// List jobs through the service definition endpoint
    pub async fn get_all_jobs_for_managed_service(&self, service_name: &str) -> Result<Vec<Job>> {
        let service = self.require_service(service_name).await?;
        let version = version_of(&service)?;

        let path = format!(
            "/services/{}/service-definitions/{}/jobs",
            service.id, version.id
        );
        let response = self.platform(Method::GET, &path).send().await?;

        self.handle_response(response).await
    }

    /// Find one job among the jobs of a managed service
    pub async fn get_managed_service_job(
        &self,
        service_name: &str,
        job_id: &str,
    ) -> Result<Option<Job>> {
        let jobs = self.get_all_jobs_for_managed_service(service_name).await?;
        Ok(jobs.into_iter().find(|job| job.id == job_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::ClientError;
    use crate::test_support::{client_for, fast_poll};
    use httpmock::prelude::*;
    use planqk_core::domain::status::Status;
    use planqk_core::dto::job::JobInput;
    use serde_json::json;

    /// One service `solver` with id `svc-1` and version `def-1`
    fn mock_service(server: &MockServer) {
        for stage in ["CREATED", "ACCESSIBLE", "PUBLISHED"] {
            let body = if stage == "ACCESSIBLE" {
                json!([{ "id": "svc-1", "name": "solver" }])
            } else {
                json!([])
            };
            server.mock(move |when, then| {
                when.method(GET).path("/services").query_param("lifecycle", stage);
                then.status(200).json_body(body);
            });
        }
        server.mock(|when, then| {
            when.method(GET).path("/services/svc-1");
            then.status(200).json_body(json!({
                "id": "svc-1",
                "name": "solver",
                "serviceDefinitions": [{ "id": "def-1" }]
            }));
        });
    }

    #[tokio::test]
    async fn test_trigger_service_job_waits_and_refreshes() {
        let server = MockServer::start();
        mock_service(&server);
        let create = server.mock(|when, then| {
            when.method(POST).path("/jobs").json_body(json!({
                "serviceDefinitionId": "def-1",
                "inputData": "{\"values\":[1,2]}",
                "parameters": "{\"shots\":10}",
                "persistResult": true
            }));
            then.status(201)
                .json_body(json!({ "id": "job-1", "status": "PENDING" }));
        });
        let get = server.mock(|when, then| {
            when.method(GET).path("/jobs/job-1");
            then.status(200).json_body(json!({
                "id": "job-1",
                "status": "SUCCEEDED",
                "result": "{\"result\": {\"energy\": -1.5}}"
            }));
        });

        let client = client_for(&server);
        let job = client
            .trigger_service_job(
                "solver",
                JobInput::DataUpload {
                    data: json!({ "values": [1, 2] }),
                    params: json!({ "shots": 10 }),
                },
                fast_poll(),
            )
            .await
            .unwrap();

        assert_eq!(job.status, Status::Succeeded);
        create.assert();
        // one status check, one refresh
        get.assert_calls(2);
    }

    #[tokio::test]
    async fn test_trigger_service_job_unknown_service() {
        let server = MockServer::start();
        mock_service(&server);
        let create = server.mock(|when, then| {
            when.method(POST).path("/jobs");
            then.status(201);
        });

        let client = client_for(&server);
        let err = client
            .trigger_service_job(
                "missing",
                JobInput::DataUpload { data: json!({}), params: json!({}) },
                fast_poll(),
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        create.assert_calls(0);
    }

    #[tokio::test]
    async fn test_get_service_job_result() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/jobs/job-1");
            then.status(200).json_body(json!({
                "id": "job-1",
                "status": "SUCCEEDED",
                "result": "{\"result\": [0, 1, 1, 0]}"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/jobs/job-2");
            then.status(200)
                .json_body(json!({ "id": "job-2", "status": "RUNNING" }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/jobs/job-3");
            then.status(200).json_body(json!({
                "id": "job-3",
                "status": "SUCCEEDED",
                "result": "not json"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/jobs/job-4");
            then.status(200).json_body(json!({
                "id": "job-4",
                "status": "SUCCEEDED",
                "result": "{\"metadata\": {}}"
            }));
        });

        let client = client_for(&server);
        assert_eq!(
            client.get_service_job_result("job-1").await.unwrap(),
            json!([0, 1, 1, 0])
        );
        assert!(client
            .get_service_job_result("job-2")
            .await
            .unwrap_err()
            .is_not_found());
        assert!(matches!(
            client.get_service_job_result("job-3").await,
            Err(ClientError::ParseError(_))
        ));
        match client.get_service_job_result("job-4").await {
            Err(ClientError::ParseError(message)) => {
                assert!(message.contains("missing field `result`"))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wait_for_cancelled_job() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/jobs/job-1");
            then.status(200)
                .json_body(json!({ "id": "job-1", "status": "CANCELLED" }));
        });

        let client = client_for(&server);
        let finished = client
            .wait_for_service_job_to_be_finished("job-1", fast_poll())
            .await
            .unwrap();

        assert!(!finished);
    }

    #[tokio::test]
    async fn test_wait_propagates_fetch_errors() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/jobs/gone");
            then.status(404).body("job not found");
        });

        let client = client_for(&server);
        let err = client
            .wait_for_service_job_to_be_finished("gone", fast_poll())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn test_job_listings() {
        let server = MockServer::start();
        mock_service(&server);
        server.mock(|when, then| {
            when.method(GET).path("/jobs");
            then.status(200).json_body(json!([
                { "id": "a", "status": "SUCCEEDED", "serviceDefinition": { "id": "def-1" } },
                { "id": "b", "status": "FAILED", "serviceDefinition": { "id": "def-9" } },
                { "id": "c", "status": "PENDING" }
            ]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/services/svc-1/service-definitions/def-1/jobs");
            then.status(200).json_body(json!([
                { "id": "a", "status": "SUCCEEDED" },
                { "id": "d", "status": "RUNNING" }
            ]));
        });

        let client = client_for(&server);
        assert_eq!(client.get_all_service_jobs().await.unwrap().len(), 3);

        let jobs = client.get_service_jobs("solver").await.unwrap();
        let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);

        let managed = client.get_all_jobs_for_managed_service("solver").await.unwrap();
        assert_eq!(managed.len(), 2);

        let job = client.get_managed_service_job("solver", "d").await.unwrap();
        assert_eq!(job.unwrap().status, Status::Running);
        assert!(client
            .get_managed_service_job("solver", "zzz")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_remove_service_job() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/jobs/job-1");
            then.status(204);
        });

        let client = client_for(&server);
        assert!(client.remove_service_job("job-1").await.unwrap());
        mock.assert();
    }
}
