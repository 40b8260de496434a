//! Service gateway: access tokens and application jobs
//!
//! Application jobs do not go through the platform API. They are posted to
//! the gateway endpoint of a service version with a bearer token obtained
//! from the consumer key and secret of a subscribed application.

use planqk_core::domain::status::Status;
use planqk_core::dto::auth::TokenResponse;
use planqk_core::dto::job::ApplicationJobRequest;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, info};

use crate::PlanqkClient;
use crate::error::{ClientError, Result};
use crate::poller::{self, PollConfig, TerminalStates};

impl PlanqkClient {
    // =============================================================================
    // Authentication
    // =============================================================================

    /// Request a gateway access token with the client-credentials grant
    ///
    /// # Arguments
    /// * `consumer_key` - Client id of the subscribed application
    /// * `consumer_secret` - Client secret of the subscribed application
    pub async fn get_access_token(
        &self,
        consumer_key: &str,
        consumer_secret: &str,
    ) -> Result<String> {
        debug!("POST {}", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(consumer_key, Some(consumer_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let token: TokenResponse = self.handle_response(response).await?;
        Ok(token.access_token)
    }

    // =============================================================================
    // Application Jobs
    // =============================================================================

    /// Gateway endpoint of the current version of a service
    pub async fn get_gateway_endpoint(&self, service_name: &str) -> Result<String> {
        let version = self.get_version(service_name).await?;
        version
            .gateway_endpoint
            .map(|endpoint| endpoint.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                ClientError::NotFound(format!("gateway endpoint of service '{}'", service_name))
            })
    }

    /// URL reporting the status of an application job
    pub async fn application_job_url(&self, service_name: &str, job_id: &str) -> Result<String> {
        let endpoint = self.get_gateway_endpoint(service_name).await?;
        Ok(format!("{}/{}", endpoint, job_id))
    }

    /// Start an application job through the gateway of a service
    ///
    /// # Returns
    /// The gateway's job description, including its `id`
    pub async fn trigger_application_job(
        &self,
        service_name: &str,
        data: Value,
        params: Value,
        access_token: &str,
    ) -> Result<Value> {
        let endpoint = self.get_gateway_endpoint(service_name).await?;
        let request = ApplicationJobRequest { data, params };

        let response = self
            .gateway(Method::POST, &format!("{}/", endpoint), access_token)
            .json(&request)
            .send()
            .await?;

        let job: Value = self.handle_response(response).await?;
        if let Some(id) = job.get("id").and_then(Value::as_str) {
            info!("Started application job: {}", id);
        }
        Ok(job)
    }

    pub async fn get_application_job_info(
        &self,
        service_name: &str,
        job_id: &str,
        access_token: &str,
    ) -> Result<Value> {
        let url = self.application_job_url(service_name, job_id).await?;
        self.fetch_gateway_json(&url, access_token).await
    }

    pub async fn get_application_job_status(
        &self,
        service_name: &str,
        job_id: &str,
        access_token: &str,
    ) -> Result<Status> {
        let info = self
            .get_application_job_info(service_name, job_id, access_token)
            .await?;
        status_of(&info)
    }

    /// Get the `result` field of a finished application job
    pub async fn get_application_job_result(
        &self,
        service_name: &str,
        job_id: &str,
        access_token: &str,
    ) -> Result<Value> {
        let url = self.application_job_url(service_name, job_id).await?;
        let mut body = self
            .fetch_gateway_json(&format!("{}/result", url), access_token)
            .await?;

        body.get_mut("result")
            .map(Value::take)
            .ok_or_else(|| ClientError::ParseError("missing field `result`".to_string()))
    }

    /// Wait until the application job behind `url` finished
    ///
    /// # Arguments
    /// * `url` - Status URL of the job, see [`PlanqkClient::application_job_url`]
    /// * `access_token` - Gateway bearer token
    pub async fn wait_for_application_job_to_be_finished(
        &self,
        url: &str,
        access_token: &str,
        poll: PollConfig,
    ) -> Result<bool> {
        let fetch = move || async move {
            let info = self.fetch_gateway_json(url, access_token).await?;
            status_of(&info)
        };

        let description = format!("application job {}", url);
        Ok(poller::poll(&description, fetch, &TerminalStates::job(), &poll).await?)
    }

    fn gateway(&self, method: Method, url: &str, access_token: &str) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn fetch_gateway_json(&self, url: &str, access_token: &str) -> Result<Value> {
        let response = self
            .gateway(Method::GET, url, access_token)
            .send()
            .await?;
        self.handle_response(response).await
    }
}

fn status_of(info: &Value) -> Result<Status> {
    info.get("status")
        .and_then(Value::as_str)
        .map(Status::parse)
        .ok_or_else(|| ClientError::ParseError("missing field `status`".to_string()))
}
