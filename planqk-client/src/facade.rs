//! High-level workflows built on [`PlanqkClient`]

use std::time::Duration;

use planqk_core::domain::data_pool::DataPoolRef;
use planqk_core::domain::service::Service;
use planqk_core::dto::job::JobInput;
use planqk_core::dto::service::ServiceConfig;
use serde_json::Value;
use tracing::{debug, info};

use crate::PlanqkClient;
use crate::error::{ClientError, Result};
use crate::poller::{DEFAULT_POLL_TIMEOUT, PollConfig};
use crate::upload::FileUpload;

/// Builds poll the platform less often than jobs
const BUILD_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Create-and-wait workflows for services, jobs and data pools
///
/// Every method blocks the calling task until the remote side reached a
/// terminal state and reports failures as [`ClientError`] values.
#[derive(Debug, Clone)]
pub struct Planqk {
    client: PlanqkClient,
}

impl Planqk {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::from_client(PlanqkClient::new(api_key)?))
    }

    pub fn from_client(client: PlanqkClient) -> Self {
        Self { client }
    }

    /// The underlying low-level client
    pub fn client(&self) -> &PlanqkClient {
        &self.client
    }

    /// Create a managed service and wait until its build finished
    ///
    /// # Errors
    /// [`ClientError::ServiceBuildFailed`] when the build ends in failure,
    /// [`ClientError::Timeout`] when it does not finish in time.
    pub async fn create_service(
        &self,
        config: ServiceConfig,
        user_code: FileUpload,
        api_definition: FileUpload,
    ) -> Result<Service> {
        debug!("Create service {}", config.name);

        let service = self
            .client
            .create_managed_service(config, user_code, api_definition)
            .await?;
        let version = self.client.resolve_version(&service).await?;

        let poll = PollConfig::new(DEFAULT_POLL_TIMEOUT, BUILD_POLL_INTERVAL);
        let built = self
            .client
            .wait_for_service_to_be_created(&service.id, &version.id, poll)
            .await?;

        if !built {
            return Err(ClientError::ServiceBuildFailed(service.name));
        }

        info!("Service {} is ready", service.name);
        Ok(service)
    }

    /// Run a job on a service and return its decoded result
    ///
    /// # Errors
    /// [`ClientError::JobFailed`] when the job did not succeed.
    pub async fn execute_service(
        &self,
        service_name: &str,
        input: JobInput,
        poll: PollConfig,
    ) -> Result<Value> {
        debug!("Execute service {}", service_name);

        let job = self
            .client
            .trigger_service_job(service_name, input, poll)
            .await?;

        if !job.status.is_success() {
            return Err(ClientError::JobFailed(format!(
                "job {} ended with status {}",
                job.id, job.status
            )));
        }

        self.client.get_service_job_result(&job.id).await
    }

    /// Create a data pool holding one file and return a reference to it
    ///
    /// The reference can be passed to [`Planqk::execute_service`] through
    /// [`JobInput::DataPool`].
    pub async fn create_data_pool(&self, data_pool_name: &str, file: FileUpload) -> Result<DataPoolRef> {
        let file_name = file.file_name.clone();

        self.client.create_data_pool(data_pool_name).await?;
        if !self.client.add_data_to_data_pool(data_pool_name, file).await? {
            return Err(ClientError::InvalidRequest(format!(
                "data pool '{}' rejected upload of '{}'",
                data_pool_name, file_name
            )));
        }

        let files = self
            .client
            .get_data_pool_file_information(data_pool_name)
            .await?;

        files
            .get(&file_name)
            .map(|info| info.to_ref())
            .ok_or_else(|| {
                ClientError::NotFound(format!(
                    "file '{}' in data pool '{}'",
                    file_name, data_pool_name
                ))
            })
    }
}
