//! Data pool endpoints

use std::collections::BTreeMap;
use std::time::Duration;

use planqk_core::domain::data_pool::{DataPool, DataPoolFile, DataSourceDescriptor, Page};
use planqk_core::dto::data_pool::CreateDataPool;
use reqwest::Method;
use reqwest::multipart::Form;
use tracing::{debug, info, warn};

use crate::PlanqkClient;
use crate::error::{ClientError, Result};
use crate::upload::FileUpload;

/// Newly created pools show up in listings with a delay
const POOL_LOOKUP_ATTEMPTS: u32 = 10;
const POOL_LOOKUP_DELAY: Duration = Duration::from_secs(1);

impl PlanqkClient {
    // =============================================================================
    // Data Pools
    // =============================================================================

    pub async fn get_data_pools(&self) -> Result<Vec<DataPool>> {
        let response = self.platform(Method::GET, "/data-pools").send().await?;
        let page: Page<DataPool> = self.handle_response(response).await?;
        Ok(page.content)
    }

    pub async fn create_data_pool(&self, data_pool_name: &str) -> Result<DataPool> {
        let request = CreateDataPool {
            name: data_pool_name.to_string(),
        };

        let response = self
            .platform(Method::POST, "/data-pools")
            .json(&request)
            .send()
            .await?;

        let pool: DataPool = self.handle_response(response).await?;
        info!("Data pool created: {} ({})", pool.name, pool.id);
        Ok(pool)
    }

    /// Find a data pool by exact name; the first listed match wins
    pub async fn get_data_pool(&self, data_pool_name: &str) -> Result<Option<DataPool>> {
        let pools = self.get_data_pools().await?;
        Ok(pools.into_iter().find(|p| p.name == data_pool_name))
    }

    async fn require_data_pool(&self, data_pool_name: &str) -> Result<DataPool> {
        self.get_data_pool(data_pool_name)
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("data pool '{}'", data_pool_name)))
    }

    /// Delete a data pool
    ///
    /// # Returns
    /// `false` if the platform answered with a non-success status
    pub async fn remove_data_pool(&self, data_pool_name: &str) -> Result<bool> {
        let pool = self.require_data_pool(data_pool_name).await?;

        let response = self
            .platform(Method::DELETE, &format!("/data-pools/{}", pool.id))
            .send()
            .await?;

        let removed = accepted(response, "remove data pool").await;
        if removed {
            info!("Data pool {} removed", data_pool_name);
        }
        Ok(removed)
    }

    // =============================================================================
    // Data Pool Files
    // =============================================================================

    /// Files of a data pool, keyed by file name
    ///
    /// Each data source descriptor holds one uploaded file; descriptors
    /// without files are skipped.
    pub async fn get_data_pool_file_information(
        &self,
        data_pool_name: &str,
    ) -> Result<BTreeMap<String, DataPoolFile>> {
        let pool = self.require_data_pool(data_pool_name).await?;

        let response = self
            .platform(
                Method::GET,
                &format!("/data-pools/{}/data-source-descriptors", pool.id),
            )
            .send()
            .await?;
        let descriptors: Vec<DataSourceDescriptor> = self.handle_response(response).await?;

        let files = descriptors
            .into_iter()
            .filter_map(|descriptor| {
                let file = descriptor.files.into_iter().next()?;
                let info = DataPoolFile {
                    identifier: file.name.clone(),
                    data_pool_id: pool.id.clone(),
                    data_source_descriptor_id: descriptor.id,
                    file_id: file.id,
                };
                Some((file.name, info))
            })
            .collect();

        Ok(files)
    }

    /// Upload a file into a data pool
    ///
    /// Looks the pool up to ten times, one second apart, so this can be
    /// called right after [`PlanqkClient::create_data_pool`].
    ///
    /// # Returns
    /// `false` if the platform rejected the upload
    pub async fn add_data_to_data_pool(
        &self,
        data_pool_name: &str,
        file: FileUpload,
    ) -> Result<bool> {
        let pool = self
            .lookup_data_pool(data_pool_name, POOL_LOOKUP_ATTEMPTS, POOL_LOOKUP_DELAY)
            .await?;

        let form = Form::new().part("file", file.into_part());
        let response = self
            .platform(
                Method::POST,
                &format!("/data-pools/{}/data-source-descriptors", pool.id),
            )
            .multipart(form)
            .send()
            .await?;

        let added = accepted(response, "add data to data pool").await;
        if added {
            info!("Data added to data pool {}", data_pool_name);
        }
        Ok(added)
    }

    async fn lookup_data_pool(
        &self,
        data_pool_name: &str,
        attempts: u32,
        delay: Duration,
    ) -> Result<DataPool> {
        for attempt in 1..=attempts {
            debug!("Get pool try: {}", attempt);
            if let Some(pool) = self.get_data_pool(data_pool_name).await? {
                return Ok(pool);
            }
            if attempt < attempts {
                tokio::time::sleep(delay).await;
            }
        }

        Err(ClientError::NotFound(format!(
            "data pool '{}' after {} attempts",
            data_pool_name, attempts
        )))
    }
}

/// Whether a call without a response body succeeded; rejections are logged
async fn accepted(response: reqwest::Response, action: &str) -> bool {
    let status = response.status();
    if status.is_success() {
        return true;
    }

    let message = response.text().await.unwrap_or_default();
    warn!("Failed to {} (status {}): {}", action, status.as_u16(), message);
    false
}
