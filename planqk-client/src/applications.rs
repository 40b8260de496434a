//! Application and subscription endpoints

use planqk_core::domain::application::{Application, Subscription};
use planqk_core::dto::application::{CreateApplication, CreateInternalSubscription};
use reqwest::Method;
use tracing::{debug, info};

use crate::PlanqkClient;
use crate::error::{ClientError, Result};

impl PlanqkClient {
    // =============================================================================
    // Applications
    // =============================================================================

    /// Create an application
    ///
    /// The returned application carries the consumer key and secret used to
    /// request gateway access tokens.
    pub async fn create_application(&self, application_name: &str) -> Result<Application> {
        let request = CreateApplication {
            name: application_name.to_string(),
        };

        let response = self
            .platform(Method::POST, "/applications")
            .json(&request)
            .send()
            .await?;

        let application: Application = self.handle_response(response).await?;
        info!("Application created: {} ({})", application.name, application.id);
        Ok(application)
    }

    /// List all applications of the account
    pub async fn get_applications(&self) -> Result<Vec<Application>> {
        let response = self.platform(Method::GET, "/applications").send().await?;
        self.handle_response(response).await
    }

    /// Find an application by exact name; the last match wins
    pub async fn get_application(&self, application_name: &str) -> Result<Option<Application>> {
        debug!("Get application {}", application_name);

        let applications = self.get_applications().await?;
        Ok(applications
            .into_iter()
            .rev()
            .find(|a| a.name == application_name))
    }

    pub(crate) async fn require_application(&self, application_name: &str) -> Result<Application> {
        self.get_application(application_name)
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("application '{}'", application_name)))
    }

    /// Delete an application
    pub async fn remove_application(&self, application_name: &str) -> Result<bool> {
        let application = self.require_application(application_name).await?;

        let response = self
            .platform(Method::DELETE, &format!("/applications/{}", application.id))
            .send()
            .await?;
        self.handle_empty_response(response).await?;

        info!("Application {} removed", application_name);
        Ok(true)
    }

    // =============================================================================
    // Subscriptions
    // =============================================================================

    /// Subscribe an application to a service of the same organization
    pub async fn subscribe_application_to_service(
        &self,
        application_name: &str,
        service_name: &str,
    ) -> Result<Subscription> {
        let service = self.require_service(service_name).await?;
        let application = self.require_application(application_name).await?;

        let request = CreateInternalSubscription {
            application_id: application.id.clone(),
            service_id: service.id,
        };

        let response = self
            .platform(
                Method::POST,
                &format!("/applications/{}/subscriptions/internal", application.id),
            )
            .json(&request)
            .send()
            .await?;

        let subscription: Subscription = self.handle_response(response).await?;
        info!(
            "Application {} subscribed to {}",
            application_name, service_name
        );
        Ok(subscription)
    }

    /// List the subscriptions of an application
    pub async fn get_all_subscriptions(&self, application_name: &str) -> Result<Vec<Subscription>> {
        let application = self.require_application(application_name).await?;
        self.subscriptions_of(&application.id).await
    }

    /// First subscription of an application
    pub async fn get_subscription(&self, application_name: &str) -> Result<Option<Subscription>> {
        Ok(self
            .get_all_subscriptions(application_name)
            .await?
            .into_iter()
            .next())
    }

    /// Remove the first subscription of an application
    pub async fn remove_subscription(&self, application_name: &str) -> Result<bool> {
        let application = self.require_application(application_name).await?;
        let subscription = self
            .subscriptions_of(&application.id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::NotFound(format!("subscription of '{}'", application_name))
            })?;

        let path = format!(
            "/applications/{}/subscriptions/{}",
            application.id, subscription.id
        );
        let response = self.platform(Method::DELETE, &path).send().await?;
        self.handle_empty_response(response).await?;

        info!("Subscription {} removed", subscription.id);
        Ok(true)
    }

    async fn subscriptions_of(&self, application_id: &str) -> Result<Vec<Subscription>> {
        let response = self
            .platform(
                Method::GET,
                &format!("/applications/{}/subscriptions", application_id),
            )
            .send()
            .await?;

        self.handle_response(response).await
    }
}
