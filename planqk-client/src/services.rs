//! Service-related API endpoints

use planqk_core::domain::service::{BuildStatus, Lifecycle, Service, ServiceDefinition};
use planqk_core::dto::service::ServiceConfig;
use reqwest::Method;
use reqwest::multipart::Form;
use tracing::{debug, info};

use crate::PlanqkClient;
use crate::error::{ClientError, Result};
use crate::poller::{self, PollConfig, TerminalStates};
use crate::upload::FileUpload;

impl PlanqkClient {
    // =============================================================================
    // Service Management
    // =============================================================================

    /// Create a managed service from user code and an API definition
    ///
    /// The platform starts building the service right away; use
    /// [`PlanqkClient::wait_for_service_to_be_created`] to wait for the build.
    ///
    /// # Arguments
    /// * `config` - Name and resources of the service
    /// * `user_code` - Zip archive containing the service code
    /// * `api_definition` - OpenAPI definition of the service
    ///
    /// # Example
    /// ```no_run
    /// # use planqk_client::PlanqkClient;
    /// # use planqk_client::upload::FileUpload;
    /// # use planqk_core::dto::service::ServiceConfig;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = PlanqkClient::new("my-api-key")?;
    /// let service = client
    ///     .create_managed_service(
    ///         ServiceConfig::new("my-service"),
    ///         FileUpload::from_path("user_code.zip").await?,
    ///         FileUpload::from_path("openapi-spec.yml").await?,
    ///     )
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_managed_service(
        &self,
        config: ServiceConfig,
        user_code: FileUpload,
        api_definition: FileUpload,
    ) -> Result<Service> {
        config.validate().map_err(ClientError::InvalidRequest)?;

        let mut form = Form::new();
        for (name, value) in config.form_fields() {
            form = form.text(name, value);
        }
        let form = form
            .part("userCode", user_code.into_part())
            .part("apiDefinition", api_definition.into_part());

        let response = self
            .platform(Method::POST, "/services")
            .multipart(form)
            .send()
            .await?;

        let service: Service = self.handle_response(response).await?;
        info!("Service creation triggered: {} ({})", service.name, service.id);
        Ok(service)
    }

    /// List services
    ///
    /// # Arguments
    /// * `lifecycle` - Only list services in this stage; `None` lists created,
    ///   accessible and published services
    ///
    /// # Errors
    /// [`ClientError::InvalidRequest`] for [`Lifecycle::Unknown`], which the
    /// platform does not accept as a filter
    pub async fn get_services(&self, lifecycle: Option<Lifecycle>) -> Result<Vec<Service>> {
        let stages = match lifecycle {
            Some(Lifecycle::Unknown) => {
                return Err(ClientError::InvalidRequest(
                    "unknown lifecycle cannot be used as a service filter".into(),
                ));
            }
            Some(stage) => vec![stage],
            None => Lifecycle::LISTED.to_vec(),
        };

        let mut services = Vec::new();
        for stage in stages {
            let response = self
                .platform(Method::GET, "/services")
                .query(&[("lifecycle", stage.as_str())])
                .send()
                .await?;

            let batch: Vec<Service> = self.handle_response(response).await?;
            services.extend(batch);
        }

        Ok(services)
    }

    /// Get a service by ID
    pub async fn get_service_by_id(&self, service_id: &str) -> Result<Service> {
        let response = self
            .platform(Method::GET, &format!("/services/{}", service_id))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Find a service by name
    ///
    /// Names are matched exactly. If several services share a name, the one
    /// listed last wins.
    ///
    /// # Returns
    /// The full service details, or `None` if no service has that name
    pub async fn get_service(&self, service_name: &str) -> Result<Option<Service>> {
        debug!("Get service {}", service_name);

        let services = self.get_services(None).await?;
        match services.iter().rev().find(|s| s.name == service_name) {
            Some(found) => Ok(Some(self.get_service_by_id(&found.id).await?)),
            None => Ok(None),
        }
    }

    /// Same as [`PlanqkClient::get_service`] but a missing service is an error
    pub(crate) async fn require_service(&self, service_name: &str) -> Result<Service> {
        self.get_service(service_name)
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("service '{}'", service_name)))
    }

    /// Get the version (first service definition) of a service
    pub async fn get_version(&self, service_name: &str) -> Result<ServiceDefinition> {
        let service = self.require_service(service_name).await?;
        version_of(&service).cloned()
    }

    /// Current version of a service
    ///
    /// Uses the definitions the given value carries and re-reads the service
    /// by ID when there are none, as with the response of
    /// [`PlanqkClient::create_managed_service`]. Never looks the service up by
    /// name, so a same-named older service is never picked.
    pub async fn resolve_version(&self, service: &Service) -> Result<ServiceDefinition> {
        if let Some(version) = service.current_version() {
            return Ok(version.clone());
        }

        let fetched = self.get_service_by_id(&service.id).await?;
        version_of(&fetched).cloned()
    }

    /// Publish the current version of a service inside the organization
    pub async fn publish_service_internally(&self, service_name: &str) -> Result<()> {
        let service = self.require_service(service_name).await?;
        let version = version_of(&service)?;

        let path = format!(
            "/services/{}/service-definitions/{}/publish/internal",
            service.id, version.id
        );
        let response = self.platform(Method::POST, &path).send().await?;
        self.handle_empty_response(response).await?;

        info!("Service {} published internally", service_name);
        Ok(())
    }

    /// Withdraw the current version of a service from publication
    pub async fn unpublish_service(&self, service_name: &str) -> Result<()> {
        let service = self.require_service(service_name).await?;
        let version = version_of(&service)?;

        let path = format!(
            "/services/{}/service-definitions/{}/unpublish",
            service.id, version.id
        );
        let response = self.platform(Method::POST, &path).send().await?;
        self.handle_empty_response(response).await?;

        info!("Service {} unpublished", service_name);
        Ok(())
    }

    /// Delete a service and all its versions
    pub async fn remove_service(&self, service_name: &str) -> Result<bool> {
        let service = self.require_service(service_name).await?;

        let response = self
            .platform(Method::DELETE, &format!("/services/{}", service.id))
            .send()
            .await?;
        self.handle_empty_response(response).await?;

        info!("Service {} removed", service_name);
        Ok(true)
    }

    // =============================================================================
    // Service Build
    // =============================================================================

    /// Get the build status of a service version
    pub async fn get_build_status(
        &self,
        service_id: &str,
        version_id: &str,
    ) -> Result<BuildStatus> {
        let path = format!(
            "/services/{}/service-definitions/{}/status",
            service_id, version_id
        );
        let response = self.platform(Method::GET, &path).send().await?;

        self.handle_response(response).await
    }

    /// Wait until the build of a service version finished
    ///
    /// # Returns
    /// `true` if the build succeeded, `false` if it failed or was cancelled.
    /// Exceeding `poll.timeout` is a [`ClientError::Timeout`].
    pub async fn wait_for_service_to_be_created(
        &self,
        service_id: &str,
        version_id: &str,
        poll: PollConfig,
    ) -> Result<bool> {
        info!("Waiting for service {} to be created", service_id);

        let fetch = move || async move {
            self.get_build_status(service_id, version_id)
                .await
                .map(|build| build.status)
        };

        let description = format!("build of service {}", service_id);
        Ok(poller::poll(&description, fetch, &TerminalStates::build(), &poll).await?)
    }
}

pub(crate) fn version_of(service: &Service) -> Result<&ServiceDefinition> {
    service.current_version().ok_or_else(|| {
        ClientError::NotFound(format!("service '{}' has no version", service.name))
    })
}

#[cfg(test)]
mod tests {
    use crate::test_support::{client_for, fast_poll};
    use crate::upload::FileUpload;
    use crate::ClientError;
    use httpmock::prelude::*;
    use planqk_core::domain::service::{Lifecycle, Service};
    use planqk_core::dto::service::ServiceConfig;
    use serde_json::json;

    fn service_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "serviceDefinitions": [{ "id": format!("{}-v1", id) }]
        })
    }

    /// Mocks the three lifecycle listings, with `services` under ACCESSIBLE
    fn mock_listing(server: &MockServer, services: serde_json::Value) {
        for stage in ["CREATED", "PUBLISHED"] {
            server.mock(|when, then| {
                when.method(GET).path("/services").query_param("lifecycle", stage);
                then.status(200).json_body(json!([]));
            });
        }
        server.mock(|when, then| {
            when.method(GET)
                .path("/services")
                .query_param("lifecycle", "ACCESSIBLE");
            then.status(200).json_body(services);
        });
    }

    #[tokio::test]
    async fn test_get_services_without_filter_lists_all_stages() {
        let server = MockServer::start();
        let created = server.mock(|when, then| {
            when.method(GET)
                .path("/services")
                .query_param("lifecycle", "CREATED")
                .header("x-auth-token", "test-key");
            then.status(200).json_body(json!([service_json("a", "first")]));
        });
        let accessible = server.mock(|when, then| {
            when.method(GET)
                .path("/services")
                .query_param("lifecycle", "ACCESSIBLE");
            then.status(200).json_body(json!([service_json("b", "second")]));
        });
        let published = server.mock(|when, then| {
            when.method(GET)
                .path("/services")
                .query_param("lifecycle", "PUBLISHED");
            then.status(200).json_body(json!([]));
        });

        let client = client_for(&server);
        let services = client.get_services(None).await.unwrap();

        let names: Vec<_> = services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        created.assert();
        accessible.assert();
        published.assert();
    }

    #[tokio::test]
    async fn test_get_services_with_filter() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/services")
                .query_param("lifecycle", "PUBLISHED");
            then.status(200).json_body(json!([service_json("a", "pub")]));
        });

        let client = client_for(&server);
        let services = client.get_services(Some(Lifecycle::Published)).await.unwrap();

        assert_eq!(services.len(), 1);
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn test_get_services_rejects_unknown_lifecycle() {
        let server = MockServer::start();
        let listing = server.mock(|when, then| {
            when.method(GET).path("/services");
            then.status(200).json_body(json!([]));
        });

        let client = client_for(&server);
        let err = client
            .get_services(Some(Lifecycle::Unknown))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidRequest(_)));
        listing.assert_calls(0);
    }

    #[tokio::test]
    async fn test_resolve_version_reads_service_by_id() {
        let server = MockServer::start();
        let listing = server.mock(|when, then| {
            when.method(GET).path("/services");
            then.status(200).json_body(json!([service_json("svc-old", "solver")]));
        });
        let details = server.mock(|when, then| {
            when.method(GET).path("/services/svc-new");
            then.status(200).json_body(service_json("svc-new", "solver"));
        });

        let client = client_for(&server);
        let created: Service =
            serde_json::from_value(json!({ "id": "svc-new", "name": "solver" })).unwrap();
        let version = client.resolve_version(&created).await.unwrap();
        assert_eq!(version.id, "svc-new-v1");
        details.assert();

        let with_definition: Service =
            serde_json::from_value(service_json("svc-other", "solver")).unwrap();
        let version = client.resolve_version(&with_definition).await.unwrap();
        assert_eq!(version.id, "svc-other-v1");

        details.assert_calls(1);
        listing.assert_calls(0);
    }

    #[tokio::test]
    async fn test_get_service_by_name_fetches_details() {
        let server = MockServer::start();
        mock_listing(
            &server,
            json!([service_json("a", "other"), service_json("b", "wanted")]),
        );
        let details = server.mock(|when, then| {
            when.method(GET).path("/services/b");
            then.status(200).json_body(json!({
                "id": "b",
                "name": "wanted",
                "description": "full details",
                "serviceDefinitions": [{ "id": "b-v1", "gatewayEndpoint": "https://gw/wanted" }]
            }));
        });

        let client = client_for(&server);
        let service = client.get_service("wanted").await.unwrap().unwrap();

        assert_eq!(service.description.as_deref(), Some("full details"));
        details.assert();

        let version = client.get_version("wanted").await.unwrap();
        assert_eq!(version.gateway_endpoint.as_deref(), Some("https://gw/wanted"));
    }

    #[tokio::test]
    async fn test_get_service_missing_name() {
        let server = MockServer::start();
        mock_listing(&server, json!([service_json("a", "wanted-too")]));

        let client = client_for(&server);
        assert!(client.get_service("wanted").await.unwrap().is_none());

        let err = client.get_version("wanted").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_managed_service_sends_multipart() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/services")
                .header("x-auth-token", "test-key")
                .header_exists("content-type")
                .body_includes("userCode")
                .body_includes("my-service")
                .body_includes("memoryInMegabytes")
                .body_includes("template.zip")
                .body_includes("openapi-spec.yml");
            then.status(201).json_body(service_json("new", "my-service"));
        });

        let client = client_for(&server);
        let service = client
            .create_managed_service(
                ServiceConfig::new("my-service"),
                FileUpload::new("template.zip", b"zip".to_vec()),
                FileUpload::new("openapi-spec.yml", b"openapi: 3.0.0".to_vec()),
            )
            .await
            .unwrap();

        assert_eq!(service.id, "new");
        mock.assert();
    }

    #[tokio::test]
    async fn test_create_managed_service_rejects_invalid_config() {
        let server = MockServer::start();
        let client = client_for(&server);

        let err = client
            .create_managed_service(
                ServiceConfig::new(""),
                FileUpload::new("a.zip", Vec::new()),
                FileUpload::new("b.yml", Vec::new()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/services/x/service-definitions/y/status");
            then.status(401).body("invalid token");
        });

        let client = client_for(&server);
        let err = client.get_build_status("x", "y").await.unwrap_err();

        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid token");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_wait_for_service_build_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/services/svc/service-definitions/v1/status");
            then.status(200).json_body(json!({ "status": "SUCCESS" }));
        });

        let client = client_for(&server);
        let built = client
            .wait_for_service_to_be_created("svc", "v1", fast_poll())
            .await
            .unwrap();

        assert!(built);
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn test_wait_for_service_build_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/services/svc/service-definitions/v1/status");
            then.status(200).json_body(json!({ "status": "FAILED" }));
        });

        let client = client_for(&server);
        let built = client
            .wait_for_service_to_be_created("svc", "v1", fast_poll())
            .await
            .unwrap();

        assert!(!built);
    }

    #[tokio::test]
    async fn test_wait_for_service_build_timeout() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/services/svc/service-definitions/v1/status");
            then.status(200).json_body(json!({ "status": "RUNNING" }));
        });

        let client = client_for(&server);
        let err = client
            .wait_for_service_to_be_created("svc", "v1", fast_poll())
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(mock.calls() > 1);
    }

    #[tokio::test]
    async fn test_publish_and_remove_service() {
        let server = MockServer::start();
        mock_listing(&server, json!([service_json("svc", "demo")]));
        server.mock(|when, then| {
            when.method(GET).path("/services/svc");
            then.status(200).json_body(service_json("svc", "demo"));
        });
        let publish = server.mock(|when, then| {
            when.method(POST)
                .path("/services/svc/service-definitions/svc-v1/publish/internal");
            then.status(200);
        });
        let unpublish = server.mock(|when, then| {
            when.method(POST)
                .path("/services/svc/service-definitions/svc-v1/unpublish");
            then.status(200);
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/services/svc");
            then.status(204);
        });

        let client = client_for(&server);
        client.publish_service_internally("demo").await.unwrap();
        client.unpublish_service("demo").await.unwrap();
        assert!(client.remove_service("demo").await.unwrap());

        publish.assert();
        unpublish.assert();
        delete.assert();
    }
}
