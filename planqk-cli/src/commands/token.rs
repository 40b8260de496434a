//! Gateway token command

use anyhow::{Result, anyhow};
use planqk_client::PlanqkClient;

/// Request an access token with the credentials of an application and print it
pub async fn print_access_token(client: &PlanqkClient, application_name: &str) -> Result<()> {
    let application = client
        .get_application(application_name)
        .await?
        .ok_or_else(|| anyhow!("No application named '{}'", application_name))?;

    let (Some(key), Some(secret)) = (&application.client_id, &application.client_secret) else {
        return Err(anyhow!(
            "Application '{}' has no consumer key and secret",
            application_name
        ));
    };

    let token = client.get_access_token(key, secret).await?;
    println!("{}", token);
    Ok(())
}
