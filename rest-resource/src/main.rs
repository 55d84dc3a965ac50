//! `foo-api`: serves the `foo` resource on the configured port

use anyhow::Context;
use rest_resource::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config).context("failed to initialise tracing")?;

    tracing::info!(
        service = %config.service.name,
        environment = %config.service.environment,
        "Starting foo-api"
    );

    let handler = FooHandler::new(config.auth.secret.clone());

    RestApi::new(config)
        .register_resource_handler(handler)?
        .serve()
        .await?;

    Ok(())
}
