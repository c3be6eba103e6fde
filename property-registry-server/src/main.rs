use anyhow::Context;
use property_registry_server::api::setup_and_serve;
use property_registry_server::config::Config;
use property_registry_server::context::ApiContext;
use property_registry_server::{build_store, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env().context("expected to be able to generate config")?;
    logging::init(config.environment)?;
    tracing::trace!("initialized config {:?}", config);

    let store = build_store(&config).await?;
    let ctx = ApiContext::new(store, config);

    setup_and_serve(ctx).await
}
