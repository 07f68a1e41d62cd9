//! Dashboard API server
//!
//! Environment:
//! - `CAREPANEL_CONFIG` - YAML workflow configuration (optional)
//! - `CAREPANEL_SEED`   - JSON seed data for the collections (optional)
//! - `CAREPANEL_ADDR`   - listen address, default `127.0.0.1:3000`
//! - `RUST_LOG`         - tracing filter, default `carepanel=info,tower_http=info`

use anyhow::{Context, Result};
use carepanel::config::WorkflowConfig;
use carepanel::records::SeedData;
use carepanel::server::ServerBuilder;
use std::env;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("carepanel=info,tower_http=info")),
        )
        .init();

    let config = match env::var("CAREPANEL_CONFIG") {
        Ok(path) => WorkflowConfig::from_yaml_file(&path)
            .with_context(|| format!("loading configuration from {path}"))?,
        Err(_) => WorkflowConfig::default(),
    };

    let seed = match env::var("CAREPANEL_SEED") {
        Ok(path) => SeedData::from_json_file(&path)?,
        Err(_) => {
            tracing::warn!("CAREPANEL_SEED not set, starting with empty collections");
            SeedData::default()
        }
    };

    let addr = env::var("CAREPANEL_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let builder = ServerBuilder::new()
        .with_config(config)
        .with_event_bus(1024)
        .register_collection(seed.orders)?
        .register_collection(seed.products)?
        .register_collection(seed.subscriptions)?
        .register_collection(seed.subscription_plans)?
        .register_collection(seed.intakes)?
        .register_collection(seed.patients)?;

    if let Some(bus) = builder.event_bus() {
        let mut events = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(envelope) => tracing::info!(
                        event_id = %envelope.id,
                        resource = envelope.event.resource(),
                        id = envelope.event.record_id(),
                        action = envelope.event.action(),
                        "record event"
                    ),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event log fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    builder.serve(&addr).await
}
