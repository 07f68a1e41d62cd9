//! ServerBuilder for fluent API to build the dashboard HTTP server

use super::handlers::{CollectionState, health};
use super::router::build_collection_routes;
use crate::config::WorkflowConfig;
use crate::core::error::{CareError, ConfigError};
use crate::core::events::EventBus;
use crate::core::record::Record;
use crate::core::service::RecordPersister;
use crate::core::store::CollectionStore;
use crate::core::transition::Workflow;
use anyhow::Result;
use axum::{Router, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for creating the HTTP server with one route set per collection
///
/// Configuration and the event bus are captured when a collection is
/// registered, so call [`with_config`](Self::with_config) and
/// [`with_event_bus`](Self::with_event_bus) first.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(config)
///     .with_event_bus(1024)
///     .register_collection(seed.orders)?
///     .register_collection(seed.patients)?
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: WorkflowConfig,
    event_bus: Option<EventBus>,
    resources: Vec<&'static str>,
    routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: WorkflowConfig::default(),
            event_bus: None,
            resources: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Use `config` for page sizes and transition table overrides
    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable the event bus for status change and delete notifications
    ///
    /// # Arguments
    ///
    /// * `capacity` - Buffer size for the broadcast channel (recommended: 1024)
    pub fn with_event_bus(mut self, capacity: usize) -> Self {
        self.event_bus = Some(EventBus::new(capacity));
        self
    }

    /// The event bus, if enabled; subscribe to it before serving
    pub fn event_bus(&self) -> Option<&EventBus> {
        self.event_bus.as_ref()
    }

    /// Resources registered so far, in registration order
    pub fn resources(&self) -> &[&'static str] {
        &self.resources
    }

    /// Register a collection seeded with `records`
    pub fn register_collection<R>(self, records: impl IntoIterator<Item = R>) -> Result<Self, CareError>
    where
        R: Workflow + Serialize,
    {
        self.register(records, None)
    }

    /// Register a collection whose status changes go through `persister`
    pub fn register_collection_with_persister<R>(
        self,
        records: impl IntoIterator<Item = R>,
        persister: impl RecordPersister<R> + 'static,
    ) -> Result<Self, CareError>
    where
        R: Workflow + Serialize,
    {
        self.register(records, Some(Arc::new(persister)))
    }

    fn register<R>(
        mut self,
        records: impl IntoIterator<Item = R>,
        persister: Option<Arc<dyn RecordPersister<R>>>,
    ) -> Result<Self, CareError>
    where
        R: Workflow + Serialize,
    {
        let resource = R::resource_name();
        if self.resources.contains(&resource) {
            return Err(ConfigError::Invalid(format!("collection '{resource}' registered twice")).into());
        }

        let store = CollectionStore::from_records(records)?;
        let transitions = self.config.transitions_for::<R>()?;

        tracing::info!(
            resource,
            records = store.len(),
            persisted = persister.is_some(),
            "registered collection"
        );

        let state = CollectionState {
            store: Arc::new(RwLock::new(store)),
            transitions: Arc::new(transitions),
            persister,
            event_bus: self.event_bus.clone(),
            page_size: self.config.page_size_for(resource),
            max_page_size: self.config.pagination.max_page_size,
        };

        self.routes.push(build_collection_routes(state));
        self.resources.push(resource);
        Ok(self)
    }

    /// Build the final router
    ///
    /// Fails when the configuration names a collection that was never
    /// registered, which usually means a misspelt resource.
    pub fn build(self) -> Result<Router, CareError> {
        self.config.check_resources(&self.resources)?;

        let mut app = Router::new().route("/health", get(health));
        for routes in self.routes {
            app = app.merge(routes);
        }

        Ok(app
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let resources = self.resources.join(", ");
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(%resources, "Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
