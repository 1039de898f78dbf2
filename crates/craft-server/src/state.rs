//! Application state with a shared `CraftService` for concurrent access.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers. `CraftService` owns a `rusqlite::Connection`, which is
//! `!Sync`, so it sits behind a `Mutex` rather than an `RwLock`. Handlers
//! await the lock without blocking the tokio runtime.

use std::sync::Arc;

use crate::config::{ProviderConfig, ServerConfig};
use crate::error::ApiError;
use crate::generator::AssetGenerator;
use crate::service::CraftService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared craft service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<CraftService>>,
    /// Passthrough client for the asset generation provider.
    pub generator: Arc<AssetGenerator>,
}

impl AppState {
    /// Creates a new `AppState` backed by the configured SQLite database and
    /// provider.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let service = CraftService::new(&config.db_path)?;
        Self::with_service(service, &config.provider)
    }

    /// Creates a new `AppState` with an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        Self::in_memory_with_provider(&ProviderConfig::default())
    }

    /// In-memory database with a custom provider (for testing against a
    /// mock provider).
    pub fn in_memory_with_provider(provider: &ProviderConfig) -> Result<Self, ApiError> {
        Self::with_service(CraftService::in_memory()?, provider)
    }

    fn with_service(service: CraftService, provider: &ProviderConfig) -> Result<Self, ApiError> {
        let generator = AssetGenerator::new(provider)?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            generator: Arc::new(generator),
        })
    }
}
