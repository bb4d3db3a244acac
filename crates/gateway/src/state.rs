//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::GatewayConfig;
use crate::services::{CatalogService, UserService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Collaborators sit behind trait
/// objects so tests can swap in in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GatewayConfig,
    catalog: Arc<dyn CatalogService>,
    users: Arc<dyn UserService>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Gateway configuration
    /// * `catalog` - Product catalog collaborator
    /// * `users` - Account and session collaborator
    /// * `pool` - Database pool probed by the readiness check, if any
    #[must_use]
    pub fn new(
        config: GatewayConfig,
        catalog: Arc<dyn CatalogService>,
        users: Arc<dyn UserService>,
        pool: Option<PgPool>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                users,
                pool,
            }),
        }
    }

    /// Get a reference to the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Get the catalog collaborator.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogService {
        self.inner.catalog.as_ref()
    }

    /// Get the user collaborator.
    #[must_use]
    pub fn users(&self) -> &dyn UserService {
        self.inner.users.as_ref()
    }

    /// Get the database pool, if the state was built with one.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
