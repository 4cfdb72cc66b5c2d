use std::sync::Arc;

use figtree_core::access::AccessPolicy;

use crate::config::ServerConfig;
use crate::mail::Mailer;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or already reference counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: figtree_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Built once from `config.access`; consulted by every access check.
    pub access: Arc<AccessPolicy>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: figtree_db::DbPool, config: ServerConfig, mailer: Arc<dyn Mailer>) -> Self {
        let access = Arc::new(AccessPolicy::new(config.access.clone()));
        Self {
            pool,
            config: Arc::new(config),
            access,
            mailer,
        }
    }
}
