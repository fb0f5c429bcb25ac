use std::sync::Arc;

use crate::db::DbPool;
use crate::storage::ImageStore;

/// Everything a request handler needs, constructed once in `main` and
/// passed in explicitly rather than living in process globals.
pub struct AppContext {
    pub pool: DbPool,
    pub images: ImageStore,
}

/// Application state shared across all handlers
pub type AppState = Arc<AppContext>;
