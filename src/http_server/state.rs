use std::sync::Arc;

use crate::database::Database;

/// Shared by every request handler. Built once at startup.
pub struct AppState {
    pub db: Arc<Database>,
}
