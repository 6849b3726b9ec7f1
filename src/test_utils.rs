use std::sync::Arc;

use sea_orm::ConnectOptions;

use crate::database::Database;

/// A migrated in-memory database. A single pooled connection keeps every
/// query on the same in-memory schema.
pub async fn test_db() -> Arc<Database> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    Arc::new(Database::connect(opt).await.unwrap())
}
