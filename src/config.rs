use anyhow::Result;
use model::schema::SchemaRegistry;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tracing::{debug, info};

use crate::admin::{AdminSite, DEFAULT_ADMINS};
use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://octofit.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Connect to the database at `database_url`.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;
    debug!("Database connection established");
    Ok(db)
}

/// Build application state around an open connection.
///
/// The schema registry is created here, once, and the admin site is
/// validated against it. A bad admin configuration fails startup.
pub fn build_app_state(db: DatabaseConnection) -> Result<AppState> {
    let schema = Arc::new(SchemaRegistry::new());
    let admin = AdminSite::new(&schema, DEFAULT_ADMINS)?;
    debug!("Admin site registered {} list views", admin.len());

    Ok(AppState { db, schema, admin: Arc::new(admin) })
}
