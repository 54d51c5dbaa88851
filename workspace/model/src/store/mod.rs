//! Persistence contract for every entity: create, read, update, delete and
//! list. Writes validate their input first; multi-row writes (membership
//! sets, cascades) run inside a single transaction.
//!
//! Deletes are idempotent here: they report whether a row was removed and
//! leave it to the caller to decide whether "nothing removed" is an error.

pub mod activities;
pub mod leaderboard;
pub mod teams;
pub mod users;
pub mod workouts;

use crate::entities::user;
use crate::error::{Result, StoreError};
use common::invalid_pk_message;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Checks that every id refers to an existing user, reporting the first
/// missing one against `field`.
pub(crate) async fn ensure_users_exist<C>(db: &C, ids: &BTreeSet<i32>, field: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(());
    }

    let found: BTreeSet<i32> = user::Entity::find()
        .select_only()
        .column(user::Column::Id)
        .filter(user::Column::Id.is_in(ids.iter().copied()))
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    debug!("Resolved {} of {} user ids for {}", found.len(), ids.len(), field);

    match ids.difference(&found).next() {
        Some(missing) => {
            warn!("{} references missing user {}", field, missing);
            Err(StoreError::field(field, invalid_pk_message(*missing)))
        }
        None => Ok(()),
    }
}

/// Looks up a single user for a foreign key field.
pub(crate) async fn ensure_user_exists<C>(db: &C, id: i32, field: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    ensure_users_exist(db, &BTreeSet::from([id]), field).await
}

#[cfg(test)]
pub(crate) mod testing {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    /// In-memory SQLite database with every migration applied.
    pub async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        db
    }

    pub fn user_request(username: &str) -> common::CreateUserRequest {
        common::CreateUserRequest {
            username: Some(username.to_string()),
            email: Some(format!("{}@example.com", username.to_lowercase())),
            password: Some("password".to_string()),
            bio: None,
            avatar: None,
        }
    }
}
