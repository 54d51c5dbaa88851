use crate::entities::{leaderboard_entry, team};
use crate::error::{Result, StoreError};
use crate::store::ensure_user_exists;
use common::{
    CreateLeaderboardEntryRequest, LeaderboardFilter, Pagination, UpdateLeaderboardEntryRequest,
    invalid_pk_message,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

async fn ensure_team_exists<C>(db: &C, team_id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    if team::Entity::find_by_id(team_id).one(db).await?.is_none() {
        warn!("team_id references missing team {}", team_id);
        return Err(StoreError::field("team_id", invalid_pk_message(team_id)));
    }
    Ok(())
}

#[instrument(skip(db, request), fields(user_id = ?request.user_id))]
pub async fn create<C>(
    db: &C,
    request: CreateLeaderboardEntryRequest,
) -> Result<leaderboard_entry::Model>
where
    C: ConnectionTrait,
{
    request.validate()?;

    let user_id = request.user_id.unwrap_or_default();
    ensure_user_exists(db, user_id, "user_id").await?;
    if let Some(team_id) = request.team_id {
        ensure_team_exists(db, team_id).await?;
    }

    let created = leaderboard_entry::ActiveModel {
        user_id: Set(user_id),
        score: Set(request.score.unwrap_or(0)),
        team_id: Set(request.team_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Leaderboard entry created with ID: {} (score {})", created.id, created.score);
    Ok(created)
}

pub async fn get<C>(db: &C, entry_id: i32) -> Result<leaderboard_entry::Model>
where
    C: ConnectionTrait,
{
    leaderboard_entry::Entity::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "LeaderboardEntry", id: entry_id })
}

/// Entries by descending score. Ties keep insertion order.
pub async fn list<C>(
    db: &C,
    filter: &LeaderboardFilter,
    page: &Pagination,
) -> Result<Vec<leaderboard_entry::Model>>
where
    C: ConnectionTrait,
{
    let mut query = leaderboard_entry::Entity::find();
    if let Some(user_id) = filter.user_id {
        query = query.filter(leaderboard_entry::Column::UserId.eq(user_id));
    }
    if let Some(team_id) = filter.team_id {
        query = query.filter(leaderboard_entry::Column::TeamId.eq(team_id));
    }

    let entries = query
        .order_by_desc(leaderboard_entry::Column::Score)
        .order_by_asc(leaderboard_entry::Column::Id)
        .paginate(db, page.limit())
        .fetch_page(page.page_index())
        .await?;
    debug!("Listed {} leaderboard entries", entries.len());
    Ok(entries)
}

/// Applies the provided fields. `team_id: Some(None)` detaches the entry
/// from its team.
#[instrument(skip(db, request))]
pub async fn update<C>(
    db: &C,
    entry_id: i32,
    request: UpdateLeaderboardEntryRequest,
) -> Result<leaderboard_entry::Model>
where
    C: ConnectionTrait,
{
    let existing = get(db, entry_id).await?;
    request.validate()?;

    let mut active: leaderboard_entry::ActiveModel = existing.clone().into();
    if let Some(user_id) = request.user_id {
        ensure_user_exists(db, user_id, "user_id").await?;
        active.user_id = Set(user_id);
    }
    if let Some(score) = request.score {
        active.score = Set(score);
    }
    if let Some(team_id) = request.team_id {
        if let Some(id) = team_id {
            ensure_team_exists(db, id).await?;
        }
        active.team_id = Set(team_id);
    }

    if !active.is_changed() {
        debug!("No fields to update for leaderboard entry ID: {}", entry_id);
        return Ok(existing);
    }

    let updated = active.update(db).await?;
    info!("Leaderboard entry {} updated", entry_id);
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete<C>(db: &C, entry_id: i32) -> Result<bool>
where
    C: ConnectionTrait,
{
    let deleted = leaderboard_entry::Entity::delete_by_id(entry_id).exec(db).await?;
    Ok(deleted.rows_affected > 0)
}
