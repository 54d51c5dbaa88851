//! Conversion from stored rows to their public representations.
//!
//! Related records are loaded in batches: one query per relation for a
//! whole page of rows, never one per row.

use crate::entities::{
    activity, leaderboard_entry, team, team_member, user, workout, workout_suggestion,
};
use crate::error::{Result, StoreError};
use common::{ActivityDto, LeaderboardEntryDto, TeamDto, UserDto, WorkoutDto};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use std::collections::{BTreeSet, HashMap};
use tracing::{error, trace};

impl From<user::Model> for UserDto {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            bio: model.bio,
            avatar: model.avatar,
        }
    }
}

async fn users_by_id<C>(db: &C, ids: BTreeSet<i32>) -> Result<HashMap<i32, UserDto>>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    trace!("Loaded {} related users", users.len());
    Ok(users.into_iter().map(|u| (u.id, UserDto::from(u))).collect())
}

fn dangling(entity: &str, id: i32, target: &str, target_id: i32) -> StoreError {
    error!("{} {} references missing {} {}", entity, id, target, target_id);
    StoreError::Integrity(format!(
        "{} {} references missing {} {}",
        entity, id, target, target_id
    ))
}

/// Groups `(owner, user)` pairs into user lists ordered by user id.
fn group_users(
    pairs: Vec<(i32, i32)>,
    users: &HashMap<i32, UserDto>,
    owner: &str,
) -> Result<HashMap<i32, Vec<UserDto>>> {
    let mut grouped: HashMap<i32, Vec<UserDto>> = HashMap::new();
    for (owner_id, user_id) in pairs {
        let user = users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| dangling(owner, owner_id, "User", user_id))?;
        grouped.entry(owner_id).or_default().push(user);
    }
    for members in grouped.values_mut() {
        members.sort_by_key(|user| user.id);
    }
    Ok(grouped)
}

pub async fn teams<C>(db: &C, models: Vec<team::Model>) -> Result<Vec<TeamDto>>
where
    C: ConnectionTrait,
{
    let team_ids: Vec<i32> = models.iter().map(|t| t.id).collect();
    let pairs: Vec<(i32, i32)> = if team_ids.is_empty() {
        Vec::new()
    } else {
        team_member::Entity::find()
            .filter(team_member::Column::TeamId.is_in(team_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.team_id, m.user_id))
            .collect()
    };

    let users = users_by_id(db, pairs.iter().map(|(_, user_id)| *user_id).collect()).await?;
    let mut members = group_users(pairs, &users, "Team")?;

    Ok(models
        .into_iter()
        .map(|t| TeamDto {
            members: members.remove(&t.id).unwrap_or_default(),
            id: t.id,
            name: t.name,
            description: t.description,
        })
        .collect())
}

pub async fn team<C>(db: &C, model: team::Model) -> Result<TeamDto>
where
    C: ConnectionTrait,
{
    single(teams(db, vec![model]).await?)
}

pub async fn workouts<C>(db: &C, models: Vec<workout::Model>) -> Result<Vec<WorkoutDto>>
where
    C: ConnectionTrait,
{
    let workout_ids: Vec<i32> = models.iter().map(|w| w.id).collect();
    let pairs: Vec<(i32, i32)> = if workout_ids.is_empty() {
        Vec::new()
    } else {
        workout_suggestion::Entity::find()
            .filter(workout_suggestion::Column::WorkoutId.is_in(workout_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.workout_id, s.user_id))
            .collect()
    };

    let users = users_by_id(db, pairs.iter().map(|(_, user_id)| *user_id).collect()).await?;
    let mut suggested = group_users(pairs, &users, "Workout")?;

    Ok(models
        .into_iter()
        .map(|w| WorkoutDto {
            suggested_for: suggested.remove(&w.id).unwrap_or_default(),
            id: w.id,
            name: w.name,
            description: w.description,
        })
        .collect())
}

pub async fn workout<C>(db: &C, model: workout::Model) -> Result<WorkoutDto>
where
    C: ConnectionTrait,
{
    single(workouts(db, vec![model]).await?)
}

pub async fn activities<C>(db: &C, models: Vec<activity::Model>) -> Result<Vec<ActivityDto>>
where
    C: ConnectionTrait,
{
    let users = users_by_id(db, models.iter().map(|a| a.user_id).collect()).await?;

    models
        .into_iter()
        .map(|a| {
            let user = users
                .get(&a.user_id)
                .cloned()
                .ok_or_else(|| dangling("Activity", a.id, "User", a.user_id))?;
            Ok(ActivityDto {
                id: a.id,
                user,
                activity_type: a.activity_type,
                duration: a.duration,
                date: a.date,
                calories_burned: a.calories_burned,
            })
        })
        .collect()
}

pub async fn activity<C>(db: &C, model: activity::Model) -> Result<ActivityDto>
where
    C: ConnectionTrait,
{
    single(activities(db, vec![model]).await?)
}

/// Each entry carries its user and, when attributed, its full team.
pub async fn leaderboard_entries<C>(
    db: &C,
    models: Vec<leaderboard_entry::Model>,
) -> Result<Vec<LeaderboardEntryDto>>
where
    C: ConnectionTrait,
{
    let users = users_by_id(db, models.iter().map(|e| e.user_id).collect()).await?;

    let team_ids: BTreeSet<i32> = models.iter().filter_map(|e| e.team_id).collect();
    let team_models = if team_ids.is_empty() {
        Vec::new()
    } else {
        team::Entity::find()
            .filter(team::Column::Id.is_in(team_ids))
            .all(db)
            .await?
    };
    let team_dtos: HashMap<i32, TeamDto> = teams(db, team_models)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    models
        .into_iter()
        .map(|e| {
            let user = users
                .get(&e.user_id)
                .cloned()
                .ok_or_else(|| dangling("LeaderboardEntry", e.id, "User", e.user_id))?;
            let team = match e.team_id {
                Some(team_id) => Some(
                    team_dtos
                        .get(&team_id)
                        .cloned()
                        .ok_or_else(|| dangling("LeaderboardEntry", e.id, "Team", team_id))?,
                ),
                None => None,
            };
            Ok(LeaderboardEntryDto { id: e.id, user, score: e.score, team })
        })
        .collect()
}

pub async fn leaderboard_entry<C>(
    db: &C,
    model: leaderboard_entry::Model,
) -> Result<LeaderboardEntryDto>
where
    C: ConnectionTrait,
{
    single(leaderboard_entries(db, vec![model]).await?)
}

fn single<T>(items: Vec<T>) -> Result<T> {
    items
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Integrity("Converted record disappeared".to_string()))
}
