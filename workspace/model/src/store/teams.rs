use crate::entities::{leaderboard_entry, team, team_member};
use crate::error::{Result, StoreError};
use crate::store::ensure_users_exist;
use common::{CreateTeamRequest, Pagination, TeamFilter, UpdateTeamRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, trace};
use validator::Validate;

/// Replaces the membership rows of a team with `member_ids`.
async fn replace_members<C>(db: &C, team_id: i32, member_ids: &BTreeSet<i32>) -> Result<()>
where
    C: ConnectionTrait,
{
    let removed = team_member::Entity::delete_many()
        .filter(team_member::Column::TeamId.eq(team_id))
        .exec(db)
        .await?;
    trace!("Removed {} memberships of team {}", removed.rows_affected, team_id);

    if member_ids.is_empty() {
        return Ok(());
    }

    let rows = member_ids.iter().map(|user_id| team_member::ActiveModel {
        team_id: Set(team_id),
        user_id: Set(*user_id),
    });
    team_member::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    debug!("Team {} now has {} members", team_id, member_ids.len());
    Ok(())
}

#[instrument(skip(db, request), fields(name = ?request.name))]
pub async fn create<C>(db: &C, request: CreateTeamRequest) -> Result<team::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    request.validate()?;

    let member_ids: BTreeSet<i32> = request.member_ids.unwrap_or_default().into_iter().collect();
    ensure_users_exist(db, &member_ids, "member_ids").await?;

    let name = request.name.unwrap_or_default();
    let txn = db.begin().await?;

    let created = team::ActiveModel {
        name: Set(name.clone()),
        description: Set(request.description),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| StoreError::from_write(err, || format!("Team '{}' already exists", name)))?;

    replace_members(&txn, created.id, &member_ids).await?;
    txn.commit().await?;

    info!("Team created with ID: {}", created.id);
    Ok(created)
}

pub async fn get<C>(db: &C, team_id: i32) -> Result<team::Model>
where
    C: ConnectionTrait,
{
    team::Entity::find_by_id(team_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "Team", id: team_id })
}

pub async fn list<C>(db: &C, filter: &TeamFilter, page: &Pagination) -> Result<Vec<team::Model>>
where
    C: ConnectionTrait,
{
    let mut query = team::Entity::find();
    if let Some(name) = &filter.name {
        query = query.filter(team::Column::Name.eq(name.as_str()));
    }

    let teams = query
        .order_by_asc(team::Column::Id)
        .paginate(db, page.limit())
        .fetch_page(page.page_index())
        .await?;
    debug!("Listed {} teams", teams.len());
    Ok(teams)
}

/// Applies the provided fields; `member_ids` replaces the membership set.
#[instrument(skip(db, request))]
pub async fn update<C>(db: &C, team_id: i32, request: UpdateTeamRequest) -> Result<team::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let existing = get(db, team_id).await?;
    request.validate()?;

    let member_ids: Option<BTreeSet<i32>> =
        request.member_ids.map(|ids| ids.into_iter().collect());
    if let Some(ids) = &member_ids {
        ensure_users_exist(db, ids, "member_ids").await?;
    }

    let name = request.name.clone().unwrap_or_else(|| existing.name.clone());
    let mut active: team::ActiveModel = existing.clone().into();
    if let Some(new_name) = request.name {
        active.name = Set(new_name);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }

    let txn = db.begin().await?;
    let updated = if active.is_changed() {
        active
            .update(&txn)
            .await
            .map_err(|err| {
                StoreError::from_write(err, || format!("Team '{}' already exists", name))
            })?
    } else {
        existing
    };
    if let Some(ids) = &member_ids {
        replace_members(&txn, team_id, ids).await?;
    }
    txn.commit().await?;

    info!("Team {} updated", team_id);
    Ok(updated)
}

/// Deletes a team, its memberships and the leaderboard entries attributed
/// to it. Member users are left alone.
#[instrument(skip(db))]
pub async fn delete<C>(db: &C, team_id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let entries = leaderboard_entry::Entity::delete_many()
        .filter(leaderboard_entry::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    let memberships = team_member::Entity::delete_many()
        .filter(team_member::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    let deleted = team::Entity::delete_by_id(team_id).exec(&txn).await?;

    txn.commit().await?;

    debug!(
        "Cascade for team {}: {} leaderboard entries, {} memberships",
        team_id, entries.rows_affected, memberships.rows_affected
    );
    Ok(deleted.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{team_member, user};
    use crate::store::testing::{setup_db, user_request};
    use crate::store::users;
    use sea_orm::ModelTrait;

    async fn member_names(db: &sea_orm::DatabaseConnection, team: &team::Model) -> Vec<String> {
        let mut names: Vec<String> = team
            .find_related(user::Entity)
            .all(db)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_create_with_members() {
        let db = setup_db().await;
        let tony = users::create(&db, user_request("IronMan")).await.unwrap();
        let peter = users::create(&db, user_request("SpiderMan")).await.unwrap();

        let team = create(
            &db,
            CreateTeamRequest {
                name: Some("Marvel".to_string()),
                description: None,
                member_ids: Some(vec![tony.id, peter.id, tony.id]),
            },
        )
        .await
        .unwrap();

        assert_eq!(team.name, "Marvel");
        assert_eq!(member_names(&db, &team).await, vec!["IronMan", "SpiderMan"]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_member_fails() {
        let db = setup_db().await;

        let err = create(
            &db,
            CreateTeamRequest {
                name: Some("DC".to_string()),
                description: None,
                member_ids: Some(vec![77]),
            },
        )
        .await
        .unwrap_err();

        match err {
            StoreError::Validation(fields) => {
                assert_eq!(
                    fields["member_ids"],
                    vec!["Invalid pk \"77\" - object does not exist."]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(list(&db, &TeamFilter::default(), &Pagination::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_integrity_error() {
        let db = setup_db().await;
        let request = CreateTeamRequest {
            name: Some("Marvel".to_string()),
            ..Default::default()
        };

        create(&db, request.clone()).await.unwrap();
        let err = create(&db, request).await.unwrap_err();
        assert!(matches!(err, StoreError::Integrity(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_members() {
        let db = setup_db().await;
        let bruce = users::create(&db, user_request("Batman")).await.unwrap();
        let clark = users::create(&db, user_request("Superman")).await.unwrap();
        let team = create(
            &db,
            CreateTeamRequest {
                name: Some("DC".to_string()),
                description: None,
                member_ids: Some(vec![bruce.id]),
            },
        )
        .await
        .unwrap();

        let updated = update(
            &db,
            team.id,
            UpdateTeamRequest {
                description: Some(Some("Justice League".to_string())),
                member_ids: Some(vec![clark.id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.description.as_deref(), Some("Justice League"));
        assert_eq!(member_names(&db, &updated).await, vec!["Superman"]);
    }

    #[tokio::test]
    async fn test_delete_keeps_users() {
        let db = setup_db().await;
        let bruce = users::create(&db, user_request("Batman")).await.unwrap();
        let team = create(
            &db,
            CreateTeamRequest {
                name: Some("DC".to_string()),
                description: None,
                member_ids: Some(vec![bruce.id]),
            },
        )
        .await
        .unwrap();

        assert!(delete(&db, team.id).await.unwrap());
        assert!(!delete(&db, team.id).await.unwrap());

        assert!(users::get(&db, bruce.id).await.is_ok());
        let memberships = team_member::Entity::find().all(&db).await.unwrap();
        assert!(memberships.is_empty());
    }
}
