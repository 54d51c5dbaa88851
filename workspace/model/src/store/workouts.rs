use crate::entities::{workout, workout_suggestion};
use crate::error::{Result, StoreError};
use crate::store::ensure_users_exist;
use common::{CreateWorkoutRequest, Pagination, UpdateWorkoutRequest, WorkoutFilter};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, trace};
use validator::Validate;

async fn replace_suggestions<C>(db: &C, workout_id: i32, user_ids: &BTreeSet<i32>) -> Result<()>
where
    C: ConnectionTrait,
{
    let removed = workout_suggestion::Entity::delete_many()
        .filter(workout_suggestion::Column::WorkoutId.eq(workout_id))
        .exec(db)
        .await?;
    trace!("Removed {} suggestions of workout {}", removed.rows_affected, workout_id);

    if user_ids.is_empty() {
        return Ok(());
    }

    let rows = user_ids.iter().map(|user_id| workout_suggestion::ActiveModel {
        workout_id: Set(workout_id),
        user_id: Set(*user_id),
    });
    workout_suggestion::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

#[instrument(skip(db, request), fields(name = ?request.name))]
pub async fn create<C>(db: &C, request: CreateWorkoutRequest) -> Result<workout::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    request.validate()?;

    let suggested_for: BTreeSet<i32> =
        request.suggested_for_ids.unwrap_or_default().into_iter().collect();
    ensure_users_exist(db, &suggested_for, "suggested_for_ids").await?;

    let txn = db.begin().await?;
    let created = workout::ActiveModel {
        name: Set(request.name.unwrap_or_default()),
        description: Set(request.description),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    replace_suggestions(&txn, created.id, &suggested_for).await?;
    txn.commit().await?;

    info!(
        "Workout created with ID: {} (suggested for {} users)",
        created.id,
        suggested_for.len()
    );
    Ok(created)
}

pub async fn get<C>(db: &C, workout_id: i32) -> Result<workout::Model>
where
    C: ConnectionTrait,
{
    workout::Entity::find_by_id(workout_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "Workout", id: workout_id })
}

pub async fn list<C>(
    db: &C,
    filter: &WorkoutFilter,
    page: &Pagination,
) -> Result<Vec<workout::Model>>
where
    C: ConnectionTrait,
{
    let mut query = workout::Entity::find();
    if let Some(user_id) = filter.suggested_for {
        query = query
            .join(JoinType::InnerJoin, workout::Relation::WorkoutSuggestion.def())
            .filter(workout_suggestion::Column::UserId.eq(user_id));
    }

    let workouts = query
        .order_by_asc(workout::Column::Id)
        .paginate(db, page.limit())
        .fetch_page(page.page_index())
        .await?;
    debug!("Listed {} workouts", workouts.len());
    Ok(workouts)
}

/// Applies the provided fields; `suggested_for_ids` replaces the whole set.
#[instrument(skip(db, request))]
pub async fn update<C>(
    db: &C,
    workout_id: i32,
    request: UpdateWorkoutRequest,
) -> Result<workout::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let existing = get(db, workout_id).await?;
    request.validate()?;

    let suggested_for: Option<BTreeSet<i32>> =
        request.suggested_for_ids.map(|ids| ids.into_iter().collect());
    if let Some(ids) = &suggested_for {
        ensure_users_exist(db, ids, "suggested_for_ids").await?;
    }

    let mut active: workout::ActiveModel = existing.clone().into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }

    let txn = db.begin().await?;
    let updated = if active.is_changed() {
        active.update(&txn).await?
    } else {
        existing
    };
    if let Some(ids) = &suggested_for {
        replace_suggestions(&txn, workout_id, ids).await?;
    }
    txn.commit().await?;

    info!("Workout {} updated", workout_id);
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete<C>(db: &C, workout_id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    workout_suggestion::Entity::delete_many()
        .filter(workout_suggestion::Column::WorkoutId.eq(workout_id))
        .exec(&txn)
        .await?;
    let deleted = workout::Entity::delete_by_id(workout_id).exec(&txn).await?;
    txn.commit().await?;

    Ok(deleted.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{setup_db, user_request};
    use crate::store::users;

    fn pushups(suggested_for_ids: Vec<i32>) -> CreateWorkoutRequest {
        CreateWorkoutRequest {
            name: Some("Pushups".to_string()),
            description: Some("20 pushups".to_string()),
            suggested_for_ids: Some(suggested_for_ids),
        }
    }

    #[tokio::test]
    async fn test_list_by_suggested_user() {
        let db = setup_db().await;
        let tony = users::create(&db, user_request("IronMan")).await.unwrap();
        let peter = users::create(&db, user_request("SpiderMan")).await.unwrap();

        let both = create(&db, pushups(vec![tony.id, peter.id])).await.unwrap();
        let mut squats = pushups(vec![peter.id]);
        squats.name = Some("Squats".to_string());
        create(&db, squats).await.unwrap();
        let mut plank = pushups(vec![]);
        plank.name = Some("Plank".to_string());
        create(&db, plank).await.unwrap();

        let all = list(&db, &WorkoutFilter::default(), &Pagination::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let for_tony = WorkoutFilter { suggested_for: Some(tony.id) };
        let found = list(&db, &for_tony, &Pagination::default()).await.unwrap();
        assert_eq!(found, vec![both]);

        let for_peter = WorkoutFilter { suggested_for: Some(peter.id) };
        assert_eq!(list(&db, &for_peter, &Pagination::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_suggested_user_fails() {
        let db = setup_db().await;

        let err = create(&db, pushups(vec![5])).await.unwrap_err();
        assert!(
            matches!(err, StoreError::Validation(ref fields) if fields.contains_key("suggested_for_ids"))
        );
    }

    #[tokio::test]
    async fn test_update_clears_suggestions() {
        let db = setup_db().await;
        let bruce = users::create(&db, user_request("Batman")).await.unwrap();
        let created = create(&db, pushups(vec![bruce.id])).await.unwrap();

        update(
            &db,
            created.id,
            UpdateWorkoutRequest { suggested_for_ids: Some(vec![]), ..Default::default() },
        )
        .await
        .unwrap();

        let filter = WorkoutFilter { suggested_for: Some(bruce.id) };
        assert!(list(&db, &filter, &Pagination::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_delete_drops_suggestion_only() {
        let db = setup_db().await;
        let bruce = users::create(&db, user_request("Batman")).await.unwrap();
        let created = create(&db, pushups(vec![bruce.id])).await.unwrap();

        users::delete(&db, bruce.id).await.unwrap();

        assert_eq!(get(&db, created.id).await.unwrap(), created);
        assert!(delete(&db, created.id).await.unwrap());
    }
}
