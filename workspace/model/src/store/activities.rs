use crate::entities::activity;
use crate::error::{Result, StoreError};
use crate::store::ensure_user_exists;
use chrono::Utc;
use common::{ActivityFilter, CreateActivityRequest, Pagination, UpdateActivityRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, info, instrument};
use validator::Validate;

/// Records an activity. The date is stamped with the current time.
#[instrument(skip(db, request), fields(user_id = ?request.user_id))]
pub async fn create<C>(db: &C, request: CreateActivityRequest) -> Result<activity::Model>
where
    C: ConnectionTrait,
{
    request.validate()?;

    let user_id = request.user_id.unwrap_or_default();
    ensure_user_exists(db, user_id, "user_id").await?;

    let created = activity::ActiveModel {
        user_id: Set(user_id),
        activity_type: Set(request.activity_type.unwrap_or_default()),
        duration: Set(request.duration.unwrap_or_default()),
        date: Set(Utc::now()),
        calories_burned: Set(request.calories_burned.unwrap_or(0)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Activity created with ID: {}", created.id);
    Ok(created)
}

pub async fn get<C>(db: &C, activity_id: i32) -> Result<activity::Model>
where
    C: ConnectionTrait,
{
    activity::Entity::find_by_id(activity_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "Activity", id: activity_id })
}

pub async fn list<C>(
    db: &C,
    filter: &ActivityFilter,
    page: &Pagination,
) -> Result<Vec<activity::Model>>
where
    C: ConnectionTrait,
{
    let mut query = activity::Entity::find();
    if let Some(user_id) = filter.user_id {
        query = query.filter(activity::Column::UserId.eq(user_id));
    }
    if let Some(activity_type) = &filter.activity_type {
        query = query.filter(activity::Column::ActivityType.eq(activity_type.as_str()));
    }

    let activities = query
        .order_by_asc(activity::Column::Id)
        .paginate(db, page.limit())
        .fetch_page(page.page_index())
        .await?;
    debug!("Listed {} activities", activities.len());
    Ok(activities)
}

/// Applies the provided fields. The recorded date never changes.
#[instrument(skip(db, request))]
pub async fn update<C>(
    db: &C,
    activity_id: i32,
    request: UpdateActivityRequest,
) -> Result<activity::Model>
where
    C: ConnectionTrait,
{
    let existing = get(db, activity_id).await?;
    request.validate()?;

    let mut active: activity::ActiveModel = existing.clone().into();
    if let Some(user_id) = request.user_id {
        ensure_user_exists(db, user_id, "user_id").await?;
        active.user_id = Set(user_id);
    }
    if let Some(activity_type) = request.activity_type {
        active.activity_type = Set(activity_type);
    }
    if let Some(duration) = request.duration {
        active.duration = Set(duration);
    }
    if let Some(calories_burned) = request.calories_burned {
        active.calories_burned = Set(calories_burned);
    }

    if !active.is_changed() {
        debug!("No fields to update for activity ID: {}", activity_id);
        return Ok(existing);
    }

    let updated = active.update(db).await?;
    info!("Activity {} updated", activity_id);
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete<C>(db: &C, activity_id: i32) -> Result<bool>
where
    C: ConnectionTrait,
{
    let deleted = activity::Entity::delete_by_id(activity_id).exec(db).await?;
    Ok(deleted.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{setup_db, user_request};
    use crate::store::users;

    fn running(user_id: i32) -> CreateActivityRequest {
        CreateActivityRequest {
            user_id: Some(user_id),
            activity_type: Some("Running".to_string()),
            duration: Some(30),
            calories_burned: None,
        }
    }

    #[tokio::test]
    async fn test_create_stamps_date_and_defaults_calories() {
        let db = setup_db().await;
        let user = users::create(&db, user_request("IronMan")).await.unwrap();
        let before = Utc::now();

        let created = create(&db, running(user.id)).await.unwrap();

        assert_eq!(created.user_id, user.id);
        assert_eq!(created.duration, 30);
        assert_eq!(created.calories_burned, 0);
        assert!(created.date >= before - chrono::Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_create_for_unknown_user_fails() {
        let db = setup_db().await;

        match create(&db, running(999)).await {
            Err(StoreError::Validation(fields)) => {
                assert!(fields.contains_key("user_id"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_negative_duration_is_rejected() {
        let db = setup_db().await;
        let user = users::create(&db, user_request("SpiderMan")).await.unwrap();
        let mut request = running(user.id);
        request.duration = Some(-5);

        let err = create(&db, request).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ref fields) if fields.contains_key("duration")
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_date() {
        let db = setup_db().await;
        let user = users::create(&db, user_request("Batman")).await.unwrap();
        let created = create(&db, running(user.id)).await.unwrap();

        let updated = update(
            &db,
            created.id,
            UpdateActivityRequest {
                duration: Some(45),
                calories_burned: Some(500),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.duration, 45);
        assert_eq!(updated.calories_burned, 500);
        assert_eq!(updated.date, created.date);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = setup_db().await;
        let bruce = users::create(&db, user_request("Batman")).await.unwrap();
        let clark = users::create(&db, user_request("Superman")).await.unwrap();
        create(&db, running(bruce.id)).await.unwrap();
        create(&db, running(clark.id)).await.unwrap();
        let mut swim = running(clark.id);
        swim.activity_type = Some("Swimming".to_string());
        create(&db, swim).await.unwrap();

        let by_user = ActivityFilter { user_id: Some(clark.id), activity_type: None };
        assert_eq!(list(&db, &by_user, &Pagination::default()).await.unwrap().len(), 2);

        let by_type = ActivityFilter { user_id: None, activity_type: Some("Running".to_string()) };
        assert_eq!(list(&db, &by_type, &Pagination::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_user_delete_removes_activities() {
        let db = setup_db().await;
        let user = users::create(&db, user_request("Thor")).await.unwrap();
        let created = create(&db, running(user.id)).await.unwrap();

        users::delete(&db, user.id).await.unwrap();

        assert!(matches!(get(&db, created.id).await, Err(StoreError::NotFound { .. })));
        assert!(!delete(&db, created.id).await.unwrap());
    }
}
