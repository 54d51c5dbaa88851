use crate::entities::{activity, leaderboard_entry, team_member, user, workout_suggestion};
use crate::error::{Result, StoreError};
use crate::password::hash_password;
use common::{CreateUserRequest, Pagination, UpdateUserRequest, UserFilter};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, trace};
use validator::Validate;

/// Creates a user, hashing the password before it is stored.
#[instrument(skip(db, request), fields(username = ?request.username))]
pub async fn create<C>(db: &C, request: CreateUserRequest) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    trace!("Entering users::create");
    request.validate()?;

    let username = request.username.unwrap_or_default();
    let password_hash = hash_password(&request.password.unwrap_or_default())?;

    let new_user = user::ActiveModel {
        username: Set(username.clone()),
        email: Set(request.email.unwrap_or_default()),
        password_hash: Set(password_hash),
        bio: Set(request.bio),
        avatar: Set(request.avatar),
        ..Default::default()
    };

    let created = new_user.insert(db).await.map_err(|err| {
        StoreError::from_write(err, || format!("Username '{}' already exists", username))
    })?;
    info!("User created with ID: {}", created.id);
    Ok(created)
}

pub async fn get<C>(db: &C, user_id: i32) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "User", id: user_id })
}

pub async fn list<C>(db: &C, filter: &UserFilter, page: &Pagination) -> Result<Vec<user::Model>>
where
    C: ConnectionTrait,
{
    let mut query = user::Entity::find();
    if let Some(username) = &filter.username {
        query = query.filter(user::Column::Username.eq(username.as_str()));
    }

    let users = query
        .order_by_asc(user::Column::Id)
        .paginate(db, page.limit())
        .fetch_page(page.page_index())
        .await?;
    debug!("Listed {} users", users.len());
    Ok(users)
}

/// Applies the provided fields. A new password is re-hashed.
#[instrument(skip(db, request))]
pub async fn update<C>(db: &C, user_id: i32, request: UpdateUserRequest) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let existing = get(db, user_id).await?;
    request.validate()?;

    let username = request.username.clone().unwrap_or_else(|| existing.username.clone());
    let mut active: user::ActiveModel = existing.clone().into();
    let mut updated_fields = Vec::new();

    if let Some(username) = request.username {
        active.username = Set(username);
        updated_fields.push("username");
    }
    if let Some(email) = request.email {
        active.email = Set(email);
        updated_fields.push("email");
    }
    if let Some(password) = request.password {
        active.password_hash = Set(hash_password(&password)?);
        updated_fields.push("password");
    }
    if let Some(bio) = request.bio {
        active.bio = Set(bio);
        updated_fields.push("bio");
    }
    if let Some(avatar) = request.avatar {
        active.avatar = Set(avatar);
        updated_fields.push("avatar");
    }

    if !active.is_changed() {
        debug!("No fields to update for user ID: {}", user_id);
        return Ok(existing);
    }

    let updated = active.update(db).await.map_err(|err| {
        StoreError::from_write(err, || format!("Username '{}' already exists", username))
    })?;
    info!("User {} updated. Updated fields: {}", user_id, updated_fields.join(", "));
    Ok(updated)
}

/// Deletes a user together with its activities, leaderboard entries, team
/// memberships and workout suggestions. Returns `false` if there was no
/// such user.
#[instrument(skip(db))]
pub async fn delete<C>(db: &C, user_id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let activities = activity::Entity::delete_many()
        .filter(activity::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let entries = leaderboard_entry::Entity::delete_many()
        .filter(leaderboard_entry::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let memberships = team_member::Entity::delete_many()
        .filter(team_member::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let suggestions = workout_suggestion::Entity::delete_many()
        .filter(workout_suggestion::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let deleted = user::Entity::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;

    debug!(
        "Cascade for user {}: {} activities, {} leaderboard entries, {} memberships, {} suggestions",
        user_id,
        activities.rows_affected,
        entries.rows_affected,
        memberships.rows_affected,
        suggestions.rows_affected
    );
    Ok(deleted.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use crate::store::testing::{setup_db, user_request};

    #[tokio::test]
    async fn test_create_hashes_password() {
        let db = setup_db().await;

        let created = create(&db, user_request("IronMan")).await.unwrap();

        assert_eq!(created.username, "IronMan");
        assert_eq!(created.email, "ironman@example.com");
        assert_ne!(created.password_hash, "password");
        assert!(verify_password("password", &created.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_integrity_error() {
        let db = setup_db().await;

        create(&db, user_request("Batman")).await.unwrap();
        let err = create(&db, user_request("Batman")).await.unwrap_err();

        assert!(matches!(err, StoreError::Integrity(ref msg) if msg.contains("Batman")));
    }

    #[tokio::test]
    async fn test_invalid_email_is_validation_error() {
        let db = setup_db().await;
        let mut request = user_request("Superman");
        request.email = Some("superman-at-dc".to_string());

        match create(&db, request).await {
            Err(StoreError::Validation(fields)) => {
                assert_eq!(fields["email"], vec!["Enter a valid email address."]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_username_is_validation_error() {
        let db = setup_db().await;
        let mut request = user_request("Nobody");
        request.username = None;

        match create(&db, request).await {
            Err(StoreError::Validation(fields)) => {
                assert_eq!(fields["username"], vec!["This field is required."]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_and_get() {
        let db = setup_db().await;
        let created = create(&db, user_request("SpiderMan")).await.unwrap();

        let updated = update(
            &db,
            created.id,
            UpdateUserRequest {
                bio: Some(Some("Friendly neighbourhood".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("Friendly neighbourhood"));
        assert_eq!(updated.username, "SpiderMan");

        let fetched = get(&db, created.id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_clears_avatar() {
        let db = setup_db().await;
        let mut request = user_request("IronMan");
        request.avatar = Some("https://example.com/tony.png".to_string());
        request.bio = Some("Genius".to_string());
        let created = create(&db, request).await.unwrap();

        let cleared = update(
            &db,
            created.id,
            UpdateUserRequest { avatar: Some(None), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(cleared.avatar, None);
        assert_eq!(cleared.bio.as_deref(), Some("Genius"));
    }

    #[tokio::test]
    async fn test_update_without_fields_returns_existing() {
        let db = setup_db().await;
        let created = create(&db, user_request("Hulk")).await.unwrap();

        let unchanged = update(&db, created.id, UpdateUserRequest::default())
            .await
            .unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let db = setup_db().await;

        let err = update(&db, 42, UpdateUserRequest::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "User", id: 42 }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let db = setup_db().await;
        let created = create(&db, user_request("Thor")).await.unwrap();

        assert!(delete(&db, created.id).await.unwrap());
        assert!(!delete(&db, created.id).await.unwrap());
        assert!(matches!(
            get(&db, created.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_username() {
        let db = setup_db().await;
        create(&db, user_request("Batman")).await.unwrap();
        create(&db, user_request("Superman")).await.unwrap();

        let all = list(&db, &UserFilter::default(), &Pagination::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let filter = UserFilter { username: Some("Superman".to_string()) };
        let filtered = list(&db, &filter, &Pagination::default()).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].username, "Superman");
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let db = setup_db().await;
        for name in ["a", "b", "c"] {
            create(&db, user_request(name)).await.unwrap();
        }

        let page = Pagination { page: Some(2), limit: Some(2) };
        let second = list(&db, &UserFilter::default(), &page).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].username, "c");
    }
}
