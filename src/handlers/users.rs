use crate::extract::JsonBody;
use crate::schemas::{
    not_found, store_error_response, ApiResponse, AppState, ErrorResponse, HandlerError,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{
    CreateUserRequest, MessageResponse, Pagination, UpdateUserRequest, UserDto, UserFilter,
    UserListResponse, UserResponse,
};
use model::store::users;
use tracing::{debug, error, info, instrument, trace};

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), HandlerError> {
    trace!("Entering create_user function");
    debug!("Creating user with username: {:?}", request.username);

    match users::create(&state.db, request).await {
        Ok(user) => {
            info!("User created successfully with ID: {}", user.id);
            let response = ApiResponse {
                data: UserDto::from(user),
                message: "User created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(store_error_response(e))
        }
    }
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(UserFilter, Pagination),
    responses(
        (status = 200, description = "Users retrieved successfully", body = UserListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    Query(filter): Query<UserFilter>,
    Valid(Query(page)): Valid<Query<Pagination>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, HandlerError> {
    trace!("Entering get_users function");
    debug!("Fetching users - page: {}, limit: {}", page.page_index() + 1, page.limit());

    match users::list(&state.db, &filter, &page).await {
        Ok(models) => {
            let user_count = models.len();
            info!("Successfully retrieved {} users", user_count);
            let response = ApiResponse {
                data: models.into_iter().map(UserDto::from).collect(),
                message: "Users retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => {
            error!("Failed to retrieve users: {}", e);
            Err(store_error_response(e))
        }
    }
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserDto>>, HandlerError> {
    trace!("Entering get_user function for user_id: {}", user_id);

    match users::get(&state.db, user_id).await {
        Ok(user) => {
            debug!("Found user: {}", user.username);
            let response = ApiResponse {
                data: UserDto::from(user),
                message: "User retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(store_error_response(e)),
    }
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, HandlerError> {
    trace!("Entering update_user function for user_id: {}", user_id);

    match users::update(&state.db, user_id, request).await {
        Ok(user) => {
            info!("User with ID {} updated successfully", user_id);
            let response = ApiResponse {
                data: UserDto::from(user),
                message: "User updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => {
            error!("Failed to update user with ID {}: {}", user_id, e);
            Err(store_error_response(e))
        }
    }
}

/// Delete a user together with their activities, leaderboard entries and memberships
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    match users::delete(&state.db, user_id).await {
        Ok(true) => {
            info!("User with ID {} deleted successfully", user_id);
            let response = ApiResponse {
                data: format!("User {} deleted", user_id),
                message: "User deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(false) => Err(not_found("User", user_id)),
        Err(e) => {
            error!("Failed to delete user with ID {}: {}", user_id, e);
            Err(store_error_response(e))
        }
    }
}
