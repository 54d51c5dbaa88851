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
    ActivityDto, ActivityFilter, ActivityListResponse, ActivityResponse, CreateActivityRequest,
    MessageResponse, Pagination, UpdateActivityRequest,
};
use model::{store::activities, wire};
use tracing::{debug, error, info, instrument, trace};

/// Log a new activity
#[utoipa::path(
    post,
    path = "/api/v1/activities",
    tag = "activities",
    request_body = CreateActivityRequest,
    responses(
        (status = 201, description = "Activity created successfully", body = ActivityResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_activity(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ActivityDto>>), HandlerError> {
    trace!("Entering create_activity function");

    let activity = match activities::create(&state.db, request).await {
        Ok(activity) => activity,
        Err(e) => {
            error!("Failed to create activity: {}", e);
            return Err(store_error_response(e));
        }
    };
    info!("Activity created successfully with ID: {}", activity.id);

    let data = wire::activity(&state.db, activity).await.map_err(store_error_response)?;
    let response = ApiResponse {
        data,
        message: "Activity created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List activities
#[utoipa::path(
    get,
    path = "/api/v1/activities",
    tag = "activities",
    params(ActivityFilter, Pagination),
    responses(
        (status = 200, description = "Activities retrieved successfully", body = ActivityListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_activities(
    Query(filter): Query<ActivityFilter>,
    Valid(Query(page)): Valid<Query<Pagination>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ActivityDto>>>, HandlerError> {
    trace!("Entering get_activities function");
    debug!(
        "Fetching activities - user_id: {:?}, activity_type: {:?}",
        filter.user_id, filter.activity_type
    );

    let models = activities::list(&state.db, &filter, &page)
        .await
        .map_err(store_error_response)?;
    let data = wire::activities(&state.db, models)
        .await
        .map_err(store_error_response)?;

    info!("Successfully retrieved {} activities", data.len());
    let response = ApiResponse {
        data,
        message: "Activities retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get an activity by ID
#[utoipa::path(
    get,
    path = "/api/v1/activities/{activity_id}",
    tag = "activities",
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity retrieved successfully", body = ActivityResponse),
        (status = 404, description = "Activity not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_activity(
    Path(activity_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ActivityDto>>, HandlerError> {
    trace!("Entering get_activity function for activity_id: {}", activity_id);

    let activity = activities::get(&state.db, activity_id)
        .await
        .map_err(store_error_response)?;
    let data = wire::activity(&state.db, activity).await.map_err(store_error_response)?;

    let response = ApiResponse {
        data,
        message: "Activity retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an activity. The recorded date cannot be changed.
#[utoipa::path(
    put,
    path = "/api/v1/activities/{activity_id}",
    tag = "activities",
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    request_body = UpdateActivityRequest,
    responses(
        (status = 200, description = "Activity updated successfully", body = ActivityResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Activity not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_activity(
    Path(activity_id): Path<i32>,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateActivityRequest>,
) -> Result<Json<ApiResponse<ActivityDto>>, HandlerError> {
    trace!("Entering update_activity function for activity_id: {}", activity_id);

    let activity = match activities::update(&state.db, activity_id, request).await {
        Ok(activity) => activity,
        Err(e) => {
            error!("Failed to update activity with ID {}: {}", activity_id, e);
            return Err(store_error_response(e));
        }
    };
    let data = wire::activity(&state.db, activity).await.map_err(store_error_response)?;

    info!("Activity with ID {} updated successfully", activity_id);
    let response = ApiResponse {
        data,
        message: "Activity updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an activity
#[utoipa::path(
    delete,
    path = "/api/v1/activities/{activity_id}",
    tag = "activities",
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity deleted successfully", body = MessageResponse),
        (status = 404, description = "Activity not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_activity(
    Path(activity_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering delete_activity function for activity_id: {}", activity_id);

    match activities::delete(&state.db, activity_id).await {
        Ok(true) => {
            info!("Activity with ID {} deleted successfully", activity_id);
            let response = ApiResponse {
                data: format!("Activity {} deleted", activity_id),
                message: "Activity deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(false) => Err(not_found("Activity", activity_id)),
        Err(e) => {
            error!("Failed to delete activity with ID {}: {}", activity_id, e);
            Err(store_error_response(e))
        }
    }
}
