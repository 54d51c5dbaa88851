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
    CreateWorkoutRequest, MessageResponse, Pagination, UpdateWorkoutRequest, WorkoutDto,
    WorkoutFilter, WorkoutListResponse, WorkoutResponse,
};
use model::{store::workouts, wire};
use tracing::{debug, error, info, instrument, trace};

/// Create a new workout
#[utoipa::path(
    post,
    path = "/api/v1/workouts",
    tag = "workouts",
    request_body = CreateWorkoutRequest,
    responses(
        (status = 201, description = "Workout created successfully", body = WorkoutResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_workout(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkoutDto>>), HandlerError> {
    trace!("Entering create_workout function");

    let workout = match workouts::create(&state.db, request).await {
        Ok(workout) => workout,
        Err(e) => {
            error!("Failed to create workout: {}", e);
            return Err(store_error_response(e));
        }
    };
    info!("Workout created successfully with ID: {}", workout.id);

    let data = wire::workout(&state.db, workout).await.map_err(store_error_response)?;
    let response = ApiResponse {
        data,
        message: "Workout created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List workouts
#[utoipa::path(
    get,
    path = "/api/v1/workouts",
    tag = "workouts",
    params(WorkoutFilter, Pagination),
    responses(
        (status = 200, description = "Workouts retrieved successfully", body = WorkoutListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_workouts(
    Query(filter): Query<WorkoutFilter>,
    Valid(Query(page)): Valid<Query<Pagination>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<WorkoutDto>>>, HandlerError> {
    trace!("Entering get_workouts function");
    if let Some(user_id) = filter.suggested_for {
        debug!("Filtering workouts suggested for user {}", user_id);
    }

    let models = workouts::list(&state.db, &filter, &page)
        .await
        .map_err(store_error_response)?;
    let data = wire::workouts(&state.db, models)
        .await
        .map_err(store_error_response)?;

    info!("Successfully retrieved {} workouts", data.len());
    let response = ApiResponse {
        data,
        message: "Workouts retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a workout by ID
#[utoipa::path(
    get,
    path = "/api/v1/workouts/{workout_id}",
    tag = "workouts",
    params(
        ("workout_id" = i32, Path, description = "Workout ID")
    ),
    responses(
        (status = 200, description = "Workout retrieved successfully", body = WorkoutResponse),
        (status = 404, description = "Workout not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_workout(
    Path(workout_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<WorkoutDto>>, HandlerError> {
    trace!("Entering get_workout function for workout_id: {}", workout_id);

    let workout = workouts::get(&state.db, workout_id)
        .await
        .map_err(store_error_response)?;
    let data = wire::workout(&state.db, workout).await.map_err(store_error_response)?;

    let response = ApiResponse {
        data,
        message: "Workout retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a workout. `suggested_for_ids`, when given, replaces the suggestion set.
#[utoipa::path(
    put,
    path = "/api/v1/workouts/{workout_id}",
    tag = "workouts",
    params(
        ("workout_id" = i32, Path, description = "Workout ID")
    ),
    request_body = UpdateWorkoutRequest,
    responses(
        (status = 200, description = "Workout updated successfully", body = WorkoutResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Workout not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_workout(
    Path(workout_id): Path<i32>,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateWorkoutRequest>,
) -> Result<Json<ApiResponse<WorkoutDto>>, HandlerError> {
    trace!("Entering update_workout function for workout_id: {}", workout_id);

    let workout = match workouts::update(&state.db, workout_id, request).await {
        Ok(workout) => workout,
        Err(e) => {
            error!("Failed to update workout with ID {}: {}", workout_id, e);
            return Err(store_error_response(e));
        }
    };
    let data = wire::workout(&state.db, workout).await.map_err(store_error_response)?;

    info!("Workout with ID {} updated successfully", workout_id);
    let response = ApiResponse {
        data,
        message: "Workout updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a workout
#[utoipa::path(
    delete,
    path = "/api/v1/workouts/{workout_id}",
    tag = "workouts",
    params(
        ("workout_id" = i32, Path, description = "Workout ID")
    ),
    responses(
        (status = 200, description = "Workout deleted successfully", body = MessageResponse),
        (status = 404, description = "Workout not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_workout(
    Path(workout_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering delete_workout function for workout_id: {}", workout_id);

    match workouts::delete(&state.db, workout_id).await {
        Ok(true) => {
            info!("Workout with ID {} deleted successfully", workout_id);
            let response = ApiResponse {
                data: format!("Workout {} deleted", workout_id),
                message: "Workout deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(false) => Err(not_found("Workout", workout_id)),
        Err(e) => {
            error!("Failed to delete workout with ID {}: {}", workout_id, e);
            Err(store_error_response(e))
        }
    }
}
