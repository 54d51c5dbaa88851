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
    CreateLeaderboardEntryRequest, LeaderboardEntryDto, LeaderboardEntryResponse,
    LeaderboardFilter, LeaderboardListResponse, MessageResponse, Pagination,
    UpdateLeaderboardEntryRequest,
};
use model::{store::leaderboard, wire};
use tracing::{debug, error, info, instrument, trace};

/// Record a leaderboard entry
#[utoipa::path(
    post,
    path = "/api/v1/leaderboard",
    tag = "leaderboard",
    request_body = CreateLeaderboardEntryRequest,
    responses(
        (status = 201, description = "Leaderboard entry created successfully", body = LeaderboardEntryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_leaderboard_entry(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateLeaderboardEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LeaderboardEntryDto>>), HandlerError> {
    trace!("Entering create_leaderboard_entry function");

    let entry = match leaderboard::create(&state.db, request).await {
        Ok(entry) => entry,
        Err(e) => {
            error!("Failed to create leaderboard entry: {}", e);
            return Err(store_error_response(e));
        }
    };
    info!("Leaderboard entry created successfully with ID: {}", entry.id);

    let data = wire::leaderboard_entry(&state.db, entry)
        .await
        .map_err(store_error_response)?;
    let response = ApiResponse {
        data,
        message: "Leaderboard entry created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// The leaderboard, highest score first
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    tag = "leaderboard",
    params(LeaderboardFilter, Pagination),
    responses(
        (status = 200, description = "Leaderboard retrieved successfully", body = LeaderboardListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leaderboard(
    Query(filter): Query<LeaderboardFilter>,
    Valid(Query(page)): Valid<Query<Pagination>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntryDto>>>, HandlerError> {
    trace!("Entering get_leaderboard function");

    let models = leaderboard::list(&state.db, &filter, &page)
        .await
        .map_err(store_error_response)?;
    debug!("Loaded {} leaderboard rows", models.len());
    let data = wire::leaderboard_entries(&state.db, models)
        .await
        .map_err(store_error_response)?;

    info!("Successfully retrieved {} leaderboard entries", data.len());
    let response = ApiResponse {
        data,
        message: "Leaderboard retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a leaderboard entry by ID
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard/{entry_id}",
    tag = "leaderboard",
    params(
        ("entry_id" = i32, Path, description = "Leaderboard entry ID")
    ),
    responses(
        (status = 200, description = "Leaderboard entry retrieved successfully", body = LeaderboardEntryResponse),
        (status = 404, description = "Leaderboard entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leaderboard_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LeaderboardEntryDto>>, HandlerError> {
    trace!("Entering get_leaderboard_entry function for entry_id: {}", entry_id);

    let entry = leaderboard::get(&state.db, entry_id)
        .await
        .map_err(store_error_response)?;
    let data = wire::leaderboard_entry(&state.db, entry)
        .await
        .map_err(store_error_response)?;

    let response = ApiResponse {
        data,
        message: "Leaderboard entry retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a leaderboard entry. `team_id: null` detaches it from its team.
#[utoipa::path(
    put,
    path = "/api/v1/leaderboard/{entry_id}",
    tag = "leaderboard",
    params(
        ("entry_id" = i32, Path, description = "Leaderboard entry ID")
    ),
    request_body = UpdateLeaderboardEntryRequest,
    responses(
        (status = 200, description = "Leaderboard entry updated successfully", body = LeaderboardEntryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Leaderboard entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_leaderboard_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateLeaderboardEntryRequest>,
) -> Result<Json<ApiResponse<LeaderboardEntryDto>>, HandlerError> {
    trace!("Entering update_leaderboard_entry function for entry_id: {}", entry_id);

    let entry = match leaderboard::update(&state.db, entry_id, request).await {
        Ok(entry) => entry,
        Err(e) => {
            error!("Failed to update leaderboard entry with ID {}: {}", entry_id, e);
            return Err(store_error_response(e));
        }
    };
    let data = wire::leaderboard_entry(&state.db, entry)
        .await
        .map_err(store_error_response)?;

    info!("Leaderboard entry with ID {} updated successfully", entry_id);
    let response = ApiResponse {
        data,
        message: "Leaderboard entry updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a leaderboard entry
#[utoipa::path(
    delete,
    path = "/api/v1/leaderboard/{entry_id}",
    tag = "leaderboard",
    params(
        ("entry_id" = i32, Path, description = "Leaderboard entry ID")
    ),
    responses(
        (status = 200, description = "Leaderboard entry deleted successfully", body = MessageResponse),
        (status = 404, description = "Leaderboard entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_leaderboard_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering delete_leaderboard_entry function for entry_id: {}", entry_id);

    match leaderboard::delete(&state.db, entry_id).await {
        Ok(true) => {
            info!("Leaderboard entry with ID {} deleted successfully", entry_id);
            let response = ApiResponse {
                data: format!("Leaderboard entry {} deleted", entry_id),
                message: "Leaderboard entry deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(false) => Err(not_found("LeaderboardEntry", entry_id)),
        Err(e) => {
            error!("Failed to delete leaderboard entry with ID {}: {}", entry_id, e);
            Err(store_error_response(e))
        }
    }
}
