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
    CreateTeamRequest, MessageResponse, Pagination, TeamDto, TeamFilter, TeamListResponse,
    TeamResponse, UpdateTeamRequest,
};
use model::{store::teams, wire};
use tracing::{debug, error, info, instrument, trace};

/// Create a new team
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created successfully", body = TeamResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Team name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_team(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateTeamRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TeamDto>>), HandlerError> {
    trace!("Entering create_team function");

    let team = match teams::create(&state.db, request).await {
        Ok(team) => team,
        Err(e) => {
            error!("Failed to create team: {}", e);
            return Err(store_error_response(e));
        }
    };
    info!("Team created successfully with ID: {}", team.id);

    let data = wire::team(&state.db, team).await.map_err(store_error_response)?;
    debug!("Team {} has {} members", data.id, data.members.len());

    let response = ApiResponse {
        data,
        message: "Team created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List teams with their members
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "teams",
    params(TeamFilter, Pagination),
    responses(
        (status = 200, description = "Teams retrieved successfully", body = TeamListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_teams(
    Query(filter): Query<TeamFilter>,
    Valid(Query(page)): Valid<Query<Pagination>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamDto>>>, HandlerError> {
    trace!("Entering get_teams function");

    let models = teams::list(&state.db, &filter, &page)
        .await
        .map_err(store_error_response)?;
    let data = wire::teams(&state.db, models).await.map_err(store_error_response)?;

    info!("Successfully retrieved {} teams", data.len());
    let response = ApiResponse {
        data,
        message: "Teams retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a team by ID
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team retrieved successfully", body = TeamResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TeamDto>>, HandlerError> {
    trace!("Entering get_team function for team_id: {}", team_id);

    let team = teams::get(&state.db, team_id).await.map_err(store_error_response)?;
    let data = wire::team(&state.db, team).await.map_err(store_error_response)?;

    debug!("Found team: {}", data.name);
    let response = ApiResponse {
        data,
        message: "Team retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a team. `member_ids`, when given, replaces the member set.
#[utoipa::path(
    put,
    path = "/api/v1/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID")
    ),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated successfully", body = TeamResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 409, description = "Team name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateTeamRequest>,
) -> Result<Json<ApiResponse<TeamDto>>, HandlerError> {
    trace!("Entering update_team function for team_id: {}", team_id);

    let team = match teams::update(&state.db, team_id, request).await {
        Ok(team) => team,
        Err(e) => {
            error!("Failed to update team with ID {}: {}", team_id, e);
            return Err(store_error_response(e));
        }
    };
    let data = wire::team(&state.db, team).await.map_err(store_error_response)?;

    info!("Team with ID {} updated successfully", team_id);
    let response = ApiResponse {
        data,
        message: "Team updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a team. Members are kept; the team's leaderboard entries are removed.
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team deleted successfully", body = MessageResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering delete_team function for team_id: {}", team_id);

    match teams::delete(&state.db, team_id).await {
        Ok(true) => {
            info!("Team with ID {} deleted successfully", team_id);
            let response = ApiResponse {
                data: format!("Team {} deleted", team_id),
                message: "Team deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(false) => Err(not_found("Team", team_id)),
        Err(e) => {
            error!("Failed to delete team with ID {}: {}", team_id, e);
            Err(store_error_response(e))
        }
    }
}
