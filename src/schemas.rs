use axum::{http::StatusCode, response::Json};
use common::{
    ActivityDto, ActivityListResponse, ActivityResponse, ChangeListDto, ChangeListResponse,
    CreateActivityRequest, CreateLeaderboardEntryRequest, CreateTeamRequest,
    CreateUserRequest, CreateWorkoutRequest, FieldErrors, LeaderboardEntryDto,
    LeaderboardEntryResponse, LeaderboardListResponse, MessageResponse, TeamDto,
    TeamListResponse, TeamResponse, UpdateActivityRequest, UpdateLeaderboardEntryRequest,
    UpdateTeamRequest, UpdateUserRequest, UpdateWorkoutRequest, UserDto, UserListResponse,
    UserResponse, WorkoutDto, WorkoutListResponse, WorkoutResponse,
};
use model::schema::SchemaRegistry;
use model::StoreError;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{OpenApi, ToSchema};

use crate::admin::AdminSite;

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Entity shapes, built once at startup
    pub schema: Arc<SchemaRegistry>,
    /// Validated list-view configuration
    pub admin: Arc<AdminSite>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
    /// Per-field messages for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self { error: error.into(), code: code.to_string(), success: false, fields: None }
    }
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Links to every collection endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiRoot {
    pub users: String,
    pub teams: String,
    pub activities: String,
    pub workouts: String,
    pub leaderboard: String,
}

pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Map a store failure onto its HTTP status and error body.
pub fn store_error_response(err: StoreError) -> HandlerError {
    match err {
        StoreError::Validation(fields) => {
            warn!("Validation failed: {:?}", fields);
            let mut body = ErrorResponse::new("VALIDATION_ERROR", "Invalid input");
            body.fields = Some(fields);
            (StatusCode::BAD_REQUEST, Json(body))
        }
        StoreError::NotFound { .. } => {
            warn!("{}", err);
            (StatusCode::NOT_FOUND, Json(ErrorResponse::new("NOT_FOUND", err.to_string())))
        }
        StoreError::Integrity(message) => {
            warn!("Integrity error: {}", message);
            (StatusCode::CONFLICT, Json(ErrorResponse::new("INTEGRITY_ERROR", message)))
        }
        StoreError::PasswordHash(_) => {
            error!("{}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("INTERNAL_ERROR", "Failed to process password")),
            )
        }
        StoreError::Database(db_error) => {
            error!("Database error: {}", db_error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("DATABASE_ERROR", format!("Database error: {}", db_error))),
            )
        }
    }
}

/// 404 body for a delete that removed nothing.
pub fn not_found(entity: &str, id: i32) -> HandlerError {
    warn!("{} with ID {} not found for deletion", entity, id);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", entity, id))),
    )
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::api_root::api_root,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::teams::create_team,
        crate::handlers::teams::get_teams,
        crate::handlers::teams::get_team,
        crate::handlers::teams::update_team,
        crate::handlers::teams::delete_team,
        crate::handlers::activities::create_activity,
        crate::handlers::activities::get_activities,
        crate::handlers::activities::get_activity,
        crate::handlers::activities::update_activity,
        crate::handlers::activities::delete_activity,
        crate::handlers::workouts::create_workout,
        crate::handlers::workouts::get_workouts,
        crate::handlers::workouts::get_workout,
        crate::handlers::workouts::update_workout,
        crate::handlers::workouts::delete_workout,
        crate::handlers::leaderboard::create_leaderboard_entry,
        crate::handlers::leaderboard::get_leaderboard,
        crate::handlers::leaderboard::get_leaderboard_entry,
        crate::handlers::leaderboard::update_leaderboard_entry,
        crate::handlers::leaderboard::delete_leaderboard_entry,
        crate::handlers::admin::get_changelist,
    ),
    components(
        schemas(
            UserResponse,
            UserListResponse,
            TeamResponse,
            TeamListResponse,
            ActivityResponse,
            ActivityListResponse,
            WorkoutResponse,
            WorkoutListResponse,
            LeaderboardEntryResponse,
            LeaderboardListResponse,
            ChangeListResponse,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            ApiRoot,
            UserDto,
            TeamDto,
            ActivityDto,
            WorkoutDto,
            LeaderboardEntryDto,
            ChangeListDto,
            CreateUserRequest,
            UpdateUserRequest,
            CreateTeamRequest,
            UpdateTeamRequest,
            CreateActivityRequest,
            UpdateActivityRequest,
            CreateWorkoutRequest,
            UpdateWorkoutRequest,
            CreateLeaderboardEntryRequest,
            UpdateLeaderboardEntryRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management endpoints"),
        (name = "teams", description = "Team management endpoints"),
        (name = "activities", description = "Activity logging endpoints"),
        (name = "workouts", description = "Workout suggestion endpoints"),
        (name = "leaderboard", description = "Leaderboard endpoints"),
        (name = "admin", description = "Administrative list views"),
    ),
    info(
        title = "OctoFit Tracker API",
        description = "Fitness tracking backend: users, teams, activities, workouts and a leaderboard",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
