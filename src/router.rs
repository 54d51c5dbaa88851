use crate::handlers::{
    activities::{create_activity, delete_activity, get_activities, get_activity, update_activity},
    admin::get_changelist,
    api_root::api_root,
    health::health_check,
    leaderboard::{
        create_leaderboard_entry, delete_leaderboard_entry, get_leaderboard,
        get_leaderboard_entry, update_leaderboard_entry,
    },
    teams::{create_team, delete_team, get_team, get_teams, update_team},
    users::{create_user, delete_user, get_user, get_users, update_user},
    workouts::{create_workout, delete_workout, get_workout, get_workouts, update_workout},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check and API root
        .route("/health", get(health_check))
        .route("/api/v1/", get(api_root))
        // User CRUD routes
        .route("/api/v1/users", post(create_user).get(get_users))
        .route(
            "/api/v1/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Team CRUD routes
        .route("/api/v1/teams", post(create_team).get(get_teams))
        .route(
            "/api/v1/teams/:team_id",
            get(get_team).put(update_team).delete(delete_team),
        )
        // Activity CRUD routes
        .route("/api/v1/activities", post(create_activity).get(get_activities))
        .route(
            "/api/v1/activities/:activity_id",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        // Workout CRUD routes
        .route("/api/v1/workouts", post(create_workout).get(get_workouts))
        .route(
            "/api/v1/workouts/:workout_id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        // Leaderboard routes
        .route("/api/v1/leaderboard", post(create_leaderboard_entry).get(get_leaderboard))
        .route(
            "/api/v1/leaderboard/:entry_id",
            get(get_leaderboard_entry)
                .put(update_leaderboard_entry)
                .delete(delete_leaderboard_entry),
        )
        // Admin list views
        .route("/api/v1/admin/:entity", get(get_changelist))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
