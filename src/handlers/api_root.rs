use axum::response::Json;
use model::schema::EntityKind;
use tracing::instrument;

use crate::schemas::ApiRoot;

pub const API_PREFIX: &str = "/api/v1";

fn collection_url(kind: EntityKind) -> String {
    format!("{}/{}", API_PREFIX, kind.resource())
}

/// Links to every collection endpoint
#[utoipa::path(
    get,
    path = "/api/v1/",
    tag = "health",
    responses(
        (status = 200, description = "Collection URLs", body = ApiRoot)
    )
)]
#[instrument]
pub async fn api_root() -> Json<ApiRoot> {
    Json(ApiRoot {
        users: collection_url(EntityKind::User),
        teams: collection_url(EntityKind::Team),
        activities: collection_url(EntityKind::Activity),
        workouts: collection_url(EntityKind::Workout),
        leaderboard: collection_url(EntityKind::LeaderboardEntry),
    })
}
