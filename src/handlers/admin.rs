use crate::schemas::{store_error_response, ApiResponse, AppState, ErrorResponse, HandlerError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{ChangeListDto, ChangeListResponse, Pagination};
use model::schema::EntityKind;
use tracing::{debug, error, info, instrument, trace, warn};

/// Tabular list view of one entity
#[utoipa::path(
    get,
    path = "/api/v1/admin/{entity}",
    tag = "admin",
    params(
        ("entity" = String, Path, description = "Resource name, e.g. `users` or `leaderboard`"),
        Pagination
    ),
    responses(
        (status = 200, description = "Change list rendered successfully", body = ChangeListResponse),
        (status = 404, description = "No list view for this entity", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_changelist(
    Path(entity): Path<String>,
    Valid(Query(page)): Valid<Query<Pagination>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChangeListDto>>, HandlerError> {
    trace!("Entering get_changelist function for entity: {}", entity);

    let resolved = EntityKind::from_resource(&entity)
        .filter(|kind| state.schema.entity(*kind).is_some());
    let Some(kind) = resolved else {
        warn!("Unknown admin entity: {}", entity);
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("NOT_FOUND", format!("Unknown entity '{}'", entity))),
        ));
    };

    match state.admin.changelist(&state.db, kind, &page).await {
        Ok(Some(data)) => {
            info!("Rendered {} rows for {}", data.rows.len(), kind);
            let response = ApiResponse {
                data,
                message: "Change list retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            debug!("{} has no registered list view", kind);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("NOT_FOUND", format!("{} is not registered", kind))),
            ))
        }
        Err(e) => {
            error!("Failed to render change list for {}: {}", kind, e);
            Err(store_error_response(e))
        }
    }
}
