use anyhow::{Context, Result};
use model::schema::EntityKind;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace, warn};

use crate::config::{build_app_state, connect};
use crate::handlers::api_root::API_PREFIX;
use crate::router::create_router;
use crate::schemas::AppState;

/// Log what the running server exposes: one collection per entity and the
/// admin list views that passed registry validation.
fn log_surface(state: &AppState, bind_address: &str) {
    for kind in EntityKind::ALL {
        let fields = state
            .schema
            .entity(kind)
            .map(|schema| schema.wire_fields().count())
            .unwrap_or_default();
        debug!(
            "{} -> http://{}{}/{} ({} wire fields)",
            kind,
            bind_address,
            API_PREFIX,
            kind.resource(),
            fields
        );
    }

    let views: Vec<&str> = state.admin.entities().map(EntityKind::resource).collect();
    info!("Admin list views: {}", views.join(", "));
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}

pub async fn serve(database_url: &str, bind_address: &str) -> Result<()> {
    trace!("Entering serve function");
    info!("OctoFit backend starting up");

    let db = connect(database_url).await?;
    let state = build_app_state(db).inspect_err(|e| {
        error!("Invalid application configuration: {}", e);
    })?;
    log_surface(&state, bind_address);

    let app = create_router(state);

    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind to address {}", bind_address))?;

    info!("OctoFit API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| error!("Server error: {}", e))?;

    info!("Server shutdown gracefully");
    Ok(())
}
