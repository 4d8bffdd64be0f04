pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::claims::handlers;
use crate::state::AppState;

fn claim_routes() -> Router<AppState> {
    Router::new()
        // Claimant dashboard
        .route(
            "/status",
            get(handlers::handle_get_status).post(handlers::handle_submit),
        )
        // Review queue
        .route(
            "/admin",
            get(handlers::handle_list_claims).patch(handlers::handle_admin_action),
        )
        // Work search
        .route("/work-log", post(handlers::handle_log_application))
        .route("/claims/:id", patch(handlers::handle_update_claim))
}

/// Claim routes are served both at the root and under `/api/v1`.
pub fn build_router(state: AppState) -> Router {
    let claims = claim_routes();
    Router::new()
        .route("/health", get(health::health_handler))
        .merge(claims.clone())
        .nest("/api/v1", claims)
        .with_state(state)
}
