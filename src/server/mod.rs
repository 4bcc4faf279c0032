use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::any,
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::leaderboard::LeaderboardService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LeaderboardService>,
}

/// Build the Axum router. Single endpoint: `GET /` returns the current
/// leaderboard as a JSON array of `{id, name, stars}`; every other path
/// or method is a 404.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(leaderboard_handler))
        .fallback(not_found_handler)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// GET /
async fn leaderboard_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if method != Method::GET {
        return Err((StatusCode::NOT_FOUND, "404 not found".to_string()));
    }

    state
        .service
        .get_leaderboard(Utc::now())
        .await
        .map(|snapshot| Json(snapshot.participants))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn not_found_handler() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "404 not found".to_string())
}
