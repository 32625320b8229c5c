use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::jwt::SessionKeys, error::AppResult, state::AppState};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub token: String,
}

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/session", post(open_session))
}

#[instrument(skip(state))]
pub async fn open_session(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let idle = Duration::minutes(state.config.session.ttl_minutes);
    let session_id = state.sessions.create(idle).await;
    let token = SessionKeys::from_ref(&state).sign(session_id)?;
    let active = state.sessions.len().await;
    info!(%session_id, active, "session opened");
    Ok((StatusCode::CREATED, Json(SessionResponse { session_id, token })))
}
