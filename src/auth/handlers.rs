use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AdminStatus, LoginRequest},
    extractors::SessionGuard,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(status))
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn status(session: SessionGuard) -> Json<AdminStatus> {
    Json(AdminStatus {
        is_admin: session.is_admin,
    })
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn login(
    State(state): State<AppState>,
    mut session: SessionGuard,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AdminStatus>> {
    if !state.gate.login(&mut session, &payload.password) {
        return Err(AppError::Authentication);
    }
    Ok(Json(AdminStatus { is_admin: true }))
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn logout(State(state): State<AppState>, mut session: SessionGuard) -> Json<AdminStatus> {
    state.gate.logout(&mut session);
    Json(AdminStatus { is_admin: false })
}
