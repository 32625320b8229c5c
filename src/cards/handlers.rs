use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{CardList, CreateCardRequest, CreatedCardResponse, DeleteAllResponse};
use crate::{
    auth::extractors::{AdminGuard, SessionGuard},
    cards::repo_types::Card,
    error::AppResult,
    state::AppState,
};

const DELETE_ALL_WARNING: &str =
    "This removes every card and cannot be undone. Send the request again to confirm.";

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/cards", get(list_cards))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/cards", axum::routing::post(create_card).delete(delete_all_cards))
        .route("/cards/confirmation", delete(cancel_delete_all))
        .route("/cards/:id", delete(delete_card))
}

// --- handlers ---

/// GET /cards, newest first
#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn list_cards(
    State(state): State<AppState>,
    session: SessionGuard,
) -> AppResult<Json<CardList>> {
    let cards = Card::list_all_by_recency(&state.db).await?;
    Ok(Json(CardList {
        total: cards.len(),
        cards,
    }))
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn create_card(
    State(state): State<AppState>,
    session: AdminGuard,
    Json(body): Json<CreateCardRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<CreatedCardResponse>)> {
    let id = Card::insert_one(&state.db, &body.content).await?;
    info!(id, "card created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/cards/{}", id).parse::<HeaderValue>() {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(CreatedCardResponse { id })))
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn delete_card(
    State(state): State<AppState>,
    mut session: AdminGuard,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    Card::delete_one(&state.db, id).await?;
    session.deck.forget(id);
    info!(id, "card deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cards, two-step: arm on the first call, delete on the second.
#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn delete_all_cards(
    State(state): State<AppState>,
    mut session: AdminGuard,
) -> AppResult<(StatusCode, Json<DeleteAllResponse>)> {
    if !session.confirm_delete_all {
        session.confirm_delete_all = true;
        warn!("delete-all armed, waiting for confirmation");
        return Ok((
            StatusCode::ACCEPTED,
            Json(DeleteAllResponse::ConfirmationRequired {
                message: DELETE_ALL_WARNING,
            }),
        ));
    }

    let removed = Card::delete_all(&state.db).await?;
    session.confirm_delete_all = false;
    session.deck.clear();
    info!(removed, "all cards deleted");
    Ok((StatusCode::OK, Json(DeleteAllResponse::Deleted { removed })))
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn cancel_delete_all(mut session: AdminGuard) -> StatusCode {
    session.confirm_delete_all = false;
    StatusCode::NO_CONTENT
}
