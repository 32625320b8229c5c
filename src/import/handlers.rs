use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument};

use super::dto::{CommitResponse, PreviewResponse};
use crate::{
    auth::extractors::AdminGuard,
    cards::repo_types::Card,
    error::{AppError, AppResult},
    state::AppState,
};

const SAMPLE_CSV: &str = "一行目の内容\n二行目の内容\n三行目の内容\n";

pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/import/preview", post(preview))
        .route("/import", post(commit).delete(discard))
        .route("/import/sample.csv", get(sample))
        .layer(DefaultBodyLimit::max(5 * 1024 * 1024)) // 5MB
}

/// POST /import/preview (multipart, field `file`)
/// Parses the upload and stages it in the session until committed.
#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn preview(
    mut session: AdminGuard,
    mut mp: Multipart,
) -> AppResult<Json<PreviewResponse>> {
    let mut upload: Option<Bytes> = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
            upload = Some(data);
            break;
        }
    }
    let upload = upload.ok_or_else(|| AppError::Validation("file is required".into()))?;

    let batch = super::parse(&upload)?;
    info!(encoding = batch.encoding, count = batch.entries.len(), "import staged");

    let response = PreviewResponse {
        encoding: batch.encoding,
        count: batch.entries.len(),
        entries: batch.entries.clone(),
    };
    session.pending_import = Some(batch);
    Ok(Json(response))
}

/// POST /import: insert the staged batch. The stage is cleared even when
/// the insert fails; the admin uploads again to retry.
#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn commit(
    State(state): State<AppState>,
    mut session: AdminGuard,
) -> AppResult<(StatusCode, Json<CommitResponse>)> {
    let batch = session.pending_import.take().ok_or(AppError::NothingStaged)?;
    let inserted = Card::insert_many(&state.db, &batch.entries).await?;
    info!(inserted, "import committed");
    Ok((StatusCode::CREATED, Json(CommitResponse { inserted })))
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn discard(mut session: AdminGuard) -> StatusCode {
    session.pending_import = None;
    StatusCode::NO_CONTENT
}

pub async fn sample() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"sample.csv\""),
        ],
        SAMPLE_CSV,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_parses_back_to_three_cards() {
        let batch = crate::import::parse(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(batch.entries.len(), 3);
        assert_eq!(batch.entries[0], "一行目の内容");
    }
}
