use std::ops::{Deref, DerefMut};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tokio::sync::OwnedMutexGuard;
use tracing::warn;

use super::jwt::SessionKeys;
use crate::{error::AppError, session::Session, state::AppState};

/// The caller's session, locked for the duration of the request.
pub struct SessionGuard(pub OwnedMutexGuard<Session>);

/// Like [`SessionGuard`] but only for sessions that passed the admin gate.
pub struct AdminGuard(pub OwnedMutexGuard<Session>);

async fn lock_session(parts: &Parts, state: &AppState) -> Result<OwnedMutexGuard<Session>, AppError> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized("missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or(AppError::Unauthorized("invalid auth scheme"))?;

    let keys = SessionKeys::from_ref(state);
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid session token");
        AppError::Unauthorized("invalid or expired session token")
    })?;

    let handle = state
        .sessions
        .get(claims.sub)
        .await
        .ok_or(AppError::Unauthorized("session expired; open a new one"))?;

    let mut session = handle.lock_owned().await;
    session.touch();
    Ok(session)
}

#[async_trait]
impl FromRequestParts<AppState> for SessionGuard {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(SessionGuard(lock_session(parts, state).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = lock_session(parts, state).await?;
        if !session.is_admin {
            return Err(AppError::Forbidden);
        }
        Ok(AdminGuard(session))
    }
}

impl Deref for SessionGuard {
    type Target = Session;
    fn deref(&self) -> &Session {
        &self.0
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Session {
        &mut self.0
    }
}

impl Deref for AdminGuard {
    type Target = Session;
    fn deref(&self) -> &Session {
        &self.0
    }
}

impl DerefMut for AdminGuard {
    fn deref_mut(&mut self) -> &mut Session {
        &mut self.0
    }
}
