use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::keys::AccessLevel;
use crate::error::AppError;
use crate::state::SharedState;

/// Caller holding either the API key or the admin key.
#[derive(Debug, Clone, Copy)]
pub struct ReadAccess {
    pub level: AccessLevel,
}

/// Caller holding the admin key.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

fn bearer_level(parts: &Parts, state: &SharedState) -> Result<AccessLevel, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, token)| scheme.eq_ignore_ascii_case("bearer") && !token.is_empty())
        .map(|(_, token)| token)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    state
        .keys
        .authenticate(token)
        .ok_or_else(|| AppError::Unauthorized("Invalid API key".to_string()))
}

impl FromRequestParts<SharedState> for ReadAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let level = bearer_level(parts, state)?;
        Ok(ReadAccess { level })
    }
}

impl FromRequestParts<SharedState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_level(parts, state)? {
            AccessLevel::Admin => Ok(AdminAccess),
            AccessLevel::Read => Err(AppError::Forbidden(
                "Admin access required".to_string(),
            )),
        }
    }
}
