//! `AuthPrincipal` extractor: resolves an access key from the
//! `Authorization: Bearer` header into a [`Principal`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use hive_core::AppError;
use hive_core::traits::Repository;
use hive_entity::Principal;
use hive_entity::repository::AccessKeyRepository;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller of a REST endpoint.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl std::ops::Deref for AuthPrincipal {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let secret = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let key = state
            .storage
            .access_keys
            .find_by_key(secret)
            .await?
            .filter(|key| !key.is_expired())
            .ok_or_else(|| AppError::authentication("Invalid or expired access key"))?;

        let user = state
            .storage
            .users
            .find(key.user_id)
            .await?
            .filter(|user| user.is_active())
            .ok_or_else(|| AppError::authentication("Access key owner is not active"))?;

        debug!(key_id = ?key.id, login = %user.login, "Access key authenticated");
        Ok(Self(Principal::AccessKey { key, user }))
    }
}
