//! Authentication context extraction.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use uuid::Uuid;

use postboard_core::ports::TokenClaims;
use postboard_core::{DomainError, DomainResult};

use crate::state::AppState;

/// Authentication state of a request: `{is_auth, user_id}`.
///
/// Extraction never fails; a missing or invalid bearer token simply yields an
/// unauthenticated context, and gated operations reject it via [`require`].
///
/// [`require`]: AuthContext::require
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthContext {
    pub is_auth: bool,
    pub user_id: Option<Uuid>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: Uuid) -> Self {
        Self {
            is_auth: true,
            user_id: Some(user_id),
        }
    }

    /// Guard composed in front of every gated operation.
    pub fn require(&self) -> DomainResult<Uuid> {
        match (self.is_auth, self.user_id) {
            (true, Some(user_id)) => Ok(user_id),
            _ => {
                tracing::debug!("Rejected unauthenticated request");
                Err(DomainError::not_authenticated())
            }
        }
    }
}

impl From<TokenClaims> for AuthContext {
    fn from(claims: TokenClaims) -> Self {
        Self::authenticated(claims.user_id)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequest for AuthContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Ok(AuthContext::anonymous()));
        };

        let Some(token) = bearer_token(req) else {
            return ready(Ok(AuthContext::anonymous()));
        };

        match state.tokens.validate_token(token) {
            Ok(claims) => ready(Ok(AuthContext::from(claims))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
                ready(Ok(AuthContext::anonymous()))
            }
        }
    }
}
