//! Request authentication middleware
//!
//! Runs once per inbound request, ahead of every handler: it parses the
//! bearer credential and either establishes a request-scoped identity or
//! leaves the request anonymous. It never fails the request itself; routes
//! that need an identity enforce that through the [`CurrentUser`] extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Identity established for the current request
///
/// Carries only the token subject; there are no roles, authorization in this
/// system is authenticated-or-not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
}

/// Authenticate the request from its bearer token, if any.
///
/// Must be layered so it runs before the handlers. Absent, malformed, or
/// invalid credentials all leave the request anonymous and processing
/// continues; a downstream extractor turns "anonymous where identity is
/// required" into 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).map(str::to_owned);

    if let Some(token) = token {
        if request.extensions().get::<CurrentUser>().is_none() {
            match state.auth_service.authenticate_token(&token) {
                Ok(claims) => {
                    // Subjects are stringified numeric ids; anything else is
                    // treated like any other bad token
                    if let Ok(user_id) = claims.sub.parse::<i64>() {
                        request.extensions_mut().insert(CurrentUser { user_id });
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Rejected bearer token, continuing as anonymous");
                }
            }
        }
    }

    next.run(request).await
}

/// Pull the token out of the `Authorization` header.
///
/// The `Bearer ` prefix is matched case-sensitively with a single space, as
/// the clients send it; anything else counts as "no credential presented".
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}
