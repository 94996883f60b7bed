use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::AppState;

pub const REALM: &str = "bookmarks";

/// The credential from an `Authorization: Bearer <token>` header.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthChallenge;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthChallenge)?;

        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthChallenge)?;

        Ok(BearerToken(token.to_string()))
    }
}

pub struct AuthChallenge;

impl IntoResponse for AuthChallenge {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            [(header::WWW_AUTHENTICATE, format!("Bearer realm=\"{REALM}\""))],
            "Unauthorized.",
        )
            .into_response()
    }
}

/// Route layer guarding every protected route. Runs before the route's own
/// extractors, so a rejected request never reaches the store.
pub async fn require_token(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    req: Request,
    next: Next,
) -> Result<Response, AuthChallenge> {
    if token != state.config.token {
        tracing::warn!(path = %req.uri().path(), "rejected bearer token");
        return Err(AuthChallenge);
    }

    Ok(next.run(req).await)
}
