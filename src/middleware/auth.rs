//! Bearer token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the token from the Authorization header
//! 2. Fetch the JSON Web Key Set and verify the token against it
//! 3. Inject authentication context into the request
//! 4. Reject unauthorized requests with HTTP 401
//!
//! Every failure produces the same 401 body, whether the header was
//! malformed, the key set was unreachable or the signature was wrong.

use crate::{AppState, error::AppError};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; handlers extract it with
/// `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// `sub` claim of the verified token, if it had one
    pub subject: Option<String>,
}

/// Split an `Authorization` value of the form `Bearer <token>`.
///
/// The value must be exactly two whitespace-separated fields and the scheme
/// is case-sensitive.
pub fn bearer_token(value: &str) -> Option<&str> {
    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

/// JWT authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Download the key set from the configured URL (every request)
/// 3. Verify signature and standard claims
/// 4. If valid: inject `AuthContext` into request, call next handler
/// 5. Otherwise: return 401 Unauthorized error
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Rejected {}: missing Authorization header", request.uri());
            AppError::Unauthorized
        })?;

    let token = bearer_token(auth_header).ok_or_else(|| {
        tracing::warn!("Rejected {}: malformed Authorization header", request.uri());
        AppError::Unauthorized
    })?;

    let claims = state.verifier.verify(token).await.map_err(|e| {
        tracing::warn!("Rejected {}: {}", request.uri(), e);
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(AuthContext {
        subject: claims.sub,
    });

    Ok(next.run(request).await)
}
