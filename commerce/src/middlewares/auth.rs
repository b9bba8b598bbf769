use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, Validation};
use lambda_http::tracing;

use crate::{
    constants::JWT_AUDIENCE,
    models::{auth::ClaimOwned, ErrorResponse, GeneralResult},
    state::AppState,
};

/// Validates the bearer token, checks its session is still live and stores
/// the claim in request extensions for `Extension<ClaimOwned>` extractors.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> GeneralResult<Response<Body>> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .map(|h| h.to_str());
    let header = match auth_header {
        Some(h) => h.map_err(|e| {
            ErrorResponse::forbidden(format!("Failed to down cast header value to string: {}", e))
        })?,
        None => return Err(ErrorResponse::forbidden("Invalid authorization header.")),
    };
    // token should be "Bearer ..."
    let mut it = header.split_whitespace();
    let (_, token_str) = (it.next(), it.next());
    let token = token_str.ok_or(ErrorResponse::forbidden("Empty token value"))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[JWT_AUDIENCE]);
    let data = jsonwebtoken::decode::<ClaimOwned>(token, &state.jwt.1, &validation)
        .map_err(|e| ErrorResponse::forbidden(format!("Failed to decode JWT token: {}", e)))?;

    let session = state
        .store
        .get_session(data.claims.sid)
        .await
        .map_err(|e| ErrorResponse::with_inner_status(e.inner_status(), e.to_string()))?;
    match session {
        Some(s) if s.user_id == data.claims.id => {}
        _ => {
            tracing::info!("Rejected token for ended session {}", data.claims.sid);
            return Err(ErrorResponse::forbidden("Session has ended, please log in again."));
        }
    }

    req.extensions_mut().insert(data.claims);

    Ok(next.run(req).await)
}
