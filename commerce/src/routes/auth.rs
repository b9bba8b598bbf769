use std::sync::Arc;

use axum::{
    extract::{Json, State},
    Extension,
};
use lambda_http::tracing;
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    errors::HandlerError,
    models::{
        auth::{ClaimOwned, LoginPayload, RegisterPayload},
        user::{User, UserInfo},
        PlainSuccessResponse,
    },
    state::AppState,
    store::StoreError,
    utils::create_userid,
};

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
}

pub fn authed_router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new().routes(routes!(logout))
}

/// Opens a session for `user` and signs a token naming it.
async fn sign_in(state: &AppState, user: &User) -> Result<UserInfo, HandlerError> {
    let session = user.new_session(state.token_ttl);
    state.store.put_session(&session).await?;

    let enc_key = &state.jwt.0;
    let header = &state.jwt.2;
    let claim = user.create_claim(&session);
    let token = jsonwebtoken::encode(header, &claim, enc_key)?;

    Ok(user.to_user_info(token))
}

#[utoipa::path(
    post,
    path = "/v1/register",
    tag = "Auth",
    request_body(description = "Register Info", content = RegisterPayload),
    responses(
        (status = OK, description = "Register Success", body = UserInfo),
        (status = BAD_REQUEST, description = "Passwords differ or user already exists", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<UserInfo>, HandlerError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(HandlerError::bad_request("Username must not be empty."));
    }

    // 1. Ensure password matches confirmation.
    if payload.password != payload.confirmation {
        return Err(HandlerError::bad_request("Passwords must match."));
    }

    // 2. Create password hash.
    let salt = SaltString::generate(&mut OsRng);
    let phash = Scrypt
        .hash_password_customized(
            payload.password.as_bytes(),
            None,
            None,
            state.scrypt_params,
            &salt,
        )?
        .to_string();

    // 3. Create user, the store rejects taken names.
    let user = User {
        id: create_userid(username),
        create_at: chrono::Local::now().timestamp_millis() as u64,
        username: username.to_string(),
        email: payload.email.trim().to_string(),
        password: phash,
    };
    match state.store.create_user(&user).await {
        Ok(()) => {}
        Err(StoreError::Conflict(_)) => {
            return Err(HandlerError::bad_request("Username already taken."));
        }
        Err(e) => return Err(e.into()),
    }
    tracing::info!("Registered user {}", user.id);

    // 4. Sign in.
    Ok(Json(sign_in(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/v1/login",
    tag = "Auth",
    request_body(description = "Credentials", content = LoginPayload),
    responses(
        (status = OK, description = "Login Success", body = UserInfo),
        (status = BAD_REQUEST, description = "Invalid username and/or password", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<UserInfo>, HandlerError> {
    let invalid = || HandlerError::bad_request("Invalid username and/or password.");

    // 1. Check if user exists
    let id = create_userid(payload.username.trim());
    let user = state.store.get_user(&id).await?.ok_or_else(invalid)?;

    // 2. Verify password
    let phash = PasswordHash::new(&user.password)?;
    if Scrypt
        .verify_password(payload.password.as_bytes(), &phash)
        .is_err()
    {
        tracing::info!("Failed login for {}", user.id);
        return Err(invalid());
    }

    // 3. Sign in
    Ok(Json(sign_in(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/v1/logout",
    tag = "Auth",
    responses(
        (status = OK, description = "Session ended", body = PlainSuccessResponse),
        (status = FORBIDDEN, description = "Not logged in", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn logout(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
) -> Result<PlainSuccessResponse, HandlerError> {
    state.store.delete_session(claim.sid).await?;
    tracing::info!("User {} logged out", claim.id);
    Ok(PlainSuccessResponse::ok("Logged out."))
}
