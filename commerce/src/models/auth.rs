use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    /// Unique user name
    pub username: String,
    /// User Email
    pub email: String,
    /// Plain password, hashed with scrypt before storage.
    pub password: String,
    /// Must equal `password`.
    pub confirmation: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    /// User name
    pub username: String,
    /// Plain password
    pub password: String,
}

/// Server side record backing a bearer token. Logging out deletes it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Ulid, hash key
    pub id: Ulid,
    /// Owner of the session
    pub user_id: String,
    /// Create time, in unix timestamp
    pub create_at: u64,
    /// Expire time, in unix timestamp
    pub expire_at: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Claim<'a> {
    /// Session ID
    pub sid: Ulid,
    /// User ID
    pub id: &'a str,
    /// User name
    pub username: &'a str,
    /// Audience
    pub aud: &'a str,
    /// Expire Time
    pub exp: u64,
    /// Issue Time
    pub iat: u64,
}

/// Decoded form of [`Claim`], stored in request extensions by the auth middleware.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ClaimOwned {
    pub sid: Ulid,
    pub id: String,
    pub username: String,
    pub aud: String,
    pub exp: u64,
    pub iat: u64,
}
