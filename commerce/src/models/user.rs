use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

use crate::constants::JWT_AUDIENCE;

use super::auth::{Claim, Session};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// ID
    pub id: String,
    /// User name
    pub username: String,
    /// User Email
    pub email: String,
    /// Signed JWT token.
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// ID derived from the user name, hash key
    pub id: String,
    /// Create time, in unix timestamp
    pub create_at: u64,
    /// User name
    pub username: String,
    /// User Email
    pub email: String,
    /// Password in scrypt PHC format.
    pub password: String,
}

impl User {
    pub fn new_session(&self, ttl: TimeDelta) -> Session {
        let now = chrono::Local::now();
        Session {
            id: Ulid::new(),
            user_id: self.id.clone(),
            create_at: now.timestamp() as u64,
            expire_at: (now + ttl).timestamp() as u64,
        }
    }

    pub fn create_claim(&self, session: &Session) -> Claim<'_> {
        Claim {
            sid: session.id,
            id: &self.id,
            username: &self.username,
            aud: JWT_AUDIENCE,
            exp: session.expire_at,
            iat: session.create_at,
        }
    }

    pub fn to_user_info(&self, token: String) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            token,
        }
    }
}
