use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

use super::auth::ClaimOwned;
use crate::utils::next_id;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Target listing, hash key
    pub listing_id: Ulid,
    /// Ulid, range key
    pub id: Ulid,
    /// Create time, in unix timestamp
    pub create_at: u64,
    pub commenter_id: String,
    pub commenter_name: String,
    pub text: String,
}

impl Comment {
    pub fn new(listing_id: Ulid, commenter: &ClaimOwned, text: String) -> Self {
        Self {
            listing_id,
            id: next_id(),
            create_at: chrono::Local::now().timestamp_millis() as u64,
            commenter_id: commenter.id.clone(),
            commenter_name: commenter.username.clone(),
            text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    /// Comment text, must not be blank.
    pub content: String,
}
