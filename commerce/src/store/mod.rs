use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::SdkError as DynamoSdkError,
    operation::{
        delete_item::DeleteItemError, get_item::GetItemError, put_item::PutItemError,
        query::QueryError, scan::ScanError, transact_write_items::TransactWriteItemsError,
        update_item::UpdateItemError,
    },
};
use ulid::Ulid;

use crate::models::{
    auth::Session, bid::Bid, comment::Comment, listing::Listing, money::Price, user::User,
};

pub mod dynamo;
pub mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record already exists: {0}")]
    Conflict(String),
    #[error("DynamoDB Error: GetItem: {0}")]
    DynamoDBGetError(#[from] DynamoSdkError<GetItemError>),
    #[error("DynamoDB Error: PutItem: {0}")]
    DynamoDBPutError(#[from] DynamoSdkError<PutItemError>),
    #[error("DynamoDB Error: Query: {0}")]
    DynamoDBQueryError(#[from] DynamoSdkError<QueryError>),
    #[error("DynamoDB Error: Scan: {0}")]
    DynamoDBScanError(#[from] DynamoSdkError<ScanError>),
    #[error("DynamoDB Error: DeleteItem: {0}")]
    DynamoDBDeleteError(#[from] DynamoSdkError<DeleteItemError>),
    #[error("DynamoDB Error: UpdateItem: {0}")]
    DynamoDBUpdateError(#[from] DynamoSdkError<UpdateItemError>),
    #[error("DynamoDB Error: TransactWriteItems: {0}")]
    DynamoDBTransactWriteItemsError(#[from] DynamoSdkError<TransactWriteItemsError>),
    #[error("Failed to build transaction: {0}")]
    TransactionBuildError(#[from] aws_sdk_dynamodb::error::BuildError),
    #[error("SerdeDynamo failed to process DynamoDB data: {0}")]
    SerdeDynamoError(#[from] serde_dynamo::Error),
}

impl StoreError {
    /// HTTP status returned by the backing service, when there was one.
    pub fn inner_status(&self) -> Option<u16> {
        match self {
            StoreError::DynamoDBGetError(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::DynamoDBPutError(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::DynamoDBQueryError(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::DynamoDBScanError(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::DynamoDBDeleteError(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::DynamoDBUpdateError(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::DynamoDBTransactWriteItemsError(e) => {
                e.raw_response().map(|r| r.status().as_u16())
            }
            _ => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for users, sessions, listings and everything hanging off them.
#[async_trait]
pub trait CommerceStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>>;
    /// Fails with [`StoreError::Conflict`] when the id is taken.
    async fn create_user(&self, user: &User) -> StoreResult<()>;

    async fn put_session(&self, session: &Session) -> StoreResult<()>;
    async fn get_session(&self, id: Ulid) -> StoreResult<Option<Session>>;
    async fn delete_session(&self, id: Ulid) -> StoreResult<()>;

    async fn put_listing(&self, listing: &Listing) -> StoreResult<()>;
    async fn get_listing(&self, id: Ulid) -> StoreResult<Option<Listing>>;
    async fn active_listings(&self) -> StoreResult<Vec<Listing>>;
    async fn active_listings_in_category(&self, category: &str) -> StoreResult<Vec<Listing>>;
    /// Distinct categories over every listing, open or closed.
    async fn categories(&self) -> StoreResult<Vec<String>>;
    /// Flips the active flag off. Returns false if the listing was not active.
    async fn close_listing(&self, id: Ulid) -> StoreResult<bool>;

    async fn bids_for_listing(&self, listing_id: Ulid) -> StoreResult<Vec<Bid>>;
    /// Appends `bid` and moves the listing's current price to `bid.amount` in
    /// one atomic step, provided the listing is still active and still priced
    /// at `expected`. Returns false, writing nothing, when that no longer holds.
    async fn record_bid(&self, bid: &Bid, expected: Price) -> StoreResult<bool>;

    async fn add_comment(&self, comment: &Comment) -> StoreResult<()>;
    async fn comments_for_listing(&self, listing_id: Ulid) -> StoreResult<Vec<Comment>>;

    async fn watchlist_add(&self, user_id: &str, listing_id: Ulid) -> StoreResult<()>;
    async fn watchlist_remove(&self, user_id: &str, listing_id: Ulid) -> StoreResult<()>;
    async fn watchlist(&self, user_id: &str) -> StoreResult<Vec<Ulid>>;
}
