use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::{
    operation::{query::builders::QueryFluentBuilder, scan::builders::ScanFluentBuilder},
    types::{AttributeValue, Put, TransactWriteItem, Update},
    Client,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_dynamo::{from_item, from_items, to_attribute_value, to_item};
use ulid::Ulid;

use crate::{
    constants::{
        BID_TABLE, COMMENT_TABLE, LISTING_TABLE, SESSION_TABLE, USER_TABLE, WATCHLIST_TABLE,
    },
    models::{
        auth::Session, bid::Bid, comment::Comment, listing::Listing, money::Price, user::User,
    },
};

use super::{CommerceStore, StoreError, StoreResult};

type Item = HashMap<String, AttributeValue>;

#[derive(Deserialize)]
struct CategoryRow {
    category: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WatchRow {
    listing_id: Ulid,
}

/// DynamoDB tables, one per record kind. Bids and comments are keyed by
/// `listingId` + `id`, the watchlist by `userId` + `listingId`.
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    async fn get_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: String,
    ) -> StoreResult<Option<T>> {
        let resp = self
            .client
            .get_item()
            .table_name(table)
            .key("id", AttributeValue::S(id))
            .send()
            .await?;

        match resp.item {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn scan_all<T: DeserializeOwned>(&self, scan: ScanFluentBuilder) -> StoreResult<Vec<T>> {
        let mut out = Vec::new();
        let mut start_key: Option<Item> = None;
        loop {
            let resp = scan
                .clone()
                .set_exclusive_start_key(start_key.take())
                .send()
                .await?;
            let page: Vec<T> = from_items(resp.items.unwrap_or_default())?;
            out.extend(page);
            match resp.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        Ok(out)
    }

    async fn query_all<T: DeserializeOwned>(
        &self,
        query: QueryFluentBuilder,
    ) -> StoreResult<Vec<T>> {
        let mut out = Vec::new();
        let mut start_key: Option<Item> = None;
        loop {
            let resp = query
                .clone()
                .set_exclusive_start_key(start_key.take())
                .send()
                .await?;
            let page: Vec<T> = from_items(resp.items.unwrap_or_default())?;
            out.extend(page);
            match resp.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        Ok(out)
    }

    fn query_listing(&self, table: &str, listing_id: Ulid) -> QueryFluentBuilder {
        self.client
            .query()
            .table_name(table)
            .key_condition_expression("listingId = :lid")
            .expression_attribute_values(":lid", AttributeValue::S(listing_id.to_string()))
    }
}

#[async_trait]
impl CommerceStore for DynamoStore {
    fn backend_tag(&self) -> &'static str {
        "dynamodb"
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        self.get_by_id(USER_TABLE, id.to_string()).await
    }

    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let result = self
            .client
            .put_item()
            .table_name(USER_TABLE)
            .set_item(Some(to_item(user)?))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::Conflict(user.id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put_session(&self, session: &Session) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(SESSION_TABLE)
            .set_item(Some(to_item(session)?))
            .send()
            .await?;
        Ok(())
    }

    async fn get_session(&self, id: Ulid) -> StoreResult<Option<Session>> {
        self.get_by_id(SESSION_TABLE, id.to_string()).await
    }

    async fn delete_session(&self, id: Ulid) -> StoreResult<()> {
        self.client
            .delete_item()
            .table_name(SESSION_TABLE)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await?;
        Ok(())
    }

    async fn put_listing(&self, listing: &Listing) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(LISTING_TABLE)
            .set_item(Some(to_item(listing)?))
            .send()
            .await?;
        Ok(())
    }

    async fn get_listing(&self, id: Ulid) -> StoreResult<Option<Listing>> {
        self.get_by_id(LISTING_TABLE, id.to_string()).await
    }

    async fn active_listings(&self) -> StoreResult<Vec<Listing>> {
        let scan = self
            .client
            .scan()
            .table_name(LISTING_TABLE)
            .filter_expression("isActive = :active")
            .expression_attribute_values(":active", AttributeValue::Bool(true));
        self.scan_all(scan).await
    }

    async fn active_listings_in_category(&self, category: &str) -> StoreResult<Vec<Listing>> {
        let scan = self
            .client
            .scan()
            .table_name(LISTING_TABLE)
            .filter_expression("isActive = :active AND #cat = :cat")
            .expression_attribute_names("#cat", "category")
            .expression_attribute_values(":active", AttributeValue::Bool(true))
            .expression_attribute_values(":cat", AttributeValue::S(category.to_string()));
        self.scan_all(scan).await
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let scan = self
            .client
            .scan()
            .table_name(LISTING_TABLE)
            .projection_expression("#cat")
            .expression_attribute_names("#cat", "category");
        let rows: Vec<CategoryRow> = self.scan_all(scan).await?;
        let distinct: BTreeSet<String> = rows
            .into_iter()
            .map(|r| r.category)
            .filter(|c| !c.is_empty())
            .collect();
        Ok(distinct.into_iter().collect())
    }

    async fn close_listing(&self, id: Ulid) -> StoreResult<bool> {
        let result = self
            .client
            .update_item()
            .table_name(LISTING_TABLE)
            .key("id", AttributeValue::S(id.to_string()))
            .update_expression("SET isActive = :closed")
            .condition_expression("isActive = :open")
            .expression_attribute_values(":closed", AttributeValue::Bool(false))
            .expression_attribute_values(":open", AttributeValue::Bool(true))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn bids_for_listing(&self, listing_id: Ulid) -> StoreResult<Vec<Bid>> {
        self.query_all(self.query_listing(BID_TABLE, listing_id)).await
    }

    async fn record_bid(&self, bid: &Bid, expected: Price) -> StoreResult<bool> {
        let listing_update = TransactWriteItem::builder()
            .update(
                Update::builder()
                    .table_name(LISTING_TABLE)
                    .key("id", AttributeValue::S(bid.listing_id.to_string()))
                    .update_expression("SET currentPrice = :amount")
                    .condition_expression("currentPrice = :expected AND isActive = :active")
                    .expression_attribute_values(":amount", to_attribute_value(bid.amount)?)
                    .expression_attribute_values(":expected", to_attribute_value(expected)?)
                    .expression_attribute_values(":active", AttributeValue::Bool(true))
                    .build()?,
            )
            .build();

        let bid_put = TransactWriteItem::builder()
            .put(
                Put::builder()
                    .table_name(BID_TABLE)
                    .set_item(Some(to_item(bid)?))
                    .build()?,
            )
            .build();

        let result = self
            .client
            .transact_write_items()
            .transact_items(listing_update)
            .transact_items(bid_put)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_transaction_canceled_exception()) =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn add_comment(&self, comment: &Comment) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(COMMENT_TABLE)
            .set_item(Some(to_item(comment)?))
            .send()
            .await?;
        Ok(())
    }

    async fn comments_for_listing(&self, listing_id: Ulid) -> StoreResult<Vec<Comment>> {
        self.query_all(self.query_listing(COMMENT_TABLE, listing_id)).await
    }

    async fn watchlist_add(&self, user_id: &str, listing_id: Ulid) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(WATCHLIST_TABLE)
            .item("userId", AttributeValue::S(user_id.to_string()))
            .item("listingId", AttributeValue::S(listing_id.to_string()))
            .send()
            .await?;
        Ok(())
    }

    async fn watchlist_remove(&self, user_id: &str, listing_id: Ulid) -> StoreResult<()> {
        self.client
            .delete_item()
            .table_name(WATCHLIST_TABLE)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .key("listingId", AttributeValue::S(listing_id.to_string()))
            .send()
            .await?;
        Ok(())
    }

    async fn watchlist(&self, user_id: &str) -> StoreResult<Vec<Ulid>> {
        let query = self
            .client
            .query()
            .table_name(WATCHLIST_TABLE)
            .key_condition_expression("userId = :uid")
            .expression_attribute_values(":uid", AttributeValue::S(user_id.to_string()));
        let rows: Vec<WatchRow> = self.query_all(query).await?;
        Ok(rows.into_iter().map(|r| r.listing_id).collect())
    }
}
