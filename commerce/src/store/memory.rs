use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::models::{
    auth::Session, bid::Bid, comment::Comment, listing::Listing, money::Price, user::User,
};

use super::{CommerceStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    sessions: HashMap<Ulid, Session>,
    listings: BTreeMap<Ulid, Listing>,
    bids: HashMap<Ulid, Vec<Bid>>,
    comments: HashMap<Ulid, Vec<Comment>>,
    watchlists: HashMap<String, BTreeSet<Ulid>>,
}

/// Process-local store for development and tests. Every write takes the
/// single table lock, so compare-and-set operations are trivially atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommerceStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(StoreError::Conflict(user.id.clone()));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn put_session(&self, session: &Session) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn get_session(&self, id: Ulid) -> StoreResult<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn delete_session(&self, id: Ulid) -> StoreResult<()> {
        self.tables.write().await.sessions.remove(&id);
        Ok(())
    }

    async fn put_listing(&self, listing: &Listing) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .listings
            .insert(listing.id, listing.clone());
        Ok(())
    }

    async fn get_listing(&self, id: Ulid) -> StoreResult<Option<Listing>> {
        Ok(self.tables.read().await.listings.get(&id).cloned())
    }

    async fn active_listings(&self) -> StoreResult<Vec<Listing>> {
        let tables = self.tables.read().await;
        Ok(tables
            .listings
            .values()
            .filter(|l| l.is_active)
            .cloned()
            .collect())
    }

    async fn active_listings_in_category(&self, category: &str) -> StoreResult<Vec<Listing>> {
        let tables = self.tables.read().await;
        Ok(tables
            .listings
            .values()
            .filter(|l| l.is_active && l.category == category)
            .cloned()
            .collect())
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let tables = self.tables.read().await;
        let distinct: BTreeSet<&str> = tables
            .listings
            .values()
            .map(|l| l.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        Ok(distinct.into_iter().map(str::to_string).collect())
    }

    async fn close_listing(&self, id: Ulid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.listings.get_mut(&id) {
            Some(listing) if listing.is_active => {
                listing.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn bids_for_listing(&self, listing_id: Ulid) -> StoreResult<Vec<Bid>> {
        let tables = self.tables.read().await;
        Ok(tables.bids.get(&listing_id).cloned().unwrap_or_default())
    }

    async fn record_bid(&self, bid: &Bid, expected: Price) -> StoreResult<bool> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let Some(listing) = tables.listings.get_mut(&bid.listing_id) else {
            return Ok(false);
        };
        if !listing.is_active || listing.current_price != expected {
            return Ok(false);
        }
        listing.current_price = bid.amount;
        tables
            .bids
            .entry(bid.listing_id)
            .or_default()
            .push(bid.clone());
        Ok(true)
    }

    async fn add_comment(&self, comment: &Comment) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .comments
            .entry(comment.listing_id)
            .or_default()
            .push(comment.clone());
        Ok(())
    }

    async fn comments_for_listing(&self, listing_id: Ulid) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.get(&listing_id).cloned().unwrap_or_default())
    }

    async fn watchlist_add(&self, user_id: &str, listing_id: Ulid) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .watchlists
            .entry(user_id.to_string())
            .or_default()
            .insert(listing_id);
        Ok(())
    }

    async fn watchlist_remove(&self, user_id: &str, listing_id: Ulid) -> StoreResult<()> {
        if let Some(set) = self.tables.write().await.watchlists.get_mut(user_id) {
            set.remove(&listing_id);
        }
        Ok(())
    }

    async fn watchlist(&self, user_id: &str) -> StoreResult<Vec<Ulid>> {
        let tables = self.tables.read().await;
        Ok(tables
            .watchlists
            .get(user_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}
