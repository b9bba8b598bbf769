use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

use super::{
    auth::ClaimOwned,
    bid::{highest_bid, Bid},
    comment::Comment,
    money::Price,
};
use crate::utils::next_id;

pub const MAX_TITLE_LEN: usize = 64;
pub const MAX_CATEGORY_LEN: usize = 64;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Ulid, hash key
    pub id: Ulid,
    /// Create time, in unix timestamp
    pub create_at: u64,
    /// Owner's user id
    pub owner_id: String,
    /// Owner's user name
    pub owner_name: String,
    /// Listing title, at most 64 chars.
    pub title: String,
    /// Listing description
    pub description: String,
    /// Category, at most 64 chars.
    pub category: String,
    /// Image URL
    pub image: Option<String>,
    /// Opening price
    pub starting_bid: Price,
    /// Highest accepted bid, or `startingBid` before the first bid.
    pub current_price: Price,
    /// Open for bidding. Only ever goes from true to false.
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BidRejection {
    #[error("This auction is closed.")]
    Closed,
    #[error("Bid must be higher than the current price.")]
    TooLow { current_price: Price },
}

impl Listing {
    pub fn new_from_request(owner: &ClaimOwned, req: CreateListingRequest) -> Self {
        Self {
            id: next_id(),
            create_at: chrono::Local::now().timestamp_millis() as u64,
            owner_id: owner.id.clone(),
            owner_name: owner.username.clone(),
            title: req.title.trim().to_string(),
            description: req.description,
            category: req.category.trim().to_string(),
            image: req.image.filter(|url| !url.trim().is_empty()),
            starting_bid: req.starting_bid,
            current_price: req.starting_bid,
            is_active: true,
        }
    }

    /// A bid is acceptable only on an open listing and only above the current price.
    pub fn evaluate_bid(&self, amount: Price) -> Result<(), BidRejection> {
        if !self.is_active {
            return Err(BidRejection::Closed);
        }
        if amount <= self.current_price {
            return Err(BidRejection::TooLow {
                current_price: self.current_price,
            });
        }
        Ok(())
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    /// The highest bid once the auction is closed.
    pub fn winning_bid<'a>(&self, bids: &'a [Bid]) -> Option<&'a Bid> {
        if self.is_active {
            return None;
        }
        highest_bid(bids)
    }

    pub fn is_winner(&self, bids: &[Bid], user_id: &str) -> bool {
        self.winning_bid(bids)
            .is_some_and(|bid| bid.bidder_id == user_id)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    /// Listing title
    pub title: String,
    /// Listing description
    #[serde(default)]
    pub description: String,
    /// Category
    #[serde(default)]
    pub category: String,
    /// Image URL, http or https.
    #[serde(default)]
    pub image: Option<String>,
    /// Opening price, defaults to 0.00.
    #[serde(default)]
    pub starting_bid: Price,
}

impl CreateListingRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title must not be empty.");
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err("Title must be at most 64 characters.");
        }
        if self.category.trim().chars().count() > MAX_CATEGORY_LEN {
            return Err("Category must be at most 64 characters.");
        }
        if let Some(url) = self.image.as_deref().map(str::trim) {
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err("Image must be an http or https URL.");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRef {
    /// Ulid of the created listing
    pub id: Ulid,
}

/// Everything the listing page shows, from the caller's point of view.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetail {
    pub listing: Listing,
    /// Bids, highest first.
    pub bids: Vec<Bid>,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
    pub current_price: Price,
    pub in_watchlist: bool,
    pub is_owner: bool,
    pub is_winner: bool,
    /// Highest bid once the listing is closed.
    pub winning_bid: Option<Bid>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListings {
    pub category: String,
    /// Active listings in the category.
    pub listings: Vec<Listing>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistStatus {
    pub listing_id: Ulid,
    pub in_watchlist: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> ClaimOwned {
        ClaimOwned {
            sid: Ulid::new(),
            id: "user_owner".to_string(),
            username: "owner".to_string(),
            aud: "commerce".to_string(),
            exp: 0,
            iat: 0,
        }
    }

    fn listing(starting_bid: &str) -> Listing {
        Listing::new_from_request(
            &owner(),
            CreateListingRequest {
                title: "Lamp".to_string(),
                description: "Brass".to_string(),
                category: "Home".to_string(),
                image: None,
                starting_bid: starting_bid.parse().unwrap(),
            },
        )
    }

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[test]
    fn bid_must_beat_current_price() {
        let mut listing = listing("10.00");
        assert_eq!(
            listing.evaluate_bid(price("9.99")),
            Err(BidRejection::TooLow {
                current_price: price("10.00")
            })
        );
        assert!(listing.evaluate_bid(price("10.00")).is_err());
        assert_eq!(listing.evaluate_bid(price("15.00")), Ok(()));

        listing.current_price = price("15.00");
        assert!(listing.evaluate_bid(price("12.00")).is_err());
    }

    #[test]
    fn closed_listing_rejects_bids() {
        let mut listing = listing("1.00");
        listing.is_active = false;
        assert_eq!(listing.evaluate_bid(price("100.00")), Err(BidRejection::Closed));
    }

    #[test]
    fn winner_only_after_close() {
        let mut listing = listing("1.00");
        let bids = vec![Bid {
            listing_id: listing.id,
            id: Ulid::new(),
            create_at: 0,
            bidder_id: "user_bidder".to_string(),
            bidder_name: "bidder".to_string(),
            amount: price("2.00"),
        }];
        assert!(!listing.is_winner(&bids, "user_bidder"));

        listing.is_active = false;
        assert!(listing.is_winner(&bids, "user_bidder"));
        assert!(!listing.is_winner(&bids, "user_owner"));
        assert!(!listing.is_winner(&[], "user_bidder"));
    }

    #[test]
    fn create_request_validation() {
        let mut req = CreateListingRequest {
            title: "  ".to_string(),
            description: String::new(),
            category: String::new(),
            image: None,
            starting_bid: Price::ZERO,
        };
        assert!(req.validate().is_err());

        req.title = "Chair".to_string();
        assert!(req.validate().is_ok());

        req.image = Some("ftp://example.com/a.png".to_string());
        assert!(req.validate().is_err());

        req.image = Some("https://example.com/a.png".to_string());
        assert!(req.validate().is_ok());

        req.title = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(req.validate().is_err());
    }
}
