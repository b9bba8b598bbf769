use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

use super::{auth::ClaimOwned, money::Price};
use crate::utils::next_id;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    /// Target listing, hash key
    pub listing_id: Ulid,
    /// Ulid, range key
    pub id: Ulid,
    /// Create time, in unix timestamp
    pub create_at: u64,
    /// Bidder's user id
    pub bidder_id: String,
    /// Bidder's user name
    pub bidder_name: String,
    /// Bid amount.
    pub amount: Price,
}

impl Bid {
    pub fn new(listing_id: Ulid, bidder: &ClaimOwned, amount: Price) -> Self {
        Self {
            listing_id,
            id: next_id(),
            create_at: chrono::Local::now().timestamp_millis() as u64,
            bidder_id: bidder.id.clone(),
            bidder_name: bidder.username.clone(),
            amount,
        }
    }
}

/// Highest bid of a listing. Accepted bids strictly increase, so there are no ties.
pub fn highest_bid(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().max_by_key(|b| b.amount)
}

/// Amount of the highest bid, or `starting_bid` when nobody has bid yet.
pub fn current_price(starting_bid: Price, bids: &[Bid]) -> Price {
    highest_bid(bids).map_or(starting_bid, |b| b.amount)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    /// Offered amount, must exceed the current price.
    pub amount: Price,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidResponse {
    pub message: String,
    /// The recorded bid.
    pub bid: Bid,
    /// Listing price after the bid.
    pub current_price: Price,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(amount: &str) -> Bid {
        Bid {
            listing_id: Ulid::nil(),
            id: Ulid::new(),
            create_at: 0,
            bidder_id: "u".to_string(),
            bidder_name: "u".to_string(),
            amount: amount.parse().unwrap(),
        }
    }

    #[test]
    fn current_price_falls_back_to_starting_bid() {
        let start: Price = "10.00".parse().unwrap();
        assert_eq!(current_price(start, &[]), start);
    }

    #[test]
    fn current_price_is_max_amount() {
        let start: Price = "10.00".parse().unwrap();
        let bids = vec![bid("11.00"), bid("25.50"), bid("12.00")];
        assert_eq!(current_price(start, &bids).to_string(), "25.50");
        assert_eq!(highest_bid(&bids).unwrap().amount, bids[1].amount);
    }
}
