pub const USER_TABLE: &str = "commerce-users";
pub const SESSION_TABLE: &str = "commerce-sessions";
pub const LISTING_TABLE: &str = "commerce-listings";
pub const BID_TABLE: &str = "commerce-bids";
pub const COMMENT_TABLE: &str = "commerce-comments";
pub const WATCHLIST_TABLE: &str = "commerce-watchlist";

pub const JWT_AUDIENCE: &str = "commerce";

/// Attempts at advancing a listing's price before giving up on a contended bid.
pub const MAX_BID_RETRIES: usize = 5;
