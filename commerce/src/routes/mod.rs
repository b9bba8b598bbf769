use ulid::Ulid;

use crate::{errors::HandlerError, models::listing::Listing, state::AppState};

pub mod auth;
pub mod category;
pub mod listing;
pub mod watchlist;

async fn load_listing(state: &AppState, id: Ulid) -> Result<Listing, HandlerError> {
    state
        .store
        .get_listing(id)
        .await?
        .ok_or_else(|| HandlerError::not_found("Listing"))
}

/// Oldest first; ulids sort by creation time.
fn sort_by_creation(listings: &mut [Listing]) {
    listings.sort_by_key(|l| l.id);
}
