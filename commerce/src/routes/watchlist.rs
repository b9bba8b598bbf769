use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    Extension,
};
use ulid::Ulid;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    errors::HandlerError,
    models::{
        auth::ClaimOwned,
        listing::{Listing, WatchlistStatus},
    },
    state::AppState,
};

use super::{load_listing, sort_by_creation};

pub fn authed_router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(get_watchlist))
        .routes(routes!(watchlist_add))
        .routes(routes!(watchlist_remove))
}

/// Listings on the caller's watchlist.
#[utoipa::path(
    get,
    path = "/v1/watchlist",
    tag = "Watchlist",
    responses(
        (status = OK, description = "Watched listings", body = Vec<Listing>),
        (status = FORBIDDEN, description = "Not logged in", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn get_watchlist(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Listing>>, HandlerError> {
    let ids = state.store.watchlist(&claim.id).await?;

    let mut listings = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(listing) = state.store.get_listing(id).await? {
            listings.push(listing);
        }
    }
    sort_by_creation(&mut listings);

    Ok(Json(listings))
}

/// Add a listing to the caller's watchlist. Adding twice is a no-op.
#[utoipa::path(
    post,
    path = "/v1/listing/{listingId}/watchlist/add",
    tag = "Watchlist",
    params(
        ("listingId" = String, Path, description = "Listing ID to watch", format = Ulid),
    ),
    responses(
        (status = OK, description = "Listing is watched", body = WatchlistStatus),
        (status = FORBIDDEN, description = "Not logged in", body = HandlerError),
        (status = NOT_FOUND, description = "Listing not found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn watchlist_add(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Ulid>,
) -> Result<Json<WatchlistStatus>, HandlerError> {
    load_listing(&state, listing_id).await?;
    state.store.watchlist_add(&claim.id, listing_id).await?;

    Ok(Json(WatchlistStatus {
        listing_id,
        in_watchlist: true,
    }))
}

/// Remove a listing from the caller's watchlist. Removing a non-member is a no-op.
#[utoipa::path(
    post,
    path = "/v1/listing/{listingId}/watchlist/remove",
    tag = "Watchlist",
    params(
        ("listingId" = String, Path, description = "Listing ID to stop watching", format = Ulid),
    ),
    responses(
        (status = OK, description = "Listing is not watched", body = WatchlistStatus),
        (status = FORBIDDEN, description = "Not logged in", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn watchlist_remove(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Ulid>,
) -> Result<Json<WatchlistStatus>, HandlerError> {
    state.store.watchlist_remove(&claim.id, listing_id).await?;

    Ok(Json(WatchlistStatus {
        listing_id,
        in_watchlist: false,
    }))
}
