use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    Extension,
};
use lambda_http::tracing;
use ulid::Ulid;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    constants::MAX_BID_RETRIES,
    errors::HandlerError,
    models::{
        auth::ClaimOwned,
        bid::{Bid, PlaceBidRequest, PlaceBidResponse},
        comment::{AddCommentRequest, Comment},
        listing::{CreateListingRequest, Listing, ListingDetail, ListingRef},
        PlainSuccessResponse,
    },
    state::AppState,
};

use super::{load_listing, sort_by_creation};

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new().routes(routes!(get_active_listings))
}

pub fn authed_router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(create_listing))
        .routes(routes!(get_listing))
        .routes(routes!(place_bid))
        .routes(routes!(close_listing))
        .routes(routes!(add_comment))
}

/// Get all active listings.
#[utoipa::path(
    get,
    path = "/v1/",
    tag = "Listing",
    responses(
        (status = OK, description = "Active listings, oldest first", body = Vec<Listing>),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn get_active_listings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Listing>>, HandlerError> {
    let mut listings = state.store.active_listings().await?;
    sort_by_creation(&mut listings);
    Ok(Json(listings))
}

/// Create a listing owned by the caller.
#[utoipa::path(
    post,
    path = "/v1/create-listing",
    tag = "Listing",
    request_body = CreateListingRequest,
    responses(
        (status = OK, description = "Listing created", body = ListingRef),
        (status = BAD_REQUEST, description = "Invalid listing", body = HandlerError),
        (status = FORBIDDEN, description = "Not logged in", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn create_listing(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateListingRequest>,
) -> Result<Json<ListingRef>, HandlerError> {
    payload.validate().map_err(HandlerError::bad_request)?;

    let listing = Listing::new_from_request(&claim, payload);
    state.store.put_listing(&listing).await?;
    tracing::info!("User {} listed {}", claim.id, listing.id);

    Ok(Json(ListingRef { id: listing.id }))
}

/// Get a listing with its bids, comments and the caller's relation to it.
#[utoipa::path(
    get,
    path = "/v1/listing/{listingId}",
    tag = "Listing",
    params(
        ("listingId" = String, Path, description = "Listing ID to get", format = Ulid),
    ),
    responses(
        (status = OK, description = "Returns specified listing", body = ListingDetail),
        (status = FORBIDDEN, description = "Not logged in", body = HandlerError),
        (status = NOT_FOUND, description = "Listing not found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn get_listing(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Ulid>,
) -> Result<Json<ListingDetail>, HandlerError> {
    let listing = load_listing(&state, listing_id).await?;

    let mut bids = state.store.bids_for_listing(listing_id).await?;
    bids.sort_by(|a, b| b.amount.cmp(&a.amount));
    let mut comments = state.store.comments_for_listing(listing_id).await?;
    comments.sort_by_key(|c| c.id);
    let in_watchlist = state
        .store
        .watchlist(&claim.id)
        .await?
        .contains(&listing_id);

    let detail = ListingDetail {
        current_price: listing.current_price,
        in_watchlist,
        is_owner: listing.is_owner(&claim.id),
        is_winner: listing.is_winner(&bids, &claim.id),
        winning_bid: listing.winning_bid(&bids).cloned(),
        listing,
        bids,
        comments,
    };

    Ok(Json(detail))
}

/// Bid on a listing. The amount must exceed the current price.
#[utoipa::path(
    post,
    path = "/v1/listing/{listingId}/bid",
    tag = "Listing",
    params(
        ("listingId" = String, Path, description = "Listing ID to bid on", format = Ulid),
    ),
    request_body = PlaceBidRequest,
    responses(
        (status = OK, description = "Bid placed", body = PlaceBidResponse),
        (status = BAD_REQUEST, description = "Bid too low or auction closed", body = HandlerError),
        (status = FORBIDDEN, description = "Not logged in", body = HandlerError),
        (status = NOT_FOUND, description = "Listing not found", body = HandlerError),
        (status = CONFLICT, description = "Lost too many races against other bidders", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn place_bid(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Ulid>,
    Json(payload): Json<PlaceBidRequest>,
) -> Result<Json<PlaceBidResponse>, HandlerError> {
    for _ in 0..MAX_BID_RETRIES {
        let listing = load_listing(&state, listing_id).await?;
        if let Err(rejection) = listing.evaluate_bid(payload.amount) {
            tracing::info!(
                "Rejected bid of {} on {} at {}: {}",
                payload.amount,
                listing_id,
                listing.current_price,
                rejection
            );
            return Err(HandlerError::bad_request(rejection.to_string()));
        }

        let bid = Bid::new(listing_id, &claim, payload.amount);
        if state.store.record_bid(&bid, listing.current_price).await? {
            tracing::info!("User {} bid {} on {}", claim.id, bid.amount, listing_id);
            return Ok(Json(PlaceBidResponse {
                message: "Bid placed successfully.".to_string(),
                current_price: bid.amount,
                bid,
            }));
        }

        tracing::warn!(
            "Price of {} moved away from {} during bid, retrying",
            listing_id,
            listing.current_price
        );
    }

    Err(HandlerError::conflict(
        "The listing is receiving many bids, please try again.",
    ))
}

/// Close the auction. Only the owner may do this, and only once.
#[utoipa::path(
    post,
    path = "/v1/listing/{listingId}/close",
    tag = "Listing",
    params(
        ("listingId" = String, Path, description = "Listing ID to close", format = Ulid),
    ),
    responses(
        (status = OK, description = "Auction closed", body = PlainSuccessResponse),
        (status = FORBIDDEN, description = "Not the owner", body = HandlerError),
        (status = NOT_FOUND, description = "Listing not found", body = HandlerError),
        (status = CONFLICT, description = "Already closed", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn close_listing(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Ulid>,
) -> Result<PlainSuccessResponse, HandlerError> {
    let listing = load_listing(&state, listing_id).await?;
    if !listing.is_owner(&claim.id) {
        tracing::warn!("User {} tried to close {} they do not own", claim.id, listing_id);
        return Err(HandlerError::forbidden(
            "Only the owner can close this auction.",
        ));
    }

    if !state.store.close_listing(listing_id).await? {
        return Err(HandlerError::conflict("This auction is already closed."));
    }
    tracing::info!("Auction {} closed by owner", listing_id);

    Ok(PlainSuccessResponse::ok("Auction closed."))
}

/// Comment on a listing.
#[utoipa::path(
    post,
    path = "/v1/listing/{listingId}/comment",
    tag = "Listing",
    params(
        ("listingId" = String, Path, description = "Listing ID to comment on", format = Ulid),
    ),
    request_body = AddCommentRequest,
    responses(
        (status = OK, description = "Comment added", body = Comment),
        (status = BAD_REQUEST, description = "Empty comment", body = HandlerError),
        (status = FORBIDDEN, description = "Not logged in", body = HandlerError),
        (status = NOT_FOUND, description = "Listing not found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn add_comment(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Ulid>,
    Json(payload): Json<AddCommentRequest>,
) -> Result<Json<Comment>, HandlerError> {
    let text = payload.content.trim();
    if text.is_empty() {
        return Err(HandlerError::bad_request("Comment must not be empty."));
    }
    load_listing(&state, listing_id).await?;

    let comment = Comment::new(listing_id, &claim, text.to_string());
    state.store.add_comment(&comment).await?;

    Ok(Json(comment))
}
