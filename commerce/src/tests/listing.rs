use std::sync::Arc;

use axum::http::StatusCode;
use lambda_http::Error;
use ulid::Ulid;

use crate::{
    create_service,
    models::{
        comment::{AddCommentRequest, Comment},
        listing::{CategoryListings, CreateListingRequest, Listing, ListingDetail},
        ErrorResponse,
    },
    state::AppState,
    tests::{build_request, create_listing, parse_resp, register, send},
};

#[tokio::test]
async fn test_create_listing_shows_on_index() -> Result<(), Error> {
    let app = create_service(Arc::new(AppState::test().await?)).await?;
    let seller = register(&app, "seller").await?;

    let first = create_listing(&app, &seller.token, "Lamp", "Home", "10").await?;
    let second = create_listing(&app, &seller.token, "Bike", "Sport", "99.5").await?;

    let req = build_request::<()>("GET", "/v1/", None, None)?;
    let resp = send(&app, req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let listings: Vec<Listing> = parse_resp(resp).await?;
    let ids: Vec<Ulid> = listings.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let lamp = &listings[0];
    assert_eq!(lamp.owner_id, seller.id);
    assert_eq!(lamp.owner_name, "seller");
    assert_eq!(lamp.current_price.to_string(), "10.00");
    assert!(lamp.is_active);
    assert_eq!(listings[1].starting_bid.to_string(), "99.50");
    Ok(())
}

#[tokio::test]
async fn test_invalid_listing_rejected() -> Result<(), Error> {
    let state = Arc::new(AppState::test().await?);
    let app = create_service(state.clone()).await?;
    let seller = register(&app, "seller").await?;

    let blank = CreateListingRequest {
        title: " ".to_string(),
        description: String::new(),
        category: String::new(),
        image: None,
        starting_bid: "1.00".parse()?,
    };
    let req = build_request("POST", "/v1/create-listing", Some(&seller.token), Some(blank))?;
    let resp = send(&app, req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = parse_resp(resp).await?;
    assert_eq!(err.message, "Title must not be empty.");

    // Amounts with three decimals never reach the handler.
    let body = serde_json::json!({ "title": "Lamp", "startingBid": "1.001" });
    let req = build_request("POST", "/v1/create-listing", Some(&seller.token), Some(body))?;
    let resp = send(&app, req).await?;
    assert!(resp.status().is_client_error());

    let body = serde_json::json!({ "title": "Lamp", "startingBid": "10000.00" });
    let req = build_request("POST", "/v1/create-listing", Some(&seller.token), Some(body))?;
    let resp = send(&app, req).await?;
    assert!(resp.status().is_client_error());

    assert!(state.store.active_listings().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_listing_requires_login() -> Result<(), Error> {
    let app = create_service(Arc::new(AppState::test().await?)).await?;

    let body = serde_json::json!({ "title": "Lamp", "startingBid": "1.00" });
    let req = build_request("POST", "/v1/create-listing", None, Some(body))?;
    assert_eq!(send(&app, req).await?.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn test_missing_listing() -> Result<(), Error> {
    let app = create_service(Arc::new(AppState::test().await?)).await?;
    let user = register(&app, "user").await?;

    let uri = format!("/v1/listing/{}", Ulid::new());
    let req = build_request::<()>("GET", &uri, Some(&user.token), None)?;
    let resp = send(&app, req).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorResponse = parse_resp(resp).await?;
    assert_eq!(err.message, "Listing not found");
    Ok(())
}

#[tokio::test]
async fn test_comments() -> Result<(), Error> {
    let app = create_service(Arc::new(AppState::test().await?)).await?;
    let seller = register(&app, "seller").await?;
    let visitor = register(&app, "visitor").await?;
    let listing = create_listing(&app, &seller.token, "Clock", "Home", "3.00").await?;
    let uri = format!("/v1/listing/{}/comment", listing.id);

    for (token, content) in [(&visitor.token, "Does it tick?"), (&seller.token, "  Loudly.  ")] {
        let payload = AddCommentRequest {
            content: content.to_string(),
        };
        let req = build_request("POST", &uri, Some(token.as_str()), Some(payload))?;
        let resp = send(&app, req).await?;
        assert_eq!(resp.status(), StatusCode::OK);
        let comment: Comment = parse_resp(resp).await?;
        assert_eq!(comment.listing_id, listing.id);
    }

    let empty = AddCommentRequest {
        content: "   ".to_string(),
    };
    let req = build_request("POST", &uri, Some(&visitor.token), Some(empty))?;
    assert_eq!(send(&app, req).await?.status(), StatusCode::BAD_REQUEST);

    let detail_uri = format!("/v1/listing/{}", listing.id);
    let req = build_request::<()>("GET", &detail_uri, Some(&visitor.token), None)?;
    let detail: ListingDetail = parse_resp(send(&app, req).await?).await?;
    let texts: Vec<&str> = detail.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Does it tick?", "Loudly."]);
    assert_eq!(detail.comments[0].commenter_name, "visitor");
    assert!(!detail.is_owner);
    Ok(())
}

#[tokio::test]
async fn test_categories() -> Result<(), Error> {
    let app = create_service(Arc::new(AppState::test().await?)).await?;
    let seller = register(&app, "seller").await?;
    create_listing(&app, &seller.token, "Bike", "Sport", "1").await?;
    let lamp = create_listing(&app, &seller.token, "Lamp", "Home", "1").await?;
    let rug = create_listing(&app, &seller.token, "Rug", "Home", "1").await?;
    create_listing(&app, &seller.token, "Mystery", "", "1").await?;

    let req = build_request::<()>("GET", "/v1/categories", None, None)?;
    let categories: Vec<String> = parse_resp(send(&app, req).await?).await?;
    assert_eq!(categories, vec!["Home", "Sport"]);

    let uri = format!("/v1/listing/{}/close", rug.id);
    let req = build_request::<()>("POST", &uri, Some(&seller.token), None)?;
    assert_eq!(send(&app, req).await?.status(), StatusCode::OK);

    let req = build_request::<()>("GET", "/v1/categories/Home", None, None)?;
    let resp = send(&app, req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: CategoryListings = parse_resp(resp).await?;
    assert_eq!(page.category, "Home");
    let ids: Vec<Ulid> = page.listings.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![lamp.id]);

    // Closed listings still count towards the category list.
    let req = build_request::<()>("GET", "/v1/categories", None, None)?;
    let categories: Vec<String> = parse_resp(send(&app, req).await?).await?;
    assert_eq!(categories, vec!["Home", "Sport"]);

    let req = build_request::<()>("GET", "/v1/categories/Garden", None, None)?;
    let page: CategoryListings = parse_resp(send(&app, req).await?).await?;
    assert!(page.listings.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_closed_listing_leaves_index() -> Result<(), Error> {
    let app = create_service(Arc::new(AppState::test().await?)).await?;
    let seller = register(&app, "seller").await?;
    let kept = create_listing(&app, &seller.token, "Lamp", "Home", "1").await?;
    let closed = create_listing(&app, &seller.token, "Rug", "Home", "1").await?;

    let uri = format!("/v1/listing/{}/close", closed.id);
    let req = build_request::<()>("POST", &uri, Some(&seller.token), None)?;
    assert_eq!(send(&app, req).await?.status(), StatusCode::OK);

    let req = build_request::<()>("GET", "/v1/", None, None)?;
    let listings: Vec<Listing> = parse_resp(send(&app, req).await?).await?;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, kept.id);

    // The page itself stays reachable.
    let uri = format!("/v1/listing/{}", closed.id);
    let req = build_request::<()>("GET", &uri, Some(&seller.token), None)?;
    let detail: ListingDetail = parse_resp(send(&app, req).await?).await?;
    assert!(!detail.listing.is_active);
    Ok(())
}
