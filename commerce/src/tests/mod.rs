mod listing;

use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::StatusCode,
    response::Response,
    Router,
};
use lambda_http::{tower::ServiceExt, Error};
use serde::{de::DeserializeOwned, Serialize};

use crate::models::{
    auth::RegisterPayload,
    listing::{CreateListingRequest, ListingRef},
    user::UserInfo,
};

const TEST_PASSWORD: &str = "01JFDQ42PN3MDE6QMPZ98TCTJE";

async fn parse_resp<T: DeserializeOwned>(resp: Response<Body>) -> Result<T, Error> {
    let body = resp.into_body();
    let limit = body.size_hint().upper().unwrap_or(u64::MAX) as usize;
    let data = axum::body::to_bytes(body, limit).await?;
    let res: T = serde_json::from_slice(&data)?;

    Ok(res)
}

fn build_request<T: Serialize>(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<T>,
) -> Result<Request<Body>, Error> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(v) => {
            let content = serde_json::to_string(&v)?;
            builder
                .header("Content-Type", "application/json")
                .body(Body::new(content))
        }
        None => builder.body(Body::empty()),
    }?;
    Ok(req)
}

async fn send(app: &Router, req: Request<Body>) -> Result<Response<Body>, Error> {
    Ok(app.clone().oneshot(req).await?)
}

async fn register(app: &Router, username: &str) -> Result<UserInfo, Error> {
    let payload = RegisterPayload {
        username: username.to_string(),
        email: format!("{}@test.com", username),
        password: TEST_PASSWORD.to_string(),
        confirmation: TEST_PASSWORD.to_string(),
    };
    let req = build_request("POST", "/v1/register", None, Some(payload))?;
    let resp = send(app, req).await?;

    assert_eq!(resp.status(), StatusCode::OK);

    parse_resp(resp).await
}

async fn create_listing(
    app: &Router,
    token: &str,
    title: &str,
    category: &str,
    starting_bid: &str,
) -> Result<ListingRef, Error> {
    let payload = CreateListingRequest {
        title: title.to_string(),
        description: format!("{} for sale", title),
        category: category.to_string(),
        image: None,
        starting_bid: starting_bid.parse()?,
    };
    let req = build_request("POST", "/v1/create-listing", Some(token), Some(payload))?;
    let resp = send(app, req).await?;

    assert_eq!(resp.status(), StatusCode::OK);

    parse_resp(resp).await
}
