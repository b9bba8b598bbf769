mod entry;

use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::{header, StatusCode},
    response::Response,
    Router,
};
use lambda_http::{tower::ServiceExt, Error};
use serde::{de::DeserializeOwned, Serialize};

use crate::models::entry::CreateEntryRequest;

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
    body: Option<T>,
) -> Result<Request<Body>, Error> {
    let builder = Request::builder().method(method).uri(uri);
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

fn location(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn create(app: &Router, title: &str, contents: &str) -> Result<Response<Body>, Error> {
    let payload = CreateEntryRequest {
        title: title.to_string(),
        contents: contents.to_string(),
    };
    send(app, build_request("POST", "/v1/create", Some(payload))?).await
}

async fn seed(app: &Router, titles: &[&str]) -> Result<(), Error> {
    for title in titles {
        let resp = create(app, title, &format!("# {}\n", title)).await?;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    Ok(())
}
