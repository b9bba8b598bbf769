mod constants;
mod errors;
mod middlewares;
mod models;
mod routes;
mod state;
mod store;
mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use lambda_http::{run, tracing, Error};
use middlewares::{auth::auth_middleware, trace_client};
use serde::{Deserialize, Serialize};
use state::AppState;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use utoipa::{
    openapi::{
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
        ComponentsBuilder,
    },
    Modify, OpenApi,
};
use utoipa_axum::router::OpenApiRouter;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "commerce",
        description = "Auction listings with bids, comments and watchlists"
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Accounts and sessions"),
        (name = "Listing", description = "Listings, bids and comments"),
        (name = "Watchlist", description = "Per-user saved listings"),
        (name = "Category", description = "Browsing by category"),
    ),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(|| ComponentsBuilder::new().build());
        components.add_security_scheme(
            "http-jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
struct Resp {
    utc: u64,
}

async fn get_utc() -> Json<Resp> {
    Json(Resp {
        utc: chrono::Utc::now().timestamp() as u64,
    })
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> (StatusCode, String) {
    (
        StatusCode::OK,
        format!("Healthy! store={}", state.store.backend_tag()),
    )
}

pub async fn create_service(state: Arc<AppState>) -> Result<Router, Error> {
    let (authed, authed_api) = OpenApiRouter::new()
        .merge(routes::auth::authed_router())
        .merge(routes::listing::authed_router())
        .merge(routes::watchlist::authed_router())
        .split_for_parts();
    let authed = authed.route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    let (public, mut api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::auth::router())
        .merge(routes::listing::router())
        .merge(routes::category::router())
        .split_for_parts();
    api.merge(authed_api);

    let api_yaml = serde_yaml::to_string(&api)?;
    let api_json = Json(api);

    let trace_layer =
        TraceLayer::new_for_http().on_request(|req: &Request<Body>, _: &tracing::Span| {
            let path = req.uri().path();
            tracing::info!("Got request with path: {}", path);
        });

    let app = public
        .merge(authed)
        .route("/v1/utc", get(get_utc))
        .route("/v1/health", get(health_check))
        .route(
            "/v1/openapi.yaml",
            get(move || async move {
                ([(header::CONTENT_TYPE, "application/yaml")], api_yaml).into_response()
            }),
        )
        .route("/v1/openapi.json", get(move || async move { api_json }))
        .layer(middleware::from_fn(trace_client))
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .with_state(state);

    Ok(app)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    tracing::info!("Commerce API Handler Start!!!");

    let state = AppState::new().await?;
    let app = create_service(Arc::new(state)).await?;

    run(app).await
}
