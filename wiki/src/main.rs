mod constants;
mod errors;
mod middlewares;
mod models;
mod routes;
mod state;
mod storage;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use lambda_http::{run, tracing, Error};
use middlewares::trace_client;
use state::AppState;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

#[derive(OpenApi)]
#[openapi(
    info(title = "wiki", description = "Flat-file encyclopedia"),
    tags(
        (name = "Entry", description = "Reading, searching and creating pages"),
    ),
)]
struct ApiDoc;

async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, String) {
    (
        StatusCode::OK,
        format!("Healthy! storage={}", state.entries.backend_tag()),
    )
}

pub async fn create_service(state: Arc<AppState>) -> Result<Router, Error> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::entry::router())
        .split_for_parts();

    let api_yaml = serde_yaml::to_string(&api)?;
    let api_json = Json(api);

    let trace_layer =
        TraceLayer::new_for_http().on_request(|req: &Request<Body>, _: &tracing::Span| {
            tracing::info!("Got request with path: {}", req.uri().path());
        });

    let app = router
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

    tracing::info!("Wiki API Handler Start!!!");

    let state = AppState::new().await?;
    let app = create_service(Arc::new(state)).await?;

    run(app).await
}
