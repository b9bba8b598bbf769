use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use lambda_http::tracing;
use rand::seq::SliceRandom;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    errors::HandlerError,
    models::entry::{
        search, validate_title, CreateEntryRequest, Entry, EntryList, SearchOutcome,
        SearchRequest,
    },
    state::AppState,
    storage::StorageError,
};

use super::entry_location;

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(get_index))
        .routes(routes!(get_entry))
        .routes(routes!(search_entries))
        .routes(routes!(create_entry))
        .routes(routes!(random_entry))
}

/// All entry titles.
#[utoipa::path(
    get,
    path = "/v1/",
    tag = "Entry",
    responses(
        (status = OK, description = "Sorted titles", body = EntryList),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn get_index(State(state): State<Arc<AppState>>) -> Result<Json<EntryList>, HandlerError> {
    Ok(Json(EntryList {
        entries: state.entries.list_entries().await?,
    }))
}

/// Get one entry by its exact title.
#[utoipa::path(
    get,
    path = "/v1/wiki/{title}",
    tag = "Entry",
    params(
        ("title" = String, Path, description = "Entry title, case-sensitive"),
    ),
    responses(
        (status = OK, description = "The entry", body = Entry),
        (status = NOT_FOUND, description = "Page not found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Json<Entry>, HandlerError> {
    // Invalid titles cannot name a stored entry.
    if validate_title(&title).is_err() {
        return Err(HandlerError::not_found("Page not found"));
    }

    match state.entries.get_entry(&title).await? {
        Some(content) => Ok(Json(Entry { title, content })),
        None => Err(HandlerError::not_found("Page not found")),
    }
}

/// Search titles. An exact title redirects to the entry, anything else
/// lists the titles containing the query, ignoring case.
#[utoipa::path(
    post,
    path = "/v1/search",
    tag = "Entry",
    request_body = SearchRequest,
    responses(
        (status = SEE_OTHER, description = "Query names an entry",
            headers(("Location" = String, description = "Entry URL"))),
        (status = OK, description = "Matching titles", body = EntryList),
        (status = NOT_FOUND, description = "No matches found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn search_entries(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Response, HandlerError> {
    let titles = state.entries.list_entries().await?;

    match search(&payload.q, &titles) {
        SearchOutcome::Exact(title) => Ok(Redirect::to(&entry_location(&title)).into_response()),
        SearchOutcome::Matches(entries) => Ok(Json(EntryList { entries }).into_response()),
        SearchOutcome::NoMatches => Err(HandlerError::not_found("No matches found")),
    }
}

/// Create an entry. Existing titles are never overwritten.
#[utoipa::path(
    post,
    path = "/v1/create",
    tag = "Entry",
    request_body = CreateEntryRequest,
    responses(
        (status = CREATED, description = "Entry created", body = Entry,
            headers(("Location" = String, description = "Entry URL"))),
        (status = BAD_REQUEST, description = "Invalid title", body = HandlerError),
        (status = CONFLICT, description = "Page already exists", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<Response, HandlerError> {
    let CreateEntryRequest { title, contents } = payload;
    validate_title(&title).map_err(HandlerError::bad_request)?;

    match state.entries.create_entry(&title, &contents).await {
        Ok(()) => {}
        Err(StorageError::Conflict(_)) => {
            tracing::info!("Refused to overwrite entry {}", title);
            return Err(HandlerError::conflict("Page already exists"));
        }
        Err(e) => return Err(e.into()),
    }
    tracing::info!("Created entry {}", title);

    let location = entry_location(&title);
    let entry = Entry {
        title,
        content: contents,
    };

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(entry),
    )
        .into_response())
}

/// Redirect to a random entry.
#[utoipa::path(
    get,
    path = "/v1/random",
    tag = "Entry",
    responses(
        (status = SEE_OTHER, description = "Randomly chosen entry",
            headers(("Location" = String, description = "Entry URL"))),
        (status = NOT_FOUND, description = "The wiki is empty", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn random_entry(State(state): State<Arc<AppState>>) -> Result<Redirect, HandlerError> {
    let titles = state.entries.list_entries().await?;
    let picked = titles.choose(&mut rand::thread_rng());

    match picked {
        Some(title) => Ok(Redirect::to(&entry_location(title))),
        None => Err(HandlerError::not_found("No pages yet")),
    }
}
