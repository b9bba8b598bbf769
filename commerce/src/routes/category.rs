use std::sync::Arc;

use axum::extract::{Json, Path, State};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{errors::HandlerError, models::listing::CategoryListings, state::AppState};

use super::sort_by_creation;

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(get_categories))
        .routes(routes!(get_category))
}

/// Distinct categories over all listings.
#[utoipa::path(
    get,
    path = "/v1/categories",
    tag = "Category",
    responses(
        (status = OK, description = "Sorted category names", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn get_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, HandlerError> {
    Ok(Json(state.store.categories().await?))
}

/// Active listings in one category.
#[utoipa::path(
    get,
    path = "/v1/categories/{name}",
    tag = "Category",
    params(
        ("name" = String, Path, description = "Category name"),
    ),
    responses(
        (status = OK, description = "Active listings in the category", body = CategoryListings),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CategoryListings>, HandlerError> {
    let mut listings = state.store.active_listings_in_category(&name).await?;
    sort_by_creation(&mut listings);

    Ok(Json(CategoryListings {
        category: name,
        listings,
    }))
}
