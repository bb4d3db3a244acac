//! Product listing, search and detail handlers.

use axum::extract::{FromRequestParts, Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use stylish_core::{Category, Product, ProductId};

use crate::envelope::ApiResponse;
use crate::error::{AppError, Result};
use crate::identity::MISSING_PARAMETER;
use crate::listing::paginate;
use crate::state::AppState;

const WRONG_REQUEST: &str = "Wrong Request";
const INVALID_PAGING: &str = "Bad Request: invalid paging";
const INVALID_PRODUCT_ID: &str = "Bad Request: invalid product id";

/// `{category}` segment of the listing route.
#[derive(Debug, Deserialize, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct CategoryPath {
    pub category: String,
}

/// `?paging=N` on listing routes.
///
/// Values stay text and every extractor rejection maps into [`AppError`], so
/// a bad query (including a repeated key) gets the JSON error body.
#[derive(Debug, Deserialize, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ListingQuery {
    pub paging: Option<String>,
}

/// `?keyword=S&paging=N` on the search route.
#[derive(Debug, Deserialize, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub paging: Option<String>,
}

/// `?id=N` on the detail route.
#[derive(Debug, Deserialize, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct DetailsQuery {
    pub id: Option<String>,
}

/// Page index from `paging`; absent means the first page.
fn page_index(paging: Option<&str>) -> Result<u32> {
    paging.map_or(Ok(0), |raw| {
        raw.trim()
            .parse::<u32>()
            .map_err(|_| AppError::Validation(INVALID_PAGING.to_owned()))
    })
}

/// List products of a category.
///
/// GET /api/1.0/products/{category}?paging=N
#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    CategoryPath { category }: CategoryPath,
    query: ListingQuery,
) -> Result<ApiResponse<Vec<Product>>> {
    let category: Category = category
        .parse()
        .map_err(|_| AppError::Validation(WRONG_REQUEST.to_owned()))?;
    let page = page_index(query.paging.as_deref())?;

    let candidates = state.catalog().list_by_category(category, page).await?;
    let page = paginate(candidates, page, state.config().paging_size);

    tracing::debug!(%category, items = page.items.len(), next_page = ?page.next_page, "Category listed");
    Ok(page.into())
}

/// Search products by title.
///
/// GET /api/1.0/products/search?keyword=S&paging=N
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    query: SearchQuery,
) -> Result<ApiResponse<Vec<Product>>> {
    let keyword = query
        .keyword
        .ok_or_else(|| AppError::Validation(MISSING_PARAMETER.to_owned()))?;
    let page = page_index(query.paging.as_deref())?;

    let candidates = state.catalog().search(&keyword, page).await?;
    Ok(paginate(candidates, page, state.config().paging_size).into())
}

/// A single product.
///
/// GET /api/1.0/products/details?id=N
#[instrument(skip(state))]
pub async fn details(
    State(state): State<AppState>,
    query: DetailsQuery,
) -> Result<ApiResponse<Product>> {
    let id = query
        .id
        .ok_or_else(|| AppError::Validation(MISSING_PARAMETER.to_owned()))?
        .trim()
        .parse::<i64>()
        .map(ProductId::new)
        .map_err(|_| AppError::Validation(INVALID_PRODUCT_ID.to_owned()))?;

    let product = state.catalog().get_by_id(id).await?;
    Ok(ApiResponse::new(product))
}
