//! Search route handlers.

use atelier_core::ArtworkCategory;
use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::Page;
use crate::db::artworks::{
    ArtworkFilter, ArtworkRepository, ArtworkSort, ArtworkSortField, SortDirection, Suggestion,
};
use crate::error::Result;
use crate::models::Artwork;
use crate::routes::Pagination;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<ArtworkCategory>,
    pub artist: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<Artwork>,
    pub suggestions: Vec<Suggestion>,
    pub pagination: Pagination,
}

/// `GET /api/search`
///
/// With a free-text `q` the results are relevance-ordered and up to five
/// suggestions come back alongside; without it this is plain filtered
/// browsing ordered by `sortBy`/`order`.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let text = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(ToOwned::to_owned);

    let filter = ArtworkFilter {
        query: text.clone(),
        category: query.category,
        artist: query.artist,
        price_min: query.min_price,
        price_max: query.max_price,
    };
    let sort = ArtworkSort {
        field: ArtworkSortField::parse_or_default(query.sort_by.as_deref()),
        direction: SortDirection::parse_or_default(query.order.as_deref()),
    };
    let page = Page::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(Page::DEFAULT_PER_PAGE),
    );

    let repo = ArtworkRepository::new(state.pool());
    let (results, total) = repo.list(&filter, sort, page).await?;

    let suggestions = match &text {
        Some(q) => repo.suggestions(q).await?,
        None => Vec::new(),
    };

    Ok(Json(SearchResponse {
        results,
        suggestions,
        pagination: Pagination::new(page, total),
    }))
}
