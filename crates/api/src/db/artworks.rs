//! Artwork repository for catalog reads and admin writes.
//!
//! List and search assemble their WHERE clause with `sqlx::QueryBuilder`:
//! user input only ever enters as a bound parameter, and ORDER BY fragments
//! come from the enumerated sort types below, so injection is impossible by
//! construction.

use atelier_core::{ArtworkCategory, ArtworkId};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{Page, RepositoryError};
use crate::models::Artwork;

const ARTWORK_COLUMNS: &str =
    "id, title, description, artist, category, price, image_url, stock_quantity, created_at";

/// Filters for catalog listing and search.
#[derive(Debug, Clone, Default)]
pub struct ArtworkFilter {
    /// Free-text query matched against title, description, and artist.
    pub query: Option<String>,
    pub category: Option<ArtworkCategory>,
    /// Artist substring (case-insensitive).
    pub artist: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
}

/// Allowed sort columns. The closed set replaces the runtime allow-list the
/// dynamic-SQL approach would need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtworkSortField {
    Title,
    Artist,
    Price,
    #[default]
    CreatedAt,
}

impl ArtworkSortField {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Artist => "artist",
            Self::Price => "price",
            Self::CreatedAt => "created_at",
        }
    }

    /// Parse a client-supplied sort key, falling back to recency.
    #[must_use]
    pub fn parse_or_default(s: Option<&str>) -> Self {
        match s {
            Some("title") => Self::Title,
            Some("artist") => Self::Artist,
            Some("price") => Self::Price,
            _ => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parse a client-supplied direction, defaulting to descending.
    #[must_use]
    pub fn parse_or_default(s: Option<&str>) -> Self {
        match s {
            Some(v) if v.eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// Sort specification for listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtworkSort {
    pub field: ArtworkSortField,
    pub direction: SortDirection,
}

/// Lightweight search suggestion row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: String,
    pub artist: String,
    pub category: ArtworkCategory,
}

/// Fields for a new artwork. Validation (closed category set, non-negative
/// price and stock) happens at the route boundary before any SQL runs.
#[derive(Debug, Clone)]
pub struct NewArtwork {
    pub title: String,
    pub description: Option<String>,
    pub artist: String,
    pub category: ArtworkCategory,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock_quantity: i32,
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ArtworkPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub artist: Option<String>,
    pub category: Option<ArtworkCategory>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub stock_quantity: Option<i32>,
}

impl ArtworkPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.artist.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.stock_quantity.is_none()
    }
}

/// Repository for artwork database operations.
pub struct ArtworkRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ArtworkRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active artworks matching `filter`, sorted and paginated.
    ///
    /// Returns the page of rows plus the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &ArtworkFilter,
        sort: ArtworkSort,
        page: Page,
    ) -> Result<(Vec<Artwork>, i64), RepositoryError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {ARTWORK_COLUMNS} FROM artworks WHERE is_active = TRUE"
        ));
        push_filters(&mut qb, filter);

        qb.push(" ORDER BY ");
        if filter.query.is_some() {
            // Relevance: title matches rank before artist before description,
            // ties broken by recency.
            push_relevance_order(&mut qb, filter);
        } else {
            qb.push(sort.field.as_sql());
            qb.push(" ");
            qb.push(sort.direction.as_sql());
        }

        qb.push(" LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows: Vec<Artwork> = qb.build_query_as().fetch_all(self.pool).await?;
        let total = self.count(filter).await?;

        Ok((rows, total))
    }

    /// Count active artworks matching `filter`.
    async fn count(&self, filter: &ArtworkFilter) -> Result<i64, RepositoryError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM artworks WHERE is_active = TRUE");
        push_filters(&mut qb, filter);

        let total: i64 = qb.build_query_scalar().fetch_one(self.pool).await?;
        Ok(total)
    }

    /// Up to five distinct title/artist suggestions for a free-text query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn suggestions(&self, query: &str) -> Result<Vec<Suggestion>, RepositoryError> {
        let pattern = like_pattern(query);
        let rows = sqlx::query_as::<_, Suggestion>(
            r"
            SELECT DISTINCT title, artist, category
            FROM artworks
            WHERE is_active = TRUE AND (title ILIKE $1 OR artist ILIKE $1)
            LIMIT 5
            ",
        )
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get a single active artwork.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id is absent or inactive.
    pub async fn get(&self, id: ArtworkId) -> Result<Artwork, RepositoryError> {
        let row = sqlx::query_as::<_, Artwork>(&format!(
            "SELECT {ARTWORK_COLUMNS} FROM artworks WHERE id = $1 AND is_active = TRUE"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Insert a new artwork (admin).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewArtwork) -> Result<Artwork, RepositoryError> {
        let row = sqlx::query_as::<_, Artwork>(&format!(
            r"
            INSERT INTO artworks (title, description, artist, category, price, image_url, stock_quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ARTWORK_COLUMNS}
            "
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.artist)
        .bind(new.category)
        .bind(new.price)
        .bind(&new.image_url)
        .bind(new.stock_quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a partial update (admin). A single COALESCE statement rather
    /// than assembled SQL; absent fields keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the artwork doesn't exist.
    pub async fn update(
        &self,
        id: ArtworkId,
        patch: &ArtworkPatch,
    ) -> Result<Artwork, RepositoryError> {
        let row = sqlx::query_as::<_, Artwork>(&format!(
            r"
            UPDATE artworks SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                artist = COALESCE($3, artist),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                image_url = COALESCE($6, image_url),
                stock_quantity = COALESCE($7, stock_quantity),
                updated_at = NOW()
            WHERE id = $8
            RETURNING {ARTWORK_COLUMNS}
            "
        ))
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.artist)
        .bind(patch.category)
        .bind(patch.price)
        .bind(&patch.image_url)
        .bind(patch.stock_quantity)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete an artwork (admin). The row stays because order items
    /// reference it; cart lines pointing at it drop out of every read path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the artwork doesn't exist.
    pub async fn deactivate(&self, id: ArtworkId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE artworks SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Append the filter conditions, binding every user-supplied value.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ArtworkFilter) {
    if let Some(query) = &filter.query {
        let pattern = like_pattern(query);
        qb.push(" AND (title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR description ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR artist ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(category) = filter.category {
        qb.push(" AND category = ");
        qb.push_bind(category);
    }
    if let Some(artist) = &filter.artist {
        qb.push(" AND artist ILIKE ");
        qb.push_bind(like_pattern(artist));
    }
    if let Some(min) = filter.price_min {
        qb.push(" AND price >= ");
        qb.push_bind(min);
    }
    if let Some(max) = filter.price_max {
        qb.push(" AND price <= ");
        qb.push_bind(max);
    }
}

/// Append the deterministic relevance ordering for free-text search.
fn push_relevance_order(qb: &mut QueryBuilder<'_, Postgres>, filter: &ArtworkFilter) {
    let pattern = filter.query.as_deref().map(like_pattern).unwrap_or_default();
    qb.push("CASE WHEN title ILIKE ");
    qb.push_bind(pattern.clone());
    qb.push(" THEN 1 WHEN artist ILIKE ");
    qb.push_bind(pattern.clone());
    qb.push(" THEN 2 ELSE 3 END, created_at DESC");
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_parse() {
        assert_eq!(
            ArtworkSortField::parse_or_default(Some("price")),
            ArtworkSortField::Price
        );
        assert_eq!(
            ArtworkSortField::parse_or_default(Some("title")),
            ArtworkSortField::Title
        );
        // Unknown keys fall back to recency instead of erroring
        assert_eq!(
            ArtworkSortField::parse_or_default(Some("stock_quantity; DROP TABLE artworks")),
            ArtworkSortField::CreatedAt
        );
        assert_eq!(
            ArtworkSortField::parse_or_default(None),
            ArtworkSortField::CreatedAt
        );
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(
            SortDirection::parse_or_default(Some("ASC")),
            SortDirection::Asc
        );
        assert_eq!(
            SortDirection::parse_or_default(Some("desc")),
            SortDirection::Desc
        );
        assert_eq!(
            SortDirection::parse_or_default(Some("sideways")),
            SortDirection::Desc
        );
    }

    #[test]
    fn test_like_pattern_trims() {
        assert_eq!(like_pattern("  monet "), "%monet%");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ArtworkPatch::default().is_empty());
        let patch = ArtworkPatch {
            price: Some(Decimal::ONE),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
