//! Catalog seeding.
//!
//! Inserts a small set of sample artworks for local development. Existing
//! titles are skipped so the command is safe to re-run.

use atelier_core::ArtworkCategory;
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur during seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

struct SampleArtwork {
    title: &'static str,
    description: &'static str,
    artist: &'static str,
    category: ArtworkCategory,
    price: Decimal,
    stock_quantity: i32,
}

fn samples() -> Vec<SampleArtwork> {
    vec![
        SampleArtwork {
            title: "Monsoon Over the Old City",
            description: "Oil on canvas, rain-washed rooftops at dusk.",
            artist: "Leila Haddad",
            category: ArtworkCategory::Painting,
            price: Decimal::new(12_500, 0),
            stock_quantity: 1,
        },
        SampleArtwork {
            title: "Street Vendor at Noon",
            description: "Charcoal sketch from a market series.",
            artist: "Omar Farouk",
            category: ArtworkCategory::Sketch,
            price: Decimal::new(1_800, 0),
            stock_quantity: 5,
        },
        SampleArtwork {
            title: "Blue Hour Harbor",
            description: "Acrylic, fishing boats under early light.",
            artist: "Leila Haddad",
            category: ArtworkCategory::Painting,
            price: Decimal::new(9_200, 0),
            stock_quantity: 2,
        },
        SampleArtwork {
            title: "Portrait Study IV",
            description: "Graphite on paper.",
            artist: "Nadia Rahal",
            category: ArtworkCategory::Sketch,
            price: Decimal::new(2_400, 0),
            stock_quantity: 3,
        },
        SampleArtwork {
            title: "Field of Poppies",
            description: "Oil, heavy impasto, late summer.",
            artist: "Nadia Rahal",
            category: ArtworkCategory::Painting,
            price: Decimal::new(15_000, 0),
            stock_quantity: 1,
        },
    ]
}

/// Insert the sample catalog, returning the number of rows inserted.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn catalog() -> Result<usize, SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ATELIER_DATABASE_URL")
        .map_err(|_| SeedError::MissingEnvVar("ATELIER_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let mut inserted = 0;
    for sample in samples() {
        let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM artworks WHERE title = $1")
            .bind(sample.title)
            .fetch_optional(&pool)
            .await?;

        if exists.is_some() {
            tracing::debug!("Skipping existing artwork: {}", sample.title);
            continue;
        }

        sqlx::query(
            r"
            INSERT INTO artworks (title, description, artist, category, price, stock_quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(sample.title)
        .bind(sample.description)
        .bind(sample.artist)
        .bind(sample.category)
        .bind(sample.price)
        .bind(sample.stock_quantity)
        .execute(&pool)
        .await?;

        inserted += 1;
    }

    Ok(inserted)
}
