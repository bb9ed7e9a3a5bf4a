//! Photo Catalog — the read-only store of candidate photos.
//!
//! `AppState` holds an `Arc<dyn PhotoCatalog>`. Production uses `PgPhotoCatalog`;
//! without a database the service runs on an empty `InMemoryPhotoCatalog` and
//! produces text-only documents.

pub mod resolver;

use std::cmp::Ordering;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::models::photo::{PhotoMetadata, PhotoRow};

pub use resolver::{sanitize_filename, FsPhotoResolver, PhotoResolver};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Photo catalog query failed: {0}")]
    Query(#[from] sqlx::Error),
}

#[async_trait]
pub trait PhotoCatalog: Send + Sync {
    /// Returns a snapshot of every image in the catalog.
    async fn load_photos(&self) -> Result<Vec<PhotoMetadata>, CatalogError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgPhotoCatalog {
    pool: PgPool,
}

impl PgPhotoCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoCatalog for PgPhotoCatalog {
    async fn load_photos(&self) -> Result<Vec<PhotoMetadata>, CatalogError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id::BIGINT AS id, filename, title, description,
                   year::INT4 AS year, people, created_at::TIMESTAMPTZ AS created_at
            FROM media
            WHERE file_type = 'image'
            ORDER BY year DESC NULLS LAST, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} media rows", rows.len());

        Ok(rows
            .into_iter()
            .map(PhotoMetadata::from)
            .filter(|p| !p.filename.is_empty())
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct InMemoryPhotoCatalog {
    photos: Vec<PhotoMetadata>,
}

impl InMemoryPhotoCatalog {
    pub fn new(photos: Vec<PhotoMetadata>) -> Self {
        Self { photos }
    }
}

#[async_trait]
impl PhotoCatalog for InMemoryPhotoCatalog {
    async fn load_photos(&self) -> Result<Vec<PhotoMetadata>, CatalogError> {
        Ok(self.photos.clone())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ordering
// ────────────────────────────────────────────────────────────────────────────

/// Newest year first, undated photos last; within a year, newest upload first.
/// Stable, so fully tied photos keep store order.
pub fn order_catalog(photos: &mut [PhotoMetadata]) {
    photos.sort_by(|a, b| {
        descending_nulls_last(a.year, b.year)
            .then_with(|| descending_nulls_last(a.created_at, b.created_at))
    });
}

fn descending_nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
