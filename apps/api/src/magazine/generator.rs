//! Document Generation — orchestrates one run end to end.
//!
//! Flow: load catalog (degrade to empty on failure) → order → assemble on the
//! blocking pool → render under the configured deadline.
//!
//! Every run gets its own catalog snapshot and `UsedImageSet`; runs share
//! nothing but the collaborators in `AppState`.

use bytes::Bytes;
use chrono::Local;
use tracing::{info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::catalog::order_catalog;
use crate::errors::AppError;
use crate::magazine::assembler::{AssembledDocument, DocumentAssembler, DocumentRequest};
use crate::models::photo::PhotoMetadata;
use crate::render::RenderError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A rendered artifact plus what the HTTP layer needs to serve it.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Bytes,
    pub media_type: &'static str,
    pub file_extension: &'static str,
    pub unique_photos_used: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Assembles and renders a document.
///
/// Steps:
/// 1. load + order the catalog (skipped when `include_photos` is false)
/// 2. assemble cover, contents, and chapter layouts
/// 3. render under `RENDER_TIMEOUT_SECS`; failure or timeout → `GenerationFailed`
pub async fn generate_document(
    state: &AppState,
    request: DocumentRequest,
) -> Result<GeneratedDocument, AppError> {
    let run_id = Uuid::new_v4();
    assemble_and_render(state, request)
        .instrument(info_span!("generation", %run_id))
        .await
}

/// Assembles the document description without rendering it.
pub async fn preview_document(
    state: &AppState,
    request: DocumentRequest,
) -> Result<AssembledDocument, AppError> {
    let run_id = Uuid::new_v4();
    assemble_document(state, request)
        .instrument(info_span!("layout_preview", %run_id))
        .await
}

async fn assemble_document(
    state: &AppState,
    request: DocumentRequest,
) -> Result<AssembledDocument, AppError> {
    info!(
        "Generating magazine-style document with {} chapters",
        request.chapters.len()
    );

    let catalog = if request.include_photos {
        load_catalog(state).await
    } else {
        info!("Photos disabled for this run");
        Vec::new()
    };

    let config = state.config.magazine.clone();
    let resolver = state.resolver.clone();
    let base_dir = state.config.upload_folder.clone();
    let created_on = Local::now().date_naive();
    let span = Span::current();

    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        DocumentAssembler::new(&config, resolver.as_ref(), &base_dir).assemble(
            &request,
            &catalog,
            created_on,
        )
    })
    .await
    .map_err(|e| AppError::GenerationFailed(format!("Assembly task failed: {e}")))?
}

async fn assemble_and_render(
    state: &AppState,
    request: DocumentRequest,
) -> Result<GeneratedDocument, AppError> {
    let assembled = assemble_document(state, request).await?;

    let deadline = state.config.render_timeout;
    let rendering = state
        .renderer
        .render(&assembled.document, &state.config.upload_folder);

    let bytes = match tokio::time::timeout(deadline, rendering).await {
        Ok(result) => result?,
        Err(_) => return Err(RenderError::TimedOut(deadline.as_secs()).into()),
    };

    info!(
        "Rendered {} bytes ({})",
        bytes.len(),
        state.renderer.media_type()
    );

    Ok(GeneratedDocument {
        bytes,
        media_type: state.renderer.media_type(),
        file_extension: state.renderer.file_extension(),
        unique_photos_used: assembled.unique_photos_used,
    })
}

/// Catalog snapshot in catalog order. A failing store yields an empty catalog.
async fn load_catalog(state: &AppState) -> Vec<PhotoMetadata> {
    match state.catalog.load_photos().await {
        Ok(mut photos) => {
            order_catalog(&mut photos);
            info!("Loaded {} photos from catalog", photos.len());
            photos
        }
        Err(e) => {
            warn!("Photo catalog unavailable, continuing text-only: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::catalog::{
        CatalogError, FsPhotoResolver, InMemoryPhotoCatalog, PhotoCatalog, PhotoResolver,
    };
    use crate::config::Config;
    use crate::layout::DocumentDescription;
    use crate::magazine::MagazineConfig;
    use crate::models::chapter::Chapter;
    use crate::render::{DocumentRenderer, MarkupRenderer};

    struct FailingCatalog;

    #[async_trait]
    impl PhotoCatalog for FailingCatalog {
        async fn load_photos(&self) -> Result<Vec<PhotoMetadata>, CatalogError> {
            Err(CatalogError::Query(sqlx::Error::PoolTimedOut))
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl DocumentRenderer for FailingRenderer {
        fn media_type(&self) -> &'static str {
            "application/pdf"
        }
        fn file_extension(&self) -> &'static str {
            "pdf"
        }
        async fn render(&self, _: &DocumentDescription, _: &Path) -> Result<Bytes, RenderError> {
            Err(RenderError::MissingOutput)
        }
    }

    struct SlowRenderer;

    #[async_trait]
    impl DocumentRenderer for SlowRenderer {
        fn media_type(&self) -> &'static str {
            "application/pdf"
        }
        fn file_extension(&self) -> &'static str {
            "pdf"
        }
        async fn render(&self, _: &DocumentDescription, _: &Path) -> Result<Bytes, RenderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Bytes::new())
        }
    }

    struct PanickingResolver;

    impl PhotoResolver for PanickingResolver {
        fn resolve(&self, _: &Path, _: &str) -> Option<std::path::PathBuf> {
            panic!("resolver exploded");
        }
    }

    fn photo(filename: &str, year: i32) -> PhotoMetadata {
        PhotoMetadata {
            id: 0,
            filename: filename.to_string(),
            title: "Garden party".to_string(),
            description: String::new(),
            year: Some(year),
            people: String::new(),
            created_at: None,
        }
    }

    fn state(
        catalog: Arc<dyn PhotoCatalog>,
        renderer: Arc<dyn DocumentRenderer>,
        upload_folder: &Path,
    ) -> AppState {
        AppState {
            catalog,
            resolver: Arc::new(FsPhotoResolver),
            renderer,
            config: Config {
                database_url: None,
                upload_folder: upload_folder.to_path_buf(),
                magazine: MagazineConfig::default(),
                render_command: None,
                render_timeout: Duration::from_secs(5),
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    fn request() -> DocumentRequest {
        DocumentRequest::new(vec![Chapter {
            title: "The Garden (1985)".to_string(),
            narrative: "We held a garden party every June.".to_string(),
        }])
    }

    #[tokio::test]
    async fn test_generates_html_with_resolved_photos() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("garden.jpg"), b"jpg").unwrap();
        let catalog = InMemoryPhotoCatalog::new(vec![photo("garden.jpg", 1985), photo("missing.jpg", 1985)]);
        let state = state(Arc::new(catalog), Arc::new(MarkupRenderer), dir.path());

        let out = generate_document(&state, request()).await.unwrap();
        let html = String::from_utf8(out.bytes.to_vec()).unwrap();

        assert_eq!(out.file_extension, "html");
        assert!(html.contains("garden.jpg"));
        assert!(!html.contains("missing.jpg"));
        assert!(out.unique_photos_used >= 1);
    }

    #[tokio::test]
    async fn test_catalog_failure_degrades_to_text_only() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(Arc::new(FailingCatalog), Arc::new(MarkupRenderer), dir.path());

        let out = generate_document(&state, request()).await.unwrap();
        assert_eq!(out.unique_photos_used, 0);
    }

    #[tokio::test]
    async fn test_include_photos_false_skips_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("garden.jpg"), b"jpg").unwrap();
        let catalog = InMemoryPhotoCatalog::new(vec![photo("garden.jpg", 1985)]);
        let state = state(Arc::new(catalog), Arc::new(MarkupRenderer), dir.path());

        let mut req = request();
        req.include_photos = false;
        let preview = preview_document(&state, req).await.unwrap();
        assert!(preview.document.placed_filenames().is_empty());
    }

    #[tokio::test]
    async fn test_renderer_failure_is_generation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(
            Arc::new(InMemoryPhotoCatalog::default()),
            Arc::new(FailingRenderer),
            dir.path(),
        );

        let err = generate_document(&state, request()).await.unwrap_err();
        assert!(matches!(err, AppError::GenerationFailed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_deadline_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(
            Arc::new(InMemoryPhotoCatalog::default()),
            Arc::new(SlowRenderer),
            dir.path(),
        );

        let err = generate_document(&state, request()).await.unwrap_err();
        assert!(matches!(err, AppError::GenerationFailed(ref m) if m.contains("deadline")));
    }

    #[tokio::test]
    async fn test_empty_chapters_rejected_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(
            Arc::new(InMemoryPhotoCatalog::default()),
            Arc::new(FailingRenderer),
            dir.path(),
        );

        let err = generate_document(&state, DocumentRequest::new(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_assembly_panic_is_generation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = InMemoryPhotoCatalog::new(vec![photo("garden.jpg", 1985)]);
        let mut state = state(Arc::new(catalog), Arc::new(MarkupRenderer), dir.path());
        state.resolver = Arc::new(PanickingResolver);

        let err = preview_document(&state, request()).await.unwrap_err();
        assert!(matches!(err, AppError::GenerationFailed(ref m) if m.starts_with("Assembly task failed")));
    }
}
