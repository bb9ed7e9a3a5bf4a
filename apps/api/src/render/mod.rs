//! Rendering boundary — turns a `DocumentDescription` into a downloadable artifact.
//!
//! `MarkupRenderer` returns the self-contained HTML document.
//! `CommandRenderer` pipes that HTML through an external HTML→PDF program.

pub mod command;
pub mod markup;
pub mod stylesheet;

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::layout::DocumentDescription;

pub use command::CommandRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render program '{0}' not found")]
    ProgramNotFound(String),

    #[error("Render program exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("Render program produced no output")]
    MissingOutput,

    #[error("Rendering exceeded {0}s deadline")]
    TimedOut(u64),
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// `Content-Type` of the rendered bytes.
    fn media_type(&self) -> &'static str;

    /// Extension used in the attachment filename, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Renders the document. `base_dir` is the upload folder; every image
    /// reference in `document` is already an absolute path inside it.
    async fn render(
        &self,
        document: &DocumentDescription,
        base_dir: &Path,
    ) -> Result<Bytes, RenderError>;
}

/// Serves the HTML document as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupRenderer;

#[async_trait]
impl DocumentRenderer for MarkupRenderer {
    fn media_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }

    async fn render(
        &self,
        document: &DocumentDescription,
        _base_dir: &Path,
    ) -> Result<Bytes, RenderError> {
        Ok(Bytes::from(markup::to_html(document)))
    }
}
