//! The full document description: cover, contents, and laid-out chapters.

use serde::Serialize;

use crate::layout::blocks::{LayoutBlock, PhotoBlock};
use crate::layout::selector::LayoutTemplate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverPage {
    pub title: String,
    pub subtitle: String,
    /// Pre-formatted, e.g. "October 19, 2026".
    pub created_on: String,
    pub hero: Option<PhotoBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    /// 1-based chapter position.
    pub position: usize,
    pub title: String,
    pub thumbnail: Option<PhotoBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterLayout {
    pub title: String,
    pub template: LayoutTemplate,
    pub blocks: Vec<LayoutBlock>,
}

/// What the renderer receives. Ordered: cover, table of contents, chapters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentDescription {
    pub cover: CoverPage,
    pub contents: Vec<TocEntry>,
    pub chapters: Vec<ChapterLayout>,
}

impl DocumentDescription {
    /// Every placed filename in document order: cover, thumbnails, chapter blocks.
    pub fn placed_filenames(&self) -> Vec<&str> {
        let cover = self.cover.hero.iter().map(|p| p.filename.as_str());
        let thumbs = self
            .contents
            .iter()
            .filter_map(|e| e.thumbnail.as_ref())
            .map(|p| p.filename.as_str());
        let body = self
            .chapters
            .iter()
            .flat_map(|c| c.blocks.iter())
            .flat_map(|b| b.filenames());
        cover.chain(thumbs).chain(body).collect()
    }
}
