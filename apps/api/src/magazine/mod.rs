//! Magazine engine — turns chapters and a photo catalog into a laid-out document.
//!
//! Pipeline: text_analysis → photo_matcher → layout::selector → assembler → render.

pub mod assembler;
pub mod generator;
pub mod handlers;
pub mod photo_matcher;
pub mod text_analysis;

use crate::magazine::text_analysis::DEFAULT_PULL_QUOTE_MAX;

pub const DEFAULT_MAX_PHOTOS_PER_CHAPTER: usize = 3;

/// Runtime knobs for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagazineConfig {
    /// Names that earn name-match points and get emphasized in narrative text.
    /// Empty means "infer from the chapters".
    pub family_names: Vec<String>,
    pub max_photos_per_chapter: usize,
    pub pull_quote_max_length: usize,
}

impl Default for MagazineConfig {
    fn default() -> Self {
        Self {
            family_names: Vec::new(),
            max_photos_per_chapter: DEFAULT_MAX_PHOTOS_PER_CHAPTER,
            pull_quote_max_length: DEFAULT_PULL_QUOTE_MAX,
        }
    }
}
