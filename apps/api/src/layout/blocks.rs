//! Layout blocks — the structured units handed to the renderer.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::photo::PhotoMetadata;

static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").unwrap());

/// Where an image sits on the page. Drives the renderer's styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePlacement {
    Cover,
    Thumbnail,
    FullPage,
    Embedded,
    GridCell,
}

/// A photo placed on the page.
///
/// `src` is `None` until the assembler resolves the file through the path-safety
/// collaborator; blocks whose file cannot be resolved are dropped before rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoBlock {
    pub filename: String,
    pub caption: Option<String>,
    pub placement: ImagePlacement,
    pub src: Option<PathBuf>,
}

impl PhotoBlock {
    pub fn from_photo(photo: &PhotoMetadata, placement: ImagePlacement) -> Self {
        Self {
            filename: photo.filename.clone(),
            caption: compose_caption(photo),
            placement,
            src: None,
        }
    }
}

/// A pull quote set inside a text block, right after the paragraph at 0-based index `after_paragraph`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsetQuote {
    pub after_paragraph: usize,
    pub text: String,
}

/// A run of paragraphs. Paragraph strings are markup-ready (escaped, emphasis applied).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub paragraphs: Vec<String>,
    pub two_column: bool,
    pub inset_quote: Option<InsetQuote>,
}

impl TextBlock {
    pub fn new(paragraphs: Vec<String>, two_column: bool) -> Self {
        Self {
            paragraphs,
            two_column,
            inset_quote: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutBlock {
    Text(TextBlock),
    Image(PhotoBlock),
    PullQuote { text: String },
    Grid { photos: Vec<PhotoBlock> },
}

impl LayoutBlock {
    /// Filenames of every photo this block places.
    pub fn filenames(&self) -> Vec<&str> {
        match self {
            LayoutBlock::Image(photo) => vec![photo.filename.as_str()],
            LayoutBlock::Grid { photos } => photos.iter().map(|p| p.filename.as_str()).collect(),
            LayoutBlock::Text(_) | LayoutBlock::PullQuote { .. } => Vec::new(),
        }
    }
}

/// `"{title or description} ({year})"`, either part optional; `None` when both are missing.
pub fn compose_caption(photo: &PhotoMetadata) -> Option<String> {
    let label = [photo.title.trim(), photo.description.trim()]
        .into_iter()
        .find(|s| !s.is_empty());

    match (label, photo.year) {
        (Some(label), Some(year)) => Some(format!("{label} ({year})")),
        (Some(label), None) => Some(label.to_string()),
        (None, Some(year)) => Some(format!("({year})")),
        (None, None) => None,
    }
}

/// Splits narrative text on blank lines, trimming and discarding empty paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    BLANK_LINE_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(title: &str, description: &str, year: Option<i32>) -> PhotoMetadata {
        PhotoMetadata {
            id: 1,
            filename: "p.jpg".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            year,
            people: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_caption_title_and_year() {
        assert_eq!(
            compose_caption(&photo("Wedding day", "ignored", Some(1972))),
            Some("Wedding day (1972)".to_string())
        );
    }

    #[test]
    fn test_caption_falls_back_to_description() {
        assert_eq!(
            compose_caption(&photo("", "On the porch", None)),
            Some("On the porch".to_string())
        );
    }

    #[test]
    fn test_caption_year_only() {
        assert_eq!(compose_caption(&photo("", "", Some(1980))), Some("(1980)".to_string()));
    }

    #[test]
    fn test_caption_absent_when_nothing_known() {
        assert_eq!(compose_caption(&photo("", "", None)), None);
    }

    #[test]
    fn test_split_paragraphs_discards_empty() {
        let text = "First para.\n\n\n\nSecond para.\n  \nThird\nstill third.\n\n";
        assert_eq!(
            split_paragraphs(text),
            vec!["First para.", "Second para.", "Third\nstill third."]
        );
    }

    #[test]
    fn test_split_paragraphs_empty_input() {
        assert!(split_paragraphs("   ").is_empty());
    }

    #[test]
    fn test_block_serializes_with_kind_tag() {
        let block = LayoutBlock::PullQuote {
            text: "Hello.".to_string(),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "pull_quote");
        assert_eq!(json["text"], "Hello.");
    }
}
