//! Document Assembler — cover, table of contents, and chapter layouts for one run.
//!
//! Flow: effective family names → cover hero → TOC thumbnails (max 1 per chapter,
//! consumed) → per-chapter matching → narrative preparation → layout → path resolution.
//!
//! One `DocumentAssembler` is one run: it owns the run's `UsedImageSet` and is
//! consumed by `assemble`. Nothing here touches the filesystem except through
//! the injected `PhotoResolver`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use html_escape::encode_text;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{sanitize_filename, PhotoResolver};
use crate::errors::AppError;
use crate::layout::{
    compose, ChapterLayout, CoverPage, DocumentDescription, ImagePlacement, LayoutBlock,
    LayoutInput, PhotoBlock, TocEntry,
};
use crate::magazine::photo_matcher::{PhotoMatcher, UsedImageSet};
use crate::magazine::text_analysis::{extract_pull_quote, highlight_names, infer_family_names};
use crate::magazine::MagazineConfig;
use crate::models::chapter::Chapter;
use crate::models::photo::PhotoMetadata;

pub const DEFAULT_TITLE: &str = "The Making of a Life";
pub const DEFAULT_SUBTITLE: &str = "A Family Story";

/// Photos tried for the thumbnail of one TOC entry.
const TOC_THUMBNAILS_PER_CHAPTER: usize = 1;
const COVER_TITLE_HINT: &str = "family";

// ────────────────────────────────────────────────────────────────────────────
// Request / Result
// ────────────────────────────────────────────────────────────────────────────

/// A document-generation request as accepted over HTTP.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentRequest {
    pub chapters: Vec<Chapter>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    /// Filename of an explicit cover photo.
    #[serde(default)]
    pub hero_photo: Option<String>,
    /// When false the catalog is never loaded and the document is text-only.
    #[serde(default = "default_include_photos")]
    pub include_photos: bool,
    /// Overrides configured names for this run.
    #[serde(default)]
    pub family_names: Option<Vec<String>>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_subtitle() -> String {
    DEFAULT_SUBTITLE.to_string()
}

fn default_include_photos() -> bool {
    true
}

impl DocumentRequest {
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self {
            chapters,
            title: default_title(),
            subtitle: default_subtitle(),
            hero_photo: None,
            include_photos: true,
            family_names: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledDocument {
    pub document: DocumentDescription,
    /// Size of the run's used set: every photo claimed, resolvable or not.
    pub unique_photos_used: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Assembler
// ────────────────────────────────────────────────────────────────────────────

pub struct DocumentAssembler<'a> {
    config: &'a MagazineConfig,
    resolver: &'a dyn PhotoResolver,
    base_dir: &'a Path,
    used: UsedImageSet,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(config: &'a MagazineConfig, resolver: &'a dyn PhotoResolver, base_dir: &'a Path) -> Self {
        Self {
            config,
            resolver,
            base_dir,
            used: UsedImageSet::new(),
        }
    }

    /// Builds the full document description. `catalog` must already be in
    /// catalog order (newest year first); it is never mutated.
    pub fn assemble(
        mut self,
        request: &DocumentRequest,
        catalog: &[PhotoMetadata],
        created_on: NaiveDate,
    ) -> Result<AssembledDocument, AppError> {
        if request.chapters.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one chapter is required".to_string(),
            ));
        }

        let names = self.effective_family_names(request);
        debug!("Family names in effect: {:?}", names);
        let matcher = PhotoMatcher::new(&names);

        let cover = CoverPage {
            title: request.title.clone(),
            subtitle: request.subtitle.clone(),
            created_on: created_on.format("%B %d, %Y").to_string(),
            hero: self.select_hero(request.hero_photo.as_deref(), catalog),
        };

        let contents = self.build_contents(&matcher, &request.chapters, catalog);

        let chapters = request
            .chapters
            .iter()
            .map(|chapter| self.build_chapter(&matcher, &names, chapter, catalog))
            .collect();

        info!("Used {} unique images", self.used.len());

        Ok(AssembledDocument {
            document: DocumentDescription {
                cover,
                contents,
                chapters,
            },
            unique_photos_used: self.used.len(),
        })
    }

    /// Request names, then configured names, then names inferred from the chapters.
    fn effective_family_names(&self, request: &DocumentRequest) -> Vec<String> {
        let clean = |names: &[String]| -> Vec<String> {
            names
                .iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect()
        };

        if let Some(names) = request.family_names.as_deref() {
            let names = clean(names);
            if !names.is_empty() {
                return names;
            }
        }
        let configured = clean(&self.config.family_names);
        if !configured.is_empty() {
            return configured;
        }
        infer_family_names(&request.chapters)
    }

    // ── Cover ────────────────────────────────────────────────────────────────

    /// Explicit hero when given (no fallback if it does not resolve); otherwise the
    /// first resolvable photo with tagged people or "family" in its title, then the
    /// first catalog photo.
    fn select_hero(&mut self, explicit: Option<&str>, catalog: &[PhotoMetadata]) -> Option<PhotoBlock> {
        if let Some(filename) = explicit.map(str::trim).filter(|f| !f.is_empty()) {
            let Some(src) = self.resolver.resolve(self.base_dir, filename) else {
                warn!("Hero photo {filename} could not be resolved, cover has no image");
                return None;
            };
            // Claim the name the resolver looked up, so "./a.jpg" and "a.jpg"
            // are the same photo.
            let key = sanitize_filename(filename)?;
            let entry = catalog.iter().find(|p| {
                p.filename == filename || sanitize_filename(&p.filename).as_deref() == Some(key.as_str())
            });
            let block = match entry {
                Some(photo) => PhotoBlock::from_photo(photo, ImagePlacement::Cover),
                None => PhotoBlock {
                    filename: key,
                    caption: None,
                    placement: ImagePlacement::Cover,
                    src: None,
                },
            };
            self.used.mark_used(&block.filename);
            return Some(PhotoBlock {
                src: Some(src),
                ..block
            });
        }

        let preferred = catalog.iter().filter(|p| {
            p.has_people() || p.title.to_lowercase().contains(COVER_TITLE_HINT)
        });

        for photo in preferred.chain(catalog.first()) {
            if self.used.contains(&photo.filename) {
                continue;
            }
            if let Some(src) = self.resolver.resolve(self.base_dir, &photo.filename) {
                self.used.mark_used(&photo.filename);
                debug!("Cover photo: {}", photo.filename);
                return Some(PhotoBlock {
                    src: Some(src),
                    ..PhotoBlock::from_photo(photo, ImagePlacement::Cover)
                });
            }
        }
        None
    }

    // ── Table of contents ────────────────────────────────────────────────────

    /// One entry per chapter, keyed by position. Each thumbnail match consumes its
    /// photo, so it never reappears in that chapter's body.
    fn build_contents(
        &mut self,
        matcher: &PhotoMatcher<'_>,
        chapters: &[Chapter],
        catalog: &[PhotoMetadata],
    ) -> Vec<TocEntry> {
        let mut entries = Vec::with_capacity(chapters.len());
        for (i, chapter) in chapters.iter().enumerate() {
            let matched = matcher.match_photos(
                &chapter.title,
                &chapter.narrative,
                catalog,
                &mut self.used,
                TOC_THUMBNAILS_PER_CHAPTER,
            );
            let thumbnail = matched.first().and_then(|photo| {
                let src = self.resolve_or_warn(&photo.filename)?;
                Some(PhotoBlock {
                    src: Some(src),
                    ..PhotoBlock::from_photo(photo, ImagePlacement::Thumbnail)
                })
            });

            entries.push(TocEntry {
                position: i + 1,
                title: chapter.title.clone(),
                thumbnail,
            });
        }
        entries
    }

    // ── Chapters ─────────────────────────────────────────────────────────────

    fn build_chapter(
        &mut self,
        matcher: &PhotoMatcher<'_>,
        names: &[String],
        chapter: &Chapter,
        catalog: &[PhotoMetadata],
    ) -> ChapterLayout {
        let matched = matcher.match_photos(
            &chapter.title,
            &chapter.narrative,
            catalog,
            &mut self.used,
            self.config.max_photos_per_chapter,
        );
        if !matched.is_empty() {
            info!(
                "Matched {} photos to '{}'",
                matched.len(),
                chapter.title.chars().take(40).collect::<String>()
            );
        }

        // Unresolvable photos stay claimed but never reach the layout.
        let mut resolved: HashMap<String, PathBuf> = HashMap::with_capacity(matched.len());
        let placeable: Vec<PhotoMetadata> = matched
            .into_iter()
            .filter(|photo| match self.resolve_or_warn(&photo.filename) {
                Some(src) => {
                    resolved.insert(photo.filename.clone(), src);
                    true
                }
                None => false,
            })
            .collect();

        let narrative = prepare_narrative(&chapter.narrative, names, self.config.pull_quote_max_length);

        let composed = compose(&LayoutInput {
            text: &narrative.markup,
            text_length: narrative.length,
            pull_quote: narrative.pull_quote.as_deref(),
            photos: &placeable,
        });

        let blocks = composed
            .blocks
            .into_iter()
            .map(|block| attach_sources(block, &resolved))
            .collect();

        ChapterLayout {
            title: chapter.title.clone(),
            template: composed.template,
            blocks,
        }
    }

    fn resolve_or_warn(&self, filename: &str) -> Option<PathBuf> {
        let src = self.resolver.resolve(self.base_dir, filename);
        if src.is_none() {
            warn!("Skipping unresolvable photo {filename}");
        }
        src
    }
}

/// A chapter narrative ready for layout.
struct PreparedNarrative {
    /// Escaped text with names emphasized.
    markup: String,
    /// Characters in the emphasized text before escaping.
    length: usize,
    /// Escaped pull quote.
    pull_quote: Option<String>,
}

/// Pull quote and length come from the plain narrative; escaping only affects
/// what is written out.
fn prepare_narrative(narrative: &str, names: &[String], pull_quote_max_length: usize) -> PreparedNarrative {
    let length = highlight_names(narrative, names).chars().count();
    let pull_quote = extract_pull_quote(narrative, pull_quote_max_length)
        .map(|quote| encode_text(&quote).into_owned());

    let escaped_names: Vec<String> = names
        .iter()
        .map(|n| encode_text(n).into_owned())
        .collect();
    let markup = highlight_names(&encode_text(narrative), &escaped_names);

    PreparedNarrative {
        markup,
        length,
        pull_quote,
    }
}

fn attach_sources(block: LayoutBlock, resolved: &HashMap<String, PathBuf>) -> LayoutBlock {
    let attach = |photo: PhotoBlock| PhotoBlock {
        src: resolved.get(&photo.filename).cloned(),
        ..photo
    };
    match block {
        LayoutBlock::Image(photo) => LayoutBlock::Image(attach(photo)),
        LayoutBlock::Grid { photos } => LayoutBlock::Grid {
            photos: photos.into_iter().map(attach).collect(),
        },
        other => other,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
