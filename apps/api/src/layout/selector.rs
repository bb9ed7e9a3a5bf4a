//! Layout Selector — chooses a page composition per chapter and arranges its blocks.
//!
//! # Template rules (first match wins)
//! - FacingSpread:  exactly 1 photo and text > 800 chars
//! - GridWithText:  2+ photos (grid capped at 3)
//! - EmbeddedImage: exactly 1 photo and text > 400 chars
//! - Simple:        everything else
//!
//! Rules live in `LAYOUT_RULES`; composition dispatches on `LayoutTemplate`.
//! A new template needs one rule entry and one `compose_*` arm.

use serde::Serialize;

use crate::layout::blocks::{
    split_paragraphs, ImagePlacement, InsetQuote, LayoutBlock, PhotoBlock, TextBlock,
};
use crate::models::photo::PhotoMetadata;

const FACING_SPREAD_MIN_CHARS: usize = 800;
const EMBEDDED_IMAGE_MIN_CHARS: usize = 400;
const TWO_COLUMN_MIN_CHARS: usize = 1200;
/// Photos beyond this are dropped from a grid layout.
pub const GRID_MAX_PHOTOS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutTemplate {
    FacingSpread,
    GridWithText,
    EmbeddedImage,
    Simple,
}

/// Everything the selector needs for one chapter.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    /// Markup-ready narrative (escaped, names emphasized).
    pub text: &'a str,
    /// Characters in the emphasized narrative before escaping. Template
    /// thresholds compare against this, not against `text`.
    pub text_length: usize,
    pub pull_quote: Option<&'a str>,
    pub photos: &'a [PhotoMetadata],
}

impl LayoutInput<'_> {
    fn wants_two_columns(&self) -> bool {
        self.text_length > TWO_COLUMN_MIN_CHARS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedLayout {
    pub template: LayoutTemplate,
    pub blocks: Vec<LayoutBlock>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rule table
// ────────────────────────────────────────────────────────────────────────────

struct LayoutRule {
    template: LayoutTemplate,
    applies: fn(&LayoutInput<'_>) -> bool,
}

const LAYOUT_RULES: &[LayoutRule] = &[
    LayoutRule {
        template: LayoutTemplate::FacingSpread,
        applies: fits_facing_spread,
    },
    LayoutRule {
        template: LayoutTemplate::GridWithText,
        applies: fits_grid_with_text,
    },
    LayoutRule {
        template: LayoutTemplate::EmbeddedImage,
        applies: fits_embedded_image,
    },
];

fn fits_facing_spread(input: &LayoutInput<'_>) -> bool {
    input.photos.len() == 1 && input.text_length > FACING_SPREAD_MIN_CHARS
}

fn fits_grid_with_text(input: &LayoutInput<'_>) -> bool {
    input.photos.len() >= 2
}

fn fits_embedded_image(input: &LayoutInput<'_>) -> bool {
    input.photos.len() == 1 && input.text_length > EMBEDDED_IMAGE_MIN_CHARS
}

/// Evaluates `LAYOUT_RULES` in order; `Simple` when none applies.
pub fn select_template(input: &LayoutInput<'_>) -> LayoutTemplate {
    LAYOUT_RULES
        .iter()
        .find(|rule| (rule.applies)(input))
        .map(|rule| rule.template)
        .unwrap_or(LayoutTemplate::Simple)
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

/// Selects a template and arranges text, photos, and pull quote into blocks.
pub fn compose(input: &LayoutInput<'_>) -> ComposedLayout {
    let template = select_template(input);
    let paragraphs = split_paragraphs(input.text);

    let blocks = match template {
        LayoutTemplate::FacingSpread => compose_facing_spread(input, paragraphs),
        LayoutTemplate::GridWithText => compose_grid_with_text(input, paragraphs),
        LayoutTemplate::EmbeddedImage => compose_embedded_image(input, paragraphs),
        LayoutTemplate::Simple => compose_simple(input, paragraphs),
    };

    ComposedLayout { template, blocks }
}

/// Full-page photo, then all paragraphs with the quote set after the middle one.
fn compose_facing_spread(input: &LayoutInput<'_>, paragraphs: Vec<String>) -> Vec<LayoutBlock> {
    let mut blocks = Vec::with_capacity(2);
    if let Some(photo) = input.photos.first() {
        blocks.push(LayoutBlock::Image(PhotoBlock::from_photo(
            photo,
            ImagePlacement::FullPage,
        )));
    }

    if !paragraphs.is_empty() {
        let halfway = paragraphs.len() / 2;
        let mut text = TextBlock::new(paragraphs, false);
        text.inset_quote = input.pull_quote.map(|q| InsetQuote {
            after_paragraph: halfway,
            text: q.to_string(),
        });
        blocks.push(LayoutBlock::Text(text));
    }
    blocks
}

/// Lead paragraph, quote, grid of up to three photos, then the remaining text.
fn compose_grid_with_text(input: &LayoutInput<'_>, paragraphs: Vec<String>) -> Vec<LayoutBlock> {
    let mut rest = paragraphs.into_iter();
    let mut blocks = Vec::with_capacity(4);

    if let Some(lead) = rest.next() {
        blocks.push(LayoutBlock::Text(TextBlock::new(vec![lead], false)));
    }
    push_pull_quote(&mut blocks, input.pull_quote);

    blocks.push(grid_block(
        input.photos.iter().take(GRID_MAX_PHOTOS),
    ));

    let remaining: Vec<String> = rest.collect();
    if !remaining.is_empty() {
        blocks.push(LayoutBlock::Text(TextBlock::new(
            remaining,
            input.wants_two_columns(),
        )));
    }
    blocks
}

/// Lead paragraph, a centered photo, then the remaining text. No pull quote.
fn compose_embedded_image(input: &LayoutInput<'_>, paragraphs: Vec<String>) -> Vec<LayoutBlock> {
    let mut rest = paragraphs.into_iter();
    let mut blocks = Vec::with_capacity(3);

    if let Some(lead) = rest.next() {
        blocks.push(LayoutBlock::Text(TextBlock::new(vec![lead], false)));
    }
    if let Some(photo) = input.photos.first() {
        blocks.push(LayoutBlock::Image(PhotoBlock::from_photo(
            photo,
            ImagePlacement::Embedded,
        )));
    }

    let remaining: Vec<String> = rest.collect();
    if !remaining.is_empty() {
        blocks.push(LayoutBlock::Text(TextBlock::new(remaining, false)));
    }
    blocks
}

/// All text, then the quote, then any photos as a trailing grid.
fn compose_simple(input: &LayoutInput<'_>, paragraphs: Vec<String>) -> Vec<LayoutBlock> {
    let mut blocks = Vec::with_capacity(3);
    if !paragraphs.is_empty() {
        blocks.push(LayoutBlock::Text(TextBlock::new(
            paragraphs,
            input.wants_two_columns(),
        )));
    }
    push_pull_quote(&mut blocks, input.pull_quote);
    if !input.photos.is_empty() {
        blocks.push(grid_block(input.photos.iter()));
    }
    blocks
}

fn push_pull_quote(blocks: &mut Vec<LayoutBlock>, quote: Option<&str>) {
    if let Some(text) = quote {
        blocks.push(LayoutBlock::PullQuote {
            text: text.to_string(),
        });
    }
}

fn grid_block<'p>(photos: impl Iterator<Item = &'p PhotoMetadata>) -> LayoutBlock {
    LayoutBlock::Grid {
        photos: photos
            .map(|p| PhotoBlock::from_photo(p, ImagePlacement::GridCell))
            .collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
