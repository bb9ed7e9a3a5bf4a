//! Serializes a `DocumentDescription` into one self-contained HTML document.
//!
//! Paragraph and pull-quote strings arrive markup-ready from the assembler
//! (escaped, names emphasized) and are written verbatim. Everything else that
//! originated with the user (titles, subtitles, captions) is escaped here.

use std::path::Path;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::layout::{
    ChapterLayout, CoverPage, DocumentDescription, ImagePlacement, LayoutBlock, PhotoBlock,
    TextBlock, TocEntry,
};
use crate::render::stylesheet::STYLESHEET;

/// Widest grid class the stylesheet defines.
const MAX_GRID_COLUMNS: usize = 3;

pub fn to_html(document: &DocumentDescription) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n",
        encode_text(&document.cover.title)
    ));
    html.push_str("<style>");
    html.push_str(STYLESHEET);
    html.push_str("</style>\n</head>\n<body>\n");

    write_cover(&mut html, &document.cover);
    write_contents(&mut html, &document.contents);
    for chapter in &document.chapters {
        write_chapter(&mut html, chapter);
    }

    html.push_str("</body>\n</html>\n");
    html
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn write_cover(html: &mut String, cover: &CoverPage) {
    html.push_str("<div class=\"cover\">\n");
    if let Some(src) = cover.hero.as_ref().and_then(|h| h.src.as_deref()) {
        html.push_str(&format!(
            "<div class=\"cover-background\"><img src=\"{}\" alt=\"\"></div>\n",
            file_url(src)
        ));
    }
    html.push_str("<div class=\"cover-content\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", encode_text(&cover.title)));
    html.push_str(&format!("<h2>{}</h2>\n", encode_text(&cover.subtitle)));
    html.push_str(&format!(
        "<p class=\"date\">Created {}</p>\n",
        encode_text(&cover.created_on)
    ));
    html.push_str("</div>\n</div>\n");
}

fn write_contents(html: &mut String, entries: &[TocEntry]) {
    html.push_str("<div class=\"toc\">\n<h2>Contents</h2>\n");
    for entry in entries {
        html.push_str("<div class=\"toc-entry\">");
        if let Some(src) = entry.thumbnail.as_ref().and_then(|t| t.src.as_deref()) {
            html.push_str(&format!(
                "<img src=\"{}\" class=\"toc-thumbnail\" alt=\"\">",
                file_url(src)
            ));
        }
        html.push_str(&format!(
            "<div class=\"toc-chapter-title\">{}</div></div>\n",
            encode_text(&entry.title)
        ));
    }
    html.push_str("</div>\n");
}

fn write_chapter(html: &mut String, chapter: &ChapterLayout) {
    html.push_str("<div class=\"chapter\">\n");
    html.push_str(&format!(
        "<h2 class=\"chapter-title\">{}</h2>\n",
        encode_text(&chapter.title)
    ));
    for block in &chapter.blocks {
        write_block(html, block);
    }
    html.push_str("</div>\n");
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

fn write_block(html: &mut String, block: &LayoutBlock) {
    match block {
        LayoutBlock::Text(text) => write_text(html, text),
        LayoutBlock::Image(photo) => write_single_photo(html, photo),
        LayoutBlock::PullQuote { text } => write_pull_quote(html, text),
        LayoutBlock::Grid { photos } => write_grid(html, photos),
    }
}

fn write_text(html: &mut String, text: &TextBlock) {
    if text.two_column {
        html.push_str("<div class=\"chapter-narrative two-column\">\n");
    } else {
        html.push_str("<div class=\"chapter-narrative\">\n");
    }

    let quote_at = text.inset_quote.as_ref().map(|q| {
        (
            q.after_paragraph.min(text.paragraphs.len().saturating_sub(1)),
            q.text.as_str(),
        )
    });

    for (i, paragraph) in text.paragraphs.iter().enumerate() {
        html.push_str(&format!("<p>{paragraph}</p>\n"));
        if let Some((at, quote)) = quote_at {
            if at == i {
                write_pull_quote(html, quote);
            }
        }
    }
    html.push_str("</div>\n");
}

fn write_pull_quote(html: &mut String, text: &str) {
    html.push_str(&format!("<div class=\"pull-quote\">{text}</div>\n"));
}

fn write_single_photo(html: &mut String, photo: &PhotoBlock) {
    let class = match photo.placement {
        ImagePlacement::FullPage => "fullpage-image",
        _ => "image-embed",
    };
    html.push_str(&format!("<div class=\"{class}\">"));
    write_figure(html, photo);
    html.push_str("</div>\n");
}

fn write_grid(html: &mut String, photos: &[PhotoBlock]) {
    let placed: Vec<&PhotoBlock> = photos.iter().filter(|p| p.src.is_some()).collect();
    if placed.is_empty() {
        return;
    }

    let columns = placed.len().min(MAX_GRID_COLUMNS);
    html.push_str(&format!(
        "<div class=\"photo-grid photo-grid-{columns}\">\n"
    ));
    for photo in placed {
        html.push_str("<div class=\"photo-item\">");
        write_figure(html, photo);
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
}

/// `<img>` plus optional caption. Unresolved photos write nothing.
fn write_figure(html: &mut String, photo: &PhotoBlock) {
    let Some(src) = photo.src.as_deref() else {
        return;
    };
    let caption = photo.caption.as_deref().unwrap_or_default();
    html.push_str(&format!(
        "<img src=\"{}\" alt=\"{}\">",
        file_url(src),
        encode_double_quoted_attribute(caption)
    ));
    if !caption.is_empty() {
        html.push_str(&format!(
            "<p class=\"photo-caption\">{}</p>",
            encode_text(caption)
        ));
    }
}

fn file_url(path: &Path) -> String {
    let raw = format!("file://{}", path.display());
    encode_double_quoted_attribute(&raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::layout::blocks::InsetQuote;
    use crate::layout::LayoutTemplate;

    fn photo(name: &str, caption: Option<&str>, placement: ImagePlacement) -> PhotoBlock {
        PhotoBlock {
            filename: name.to_string(),
            caption: caption.map(str::to_string),
            placement,
            src: Some(PathBuf::from(format!("/srv/uploads/{name}"))),
        }
    }

    fn document(chapters: Vec<ChapterLayout>) -> DocumentDescription {
        DocumentDescription {
            cover: CoverPage {
                title: "Smith & Sons".to_string(),
                subtitle: "A Family Story".to_string(),
                created_on: "March 05, 2024".to_string(),
                hero: Some(photo("hero.jpg", None, ImagePlacement::Cover)),
            },
            contents: vec![TocEntry {
                position: 1,
                title: "<Early> Years".to_string(),
                thumbnail: Some(photo("thumb.jpg", None, ImagePlacement::Thumbnail)),
            }],
            chapters,
        }
    }

    #[test]
    fn test_cover_and_contents_are_escaped() {
        let html = to_html(&document(Vec::new()));
        assert!(html.contains("<h1>Smith &amp; Sons</h1>"));
        assert!(html.contains("&lt;Early&gt; Years"));
        assert!(html.contains("Created March 05, 2024"));
        assert!(html.contains("file:///srv/uploads/hero.jpg"));
        assert!(html.contains("class=\"toc-thumbnail\""));
    }

    #[test]
    fn test_stylesheet_is_embedded() {
        let html = to_html(&document(Vec::new()));
        assert!(html.contains("The Circle - Family Memory Album"));
    }

    #[test]
    fn test_grid_class_matches_photo_count() {
        let chapter = ChapterLayout {
            title: "Trip".to_string(),
            template: LayoutTemplate::GridWithText,
            blocks: vec![LayoutBlock::Grid {
                photos: vec![
                    photo("a.jpg", Some("Beach (1980)"), ImagePlacement::GridCell),
                    photo("b.jpg", None, ImagePlacement::GridCell),
                ],
            }],
        };
        let html = to_html(&document(vec![chapter]));
        assert!(html.contains("photo-grid photo-grid-2"));
        assert!(html.contains("<p class=\"photo-caption\">Beach (1980)</p>"));
    }

    #[test]
    fn test_wide_grid_uses_three_column_class() {
        let photos = (0..5)
            .map(|i| photo(&format!("{i}.jpg"), None, ImagePlacement::GridCell))
            .collect();
        let chapter = ChapterLayout {
            title: "Many".to_string(),
            template: LayoutTemplate::Simple,
            blocks: vec![LayoutBlock::Grid { photos }],
        };
        assert!(to_html(&document(vec![chapter])).contains("photo-grid-3"));
    }

    #[test]
    fn test_inset_quote_follows_its_paragraph() {
        let mut text = TextBlock::new(vec!["One.".to_string(), "Two.".to_string()], true);
        text.inset_quote = Some(InsetQuote {
            after_paragraph: 0,
            text: "Quoted.".to_string(),
        });
        let chapter = ChapterLayout {
            title: "Quote".to_string(),
            template: LayoutTemplate::FacingSpread,
            blocks: vec![LayoutBlock::Text(text)],
        };
        let html = to_html(&document(vec![chapter]));

        assert!(html.contains("chapter-narrative two-column"));
        let one = html.find("<p>One.</p>").unwrap();
        let quote = html.find("<div class=\"pull-quote\">Quoted.</div>").unwrap();
        let two = html.find("<p>Two.</p>").unwrap();
        assert!(one < quote && quote < two);
    }

    #[test]
    fn test_paragraph_markup_is_written_verbatim() {
        let chapter = ChapterLayout {
            title: "Names".to_string(),
            template: LayoutTemplate::Simple,
            blocks: vec![LayoutBlock::Text(TextBlock::new(
                vec!["<span class=\"highlight-name\">Mary</span> &amp; Tom".to_string()],
                false,
            ))],
        };
        let html = to_html(&document(vec![chapter]));
        assert!(html.contains("<p><span class=\"highlight-name\">Mary</span> &amp; Tom</p>"));
    }

    #[test]
    fn test_full_page_photo_class() {
        let chapter = ChapterLayout {
            title: "Spread".to_string(),
            template: LayoutTemplate::FacingSpread,
            blocks: vec![LayoutBlock::Image(photo(
                "big.jpg",
                Some("Say \"cheese\""),
                ImagePlacement::FullPage,
            ))],
        };
        let html = to_html(&document(vec![chapter]));
        assert!(html.contains("<div class=\"fullpage-image\">"));
        assert!(html.contains("alt=\"Say &quot;cheese&quot;\""));
    }
}
