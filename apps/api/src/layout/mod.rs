// Page composition: block model, template selection, and the document description.
// Pure data transforms; nothing here touches the filesystem or the renderer.

pub mod blocks;
pub mod document;
pub mod selector;

pub use blocks::{ImagePlacement, LayoutBlock, PhotoBlock, TextBlock};
pub use document::{ChapterLayout, CoverPage, DocumentDescription, TocEntry};
pub use selector::{compose, LayoutInput, LayoutTemplate};
