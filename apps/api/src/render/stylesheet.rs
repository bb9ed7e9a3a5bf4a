//! Magazine stylesheet embedded in every rendered document.
//!
//! Paged-media rules (`@page`, running header, page counter) target
//! HTML→PDF engines; browsers ignore them.

pub const RUNNING_HEADER: &str = "The Circle - Family Memory Album";

pub const STYLESHEET: &str = r#"
@page {
    size: A4;
    margin: 20mm;
    @top-center {
        content: "The Circle - Family Memory Album";
        font-family: Georgia, serif;
        font-size: 9pt;
        color: #888;
    }
    @bottom-center {
        content: counter(page);
        font-family: Georgia, serif;
        font-size: 9pt;
        color: #888;
    }
}
@page :first {
    @top-center { content: none; }
    @bottom-center { content: none; }
}

* { box-sizing: border-box; }

body {
    font-family: Georgia, serif;
    font-size: 11pt;
    line-height: 1.8;
    color: #333;
    margin: 0;
}

.cover {
    position: relative;
    min-height: 257mm;
    text-align: center;
    page-break-after: always;
    background: linear-gradient(to bottom, #F5F5DC 0%, #FFF 100%);
    padding: 40px;
}
.cover-background {
    position: absolute;
    top: 0;
    left: 0;
    width: 100%;
    height: 70%;
    overflow: hidden;
}
.cover-background img {
    width: 100%;
    height: 100%;
    object-fit: cover;
    opacity: 0.3;
}
.cover-content {
    position: relative;
    margin-top: 150mm;
    background: rgba(255, 255, 255, 0.95);
    padding: 40px;
    border-radius: 10px;
}
.cover h1 {
    font-size: 48pt;
    color: #8B4513;
    font-weight: normal;
    letter-spacing: 4px;
    margin: 0 0 20px 0;
}
.cover h2 {
    font-size: 20pt;
    color: #D4AF37;
    font-style: italic;
    font-weight: normal;
    margin: 0 0 30px 0;
}
.cover .date { font-size: 11pt; color: #666; }

.toc {
    page-break-after: always;
    padding: 60px 40px;
}
.toc h2 {
    font-size: 28pt;
    color: #8B4513;
    text-align: center;
    letter-spacing: 3px;
    margin-bottom: 40px;
}
.toc-entry {
    display: flex;
    align-items: center;
    margin: 20px 0;
    padding: 15px;
    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
}
.toc-thumbnail {
    width: 80px;
    height: 80px;
    object-fit: cover;
    margin-right: 20px;
    border-radius: 4px;
}
.toc-chapter-title {
    font-size: 14pt;
    color: #2c3e50;
    font-weight: 600;
    border-left: 4px solid #D4AF37;
    padding-left: 15px;
}

.chapter { page-break-before: always; margin-bottom: 40px; }
.chapter-title {
    font-size: 28pt;
    color: #D4AF37;
    text-align: center;
    letter-spacing: 3px;
    border-bottom: 2px solid #D4AF37;
    padding-bottom: 15px;
    margin: 30px 0 40px 0;
}
.chapter-narrative {
    text-align: justify;
    hyphens: auto;
    margin: 20px 0;
}
.chapter-narrative p { margin: 0 0 18px 0; }
.chapter-narrative.two-column {
    column-count: 2;
    column-gap: 35px;
    column-rule: 1px solid #DDD;
}

.highlight-name { color: #8B4513; font-weight: 600; }

.pull-quote {
    background: #F5F5DC;
    padding: 30px 35px;
    margin: 35px 0;
    border-left: 6px solid #D4AF37;
    font-size: 15pt;
    font-style: italic;
    color: #555;
    page-break-inside: avoid;
    column-span: all;
}

.fullpage-image {
    page-break-after: always;
    text-align: center;
}
.fullpage-image img { width: 100%; max-height: 230mm; object-fit: contain; }

.image-embed {
    margin: 25px auto;
    max-width: 60%;
    text-align: center;
    page-break-inside: avoid;
}
.image-embed img { width: 100%; border: 3px solid #DDD; }

.photo-grid { display: grid; gap: 18px; margin: 35px 0; page-break-inside: avoid; }
.photo-grid-1 { grid-template-columns: 1fr; }
.photo-grid-2 { grid-template-columns: 1fr 1fr; }
.photo-grid-3 { grid-template-columns: 2fr 1fr 1fr; }
.photo-item img { width: 100%; display: block; border: 3px solid #DDD; }

.photo-caption {
    font-size: 9.5pt;
    font-style: italic;
    color: #666;
    text-align: center;
    margin: 10px 0 0 0;
}
"#;
