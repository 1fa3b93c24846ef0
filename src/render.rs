//! Markup for each project. No I/O, no failure: absent fields render empty.
//!
//! Fields that upstream already delivers as HTML (`extract_html`,
//! `displaytitle`, the commonsapi author, [`CommonsView::description`]) pass
//! through; plain-text fields and attribute values are escaped.

use crate::types::Align;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Fields of a Wikipedia page summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryView {
    pub title_html: String,
    pub extract_html: String,
    pub page_url: String,
    pub description: String,
    pub thumbnail: Option<Thumbnail>,
}

/// Fields of a Commons file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonsView {
    pub file_url: String,
    pub thumbnail_url: String,
    pub file_name: String,
    pub file_title: String,
    /// Markup: the tool's HTML description or an already escaped caption.
    pub description: String,
    pub date: String,
    pub author: String,
    pub license: String,
}

/// Fields of a Wikidata item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikidataView {
    pub page_url: String,
    pub icon_url: String,
    pub label: String,
    pub description: String,
}

pub fn error_paragraph(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, text(message))
}

/// `<blockquote><a><strong>title</strong></a>[image link]extract</blockquote>`
pub fn summary_block(view: &SummaryView) -> String {
    let href = attr(&view.page_url);
    let image = view
        .thumbnail
        .as_ref()
        .map(|thumb| {
            format!(
                r#"<a href="{}"><img src="{}" alt="{}" width="{}" height="{}" /></a>"#,
                href,
                attr(&thumb.source),
                attr(&view.description),
                thumb.width,
                thumb.height
            )
        })
        .unwrap_or_default();
    format!(
        r#"<blockquote class="embed-wikimedia"><a href="{}"><strong>{}</strong></a>{}{}</blockquote>"#,
        href, view.title_html, image, view.extract_html
    )
}

/// Caption text: `description &mdash; <a>title</a> (date) by author, license.`
pub fn commons_caption(view: &CommonsView) -> String {
    format!(
        r#"{} &mdash; <a href="{}">{}</a> ({}) by {}, {}."#,
        view.description,
        attr(&view.file_url),
        text(&view.file_title),
        text(&view.date),
        view.author,
        text(&view.license)
    )
}

/// Linked thumbnail wrapped in a caption block.
pub fn commons_figure(view: &CommonsView, width: u32, align: Align) -> String {
    let image = format!(
        r#"<a href="{}"><img src="{}" alt="{}" /></a>"#,
        attr(&view.file_url),
        attr(&view.thumbnail_url),
        attr(&view.file_name)
    );
    caption_block(&image, &commons_caption(view), width, align)
}

/// Host-style image caption: a `figure` sized to the image.
pub fn caption_block(content: &str, caption: &str, width: u32, align: Align) -> String {
    format!(
        r#"<figure style="width: {}px" class="wp-caption {}">{}<figcaption class="wp-caption-text">{}</figcaption></figure>"#,
        width,
        align.class(),
        content,
        caption
    )
}

/// Compact legend: icon, bold linked label, then the description.
pub fn wikidata_legend(view: &WikidataView) -> String {
    format!(
        r#"<blockquote class="embed-wikimedia wikidata"><strong><a href="{}"><img src="{}" alt="Wikidata logo" /> {}</a>:</strong> {}</blockquote>"#,
        attr(&view.page_url),
        attr(&view.icon_url),
        text(&view.label),
        text(&view.description)
    )
}
