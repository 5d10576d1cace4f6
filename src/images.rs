// ABOUTME: Finds remote image references in post bodies
// ABOUTME: Markdown and HTML scans plus local filename derivation

use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref MARKDOWN_IMAGE: Regex = Regex::new(r"!\[.*?\]\((https://.*?)\)").unwrap();
    static ref HTML_IMAGE: Regex =
        Regex::new(r#"(?i)<img\s+[^>]*src=["'](https://[^"'>\s]+)["']"#).unwrap();
}

/// Something that can fetch one image and store it at `dest`.
pub trait ImageFetcher {
    fn download_image(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Returns every `https://` image URL in `body`.
///
/// All Markdown `![..](..)` matches come first, then all HTML `<img src>`
/// matches. Order within each pass follows the text; duplicates are kept.
pub fn extract_image_urls(body: &str) -> Vec<String> {
    let markdown = MARKDOWN_IMAGE.captures_iter(body);
    let html = HTML_IMAGE.captures_iter(body);

    markdown
        .chain(html)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Filename an image is stored under: the last path segment with the query
/// removed. A fragment stays part of the name. `None` if nothing usable is left.
pub fn local_image_name(url: &str) -> Option<String> {
    let end = url.find('?').unwrap_or(url.len());
    let name = url[..end].rsplit('/').next().unwrap_or_default();

    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}
