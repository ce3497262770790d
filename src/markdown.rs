//! Markdown rendering.

use crate::html::{
    find_elements_by_name, get_attribute, inner_xhtml, parse_fragment, set_attribute,
};
use pulldown_cmark::{html as md_html, Options as MdOptions, Parser};
use std::path::Path;

/// Turns a chapter's markdown into an HTML fragment.
///
/// `context_path` is the chapter's vault-relative path. Relative image and
/// link references in the output, raw HTML included, are rewritten to be
/// vault-relative as well.
pub trait MarkdownRenderer: Sync {
    fn render(&self, markdown: &str, context_path: &Path) -> String;
}

/// CommonMark with the usual extensions.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonMarkRenderer;

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str, context_path: &Path) -> String {
        let mut options = MdOptions::empty();
        options.insert(MdOptions::ENABLE_TABLES);
        options.insert(MdOptions::ENABLE_FOOTNOTES);
        options.insert(MdOptions::ENABLE_STRIKETHROUGH);
        options.insert(MdOptions::ENABLE_TASKLISTS);
        options.insert(MdOptions::ENABLE_SMART_PUNCTUATION);

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        md_html::push_html(&mut html, Parser::new_ext(markdown, options));

        let base = context_path
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        rebase_references(&html, &base)
    }
}

/// Point relative `img src` and `a href` values of a fragment at `base`.
fn rebase_references(html: &str, base: &str) -> String {
    let body = parse_fragment(html);
    for (tag, attr) in [("img", "src"), ("a", "href")] {
        for element in find_elements_by_name(&body, tag) {
            if let Some(value) = get_attribute(&element, attr) {
                if is_relative_reference(&value) {
                    set_attribute(&element, attr, &resolve_relative(base, &value));
                }
            }
        }
    }
    inner_xhtml(&body)
}

fn is_relative_reference(url: &str) -> bool {
    let url = url.trim();
    !(url.is_empty()
        || url.starts_with('/')
        || url.starts_with('#')
        || url::Url::parse(url).is_ok())
}

/// Join a relative reference onto the chapter's directory.
fn resolve_relative(base: &str, url: &str) -> String {
    if !is_relative_reference(url) {
        return url.to_string();
    }

    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in url.trim().split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
