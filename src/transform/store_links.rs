//! Store-link token replacement.
//!
//! A run of top-level paragraphs made only of `%BINDER <PLATFORM> LINK%`
//! anchors becomes centred rows of icon links, three to a row. Tokens used
//! inside ordinary text are swapped for an icon link where they stand.

use crate::html::{
    detach, find_elements_by_name, get_attribute, has_name, insert_before, is_element,
    parse_nodes, replace_with, text_content,
};
use crate::matter::StorePlatform;
use html_escape::encode_double_quoted_attribute;
use markup5ever_rcdom::{Handle, NodeData};

const ROW_SIZE: usize = 3;

struct LinkParagraph {
    paragraph: Handle,
    links: Vec<(StorePlatform, String)>,
}

pub fn replace_store_links(section: &Handle) {
    let children: Vec<Handle> = section.children.borrow().clone();

    let mut run: Vec<LinkParagraph> = Vec::new();
    for child in children {
        if is_blank_text(&child) {
            continue;
        }
        match link_paragraph(&child) {
            Some(links) => run.push(LinkParagraph {
                paragraph: child,
                links,
            }),
            None => flush(&mut run),
        }
    }
    flush(&mut run);

    for anchor in find_elements_by_name(section, "a") {
        if let Some(platform) = StorePlatform::from_token(&text_content(&anchor)) {
            let href = get_attribute(&anchor, "href").unwrap_or_default();
            replace_with(&anchor, parse_nodes(&platform.link(&href)));
        }
    }
}

fn is_blank_text(node: &Handle) -> bool {
    match node.data {
        NodeData::Text { ref contents } => contents.borrow().trim().is_empty(),
        NodeData::Comment { .. } => true,
        _ => false,
    }
}

/// The links of a paragraph holding nothing but store-link anchors.
fn link_paragraph(node: &Handle) -> Option<Vec<(StorePlatform, String)>> {
    if !has_name(node, "p") {
        return None;
    }

    let mut links = Vec::new();
    for child in node.children.borrow().iter() {
        if is_blank_text(child) || has_name(child, "br") {
            continue;
        }
        if !is_element(child) || !has_name(child, "a") {
            return None;
        }
        let platform = StorePlatform::from_token(&text_content(child))?;
        links.push((platform, get_attribute(child, "href").unwrap_or_default()));
    }

    (!links.is_empty()).then_some(links)
}

fn flush(run: &mut Vec<LinkParagraph>) {
    let Some(first) = run.first() else {
        return;
    };

    let style = get_attribute(&first.paragraph, "style")
        .map(|style| format!(r#" style="{}""#, encode_double_quoted_attribute(&style)))
        .unwrap_or_default();
    let links: Vec<&(StorePlatform, String)> = run.iter().flat_map(|p| p.links.iter()).collect();

    let mut html = String::new();
    for row in links.chunks(ROW_SIZE) {
        html.push_str(&format!(r#"<div class="binder-store-link-container"{style}>"#));
        for (platform, href) in row {
            html.push_str(&platform.link(href));
        }
        html.push_str("</div>");
    }

    insert_before(&first.paragraph, parse_nodes(&html));
    for paragraph in run.drain(..) {
        detach(&paragraph.paragraph);
    }
}
