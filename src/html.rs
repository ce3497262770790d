//! DOM helpers on top of html5ever.
//!
//! Chapter markup is parsed into an `RcDom`, rearranged in place and written
//! back out as XHTML. New nodes are made by parsing small snippets and moving
//! the resulting nodes into the tree.

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, Attribute, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};
use std::cell::RefCell;
use std::rc::Rc;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parse a full HTML document.
pub fn parse_html(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(html.as_bytes())
}

/// Parse an HTML fragment, returning the `<body>` that holds it.
///
/// The body is detached from its document: dropping an rcdom node empties its
/// whole subtree, so it must not stay under the discarded document.
pub fn parse_fragment(html: &str) -> Handle {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    let dom = parse_html(&wrapped);
    match find_first_element(&dom.document, "body") {
        Some(body) => {
            detach(&body);
            body
        }
        None => dom.document,
    }
}

/// Parse a snippet into detached top-level nodes.
pub fn parse_nodes(html: &str) -> Vec<Handle> {
    let body = parse_fragment(html);
    let nodes: Vec<Handle> = body.children.borrow_mut().drain(..).collect();
    for node in &nodes {
        node.parent.set(None);
    }
    nodes
}

/// Parse a snippet expected to hold exactly one element.
pub fn parse_element(html: &str) -> Option<Handle> {
    parse_nodes(html).into_iter().find(|n| is_element(n))
}

pub fn element_name(handle: &Handle) -> Option<&str> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub fn is_element(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Element { .. })
}

pub fn has_name(handle: &Handle, name: &str) -> bool {
    element_name(handle) == Some(name)
}

/// Element children of a node.
pub fn child_elements(handle: &Handle) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .filter(|c| is_element(c))
        .cloned()
        .collect()
}

/// Find elements by local name, in document order.
pub fn find_elements_by_name(handle: &Handle, name: &str) -> Vec<Handle> {
    let mut results = Vec::new();
    find_elements_recursive(handle, name, &mut results);
    results
}

fn find_elements_recursive(handle: &Handle, name: &str, results: &mut Vec<Handle>) {
    if has_name(handle, name) {
        results.push(handle.clone());
    }
    for child in handle.children.borrow().iter() {
        find_elements_recursive(child, name, results);
    }
}

/// Get the first element with the given local name.
pub fn find_first_element(handle: &Handle, name: &str) -> Option<Handle> {
    if has_name(handle, name) {
        return Some(handle.clone());
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_first_element(child, name) {
            return Some(found);
        }
    }
    None
}

/// Text content of a node, ignoring tags.
pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    text_recursive(handle, &mut text);
    text
}

fn text_recursive(handle: &Handle, text: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => text.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in handle.children.borrow().iter() {
                text_recursive(child, text);
            }
        }
        _ => {}
    }
}

pub fn get_attribute(handle: &Handle, attr_name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = handle.data {
        for attr in attrs.borrow().iter() {
            if attr.name.local.as_ref() == attr_name {
                return Some(attr.value.to_string());
            }
        }
    }
    None
}

pub fn set_attribute(handle: &Handle, attr_name: &str, value: &str) {
    if let NodeData::Element { ref attrs, .. } = handle.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(attr) = attrs.iter_mut().find(|a| a.name.local.as_ref() == attr_name) {
            attr.value = value.into();
            return;
        }
        attrs.push(Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(attr_name)),
            value: value.into(),
        });
    }
}

/// A new, empty HTML element.
pub fn create_element(name: &str) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(
            None,
            Namespace::from("http://www.w3.org/1999/xhtml"),
            LocalName::from(name),
        ),
        attrs: RefCell::new(Vec::new()),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Move detached nodes to the end of `parent`.
pub fn append_children(parent: &Handle, nodes: Vec<Handle>) {
    for node in &nodes {
        node.parent.set(Some(Rc::downgrade(parent)));
    }
    parent.children.borrow_mut().extend(nodes);
}

/// Remove a node from its parent.
pub fn detach(node: &Handle) {
    let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) else {
        return;
    };
    parent
        .children
        .borrow_mut()
        .retain(|c| !Rc::ptr_eq(c, node));
}

/// Put detached nodes where `target` is, removing `target`.
pub fn replace_with(target: &Handle, nodes: Vec<Handle>) {
    insert_before(target, nodes);
    detach(target);
}

/// Insert detached nodes in front of `target`.
pub fn insert_before(target: &Handle, nodes: Vec<Handle>) {
    let Some(parent) = target.parent.take().and_then(|weak| weak.upgrade()) else {
        return;
    };
    target.parent.set(Some(Rc::downgrade(&parent)));

    for node in &nodes {
        node.parent.set(Some(Rc::downgrade(&parent)));
    }
    let mut children = parent.children.borrow_mut();
    let index = children
        .iter()
        .position(|c| Rc::ptr_eq(c, target))
        .unwrap_or(children.len());
    children.splice(index..index, nodes);
}

/// Serialize a node, including itself, as XHTML.
pub fn to_xhtml(handle: &Handle) -> String {
    let mut out = String::new();
    write_node(handle, &mut out);
    out
}

/// Serialize the children of a node as XHTML.
pub fn inner_xhtml(handle: &Handle) -> String {
    let mut out = String::new();
    for child in handle.children.borrow().iter() {
        write_node(child, &mut out);
    }
    out
}

fn write_node(handle: &Handle, out: &mut String) {
    match handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                write_node(child, out);
            }
        }
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs.borrow().iter() {
                out.push(' ');
                if let Some(prefix) = &attr.name.prefix {
                    out.push_str(prefix.as_ref());
                    out.push(':');
                }
                out.push_str(attr.name.local.as_ref());
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
                out.push('"');
            }

            let children = handle.children.borrow();
            if children.is_empty() && VOID_ELEMENTS.contains(&tag) {
                out.push_str(" />");
                return;
            }
            out.push('>');
            for child in children.iter() {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeData::Text { ref contents } => {
            out.push_str(&html_escape::encode_text(&**contents.borrow()));
        }
        _ => {}
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_serialize_void_elements_as_xhtml() {
        let body = parse_fragment(r#"<p>a<br>b</p><img src="x.png" alt="A &amp; B"><hr>"#);
        assert_eq!(
            inner_xhtml(&body),
            r#"<p>a<br />b</p><img src="x.png" alt="A &amp; B" /><hr />"#
        );
    }

    #[test]
    fn text_is_escaped() {
        let body = parse_fragment("<p>1 &lt; 2 &amp;&amp; 3 &gt; 2</p>");
        assert_eq!(inner_xhtml(&body), "<p>1 &lt; 2 &amp;&amp; 3 &gt; 2</p>");
        assert_eq!(text_content(&body), "1 < 2 && 3 > 2");
    }

    #[test]
    fn can_replace_and_detach() {
        let body = parse_fragment("<p>one</p><hr><p>two</p>");
        let hr = find_first_element(&body, "hr").unwrap();
        replace_with(&hr, parse_nodes(r#"<div class="horizontal-rule"></div>"#));
        assert_eq!(
            inner_xhtml(&body),
            r#"<p>one</p><div class="horizontal-rule"></div><p>two</p>"#
        );

        let first = find_first_element(&body, "p").unwrap();
        detach(&first);
        assert_eq!(
            inner_xhtml(&body),
            r#"<div class="horizontal-rule"></div><p>two</p>"#
        );
    }

    #[test]
    fn can_edit_attributes() {
        let p = parse_element(r#"<p class="a">x</p>"#).unwrap();
        set_attribute(&p, "class", "a b");
        set_attribute(&p, "style", "color: red");
        assert_eq!(get_attribute(&p, "class").as_deref(), Some("a b"));
        assert_eq!(to_xhtml(&p), r#"<p class="a b" style="color: red">x</p>"#);
    }

    #[test]
    fn created_elements_hold_parsed_children() {
        let section = create_element("section");
        set_attribute(&section, "class", "a");
        append_children(&section, parse_nodes("<p>x</p></section><p>y</p>"));
        assert_eq!(
            to_xhtml(&section),
            r#"<section class="a"><p>x</p><p>y</p></section>"#
        );
    }

    #[test]
    fn inserted_nodes_know_their_parent() {
        let body = parse_fragment("<p>x</p>");
        let p = find_first_element(&body, "p").unwrap();
        let nodes = parse_nodes("<h1>T</h1>");
        let h1 = nodes[0].clone();
        insert_before(&p, nodes);
        assert_eq!(inner_xhtml(&body), "<h1>T</h1><p>x</p>");
        detach(&h1);
        assert_eq!(inner_xhtml(&body), "<p>x</p>");
    }
}
