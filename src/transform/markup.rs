use crate::html::{
    child_elements, detach, find_elements_by_name, find_first_element, has_name,
    parse_element, parse_nodes, replace_with, set_attribute, text_content,
};
use html_escape::encode_text;
use markup5ever_rcdom::Handle;

/// Marker opening a code block that sets the style of the blocks after it.
pub const STYLE_MARKER: &str = "%BINDER CSS%";

/// Rebuild the first paragraph with lead-in spans.
///
/// The paragraph keeps only its text: the first word is wrapped in
/// `.first-word`, and together with the next three words in
/// `.first-four-words` when there are at least four.
pub fn mark_first_paragraph(section: &Handle, extra_class: Option<&str>) {
    let Some(paragraph) = find_first_element(section, "p") else {
        return;
    };
    let text = text_content(&paragraph);
    let words: Vec<&str> = text.split_whitespace().collect();
    let Some((first, rest)) = words.split_first() else {
        return;
    };

    let lead = format!(r#"<span class="first-word">{} </span>"#, encode_text(first));
    let inner = if words.len() >= 4 {
        format!(
            r#"<span class="first-four-words">{lead}{} </span>{}"#,
            encode_text(&rest[..3].join(" ")),
            encode_text(&rest[3..].join(" "))
        )
    } else {
        format!("{lead}{}", encode_text(&rest.join(" ")))
    };

    let class = match extra_class {
        Some(extra) => format!("first-paragraph {extra}"),
        None => "first-paragraph".to_string(),
    };
    let Some(replacement) = parse_element(&format!(r#"<p class="{class}">{inner}</p>"#)) else {
        return;
    };
    replace_with(&paragraph, vec![replacement]);
}

/// Swap every `<hr>` for a themeable divider.
pub fn replace_horizontal_rules(section: &Handle) {
    for rule in find_elements_by_name(section, "hr") {
        replace_with(&rule, parse_nodes(r#"<div class="horizontal-rule"></div>"#));
    }
}

/// Apply `%BINDER CSS%` blocks to the top-level elements that follow them.
///
/// The style carries over from block to block until another marker changes
/// it; a marker with nothing after it clears it.
pub fn apply_rolling_style(section: &Handle) {
    child_elements(section)
        .into_iter()
        .fold(None::<String>, |style, element| {
            if let Some(next) = style_marker(&element) {
                detach(&element);
                return next;
            }
            if let Some(style) = &style {
                set_attribute(&element, "style", style);
            }
            style
        });
}

/// `Some(new style)` when the element is a marker block.
fn style_marker(element: &Handle) -> Option<Option<String>> {
    if !has_name(element, "pre") {
        return None;
    }
    let text = text_content(element);
    let rest = text.trim_start().strip_prefix(STYLE_MARKER)?;
    let style = rest.trim();
    Some((!style.is_empty()).then(|| style.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::html::{inner_xhtml, parse_element};

    fn section(html: &str) -> Handle {
        parse_element(&format!("<section>{html}</section>")).unwrap()
    }

    #[test]
    fn can_mark_long_first_paragraph() {
        let s = section("<h1>T</h1><p>It was a <em>dark</em> and stormy night.</p><p>Next.</p>");
        mark_first_paragraph(&s, None);
        assert_eq!(
            inner_xhtml(&s),
            concat!(
                "<h1>T</h1>",
                r#"<p class="first-paragraph"><span class="first-four-words"><span class="first-word">It </span>was a dark </span>and stormy night.</p>"#,
                "<p>Next.</p>"
            )
        );
    }

    #[test]
    fn can_mark_short_first_paragraph() {
        let s = section("<p>Hello there.</p>");
        mark_first_paragraph(&s, Some("front-matter"));
        assert_eq!(
            inner_xhtml(&s),
            r#"<p class="first-paragraph front-matter"><span class="first-word">Hello </span>there.</p>"#
        );
    }

    #[test]
    fn empty_first_paragraph_is_untouched() {
        let s = section("<p> </p><p>Later words here now.</p>");
        mark_first_paragraph(&s, None);
        assert_eq!(inner_xhtml(&s), "<p> </p><p>Later words here now.</p>");
    }

    #[test]
    fn can_replace_rules() {
        let s = section("<p>a</p><hr><blockquote><hr></blockquote>");
        replace_horizontal_rules(&s);
        assert_eq!(
            inner_xhtml(&s),
            r#"<p>a</p><div class="horizontal-rule"></div><blockquote><div class="horizontal-rule"></div></blockquote>"#
        );
    }

    #[test]
    fn rolling_style_applies_until_changed() {
        let s = section(concat!(
            "<p>plain</p>",
            "<pre><code>%BINDER CSS% text-align: center;\n</code></pre>",
            "<p>centered</p>",
            "<h2>also</h2>",
            "<pre><code>%BINDER CSS%</code></pre>",
            "<p>plain again</p>",
        ));
        apply_rolling_style(&s);
        assert_eq!(
            inner_xhtml(&s),
            concat!(
                "<p>plain</p>",
                r#"<p style="text-align: center;">centered</p>"#,
                r#"<h2 style="text-align: center;">also</h2>"#,
                "<p>plain again</p>",
            )
        );
    }

    #[test]
    fn ordinary_code_blocks_are_kept() {
        let s = section("<pre><code>let x = 1;</code></pre>");
        apply_rolling_style(&s);
        assert_eq!(inner_xhtml(&s), "<pre><code>let x = 1;</code></pre>");
    }
}
