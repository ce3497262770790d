//! The generated contents page.
//!
//! Lists every section that is not excluded from contents, in spine order.
//! Front and back matter entries carry a class so the contents components
//! can hide or restyle them.

use super::section_file;
use crate::assembler::AssembledBook;

pub fn render(book: &AssembledBook) -> String {
    let items: Vec<String> = book
        .sections
        .iter()
        .enumerate()
        .filter(|(_, section)| !section.exclude_from_contents)
        .map(|(i, section)| {
            let class = if section.is_front_matter {
                r#" class="frontmatter""#
            } else if section.is_back_matter {
                r#" class="backmatter""#
            } else {
                ""
            };
            format!(
                r#"<li{class}><a href="{href}">{title}</a></li>"#,
                href = section_file(i),
                title = html_escape::encode_text(&section.title),
            )
        })
        .collect();

    format!(
        r#"<nav id="toc" class="toc-page">
<h1 class="toc-title">{title}</h1>
<ol>
{items}
</ol>
</nav>"#,
        title = html_escape::encode_text(&book.metadata.toc_title),
        items = items.join("\n"),
    )
}
