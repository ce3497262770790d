use super::{MatterContext, MatterTemplate, StorePlatform};
use html_escape::{encode_double_quoted_attribute, encode_text};

pub(super) fn render(template: MatterTemplate, context: &MatterContext, body_html: &str) -> String {
    let mut html = String::new();
    match template {
        MatterTemplate::Copyright => copyright(&mut html, context),
        MatterTemplate::Dedication => dedication(&mut html, context),
        MatterTemplate::Epigraph => epigraph(&mut html, context),
        MatterTemplate::Blurbs => blurbs(&mut html, context),
        MatterTemplate::TitlePage => title_page(&mut html, context),
        MatterTemplate::HalfTitle => heading(&mut html, context.text("Title")),
        MatterTemplate::AboutAuthor => about_author(&mut html, context),
        MatterTemplate::AlsoBy => also_by(&mut html, context),
        MatterTemplate::PreviewMore => preview_more(&mut html, context, body_html),
    }
    format!(
        r#"<div class="{}">{html}</div>"#,
        template.page_class()
    )
}

fn heading(html: &mut String, text: &str) {
    if !text.trim().is_empty() {
        html.push_str(&format!("<h1>{}</h1>", encode_text(text)));
    }
}

fn paragraph(html: &mut String, class: Option<&str>, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    match class {
        Some(class) => {
            html.push_str(&format!(r#"<p class="{class}">{}</p>"#, encode_text(text)));
        }
        None => {
            html.push_str(&format!("<p>{}</p>", encode_text(text)));
        }
    }
}

fn link(html: &mut String, href: &str, text: &str) {
    if href.trim().is_empty() {
        html.push_str(&encode_text(text));
    } else {
        html.push_str(&format!(
            r#"<a href="{}">{}</a>"#,
            encode_double_quoted_attribute(href),
            encode_text(text)
        ));
    }
}

fn nth(items: &[String], i: usize) -> &str {
    items.get(i).map(String::as_str).unwrap_or_default()
}

fn copyright(html: &mut String, context: &MatterContext) {
    let notice = format!(
        "{} \u{a9} {} {}.",
        context.text("Book Name"),
        context.text("Year"),
        context.text("Copyright Holder")
    );
    paragraph(html, None, notice.trim());
    paragraph(html, None, "All rights reserved.");
    for line in context.list("Collaborators") {
        paragraph(html, None, line);
    }
    for line in context.list("ISBNs") {
        paragraph(html, None, line);
    }
    paragraph(html, None, context.text("Disclaimer"));
    for line in context.list("Publishers") {
        paragraph(html, None, line);
    }
}

fn dedication(html: &mut String, context: &MatterContext) {
    heading(html, context.text("Title"));
    paragraph(html, Some("dedication"), context.text("Text"));
}

fn epigraph(html: &mut String, context: &MatterContext) {
    for quote in context.list("Quotes") {
        paragraph(html, Some("quote"), quote);
    }

    let author = context.text("Author");
    let source = context.text("Source");
    html.push_str(r#"<p class="attribution">"#);
    if source.trim().is_empty() {
        html.push_str(&format!(
            r#"<span class="author">{}</span>"#,
            encode_text(author)
        ));
    } else {
        html.push_str(&format!(
            r#"<span class="author">{},{}</span><span class="source">{}</span>"#,
            encode_text(author),
            '\u{a0}',
            encode_text(source)
        ));
    }
    html.push_str("</p>");
}

fn blurbs(html: &mut String, context: &MatterContext) {
    heading(html, context.text("Title"));
    let sources = context.list("Sources");
    for (i, blurb) in context.list("Blurbs").iter().enumerate() {
        paragraph(html, Some("blurb"), blurb);
        paragraph(html, Some("source"), nth(sources, i));
    }
}

fn title_page(html: &mut String, context: &MatterContext) {
    heading(html, context.text("Title"));
    paragraph(html, Some("subtitle"), context.text("Subtitle"));

    let authors = context.list("Author Names");
    if !authors.is_empty() {
        html.push_str(r#"<p class="authors">"#);
        for author in authors {
            html.push_str(&format!(
                r#"<span class="author">{}</span> "#,
                encode_text(author)
            ));
        }
        html.push_str("</p>");
    }

    let roles = context.list("Collaborator Roles");
    let names = context.list("Collaborator Names");
    if !roles.is_empty() {
        html.push_str(r#"<div class="collaborators">"#);
        for (i, role) in roles.iter().enumerate() {
            paragraph(html, Some("collaborator-role"), role);
            paragraph(html, Some("collaborator-name"), nth(names, i));
        }
        html.push_str("</div>");
    }

    let publisher = context.text("Publisher");
    if !publisher.trim().is_empty() {
        html.push_str(r#"<p class="publisher">"#);
        link(html, context.text("Publisher Link"), publisher);
        html.push_str("</p>");
    }
}

fn about_author(html: &mut String, context: &MatterContext) {
    heading(html, context.text("Title"));

    html.push_str(r#"<div class="about-author">"#);
    for line in context.list("About Authors") {
        paragraph(html, None, line);
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="links">"#);
    for platform in StorePlatform::all() {
        let href = context.text(&format!("Link To {}", platform.name()));
        if href.trim().is_empty() {
            continue;
        }
        html.push_str(&format!(
            r#"<a href="{}" class="binder-store-link">{}<span class="label">{}</span></a>"#,
            encode_double_quoted_attribute(href),
            platform.icon(),
            platform.name()
        ));
    }
    html.push_str("</div>");
}

fn also_by(html: &mut String, context: &MatterContext) {
    heading(html, context.text("Title"));
    let links = context.list("Links");
    let descriptions = context.list("Descriptions");
    for (i, book) in context.list("Books").iter().enumerate() {
        html.push_str(r#"<p class="book-title">"#);
        link(html, nth(links, i), book);
        html.push_str("</p>");
        paragraph(html, Some("book-description"), nth(descriptions, i));
    }
}

fn preview_more(html: &mut String, context: &MatterContext, body_html: &str) {
    heading(html, context.text("Title"));
    let book = context.text("Book");
    if !book.trim().is_empty() {
        html.push_str(r#"<p class="book-title">"#);
        link(html, context.text("Link"), book);
        html.push_str("</p>");
    }
    paragraph(html, Some("book-description"), context.text("Description"));
    if !body_html.trim().is_empty() {
        html.push_str(&format!(r#"<div class="preview-body">{body_html}</div>"#));
    }
}
