//! Turning one chapter into a finished `<section>`.
//!
//! Matter chapters are rendered by their template. Prose chapters go through
//! the markdown renderer and are then reworked in place: a numbered heading,
//! the lead-in of the first paragraph, themeable dividers, rolling inline
//! styles and store-link icons. Images of both kinds are resolved and pointed
//! at the bundled copies.

mod images;
mod markup;
pub mod number_words;
mod store_links;

pub use images::LocalImage;
pub use markup::STYLE_MARKER;

use crate::book::{Chapter, ChapterKind};
use crate::html::{append_children, create_element, parse_nodes, set_attribute, to_xhtml};
use crate::markdown::MarkdownRenderer;
use crate::matter::MatterContext;
use crate::resources::{ResourceNames, ResourceResolver};
use html_escape::encode_text;
use markup5ever_rcdom::Handle;

/// The result of transforming one chapter.
#[derive(Debug, Clone)]
pub struct TransformedChapter {
    /// The `<section>` element as XHTML
    pub html: String,
    pub images: Vec<LocalImage>,
    /// Whether this chapter took a number from the running count
    pub is_numbered: bool,
    /// Section title supplied by a matter template
    pub title: Option<String>,
}

pub struct ChapterTransform<'a> {
    renderer: &'a dyn MarkdownRenderer,
    resolver: &'a ResourceResolver,
}

fn section_classes(chapter: &Chapter, extra: Option<&str>) -> String {
    let mut classes = vec!["binder-chapter"];
    classes.extend(extra);
    if chapter.is_front_matter() {
        classes.push("frontmatter");
    }
    if chapter.is_back_matter() {
        classes.push("backmatter");
    }
    classes.join(" ")
}

fn build_section(classes: &str, inner: &str) -> Handle {
    let section = create_element("section");
    set_attribute(&section, "class", classes);
    append_children(&section, parse_nodes(inner));
    section
}

fn chapter_heading(number: usize, title: &str) -> String {
    format!(
        concat!(
            r#"<h1 class="chapter-number">"#,
            r#"<span class="chapter-word">Chapter </span>"#,
            r#"<span class="chapter-number-numeric">{number}</span>"#,
            r#"<span class="chapter-number-text">{words}</span>"#,
            "</h1>",
            r#"<div class="chapter-title-divider"></div>"#,
            r#"<h1 class="chapter-title">{title}</h1>"#,
        ),
        number = number,
        words = number_words::to_capitalized_words(number as u64),
        title = encode_text(title),
    )
}

impl<'a> ChapterTransform<'a> {
    pub fn new(renderer: &'a dyn MarkdownRenderer, resolver: &'a ResourceResolver) -> Self {
        ChapterTransform { renderer, resolver }
    }

    /// Transform a chapter whose kind was classified up front.
    ///
    /// `number` is the value of the running chapter count; it is used only
    /// when the chapter turns out to be numbered.
    pub fn transform(
        &self,
        chapter: &Chapter,
        kind: ChapterKind,
        markdown: &str,
        number: usize,
        names: &mut ResourceNames,
    ) -> TransformedChapter {
        match kind {
            ChapterKind::Matter(template) => {
                let context = MatterContext::parse(markdown);
                let body_html = if context.body().is_empty() {
                    String::new()
                } else {
                    self.renderer.render(context.body(), &chapter.file)
                };
                let inner = template.render(&context, &body_html);
                let section = build_section(&section_classes(chapter, Some("binder-matter")), &inner);
                let images = images::localize_images(&section, self.resolver, names);

                TransformedChapter {
                    html: to_xhtml(&section),
                    images,
                    is_numbered: false,
                    title: Some(template.name().to_string()),
                }
            }
            ChapterKind::Normal => {
                let is_numbered = chapter.is_numbered();
                let mut inner = if is_numbered {
                    chapter_heading(number, &chapter.title)
                } else {
                    String::new()
                };
                inner.push_str(&self.renderer.render(markdown, &chapter.file));
                let section = build_section(&section_classes(chapter, None), &inner);

                let matter_class = if chapter.is_front_matter() {
                    Some("front-matter")
                } else if chapter.is_back_matter() {
                    Some("back-matter")
                } else {
                    None
                };
                markup::mark_first_paragraph(&section, matter_class);
                markup::replace_horizontal_rules(&section);
                markup::apply_rolling_style(&section);
                store_links::replace_store_links(&section);
                let images = images::localize_images(&section, self.resolver, names);

                TransformedChapter {
                    html: to_xhtml(&section),
                    images,
                    is_numbered,
                    title: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::book::ChapterBuilder;
    use crate::markdown::CommonMarkRenderer;
    use crate::matter::MatterTemplate;
    use crate::resources::test::StaticFetcher;
    use crate::resources::TEMP_DIR;

    fn resolver(vault: &std::path::Path) -> ResourceResolver {
        ResourceResolver::new(
            vault.to_path_buf(),
            vault.join(TEMP_DIR),
            Box::new(StaticFetcher::serving(b"img")),
        )
    }

    fn chapter(title: &str) -> Chapter {
        ChapterBuilder::default()
            .title(title)
            .file("book/chapter.md")
            .build()
            .unwrap()
    }

    #[test]
    fn numbered_chapter_gets_heading() {
        let vault = tempfile::tempdir().unwrap();
        let resolver = resolver(vault.path());
        let transform = ChapterTransform::new(&CommonMarkRenderer, &resolver);
        let mut names = ResourceNames::default();

        let out = transform.transform(
            &chapter("Rain & Snow"),
            ChapterKind::Normal,
            "The rain fell all night long.\n\n***\n\nMorning.\n",
            21,
            &mut names,
        );
        assert!(out.is_numbered);
        assert_eq!(out.title, None);
        assert!(out.html.starts_with(r#"<section class="binder-chapter"><h1 class="chapter-number">"#));
        assert!(out.html.contains(r#"<span class="chapter-number-numeric">21</span>"#));
        assert!(out.html.contains(r#"<span class="chapter-number-text">Twenty-one</span>"#));
        assert!(out.html.contains(r#"<h1 class="chapter-title">Rain &amp; Snow</h1>"#));
        assert!(out.html.contains(r#"<p class="first-paragraph"><span class="first-four-words">"#));
        assert!(out.html.contains(r#"<div class="horizontal-rule"></div>"#));
        assert!(out.html.ends_with("</section>"));
    }

    #[test]
    fn front_matter_prose_has_no_heading() {
        let vault = tempfile::tempdir().unwrap();
        let resolver = resolver(vault.path());
        let transform = ChapterTransform::new(&CommonMarkRenderer, &resolver);
        let mut preface = chapter("Preface");
        preface.set_front_matter(true);

        let out = transform.transform(
            &preface,
            ChapterKind::Normal,
            "A few words first.",
            1,
            &mut ResourceNames::default(),
        );
        assert!(!out.is_numbered);
        assert!(!out.html.contains("chapter-number"));
        assert!(out.html.starts_with(r#"<section class="binder-chapter frontmatter">"#));
        assert!(out.html.contains(r#"<p class="first-paragraph front-matter">"#));
    }

    #[test]
    fn matter_chapter_uses_template() {
        let vault = tempfile::tempdir().unwrap();
        let resolver = resolver(vault.path());
        let transform = ChapterTransform::new(&CommonMarkRenderer, &resolver);
        let mut copyright = chapter("_binder Copyright");
        copyright.set_front_matter(true);

        let out = transform.transform(
            &copyright,
            ChapterKind::Matter(MatterTemplate::Copyright),
            "---\nBook Name: Tides\nYear: 2024\nCopyright Holder: Me\n---\nignored",
            1,
            &mut ResourceNames::default(),
        );
        assert!(!out.is_numbered);
        assert_eq!(out.title.as_deref(), Some("Copyright"));
        assert!(out.html.starts_with(
            r#"<section class="binder-chapter binder-matter frontmatter"><div class="copyright-page">"#
        ));
        assert!(!out.html.contains("ignored"));
    }

    #[test]
    fn stray_section_end_tags_stay_inside_the_chapter() {
        let vault = tempfile::tempdir().unwrap();
        let resolver = resolver(vault.path());
        let transform = ChapterTransform::new(&CommonMarkRenderer, &resolver);

        let out = transform.transform(
            &chapter("Loose"),
            ChapterKind::Normal,
            "First part.\n\n</section>\n\nStill here.\n",
            1,
            &mut ResourceNames::default(),
        );
        assert!(out.html.contains("Still here."));
        assert!(out.html.ends_with("</section>"));
        assert_eq!(out.html.matches("<section").count(), 1);
        assert_eq!(out.html.matches("</section>").count(), 1);
    }

    #[test]
    fn chapter_images_are_localized() {
        let vault = tempfile::tempdir().unwrap();
        let resolver = resolver(vault.path());
        let transform = ChapterTransform::new(&CommonMarkRenderer, &resolver);

        let out = transform.transform(
            &chapter("Maps"),
            ChapterKind::Normal,
            "<img src=\"https://example.com/a.png\">\n",
            1,
            &mut ResourceNames::default(),
        );
        assert_eq!(out.images.len(), 1);
        assert_eq!(out.images[0].name, "a.png");
        assert!(out.html.contains(r#"<img src="../resources/a.png" />"#));
    }
}
