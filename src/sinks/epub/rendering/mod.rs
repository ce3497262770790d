//! EPUB rendering orchestration.
//!
//! Lays out the spine (cover, front matter, contents page, everything else)
//! and hands each page to `epub-builder`, which takes care of the OPF
//! manifest, the navigation document and the ZIP container. Each section is
//! its own XHTML document under `content/`.

mod cover;
mod opf;
mod toc;

use crate::assembler::AssembledBook;
use crate::book::{MetadataField, RESOURCES_DIR};
use crate::resources::mime_from_path;
use crate::sinks::Packager;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, ZipLibrary};
use std::io::Cursor;
use uuid::Uuid;

/// `epub-builder` reports `eyre` errors, which anyhow's `Context` cannot wrap.
trait EpubContext<T> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> EpubContext<T> for epub_builder::Result<T> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| anyhow::anyhow!("{e:#}").context(context()))
    }
}

/// Packages assembled books as EPUB 3.
#[derive(Debug, Default, Clone)]
pub struct EpubPackager;

/// One document in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Cover,
    Contents,
    Section(usize),
}

impl EpubPackager {
    pub fn new() -> EpubPackager {
        EpubPackager
    }
}

impl Packager for EpubPackager {
    fn package(&self, book: &AssembledBook) -> Result<Vec<u8>> {
        let meta = &book.metadata;

        let zip = ZipLibrary::new().with_context(|| "Failed to create ZIP library for EPUB")?;
        let mut builder = EpubBuilder::new(zip).with_context(|| "Failed to build builder")?;
        builder.epub_version(EpubVersion::V30);
        builder.set_uuid(package_uuid(&meta.identifier));

        builder
            .metadata("title", &meta.title)
            .with_context(|| "Failed to set title metadata")?;
        builder
            .metadata("author", &meta.author)
            .with_context(|| "Failed to set author metadata")?;
        builder
            .metadata("lang", &meta.language)
            .with_context(|| "Failed to set language metadata")?;
        builder
            .metadata("generator", "binder")
            .with_context(|| "Failed to set generator metadata")?;
        builder
            .metadata("toc_name", &meta.toc_title)
            .with_context(|| "Failed to set contents title")?;
        for (field, value) in &meta.entries {
            let key = match field {
                MetadataField::Description => "description",
                MetadataField::Genre | MetadataField::Tags => "subject",
                MetadataField::Copyright => "license",
                MetadataField::Published => {
                    match publication_date(value) {
                        Some(date) => builder.set_publication_date(date),
                        None => {
                            log::warn!("Unrecognised publication date '{value}', leaving it out")
                        }
                    }
                    continue;
                }
                // written into the package document afterwards
                _ => continue,
            };
            builder
                .metadata(key, value)
                .with_context(|| format!("Failed to set {key} metadata"))?;
        }

        builder
            .stylesheet(book.stylesheet.as_bytes())
            .with_context(|| "Failed to add stylesheet")?;

        let cover_image = match &meta.cover {
            Some(path) => {
                let data = std::fs::read(path)
                    .with_context(|| format!("Failed to read cover image: {}", path.display()))?;
                let ext = path
                    .extension()
                    .map(|e| e.to_string_lossy().to_ascii_lowercase())
                    .unwrap_or_else(|| "img".to_string());
                let name = format!("cover.{ext}");
                builder
                    .add_cover_image(&name, data.as_slice(), mime_from_path(path))
                    .with_context(|| {
                        format!("Failed to add cover image to EPUB: {}", path.display())
                    })?;
                Some(name)
            }
            None => None,
        };

        for resource in &book.resources {
            builder
                .add_resource(
                    format!("{RESOURCES_DIR}/{}", resource.name),
                    resource.data.as_slice(),
                    mime_from_path(&resource.name),
                )
                .with_context(|| format!("Failed to add resource {}", resource.name))?;
        }

        let pages = spine(book);
        let start = start_page(book, &pages);
        let mut svg_pages = Vec::new();
        for (i, page) in pages.iter().enumerate() {
            let content = match page {
                Page::Cover => {
                    let html = document(
                        &meta.title,
                        &meta.language,
                        &cover::render(meta, cover_image.as_deref()),
                    );
                    EpubContent::new("content/cover.xhtml", Cursor::new(html.into_bytes()))
                        .reftype(ReferenceType::Cover)
                }
                Page::Contents => {
                    let html = document(&meta.toc_title, &meta.language, &toc::render(book));
                    EpubContent::new("content/contents.xhtml", Cursor::new(html.into_bytes()))
                        .reftype(ReferenceType::Toc)
                }
                Page::Section(index) => {
                    let section = &book.sections[*index];
                    let html = document(&section.title, &meta.language, &section.html);
                    if section.html.contains("<svg") {
                        svg_pages.push(section_href(*index));
                    }
                    let mut content =
                        EpubContent::new(section_href(*index), Cursor::new(html.into_bytes()));
                    if !section.exclude_from_contents {
                        content = content.title(section.title.as_str());
                    }
                    content
                }
            };
            let content = if start == Some(i) {
                content.reftype(ReferenceType::Text)
            } else {
                content
            };
            builder
                .add_content(content)
                .with_context(|| format!("Failed to add {page:?} to EPUB"))?;
        }

        let mut bytes = Vec::new();
        builder
            .generate(&mut bytes)
            .with_context(|| "Failed to generate EPUB file")?;
        opf::amend(bytes, &opf::metadata_elements(meta), &svg_pages)
    }
}

/// `2024-03-01`, a bare year, or a full RFC 3339 timestamp.
fn publication_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        value
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
    })?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Cover first, then front matter, the contents page, and the rest.
fn spine(book: &AssembledBook) -> Vec<Page> {
    let mut pages = vec![Page::Cover];
    let front = book
        .sections
        .iter()
        .take_while(|s| s.is_front_matter)
        .count();
    pages.extend((0..front).map(Page::Section));
    if book.metadata.show_contents {
        pages.push(Page::Contents);
    }
    pages.extend((front..book.sections.len()).map(Page::Section));
    pages
}

/// Where the reader lands when opening the book: the first page after the
/// front matter, if the book asks for one.
fn start_page(book: &AssembledBook, pages: &[Page]) -> Option<usize> {
    if !book.metadata.start_reading {
        return None;
    }
    let is_section = |p: &Page| matches!(p, Page::Section(_));
    pages
        .iter()
        .position(|p| matches!(p, Page::Section(i) if !book.sections[*i].is_front_matter))
        .or_else(|| pages.iter().position(is_section))
}

fn section_file(index: usize) -> String {
    format!("section-{index:04}.xhtml")
}

fn section_href(index: usize) -> String {
    format!("content/{}", section_file(index))
}

/// Identifiers that are not UUIDs (ISBNs, say) get a stable name-based one.
fn package_uuid(identifier: &str) -> Uuid {
    Uuid::parse_str(identifier.trim())
        .unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, identifier.as_bytes()))
}

fn document(title: &str, lang: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
    <meta charset="UTF-8"/>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="../stylesheet.css"/>
</head>
<body>
{body}
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(lang),
        title = html_escape::encode_text(title),
        body = body,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::book::{PackageMetadata, Resource, Section};
    use std::io::Read;

    fn read_entry(epub: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(epub)).unwrap();
        let mut text = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    fn section(title: &str, front: bool, back: bool) -> Section {
        Section {
            title: title.to_string(),
            html: format!(r#"<section class="binder-chapter"><p>{title}</p></section>"#),
            exclude_from_contents: false,
            is_front_matter: front,
            is_back_matter: back,
        }
    }

    fn book(sections: Vec<Section>, show_contents: bool, start_reading: bool) -> AssembledBook {
        AssembledBook {
            sections,
            resources: Vec::new(),
            stylesheet: "p { margin: 0; }".to_string(),
            metadata: PackageMetadata {
                title: "The Harbor".to_string(),
                author: "Jo Writer".to_string(),
                identifier: "978-0-00-000000-0".to_string(),
                language: "en".to_string(),
                cover: None,
                entries: vec![(MetadataField::Description, "A story.".to_string())],
                show_contents,
                toc_title: "Contents".to_string(),
                start_reading,
            },
        }
    }

    #[test]
    fn contents_page_follows_front_matter() {
        let book = book(
            vec![
                section("Copyright", true, false),
                section("Dedication", true, false),
                section("One", false, false),
                section("About", false, true),
            ],
            true,
            true,
        );
        assert_eq!(
            spine(&book),
            vec![
                Page::Cover,
                Page::Section(0),
                Page::Section(1),
                Page::Contents,
                Page::Section(2),
                Page::Section(3),
            ]
        );
    }

    #[test]
    fn hidden_contents_leave_no_page() {
        let book = book(vec![section("One", false, false)], false, true);
        assert_eq!(spine(&book), vec![Page::Cover, Page::Section(0)]);
    }

    #[test]
    fn reading_starts_after_front_matter() {
        let book = book(
            vec![section("Copyright", true, false), section("One", false, false)],
            true,
            true,
        );
        let pages = spine(&book);
        assert_eq!(start_page(&book, &pages), Some(3));

        let hidden = AssembledBook {
            metadata: PackageMetadata {
                show_contents: false,
                ..book.metadata.clone()
            },
            ..book.clone()
        };
        let pages = spine(&hidden);
        assert_eq!(start_page(&hidden, &pages), Some(2));
    }

    #[test]
    fn reading_start_can_be_turned_off() {
        let book = book(vec![section("One", false, false)], true, false);
        assert_eq!(start_page(&book, &spine(&book)), None);
    }

    #[test]
    fn only_front_matter_starts_at_first_section() {
        let book = book(vec![section("Copyright", true, false)], true, true);
        assert_eq!(start_page(&book, &spine(&book)), Some(1));
    }

    #[test]
    fn uuid_identifiers_are_kept() {
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(package_uuid(id).to_string(), id);
    }

    #[test]
    fn other_identifiers_map_to_a_stable_uuid() {
        let a = package_uuid("978-0-00-000000-0");
        let b = package_uuid("978-0-00-000000-0");
        assert_eq!(a, b);
        assert_ne!(a, package_uuid("978-1-11-111111-1"));
    }

    #[test]
    fn documents_link_the_shared_stylesheet() {
        let html = document("A & B", "en", "<p>hi</p>");
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains(r#"href="../stylesheet.css""#));
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn packages_a_zip_container() {
        let mut book = book(
            vec![section("Copyright", true, false), section("One", false, false)],
            true,
            true,
        );
        book.resources.push(Resource {
            name: "map.png".to_string(),
            data: b"png".to_vec(),
        });
        let bytes = EpubPackager::new().package(&book).expect("can package");
        assert_eq!(&bytes[..2], b"PK");
        let opf = read_entry(&bytes, opf::OPF_PATH);
        assert!(opf.contains(r#"href="resources/map.png""#));
    }

    #[test]
    fn package_document_keeps_identifier_and_dates() {
        let mut book = book(vec![section("One", false, false)], false, true);
        book.metadata.identifier = "978-1-23".to_string();
        book.metadata.entries = vec![
            (MetadataField::Identifier, "978-1-23".to_string()),
            (MetadataField::Description, "A story.".to_string()),
            (MetadataField::Series, "Harbor".to_string()),
            (MetadataField::Published, "2020-01-01".to_string()),
            (MetadataField::Sequence, "2".to_string()),
        ];

        let bytes = EpubPackager::new().package(&book).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), "mimetype");

        let opf = read_entry(&bytes, opf::OPF_PATH);
        let uuid = package_uuid("978-1-23");
        assert!(opf.contains(&format!("urn:uuid:{uuid}")));
        assert!(opf.contains(r#"<dc:identifier id="book-identifier">978-1-23</dc:identifier>"#));
        assert!(opf.contains("<dc:date>2020-01-01T00:00:00Z</dc:date>"));
        assert!(opf.contains("<dc:description>A story.</dc:description>"));
        assert!(opf.contains(r#"<meta property="belongs-to-collection" id="series">Harbor</meta>"#));
        assert!(opf.contains(r##"<meta refines="#series" property="group-position">2</meta>"##));
    }

    #[test]
    fn blank_metadata_is_left_out_of_the_package() {
        let mut book = book(vec![section("One", false, false)], false, true);
        book.metadata.entries.clear();

        let bytes = EpubPackager::new().package(&book).unwrap();
        let opf = read_entry(&bytes, opf::OPF_PATH);
        for element in [
            "<dc:description",
            "<dc:subject",
            "<dc:rights",
            "<dc:date",
            "<dc:publisher",
            "<dc:source",
            "book-identifier",
            "belongs-to-collection",
            "file-as",
        ] {
            assert!(!opf.contains(element), "{element} should not be emitted");
        }
    }

    #[test]
    fn navigation_follows_contents_flags() {
        let mut hidden = section("Copyright", true, false);
        hidden.exclude_from_contents = true;
        let book = book(
            vec![
                hidden,
                section("Dedication", true, false),
                section("One", false, false),
                section("About", false, true),
            ],
            true,
            true,
        );

        let bytes = EpubPackager::new().package(&book).unwrap();
        let nav = read_entry(&bytes, "OEBPS/nav.xhtml");
        assert!(!nav.contains("section-0000.xhtml"));
        assert!(!nav.contains("contents.xhtml"));
        assert!(nav.contains(r#"<a href="content/section-0001.xhtml">Dedication</a>"#));
        assert!(nav.contains(r#"<a href="content/section-0003.xhtml">About</a>"#));
        assert!(nav.contains(r#"epub:type="bodymatter" href="content/section-0002.xhtml""#));

        let opf = read_entry(&bytes, opf::OPF_PATH);
        assert!(opf.contains(r#"<reference type="text" title="One" href="content/section-0002.xhtml"/>"#));

        let contents = read_entry(&bytes, "OEBPS/content/contents.xhtml");
        assert!(!contents.contains("Copyright"));
        assert!(contents.contains(r#"<li class="frontmatter"><a href="section-0001.xhtml">Dedication</a></li>"#));
        assert!(contents.contains(r#"<li class="backmatter"><a href="section-0003.xhtml">About</a></li>"#));
    }

    #[test]
    fn pages_with_inline_icons_declare_svg() {
        let mut icons = section("Buy", false, true);
        icons.html = r#"<section><a href="x"><svg viewBox="0 0 24 24"></svg></a></section>"#
            .to_string();
        let book = book(vec![section("One", false, false), icons], false, true);

        let bytes = EpubPackager::new().package(&book).unwrap();
        let opf = read_entry(&bytes, opf::OPF_PATH);
        let items: Vec<&str> = opf
            .lines()
            .filter(|l| l.trim_start().starts_with("<item "))
            .collect();
        assert!(items
            .iter()
            .any(|l| l.contains("section-0001.xhtml") && l.contains(r#"properties="svg""#)));
        assert!(items
            .iter()
            .any(|l| l.contains("section-0000.xhtml") && !l.contains("properties")));
    }

    #[test]
    fn publication_dates_accept_common_forms() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(publication_date("2020-01-01"), Some(expected));
        assert_eq!(publication_date(" 2020 "), Some(expected));
        assert_eq!(publication_date("2020-01-01T00:00:00Z"), Some(expected));
        assert_eq!(publication_date("last spring"), None);
    }
}
