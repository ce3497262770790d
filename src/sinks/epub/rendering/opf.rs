//! Package document additions `epub-builder` has no API for: the identifier
//! text, series, sort name, publisher and source metadata, and the `svg`
//! property on pages that inline store-link icons.
//!
//! They are spliced into `content.opf` after the container is generated; every
//! other entry of the archive is copied across untouched, which keeps the
//! uncompressed `mimetype` entry first.

use crate::book::{MetadataField, PackageMetadata};
use anyhow::{Context, Result};
use html_escape::encode_text;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

pub const OPF_PATH: &str = "OEBPS/content.opf";

/// Author id given to the first creator by the generated package document.
const CREATOR_ID: &str = "epub-creator-0";

/// `<metadata>` children for the entries the builder cannot write itself.
pub fn metadata_elements(meta: &PackageMetadata) -> Vec<String> {
    let has_series = meta.entry(MetadataField::Series).is_some();
    let mut elements = Vec::new();
    for (field, value) in &meta.entries {
        let value = encode_text(value);
        match field {
            MetadataField::Identifier => elements.push(format!(
                r#"<dc:identifier id="book-identifier">{value}</dc:identifier>"#
            )),
            MetadataField::Series => {
                elements.push(format!(
                    r#"<meta property="belongs-to-collection" id="series">{value}</meta>"#
                ));
                elements.push(
                    r##"<meta refines="#series" property="collection-type">series</meta>"##
                        .to_string(),
                );
            }
            MetadataField::Sequence if has_series => elements.push(format!(
                r##"<meta refines="#series" property="group-position">{value}</meta>"##
            )),
            MetadataField::Sequence => {
                log::debug!("Series position {value} given without a series, skipping");
            }
            MetadataField::FileAs => elements.push(format!(
                r##"<meta refines="#{CREATOR_ID}" property="file-as">{value}</meta>"##
            )),
            MetadataField::Publisher => {
                elements.push(format!("<dc:publisher>{value}</dc:publisher>"))
            }
            MetadataField::Source => elements.push(format!("<dc:source>{value}</dc:source>")),
            MetadataField::Description
            | MetadataField::Genre
            | MetadataField::Tags
            | MetadataField::Copyright
            | MetadataField::Published => {}
        }
    }
    elements
}

/// Rewrite the package document of a generated EPUB.
///
/// `svg_pages` are manifest hrefs of documents that contain inline SVG.
pub fn amend(epub: Vec<u8>, elements: &[String], svg_pages: &[String]) -> Result<Vec<u8>> {
    if elements.is_empty() && svg_pages.is_empty() {
        return Ok(epub);
    }

    let mut archive =
        ZipArchive::new(Cursor::new(epub)).with_context(|| "Failed to reopen generated EPUB")?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for i in 0..archive.len() {
        let is_opf = archive
            .by_index_raw(i)
            .with_context(|| format!("Failed to read EPUB entry {i}"))?
            .name()
            == OPF_PATH;
        if is_opf {
            let mut opf = String::new();
            archive
                .by_index(i)
                .with_context(|| "Failed to open package document")?
                .read_to_string(&mut opf)
                .with_context(|| "Failed to read package document")?;
            writer
                .start_file(OPF_PATH, FileOptions::default())
                .with_context(|| "Failed to restart package document")?;
            writer
                .write_all(rewrite(&opf, elements, svg_pages).as_bytes())
                .with_context(|| "Failed to write package document")?;
        } else {
            let entry = archive
                .by_index_raw(i)
                .with_context(|| format!("Failed to read EPUB entry {i}"))?;
            writer
                .raw_copy_file(entry)
                .with_context(|| format!("Failed to copy EPUB entry {i}"))?;
        }
    }

    let cursor = writer
        .finish()
        .with_context(|| "Failed to finish EPUB container")?;
    Ok(cursor.into_inner())
}

fn rewrite(opf: &str, elements: &[String], svg_pages: &[String]) -> String {
    let mut out = String::with_capacity(opf.len() + 64 * (elements.len() + svg_pages.len()));
    for line in opf.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("</metadata>") {
            for element in elements {
                out.push_str("    ");
                out.push_str(element);
                out.push('\n');
            }
        }
        let is_svg_item = trimmed.starts_with("<item ")
            && svg_pages
                .iter()
                .any(|href| trimmed.contains(&format!(r#"href="{href}""#)));
        if is_svg_item {
            out.push_str(&line.replacen("/>", r#" properties="svg"/>"#, 1));
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    const OPF: &str = r#"<package>
  <metadata>
    <dc:identifier id="epub-id-1">urn:uuid:x</dc:identifier>
  </metadata>
  <manifest>
    <item media-type="application/xhtml+xml" id="a" href="content/a.xhtml"/>
    <item media-type="application/xhtml+xml" id="b" href="content/b.xhtml"/>
  </manifest>
  <guide>
    <reference type="text" title="B" href="content/b.xhtml"/>
  </guide>
</package>"#;

    fn metadata(entries: Vec<(MetadataField, &str)>) -> PackageMetadata {
        PackageMetadata {
            title: "Tides".to_string(),
            author: "A. Writer".to_string(),
            identifier: "978-1-23".to_string(),
            language: "en".to_string(),
            cover: None,
            entries: entries
                .into_iter()
                .map(|(f, v)| (f, v.to_string()))
                .collect(),
            show_contents: true,
            toc_title: "Contents".to_string(),
            start_reading: true,
        }
    }

    #[test]
    fn series_and_identifier_become_elements() {
        let meta = metadata(vec![
            (MetadataField::Identifier, "978-1-23"),
            (MetadataField::Description, "Handled by the builder"),
            (MetadataField::Series, "Harbor & Sea"),
            (MetadataField::Publisher, "Small Press"),
            (MetadataField::Sequence, "2"),
        ]);
        assert_eq!(
            metadata_elements(&meta),
            vec![
                r#"<dc:identifier id="book-identifier">978-1-23</dc:identifier>"#.to_string(),
                r#"<meta property="belongs-to-collection" id="series">Harbor &amp; Sea</meta>"#
                    .to_string(),
                r##"<meta refines="#series" property="collection-type">series</meta>"##
                    .to_string(),
                "<dc:publisher>Small Press</dc:publisher>".to_string(),
                r##"<meta refines="#series" property="group-position">2</meta>"##.to_string(),
            ]
        );
    }

    #[test]
    fn sequence_needs_a_series() {
        let meta = metadata(vec![(MetadataField::Sequence, "2")]);
        assert!(metadata_elements(&meta).is_empty());
    }

    #[test]
    fn elements_go_at_the_end_of_the_metadata() {
        let out = rewrite(OPF, &["<dc:source>Web</dc:source>".to_string()], &[]);
        assert!(out.contains("urn:uuid:x</dc:identifier>\n    <dc:source>Web</dc:source>\n  </metadata>"));
    }

    #[test]
    fn svg_property_only_touches_manifest_items() {
        let out = rewrite(OPF, &[], &["content/b.xhtml".to_string()]);
        assert!(out.contains(
            r#"<item media-type="application/xhtml+xml" id="b" href="content/b.xhtml" properties="svg"/>"#
        ));
        assert!(out.contains(r#"id="a" href="content/a.xhtml"/>"#));
        assert!(out.contains(r#"<reference type="text" title="B" href="content/b.xhtml"/>"#));
    }
}
