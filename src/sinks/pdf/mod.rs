//! Paginated (PDF) output.
//!
//! The book is written out as one HTML document with the paged-media
//! stylesheet in front of the book's own, next to a `resources/` folder so
//! the rewritten image sources still resolve. An external paginator turns
//! that document into the PDF.

use crate::assembler::AssembledBook;
use crate::book::RESOURCES_DIR;
use crate::sinks::Packager;
use crate::style::paged::PageStyle;
use anyhow::{anyhow, bail, Context, Result};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Turns an HTML document into a PDF.
pub trait Paginator: Debug + Send + Sync {
    fn paginate(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Runs an external program. `{input}` and `{output}` in the arguments are
/// replaced with the document and PDF paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPaginator {
    command: Vec<String>,
}

pub fn default_paginator_command() -> Vec<String> {
    vec![
        "weasyprint".to_string(),
        "{input}".to_string(),
        "{output}".to_string(),
    ]
}

impl Default for CommandPaginator {
    fn default() -> Self {
        CommandPaginator::new(default_paginator_command())
    }
}

impl CommandPaginator {
    pub fn new(command: Vec<String>) -> CommandPaginator {
        CommandPaginator { command }
    }

    fn expand(&self, input: &Path, output: &Path) -> Result<(String, Vec<String>)> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow!("The paginator command is empty"))?;
        let input = input.display().to_string();
        let output = output.display().to_string();
        let args = args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
            .collect();
        Ok((program.clone(), args))
    }
}

impl Paginator for CommandPaginator {
    fn paginate(&self, input: &Path, output: &Path) -> Result<()> {
        let (program, args) = self.expand(input, output)?;
        log::info!("Running {program} {}", args.join(" "));
        let result = Command::new(&program)
            .args(&args)
            .output()
            .with_context(|| format!("Failed to run `{program}`"))?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            bail!("{program} failed: {}", stderr.trim());
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct PdfPackager {
    work_dir: PathBuf,
    page: PageStyle,
    paginator: Box<dyn Paginator>,
}

impl PdfPackager {
    /// `work_dir` holds the intermediate document and is left in place for
    /// the caller to clean up.
    pub fn new<P: AsRef<Path>>(
        work_dir: P,
        page: PageStyle,
        paginator: Box<dyn Paginator>,
    ) -> PdfPackager {
        PdfPackager {
            work_dir: work_dir.as_ref().to_path_buf(),
            page,
            paginator,
        }
    }

    /// Write the HTML document and its images, returning the document path.
    fn write_document(&self, book: &AssembledBook) -> Result<PathBuf> {
        let pdf_dir = self.work_dir.join("pdf");
        let resources_dir = self.work_dir.join(RESOURCES_DIR);
        for dir in [&pdf_dir, &resources_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        for resource in &book.resources {
            let path = resources_dir.join(&resource.name);
            std::fs::write(&path, &resource.data)
                .with_context(|| format!("Failed to write image {}", path.display()))?;
        }

        let cover = match &book.metadata.cover {
            Some(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "cover".to_string());
                let target = pdf_dir.join(format!("cover-{name}"));
                std::fs::copy(path, &target).with_context(|| {
                    format!("Failed to copy cover image {}", path.display())
                })?;
                format!(
                    r#"<div class="cover-page"><img src="cover-{src}" alt="" /></div>"#,
                    src = html_escape::encode_double_quoted_attribute(&name),
                )
            }
            None => String::new(),
        };

        let html = format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="UTF-8" />
<title>{title}</title>
<style>
{paged}
{stylesheet}
</style>
</head>
<body>
{cover}
{sections}
</body>
</html>"#,
            lang = html_escape::encode_double_quoted_attribute(&book.metadata.language),
            title = html_escape::encode_text(&book.metadata.title),
            paged = self.page.stylesheet(),
            stylesheet = book.stylesheet,
            sections = book
                .sections
                .iter()
                .map(|s| s.html.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        );

        let path = pdf_dir.join("book.html");
        std::fs::write(&path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

impl Packager for PdfPackager {
    fn package(&self, book: &AssembledBook) -> Result<Vec<u8>> {
        let input = self.write_document(book)?;
        let output = input.with_extension("pdf");
        self.paginator
            .paginate(&input, &output)
            .with_context(|| "Failed to paginate the book")?;
        std::fs::read(&output).with_context(|| format!("Failed to read {}", output.display()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::book::{BookMetadata, PackageMetadata, Resource, Section};

    /// Copies the document to the output so tests can inspect it.
    #[derive(Debug)]
    struct CopyPaginator;

    impl Paginator for CopyPaginator {
        fn paginate(&self, input: &Path, output: &Path) -> Result<()> {
            std::fs::copy(input, output)?;
            Ok(())
        }
    }

    fn book() -> AssembledBook {
        AssembledBook {
            sections: vec![Section {
                title: "One".to_string(),
                html: r#"<section class="binder-chapter"><img src="../resources/map.png" /></section>"#
                    .to_string(),
                exclude_from_contents: false,
                is_front_matter: false,
                is_back_matter: false,
            }],
            resources: vec![Resource {
                name: "map.png".to_string(),
                data: b"png".to_vec(),
            }],
            stylesheet: ".binder-chapter { color: black; }".to_string(),
            metadata: PackageMetadata::placeholder(&BookMetadata::default(), None),
        }
    }

    #[test]
    fn document_carries_page_styles_sections_and_images() {
        let dir = tempfile::tempdir().unwrap();
        let packager = PdfPackager::new(dir.path(), PageStyle::default(), Box::new(CopyPaginator));
        let bytes = packager.package(&book()).unwrap();
        let html = String::from_utf8(bytes).unwrap();

        assert!(html.contains("@page"));
        assert!(html.contains(".binder-chapter { color: black; }"));
        assert!(html.contains("../resources/map.png"));
        assert!(html.find("@page").unwrap() < html.find(".binder-chapter {").unwrap());
        assert_eq!(
            std::fs::read(dir.path().join("resources").join("map.png")).unwrap(),
            b"png"
        );
    }

    #[test]
    fn command_placeholders_are_expanded() {
        let paginator = CommandPaginator::new(vec![
            "prince".to_string(),
            "--output={output}".to_string(),
            "{input}".to_string(),
        ]);
        let (program, args) = paginator
            .expand(Path::new("/tmp/book.html"), Path::new("/tmp/book.pdf"))
            .unwrap();
        assert_eq!(program, "prince");
        assert_eq!(args, vec!["--output=/tmp/book.pdf", "/tmp/book.html"]);
    }

    #[test]
    fn empty_command_is_an_error() {
        let paginator = CommandPaginator::new(Vec::new());
        assert!(paginator
            .paginate(Path::new("in.html"), Path::new("out.pdf"))
            .is_err());
    }

    #[test]
    fn failing_paginator_fails_the_build() {
        let dir = tempfile::tempdir().unwrap();
        let paginator = CommandPaginator::new(vec![
            "binder-paginator-that-does-not-exist".to_string(),
            "{input}".to_string(),
        ]);
        let packager = PdfPackager::new(dir.path(), PageStyle::default(), Box::new(paginator));
        assert!(packager.package(&book()).is_err());
    }
}
