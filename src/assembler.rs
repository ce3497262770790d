//! Book assembly.
//!
//! The assembler drops excluded chapters, regroups the rest into front matter,
//! story and back matter, and transforms them one after another while keeping
//! the running chapter number. Its output is everything a packager needs:
//! sections in spine order, the bundled images, the stylesheet and the
//! package metadata.

use crate::book::{
    rearrange_chapters, BookMetadata, Chapter, ChapterKind, PackageMetadata, Resource, Section,
};
use crate::markdown::MarkdownRenderer;
use crate::resources::{ResourceNames, ResourceResolver};
use crate::transform::ChapterTransform;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// A chapter that stops the whole build.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChapterError {
    #[error("Chapter title is required for file: {file}")]
    MissingTitle { file: String },
}

/// Everything needed to package a book.
#[derive(Debug, Clone)]
pub struct AssembledBook {
    pub sections: Vec<Section>,
    pub resources: Vec<Resource>,
    pub stylesheet: String,
    pub metadata: PackageMetadata,
}

pub struct Assembler<'a> {
    vault: &'a Path,
    renderer: &'a dyn MarkdownRenderer,
    resolver: &'a ResourceResolver,
}

impl<'a> Assembler<'a> {
    pub fn new(
        vault: &'a Path,
        renderer: &'a dyn MarkdownRenderer,
        resolver: &'a ResourceResolver,
    ) -> Self {
        Assembler {
            vault,
            renderer,
            resolver,
        }
    }

    /// Validate the book and assemble it for packaging.
    pub fn assemble(
        &self,
        chapters: &[Chapter],
        metadata: &BookMetadata,
        stylesheet: &str,
        progress: &ProgressBar,
    ) -> Result<AssembledBook> {
        metadata.validate(chapters)?;
        let cover = self
            .resolver
            .resolve(&metadata.cover)
            .with_context(|| format!("Failed to find cover image {}", metadata.cover))?;
        self.build(chapters, metadata.package(Some(cover)), stylesheet, progress)
    }

    /// Assemble with placeholder metadata. Only chapter problems stop a
    /// preview; a missing cover gives a text cover.
    pub fn preview(
        &self,
        chapters: &[Chapter],
        metadata: &BookMetadata,
        stylesheet: &str,
        progress: &ProgressBar,
    ) -> Result<AssembledBook> {
        let cover = if metadata.cover.trim().is_empty() {
            None
        } else {
            match self.resolver.resolve(&metadata.cover) {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Previewing without a cover: {e:#}");
                    None
                }
            }
        };
        let package = PackageMetadata::placeholder(metadata, cover);
        self.build(chapters, package, stylesheet, progress)
    }

    fn build(
        &self,
        chapters: &[Chapter],
        metadata: PackageMetadata,
        stylesheet: &str,
        progress: &ProgressBar,
    ) -> Result<AssembledBook> {
        let mut included: Vec<Chapter> = chapters.iter().filter(|c| c.include).cloned().collect();
        rearrange_chapters(&mut included);

        // every title is checked before anything is rendered
        if let Some(untitled) = included.iter().find(|c| c.title.trim().is_empty()) {
            return Err(ChapterError::MissingTitle {
                file: file_name(&untitled.file),
            }
            .into());
        }

        progress.set_length(included.len() as u64);
        let transform = ChapterTransform::new(self.renderer, self.resolver);
        let mut names = ResourceNames::default();
        let mut bundled: HashSet<String> = HashSet::new();
        let mut sections = Vec::with_capacity(included.len());
        let mut resources = Vec::new();
        let mut number = 1;

        for chapter in &included {
            progress.set_message(chapter.title.clone());
            let path = self.vault.join(&chapter.file);
            let markdown = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read chapter {}", path.display()))?;

            let kind = ChapterKind::classify(&chapter.title);
            let out = transform.transform(chapter, kind, &markdown, number, &mut names);
            if out.is_numbered {
                number += 1;
            }

            for image in out.images {
                if bundled.contains(&image.name) {
                    continue;
                }
                match std::fs::read(&image.path) {
                    Ok(data) => {
                        bundled.insert(image.name.clone());
                        resources.push(Resource {
                            name: image.name,
                            data,
                        });
                    }
                    Err(e) => log::warn!("Failed to read image {}: {e}", image.path.display()),
                }
            }

            sections.push(Section {
                title: out.title.unwrap_or_else(|| chapter.title.clone()),
                html: out.html,
                exclude_from_contents: chapter.exclude_from_contents,
                is_front_matter: chapter.is_front_matter(),
                is_back_matter: chapter.is_back_matter(),
            });
            progress.inc(1);
        }

        Ok(AssembledBook {
            sections,
            resources,
            stylesheet: stylesheet.to_string(),
            metadata,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
