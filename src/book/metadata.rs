use super::Chapter;
use crate::style::{themes, ComponentSet};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Book-level metadata and presentation settings, as stored in the save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookMetadata {
    pub title: String,
    /// Cover image path, relative to the vault
    pub cover: String,
    pub author: String,
    /// ISBN or other identifier; a UUID is generated when blank
    pub identifier: String,
    pub language: String,
    pub description: String,
    pub series: String,
    /// Position in the series, `-1` when unset
    pub sequence: i64,
    pub file_as: String,
    pub genre: String,
    pub tags: String,
    pub copyright: String,
    pub publisher: String,
    pub published: String,
    pub transcription_source: String,
    pub show_contents: bool,
    pub toc_title: String,
    /// Start reading after the contents page rather than at the cover
    pub start_reading: bool,
    pub theme: String,
    pub components: ComponentSet,
}

impl Default for BookMetadata {
    fn default() -> Self {
        BookMetadata {
            title: String::new(),
            cover: String::new(),
            author: String::new(),
            identifier: String::new(),
            language: "en".to_string(),
            description: String::new(),
            series: String::new(),
            sequence: -1,
            file_as: String::new(),
            genre: String::new(),
            tags: String::new(),
            copyright: String::new(),
            publisher: String::new(),
            published: String::new(),
            transcription_source: String::new(),
            show_contents: true,
            toc_title: String::new(),
            start_reading: true,
            theme: themes::DEFAULT_THEME.to_string(),
            components: ComponentSet::for_theme(themes::default_theme()),
        }
    }
}

/// A book that cannot be built as configured.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required.")]
    MissingTitle,
    #[error("Cover image is required.")]
    MissingCover,
    #[error("Author name is required.")]
    MissingAuthor,
    #[error("Language is required.")]
    MissingLanguage,
    #[error("No chapters selected.")]
    NoChapters,
}

/// An optional metadata entry that made it into the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    /// Identifier text that is not itself a UUID
    Identifier,
    Description,
    Series,
    Sequence,
    FileAs,
    Genre,
    Tags,
    Copyright,
    Publisher,
    Published,
    Source,
}

/// Metadata handed to a packager: required fields resolved, optional fields
/// present only when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub title: String,
    pub author: String,
    pub identifier: String,
    pub language: String,
    /// Absolute path of the cover image, if there is one
    pub cover: Option<PathBuf>,
    pub entries: Vec<(MetadataField, String)>,
    pub show_contents: bool,
    pub toc_title: String,
    pub start_reading: bool,
}

pub const DEFAULT_TOC_TITLE: &str = "Table of Contents";

impl PackageMetadata {
    pub fn entry(&self, field: MetadataField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Stand-in metadata for previews of books that are not fully described.
    pub fn placeholder(metadata: &BookMetadata, cover: Option<PathBuf>) -> PackageMetadata {
        PackageMetadata {
            title: "Placeholder Title".to_string(),
            author: "Placeholder Author".to_string(),
            identifier: "placeholder-id".to_string(),
            language: "en".to_string(),
            cover,
            entries: Vec::new(),
            show_contents: metadata.show_contents,
            toc_title: DEFAULT_TOC_TITLE.to_string(),
            start_reading: metadata.start_reading,
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl BookMetadata {
    /// Check the required fields and that at least one chapter is included.
    pub fn validate(&self, chapters: &[Chapter]) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::MissingTitle);
        }
        if is_blank(&self.cover) {
            return Err(ValidationError::MissingCover);
        }
        if is_blank(&self.author) {
            return Err(ValidationError::MissingAuthor);
        }
        if is_blank(&self.language) {
            return Err(ValidationError::MissingLanguage);
        }
        if !chapters.iter().any(|c| c.include) {
            return Err(ValidationError::NoChapters);
        }
        Ok(())
    }

    /// Optional fields that are set, in a fixed order.
    pub fn optional_entries(&self) -> Vec<(MetadataField, String)> {
        let text = [
            (MetadataField::Description, &self.description),
            (MetadataField::Series, &self.series),
            (MetadataField::FileAs, &self.file_as),
            (MetadataField::Genre, &self.genre),
            (MetadataField::Tags, &self.tags),
            (MetadataField::Copyright, &self.copyright),
            (MetadataField::Publisher, &self.publisher),
            (MetadataField::Published, &self.published),
            (MetadataField::Source, &self.transcription_source),
        ];

        let mut entries: Vec<(MetadataField, String)> = text
            .into_iter()
            .filter(|(_, value)| !is_blank(value))
            .map(|(field, value)| (field, value.trim().to_string()))
            .collect();
        if self.sequence >= 0 {
            entries.push((MetadataField::Sequence, self.sequence.to_string()));
        }
        entries
    }

    /// Metadata for packaging; `cover` is the resolved cover path.
    pub fn package(&self, cover: Option<PathBuf>) -> PackageMetadata {
        let identifier = if is_blank(&self.identifier) {
            uuid::Uuid::new_v4().to_string()
        } else {
            self.identifier.trim().to_string()
        };
        let toc_title = if is_blank(&self.toc_title) {
            DEFAULT_TOC_TITLE.to_string()
        } else {
            self.toc_title.trim().to_string()
        };

        let mut entries = self.optional_entries();
        if uuid::Uuid::parse_str(&identifier).is_err() {
            entries.insert(0, (MetadataField::Identifier, identifier.clone()));
        }

        PackageMetadata {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            identifier,
            language: self.language.trim().to_string(),
            cover,
            entries,
            show_contents: self.show_contents,
            toc_title,
            start_reading: self.start_reading,
        }
    }
}
