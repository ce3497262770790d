//! The book model: chapters as the user arranges them, the metadata that
//! describes the book, and the sections and resources a build produces.

mod chapter;
mod metadata;
pub mod scan;
pub mod store;

pub use chapter::{
    default_title, rearrange_chapters, Chapter, ChapterBuilder, ChapterFlag, ChapterKind,
    ChapterOperation, Group,
};
pub use metadata::{
    BookMetadata, MetadataField, PackageMetadata, ValidationError, DEFAULT_TOC_TITLE,
};

/// One finished page of the book, in spine order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// The `<section>` element as XHTML
    pub html: String,
    pub exclude_from_contents: bool,
    pub is_front_matter: bool,
    pub is_back_matter: bool,
}

/// An image bundled into the book under the resources directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub data: Vec<u8>,
}

/// Directory inside the package holding bundled images.
pub const RESOURCES_DIR: &str = "resources";
