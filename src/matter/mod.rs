//! Front and back matter templates.
//!
//! A chapter titled `_binder <Name>` is not rendered as prose. Its leading
//! key-value block is parsed into a [`MatterContext`] and handed to the
//! matching [`MatterTemplate`], which produces the page markup.

mod context;
mod starters;
pub mod store_links;
mod templates;

pub use context::{ContextValue, MatterContext};
pub use store_links::StorePlatform;

use std::fmt;

/// Prefix of chapter titles and file stems that name a matter template.
pub const MATTER_PREFIX: &str = "_binder ";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatterTemplate {
    Copyright,
    Dedication,
    Epigraph,
    Blurbs,
    TitlePage,
    HalfTitle,
    AboutAuthor,
    AlsoBy,
    PreviewMore,
}

impl fmt::Display for MatterTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl MatterTemplate {
    pub fn all() -> &'static [MatterTemplate] {
        &[
            MatterTemplate::Copyright,
            MatterTemplate::Dedication,
            MatterTemplate::Epigraph,
            MatterTemplate::Blurbs,
            MatterTemplate::TitlePage,
            MatterTemplate::HalfTitle,
            MatterTemplate::AboutAuthor,
            MatterTemplate::AlsoBy,
            MatterTemplate::PreviewMore,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MatterTemplate::Copyright => "Copyright",
            MatterTemplate::Dedication => "Dedication",
            MatterTemplate::Epigraph => "Epigraph",
            MatterTemplate::Blurbs => "Blurbs",
            MatterTemplate::TitlePage => "Title Page",
            MatterTemplate::HalfTitle => "Half Title",
            MatterTemplate::AboutAuthor => "About the Author",
            MatterTemplate::AlsoBy => "Also By Author",
            MatterTemplate::PreviewMore => "Preview More",
        }
    }

    /// Front matter templates precede the contents; the rest follow the story.
    pub fn is_front(&self) -> bool {
        matches!(
            self,
            MatterTemplate::Copyright
                | MatterTemplate::Dedication
                | MatterTemplate::Epigraph
                | MatterTemplate::Blurbs
                | MatterTemplate::TitlePage
                | MatterTemplate::HalfTitle
        )
    }

    /// Class of the wrapping page element.
    pub fn page_class(&self) -> &'static str {
        match self {
            MatterTemplate::Copyright => "copyright-page",
            MatterTemplate::Dedication => "dedication-page",
            MatterTemplate::Epigraph => "epigraph-page",
            MatterTemplate::Blurbs => "blurb-page",
            MatterTemplate::TitlePage => "title-page",
            MatterTemplate::HalfTitle => "half-title-page",
            MatterTemplate::AboutAuthor => "about-author-page",
            MatterTemplate::AlsoBy => "also-by-page",
            MatterTemplate::PreviewMore => "preview-more-page",
        }
    }

    /// The template named by a `_binder <Name>` title, matched exactly.
    pub fn from_title(title: &str) -> Option<MatterTemplate> {
        let name = title.strip_prefix(MATTER_PREFIX)?;
        MatterTemplate::all()
            .iter()
            .copied()
            .find(|t| t.name() == name)
    }

    /// Look up a template by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<MatterTemplate> {
        let name = name.trim();
        MatterTemplate::all()
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Title of a chapter that uses this template.
    pub fn chapter_title(&self) -> String {
        format!("{MATTER_PREFIX}{}", self.name())
    }

    /// Key-value block and instructions for a new matter file.
    pub fn starter_markdown(&self) -> &'static str {
        starters::starter(*self)
    }

    /// Render the page markup. `body_html` is the rendered text after the
    /// block; only templates that show free text use it.
    pub fn render(&self, context: &MatterContext, body_html: &str) -> String {
        templates::render(*self, context, body_html)
    }
}
