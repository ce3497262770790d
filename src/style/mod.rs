//! Stylesheet composition.
//!
//! The final stylesheet of a book is the fixed structural base, followed by the
//! chosen theme's stylesheet, followed by the CSS of every active override
//! component in [`Category`] order.

pub mod components;
pub mod paged;
pub mod themes;

pub use components::{Category, Component};
pub use themes::Theme;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The set of active override components, at most one per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ComponentSet {
    active: BTreeMap<Category, &'static str>,
}

impl ComponentSet {
    pub fn new() -> ComponentSet {
        ComponentSet::default()
    }

    /// The components a theme starts with.
    pub fn for_theme(theme: &Theme) -> ComponentSet {
        theme.default_components.iter().copied().collect()
    }

    /// Activate a component, replacing whichever component was active in the
    /// same category. Returns the replaced component id, if any.
    pub fn select(&mut self, id: &str) -> anyhow::Result<Option<&'static str>> {
        let component = components::find(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown style component '{id}'"))?;
        Ok(self.active.insert(component.category, component.id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.active.values().any(|active| *active == id)
    }

    /// Active component ids in category order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.active.values().copied()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = ComponentSet::new();
        for id in iter {
            if let Err(e) = set.select(id) {
                log::warn!("{e}, ignoring it");
            }
        }
        set
    }
}

impl From<Vec<String>> for ComponentSet {
    fn from(ids: Vec<String>) -> Self {
        ids.iter().map(String::as_str).collect()
    }
}

impl From<ComponentSet> for Vec<String> {
    fn from(set: ComponentSet) -> Self {
        set.ids().map(ToString::to_string).collect()
    }
}

/// Theme-independent rules every book carries.
pub const STRUCTURAL_BASE: &str = r#"
body {
    word-wrap: break-word;
}

section {
    page-break-before: always;
    break-before: page;
}

p {
    font-size: 1em;
    text-align: justify;
    text-indent: 0;
    margin-top: 0;
    margin-bottom: 0.5em;
    line-height: 1.5em;
}

span.frontmatter,
span.backmatter {
    display: none;
}

li.frontmatter {
    margin-bottom: 1em;
}

li.backmatter {
    margin-top: 1em;
}

#toc ol {
    list-style-type: none;
    padding: 0;
}

.cover-page {
    text-align: center;
}

.cover-page img {
    max-width: 100%;
    max-height: 100%;
}

.copyright-page {
    margin-top: 5em;
    font-size: 1em;
}

.copyright-page p {
    margin-top: 0;
    text-align: center;
}

.dedication-page {
    margin-top: 5em;
    text-align: center;
}

.dedication-page .dedication {
    text-align: center;
}

.epigraph-page {
    margin-top: 5em;
}

.epigraph-page .quote {
    text-align: left;
}

.epigraph-page .attribution {
    text-align: right;
}

.epigraph-page .author {
    font-weight: bold;
}

.epigraph-page .source {
    font-style: italic;
}

.blurb-page h1 {
    text-align: center;
}

.blurb-page .blurb {
    margin-top: 3em;
    text-align: center;
}

.blurb-page .source {
    font-weight: bold;
    text-align: center;
}

.half-title-page h1 {
    margin-top: 4em;
    text-align: center;
    font-weight: bold;
    font-size: 250%;
}

.title-page h1 {
    margin-top: 3em;
    text-align: center;
    font-weight: bold;
    font-size: 250%;
}

.title-page .subtitle {
    text-align: center;
    font-size: 200%;
}

.title-page .authors {
    margin-top: 5em;
    text-align: center;
}

.title-page .author {
    font-weight: bold;
    font-size: 180%;
    text-align: center;
}

.title-page .collaborators {
    margin-top: 4em;
}

.title-page .collaborator-role {
    font-size: 80%;
    margin: 0;
    text-align: center;
}

.title-page .collaborator-name {
    font-weight: bold;
    margin-top: 0;
    margin-bottom: 2em;
    text-align: center;
}

.title-page .publisher {
    margin-top: 5em;
    text-align: center;
}

.about-author-page h1,
.also-by-page h1,
.preview-more-page h1 {
    text-align: center;
}

.about-author-page .links {
    margin-top: 3em;
}

.also-by-page .book-title,
.preview-more-page .book-title {
    text-align: center;
    margin-top: 3em;
    font-weight: bold;
}

.binder-store-link-container {
    display: block;
    text-align: center;
}

.binder-store-link {
    display: inline-block;
    width: 80px;
    height: 80px;
    padding: 10px;
}

.binder-store-link svg {
    height: 3em;
    width: 3em;
    display: inline-block;
    padding: 0.5em;
    border-radius: 50%;
}
"#;

/// Concatenate the structural base, the theme stylesheet and the CSS of every
/// known component id, in category order. Unknown ids are ignored.
pub fn compose<'a, I>(theme_css: &str, component_ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut active: Vec<&'static Component> = component_ids
        .into_iter()
        .filter_map(|id| {
            let component = components::find(id);
            if component.is_none() {
                log::debug!("ignoring unknown style component '{id}'");
            }
            component
        })
        .collect();
    active.sort_by_key(|c| c.category);

    let mut css = String::with_capacity(STRUCTURAL_BASE.len() + theme_css.len());
    css.push_str(STRUCTURAL_BASE);
    css.push_str(theme_css);
    for component in active {
        css.push_str(&component.css());
    }
    css
}
