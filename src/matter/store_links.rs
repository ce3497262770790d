//! Store and social platform links.
//!
//! Chapters can write `[%BINDER AMAZON LINK%](https://...)`; the anchor is
//! swapped for an icon-only link. The About the Author template uses the same
//! table for its `Link To <Platform>` keys.

use html_escape::encode_double_quoted_attribute;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StorePlatform {
    Amazon,
    Apple,
    Audible,
    Facebook,
    Patreon,
    RoyalRoad,
    Twitter,
    Website,
}

impl StorePlatform {
    pub fn all() -> &'static [StorePlatform] {
        &[
            StorePlatform::Amazon,
            StorePlatform::Apple,
            StorePlatform::Audible,
            StorePlatform::Facebook,
            StorePlatform::Patreon,
            StorePlatform::RoyalRoad,
            StorePlatform::Twitter,
            StorePlatform::Website,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorePlatform::Amazon => "Amazon",
            StorePlatform::Apple => "Apple",
            StorePlatform::Audible => "Audible",
            StorePlatform::Facebook => "Facebook",
            StorePlatform::Patreon => "Patreon",
            StorePlatform::RoyalRoad => "Royal Road",
            StorePlatform::Twitter => "Twitter",
            StorePlatform::Website => "Website",
        }
    }

    /// The platform named by a `%BINDER <PLATFORM> LINK%` token.
    pub fn from_token(text: &str) -> Option<StorePlatform> {
        let inner = text
            .trim()
            .strip_prefix("%BINDER ")?
            .strip_suffix(" LINK%")?;
        StorePlatform::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(inner.trim()))
    }

    /// Inline SVG icon markup.
    pub fn icon(&self) -> String {
        let body = match self {
            StorePlatform::Amazon => {
                r#"<path d="M4 15.5c4.6 3 11.4 3 16 0" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round"/><path d="M17 14.5l3 1-1 3" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round"/><text x="12" y="12.5" text-anchor="middle" font-size="10" font-family="sans-serif" fill="currentColor">a</text>"#
            }
            StorePlatform::Apple => {
                r#"<path d="M16.5 12.6c0-2.3 1.9-3.4 2-3.5-1.1-1.6-2.8-1.8-3.4-1.8-1.4-.1-2.8.9-3.5.9s-1.8-.8-3-.8c-1.5 0-3 .9-3.8 2.3-1.6 2.8-.4 7 1.2 9.3.8 1.1 1.7 2.4 2.9 2.3 1.2 0 1.6-.7 3-.7s1.8.7 3 .7c1.3 0 2.1-1.1 2.8-2.3.9-1.3 1.3-2.6 1.3-2.6s-2.5-1-2.5-3.8zM14.2 5.9c.6-.8 1.1-1.8 1-2.9-.9 0-2.1.6-2.7 1.4-.6.7-1.1 1.8-1 2.8 1 .1 2.1-.5 2.7-1.3z" fill="currentColor"/>"#
            }
            StorePlatform::Audible => {
                r#"<path d="M2 11l10 6 10-6" fill="none" stroke="currentColor" stroke-width="2"/><path d="M6 9.5a7.5 7.5 0 0 1 12 0" fill="none" stroke="currentColor" stroke-width="2"/><path d="M8.5 11a4.5 4.5 0 0 1 7 0" fill="none" stroke="currentColor" stroke-width="2"/>"#
            }
            StorePlatform::Facebook => {
                r#"<path d="M13.5 22v-8h2.7l.4-3.2h-3.1V8.8c0-.9.3-1.6 1.6-1.6h1.7V4.4c-.3 0-1.3-.1-2.4-.1-2.4 0-4.1 1.5-4.1 4.2v2.3H7.6V14h2.7v8z" fill="currentColor"/>"#
            }
            StorePlatform::Patreon => {
                r#"<circle cx="14.5" cy="9.5" r="6.5" fill="currentColor"/><rect x="3" y="3" width="3.5" height="18" fill="currentColor"/>"#
            }
            StorePlatform::RoyalRoad => {
                r#"<path d="M3 18h18l-1.5-10-4.5 4-3-6-3 6-4.5-4z" fill="currentColor"/><rect x="3" y="19.5" width="18" height="2" fill="currentColor"/>"#
            }
            StorePlatform::Twitter => {
                r#"<path d="M22 5.9c-.7.3-1.5.5-2.4.6.9-.5 1.5-1.3 1.8-2.3-.8.5-1.7.8-2.6 1-.8-.8-1.9-1.3-3-1.3-2.3 0-4.1 1.8-4.1 4.1 0 .3 0 .6.1.9-3.4-.2-6.4-1.8-8.4-4.3-.4.6-.6 1.3-.6 2.1 0 1.4.7 2.7 1.8 3.4-.7 0-1.3-.2-1.9-.5 0 2 1.4 3.7 3.3 4.1-.6.2-1.2.2-1.9.1.5 1.6 2.1 2.8 3.9 2.9-1.4 1.1-3.2 1.8-5.1 1.8H2c1.8 1.2 4 1.8 6.3 1.8 7.5 0 11.7-6.2 11.7-11.7v-.5c.8-.6 1.5-1.3 2-2.2z" fill="currentColor"/>"#
            }
            StorePlatform::Website => {
                r#"<circle cx="12" cy="12" r="9.5" fill="none" stroke="currentColor" stroke-width="1.5"/><path d="M2.5 12h19M12 2.5c2.5 2.6 3.8 5.8 3.8 9.5s-1.3 6.9-3.8 9.5c-2.5-2.6-3.8-5.8-3.8-9.5s1.3-6.9 3.8-9.5z" fill="none" stroke="currentColor" stroke-width="1.5"/>"#
            }
        };

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" role="img" aria-label="{name}">{body}</svg>"#,
            name = self.name()
        )
    }

    /// An icon-only anchor pointing at `href`.
    pub fn link(&self, href: &str) -> String {
        format!(
            r#"<a href="{href}" class="binder-store-link">{icon}</a>"#,
            href = encode_double_quoted_attribute(href),
            icon = self.icon()
        )
    }
}
