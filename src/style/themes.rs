//! Built-in themes.
//!
//! A theme is a named base stylesheet plus the override components a new book
//! starts out with when the theme is chosen.

/// A named base stylesheet.
#[derive(Debug)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub css: &'static str,
    pub default_components: &'static [&'static str],
}

pub const DEFAULT_THEME: &str = "base";

/// Components every theme starts with unless it says otherwise.
pub const DEFAULT_COMPONENTS: &[&str] = &[
    "_dropcap1",
    "_hr1",
    "_indent1",
    "_tocLeft",
    "_tocFmShow",
    "_tocBmShow",
];

pub fn find(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

/// The theme a new book starts with.
pub fn default_theme() -> &'static Theme {
    &THEMES[0]
}

pub static THEMES: &[Theme] = &[
    Theme {
        id: "base",
        name: "Base",
        css: BASE,
        default_components: DEFAULT_COMPONENTS,
    },
    Theme {
        id: "mono",
        name: "Mono",
        css: MONO,
        default_components: &[
            "_hr2",
            "_indent1",
            "_tocLeft",
            "_tocFmShow",
            "_tocBmShow",
        ],
    },
    Theme {
        id: "urban",
        name: "Urban",
        css: URBAN,
        default_components: DEFAULT_COMPONENTS,
    },
];

const BASE: &str = r#"
body {
    font-family: "Amazon Ember", sans-serif;
}

.chapter-number {
    text-align: center;
    margin-top: 1rem;
    margin-bottom: 0;
    font-size: 4rem;
    text-transform: uppercase;
}

.chapter-title {
    text-align: center;
    font-size: 1.5rem;
    margin-top: 0;
    margin-bottom: 3rem;
}

.chapter-word {
    display: none;
}

.chapter-number-text {
    display: none;
}

.horizontal-rule {
    text-align: center;
    font-size: 1rem;
    margin-top: 0.8rem;
    margin-bottom: 0;
    font-weight: bold;
}

.horizontal-rule::before {
    content: "* * *";
}
"#;

const MONO: &str = r#"
body {
    font-family: "Courier", monospace;
}

.chapter-number {
    text-align: center;
    margin-top: 1rem;
    margin-bottom: 0;
    font-size: 4rem;
    text-transform: uppercase;
}

.chapter-title {
    text-align: center;
    font-size: 2.4rem;
    margin-top: 0;
    margin-bottom: 3rem;
}

.chapter-word {
    font-size: 1.9rem;
}

.chapter-number-numeric {
    display: none;
}

.chapter-number-text {
    font-size: 1.9rem;
}

.chapter-title-divider {
    border-top: 3px solid #000;
    margin: 1rem 20%;
}

p.first-paragraph:not(.front-matter):not(.back-matter)::first-letter {
    color: red;
    float: left;
    font-size: 3rem;
    line-height: 3rem;
}

.horizontal-rule {
    text-align: center;
    font-size: 1rem;
    margin-top: 0.8rem;
    margin-bottom: 0;
    font-weight: bold;
}

.horizontal-rule::before {
    content: "+ + + + +";
}
"#;

const URBAN: &str = r#"
.chapter-word {
    text-transform: uppercase;
    font-size: 130%;
}

.chapter-number-numeric {
    font-size: 130%;
}

.chapter-number-text {
    display: none;
}

.chapter-number {
    margin-top: 3rem;
    margin-bottom: 0;
    font-size: 1.5rem;
}

.chapter-title {
    text-transform: uppercase;
    font-size: 180%;
    margin-bottom: 1rem;
    margin-top: 0.3rem;
    border-bottom: 1px solid;
    padding-bottom: 3rem;
}
"#;
