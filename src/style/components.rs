//! Style override components.
//!
//! Each component is a small CSS fragment that belongs to exactly one
//! [`Category`]. A book activates at most one component per category; the
//! composer emits them in category order so that later categories can build on
//! earlier ones regardless of the order they were selected in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Override categories, in the order their CSS is emitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Dropcap,
    HorizontalRule,
    Indent,
    TocAlignment,
    TocFrontMatter,
    TocBackMatter,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Dropcap,
            Category::HorizontalRule,
            Category::Indent,
            Category::TocAlignment,
            Category::TocFrontMatter,
            Category::TocBackMatter,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Dropcap => "Dropcap",
            Category::HorizontalRule => "Horizontal rule",
            Category::Indent => "Indent",
            Category::TocAlignment => "Contents alignment",
            Category::TocFrontMatter => "Contents front matter",
            Category::TocBackMatter => "Contents back matter",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a component's CSS is produced.
#[derive(Debug)]
enum Css {
    Static(&'static str),
    /// A divider drawn as a top border, optionally narrowed and centred.
    Rule {
        border: &'static str,
        width_percent: Option<u8>,
    },
}

/// A named, independently selectable CSS fragment.
#[derive(Debug)]
pub struct Component {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    css: Css,
}

impl Component {
    pub fn css(&self) -> String {
        match self.css {
            Css::Static(css) => css.to_string(),
            Css::Rule {
                border,
                width_percent: None,
            } => format!(
                r#"
.horizontal-rule {{
    border-top: {border};
    margin-bottom: 1em;
    margin-top: 1em;
}}
"#
            ),
            Css::Rule {
                border,
                width_percent: Some(width),
            } => format!(
                r#"
.horizontal-rule {{
    border-top: {border};
    margin: 1em auto;
    width: {width}%;
}}
"#
            ),
        }
    }
}

/// Look up a component by identifier.
pub fn find(id: &str) -> Option<&'static Component> {
    COMPONENTS.iter().find(|c| c.id == id)
}

/// All components belonging to a category, in presentation order.
pub fn in_category(category: Category) -> impl Iterator<Item = &'static Component> {
    COMPONENTS.iter().filter(move |c| c.category == category)
}

const THIN: &str = "1px solid #808080";
const THICK: &str = "5px solid #808080";
const DOTTED: &str = "8px dotted #808080";

const fn rule(
    id: &'static str,
    name: &'static str,
    border: &'static str,
    width_percent: Option<u8>,
) -> Component {
    Component {
        id,
        name,
        category: Category::HorizontalRule,
        css: Css::Rule {
            border,
            width_percent,
        },
    }
}

pub static COMPONENTS: &[Component] = &[
    Component {
        id: "_dropcap1",
        name: "Large first letter",
        category: Category::Dropcap,
        css: Css::Static(
            r#"
p.first-paragraph:not(.front-matter):not(.back-matter)::first-letter {
    font-weight: normal;
    font-size: 3.2em;
    float: left;
    margin-top: -0.3225rem;
    margin-bottom: -0.3245em;
}
"#,
        ),
    },
    Component {
        id: "_dropcap2",
        name: "Bold first word",
        category: Category::Dropcap,
        css: Css::Static(
            r#"
p.first-paragraph:not(.front-matter):not(.back-matter) .first-word {
    font-weight: bold;
    font-size: 130%;
    text-transform: uppercase;
}
"#,
        ),
    },
    Component {
        id: "_dropcap3",
        name: "Small caps first line",
        category: Category::Dropcap,
        css: Css::Static(
            r#"
p.first-paragraph:not(.front-matter):not(.back-matter)::first-line {
    font-size: 105%;
    text-transform: uppercase;
}
"#,
        ),
    },
    Component {
        id: "_hr1",
        name: "Asterisks",
        category: Category::HorizontalRule,
        css: Css::Static(
            r#"
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
"#,
        ),
    },
    rule("_hr2", "Thin line", THIN, None),
    rule("_hr3", "Thin line, 80%", THIN, Some(80)),
    rule("_hr4", "Thin line, 50%", THIN, Some(50)),
    rule("_hr5", "Thin line, 30%", THIN, Some(30)),
    rule("_hr6", "Thick line", THICK, None),
    rule("_hr7", "Thick line, 80%", THICK, Some(80)),
    rule("_hr8", "Thick line, 50%", THICK, Some(50)),
    rule("_hr9", "Thick line, 30%", THICK, Some(30)),
    rule("_hr10", "Dotted line", DOTTED, None),
    rule("_hr11", "Dotted line, 80%", DOTTED, Some(80)),
    rule("_hr12", "Dotted line, 50%", DOTTED, Some(50)),
    rule("_hr13", "Dotted line, 30%", DOTTED, Some(30)),
    Component {
        id: "_indent1",
        name: "Indent following paragraphs",
        category: Category::Indent,
        css: Css::Static(
            r#"
p + p {
    text-indent: 1.5em;
}
"#,
        ),
    },
    Component {
        id: "_indent2",
        name: "Spaced paragraphs",
        category: Category::Indent,
        css: Css::Static(
            r#"
p {
    text-indent: 0;
    margin-bottom: 1em;
}
"#,
        ),
    },
    Component {
        id: "_tocLeft",
        name: "Left aligned",
        category: Category::TocAlignment,
        css: Css::Static(
            r#"
#toc ol {
    text-align: left;
}
"#,
        ),
    },
    Component {
        id: "_tocCenter",
        name: "Centred",
        category: Category::TocAlignment,
        css: Css::Static(
            r#"
#toc ol {
    text-align: center;
}
"#,
        ),
    },
    Component {
        id: "_tocFmShow",
        name: "Show front matter",
        category: Category::TocFrontMatter,
        css: Css::Static(""),
    },
    Component {
        id: "_tocFmHide",
        name: "Hide front matter",
        category: Category::TocFrontMatter,
        css: Css::Static(
            r#"
#toc li.frontmatter {
    display: none;
}
"#,
        ),
    },
    Component {
        id: "_tocBmShow",
        name: "Show back matter",
        category: Category::TocBackMatter,
        css: Css::Static(""),
    },
    Component {
        id: "_tocBmHide",
        name: "Hide back matter",
        category: Category::TocBackMatter,
        css: Css::Static(
            r#"
#toc li.backmatter {
    display: none;
}
"#,
        ),
    },
];
