use serde::{Deserialize, Serialize};

/// Page geometry and typography for paginated (PDF) output.
///
/// Margins are asymmetric for printing: the inside margin sits at the binding,
/// and the paginator mirrors left and right pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageStyle {
    /// Page width as a CSS length
    pub width: String,
    /// Page height as a CSS length
    pub height: String,
    /// Margin on the binding side
    pub inside_margin: String,
    /// Margin away from the binding
    pub outside_margin: String,
    /// Top and bottom margin
    pub vertical_margin: String,
    pub font_size: String,
    pub font_family: String,
    pub line_height: String,
}

impl Default for PageStyle {
    fn default() -> Self {
        PageStyle {
            width: "5in".to_string(),
            height: "8in".to_string(),
            inside_margin: "0.875in".to_string(),
            outside_margin: "0.25in".to_string(),
            vertical_margin: "0.5in".to_string(),
            font_size: "12px".to_string(),
            font_family: "Bookerly, sans-serif".to_string(),
            line_height: "22px".to_string(),
        }
    }
}

impl PageStyle {
    /// Paged-media CSS placed before the book's own stylesheet.
    pub fn stylesheet(&self) -> String {
        let PageStyle {
            width,
            height,
            inside_margin,
            outside_margin,
            vertical_margin,
            font_size,
            font_family,
            line_height,
        } = self;

        format!(
            r#"
:root {{
    font-size: {font_size};
}}

body {{
    font-family: {font_family};
}}

@page {{
    size: {width} {height};
    margin-top: {vertical_margin};
    margin-bottom: {vertical_margin};
}}

@page :left {{
    margin-left: {inside_margin};
    margin-right: {outside_margin};

    @top-left {{
        vertical-align: center;
        content: counter(page);
    }}
}}

@page :right {{
    margin-left: {outside_margin};
    margin-right: {inside_margin};

    @top-right {{
        vertical-align: center;
        content: counter(page);
    }}
}}

section {{
    break-before: page;
}}

p {{
    line-height: {line_height};
}}

h1 {{
    font-size: 24px;
}}
"#
        )
    }
}
