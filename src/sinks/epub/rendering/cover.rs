//! Cover page rendering for EPUB.
//!
//! Shows the cover image when the book has one. Previews may have no cover,
//! in which case the title and author are set as text instead.

use crate::book::PackageMetadata;

/// Render the cover page body. `image` is the cover's path inside the package.
pub fn render(meta: &PackageMetadata, image: Option<&str>) -> String {
    match image {
        Some(image) => format!(
            r#"<div class="cover-page"><img src="../{src}" alt="{alt}" /></div>"#,
            src = html_escape::encode_double_quoted_attribute(image),
            alt = html_escape::encode_double_quoted_attribute(&meta.title),
        ),
        None => format!(
            r#"<div class="cover-page text-cover">
<h1 class="cover-title">{title}</h1>
<p class="cover-author">{author}</p>
</div>"#,
            title = html_escape::encode_text(&meta.title),
            author = html_escape::encode_text(&meta.author),
        ),
    }
}
