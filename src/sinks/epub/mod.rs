//! EPUB packaging for assembled books.
//!
//! An assembled book becomes an EPUB 3 package with:
//! - A cover page, either the cover image or a plain text cover
//! - Front matter sections
//! - A generated contents page (optional)
//! - Story and back matter sections
//! - Every bundled image under `resources/`
//!
//! Sections that are excluded from contents still appear in the spine, but
//! get no entry in the navigation document or the contents page.

mod rendering;

pub use rendering::EpubPackager;
