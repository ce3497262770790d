use crate::assembler::AssembledBook;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

mod epub;
pub use epub::*;

mod pdf;
pub use pdf::*;

/// Turns an assembled book into the bytes of a finished file.
pub trait Packager {
    fn package(&self, book: &AssembledBook) -> Result<Vec<u8>>;
}

#[derive(Debug)]
pub enum Sink {
    Epub(EpubPackager, PathBuf),
    Pdf(PdfPackager, PathBuf),
}

pub trait Render {
    fn render(&self, book: &AssembledBook) -> Result<()>;
}

impl Sink {
    pub fn outfile(&self) -> &Path {
        match self {
            Sink::Epub(_, path) | Sink::Pdf(_, path) => path,
        }
    }
}

impl Render for Sink {
    fn render(&self, book: &AssembledBook) -> Result<()> {
        let bytes = match self {
            Sink::Epub(packager, _) => packager.package(book)?,
            Sink::Pdf(packager, _) => packager.package(book)?,
        };
        let outfile = self.outfile();
        if let Some(parent) = outfile.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(outfile, bytes)
            .with_context(|| format!("Failed to write {}", outfile.display()))
    }
}
