//! Preview builds.
//!
//! A preview is built with placeholder metadata into its own temporary
//! directory. Only one preview lives at a time: starting another closes the
//! previous session first.

use crate::assembler::Assembler;
use crate::book::store::SaveData;
use crate::markdown::CommonMarkRenderer;
use crate::project;
use crate::resources::{Fetch, ResourceResolver};
use crate::sinks::{EpubPackager, Packager};
use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PREVIEW_FILE: &str = "preview.epub";

/// One built preview and the temporary files behind it.
#[derive(Debug)]
pub struct PreviewSession {
    dir: Option<TempDir>,
    epub: Vec<u8>,
}

impl PreviewSession {
    pub fn epub(&self) -> &[u8] {
        &self.epub
    }

    /// The preview EPUB on disk, while the session is open.
    pub fn path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.path().join(PREVIEW_FILE))
    }

    pub fn is_open(&self) -> bool {
        self.dir.is_some()
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if !self.is_open() {
            return Err(anyhow!("The preview session is closed"));
        }
        std::fs::write(path, &self.epub)
            .with_context(|| format!("Failed to write preview to {}", path.display()))
    }

    /// Delete the temporary files and drop the buffers. Closing twice is fine.
    pub fn close(&mut self) -> Result<()> {
        self.epub = Vec::new();
        match self.dir.take() {
            Some(dir) => {
                let path = dir.path().to_path_buf();
                dir.close()
                    .with_context(|| format!("Failed to remove preview {}", path.display()))
            }
            None => Ok(()),
        }
    }
}

impl Drop for PreviewSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("{e:#}");
        }
    }
}

#[derive(Debug, Default)]
pub struct Previewer {
    session: Option<PreviewSession>,
}

impl Previewer {
    pub fn new() -> Previewer {
        Previewer::default()
    }

    pub fn session(&self) -> Option<&PreviewSession> {
        self.session.as_ref()
    }

    /// Build a new preview, replacing the current one.
    pub fn start(
        &mut self,
        vault: &Path,
        data: &SaveData,
        fetcher: Box<dyn Fetch>,
        progress: &ProgressBar,
    ) -> Result<&PreviewSession> {
        self.close()?;

        let dir = tempfile::Builder::new()
            .prefix("binder-preview-")
            .tempdir()
            .with_context(|| "Failed to create preview directory")?;
        let resolver =
            ResourceResolver::new(vault.to_path_buf(), dir.path().join("downloads"), fetcher);
        let renderer = CommonMarkRenderer;
        let assembler = Assembler::new(vault, &renderer, &resolver);

        let stylesheet = project::stylesheet(&data.metadata);
        let book = assembler.preview(&data.chapters, &data.metadata, &stylesheet, progress)?;
        let epub = EpubPackager::new().package(&book)?;

        let path = dir.path().join(PREVIEW_FILE);
        std::fs::write(&path, &epub)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        let session = self.session.insert(PreviewSession {
            dir: Some(dir),
            epub,
        });
        Ok(&*session)
    }

    pub fn close(&mut self) -> Result<()> {
        match self.session.take() {
            Some(mut session) => session.close(),
            None => Ok(()),
        }
    }
}
