//! A book folder inside a vault, with its settings and save file.

use crate::book::scan;
use crate::book::store::{self, LoadOutcome, SaveData, SAVE_FILE};
use crate::book::BookMetadata;
use crate::resources::{HttpFetcher, ResourceResolver, TEMP_DIR};
use crate::settings::Settings;
use crate::style::{self, themes};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Project {
    vault: PathBuf,
    /// The book folder, relative to the vault
    folder: PathBuf,
    pub settings: Settings,
}

impl Project {
    /// Open `folder`, given either relative to the vault or as a path inside it.
    pub fn open(vault: &Path, folder: &Path) -> Result<Project> {
        let vault = vault
            .canonicalize()
            .with_context(|| format!("Failed to find vault {}", vault.display()))?;
        let folder = if folder.is_absolute() {
            let folder = folder
                .canonicalize()
                .with_context(|| format!("Failed to find folder {}", folder.display()))?;
            folder
                .strip_prefix(&vault)
                .map(Path::to_path_buf)
                .map_err(|_| {
                    anyhow!(
                        "Folder {} is not inside the vault {}",
                        folder.display(),
                        vault.display()
                    )
                })?
        } else {
            folder.to_path_buf()
        };

        let root = vault.join(&folder);
        if !root.is_dir() {
            return Err(anyhow!("Path '{}' isn't a directory!", root.display()));
        }
        let settings = Settings::load(&root)?;
        Ok(Project {
            vault,
            folder,
            settings,
        })
    }

    pub fn vault(&self) -> &Path {
        &self.vault
    }

    /// Absolute path of the book folder.
    pub fn root(&self) -> PathBuf {
        self.vault.join(&self.folder)
    }

    pub fn save_path(&self) -> PathBuf {
        self.root().join(SAVE_FILE)
    }

    /// Where remote images are downloaded during a build.
    pub fn temp_dir(&self) -> PathBuf {
        self.root().join(TEMP_DIR)
    }

    /// The chapter files currently in the folder, relative to the vault.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        scan::discover(
            &self.vault,
            &self.folder,
            &self.temp_dir(),
            &self.settings.exclude,
        )
    }

    /// Scan the folder and reconcile it with the save file.
    pub fn load(&self) -> Result<(SaveData, LoadOutcome)> {
        let discovered = self.discover()?;
        store::load(&self.save_path(), &discovered)
    }

    /// Write the save file unless persistence is turned off. Returns whether
    /// anything was written.
    pub fn save(&self, data: &SaveData) -> Result<bool> {
        if !self.settings.persist {
            log::info!("Persistence is off, not writing {SAVE_FILE}");
            return Ok(false);
        }
        store::save(&self.save_path(), data)?;
        Ok(true)
    }

    pub fn resolver(&self) -> Result<ResourceResolver> {
        let fetcher = HttpFetcher::new(self.settings.download_timeout())?;
        Ok(ResourceResolver::new(
            self.vault.clone(),
            self.temp_dir(),
            Box::new(fetcher),
        ))
    }

    /// Default EPUB path: the sanitized title in the book folder.
    pub fn default_epub_path(&self, metadata: &BookMetadata) -> PathBuf {
        self.root()
            .join(format!("{}.epub", sanitize_file_name(&metadata.title)))
    }
}

/// The composed stylesheet for a book's theme and components.
pub fn stylesheet(metadata: &BookMetadata) -> String {
    let theme = themes::find(&metadata.theme).unwrap_or_else(|| {
        log::warn!(
            "Unknown theme '{}', using '{}'",
            metadata.theme,
            themes::DEFAULT_THEME
        );
        themes::default_theme()
    });
    style::compose(theme.css, metadata.components.ids())
}

/// Keep a title usable as a file name on every platform.
pub fn sanitize_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_end_matches('.').trim();
    if cleaned.is_empty() {
        "book".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn sanitizes_titles() {
        assert_eq!(sanitize_file_name("Tides: A Novel?"), "Tides_ A Novel_");
        assert_eq!(sanitize_file_name("  ...  "), "book");
        assert_eq!(sanitize_file_name("Plain"), "Plain");
    }

    #[test]
    fn opens_relative_and_absolute_folders() {
        let vault = tempfile::tempdir().unwrap();
        fs::create_dir_all(vault.path().join("book")).unwrap();

        let relative = Project::open(vault.path(), Path::new("book")).unwrap();
        let absolute = Project::open(vault.path(), &vault.path().join("book")).unwrap();
        assert_eq!(relative.root(), absolute.root());
        assert!(relative.save_path().ends_with("book/binder-save.yaml"));
    }

    #[test]
    fn folder_outside_vault_is_rejected() {
        let vault = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        assert!(Project::open(vault.path(), elsewhere.path()).is_err());
    }

    #[test]
    fn temp_folder_is_not_scanned() {
        let vault = tempfile::tempdir().unwrap();
        let book = vault.path().join("book");
        fs::create_dir_all(book.join(TEMP_DIR)).unwrap();
        fs::write(book.join("1 One.md"), "one").unwrap();
        fs::write(book.join(TEMP_DIR).join("stray.md"), "stray").unwrap();

        let project = Project::open(vault.path(), Path::new("book")).unwrap();
        let files = project.discover().unwrap();
        assert_eq!(files, vec![PathBuf::from("book").join("1 One.md")]);
    }

    #[test]
    fn persistence_can_be_turned_off() {
        let vault = tempfile::tempdir().unwrap();
        let book = vault.path().join("book");
        fs::create_dir_all(&book).unwrap();
        fs::write(book.join("binder.toml"), "persist = false").unwrap();

        let project = Project::open(vault.path(), Path::new("book")).unwrap();
        let (data, outcome) = project.load().unwrap();
        assert_eq!(outcome, LoadOutcome::Fresh);
        assert!(!project.save(&data).unwrap());
        assert!(!project.save_path().exists());
    }

    #[test]
    fn unknown_theme_falls_back_to_base() {
        let metadata = BookMetadata {
            theme: "missing".to_string(),
            ..BookMetadata::default()
        };
        let fallback = stylesheet(&metadata);
        let base = stylesheet(&BookMetadata::default());
        assert_eq!(fallback, base);
    }
}
