//! The save file: `binder-save.yaml` in the book folder.
//!
//! The stored chapter list is used as-is while it still describes exactly the
//! files on disk. Once files are added or removed the discovered order wins and
//! stored settings are carried over per file.

use super::{rearrange_chapters, BookMetadata, Chapter};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const SAVE_FILE: &str = "binder-save.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default)]
    pub metadata: BookMetadata,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// How the chapter list was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No save file yet
    Fresh,
    /// The save file matched the folder
    Restored,
    /// Files changed since the last save
    Merged { added: usize, removed: usize },
    /// The save file could not be read
    Recovered,
}

/// Read the save file, reconciling it with the discovered files.
pub fn load(path: &Path, discovered: &[PathBuf]) -> Result<(SaveData, LoadOutcome)> {
    if !path.exists() {
        let data = SaveData {
            metadata: BookMetadata::default(),
            chapters: defaults(discovered),
        };
        return Ok((data, LoadOutcome::Fresh));
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let stored: SaveData = match serde_yaml::from_str(&contents) {
        Ok(stored) => stored,
        Err(e) => {
            log::warn!(
                "Failed to parse {}, starting from the folder contents: {e}",
                path.display()
            );
            let data = SaveData {
                metadata: BookMetadata::default(),
                chapters: defaults(discovered),
            };
            return Ok((data, LoadOutcome::Recovered));
        }
    };

    Ok(merge(stored, discovered))
}

fn defaults(discovered: &[PathBuf]) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = discovered.iter().cloned().map(Chapter::discovered).collect();
    rearrange_chapters(&mut chapters);
    chapters
}

/// Reconcile stored chapters with the files found on disk.
pub fn merge(stored: SaveData, discovered: &[PathBuf]) -> (SaveData, LoadOutcome) {
    let SaveData {
        metadata,
        chapters: stored_chapters,
    } = stored;

    let stored_files: HashSet<&Path> = stored_chapters.iter().map(|c| c.file.as_path()).collect();
    let discovered_files: HashSet<&Path> = discovered.iter().map(PathBuf::as_path).collect();

    let (mut chapters, outcome) = if stored_files == discovered_files
        && stored_chapters.len() == discovered.len()
    {
        (stored_chapters, LoadOutcome::Restored)
    } else {
        let added = discovered_files.difference(&stored_files).count();
        let removed = stored_files.difference(&discovered_files).count();
        let mut by_file: HashMap<PathBuf, Chapter> = stored_chapters
            .into_iter()
            .map(|c| (c.file.clone(), c))
            .collect();
        let chapters = discovered
            .iter()
            .map(|file| {
                by_file
                    .remove(file)
                    .unwrap_or_else(|| Chapter::discovered(file.clone()))
            })
            .collect();
        (chapters, LoadOutcome::Merged { added, removed })
    };

    for chapter in chapters.iter_mut() {
        if chapter.repair_flags() {
            log::warn!(
                "{} was marked as both front and back matter, keeping front matter",
                chapter.file.display()
            );
        }
    }
    rearrange_chapters(&mut chapters);

    (SaveData { metadata, chapters }, outcome)
}

/// Write the save file.
pub fn save(path: &Path, data: &SaveData) -> Result<()> {
    let contents = serde_yaml::to_string(data).with_context(|| "Failed to serialize book")?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
