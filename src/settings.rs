//! Tool settings, read from an optional `binder.toml` in the book folder.

use crate::sinks::default_paginator_command;
use crate::style::paged::PageStyle;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SETTINGS_FILE: &str = "binder.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Write the save file after commands that change the book
    #[serde(default = "default_persist")]
    pub persist: bool,
    /// Globs of markdown files to leave out, relative to the book folder
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub page: PageStyle,
    /// Paginator command line, with `{input}` and `{output}` placeholders
    #[serde(default = "default_paginator_command")]
    pub paginator: Vec<String>,
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

fn default_persist() -> bool {
    true
}

fn default_download_timeout() -> u64 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            persist: default_persist(),
            exclude: Vec::new(),
            page: PageStyle::default(),
            paginator: default_paginator_command(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

impl Settings {
    /// Load `binder.toml` from `folder`, or the defaults when there is none.
    pub fn load(folder: &Path) -> Result<Settings> {
        let path = folder.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Settings::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}
