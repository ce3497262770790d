//! Interactive setup for a book folder.
//!
//! Asks for the metadata a book cannot be bound without, picks a theme, scans
//! the folder for chapters and writes `binder-save.yaml`. Running it again on
//! an initialised folder starts from the saved answers.

use crate::book::store::SAVE_FILE;
use crate::project::Project;
use crate::style::{themes, ComponentSet};
use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input};

/// Run the interactive setup wizard.
pub fn run(project: &Project) -> Result<()> {
    let theme = ColorfulTheme {
        ..ColorfulTheme::default()
    };

    let (mut data, _) = project.load()?;
    let metadata = &mut data.metadata;

    metadata.title = Input::with_theme(&theme)
        .with_prompt("Book title")
        .with_initial_text(metadata.title.clone())
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain title")?;
    metadata.author = Input::with_theme(&theme)
        .with_prompt("Author")
        .with_initial_text(metadata.author.clone())
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain author")?;
    metadata.language = Input::with_theme(&theme)
        .with_prompt("Language (BCP 47, e.g. en, en-GB, fr)")
        .default(metadata.language.clone())
        .interact()
        .with_context(|| "Failed to obtain language")?;
    metadata.cover = Input::with_theme(&theme)
        .with_prompt("Cover image, relative to the vault (leave blank to add later)")
        .with_initial_text(metadata.cover.clone())
        .allow_empty(true)
        .interact()
        .with_context(|| "Failed to obtain cover image")?;
    if !metadata.cover.trim().is_empty() && !project.vault().join(&metadata.cover).is_file() {
        println!(
            "{}: {} does not exist yet",
            console::style("Note").yellow(),
            metadata.cover
        );
    }
    if metadata.published.trim().is_empty() {
        metadata.published = chrono::Local::now().format("%Y-%m-%d").to_string();
    }
    metadata.published = Input::with_theme(&theme)
        .with_prompt("Publication date")
        .default(metadata.published.clone())
        .interact()
        .with_context(|| "Failed to obtain publication date")?;

    let theme_names: Vec<&str> = themes::THEMES.iter().map(|t| t.name).collect();
    let current = themes::THEMES
        .iter()
        .position(|t| t.id == metadata.theme)
        .unwrap_or(0);
    let selected = FuzzySelect::with_theme(&theme)
        .with_prompt("Theme")
        .items(&theme_names)
        .default(current)
        .interact()
        .with_context(|| "Failed to obtain theme")?;
    let chosen = &themes::THEMES[selected];
    if chosen.id != metadata.theme || metadata.components.is_empty() {
        metadata.theme = chosen.id.to_string();
        metadata.components = ComponentSet::for_theme(chosen);
    }

    metadata.show_contents = Confirm::with_theme(&theme)
        .with_prompt("Include a table of contents page?")
        .default(metadata.show_contents)
        .interact()?;

    let save_path = project.save_path();
    if save_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!("{SAVE_FILE} already exists, do you want to override it?"))
            .interact()?
    {
        let yaml =
            serde_yaml::to_string(&data).with_context(|| "Failed to convert book to YAML")?;
        println!("Book:");
        println!("{}", yaml);
        return Ok(());
    }

    let included = data.chapters.iter().filter(|c| c.include).count();
    if project.save(&data)? {
        println!("{SAVE_FILE} written!");
    } else {
        println!("Persistence is turned off in binder.toml, nothing written.");
    }
    println!("  Chapters: {} ({} included)", data.chapters.len(), included);
    Ok(())
}
