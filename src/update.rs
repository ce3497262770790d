//! Update command for refreshing the chapter list of an existing book.
//!
//! When chapter files are added or removed the saved list goes stale. This
//! re-scans the folder, keeps the stored settings of every chapter that is
//! still there, and writes the merged list back.

use crate::book::store::{LoadOutcome, SaveData, SAVE_FILE};
use crate::project::Project;
use anyhow::Result;

/// A one-line summary of how the chapter list changed.
pub fn describe(outcome: LoadOutcome, data: &SaveData) -> String {
    let count = data.chapters.len();
    match outcome {
        LoadOutcome::Fresh => format!("Chapters: {count} (new book)"),
        LoadOutcome::Restored => format!("Chapters: {count} (unchanged)"),
        LoadOutcome::Merged { added, removed } => {
            format!("Chapters: {count} (+{added} added, -{removed} removed)")
        }
        LoadOutcome::Recovered => format!("Chapters: {count} (rebuilt from the folder)"),
    }
}

/// Run the update command.
pub fn run(project: &Project) -> Result<()> {
    println!("Scanning {}...", project.root().display());
    let (data, outcome) = project.load()?;
    if outcome == LoadOutcome::Fresh {
        println!("No {SAVE_FILE} yet, run `binder init` to set up the book.");
    }

    let written = project.save(&data)?;
    println!();
    if written {
        println!("Updated {SAVE_FILE}:");
    }
    println!("  {}", describe(outcome, &data));
    println!(
        "  Included: {}",
        data.chapters.iter().filter(|c| c.include).count()
    );
    Ok(())
}
