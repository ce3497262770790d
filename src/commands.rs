//! The non-interactive commands: binding, previewing, and editing the saved
//! book.

use crate::assembler::Assembler;
use crate::book::store::SaveData;
use crate::book::{ChapterFlag, ChapterOperation};
use crate::cli::{ChapterAction, Flag, PreviewArgs, RenderArgs, ThemeArgs};
use crate::markdown::CommonMarkRenderer;
use crate::matter::MatterTemplate;
use crate::preview::Previewer;
use crate::project::{self, Project};
use crate::resources::HttpFetcher;
use crate::sinks::{CommandPaginator, EpubPackager, PdfPackager, Render, Sink};
use crate::style::components::{self, Category};
use crate::style::{themes, ComponentSet};
use anyhow::{anyhow, bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

pub fn progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress
}

fn file_size(len: usize) -> String {
    byte_unit::Byte::from_u64(len as u64)
        .get_appropriate_unit(byte_unit::UnitType::Binary)
        .to_string()
}

pub fn render(project: &Project, args: &RenderArgs) -> Result<()> {
    let (data, _) = project.load()?;

    let mut sinks = Vec::new();
    if let Some(path) = &args.epub {
        sinks.push(Sink::Epub(EpubPackager::new(), path.clone()));
    }
    if let Some(path) = &args.pdf {
        let paginator = CommandPaginator::new(project.settings.paginator.clone());
        let packager = PdfPackager::new(
            project.temp_dir(),
            project.settings.page.clone(),
            Box::new(paginator),
        );
        sinks.push(Sink::Pdf(packager, path.clone()));
    }
    if sinks.is_empty() {
        let path = project.default_epub_path(&data.metadata);
        sinks.push(Sink::Epub(EpubPackager::new(), path));
    }

    let resolver = project.resolver()?;
    let renderer = CommonMarkRenderer;
    let assembler = Assembler::new(project.vault(), &renderer, &resolver);
    let stylesheet = project::stylesheet(&data.metadata);

    let progress = progress_bar(0);
    progress.set_message("Assembling book...");
    let book = assembler
        .assemble(&data.chapters, &data.metadata, &stylesheet, &progress)
        .with_context(|| "Failed to assemble book")?;
    progress.finish_with_message("Book assembled");

    println!();
    for sink in &sinks {
        sink.render(&book)
            .with_context(|| format!("Failed to render {}", sink.outfile().display()))?;
        let size = std::fs::metadata(sink.outfile())
            .map(|m| file_size(m.len() as usize))
            .unwrap_or_default();
        println!("  Written: {} ({size})", sink.outfile().display());
    }

    resolver.cleanup()?;
    Ok(())
}

pub fn preview(project: &Project, args: &PreviewArgs) -> Result<()> {
    let (data, _) = project.load()?;
    let fetcher = HttpFetcher::new(project.settings.download_timeout())?;
    let progress = progress_bar(0);
    progress.set_message("Building preview...");

    let mut previewer = Previewer::new();
    let session = previewer
        .start(project.vault(), &data, Box::new(fetcher), &progress)
        .with_context(|| "Failed to build preview")?;
    progress.finish_with_message("Preview built");

    println!();
    println!("  Preview: {}", file_size(session.epub().len()));
    if let Some(out) = &args.out {
        session.write_to(out)?;
        println!("  Written: {}", out.display());
    }
    previewer.close()
}

/// Create a `_binder <Name>.md` starter file in the book folder.
pub fn matter(project: &Project, name: &str) -> Result<PathBuf> {
    let template = MatterTemplate::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = MatterTemplate::all().iter().map(|t| t.name()).collect();
        anyhow!(
            "Unknown matter page '{name}', expected one of: {}",
            names.join(", ")
        )
    })?;

    let path = project
        .root()
        .join(format!("{}.md", template.chapter_title()));
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    std::fs::write(&path, template.starter_markdown())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Turn a 1-based chapter position from the command line into an index.
fn position(n: usize) -> Result<usize> {
    n.checked_sub(1)
        .ok_or_else(|| anyhow!("Chapters are numbered from 1"))
}

fn operation(action: &ChapterAction) -> Result<Option<ChapterOperation>> {
    let op = match action {
        ChapterAction::List => return Ok(None),
        ChapterAction::SelectAll => ChapterOperation::SelectAll,
        ChapterAction::SelectNone => ChapterOperation::SelectNone,
        ChapterAction::StripNumbers => ChapterOperation::StripNumbers,
        ChapterAction::StripFirstWord => ChapterOperation::StripFirstWord,
        ChapterAction::RestoreTitles => ChapterOperation::RestoreTitles,
        ChapterAction::NumberTitles => ChapterOperation::NumberTitles,
        ChapterAction::SortTitle => ChapterOperation::SortByTitle,
        ChapterAction::Reverse => ChapterOperation::Reverse,
        ChapterAction::RestoreOrder => ChapterOperation::RestoreOrder,
        ChapterAction::Move { from, to } => ChapterOperation::Move {
            from: position(*from)?,
            to: position(*to)?,
        },
        ChapterAction::Rename { index, title } => ChapterOperation::Rename {
            index: position(*index)?,
            title: title.clone(),
        },
        ChapterAction::Toggle { index, flag } => ChapterOperation::Toggle {
            index: position(*index)?,
            flag: match flag {
                Flag::Include => ChapterFlag::Include,
                Flag::Toc => ChapterFlag::Contents,
                Flag::Front => ChapterFlag::FrontMatter,
                Flag::Back => ChapterFlag::BackMatter,
            },
        },
    };
    Ok(Some(op))
}

fn print_chapters(data: &SaveData) {
    for (i, chapter) in data.chapters.iter().enumerate() {
        let mut flags = Vec::new();
        if chapter.is_front_matter() {
            flags.push("front");
        }
        if chapter.is_back_matter() {
            flags.push("back");
        }
        if chapter.exclude_from_contents {
            flags.push("no toc");
        }
        let mark = if chapter.include { "x" } else { " " };
        let title = if chapter.include {
            console::style(chapter.title.as_str())
        } else {
            console::style(chapter.title.as_str()).dim()
        };
        println!(
            "{:>3}. [{mark}] {title} ({}){}",
            i + 1,
            chapter.file.display(),
            if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            }
        );
    }
}

pub fn chapters(project: &Project, action: &ChapterAction) -> Result<()> {
    let (mut data, _) = project.load()?;
    if let Some(op) = operation(action)? {
        op.apply(&mut data.chapters)?;
        project.save(&data)?;
    }
    print_chapters(&data);
    Ok(())
}

/// Apply a theme and component selection to the saved metadata.
fn select_style(data: &mut SaveData, args: &ThemeArgs) -> Result<()> {
    if let Some(id) = &args.theme {
        let theme = themes::find(id).ok_or_else(|| {
            let ids: Vec<&str> = themes::THEMES.iter().map(|t| t.id).collect();
            anyhow!("Unknown theme '{id}', expected one of: {}", ids.join(", "))
        })?;
        data.metadata.theme = theme.id.to_string();
        data.metadata.components = ComponentSet::for_theme(theme);
    }
    for id in &args.components {
        if let Some(previous) = data.metadata.components.select(id)? {
            log::info!("{id} replaces {previous}");
        }
    }
    Ok(())
}

fn print_styles(data: &SaveData) {
    println!("Themes:");
    for theme in themes::THEMES {
        let mark = if theme.id == data.metadata.theme { "*" } else { " " };
        println!("  {mark} {:<10} {}", theme.id, theme.name);
    }
    println!(
        "Components ({} active):",
        data.metadata.components.len()
    );
    for category in Category::all() {
        println!("  {}:", category.name());
        for component in components::in_category(*category) {
            let mark = if data.metadata.components.contains(component.id) {
                "*"
            } else {
                " "
            };
            println!("    {mark} {:<12} {}", component.id, component.name);
        }
    }
}

pub fn theme(project: &Project, args: &ThemeArgs) -> Result<()> {
    let (mut data, _) = project.load()?;
    if args.theme.is_some() || !args.components.is_empty() {
        select_style(&mut data, args)?;
        project.save(&data)?;
    }
    print_styles(&data);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::FolderArgs;
    use std::fs;
    use std::path::Path;

    fn project(files: &[&str]) -> (tempfile::TempDir, Project) {
        let vault = tempfile::tempdir().unwrap();
        let book = vault.path().join("book");
        fs::create_dir_all(&book).unwrap();
        for file in files {
            fs::write(book.join(file), "Some text.").unwrap();
        }
        let project = Project::open(vault.path(), Path::new("book")).unwrap();
        (vault, project)
    }

    fn theme_args(theme: Option<&str>, components: &[&str]) -> ThemeArgs {
        ThemeArgs {
            book: FolderArgs {
                folder: PathBuf::from("book"),
            },
            theme: theme.map(str::to_string),
            components: components.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn matter_writes_a_starter_once() {
        let (_vault, project) = project(&[]);
        let path = matter(&project, "about the author").unwrap();
        assert!(path.ends_with("_binder About the Author.md"));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("---\n"));
        assert!(matter(&project, "About the Author").is_err());
        assert!(matter(&project, "Prologue").is_err());
    }

    #[test]
    fn new_matter_file_is_discovered_as_matter() {
        let (_vault, project) = project(&["1 One.md"]);
        matter(&project, "Copyright").unwrap();
        let (data, _) = project.load().unwrap();
        assert_eq!(data.chapters[0].title, "_binder Copyright");
        assert!(data.chapters[0].is_front_matter());
    }

    #[test]
    fn chapter_positions_are_one_based() {
        assert_eq!(
            operation(&ChapterAction::Move { from: 1, to: 3 }).unwrap(),
            Some(ChapterOperation::Move { from: 0, to: 2 })
        );
        assert!(operation(&ChapterAction::Rename {
            index: 0,
            title: "x".to_string()
        })
        .is_err());
        assert_eq!(operation(&ChapterAction::List).unwrap(), None);
    }

    #[test]
    fn chapter_edits_are_saved() {
        let (_vault, project) = project(&["1 One.md", "2 Two.md"]);
        chapters(&project, &ChapterAction::Reverse).unwrap();
        chapters(
            &project,
            &ChapterAction::Toggle {
                index: 1,
                flag: Flag::Include,
            },
        )
        .unwrap();

        let (data, _) = project.load().unwrap();
        let titles: Vec<&str> = data.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Two", "One"]);
        assert!(!data.chapters[0].include);
    }

    #[test]
    fn choosing_a_theme_resets_components() {
        let mut data = SaveData::default();
        select_style(&mut data, &theme_args(None, &["_hr3"])).unwrap();
        assert!(data.metadata.components.contains("_hr3"));
        assert!(!data.metadata.components.contains("_hr1"));

        select_style(&mut data, &theme_args(Some("mono"), &[])).unwrap();
        assert_eq!(data.metadata.theme, "mono");
        assert!(!data.metadata.components.contains("_hr3"));
        assert!(data.metadata.components.contains("_hr2"));
    }

    #[test]
    fn unknown_styles_are_errors() {
        let mut data = SaveData::default();
        assert!(select_style(&mut data, &theme_args(Some("gothic"), &[])).is_err());
        assert!(select_style(&mut data, &theme_args(None, &["_sparkles"])).is_err());
    }
}
