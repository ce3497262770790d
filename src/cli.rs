use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct FolderArgs {
    /// The book folder, relative to the vault
    pub folder: PathBuf,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[clap(flatten)]
    pub book: FolderArgs,
    /// Write an EPUB to this path
    #[clap(long, value_name = "PATH")]
    pub epub: Option<PathBuf>,
    /// Write a PDF to this path, using the configured paginator
    #[clap(long, value_name = "PATH")]
    pub pdf: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[clap(flatten)]
    pub book: FolderArgs,
    /// Copy the preview EPUB here
    #[clap(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MatterArgs {
    #[clap(flatten)]
    pub book: FolderArgs,
    /// Matter page to create, e.g. "Copyright" or "About the Author"
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ThemeArgs {
    #[clap(flatten)]
    pub book: FolderArgs,
    /// Theme to switch to; resets components to the theme's defaults
    pub theme: Option<String>,
    /// Component to turn on; replaces any other component of its category
    #[clap(long = "component", value_name = "ID")]
    pub components: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    /// Included in the book
    Include,
    /// Listed in the contents
    Toc,
    /// Front matter
    Front,
    /// Back matter
    Back,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ChapterAction {
    /// Include every chapter
    SelectAll,
    /// Exclude every chapter
    SelectNone,
    /// Remove leading digits from titles
    StripNumbers,
    /// Remove the first word from titles
    StripFirstWord,
    /// Reset titles to the file names
    RestoreTitles,
    /// Title story chapters 1, 2, 3...
    NumberTitles,
    /// Sort chapters by title
    SortTitle,
    /// Reverse the chapter order
    Reverse,
    /// Restore the natural file order
    RestoreOrder,
    /// Move a chapter to another position
    Move { from: usize, to: usize },
    /// Rename one chapter
    Rename { index: usize, title: String },
    /// Flip one of a chapter's flags
    Toggle {
        index: usize,
        #[clap(value_enum)]
        flag: Flag,
    },
    /// Print the chapter list
    List,
}

#[derive(Args, Debug)]
pub struct ChaptersArgs {
    #[clap(flatten)]
    pub book: FolderArgs,
    #[clap(subcommand)]
    pub action: ChapterAction,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sets up a book folder and writes its save file
    Init(FolderArgs),
    /// Re-scans the book folder for added or removed chapters
    Update(FolderArgs),
    /// Binds the book into an EPUB and/or a PDF
    Render(RenderArgs),
    /// Builds a preview with placeholder metadata
    Preview(PreviewArgs),
    /// Creates a starter file for a front or back matter page
    Matter(MatterArgs),
    /// Edits the chapter list
    Chapters(ChaptersArgs),
    /// Lists or selects themes and components
    Theme(ThemeArgs),
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// The vault holding the book folder and any images it refers to
    #[clap(long, global = true, env = "BINDER_VAULT", default_value = ".")]
    pub vault: PathBuf,

    /// Show more detail (-v for info, -vv for debug)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_render_outputs() {
        let cli = Cli::try_parse_from([
            "binder", "-vv", "render", "novel", "--epub", "out.epub", "--pdf", "out.pdf",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.book.folder, PathBuf::from("novel"));
        assert_eq!(args.epub, Some(PathBuf::from("out.epub")));
        assert_eq!(args.pdf, Some(PathBuf::from("out.pdf")));
    }

    #[test]
    fn parses_chapter_toggle() {
        let cli =
            Cli::try_parse_from(["binder", "chapters", "novel", "toggle", "2", "front"]).unwrap();
        let Commands::Chapters(args) = cli.command else {
            panic!("expected chapters");
        };
        assert_eq!(
            args.action,
            ChapterAction::Toggle {
                index: 2,
                flag: Flag::Front
            }
        );
    }

    #[test]
    fn parses_repeated_components() {
        let cli = Cli::try_parse_from([
            "binder",
            "theme",
            "novel",
            "mono",
            "--component",
            "_hr3",
            "--component",
            "_dropcap2",
        ])
        .unwrap();
        let Commands::Theme(args) = cli.command else {
            panic!("expected theme");
        };
        assert_eq!(args.theme.as_deref(), Some("mono"));
        assert_eq!(args.components, vec!["_hr3", "_dropcap2"]);
    }
}
