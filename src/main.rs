use anyhow::Result;
use cli::{Cli, Commands};
use project::Project;
use std::process::ExitCode;

mod assembler;
mod book;
mod cli;
mod commands;
mod file_ordering;
mod html;
mod init;
mod markdown;
mod matter;
mod preview;
mod project;
mod resources;
mod settings;
mod sinks;
mod style;
mod transform;
mod update;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Commands::Init(args) => init::run(&Project::open(&cli.vault, &args.folder)?),
        Commands::Update(args) => update::run(&Project::open(&cli.vault, &args.folder)?),
        Commands::Render(args) => {
            let project = Project::open(&cli.vault, &args.book.folder)?;
            println!("Binding {}...", project.root().display());
            commands::render(&project, args)
        }
        Commands::Preview(args) => {
            let project = Project::open(&cli.vault, &args.book.folder)?;
            commands::preview(&project, args)
        }
        Commands::Matter(args) => {
            let project = Project::open(&cli.vault, &args.book.folder)?;
            let path = commands::matter(&project, &args.name)?;
            println!("{} written!", path.display());
            println!("Fill in the block at the top, then run `binder update`.");
            Ok(())
        }
        Commands::Chapters(args) => {
            let project = Project::open(&cli.vault, &args.book.folder)?;
            commands::chapters(&project, &args.action)
        }
        Commands::Theme(args) => {
            let project = Project::open(&cli.vault, &args.book.folder)?;
            commands::theme(&project, args)
        }
    }
}
