//! mdpad - Main Entry Point
//!
//! Command-line host for the mdpad editor core. Each sub-command maps onto
//! one user-facing control of `App`.

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, warn};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use mdpad::config::{FontSize, Theme};
use mdpad::export::{HttpImageLoader, PdfOutcome, PdfWriterAssembler, SystemClipboard};
use mdpad::host::{BrowserPrinter, Capabilities, DirectoryDownloads, TerminalPrompt};
use mdpad::storage::{FileStore, KeyValueStore, MemoryStore};
use mdpad::{App, Error, Result};

/// Application name constant.
const APP_NAME: &str = "mdpad";

#[derive(Parser)]
#[command(version, about = "mdpad - Markdown authoring with live preview and export", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the saved document and preferences
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Directory receiving exported files
    #[arg(long, global = true, default_value = ".")]
    out: PathBuf,

    /// Answer OK to every confirmation
    #[arg(long, global = true, conflicts_with = "no")]
    yes: bool,

    /// Answer Cancel to every confirmation
    #[arg(long, global = true)]
    no: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rendered preview markup
    Render,
    /// Replace the document text with a file's content (`-` for stdin)
    Set { file: PathBuf },
    /// Print the document text
    Show,
    /// Print word and character counts
    Stats,
    /// Replace the document with the sample document
    Sample,
    /// Clear the document (asks for confirmation)
    Clear,
    /// Select a theme, or cycle to the next one without a name
    Theme { name: Option<String> },
    /// Select the preview font size in pixels
    FontSize { size: String },
    /// Toggle the reading direction
    Direction,
    /// Export the document
    Export {
        #[arg(value_enum)]
        format: Format,
    },
    /// Send the preview to the system print dialog
    Print,
    /// Copy the rendered HTML to the clipboard
    Copy,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Md,
    Html,
    Png,
    Pdf,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn open_store(dir: Option<PathBuf>) -> Rc<dyn KeyValueStore> {
    let store = match dir {
        Some(dir) => Ok(FileStore::new(dir)),
        None => FileStore::open_default(),
    };
    match store {
        Ok(store) => {
            info!("Using store at {}", store.dir().display());
            Rc::new(store)
        }
        Err(e) => {
            warn!("{}. Changes will not be saved.", e);
            Rc::new(MemoryStore::new())
        }
    }
}

fn capabilities() -> Capabilities {
    let caps = Capabilities::none()
        .with_clipboard(SystemClipboard)
        .with_printer(BrowserPrinter::default())
        .with_page_assembler(PdfWriterAssembler::new());

    let caps = match std::env::current_dir() {
        Ok(dir) => caps.with_image_loader(HttpImageLoader::with_base_dir(dir)),
        Err(_) => caps.with_image_loader(HttpImageLoader::new()),
    };

    #[cfg(feature = "katex")]
    let caps = caps.with_typesetter(mdpad::markdown::KatexTypesetter);

    caps
}

fn read_source(file: &PathBuf) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(file)?)
    }
}

fn run(cli: Cli) -> Result<()> {
    let prompt = match (cli.yes, cli.no) {
        (true, _) => TerminalPrompt::Fixed(true),
        (_, true) => TerminalPrompt::Fixed(false),
        _ => TerminalPrompt::Interactive,
    };
    let downloads = DirectoryDownloads::new(&cli.out);

    let mut app = App::new(
        open_store(cli.store),
        capabilities(),
        Box::new(prompt),
        Box::new(downloads.clone()),
    );

    match cli.command {
        Commands::Render => println!("{}", app.preview().markup()),
        Commands::Set { file } => {
            app.on_input(read_source(&file)?);
            println!("{}", app.ui().status);
        }
        Commands::Show => print!("{}", app.text()),
        Commands::Stats => println!("{}", app.ui().status),
        Commands::Sample => {
            app.load_sample();
            println!("{}", app.ui().status);
        }
        Commands::Clear => {
            if app.clear() {
                println!("Cleared");
            }
        }
        Commands::Theme { name } => {
            match name {
                Some(name) => {
                    let theme = Theme::from_name(&name)
                        .ok_or_else(|| Error::Application(format!("Unknown theme '{}'", name)))?;
                    app.select_theme(theme);
                }
                None => app.cycle_theme(),
            }
            println!("{}", app.preferences().theme.as_str());
        }
        Commands::FontSize { size } => {
            let size = FontSize::parse(&size).ok_or_else(|| {
                Error::Application(format!(
                    "Font size must be between {} and {}",
                    FontSize::MIN,
                    FontSize::MAX
                ))
            })?;
            app.select_font_size(size);
        }
        Commands::Direction => {
            app.toggle_direction();
            println!("{}", app.preferences().direction.as_str());
        }
        Commands::Export { format } => {
            let artifact = match format {
                Format::Md => Some(app.export_markdown()?),
                Format::Html => Some(app.export_html()?),
                Format::Png => Some(app.export_png()?),
                Format::Pdf => match app.export_pdf()? {
                    PdfOutcome::Downloaded(artifact) => Some(artifact),
                    PdfOutcome::Printed { .. } => None,
                },
            };
            if let Some(artifact) = artifact {
                println!("{}", downloads.path_for(&artifact.file_name).display());
            }
        }
        Commands::Print => app.print()?,
        Commands::Copy => app.copy_preview()?,
    }

    // Nothing outlives the process; apply pending label and chrome restores.
    app.flush();
    Ok(())
}
