use std::{fs::File, io::stdout, path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use flipbook::event_source::KeyboardEventSource;
use flipbook::page_source::{self, PageSourceError};
use flipbook::pagination::Page;
use flipbook::panic_handler::{TerminalSession, initialize_panic_handler};
use flipbook::{App, AppOptions, run_app_with_event_source, settings};

/// Leaf through page images like a book, one sheet at a time
#[derive(Parser, Debug)]
#[command(name = "flipbook", version, about)]
struct Cli {
    /// Page images, or directories of page images, in reading order
    paths: Vec<PathBuf>,

    /// Open the built-in sample book
    #[arg(long, conflicts_with = "paths")]
    sample: bool,

    /// Start with the page turn sound muted
    #[arg(long)]
    no_sound: bool,

    /// Where to write the log
    #[arg(long, default_value = "flipbook.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Application error: {err:?}");
            eprintln!("flipbook: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, Config::default(), File::create(&cli.log_file)?)?;
    info!("Starting flipbook");

    settings::load_settings();

    // Provider failures are reported before the terminal switches screens
    let pages = initial_pages(&cli)?;

    let mut options = AppOptions::from_settings();
    if cli.no_sound {
        options.sound_enabled = false;
        options.persist_settings = false;
    }
    let mut app = App::new(options);
    if let Some(pages) = pages {
        app.open_pages(pages);
    }

    initialize_panic_handler();
    let res = {
        let _session = TerminalSession::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        run_app_with_event_source(&mut terminal, &mut app, &mut KeyboardEventSource)
    };

    info!("Shutting down flipbook");
    res
}

fn initial_pages(cli: &Cli) -> Result<Option<Vec<Page>>, PageSourceError> {
    if cli.sample {
        info!("Loading sample book...");
        return Ok(Some(page_source::sample_pages()));
    }
    if cli.paths.is_empty() {
        return Ok(None);
    }
    page_source::load_pages(&cli.paths).map(Some)
}
