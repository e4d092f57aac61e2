//! tally - the interactive console.
//!
//! # Usage
//!
//! ```bash
//! tally household.json                       # Interactive session
//! tally household.json -e "list accounts"    # Run commands and exit
//! tally --currency EUR                       # Start a new, unsaved book
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use tally_command::{CompletionIndex, Dispatcher};
use tracing_subscriber::EnvFilter;

use crate::config::{self, Config};
use crate::console::{Console, Scripted, Terminal};
use crate::grammar;
use crate::session::Session;
use crate::store;

/// Track accounts, categories, budgets and transfers from a console.
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The book file (JSON); created on first save
    #[arg(value_name = "BOOK")]
    pub book: Option<PathBuf>,

    /// Config file (default: <config dir>/tally/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Currency for a new book and for amounts typed without one
    #[arg(long, value_name = "CODE")]
    pub currency: Option<String>,

    /// Run a command and exit; may be repeated
    #[arg(short = 'e', long = "execute", value_name = "COMMAND")]
    pub execute: Vec<String>,

    /// Do not read or write the line history
    #[arg(long)]
    pub no_history: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Main entry point for the console.
pub fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the console with already parsed arguments.
pub fn run(args: &Args) -> Result<()> {
    let config = Config::load(args.config.as_deref());
    let currency = args.currency.clone().unwrap_or_else(|| config.currency.clone());
    let path = args.book.clone().or_else(|| config.book.clone());

    let book = match &path {
        Some(path) => store::load(path, &currency)
            .with_context(|| format!("failed to open {}", path.display()))?,
        None => tally_core::Book::new("untitled", &currency),
    };
    tracing::debug!(book = %book.name, currency = %book.currency, "opened book");

    if !args.execute.is_empty() {
        // Menus in non-interactive runs read from stdin through the terminal.
        let console = Terminal::new(CompletionIndex::default(), None)
            .context("failed to open the terminal")?;
        let (mut session, dispatcher) = start(book, console, path, &config)?;
        for command in &args.execute {
            if !session.execute(&dispatcher, command) {
                break;
            }
        }
        session.finish();
        return Ok(());
    }

    let tree = Rc::new(grammar::build::<Terminal>().context("command grammar is malformed")?);
    let history = if config.history && !args.no_history {
        config::history_path()
    } else {
        None
    };
    let console = Terminal::new(CompletionIndex::new(&tree), history)
        .context("failed to open the terminal")?;
    let mut session = session_for(book, console, path, &config);
    session.set_commands(Rc::clone(&tree));
    let dispatcher = Dispatcher::shared(tree);

    let book = session.book();
    let categories = book.categories().len();
    let welcome = format!(
        "{} ({}): {} account(s), {categories} categor{}. Type `help` for commands.",
        book.name,
        book.currency,
        book.accounts().len(),
        if categories == 1 { "y" } else { "ies" },
    );
    session.print(welcome);
    session.run(&dispatcher);
    session.console_mut().save_history();
    Ok(())
}

fn session_for<C: Console>(
    book: tally_core::Book,
    console: C,
    path: Option<PathBuf>,
    config: &Config,
) -> Session<C> {
    let session = Session::new(book, console)
        .with_autosave(config.autosave)
        .with_prompt(config.prompt.clone());
    match path {
        Some(path) => session.with_path(path),
        None => session,
    }
}

/// Build the grammar and a session around `console`.
pub fn start<C: Console + 'static>(
    book: tally_core::Book,
    console: C,
    path: Option<PathBuf>,
    config: &Config,
) -> Result<(Session<C>, Dispatcher<Session<C>>)> {
    let tree = Rc::new(grammar::build::<C>().context("command grammar is malformed")?);
    let mut session = session_for(book, console, path, config);
    session.set_commands(Rc::clone(&tree));
    Ok((session, Dispatcher::shared(tree)))
}

/// Run `lines` against `book` on a [`Scripted`] console and return the
/// session afterwards.
pub fn replay<I, L>(book: tally_core::Book, lines: I) -> Result<Session<Scripted>>
where
    I: IntoIterator<Item = L>,
    L: Into<String>,
{
    let config = Config {
        autosave: false,
        ..Config::default()
    };
    let (mut session, dispatcher) = start(book, Scripted::new(lines), None, &config)?;
    session.run(&dispatcher);
    Ok(session)
}
