//! The tally command grammar.
//!
//! Every console command is declared here as data. Actions live next to the
//! entity they operate on:
//!
//! - [`account`] - accounts and their transactions
//! - [`category`] - categories and budgets
//! - [`book`] - transfers and balances across the book
//! - [`general`] - session commands (`leave`, `save`, `help`, `quit`)

pub mod account;
pub mod book;
pub mod category;
pub mod general;

use tally_command::{CommandError, CommandSpec, CommandTree, GrammarDefects, Outcome};

use crate::console::Console;
use crate::session::Session;

/// A command declaration over a session.
pub type Spec<C> = CommandSpec<Session<C>>;

/// Result of an action.
pub type ActionResult = Result<Outcome, CommandError>;

/// Build the full command tree.
pub fn build<C: Console + 'static>() -> Result<CommandTree<Session<C>>, GrammarDefects> {
    CommandTree::build(vec![
        Spec::new("new")
            .with_help("Create an account, category or transaction")
            .child(account::create())
            .child(category::create())
            .child(account::new_transaction()),
        Spec::new("enter")
            .with_help("Work inside an account or category")
            .child(account::enter())
            .child(category::enter()),
        general::leave(),
        Spec::new("list")
            .with_help("Show accounts, categories, transfers or transactions")
            .child(account::list())
            .child(category::list())
            .child(book::list_transfers())
            .child(account::list_transactions()),
        book::transfer(),
        Spec::new("rename")
            .with_help("Rename an account or category")
            .child(account::rename())
            .child(category::rename()),
        Spec::new("delete")
            .with_help("Delete an account, category or transaction")
            .child(account::delete())
            .child(category::delete())
            .child(account::delete_transaction()),
        category::budget(),
        book::balance(),
        general::save(),
        general::help(),
        general::quit(),
    ])
}

/// Ask the user to pick one of `names`; `None` when dismissed.
fn choose<C: Console>(
    session: &mut Session<C>,
    prompt: &str,
    names: &[String],
) -> Result<Option<usize>, CommandError> {
    if names.is_empty() {
        return Err(CommandError::Rejected("nothing to choose from".to_string()));
    }
    Ok(session.console_mut().select(prompt, names))
}

/// Ask a yes/no question through a two-item menu.
fn confirm<C: Console>(session: &mut Session<C>, prompt: &str) -> bool {
    let choices = ["no".to_string(), "yes".to_string()];
    session.console_mut().select(prompt, &choices) == Some(1)
}
