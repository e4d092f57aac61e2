//! Session commands.

use std::path::Path;

use tally_command::{
    usage, ArgKind, Argument, Bindings, CommandError, Context, ContextKind, ContextProvider,
    Outcome,
};

use super::{ActionResult, Spec};
use crate::console::Console;
use crate::report::Table;
use crate::session::Session;

/// `leave`
pub fn leave<C: Console + 'static>() -> Spec<C> {
    Spec::new("leave")
        .with_help("Return to the book")
        .context(ContextKind::Account)
        .context(ContextKind::Category)
        .action(|_: &mut Session<C>, _: &Bindings| Ok(Outcome::Enter(Context::Book)))
}

/// `save [<path>]`
pub fn save<C: Console + 'static>() -> Spec<C> {
    Spec::new("save")
        .with_help("Write the book to its file, or to a new one")
        .argument(Argument::new("path", ArgKind::Text))
        .action(save_book)
}

/// `help`
pub fn help<C: Console + 'static>() -> Spec<C> {
    Spec::new("help")
        .with_help("List the commands available here")
        .action(show_help)
}

/// `quit`
pub fn quit<C: Console + 'static>() -> Spec<C> {
    Spec::new("quit")
        .with_help("Leave tally, saving unsaved changes")
        .action(|_: &mut Session<C>, _: &Bindings| Ok(Outcome::Exit))
}

fn save_book<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let path = args.text_opt("path")?;
    match session.save(path.as_deref().map(Path::new)) {
        Ok(Some(path)) => {
            session.print(format!("Saved {}", path.display()));
            Ok(Outcome::Done)
        }
        Ok(None) => Err(CommandError::Rejected(
            "the book has no file yet; use `save <path>`".to_string(),
        )),
        Err(err) => Err(CommandError::Rejected(err.to_string())),
    }
}

fn show_help<C: Console>(session: &mut Session<C>, _: &Bindings) -> ActionResult {
    let commands = session
        .commands()
        .ok_or_else(|| CommandError::Rejected("no commands registered".to_string()))?;
    let kind = session.context().kind();

    let mut table = Table::new(["command", "description"]);
    for entry in usage(&*commands, Some(kind)) {
        table.row([entry.synopsis, entry.help.unwrap_or_default()]);
    }
    let text = format!(
        "Commands in {kind} context (quote text containing `,` or `;`):\n\n{}",
        table.render()
    );
    session.print(text);
    Ok(Outcome::Done)
}
