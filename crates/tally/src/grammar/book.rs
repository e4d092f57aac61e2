//! Commands spanning the whole book: transfers and balances.

use tally_command::{ArgKind, Argument, Bindings, Outcome, Registry};
use tally_core::{Period, Transfer};

use super::{ActionResult, Spec};
use crate::console::Console;
use crate::report::Table;
use crate::session::Session;

/// `transfer from <account>, to <account>, value <money>, [date <date>], [note <text>]`
pub fn transfer<C: Console + 'static>() -> Spec<C> {
    Spec::new("transfer")
        .with_help("Move money between two accounts")
        .argument(Argument::labeled("from", "from", ArgKind::Account).required())
        .argument(Argument::labeled("to", "to", ArgKind::Account).required())
        .argument(Argument::labeled("value", "value", ArgKind::Money).required())
        .argument(Argument::labeled("date", "date", ArgKind::Date))
        .argument(Argument::labeled("note", "note", ArgKind::Text))
        .action(make_transfer)
}

/// `list transfers`
pub fn list_transfers<C: Console + 'static>() -> Spec<C> {
    Spec::new("transfers")
        .with_help("Show transfers; inside an account, only those touching it")
        .action(show_transfers)
}

/// `balance`
pub fn balance<C: Console + 'static>() -> Spec<C> {
    Spec::new("balance")
        .with_help("Show the balance of the book, the account, or the category's spending")
        .action(show_balance)
}

fn make_transfer<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let date = match args.date_opt("date")? {
        Some(date) => date,
        None => session.book().today(),
    };
    let mut transfer = Transfer::new(
        date,
        args.account("from")?,
        args.account("to")?,
        args.money("value")?,
    );
    if let Some(note) = args.text_opt("note")? {
        transfer = transfer.with_note(note);
    }

    let from = session.book().account(transfer.from)?.name.clone();
    let to = session.book().account(transfer.to)?.name.clone();
    let amount = transfer.amount.clone();
    session.book_mut().transfer(transfer)?;
    tracing::info!(%from, %to, %amount, "transferred");
    session.print(format!("Moved {amount} from {from} to {to}"));
    Ok(Outcome::Done)
}

fn show_transfers<C: Console>(session: &mut Session<C>, _: &Bindings) -> ActionResult {
    let book = session.book();
    let only = session.current_account();
    let name = |id| book.account(id).map(|a| a.name.clone());

    let mut table = Table::new(["date", "from", "to", "amount", "note"]);
    for transfer in book.transfers() {
        if only.is_some_and(|id| !transfer.involves(id)) {
            continue;
        }
        table.row([
            transfer.date.to_string(),
            name(transfer.from)?,
            name(transfer.to)?,
            transfer.amount.to_string(),
            transfer.note.clone().unwrap_or_default(),
        ]);
    }

    let text = if table.is_empty() {
        "No transfers.".to_string()
    } else {
        table.render()
    };
    session.print(text);
    Ok(Outcome::Done)
}

fn show_balance<C: Console>(session: &mut Session<C>, _: &Bindings) -> ActionResult {
    let book = session.book();
    let text = if let Some(id) = session.current_account() {
        let account = book.account(id)?;
        format!("{}: {}", account.name, book.balance(id)?)
    } else if let Some(id) = session.current_category() {
        let category = book.category(id)?;
        let today = book.today();
        match book.budget_status(id, today)? {
            Some(status) => format!(
                "{}: spent {} of {} ({}, {} to {}), {} {}",
                category.name,
                status.spent,
                status.budget.limit,
                status.budget.period,
                status.start,
                status.end.pred_opt().unwrap_or(status.end),
                status.remaining.abs(),
                if status.is_over() { "over" } else { "left" },
            ),
            None => {
                let (start, end) = Period::Monthly.bounds(today);
                format!(
                    "{}: spent {} this month (no budget)",
                    category.name,
                    book.spent(id, start, end)?
                )
            }
        }
    } else {
        let mut table = Table::new(["account", "balance"]);
        for account in book.accounts() {
            table.row([account.name.clone(), book.balance(account.id)?.to_string()]);
        }
        format!("{}\n\nTotal: {}", table.render(), book.total_balance()?)
    };
    session.print(text);
    Ok(Outcome::Done)
}
