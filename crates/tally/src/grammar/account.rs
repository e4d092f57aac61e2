//! Account commands and the transactions recorded on an account.

use tally_command::{
    ArgKind, Argument, Bindings, CommandError, Context, ContextKind, Outcome, Registry,
};
use tally_core::{AccountId, Amount, BookError, Transaction};

use super::{choose, confirm, ActionResult, Spec};
use crate::console::Console;
use crate::report::Table;
use crate::session::Session;

/// `new account <accountName>`
pub fn create<C: Console + 'static>() -> Spec<C> {
    Spec::new("account")
        .with_help("Open a new account")
        .argument(Argument::new("accountName", ArgKind::Text).required())
        .action(create_account)
}

/// `new transaction value <money>, [date <date>], [note <text>], [category <category>]`
pub fn new_transaction<C: Console + 'static>() -> Spec<C> {
    Spec::new("transaction")
        .with_help("Record income (positive) or spending (negative) on this account")
        .context(ContextKind::Account)
        .argument(Argument::labeled("value", "value", ArgKind::Money).required())
        .argument(Argument::labeled("date", "date", ArgKind::Date))
        .argument(Argument::labeled("note", "note", ArgKind::Text))
        .argument(Argument::labeled("category", "category", ArgKind::Category))
        .action(record_transaction)
}

/// `enter account [<account>]`
pub fn enter<C: Console + 'static>() -> Spec<C> {
    Spec::new("account")
        .with_help("Work inside an account; without a name, pick from a menu")
        .argument(Argument::new("account", ArgKind::Account))
        .action(enter_account)
}

/// `list accounts`
pub fn list<C: Console + 'static>() -> Spec<C> {
    Spec::new("accounts")
        .with_help("Show every account with its balance")
        .action(list_accounts)
}

/// `list transactions [from <date>], [to <date>]`
pub fn list_transactions<C: Console + 'static>() -> Spec<C> {
    Spec::new("transactions")
        .with_help("Show the transactions of this account or category, optionally within [from, to)")
        .context(ContextKind::Account)
        .context(ContextKind::Category)
        .argument(Argument::labeled("from", "from", ArgKind::Date))
        .argument(Argument::labeled("to", "to", ArgKind::Date))
        .action(show_transactions)
}

/// `rename account from <account>, to <text>`
pub fn rename<C: Console + 'static>() -> Spec<C> {
    Spec::new("account")
        .with_help("Rename an account")
        .argument(Argument::labeled("from", "from", ArgKind::Account).required())
        .argument(Argument::labeled("to", "to", ArgKind::Text).required())
        .action(rename_account)
}

/// `delete account <account>`
pub fn delete<C: Console + 'static>() -> Spec<C> {
    Spec::new("account")
        .with_help("Delete an account and its transactions")
        .argument(Argument::new("account", ArgKind::Account).required())
        .action(delete_account)
}

/// `delete transaction`
pub fn delete_transaction<C: Console + 'static>() -> Spec<C> {
    Spec::new("transaction")
        .with_help("Pick a transaction of this account to delete")
        .context(ContextKind::Account)
        .action(remove_transaction)
}

fn current<C: Console>(session: &Session<C>) -> Result<AccountId, CommandError> {
    session
        .current_account()
        .ok_or_else(|| CommandError::Rejected("not inside an account".to_string()))
}

fn create_account<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let name = args.text("accountName")?;
    session.book_mut().open_account(&name)?;
    session.print(format!("Opened account {name}"));
    Ok(Outcome::Done)
}

fn record_transaction<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let account = current(session)?;
    let date = match args.date_opt("date")? {
        Some(date) => date,
        None => session.book().today(),
    };
    let amount = args.money("value")?;
    let mut txn = Transaction::new(date, amount.clone());
    if let Some(note) = args.text_opt("note")? {
        txn = txn.with_note(note);
    }
    if let Some(category) = args.category_opt("category")? {
        txn = txn.with_category(category);
    }

    let index = session.book_mut().record(account, txn)?;
    let name = session.book().account(account)?.name.clone();
    tracing::info!(account = %name, %amount, %date, "recorded transaction");
    session.print(format!("Recorded {amount} on {name} ({date}, #{})", index + 1));
    Ok(Outcome::Done)
}

fn enter_account<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let id = match args.account_opt("account")? {
        Some(id) => id,
        None => {
            let accounts: Vec<(AccountId, String)> = session
                .book()
                .accounts()
                .iter()
                .map(|a| (a.id, a.name.clone()))
                .collect();
            if accounts.is_empty() {
                return Err(CommandError::Rejected(
                    "there are no accounts yet; use `new account <name>`".to_string(),
                ));
            }
            let names: Vec<String> = accounts.iter().map(|(_, name)| name.clone()).collect();
            match choose(session, "Enter which account?", &names)? {
                Some(index) => accounts[index].0,
                None => return Ok(Outcome::Done),
            }
        }
    };
    Ok(Outcome::Enter(Context::Account(id)))
}

fn list_accounts<C: Console>(session: &mut Session<C>, _: &Bindings) -> ActionResult {
    let book = session.book();
    if book.accounts().is_empty() {
        session.print("No accounts.");
        return Ok(Outcome::Done);
    }
    let mut table = Table::new(["account", "transactions", "balance"]);
    for account in book.accounts() {
        table.row([
            account.name.clone(),
            account.transactions.len().to_string(),
            book.balance(account.id)?.to_string(),
        ]);
    }
    let total = book.total_balance()?;
    let text = format!("{}\n\nTotal: {total}", table.render());
    session.print(text);
    Ok(Outcome::Done)
}

fn show_transactions<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let from = args.date_opt("from")?;
    let to = args.date_opt("to")?;
    let book = session.book();

    let mut table;
    let mut numbers = Vec::new();
    if let Some(category) = session.current_category() {
        table = Table::new(["date", "account", "amount", "note"]);
        for (account, _, txn) in book.categorized(category) {
            if from.is_some_and(|d| txn.date < d) || to.is_some_and(|d| txn.date >= d) {
                continue;
            }
            numbers.push(txn.amount.number);
            table.row([
                txn.date.to_string(),
                account.name.clone(),
                txn.amount.to_string(),
                txn.note.clone().unwrap_or_default(),
            ]);
        }
    } else {
        let account = book.account(current(session)?)?;
        table = Table::new(["#", "date", "amount", "category", "note"]);
        for (index, txn) in account.transactions_between(from, to) {
            let category = match txn.category {
                Some(id) => book.category(id)?.name.clone(),
                None => String::new(),
            };
            numbers.push(txn.amount.number);
            table.row([
                (index + 1).to_string(),
                txn.date.to_string(),
                txn.amount.to_string(),
                category,
                txn.note.clone().unwrap_or_default(),
            ]);
        }
    }

    let text = if table.is_empty() {
        "No transactions.".to_string()
    } else {
        let total = Amount::checked_sum_in(&book.currency, numbers).ok_or(BookError::Overflow)?;
        format!("{}\n\n{} transaction(s), net {total}", table.render(), table.len())
    };
    session.print(text);
    Ok(Outcome::Done)
}

fn rename_account<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let id = args.account("from")?;
    let name = args.text("to")?;
    let old = session.book().account(id)?.name.clone();
    session.book_mut().rename_account(id, &name)?;
    session.print(format!("Renamed account {old} to {name}"));
    Ok(Outcome::Done)
}

fn delete_account<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let id = args.account("account")?;
    let account = session.book().account(id)?;
    let name = account.name.clone();
    let prompt = format!(
        "Delete account {name} and its {} transaction(s)?",
        account.transactions.len()
    );
    if !confirm(session, &prompt) {
        session.print(format!("Kept account {name}"));
        return Ok(Outcome::Done);
    }

    session.book_mut().remove_account(id)?;
    tracing::info!(account = %name, "deleted account");
    session.print(format!("Deleted account {name}"));
    if session.current_account() == Some(id) {
        return Ok(Outcome::Enter(Context::Book));
    }
    Ok(Outcome::Done)
}

fn remove_transaction<C: Console>(session: &mut Session<C>, _: &Bindings) -> ActionResult {
    let id = current(session)?;
    let account = session.book().account(id)?;
    if account.transactions.is_empty() {
        return Err(CommandError::Rejected(format!(
            "account {} has no transactions",
            account.name
        )));
    }
    let choices: Vec<String> = account
        .transactions
        .iter()
        .map(|txn| match &txn.note {
            Some(note) => format!("{}  {}  {note}", txn.date, txn.amount),
            None => format!("{}  {}", txn.date, txn.amount),
        })
        .collect();

    let Some(index) = choose(session, "Delete which transaction?", &choices)? else {
        return Ok(Outcome::Done);
    };
    let removed = session.book_mut().remove_transaction(id, index)?;
    session.print(format!("Deleted {} from {}", removed.amount, removed.date));
    Ok(Outcome::Done)
}
