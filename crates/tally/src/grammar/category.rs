//! Category and budget commands.

use tally_command::{ArgKind, Argument, Bindings, CommandError, Context, Outcome, Registry};
use tally_core::{Budget, CategoryId};

use super::{choose, confirm, ActionResult, Spec};
use crate::console::Console;
use crate::report::Table;
use crate::session::Session;

/// `new category <categoryName>`
pub fn create<C: Console + 'static>() -> Spec<C> {
    Spec::new("category")
        .with_help("Add a spending category")
        .argument(Argument::new("categoryName", ArgKind::Text).required())
        .action(create_category)
}

/// `enter category [<category>]`
pub fn enter<C: Console + 'static>() -> Spec<C> {
    Spec::new("category")
        .with_help("Work inside a category; without a name, pick from a menu")
        .argument(Argument::new("category", ArgKind::Category))
        .action(enter_category)
}

/// `list categories`
pub fn list<C: Console + 'static>() -> Spec<C> {
    Spec::new("categories")
        .with_help("Show every category with its budget")
        .action(list_categories)
}

/// `rename category from <category>, to <text>`
pub fn rename<C: Console + 'static>() -> Spec<C> {
    Spec::new("category")
        .with_help("Rename a category")
        .argument(Argument::labeled("from", "from", ArgKind::Category).required())
        .argument(Argument::labeled("to", "to", ArgKind::Text).required())
        .action(rename_category)
}

/// `delete category <category>`
pub fn delete<C: Console + 'static>() -> Spec<C> {
    Spec::new("category")
        .with_help("Delete a category; its transactions become uncategorized")
        .argument(Argument::new("category", ArgKind::Category).required())
        .action(delete_category)
}

/// `budget set|clear|report`
pub fn budget<C: Console + 'static>() -> Spec<C> {
    Spec::new("budget")
        .with_help("Manage spending limits")
        .child(
            Spec::new("set")
                .with_help("Limit spending in a category per period")
                .argument(Argument::labeled("category", "category", ArgKind::Category).required())
                .argument(Argument::labeled("value", "value", ArgKind::Money).required())
                .argument(Argument::labeled("period", "period", ArgKind::Period).required())
                .action(set_budget),
        )
        .child(
            Spec::new("clear")
                .with_help("Remove the budget of a category")
                .argument(Argument::new("category", ArgKind::Category).required())
                .action(clear_budget),
        )
        .child(
            Spec::new("report")
                .with_help("Show spending against every budget for the period containing a date")
                .argument(Argument::new("date", ArgKind::Date))
                .action(report_budgets),
        )
}

fn create_category<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let name = args.text("categoryName")?;
    session.book_mut().add_category(&name)?;
    session.print(format!("Added category {name}"));
    Ok(Outcome::Done)
}

fn enter_category<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let id = match args.category_opt("category")? {
        Some(id) => id,
        None => {
            let categories: Vec<(CategoryId, String)> = session
                .book()
                .categories()
                .iter()
                .map(|c| (c.id, c.name.clone()))
                .collect();
            if categories.is_empty() {
                return Err(CommandError::Rejected(
                    "there are no categories yet; use `new category <name>`".to_string(),
                ));
            }
            let names: Vec<String> = categories.iter().map(|(_, name)| name.clone()).collect();
            match choose(session, "Enter which category?", &names)? {
                Some(index) => categories[index].0,
                None => return Ok(Outcome::Done),
            }
        }
    };
    Ok(Outcome::Enter(Context::Category(id)))
}

fn list_categories<C: Console>(session: &mut Session<C>, _: &Bindings) -> ActionResult {
    let book = session.book();
    if book.categories().is_empty() {
        session.print("No categories.");
        return Ok(Outcome::Done);
    }
    let mut table = Table::new(["category", "budget", "period"]);
    for category in book.categories() {
        match &category.budget {
            Some(budget) => table.row([
                category.name.clone(),
                budget.limit.to_string(),
                budget.period.to_string(),
            ]),
            None => table.row([category.name.clone()]),
        }
    }
    let text = table.render();
    session.print(text);
    Ok(Outcome::Done)
}

fn rename_category<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let id = args.category("from")?;
    let name = args.text("to")?;
    let old = session.book().category(id)?.name.clone();
    session.book_mut().rename_category(id, &name)?;
    session.print(format!("Renamed category {old} to {name}"));
    Ok(Outcome::Done)
}

fn delete_category<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let id = args.category("category")?;
    let name = session.book().category(id)?.name.clone();
    let used = session.book().categorized(id).count();
    let prompt = format!("Delete category {name}? {used} transaction(s) become uncategorized");
    if !confirm(session, &prompt) {
        session.print(format!("Kept category {name}"));
        return Ok(Outcome::Done);
    }

    session.book_mut().remove_category(id)?;
    tracing::info!(category = %name, "deleted category");
    session.print(format!("Deleted category {name}"));
    if session.current_category() == Some(id) {
        return Ok(Outcome::Enter(Context::Book));
    }
    Ok(Outcome::Done)
}

fn set_budget<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let id = args.category("category")?;
    let budget = Budget::new(args.money("value")?, args.period("period")?);
    let text = format!("{} {}", budget.limit, budget.period);
    session.book_mut().set_budget(id, budget)?;
    let name = session.book().category(id)?.name.clone();
    session.print(format!("Budget for {name}: {text}"));
    Ok(Outcome::Done)
}

fn clear_budget<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let id = args.category("category")?;
    let name = session.book().category(id)?.name.clone();
    match session.book_mut().clear_budget(id)? {
        Some(_) => session.print(format!("Cleared the budget of {name}")),
        None => session.print(format!("{name} has no budget")),
    }
    Ok(Outcome::Done)
}

fn report_budgets<C: Console>(session: &mut Session<C>, args: &Bindings) -> ActionResult {
    let book = session.book();
    let date = match args.date_opt("date")? {
        Some(date) => date,
        None => book.today(),
    };
    let only = session.current_category();

    let mut table = Table::new(["category", "period", "from", "limit", "spent", "remaining", ""]);
    for category in book.categories() {
        if only.is_some_and(|id| id != category.id) {
            continue;
        }
        let Some(status) = book.budget_status(category.id, date)? else {
            continue;
        };
        table.row([
            category.name.clone(),
            status.budget.period.to_string(),
            status.start.to_string(),
            status.budget.limit.to_string(),
            status.spent.to_string(),
            status.remaining.to_string(),
            if status.is_over() { "over".to_string() } else { String::new() },
        ]);
    }

    let text = if table.is_empty() {
        "No budgets.".to_string()
    } else {
        table.render()
    };
    session.print(text);
    Ok(Outcome::Done)
}
