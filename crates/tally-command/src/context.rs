//! The console context and the collaborators the interpreter reads from.

use chrono::NaiveDate;
use std::fmt;
use tally_core::{AccountId, Book, CategoryId};

/// The entity the console is currently "inside".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Context {
    /// The top-level book
    #[default]
    Book,
    /// An account of the book
    Account(AccountId),
    /// A category of the book
    Category(CategoryId),
}

impl Context {
    /// The variant of this context, without its payload.
    #[must_use]
    pub const fn kind(&self) -> ContextKind {
        match self {
            Self::Book => ContextKind::Book,
            Self::Account(_) => ContextKind::Account,
            Self::Category(_) => ContextKind::Category,
        }
    }
}

/// Field-less tag of a [`Context`], used by commands to declare where they apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// See [`Context::Book`]
    Book,
    /// See [`Context::Account`]
    Account,
    /// See [`Context::Category`]
    Category,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Book => "book",
            Self::Account => "account",
            Self::Category => "category",
        })
    }
}

/// Live name lookups and defaults used while parsing arguments.
pub trait Registry {
    /// Resolve an account name, ignoring case.
    fn find_account(&self, name: &str) -> Option<AccountId>;

    /// Resolve a category name, ignoring case.
    fn find_category(&self, name: &str) -> Option<CategoryId>;

    /// Names of all accounts.
    fn account_names(&self) -> Vec<String>;

    /// Names of all categories.
    fn category_names(&self) -> Vec<String>;

    /// Currency for amounts typed without one.
    fn default_currency(&self) -> &str;

    /// The date `today` refers to.
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

impl Registry for Book {
    fn find_account(&self, name: &str) -> Option<AccountId> {
        Self::find_account(self, name)
    }

    fn find_category(&self, name: &str) -> Option<CategoryId> {
        Self::find_category(self, name)
    }

    fn account_names(&self) -> Vec<String> {
        self.accounts().iter().map(|a| a.name.clone()).collect()
    }

    fn category_names(&self) -> Vec<String> {
        self.categories().iter().map(|c| c.name.clone()).collect()
    }

    fn default_currency(&self) -> &str {
        &self.currency
    }
}

/// State owned by the dispatch loop: the current context and the registry.
pub trait ContextProvider {
    /// The context commands are checked against.
    fn context(&self) -> &Context;

    /// Replace the current context.
    fn set_context(&mut self, context: Context);

    /// Name lookups for reference arguments.
    fn registry(&self) -> &dyn Registry;
}
