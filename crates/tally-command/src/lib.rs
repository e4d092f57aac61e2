//! Command-path interpreter for the tally console.
//!
//! A console line such as
//!
//! ```text
//! transfer from Checking, to Savings, value 250, note "Rent, March"
//! ```
//!
//! is a path of command tokens (`transfer`) followed by an argument segment of
//! labeled, comma-separated pieces. This crate provides:
//!
//! - [`tokenize`] - quote-aware splitting on `,` and `;`
//! - [`Argument`] - typed argument slots producing [`Value`]s
//! - [`Bindings`] - the values collected along one path
//! - [`CommandTree`] - a validated arena of commands built from [`CommandSpec`]s
//! - [`Dispatcher`] - runs lines against a [`ContextProvider`]
//! - [`usage()`] and [`CompletionIndex`] - help and tab completion
//!
//! # Example
//!
//! ```
//! use tally_command::{ArgKind, Argument, CommandSpec, CommandTree, Context, Outcome};
//! use tally_core::Book;
//!
//! struct Session {
//!     book: Book,
//!     context: Context,
//! }
//!
//! impl tally_command::ContextProvider for Session {
//!     fn context(&self) -> &Context {
//!         &self.context
//!     }
//!     fn set_context(&mut self, context: Context) {
//!         self.context = context;
//!     }
//!     fn registry(&self) -> &dyn tally_command::Registry {
//!         &self.book
//!     }
//! }
//!
//! let tree = CommandTree::build(vec![CommandSpec::new("new").child(
//!     CommandSpec::new("account")
//!         .argument(Argument::new("accountName", ArgKind::Text).required())
//!         .action(|session: &mut Session, args: &tally_command::Bindings| {
//!             session.book.open_account(&args.text("accountName")?)?;
//!             Ok(Outcome::Done)
//!         }),
//! )])
//! .unwrap();
//!
//! let dispatcher = tally_command::Dispatcher::new(tree);
//! let mut session = Session { book: Book::new("Household", "USD"), context: Context::Book };
//! dispatcher.dispatch(&mut session, "new account Groceries").unwrap();
//! assert!(session.book.find_account("groceries").is_some());
//! assert!(dispatcher.dispatch(&mut session, "new accountx").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod argument;
pub mod binding;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod interpret;
pub mod tokenize;
pub mod tree;
pub mod usage;

pub use argument::{ArgKind, Argument};
pub use binding::{Bindings, Value};
pub use context::{Context, ContextKind, ContextProvider, Registry};
pub use dispatch::Dispatcher;
pub use error::{ArgumentError, CommandError, GrammarDefects, GrammarError};
pub use interpret::Invocation;
pub use tree::{Action, CommandSpec, CommandTree, Node, NodeId, Outcome};
pub use usage::{usage, CompletionIndex, Usage};
