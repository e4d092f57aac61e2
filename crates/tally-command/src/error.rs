//! Interpreter error types.
//!
//! Two taxonomies are kept apart. [`GrammarError`] reports a malformed command
//! tree, which is a programming defect; every other [`CommandError`] variant is
//! a problem with the user's input and is recoverable.

use thiserror::Error;

use crate::{ArgKind, ContextKind};
use tally_core::BookError;

/// A structural defect of the command tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A match token is empty or contains whitespace.
    #[error("command {path}: token \"{token}\" must be a single word")]
    EmptyToken {
        /// Path of the parent command.
        path: String,
        /// The offending token.
        token: String,
    },
    /// Two siblings share a match token.
    #[error("command {path}: duplicate subcommand \"{token}\"")]
    DuplicateToken {
        /// Path of the parent command.
        path: String,
        /// The repeated token.
        token: String,
    },
    /// A command without subcommands has no action (invariant A).
    #[error("command {path} has neither subcommands nor an action")]
    MissingAction {
        /// Path of the command.
        path: String,
    },
    /// A command with several arguments has an unlabeled one (invariant B).
    #[error("command {path}: argument {id} needs a label because the command takes several arguments")]
    UnlabeledArgument {
        /// Path of the command.
        path: String,
        /// The unlabeled argument.
        id: String,
    },
    /// An argument identifier is declared twice on one path.
    #[error("command {path}: argument {id} is declared more than once")]
    DuplicateArgument {
        /// Path of the command.
        path: String,
        /// The repeated identifier.
        id: String,
    },
    /// Two arguments of one command share a label.
    #[error("command {path}: label \"{label}\" is used by more than one argument")]
    DuplicateLabel {
        /// Path of the command.
        path: String,
        /// The repeated label.
        label: String,
    },
    /// A required identifier names no argument on the command's path.
    #[error("command {path} requires argument {id}, which is never declared")]
    UnknownRequirement {
        /// Path of the command.
        path: String,
        /// The required identifier.
        id: String,
    },
    /// More than one command matched a token while parsing.
    #[error("command {path}: \"{token}\" matches more than one subcommand")]
    AmbiguousToken {
        /// Path of the parent command.
        path: String,
        /// The ambiguous token.
        token: String,
    },
    /// More than one argument matched a piece while parsing.
    #[error("command {path}: \"{piece}\" matches more than one argument")]
    AmbiguousArgument {
        /// Path of the command.
        path: String,
        /// The ambiguous piece.
        piece: String,
    },
    /// An identifier was bound twice.
    #[error("argument {id} is bound twice")]
    DuplicateBinding {
        /// The identifier.
        id: String,
    },
    /// An action read an identifier that was never bound.
    #[error("argument {id} is not bound")]
    MissingBinding {
        /// The identifier.
        id: String,
    },
    /// An action read a binding as the wrong kind.
    #[error("argument {id} is a {found}, not a {expected}")]
    BindingKind {
        /// The identifier.
        id: String,
        /// Kind the action asked for.
        expected: ArgKind,
        /// Kind that was bound.
        found: ArgKind,
    },
}

/// Every defect found while building a command tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command tree has {} defect(s): {}", .0.len(), join(.0, "; "))]
pub struct GrammarDefects(pub Vec<GrammarError>);

impl GrammarDefects {
    /// The individual defects.
    #[must_use]
    pub fn defects(&self) -> &[GrammarError] {
        &self.0
    }
}

/// Error returned when a piece of text cannot be bound to an argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The argument was given without a value.
    #[error("missing value for {id}")]
    Empty {
        /// The argument identifier.
        id: String,
        /// Kind expected.
        kind: ArgKind,
    },
    /// The text is not a valid value of the argument's kind.
    #[error("invalid {kind} for {id}: \"{text}\"")]
    Invalid {
        /// The argument identifier.
        id: String,
        /// Kind expected.
        kind: ArgKind,
        /// The offending text.
        text: String,
    },
    /// A referenced account or category does not exist.
    #[error("{kind} \"{name}\" not found (argument {id})")]
    NotFound {
        /// The argument identifier.
        id: String,
        /// Kind of reference.
        kind: ArgKind,
        /// The name searched for.
        name: String,
    },
}

/// Error returned when a command line cannot be run.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No command or subcommand matches the token.
    #[error("{}", not_found(.path, .token))]
    CommandNotFound {
        /// Path of the command reached so far (empty at the root).
        path: String,
        /// The unmatched token.
        token: String,
    },
    /// No argument of the command matches the piece.
    #[error("{path} has no argument \"{token}\"")]
    ArgumentNotFound {
        /// Path of the command.
        path: String,
        /// Leading token of the unmatched piece.
        token: String,
    },
    /// An argument value could not be parsed.
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    /// A required argument was not supplied.
    #[error("{path}: missing required argument {id}")]
    MissingArgument {
        /// Path of the command.
        path: String,
        /// The missing identifier.
        id: String,
    },
    /// The line ended at a command that needs a subcommand.
    #[error("incomplete command \"{path}\", expected one of: {}", .expected.join(", "))]
    IncompleteCommand {
        /// Path of the command.
        path: String,
        /// Tokens of its subcommands.
        expected: Vec<String>,
    },
    /// The command is not available in the current context.
    #[error("{path} can only be used in {} context (current context: {actual})", join(.expected, " or "))]
    ContextMismatch {
        /// Path of the command.
        path: String,
        /// Contexts the command accepts.
        expected: Vec<ContextKind>,
        /// The current context.
        actual: ContextKind,
    },
    /// The action refused to run.
    #[error("{0}")]
    Rejected(String),
    /// The book refused the operation.
    #[error(transparent)]
    Domain(#[from] BookError),
    /// The command tree is malformed.
    #[error("internal grammar error: {0}")]
    Grammar(#[from] GrammarError),
}

impl CommandError {
    /// Whether this error reveals a defect in the command tree rather than
    /// a mistake in the input.
    #[must_use]
    pub const fn is_defect(&self) -> bool {
        matches!(self, Self::Grammar(_))
    }
}

fn not_found(path: &str, token: &str) -> String {
    if path.is_empty() {
        format!("unknown command \"{token}\"")
    } else {
        format!("{path}: unknown subcommand or argument \"{token}\"")
    }
}

fn join<T: std::fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
