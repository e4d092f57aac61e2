//! Recursive descent over a command line.
//!
//! The descent walks the remaining suffix of the line. At each node it tries
//! the subcommands first, then binds the node's own argument segment (up to
//! the first unquoted `;`) and tries the subcommands again on what is left.
//! Nothing is applied to the caller's state: the result is an [`Invocation`]
//! that [`CommandTree::invoke`] runs afterwards.

use crate::error::{CommandError, GrammarError};
use crate::tokenize::{
    first_token, same_token, split_quoted, split_terminator, strip_token, ARGUMENT_SEPARATOR,
    QUOTE,
};
use crate::tree::{CommandTree, Node, NodeId};
use crate::{Argument, Bindings, Context, Registry};

/// A fully parsed command line, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub(crate) node: NodeId,
    path: String,
    pub(crate) bindings: Bindings,
}

impl Invocation {
    /// The command the line ended at.
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Path of that command.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Every value bound along the path.
    pub const fn bindings(&self) -> &Bindings {
        &self.bindings
    }
}

impl<S> CommandTree<S> {
    /// Parse `line` against the tree in the given context.
    ///
    /// # Example
    ///
    /// ```
    /// use tally_command::{ArgKind, Argument, CommandSpec, CommandTree, Context, Outcome};
    /// use tally_core::Book;
    ///
    /// let tree: CommandTree<()> = CommandTree::build(vec![CommandSpec::new("new").child(
    ///     CommandSpec::new("account")
    ///         .argument(Argument::new("accountName", ArgKind::Text).required())
    ///         .action(|_, _| Ok(Outcome::Done)),
    /// )])
    /// .unwrap();
    ///
    /// let book = Book::new("Household", "USD");
    /// let invocation = tree.parse("new account Groceries", &Context::Book, &book).unwrap();
    /// assert_eq!(invocation.path(), "new account");
    /// assert_eq!(invocation.bindings().text("accountName").unwrap(), "Groceries");
    /// ```
    pub fn parse(
        &self,
        line: &str,
        context: &Context,
        registry: &dyn Registry,
    ) -> Result<Invocation, CommandError> {
        let line = line.trim();
        let token = first_token(line);
        let root = self
            .match_token("", self.roots(), token)?
            .ok_or_else(|| CommandError::CommandNotFound {
                path: String::new(),
                token: token.to_string(),
            })?;

        let mut bindings = Bindings::new();
        let node = self.descend(root, strip_token(line), context, registry, &mut bindings)?;
        let path = self.node(node).path().to_string();
        tracing::trace!(command = %path, ?bindings, "parsed");
        Ok(Invocation {
            node,
            path,
            bindings,
        })
    }

    fn descend(
        &self,
        id: NodeId,
        rest: &str,
        context: &Context,
        registry: &dyn Registry,
        bindings: &mut Bindings,
    ) -> Result<NodeId, CommandError> {
        let node = self.node(id);
        if !node.accepts(context.kind()) {
            return Err(CommandError::ContextMismatch {
                path: node.path().to_string(),
                expected: node.contexts().to_vec(),
                actual: context.kind(),
            });
        }

        let rest = rest.trim();
        if let Some(child) = self.match_token(node.path(), node.children(), first_token(rest))? {
            return self.descend(child, strip_token(rest), context, registry, bindings);
        }

        let (segment, remainder) = split_terminator(rest);
        bind(node, &segment, registry, bindings)?;

        let remainder = remainder.as_deref().map_or("", str::trim);
        if remainder.is_empty() {
            return self.finish(id, bindings);
        }
        let token = first_token(remainder);
        match self.match_token(node.path(), node.children(), token)? {
            Some(child) => self.descend(child, strip_token(remainder), context, registry, bindings),
            None => Err(CommandError::CommandNotFound {
                path: node.path().to_string(),
                token: token.to_string(),
            }),
        }
    }

    fn finish(&self, id: NodeId, bindings: &Bindings) -> Result<NodeId, CommandError> {
        let node = self.node(id);
        if !node.has_action() {
            return Err(CommandError::IncompleteCommand {
                path: node.path().to_string(),
                expected: self.child_tokens(id),
            });
        }
        if let Some(missing) = node.required().iter().find(|req| !bindings.contains(req)) {
            return Err(CommandError::MissingArgument {
                path: node.path().to_string(),
                id: missing.clone(),
            });
        }
        Ok(id)
    }

    /// The unique candidate whose token equals `token`.
    fn match_token(
        &self,
        path: &str,
        candidates: &[NodeId],
        token: &str,
    ) -> Result<Option<NodeId>, GrammarError> {
        if token.is_empty() {
            return Ok(None);
        }
        let mut matching = candidates
            .iter()
            .filter(|id| same_token(self.node(**id).token(), token));
        match (matching.next(), matching.next()) {
            (None, _) => Ok(None),
            (Some(id), None) => Ok(Some(*id)),
            (Some(_), Some(_)) => Err(GrammarError::AmbiguousToken {
                path: path.to_string(),
                token: token.to_string(),
            }),
        }
    }
}

/// Bind one argument segment to the slots of `node`.
fn bind<S>(
    node: &Node<S>,
    segment: &str,
    registry: &dyn Registry,
    bindings: &mut Bindings,
) -> Result<(), CommandError> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Ok(());
    }

    let mut local = Bindings::new();
    match node.arguments() {
        [] => {
            return Err(CommandError::CommandNotFound {
                path: node.path().to_string(),
                token: first_token(segment).to_string(),
            });
        }
        [only] if only.label().is_none() => {
            local.add(only.id(), only.parse(segment, registry)?)?;
        }
        slots => {
            let mut pool: Vec<&Argument> = slots.iter().collect();
            for piece in split_quoted(segment, ARGUMENT_SEPARATOR, QUOTE) {
                let piece = piece.trim();
                if piece.is_empty() {
                    continue;
                }
                let (index, slot) = match_slot(node, &pool, piece)?;
                local.add(slot.id(), slot.parse(piece, registry)?)?;
                pool.remove(index);
            }
        }
    }

    tracing::trace!(command = %node.path(), bound = local.len(), "bound segment");
    bindings.merge(local)?;
    Ok(())
}

fn match_slot<'a, S>(
    node: &Node<S>,
    pool: &[&'a Argument],
    piece: &str,
) -> Result<(usize, &'a Argument), CommandError> {
    let mut matching = pool
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.matches(piece));
    match (matching.next(), matching.next()) {
        (Some((index, slot)), None) => Ok((index, *slot)),
        (None, _) => Err(CommandError::ArgumentNotFound {
            path: node.path().to_string(),
            token: first_token(piece).to_string(),
        }),
        (Some(_), Some(_)) => Err(GrammarError::AmbiguousArgument {
            path: node.path().to_string(),
            piece: piece.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArgKind, CommandSpec, ContextKind, Outcome};
    use tally_core::Book;

    fn done(_: &mut (), _: &Bindings) -> Result<Outcome, CommandError> {
        Ok(Outcome::Done)
    }

    fn tree() -> CommandTree<()> {
        CommandTree::build(vec![
            CommandSpec::new("list")
                .argument(Argument::labeled("from", "from", ArgKind::Date))
                .argument(Argument::labeled("to", "to", ArgKind::Date))
                .child(CommandSpec::new("export").action(done))
                .action(done),
            CommandSpec::new("note")
                .context(ContextKind::Account)
                .argument(Argument::new("text", ArgKind::Text).required())
                .action(done),
        ])
        .unwrap()
    }

    #[test]
    fn test_arguments_then_subcommand() {
        let book = Book::new("Test", "USD");
        let tree = tree();
        let inv = tree
            .parse("list from 2024-01-01; export", &Context::Book, &book)
            .unwrap();
        assert_eq!(inv.path(), "list export");
        assert_eq!(inv.bindings().len(), 1);
        assert!(inv.bindings().contains("from"));
    }

    #[test]
    fn test_trailing_terminator_ends_line() {
        let book = Book::new("Test", "USD");
        let inv = tree()
            .parse("list to 2024-02-01;", &Context::Book, &book)
            .unwrap();
        assert_eq!(inv.path(), "list");
    }

    #[test]
    fn test_unknown_token_after_terminator() {
        let book = Book::new("Test", "USD");
        let err = tree()
            .parse("list; import", &Context::Book, &book)
            .unwrap_err();
        assert_eq!(err.to_string(), "list: unknown subcommand or argument \"import\"");
    }

    #[test]
    fn test_inherited_requirement_must_be_bound() {
        let book = Book::new("Test", "USD");
        let tree: CommandTree<()> = CommandTree::build(vec![CommandSpec::new("list")
            .argument(Argument::labeled("from", "from", ArgKind::Date))
            .argument(Argument::labeled("to", "to", ArgKind::Date))
            .requires("from")
            .child(CommandSpec::new("export").action(done))
            .action(done)])
        .unwrap();

        let err = tree.parse("list export", &Context::Book, &book).unwrap_err();
        assert!(matches!(
            err,
            CommandError::MissingArgument { ref path, ref id } if path == "list export" && id == "from"
        ));
        assert_eq!(
            err.to_string(),
            "list export: missing required argument from"
        );

        let err = tree
            .parse("list to 2024-02-01; export", &Context::Book, &book)
            .unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument { ref id, .. } if id == "from"));

        let inv = tree
            .parse("list from 2024-01-01; export", &Context::Book, &book)
            .unwrap();
        assert_eq!(inv.path(), "list export");
    }

    #[test]
    fn test_label_bound_once() {
        let book = Book::new("Test", "USD");
        let err = tree()
            .parse("list from 2024-01-01, from 2024-02-01", &Context::Book, &book)
            .unwrap_err();
        assert!(matches!(err, CommandError::ArgumentNotFound { ref token, .. } if token == "from"));
    }

    #[test]
    fn test_unquoted_separator_inside_text() {
        let mut book = Book::new("Test", "USD");
        let id = book.open_account("Checking").unwrap();
        let inv = tree()
            .parse("note Rent, March", &Context::Account(id), &book)
            .unwrap();
        assert_eq!(inv.bindings().text("text").unwrap(), "Rent, March");
    }

    #[test]
    fn test_ambiguous_slots_are_defects() {
        let tree: CommandTree<()> = CommandTree::build(vec![CommandSpec::new("pay")
            .argument(Argument::labeled("a", "to", ArgKind::Text))
            .argument(Argument::labeled("b", "from", ArgKind::Text))
            .action(done)])
        .unwrap();
        // Hand-built pool with two slots sharing a label.
        let node = tree.node(tree.roots()[0]);
        let twin = Argument::labeled("c", "to", ArgKind::Text);
        let pool = vec![&node.arguments()[0], &twin];
        let err = match_slot(node, &pool, "to x").unwrap_err();
        assert!(err.is_defect());
    }
}
