//! The line dispatcher.

use std::rc::Rc;

use crate::error::CommandError;
use crate::tree::{CommandTree, Outcome};
use crate::ContextProvider;

/// Parses and runs one line at a time against a session state.
///
/// The tree is shared so that a line editor can complete from it while the
/// dispatcher is alive.
pub struct Dispatcher<S> {
    tree: Rc<CommandTree<S>>,
}

impl<S: ContextProvider> Dispatcher<S> {
    /// Dispatch against `tree`.
    pub fn new(tree: CommandTree<S>) -> Self {
        Self::shared(Rc::new(tree))
    }

    /// Dispatch against an already shared tree.
    pub const fn shared(tree: Rc<CommandTree<S>>) -> Self {
        Self { tree }
    }

    /// The command tree.
    pub const fn tree(&self) -> &Rc<CommandTree<S>> {
        &self.tree
    }

    /// Run `line`. Blank lines and `#` comments do nothing.
    ///
    /// When the action returns [`Outcome::Enter`], the state's context is
    /// replaced before returning.
    pub fn dispatch(&self, state: &mut S, line: &str) -> Result<Outcome, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::Done);
        }

        let result = self.run(state, line);
        match &result {
            Ok(outcome) => tracing::debug!(line, ?outcome, "dispatched"),
            Err(err) if err.is_defect() => tracing::error!(line, error = %err, "grammar defect"),
            Err(err) => tracing::debug!(line, error = %err, "rejected"),
        }
        result
    }

    fn run(&self, state: &mut S, line: &str) -> Result<Outcome, CommandError> {
        let invocation = self
            .tree
            .parse(line, state.context(), state.registry())?;
        let outcome = self.tree.invoke(&invocation, state)?;
        if let Outcome::Enter(context) = outcome {
            tracing::debug!(from = %state.context().kind(), to = %context.kind(), "context change");
            state.set_context(context);
        }
        Ok(outcome)
    }
}

impl<S> std::fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("tree", &self.tree).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bindings, CommandSpec, Context, ContextKind, Registry};
    use tally_core::Book;

    struct State {
        book: Book,
        context: Context,
        log: Vec<String>,
    }

    impl ContextProvider for State {
        fn context(&self) -> &Context {
            &self.context
        }
        fn set_context(&mut self, context: Context) {
            self.context = context;
        }
        fn registry(&self) -> &dyn Registry {
            &self.book
        }
    }

    fn dispatcher() -> Dispatcher<State> {
        let tree = CommandTree::build(vec![
            CommandSpec::new("open").action(|state: &mut State, _: &Bindings| {
                let id = state.book.open_account("Checking")?;
                Ok(Outcome::Enter(Context::Account(id)))
            }),
            CommandSpec::new("leave")
                .context(ContextKind::Account)
                .action(|_: &mut State, _: &Bindings| Ok(Outcome::Enter(Context::Book))),
            CommandSpec::new("fail").action(|state: &mut State, _: &Bindings| {
                state.log.push("fail".to_string());
                Err(CommandError::Rejected("nope".to_string()))
            }),
        ])
        .unwrap();
        Dispatcher::new(tree)
    }

    #[test]
    fn test_enter_changes_context() {
        let dispatcher = dispatcher();
        let mut state = State {
            book: Book::new("Test", "USD"),
            context: Context::Book,
            log: Vec::new(),
        };

        assert!(dispatcher.dispatch(&mut state, "leave").is_err());
        dispatcher.dispatch(&mut state, "open").unwrap();
        assert_eq!(state.context.kind(), ContextKind::Account);
        dispatcher.dispatch(&mut state, "LEAVE").unwrap();
        assert_eq!(state.context, Context::Book);
    }

    #[test]
    fn test_failed_action_keeps_context() {
        let dispatcher = dispatcher();
        let mut state = State {
            book: Book::new("Test", "USD"),
            context: Context::Book,
            log: Vec::new(),
        };
        dispatcher.dispatch(&mut state, "open").unwrap();
        let before = state.context;

        assert!(dispatcher.dispatch(&mut state, "open").is_err());
        assert!(dispatcher.dispatch(&mut state, "fail").is_err());
        assert_eq!(state.context, before);
        assert_eq!(state.log, ["fail"]);
    }

    #[test]
    fn test_blank_and_comment_lines() {
        let dispatcher = dispatcher();
        let mut state = State {
            book: Book::new("Test", "USD"),
            context: Context::Book,
            log: Vec::new(),
        };
        assert!(matches!(dispatcher.dispatch(&mut state, "   "), Ok(Outcome::Done)));
        assert!(matches!(dispatcher.dispatch(&mut state, "# fail"), Ok(Outcome::Done)));
        assert!(state.log.is_empty());
    }
}
