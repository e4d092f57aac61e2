//! The command tree.
//!
//! Commands are declared as nested [`CommandSpec`] values and compiled once by
//! [`CommandTree::build`], which flattens them into an arena of [`Node`]s and
//! rejects every structural defect up front. The compiled tree is immutable.

use std::collections::HashSet;
use std::fmt;

use crate::error::{CommandError, GrammarDefects, GrammarError};
use crate::{Argument, Bindings, Context, ContextKind};

/// What an action asks the dispatch loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing further.
    Done,
    /// Switch the console to the given context.
    Enter(Context),
    /// Stop reading input.
    Exit,
}

/// The effect run when a command line ends at a node.
pub type Action<S> = Box<dyn Fn(&mut S, &Bindings) -> Result<Outcome, CommandError>>;

/// Declarative description of one command and its subcommands.
pub struct CommandSpec<S> {
    token: String,
    help: Option<String>,
    arguments: Vec<Argument>,
    children: Vec<CommandSpec<S>>,
    contexts: Vec<ContextKind>,
    requires: Vec<String>,
    action: Option<Action<S>>,
}

impl<S> CommandSpec<S> {
    /// A command matched by `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            help: None,
            arguments: Vec::new(),
            children: Vec::new(),
            contexts: Vec::new(),
            requires: Vec::new(),
            action: None,
        }
    }

    /// One-line description shown by `help`.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Declare an argument slot.
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Declare a subcommand.
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Restrict the command to a context kind. May be repeated; no call means
    /// any context.
    pub fn context(mut self, kind: ContextKind) -> Self {
        self.contexts.push(kind);
        self
    }

    /// Require an argument declared here or on an ancestor.
    pub fn requires(mut self, id: impl Into<String>) -> Self {
        self.requires.push(id.into());
        self
    }

    /// Set the action run when a line ends at this command.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut S, &Bindings) -> Result<Outcome, CommandError> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }
}

impl<S> fmt::Debug for CommandSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("token", &self.token)
            .field("arguments", &self.arguments)
            .field("children", &self.children)
            .field("contexts", &self.contexts)
            .field("requires", &self.requires)
            .field("action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

/// Index of a node in its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A compiled command.
pub struct Node<S> {
    token: String,
    path: String,
    help: Option<String>,
    arguments: Vec<Argument>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    contexts: Vec<ContextKind>,
    required: Vec<String>,
    action: Option<Action<S>>,
}

impl<S> Node<S> {
    /// The match token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Space-separated tokens from the root to this node.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Help text.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Argument slots in declaration order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Subcommands in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The parent command, `None` for roots.
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Context kinds the command is limited to; empty means all.
    pub fn contexts(&self) -> &[ContextKind] {
        &self.contexts
    }

    /// Whether the command can be used in a context of `kind`.
    pub fn accepts(&self, kind: ContextKind) -> bool {
        self.contexts.is_empty() || self.contexts.contains(&kind)
    }

    /// Identifiers that must be bound when a line ends here, including those
    /// inherited from ancestors.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Whether the command can end a line.
    pub const fn has_action(&self) -> bool {
        self.action.is_some()
    }
}

impl<S> fmt::Debug for Node<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("path", &self.path)
            .field("arguments", &self.arguments)
            .field("children", &self.children)
            .field("contexts", &self.contexts)
            .field("required", &self.required)
            .field("action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

/// A validated, immutable command tree.
pub struct CommandTree<S> {
    nodes: Vec<Node<S>>,
    roots: Vec<NodeId>,
}

/// Accumulated state while flattening one root-to-node path.
struct Scope<'a> {
    parent: Option<NodeId>,
    path: &'a str,
    declared: &'a HashSet<String>,
    required: &'a [String],
}

impl<S> CommandTree<S> {
    /// Compile `roots` into a tree, collecting every structural defect.
    pub fn build(roots: Vec<CommandSpec<S>>) -> Result<Self, GrammarDefects> {
        let mut tree = Self {
            nodes: Vec::new(),
            roots: Vec::new(),
        };
        let mut defects = Vec::new();

        check_siblings("", &roots, &mut defects);
        let declared = HashSet::new();
        let scope = Scope {
            parent: None,
            path: "",
            declared: &declared,
            required: &[],
        };
        for spec in roots {
            let id = tree.insert(spec, &scope, &mut defects);
            tree.roots.push(id);
        }

        if defects.is_empty() {
            tracing::debug!(nodes = tree.nodes.len(), "built command tree");
            Ok(tree)
        } else {
            Err(GrammarDefects(defects))
        }
    }

    fn insert(
        &mut self,
        spec: CommandSpec<S>,
        scope: &Scope<'_>,
        defects: &mut Vec<GrammarError>,
    ) -> NodeId {
        let CommandSpec {
            token,
            help,
            arguments,
            children,
            contexts,
            requires,
            action,
        } = spec;
        let path = if scope.path.is_empty() {
            token.clone()
        } else {
            format!("{} {token}", scope.path)
        };

        if children.is_empty() && action.is_none() {
            defects.push(GrammarError::MissingAction { path: path.clone() });
        }
        if arguments.len() > 1 {
            for argument in arguments.iter().filter(|a| a.label().is_none()) {
                defects.push(GrammarError::UnlabeledArgument {
                    path: path.clone(),
                    id: argument.id().to_string(),
                });
            }
        }

        let mut declared = scope.declared.clone();
        let mut labels = HashSet::new();
        for argument in &arguments {
            if !declared.insert(argument.id().to_string()) {
                defects.push(GrammarError::DuplicateArgument {
                    path: path.clone(),
                    id: argument.id().to_string(),
                });
            }
            if let Some(label) = argument.label() {
                if !labels.insert(label.to_lowercase()) {
                    defects.push(GrammarError::DuplicateLabel {
                        path: path.clone(),
                        label: label.to_string(),
                    });
                }
            }
        }

        let mut required = scope.required.to_vec();
        let own = arguments
            .iter()
            .filter(|a| a.is_required())
            .map(|a| a.id().to_string())
            .chain(requires);
        for id in own {
            if !required.contains(&id) {
                required.push(id);
            }
        }
        if action.is_some() {
            for id in required.iter().filter(|id| !declared.contains(*id)) {
                defects.push(GrammarError::UnknownRequirement {
                    path: path.clone(),
                    id: id.clone(),
                });
            }
        }

        check_siblings(&path, &children, defects);

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            token,
            path,
            help,
            arguments,
            children: Vec::new(),
            parent: scope.parent,
            contexts,
            required,
            action,
        });

        let node = &self.nodes[id.0];
        let path = node.path.clone();
        let required = node.required.clone();
        let inner = Scope {
            parent: Some(id),
            path: &path,
            declared: &declared,
            required: &required,
        };
        let children: Vec<NodeId> = children
            .into_iter()
            .map(|child| self.insert(child, &inner, defects))
            .collect();
        self.nodes[id.0].children = children;
        id
    }

    /// Root commands in declaration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The node with the given id.
    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// Every node, parents before their children.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<S>)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Look a node up by its space-separated path, ignoring case.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut candidates = &self.roots[..];
        let mut found = None;
        for token in path.split_whitespace() {
            let id = *candidates
                .iter()
                .find(|id| crate::tokenize::same_token(self.node(**id).token(), token))?;
            candidates = self.node(id).children();
            found = Some(id);
        }
        found
    }

    /// Run the action of a parsed invocation against `state`.
    pub fn invoke(&self, invocation: &crate::Invocation, state: &mut S) -> Result<Outcome, CommandError> {
        let node = self.node(invocation.node);
        let action = node.action.as_ref().ok_or_else(|| CommandError::IncompleteCommand {
            path: node.path.clone(),
            expected: self.child_tokens(invocation.node),
        })?;
        tracing::debug!(command = %node.path, bindings = invocation.bindings.len(), "invoking");
        action(state, &invocation.bindings)
    }

    pub(crate) fn child_tokens(&self, id: NodeId) -> Vec<String> {
        self.node(id)
            .children
            .iter()
            .map(|child| self.node(*child).token.clone())
            .collect()
    }
}

impl<S> fmt::Debug for CommandTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("nodes", &self.nodes)
            .field("roots", &self.roots)
            .finish()
    }
}

fn check_siblings<S>(path: &str, siblings: &[CommandSpec<S>], defects: &mut Vec<GrammarError>) {
    let mut seen = HashSet::new();
    for spec in siblings {
        if spec.token.is_empty() || spec.token.contains(char::is_whitespace) {
            defects.push(GrammarError::EmptyToken {
                path: path.to_string(),
                token: spec.token.clone(),
            });
        } else if !seen.insert(spec.token.to_lowercase()) {
            defects.push(GrammarError::DuplicateToken {
                path: path.to_string(),
                token: spec.token.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgKind;

    fn done(_: &mut (), _: &Bindings) -> Result<Outcome, CommandError> {
        Ok(Outcome::Done)
    }

    #[test]
    fn test_build_flattens_paths() {
        let tree = CommandTree::build(vec![CommandSpec::new("new")
            .child(
                CommandSpec::new("account")
                    .argument(Argument::new("accountName", ArgKind::Text).required())
                    .action(done),
            )
            .child(CommandSpec::new("category").action(done))])
        .unwrap();

        let account = tree.find("NEW Account").unwrap();
        let node = tree.node(account);
        assert_eq!(node.path(), "new account");
        assert_eq!(node.required(), ["accountName"]);
        assert_eq!(tree.node(node.parent().unwrap()).token(), "new");
        assert_eq!(tree.child_tokens(tree.roots()[0]), ["account", "category"]);
        assert!(tree.find("new transfer").is_none());
    }

    #[test]
    fn test_required_is_inherited() {
        let tree = CommandTree::build(vec![CommandSpec::new("list")
            .argument(Argument::labeled("from", "from", ArgKind::Date))
            .argument(Argument::labeled("to", "to", ArgKind::Date))
            .requires("from")
            .child(CommandSpec::new("export").requires("to").action(done))
            .action(done)])
        .unwrap();

        let export = tree.node(tree.find("list export").unwrap());
        assert_eq!(export.required(), ["from", "to"]);
    }

    #[test]
    fn test_all_defects_are_collected() {
        let err = CommandTree::build(vec![
            CommandSpec::new("new").child(CommandSpec::new("account")),
            CommandSpec::new("New").action(done),
            CommandSpec::new("two words").action(done),
            CommandSpec::new("pay")
                .argument(Argument::new("a", ArgKind::Money))
                .argument(Argument::labeled("b", "to", ArgKind::Account))
                .argument(Argument::labeled("c", "TO", ArgKind::Account))
                .requires("z")
                .action(done),
        ])
        .unwrap_err();

        assert_eq!(
            err.defects(),
            [
                GrammarError::DuplicateToken {
                    path: String::new(),
                    token: "New".to_string()
                },
                GrammarError::EmptyToken {
                    path: String::new(),
                    token: "two words".to_string()
                },
                GrammarError::MissingAction {
                    path: "new account".to_string()
                },
                GrammarError::UnlabeledArgument {
                    path: "pay".to_string(),
                    id: "a".to_string()
                },
                GrammarError::DuplicateLabel {
                    path: "pay".to_string(),
                    label: "TO".to_string()
                },
                GrammarError::UnknownRequirement {
                    path: "pay".to_string(),
                    id: "z".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_argument_along_path() {
        let err = CommandTree::build(vec![CommandSpec::new("list")
            .argument(Argument::labeled("from", "from", ArgKind::Date))
            .child(
                CommandSpec::new("export")
                    .argument(Argument::labeled("from", "since", ArgKind::Date))
                    .action(done),
            )
            .action(done)])
        .unwrap_err();

        assert_eq!(
            err.defects(),
            [GrammarError::DuplicateArgument {
                path: "list export".to_string(),
                id: "from".to_string()
            }]
        );
    }
}
