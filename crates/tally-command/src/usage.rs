//! Help text and tab completion derived from a command tree.

use crate::tokenize::{same_token, QUOTE};
use crate::tree::{CommandTree, NodeId};
use crate::{ArgKind, ContextKind};

/// Synopsis of one runnable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    /// Command path, e.g. `new account`.
    pub path: String,
    /// Path followed by its arguments, e.g. `new account <accountName>`.
    pub synopsis: String,
    /// Help text of the command.
    pub help: Option<String>,
}

/// One [`Usage`] per command that has an action, in declaration order.
///
/// With `context`, commands unavailable in that context (or below an
/// unavailable ancestor) are left out.
pub fn usage<S>(tree: &CommandTree<S>, context: Option<ContextKind>) -> Vec<Usage> {
    let mut out = Vec::new();
    for root in tree.roots() {
        collect(tree, *root, context, &mut out);
    }
    out
}

fn collect<S>(
    tree: &CommandTree<S>,
    id: NodeId,
    context: Option<ContextKind>,
    out: &mut Vec<Usage>,
) {
    let node = tree.node(id);
    if context.is_some_and(|kind| !node.accepts(kind)) {
        return;
    }
    if node.has_action() {
        out.push(Usage {
            path: node.path().to_string(),
            synopsis: synopsis(tree, id),
            help: node.help().map(str::to_string),
        });
    }
    for child in node.children() {
        collect(tree, *child, context, out);
    }
}

/// Render the tokens and arguments from the root to `id`.
///
/// Required arguments are written bare, optional ones in brackets. Arguments
/// of an ancestor are closed with `;` before the next token.
pub fn synopsis<S>(tree: &CommandTree<S>, id: NodeId) -> String {
    let mut chain = vec![id];
    let mut cursor = id;
    while let Some(parent) = tree.node(cursor).parent() {
        chain.push(parent);
        cursor = parent;
    }
    chain.reverse();

    let required = tree.node(id).required();
    let mut parts: Vec<String> = Vec::new();
    for (depth, node_id) in chain.iter().enumerate() {
        let node = tree.node(*node_id);
        parts.push(node.token().to_string());
        if node.arguments().is_empty() {
            continue;
        }
        let args: Vec<String> = node
            .arguments()
            .iter()
            .map(|arg| {
                let text = match arg.label() {
                    Some(label) => format!("{label} <{}>", arg.kind()),
                    None => format!("<{}>", arg.id()),
                };
                if required.iter().any(|r| r == arg.id()) {
                    text
                } else {
                    format!("[{text}]")
                }
            })
            .collect();
        let mut args = args.join(", ");
        if depth + 1 < chain.len() {
            args.push(';');
        }
        parts.push(args);
    }
    parts.join(" ")
}

#[derive(Debug, Clone)]
struct Entry {
    token: String,
    labels: Vec<String>,
    /// Account and category arguments, by label (`None` when unlabeled).
    references: Vec<(Option<String>, ArgKind)>,
    children: Vec<usize>,
}

/// Where the complete words of a line lead.
enum Position {
    Unknown,
    Root,
    At(usize),
}

fn is_break(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == ';'
}

/// Byte offset and lowercased text of the word ending at the end of `line`.
fn word_at_end(line: &str) -> (usize, String) {
    let start = line.rfind(is_break).map_or(0, |i| i + 1);
    (start, line[start..].to_lowercase())
}

/// Completion data copied out of a command tree.
///
/// The index holds no reference to the tree's actions, so it can live inside
/// a line editor helper.
#[derive(Debug, Clone, Default)]
pub struct CompletionIndex {
    entries: Vec<Entry>,
    roots: Vec<usize>,
}

impl CompletionIndex {
    /// Copy the tokens and labels of `tree`.
    pub fn new<S>(tree: &CommandTree<S>) -> Self {
        let mut index = Self::default();
        let mut positions = std::collections::HashMap::new();
        for (id, node) in tree.nodes() {
            positions.insert(id, index.entries.len());
            index.entries.push(Entry {
                token: node.token().to_string(),
                labels: node
                    .arguments()
                    .iter()
                    .filter_map(|a| a.label().map(str::to_string))
                    .collect(),
                references: node
                    .arguments()
                    .iter()
                    .filter(|a| matches!(a.kind(), ArgKind::Account | ArgKind::Category))
                    .map(|a| (a.label().map(str::to_string), a.kind()))
                    .collect(),
                children: Vec::new(),
            });
        }
        for (id, node) in tree.nodes() {
            let children = node.children().iter().map(|c| positions[c]).collect();
            index.entries[positions[&id]].children = children;
        }
        index.roots = tree.roots().iter().map(|r| positions[r]).collect();
        index
    }

    /// Candidates for the word ending at the end of `line`.
    ///
    /// Returns the byte offset where that word starts and the matching
    /// subcommand tokens and argument labels.
    pub fn complete(&self, line: &str) -> (usize, Vec<String>) {
        let (start, prefix) = word_at_end(line);
        let candidates: Vec<&str> = match self.position(&line[..start]) {
            Position::Unknown => Vec::new(),
            Position::Root => self.roots.iter().map(|i| self.entries[*i].token.as_str()).collect(),
            Position::At(i) => {
                let entry = &self.entries[i];
                entry
                    .children
                    .iter()
                    .map(|c| self.entries[*c].token.as_str())
                    .chain(entry.labels.iter().map(String::as_str))
                    .collect()
            }
        };
        let candidates = candidates
            .into_iter()
            .filter(|c| c.to_lowercase().starts_with(&prefix))
            .map(str::to_string)
            .collect();
        (start, candidates)
    }

    /// Like [`complete`](Self::complete), but where the word is the value of
    /// an account or category argument, offer the given names instead.
    /// Names containing whitespace are offered quoted.
    pub fn complete_names(
        &self,
        line: &str,
        accounts: &[String],
        categories: &[String],
    ) -> (usize, Vec<String>) {
        let (start, prefix) = word_at_end(line);
        let head = &line[..start];
        let Position::At(i) = self.position(head) else {
            return self.complete(line);
        };
        let names = match self.reference_before(i, head) {
            Some(ArgKind::Account) => accounts,
            Some(ArgKind::Category) => categories,
            _ => return self.complete(line),
        };
        let candidates = names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .map(|name| {
                if name.contains(char::is_whitespace) {
                    format!("{QUOTE}{name}{QUOTE}")
                } else {
                    name.clone()
                }
            })
            .collect();
        (start, candidates)
    }

    fn position(&self, head: &str) -> Position {
        let mut current: Option<usize> = None;
        for word in head.split(is_break).filter(|w| !w.is_empty()) {
            let pool = current.map_or(&self.roots, |i| &self.entries[i].children);
            match pool
                .iter()
                .find(|i| same_token(&self.entries[**i].token, word))
            {
                Some(i) => current = Some(*i),
                None if current.is_none() => return Position::Unknown,
                None => {}
            }
        }
        current.map_or(Position::Root, Position::At)
    }

    /// Kind of the reference argument whose value starts right after `head`.
    fn reference_before(&self, entry: usize, head: &str) -> Option<ArgKind> {
        let head = head.trim_end();
        if head.ends_with(|c: char| c == ',' || c == ';') {
            return None;
        }
        let previous = head.rsplit(char::is_whitespace).next()?;
        let entry = &self.entries[entry];
        entry.references.iter().find_map(|(label, kind)| match label {
            Some(label) if same_token(label, previous) => Some(*kind),
            None if same_token(&entry.token, previous) => Some(*kind),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArgKind, Argument, Bindings, CommandError, CommandSpec, Outcome};

    fn done(_: &mut (), _: &Bindings) -> Result<Outcome, CommandError> {
        Ok(Outcome::Done)
    }

    fn tree() -> CommandTree<()> {
        CommandTree::build(vec![
            CommandSpec::new("new")
                .child(
                    CommandSpec::new("account")
                        .argument(Argument::new("accountName", ArgKind::Text).required())
                        .action(done),
                )
                .child(
                    CommandSpec::new("transaction")
                        .context(ContextKind::Account)
                        .argument(Argument::labeled("value", "value", ArgKind::Money).required())
                        .argument(Argument::labeled("date", "date", ArgKind::Date))
                        .action(done),
                ),
            CommandSpec::new("list")
                .argument(Argument::labeled("from", "from", ArgKind::Date))
                .child(CommandSpec::new("export").action(done))
                .action(done),
        ])
        .unwrap()
    }

    #[test]
    fn test_usage_lines() {
        let lines: Vec<String> = usage(&tree(), None)
            .into_iter()
            .map(|u| u.synopsis)
            .collect();
        insta::assert_snapshot!(lines.join("\n"), @r"
        new account <accountName>
        new transaction value <money>, [date <date>]
        list [from <date>]
        list [from <date>]; export
        ");
    }

    #[test]
    fn test_usage_filters_by_context() {
        let paths: Vec<String> = usage(&tree(), Some(ContextKind::Book))
            .into_iter()
            .map(|u| u.path)
            .collect();
        assert_eq!(paths, ["new account", "list", "list export"]);
    }

    #[test]
    fn test_complete_roots_and_children() {
        let index = CompletionIndex::new(&tree());
        assert_eq!(index.complete(""), (0, vec!["new".to_string(), "list".to_string()]));
        assert_eq!(index.complete("n"), (0, vec!["new".to_string()]));
        assert_eq!(
            index.complete("new "),
            (4, vec!["account".to_string(), "transaction".to_string()])
        );
        assert_eq!(index.complete("NEW tr"), (4, vec!["transaction".to_string()]));
    }

    #[test]
    fn test_complete_labels_after_arguments() {
        let index = CompletionIndex::new(&tree());
        assert_eq!(
            index.complete("new transaction value 5, d"),
            (25, vec!["date".to_string()])
        );
        assert_eq!(index.complete("bogus a"), (6, Vec::new()));
    }

    #[test]
    fn test_complete_reference_names() {
        let tree: CommandTree<()> = CommandTree::build(vec![
            CommandSpec::new("enter").child(
                CommandSpec::new("account")
                    .argument(Argument::new("account", ArgKind::Account))
                    .action(done),
            ),
            CommandSpec::new("pay")
                .argument(Argument::labeled("to", "to", ArgKind::Account).required())
                .argument(Argument::labeled("category", "category", ArgKind::Category))
                .argument(Argument::labeled("note", "note", ArgKind::Text))
                .action(done),
        ])
        .unwrap();
        let index = CompletionIndex::new(&tree);
        let accounts = ["Checking".to_string(), "Cash".to_string()];
        let categories = ["Eating out".to_string(), "Rent".to_string()];

        assert_eq!(
            index.complete_names("enter account C", &accounts, &categories),
            (14, vec!["Checking".to_string(), "Cash".to_string()])
        );
        assert_eq!(
            index.complete_names("enter account ch", &accounts, &categories),
            (14, vec!["Checking".to_string()])
        );
        assert_eq!(
            index.complete_names("pay to Cash, category e", &accounts, &categories),
            (22, vec!["\"Eating out\"".to_string()])
        );
        // Outside a reference value, labels are offered as usual.
        assert_eq!(
            index.complete_names("pay to Cash, n", &accounts, &categories),
            (13, vec!["note".to_string()])
        );
        assert_eq!(
            index.complete_names("pay note C", &accounts, &categories),
            (9, vec!["category".to_string()])
        );
    }
}
