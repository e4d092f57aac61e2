//! Presentation: where the session reads lines and writes messages.
//!
//! [`Terminal`] is the interactive console backed by rustyline. [`Scripted`]
//! replays a fixed list of input lines and records every message, which is
//! what the tests drive.

use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, Helper, Highlighter, Hinter, Validator};
use tally_command::CompletionIndex;

/// Blocking line-oriented I/O used by the session.
pub trait Console {
    /// Show a message.
    fn print(&mut self, message: &str);

    /// Show an error message.
    fn error(&mut self, message: &str) {
        self.print(&format!("error: {message}"));
    }

    /// Read one line, `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Let the user pick one of `choices`, returning its index. `None` when
    /// the menu was dismissed.
    fn select(&mut self, prompt: &str, choices: &[String]) -> Option<usize>;

    /// Account and category names that exist right now, for completion.
    fn set_names(&mut self, _accounts: Vec<String>, _categories: Vec<String>) {}
}

/// Parse a 1-based menu answer.
fn menu_choice(answer: &str, count: usize) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}

fn menu_lines(prompt: &str, choices: &[String]) -> Vec<String> {
    let mut lines = vec![prompt.to_string()];
    lines.extend(
        choices
            .iter()
            .enumerate()
            .map(|(i, choice)| format!("  {}) {choice}", i + 1)),
    );
    lines
}

/// Tab completion over command tokens, argument labels and the names of
/// existing accounts and categories.
#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct LineHelper {
    index: CompletionIndex,
    accounts: Vec<String>,
    categories: Vec<String>,
}

impl LineHelper {
    /// Complete from `index`.
    pub const fn new(index: CompletionIndex) -> Self {
        Self {
            index,
            accounts: Vec::new(),
            categories: Vec::new(),
        }
    }
}

impl Completer for LineHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self
            .index
            .complete_names(&line[..pos], &self.accounts, &self.categories))
    }
}

/// The interactive terminal.
pub struct Terminal {
    editor: Editor<LineHelper, DefaultHistory>,
    history: Option<PathBuf>,
}

impl Terminal {
    /// Open the terminal, loading history from `history` when given.
    pub fn new(index: CompletionIndex, history: Option<PathBuf>) -> rustyline::Result<Self> {
        let mut editor: Editor<LineHelper, DefaultHistory> = Editor::new()?;
        editor.set_helper(Some(LineHelper::new(index)));
        if let Some(path) = &history {
            if let Some(parent) = path.parent() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    tracing::debug!(path = %parent.display(), error = %err, "no history directory");
                }
            }
            if let Err(err) = editor.load_history(path) {
                tracing::debug!(path = %path.display(), error = %err, "no history loaded");
            }
        }
        Ok(Self { editor, history })
    }

    /// Write the history file, if one was configured.
    pub fn save_history(&mut self) {
        if let Some(path) = &self.history {
            if let Err(err) = self.editor.save_history(path) {
                tracing::warn!(path = %path.display(), error = %err, "failed to save history");
            }
        }
    }
}

impl Console for Terminal {
    fn print(&mut self, message: &str) {
        println!("{message}");
    }

    fn error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    return Some(line);
                }
                Err(ReadlineError::Interrupted) => println!("(interrupted)"),
                Err(ReadlineError::Eof) => return None,
                Err(err) => {
                    eprintln!("error: {err}");
                    return None;
                }
            }
        }
    }

    fn set_names(&mut self, accounts: Vec<String>, categories: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.accounts = accounts;
            helper.categories = categories;
        }
    }

    fn select(&mut self, prompt: &str, choices: &[String]) -> Option<usize> {
        for line in menu_lines(prompt, choices) {
            println!("{line}");
        }
        let _ = std::io::stdout().flush();
        match self.editor.readline(&format!("choice [1-{}]: ", choices.len())) {
            Ok(answer) => menu_choice(&answer, choices.len()),
            Err(_) => None,
        }
    }
}

/// A console that replays canned input and records output.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    input: VecDeque<String>,
    output: Vec<String>,
    accounts: Vec<String>,
    categories: Vec<String>,
}

impl Scripted {
    /// Replay `lines`. Menu answers are taken from the same queue.
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
            accounts: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Every message printed so far, one entry per line.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Account and category names last handed over for completion.
    pub fn names(&self) -> (&[String], &[String]) {
        (&self.accounts, &self.categories)
    }

    /// Printed output joined with newlines.
    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    fn push(&mut self, message: &str) {
        self.output.extend(message.lines().map(str::to_string));
    }
}

impl Console for Scripted {
    fn print(&mut self, message: &str) {
        self.push(message);
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let line = self.input.pop_front()?;
        self.output.push(format!("{prompt}{line}"));
        Some(line)
    }

    fn select(&mut self, prompt: &str, choices: &[String]) -> Option<usize> {
        for line in menu_lines(prompt, choices) {
            self.output.push(line);
        }
        let answer = self.input.pop_front()?;
        self.output.push(format!("choice: {answer}"));
        menu_choice(&answer, choices.len())
    }

    fn set_names(&mut self, accounts: Vec<String>, categories: Vec<String>) {
        self.accounts = accounts;
        self.categories = categories;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice() {
        assert_eq!(menu_choice("1", 3), Some(0));
        assert_eq!(menu_choice(" 3 ", 3), Some(2));
        assert_eq!(menu_choice("0", 3), None);
        assert_eq!(menu_choice("4", 3), None);
        assert_eq!(menu_choice("", 3), None);
        assert_eq!(menu_choice("two", 3), None);
    }

    #[test]
    fn test_terminal_opens_without_history_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, "").unwrap();
        // The history directory cannot be created below a regular file.
        let terminal = Terminal::new(CompletionIndex::default(), Some(file.join("history")));
        assert!(terminal.is_ok());
    }

    #[test]
    fn test_scripted_replays_and_records() {
        let mut console = Scripted::new(["balance", "2"]);
        assert_eq!(console.read_line("> ").as_deref(), Some("balance"));
        let picked = console.select("Pick one", &["a".to_string(), "b".to_string()]);
        assert_eq!(picked, Some(1));
        assert_eq!(console.read_line("> "), None);
        console.error("nope");
        assert_eq!(
            console.output(),
            ["> balance", "Pick one", "  1) a", "  2) b", "choice: 2", "error: nope"]
        );
    }
}
