//! The console session: one book, one context, one console.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tally_command::{CommandTree, Context, ContextProvider, Dispatcher, Outcome, Registry};
use tally_core::{AccountId, Book, BookError, CategoryId};

use crate::console::Console;
use crate::store::{self, StoreError};

/// State threaded through every command.
pub struct Session<C> {
    book: Book,
    context: Context,
    console: C,
    path: Option<PathBuf>,
    dirty: bool,
    autosave: bool,
    prompt: String,
    commands: Option<Rc<CommandTree<Self>>>,
}

impl<C: Console> Session<C> {
    /// A session on `book`, starting in book context.
    pub fn new(book: Book, console: C) -> Self {
        Self {
            book,
            context: Context::Book,
            console,
            path: None,
            dirty: false,
            autosave: true,
            prompt: "tally".to_string(),
            commands: None,
        }
    }

    /// File the book is saved to.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Whether `quit` saves unsaved changes.
    pub const fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Prompt prefix.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Make the command tree available to `help`.
    pub fn set_commands(&mut self, commands: Rc<CommandTree<Self>>) {
        self.commands = Some(commands);
    }

    /// The command tree, if set.
    pub fn commands(&self) -> Option<Rc<CommandTree<Self>>> {
        self.commands.clone()
    }

    /// The book.
    pub const fn book(&self) -> &Book {
        &self.book
    }

    /// The book, for a change that must be saved.
    pub fn book_mut(&mut self) -> &mut Book {
        self.dirty = true;
        &mut self.book
    }

    /// The console.
    pub const fn console(&self) -> &C {
        &self.console
    }

    /// The console, mutably.
    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Print a message on the console.
    pub fn print(&mut self, message: impl AsRef<str>) {
        self.console.print(message.as_ref());
    }

    /// The save path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether there are unsaved changes.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The current account, if the session is inside one.
    pub const fn current_account(&self) -> Option<AccountId> {
        match self.context {
            Context::Account(id) => Some(id),
            _ => None,
        }
    }

    /// The current category, if the session is inside one.
    pub const fn current_category(&self) -> Option<CategoryId> {
        match self.context {
            Context::Category(id) => Some(id),
            _ => None,
        }
    }

    /// Name of the entity the session is inside.
    pub fn context_name(&self) -> Result<String, BookError> {
        Ok(match self.context {
            Context::Book => self.book.name.clone(),
            Context::Account(id) => self.book.account(id)?.name.clone(),
            Context::Category(id) => self.book.category(id)?.name.clone(),
        })
    }

    /// The prompt for the current context, e.g. `tally/Checking> `.
    pub fn prompt(&self) -> String {
        match self.context {
            Context::Book => format!("{}> ", self.prompt),
            _ => match self.context_name() {
                Ok(name) => format!("{}/{name}> ", self.prompt),
                Err(_) => format!("{}> ", self.prompt),
            },
        }
    }

    /// Save to `path`, or to the session path. A new path becomes the
    /// session path.
    pub fn save(&mut self, path: Option<&Path>) -> Result<Option<PathBuf>, StoreError> {
        if let Some(path) = path {
            self.path = Some(path.to_path_buf());
        }
        let Some(path) = self.path.clone() else {
            return Ok(None);
        };
        store::save(&self.book, &path)?;
        self.dirty = false;
        Ok(Some(path))
    }

    /// Run one line and report any error on the console. Returns `false`
    /// once the session should end.
    pub fn execute(&mut self, dispatcher: &Dispatcher<Self>, line: &str) -> bool {
        match dispatcher.dispatch(self, line) {
            Ok(Outcome::Exit) => false,
            Ok(_) => true,
            Err(err) if err.is_defect() => {
                self.console.error(&format!("internal error: {err}"));
                true
            }
            Err(err) => {
                self.console.error(&err.to_string());
                true
            }
        }
    }

    /// Read and run lines until `quit` or end of input, then autosave.
    pub fn run(&mut self, dispatcher: &Dispatcher<Self>) {
        loop {
            let registry = self.registry();
            let names = (registry.account_names(), registry.category_names());
            self.console.set_names(names.0, names.1);
            let prompt = self.prompt();
            let Some(line) = self.console.read_line(&prompt) else {
                break;
            };
            if !self.execute(dispatcher, &line) {
                break;
            }
        }
        self.finish();
    }

    /// Save unsaved changes when autosave is on and a path is known.
    pub fn finish(&mut self) {
        if !(self.dirty && self.autosave) {
            return;
        }
        match self.save(None) {
            Ok(Some(path)) => self.print(format!("Saved {}", path.display())),
            Ok(None) => self.print("Unsaved changes discarded (no book file; use `save <path>`)"),
            Err(err) => self.console.error(&err.to_string()),
        }
    }
}

impl<C> ContextProvider for Session<C> {
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

impl<C> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("book", &self.book.name)
            .field("context", &self.context)
            .field("path", &self.path)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
