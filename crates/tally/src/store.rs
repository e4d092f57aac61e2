//! Loading and saving books as JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tally_core::Book;
use thiserror::Error;

/// Error returned when a book cannot be read or written.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The book file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The file is not a valid book.
    #[error("{} is not a valid book: {source}", path.display())]
    Format {
        /// The book file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Load the book at `path`.
///
/// A missing file yields a new empty book named after the file stem, in
/// `currency`.
pub fn load(path: &Path, currency: &str) -> Result<Book, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let name = path
                .file_stem()
                .map_or_else(|| "book".to_string(), |s| s.to_string_lossy().into_owned());
            tracing::info!(path = %path.display(), "starting a new book");
            return Ok(Book::new(name, currency));
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let book: Book = serde_json::from_str(&content).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        accounts = book.accounts().len(),
        categories = book.categories().len(),
        "loaded book"
    );
    Ok(book)
}

/// Write `book` to `path` as pretty-printed JSON, creating parent directories.
pub fn save(book: &Book, path: &Path) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let json = serde_json::to_string_pretty(book).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json + "\n").map_err(io_error)?;
    tracing::debug!(path = %path.display(), "saved book");
    Ok(())
}
