//! Command-line entry points.
//!
//! The binary in `src/bin/` is a thin wrapper around [`shell::main`].

pub mod shell;
