//! Console finance tracker.
//!
//! This crate provides the `tally` console on top of the domain model in
//! `tally-core` and the command interpreter in `tally-command`:
//!
//! - [`grammar`]: The command tree (`new account`, `budget set`, ...)
//! - [`session`]: The state every command runs against
//! - [`console`]: Line editing, menus and scripted input
//! - [`store`]: Reading and writing book files
//! - [`config`]: User configuration
//!
//! # Example Usage
//!
//! ```bash
//! tally household.json
//! tally household.json -e "list accounts" -e "budget report"
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod config;
pub mod console;
pub mod grammar;
pub mod report;
pub mod session;
pub mod store;
