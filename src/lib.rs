//! A small single-user phonebook with an interactive text menu.
//!
//! Contacts are kept in one JSON file that is read in full at the start of
//! every menu cycle and written in full after every change. The building
//! blocks are:
//!
//! - [`store`]: the [`RecordStore`], with paging, add, update, search and delete;
//! - [`record`]: the six-field [`Record`] and the [`RecordPatch`] used for updates;
//! - [`command`]: traits for menu commands and for the prompt they read answers from;
//! - [`Interpreter`]: the menu loop tying it all together.

mod builtin;
pub mod command;
pub mod config;
pub mod error;
mod interpreter;
pub mod io_adapters;
pub mod logging;
pub mod record;
mod render;
pub mod session;
pub mod store;

/// Just a convenient re-export of the interactive menu runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;

pub use config::Settings;
pub use error::StoreError;
pub use record::{Field, Record, RecordPatch};
pub use store::{RecordId, RecordStore};
