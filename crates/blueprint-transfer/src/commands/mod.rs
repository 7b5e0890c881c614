//! Operator commands.
//!
//! Each command wraps one pipeline behind a `name`/`description`/`help`/`execute`
//! surface and prints a summary when verbosity is above zero.

pub mod export;
pub mod import;
pub mod reset;

pub use export::{ExportArgs, ExportCommand, ExportOptions};
pub use import::{ImportArgs, ImportCommand, ImportOptions};
pub use reset::{ResetCommand, ResetOptions};
