//! Console interface
//!
//! Text layout of reports and progress captions for the terminal.

pub mod console;
pub mod formatter;

pub use console::ConsoleProgress;
pub use formatter::{CliFormatter, format_basic_info, group_thousands};
