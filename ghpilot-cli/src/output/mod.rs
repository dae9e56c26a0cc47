//! Output formatting for CLI.

mod json;
mod text;

pub use json::{JsonFormatter, OutcomeSummary};
pub use text::TextFormatter;
