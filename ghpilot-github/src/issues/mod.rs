//! Issue lookup, assignment and labeling for one repository.

mod api;
mod assign;

pub use api::{IssueFilter, IssueState};
pub use assign::{add_labels, assign_batch, assign_issue, auto_assign};
