//! Domain models for ghpilot.
//!
//! ## Submodules
//!
//! - [`usage`] - Daily Copilot usage records and per-language/team stats
//! - [`seat`] - Copilot seat assignments and activity classification
//! - [`billing`] - Organization billing snapshot
//! - [`summary`] - Aggregated metrics summary
//! - [`window`] - Report date bounds
//! - [`issue`] - Issues and per-item operation outcomes
//! - [`policy`] - Organization policy overview

mod billing;
mod issue;
mod policy;
mod seat;
mod summary;
mod usage;
mod window;

pub use billing::{
    BillingInfo, PublicCodeSuggestions, SeatBreakdown, SeatManagement, DEFAULT_COST_PER_SEAT,
};
pub use issue::{Issue, IssueOutcome, RepoRef};
pub use policy::{
    ActionsSettings, CopilotSettings, FieldOutcome, OrganizationSettings, PolicyOverview,
    SecuritySettings,
};
pub use seat::{Seat, ACTIVE_WINDOW_DAYS};
pub use summary::{MetricsSummary, TeamStats};
pub use usage::{LanguageStats, TeamUsage, UsageRecord};
pub use window::MetricsWindow;
