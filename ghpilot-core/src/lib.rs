// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # ghpilot Core
//!
//! Core types, models, and the metrics aggregator shared by every other
//! ghpilot crate.
//!
//! - Domain models (usage records, seats, billing, issues, policy settings)
//! - The [`aggregate()`] fold that turns usage records and seats into a
//!   [`MetricsSummary`]
//! - Error types
//!
//! ## Key Types
//!
//! ### Copilot Metrics
//! - [`UsageRecord`] - One day of Copilot activity for an organization
//! - [`Seat`] - One Copilot license assignment
//! - [`BillingInfo`] - Organization billing snapshot
//! - [`MetricsSummary`] - Aggregated point-in-time report
//! - [`MetricsWindow`] - Date bounds of a report
//!
//! ### Issues
//! - [`Issue`] - Pass-through view of a GitHub issue
//! - [`IssueOutcome`] - Per-item result of assignment and labeling
//! - [`RepoRef`] - `owner/name` pair
//!
//! ### Policy
//! - [`PolicyOverview`] - Composite organization policy report
//! - [`FieldOutcome`] - A report section that is either available or degraded

pub mod aggregate;
pub mod error;
pub mod models;

pub use aggregate::aggregate;
pub use error::CoreError;

pub use models::{
    // Copilot metrics
    BillingInfo,
    LanguageStats,
    MetricsSummary,
    MetricsWindow,
    PublicCodeSuggestions,
    Seat,
    SeatBreakdown,
    SeatManagement,
    TeamStats,
    TeamUsage,
    UsageRecord,
    ACTIVE_WINDOW_DAYS,
    DEFAULT_COST_PER_SEAT,
    // Issues
    Issue,
    IssueOutcome,
    RepoRef,
    // Policy
    ActionsSettings,
    CopilotSettings,
    FieldOutcome,
    OrganizationSettings,
    PolicyOverview,
    SecuritySettings,
};
