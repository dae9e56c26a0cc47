//! Copilot usage metrics, seats and billing.
//!
//! ## API Endpoints
//!
//! - `GET /orgs/{org}/copilot/usage` - Daily organization usage
//! - `GET /orgs/{org}/team/{team}/copilot/usage` - Daily team usage
//! - `GET /orgs/{org}/copilot/billing/seats` - Seat assignments (paginated)
//! - `GET /orgs/{org}/copilot/billing` - Billing and policy settings

mod api;
mod report;

pub use api::{BillingResponse, SeatBreakdownResponse, UsageBreakdown, UsageDayResponse};
pub(crate) use report::degrade;
pub use report::{metrics_report, seat_report, MetricsReport, SeatReport, SeatStatus};
