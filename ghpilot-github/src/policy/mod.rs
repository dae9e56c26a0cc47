//! Organization policy overview.
//!
//! ## API Endpoints
//!
//! - `GET /orgs/{org}` - Organization and security settings
//! - `GET /orgs/{org}/copilot/billing` - Copilot settings
//! - `GET /orgs/{org}/actions/permissions` - Actions permissions

mod api;
mod overview;

pub use api::{OrganizationResponse, Plan};
pub use overview::policy_overview;
