// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # ghpilot Store
//!
//! Configuration and report persistence.
//!
//! - **Config**: environment-driven settings with validation
//! - **ReportWriter**: timestamped JSON report artifacts
//! - **Persistence**: atomic JSON file helpers
//!
//! ## Usage
//!
//! ```ignore
//! use ghpilot_store::{Config, ReportWriter, METRICS_PREFIX};
//!
//! let config = Config::from_env()?;
//! let org = config.organization(None)?;
//! let path = ReportWriter::default()
//!     .persist(METRICS_PREFIX, &org, &report, Utc::now())
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod reports;

pub use config::{vars, Config};
pub use error::StoreError;
pub use persistence::{ensure_dir, save_json};
pub use reports::{
    report_file_name, ReportWriter, DEFAULT_REPORT_DIR, METRICS_PREFIX, POLICY_PREFIX,
    SEATS_PREFIX,
};
