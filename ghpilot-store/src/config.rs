//! Environment configuration.
//!
//! Values are read through an injectable lookup so tests never touch the
//! process environment. Empty values count as unset.

use chrono::NaiveDate;
use ghpilot_core::{MetricsWindow, RepoRef, DEFAULT_COST_PER_SEAT};
use ghpilot_fetch::{
    AppCredentials, Credentials, FetchSettings, DEFAULT_API_BASE, DEFAULT_REPORT_DEADLINE_SECS,
    DEFAULT_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::StoreError;

/// Environment variable names.
pub mod vars {
    #![allow(missing_docs)]
    pub const APP_ID: &str = "GITHUB_APP_ID";
    pub const PRIVATE_KEY_PATH: &str = "GITHUB_PRIVATE_KEY_PATH";
    pub const INSTALLATION_ID: &str = "GITHUB_INSTALLATION_ID";
    pub const TOKEN: &str = "GITHUB_TOKEN";
    pub const ORG: &str = "GITHUB_ORG";
    pub const OWNER: &str = "GITHUB_OWNER";
    pub const REPO: &str = "GITHUB_REPO";
    pub const EXPERTS: &str = "COPILOT_EXPERTS";
    pub const TEAMS: &str = "COPILOT_TEAMS";
    pub const START_DATE: &str = "METRICS_START_DATE";
    pub const END_DATE: &str = "METRICS_END_DATE";
    pub const SINCE: &str = "METRICS_SINCE";
    pub const UNTIL: &str = "METRICS_UNTIL";
    pub const COST_PER_SEAT: &str = "COPILOT_COST_PER_SEAT";
    pub const API_URL: &str = "GITHUB_API_URL";
    pub const TIMEOUT_SECS: &str = "GITHUB_TIMEOUT_SECS";
    pub const REPORT_DEADLINE_SECS: &str = "REPORT_DEADLINE_SECS";
}

/// Runtime configuration.
#[derive(Clone, PartialEq)]
pub struct Config {
    /// GitHub App ID.
    pub app_id: Option<String>,
    /// Path to the app's PEM private key.
    pub private_key_path: Option<PathBuf>,
    /// Installation to act as.
    pub installation_id: Option<u64>,
    /// Pre-issued token; bypasses app authentication.
    pub token: Option<String>,
    /// Target organization.
    pub org: Option<String>,
    /// Target repository owner.
    pub owner: Option<String>,
    /// Target repository name.
    pub repo: Option<String>,
    /// Assignee candidates for auto-assignment.
    pub experts: Vec<String>,
    /// Team slugs for per-team usage.
    pub teams: Vec<String>,
    /// First report day.
    pub since: Option<NaiveDate>,
    /// Last report day.
    pub until: Option<NaiveDate>,
    /// Monthly cost of one seat in USD.
    pub cost_per_seat: f64,
    /// API base URL.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Overall report deadline.
    pub report_deadline: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: None,
            private_key_path: None,
            installation_id: None,
            token: None,
            org: None,
            owner: None,
            repo: None,
            experts: Vec::new(),
            teams: Vec::new(),
            since: None,
            until: None,
            cost_per_seat: DEFAULT_COST_PER_SEAT,
            api_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            report_deadline: Duration::from_secs(DEFAULT_REPORT_DEADLINE_SECS),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("org", &self.org)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn parse<T>(name: &str, value: Option<String>) -> Result<Option<T>, StoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| StoreError::config(name, format!("invalid value '{v}': {e}")))
        })
        .transpose()
}

fn parse_date(name: &str, value: Option<String>) -> Result<Option<NaiveDate>, StoreError> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|e| {
                    StoreError::config(name, format!("expected YYYY-MM-DD, got '{v}': {e}"))
                })
        })
        .transpose()
}

fn parse_secs(name: &str, value: Option<String>) -> Result<Option<u64>, StoreError> {
    match parse::<u64>(name, value)? {
        Some(0) => Err(StoreError::config(name, "must be at least 1")),
        secs => Ok(secs),
    }
}

fn parse_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` naming the variable for non-numeric ids,
    /// malformed dates, zero timeouts or `since > until`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let since_var = if get(vars::START_DATE).is_some() {
            vars::START_DATE
        } else {
            vars::SINCE
        };
        let until_var = if get(vars::END_DATE).is_some() {
            vars::END_DATE
        } else {
            vars::UNTIL
        };
        let since = parse_date(since_var, get(since_var))?;
        let until = parse_date(until_var, get(until_var))?;
        if let (Some(s), Some(u)) = (since, until) {
            MetricsWindow::new(s, u).map_err(|e| StoreError::config(since_var, e))?;
        }

        let cost_per_seat = parse::<f64>(vars::COST_PER_SEAT, get(vars::COST_PER_SEAT))?
            .unwrap_or(DEFAULT_COST_PER_SEAT);
        if !cost_per_seat.is_finite() || cost_per_seat < 0.0 {
            return Err(StoreError::config(vars::COST_PER_SEAT, "must be a non-negative number"));
        }

        let timeout = parse_secs(vars::TIMEOUT_SECS, get(vars::TIMEOUT_SECS))?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let deadline = parse_secs(vars::REPORT_DEADLINE_SECS, get(vars::REPORT_DEADLINE_SECS))?
            .unwrap_or(DEFAULT_REPORT_DEADLINE_SECS);

        let config = Self {
            app_id: get(vars::APP_ID),
            private_key_path: get(vars::PRIVATE_KEY_PATH).map(PathBuf::from),
            installation_id: parse(vars::INSTALLATION_ID, get(vars::INSTALLATION_ID))?,
            token: get(vars::TOKEN),
            org: get(vars::ORG),
            owner: get(vars::OWNER),
            repo: get(vars::REPO),
            experts: parse_list(get(vars::EXPERTS)),
            teams: parse_list(get(vars::TEAMS)),
            since,
            until,
            cost_per_seat,
            api_url: get(vars::API_URL).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(timeout),
            report_deadline: Duration::from_secs(deadline),
        };
        debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    // ========================================================================
    // Scenario requirements
    // ========================================================================

    /// Credentials for authentication; a token wins over app credentials.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` naming the first missing variable, or
    /// the key path if the key cannot be read.
    pub fn credentials(&self) -> Result<Credentials, StoreError> {
        if let Some(token) = &self.token {
            return Ok(Credentials::Token(token.clone()));
        }

        let missing = |name: &str| {
            StoreError::config(name, format!("not set (or set {} instead)", vars::TOKEN))
        };
        let app_id = self.app_id.clone().ok_or_else(|| missing(vars::APP_ID))?;
        let key_path = self
            .private_key_path
            .as_ref()
            .ok_or_else(|| missing(vars::PRIVATE_KEY_PATH))?;
        let installation_id = self
            .installation_id
            .ok_or_else(|| missing(vars::INSTALLATION_ID))?;

        let app = AppCredentials::from_key_file(app_id, key_path, installation_id)
            .map_err(|e| StoreError::config(vars::PRIVATE_KEY_PATH, e))?;
        Ok(Credentials::App(app))
    }

    /// Fetch settings derived from this configuration.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings::default()
            .with_api_base(self.api_url.clone())
            .with_timeout(self.timeout)
            .with_report_deadline(self.report_deadline)
    }

    /// The target organization, `flag` taking precedence.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if neither is set.
    pub fn organization(&self, flag: Option<&str>) -> Result<String, StoreError> {
        flag.map(str::to_string)
            .or_else(|| self.org.clone())
            .ok_or_else(|| StoreError::config(vars::ORG, "not set (or pass --org)"))
    }

    /// The target repository, `flag` (`owner/name`) taking precedence.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the repository is not configured or
    /// `flag` is malformed.
    pub fn repository(&self, flag: Option<&str>) -> Result<RepoRef, StoreError> {
        if let Some(flag) = flag {
            return flag
                .parse()
                .map_err(|e| StoreError::config("--repo", e));
        }
        let owner = self
            .owner
            .clone()
            .ok_or_else(|| StoreError::config(vars::OWNER, "not set (or pass --repo owner/name)"))?;
        let repo = self
            .repo
            .clone()
            .ok_or_else(|| StoreError::config(vars::REPO, "not set (or pass --repo owner/name)"))?;
        Ok(RepoRef::new(owner, repo))
    }

    /// The report window, flags taking precedence over the environment.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the resolved window is inverted.
    pub fn window(
        &self,
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<MetricsWindow, StoreError> {
        MetricsWindow::resolve(since.or(self.since), until.or(self.until), today)
            .map_err(|e| StoreError::config("metrics window", e))
    }
}
