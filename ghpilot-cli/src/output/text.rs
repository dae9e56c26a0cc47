//! Text output formatting with colors.

use ghpilot_core::{
    BillingInfo, FieldOutcome, Issue, IssueOutcome, MetricsSummary, PolicyOverview,
};
use ghpilot_github::SeatReport;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Languages shown in the metrics table.
pub const TOP_LANGUAGES: usize = 10;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    /// Formats a metrics summary.
    pub fn format_metrics(&self, summary: &MetricsSummary) -> String {
        let mut lines = vec![format!("Copilot Metrics: {}", self.bold(&summary.organization))];

        match (summary.period_start, summary.period_end) {
            (Some(start), Some(end)) => lines.push(format!(
                "Period:  {start} to {end} ({} days reported)",
                summary.days_reported
            )),
            _ => lines.push(format!("Period:  {}", self.dim("no usage data"))),
        }
        lines.push(String::new());

        lines.push(format!("Suggestions:      {}", summary.total_suggestions));
        lines.push(format!("Acceptances:      {}", summary.total_acceptances));
        lines.push(format!(
            "Acceptance rate:  {}",
            self.color_for_rate(summary.acceptance_rate, &percent(summary.acceptance_rate))
        ));
        lines.push(format!(
            "Lines accepted:   {} of {}",
            summary.total_lines_accepted, summary.total_lines_suggested
        ));
        lines.push(format!("Peak active:      {} users", summary.peak_active_users));
        lines.push(String::new());

        lines.push(format!(
            "Seats:            {} total, {} active, {} inactive ({} utilized)",
            summary.total_seats,
            self.green(&summary.active_seats.to_string()),
            self.inactive_count(summary.inactive_seats),
            percent(summary.seat_utilization())
        ));
        lines.push(format!(
            "Monthly cost:     {} ({} per seat)",
            usd(summary.total_monthly_cost),
            usd(summary.cost_per_seat)
        ));
        let savings = usd(summary.potential_savings);
        lines.push(format!(
            "Potential savings: {}",
            if summary.potential_savings > 0.0 { self.yellow(&savings) } else { savings }
        ));

        let languages = summary.top_languages(TOP_LANGUAGES);
        if !languages.is_empty() {
            lines.push(String::new());
            lines.push(self.bold(&format!("Top languages (of {})", summary.languages.len())));
            lines.push(self.dim(&format!(
                "  {:<16} {:>12} {:>12} {:>8}",
                "LANGUAGE", "SUGGESTIONS", "ACCEPTANCES", "RATE"
            )));
            for (name, stats) in languages {
                lines.push(format!(
                    "  {:<16} {:>12} {:>12} {:>8}",
                    name,
                    stats.suggestions,
                    stats.acceptances,
                    percent(stats.acceptance_rate())
                ));
            }
        }

        if !summary.teams.is_empty() {
            lines.push(String::new());
            lines.push(self.bold("Teams"));
            lines.push(self.dim(&format!(
                "  {:<16} {:>12} {:>12} {:>8} {:>6}",
                "TEAM", "SUGGESTIONS", "ACCEPTANCES", "RATE", "PEAK"
            )));
            for (name, stats) in &summary.teams {
                lines.push(format!(
                    "  {:<16} {:>12} {:>12} {:>8} {:>6}",
                    name,
                    stats.suggestions,
                    stats.acceptances,
                    percent(stats.acceptance_rate()),
                    stats.peak_active_users
                ));
            }
        }

        lines.join("\n")
    }

    // ========================================================================
    // Billing
    // ========================================================================

    /// Formats Copilot billing information.
    pub fn format_billing(&self, billing: &BillingInfo) -> String {
        let b = &billing.breakdown;
        let mut lines = vec![
            self.bold("Copilot Billing"),
            format!("Seats:                   {}", billing.total_seats),
            format!("Seat management:         {}", billing.seat_management),
            format!("Public code suggestions: {}", billing.public_code_suggestions),
        ];
        if let Some(plan) = &billing.plan_type {
            lines.push(format!("Plan:                    {}", self.cyan(plan)));
        }
        lines.push(format!(
            "Monthly cost:            {} ({} per seat)",
            usd(billing.monthly_cost()),
            usd(billing.cost_per_seat)
        ));
        lines.push(format!(
            "This cycle:              {} added, {} active, {} inactive, \
             {} pending invitation, {} pending cancellation",
            b.added_this_cycle,
            b.active_this_cycle,
            b.inactive_this_cycle,
            b.pending_invitation,
            b.pending_cancellation
        ));
        lines.join("\n")
    }

    /// Formats billing that may be unavailable.
    pub fn format_billing_outcome(&self, billing: &FieldOutcome<BillingInfo>) -> String {
        match billing {
            FieldOutcome::Available { value } => self.format_billing(value),
            FieldOutcome::Unavailable { error, remedy } => {
                self.format_unavailable("Copilot Billing", error, remedy.as_deref())
            }
        }
    }

    /// Formats a degraded report section.
    pub fn format_unavailable(&self, section: &str, error: &str, remedy: Option<&str>) -> String {
        let mut out = format!("{}: {} ({error})", self.bold(section), self.red("unavailable"));
        if let Some(remedy) = remedy {
            out.push_str(&format!("\n  {}", self.dim(&format!("hint: {remedy}"))));
        }
        out
    }

    // ========================================================================
    // Seats
    // ========================================================================

    /// Formats a seat report.
    pub fn format_seats(&self, report: &SeatReport) -> String {
        let mut lines = vec![
            format!("Copilot Seats: {}", self.bold(&report.organization)),
            format!(
                "{} total, {} active, {} inactive",
                report.total_seats,
                self.green(&report.active_seats.to_string()),
                self.inactive_count(report.inactive_seats as u64)
            ),
        ];

        if report.seats.is_empty() {
            lines.push(self.dim("No seats to show"));
            return lines.join("\n");
        }

        lines.push(String::new());
        lines.push(self.dim(&format!(
            "  {:<20} {:<9} {:<12} {:>6}  {}",
            "USER", "STATUS", "LAST ACTIVE", "IDLE", "TEAM"
        )));
        for status in &report.seats {
            let seat = &status.seat;
            let state = if status.active { self.green("active  ") } else { self.red("inactive") };
            let last = seat
                .last_activity_at
                .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d").to_string());
            let idle = status
                .days_inactive
                .map_or_else(|| "-".to_string(), |d| format!("{d}d"));
            lines.push(format!(
                "  {:<20} {} {:<12} {:>6}  {}",
                seat.assignee,
                state,
                last,
                idle,
                seat.assigning_team.as_deref().unwrap_or("-")
            ));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Policy
    // ========================================================================

    /// Formats an organization policy overview.
    pub fn format_policy(&self, overview: &PolicyOverview) -> String {
        let mut sections = vec![format!(
            "Policy Overview: {} ({}/{} sections available)",
            self.bold(&overview.organization),
            overview.available_sections(),
            PolicyOverview::SECTIONS
        )];

        sections.push(self.section("Organization", &overview.organization_settings, |o| {
            vec![
                ("Name", o.name.clone().unwrap_or_else(|| o.login.clone())),
                ("Plan", or_dash(o.plan.as_deref())),
                (
                    "Default repository permission",
                    or_dash(o.default_repository_permission.as_deref()),
                ),
                ("Members can create repositories", flag(o.members_can_create_repositories)),
                (
                    "Members can create public repositories",
                    flag(o.members_can_create_public_repositories),
                ),
                (
                    "Members can create private repositories",
                    flag(o.members_can_create_private_repositories),
                ),
                (
                    "Members can fork private repositories",
                    flag(o.members_can_fork_private_repositories),
                ),
                ("Web commit signoff required", flag(o.web_commit_signoff_required)),
            ]
        }));

        sections.push(self.section("Copilot", &overview.copilot_settings, |c| {
            vec![
                ("Seats", c.total_seats.to_string()),
                ("Seat management", c.seat_management.to_string()),
                ("Public code suggestions", c.public_code_suggestions.to_string()),
                ("IDE chat", or_dash(c.ide_chat.as_deref())),
                ("Platform chat", or_dash(c.platform_chat.as_deref())),
                ("CLI", or_dash(c.cli.as_deref())),
                ("Plan", or_dash(c.plan_type.as_deref())),
            ]
        }));

        sections.push(self.section("Security", &overview.security_settings, |s| {
            vec![
                ("Two-factor requirement", flag(s.two_factor_requirement_enabled)),
                (
                    "Advanced security (new repos)",
                    flag(s.advanced_security_enabled_for_new_repositories),
                ),
                (
                    "Dependabot alerts (new repos)",
                    flag(s.dependabot_alerts_enabled_for_new_repositories),
                ),
                (
                    "Dependabot security updates (new repos)",
                    flag(s.dependabot_security_updates_enabled_for_new_repositories),
                ),
                (
                    "Dependency graph (new repos)",
                    flag(s.dependency_graph_enabled_for_new_repositories),
                ),
                (
                    "Secret scanning (new repos)",
                    flag(s.secret_scanning_enabled_for_new_repositories),
                ),
                (
                    "Push protection (new repos)",
                    flag(s.secret_scanning_push_protection_enabled_for_new_repositories),
                ),
            ]
        }));

        sections.push(self.section("Actions", &overview.actions_settings, |a| {
            vec![
                ("Enabled repositories", a.enabled_repositories.clone()),
                ("Allowed actions", or_dash(a.allowed_actions.as_deref())),
            ]
        }));

        sections.join("\n\n")
    }

    fn section<T>(
        &self,
        title: &str,
        outcome: &FieldOutcome<T>,
        rows: impl FnOnce(&T) -> Vec<(&'static str, String)>,
    ) -> String {
        match outcome {
            FieldOutcome::Available { value } => {
                let rows = rows(value);
                let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
                let mut lines = vec![self.bold(title)];
                lines.extend(
                    rows.into_iter()
                        .map(|(k, v)| format!("  {:<width$} {v}", format!("{k}:"))),
                );
                lines.join("\n")
            }
            FieldOutcome::Unavailable { error, remedy } => {
                self.format_unavailable(title, error, remedy.as_deref())
            }
        }
    }

    // ========================================================================
    // Issues
    // ========================================================================

    /// Formats one issue in detail.
    pub fn format_issue(&self, issue: &Issue) -> String {
        let mut lines = vec![format!(
            "{} {} [{}]",
            self.bold(&format!("#{}", issue.number)),
            issue.title,
            issue.state
        )];
        if !issue.labels.is_empty() {
            lines.push(format!("  Labels:    {}", issue.labels.join(", ")));
        }
        lines.push(format!(
            "  Assignees: {}",
            if issue.assignees.is_empty() { self.dim("none") } else { issue.assignees.join(", ") }
        ));
        lines.push(format!("  Created:   {}", issue.created_at.format("%Y-%m-%d")));
        lines.push(format!("  {}", self.cyan(&issue.html_url)));
        lines.join("\n")
    }

    /// Formats an issue list, one line per issue.
    pub fn format_issues(&self, issues: &[Issue]) -> String {
        if issues.is_empty() {
            return self.dim("No issues found");
        }
        issues
            .iter()
            .map(|i| {
                let assignees = if i.assignees.is_empty() {
                    self.dim("unassigned")
                } else {
                    i.assignees.join(", ")
                };
                format!("{:>6}  {}  {}", format!("#{}", i.number), i.title, assignees)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats per-issue outcomes followed by a tally.
    pub fn format_outcomes(&self, outcomes: &[IssueOutcome]) -> String {
        let mut lines: Vec<String> = outcomes
            .iter()
            .map(|o| match (&o.error, o.success) {
                (None, true) if !o.assignees.is_empty() => format!(
                    "{} #{} assigned to {}",
                    self.green("✓"),
                    o.issue_number,
                    o.assignees.join(", ")
                ),
                (None, true) => format!(
                    "{} #{} labeled {}",
                    self.green("✓"),
                    o.issue_number,
                    o.labels.join(", ")
                ),
                (error, _) => format!(
                    "{} #{}: {}",
                    self.red("✗"),
                    o.issue_number,
                    error.as_deref().unwrap_or("failed")
                ),
            })
            .collect();

        if outcomes.len() > 1 {
            let failed = outcomes.iter().filter(|o| !o.success).count();
            lines.push(self.dim(&format!(
                "{} succeeded, {failed} failed",
                outcomes.len() - failed
            )));
        }
        lines.join("\n")
    }

    /// Formats assignable users.
    pub fn format_assignees(&self, assignees: &[String]) -> String {
        if assignees.is_empty() {
            return self.dim("No assignable users");
        }
        assignees.join("\n")
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Colors an acceptance rate.
    pub fn color_for_rate(&self, rate: f64, text: &str) -> String {
        if rate >= 0.3 {
            self.green(text)
        } else if rate >= 0.15 {
            self.yellow(text)
        } else {
            self.red(text)
        }
    }

    fn inactive_count(&self, n: u64) -> String {
        if n > 0 { self.red(&n.to_string()) } else { n.to_string() }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// A `[0, 1]` ratio as a percentage with one decimal.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// A USD amount with two decimals.
pub fn usd(amount: f64) -> String {
    format!("${amount:.2}")
}

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".into(),
        Some(false) => "no".into(),
        None => "unknown".into(),
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

// ============================================================================
// Tests
// ============================================================================
