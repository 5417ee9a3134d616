//! Per-project run history for the test summaries page.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::status::{FAILED_COLOR, PASSED_COLOR, SKIPPED_COLOR};
use crate::api::DashboardApi;
use crate::error::AppResult;
use crate::models::ReportSummary;

/// How one suite run ended, judged from its spec totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every spec passed.
    Passed,
    /// Nothing failed, but some specs were skipped.
    PassedWithSkips,
    Failed,
}

impl RunOutcome {
    pub fn of(summary: &ReportSummary) -> Self {
        let passed = summary.total_passed_spec_runs;
        let skipped = summary.total_skipped_spec_runs;
        let total = summary.total_spec_runs;

        if passed == total {
            RunOutcome::Passed
        } else if passed + skipped == total {
            RunOutcome::PassedWithSkips
        } else {
            RunOutcome::Failed
        }
    }

    pub fn is_pass(&self) -> bool {
        !matches!(self, RunOutcome::Failed)
    }

    /// History box color, from the shared status palette.
    pub fn color(&self) -> &'static str {
        match self {
            RunOutcome::Passed => PASSED_COLOR,
            RunOutcome::PassedWithSkips => SKIPPED_COLOR,
            RunOutcome::Failed => FAILED_COLOR,
        }
    }
}

/// One box in a project's history strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub suite_run_id: i64,
    pub suite_name: String,
    pub start_time: Option<DateTime<Utc>>,
    pub passed: u32,
    /// Specs that ran, i.e. total minus skipped.
    pub executed: u32,
    pub skipped: u32,
    pub outcome: RunOutcome,
    pub color: &'static str,
}

impl HistoryEntry {
    pub fn from_summary(summary: &ReportSummary) -> Self {
        let outcome = RunOutcome::of(summary);
        HistoryEntry {
            suite_run_id: summary.suite_run_id,
            suite_name: summary.suite_name.clone(),
            start_time: summary.start_time,
            passed: summary.total_passed_spec_runs,
            executed: summary
                .total_spec_runs
                .saturating_sub(summary.total_skipped_spec_runs),
            skipped: summary.total_skipped_spec_runs,
            outcome,
            color: outcome.color(),
        }
    }

    /// Pass rate over specs that ran; `None` when nothing ran.
    pub fn pass_percentage(&self) -> Option<f64> {
        (self.executed > 0).then(|| 100.0 * f64::from(self.passed) / f64::from(self.executed))
    }

    /// `"3/4 (75.00%)"`, or `"N/A - no valid tests"`.
    pub fn pass_label(&self) -> String {
        match self.pass_percentage() {
            Some(pct) => format!("{}/{} ({:.2}%)", self.passed, self.executed, pct),
            None => "N/A - no valid tests".to_string(),
        }
    }
}

/// Totals and entries for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectHistory {
    pub project_name: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub entries: Vec<HistoryEntry>,
}

impl ProjectHistory {
    pub fn from_summaries(project_name: &str, summaries: &[ReportSummary]) -> Self {
        let entries: Vec<HistoryEntry> = summaries.iter().map(HistoryEntry::from_summary).collect();
        let passed = entries.iter().filter(|e| e.outcome.is_pass()).count();

        ProjectHistory {
            project_name: project_name.to_string(),
            total: entries.len(),
            passed,
            failed: entries.len() - passed,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Names of every project with reported runs, in server order.
pub async fn fetch_project_names(api: &dyn DashboardApi) -> AppResult<Vec<String>> {
    let projects = api.list_projects().await.map_err(|e| {
        warn!("Failed to fetch project list: {}", e);
        e
    })?;
    info!("Fetched {} reported projects", projects.len());
    Ok(projects)
}

/// Fetch and summarize one project's history.
pub async fn fetch_project_history(
    api: &dyn DashboardApi,
    project_name: &str,
) -> AppResult<ProjectHistory> {
    let summaries = api.get_project_summary(project_name).await.map_err(|e| {
        warn!("Failed to fetch summary for {}: {}", project_name, e);
        e
    })?;
    Ok(ProjectHistory::from_summaries(project_name, &summaries))
}
