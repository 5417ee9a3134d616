//! Spec status aggregation and the status color policy.
//!
//! Every view that colors something by run status (status tags, heatmap
//! tiles, summary history boxes) goes through [`status_color`] and
//! [`status_border_color`] so the palette stays identical everywhere.

use std::collections::BTreeMap;

use crate::models::{SpecRun, SpecStatus, SuiteRun, TestRun};

pub const PASSED_COLOR: &str = "#3ca454";
pub const FAILED_COLOR: &str = "#933340";
pub const SKIPPED_COLOR: &str = "#ffd261";
pub const UNKNOWN_COLOR: &str = "#BDBDBD";

pub const PASSED_BORDER_COLOR: &str = "#2e8040";
pub const FAILED_BORDER_COLOR: &str = "#702732";
pub const SKIPPED_BORDER_COLOR: &str = "#d9b34f";
pub const UNKNOWN_BORDER_COLOR: &str = "#9E9E9E";

/// Fill color for a status string, matched case-insensitively.
pub fn status_color(status: &str) -> &'static str {
    match SpecStatus::parse(status) {
        SpecStatus::Passed => PASSED_COLOR,
        SpecStatus::Failed => FAILED_COLOR,
        SpecStatus::Skipped => SKIPPED_COLOR,
        SpecStatus::Unknown(_) => UNKNOWN_COLOR,
    }
}

/// Darker border variant of [`status_color`].
pub fn status_border_color(status: &str) -> &'static str {
    match SpecStatus::parse(status) {
        SpecStatus::Passed => PASSED_BORDER_COLOR,
        SpecStatus::Failed => FAILED_BORDER_COLOR,
        SpecStatus::Skipped => SKIPPED_BORDER_COLOR,
        SpecStatus::Unknown(_) => UNKNOWN_BORDER_COLOR,
    }
}

/// Spec counts by status for one test run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub unknown: usize,
}

impl StatusCounts {
    /// Count every spec in the iterator.
    pub fn from_specs<'a>(specs: impl IntoIterator<Item = &'a SpecRun>) -> Self {
        let mut counts = StatusCounts::default();
        for spec in specs {
            match spec.status {
                SpecStatus::Passed => counts.passed += 1,
                SpecStatus::Failed => counts.failed += 1,
                SpecStatus::Skipped => counts.skipped += 1,
                SpecStatus::Unknown(_) => counts.unknown += 1,
            }
        }
        counts
    }

    /// Count for a status name; unrecognized names read as 0.
    pub fn get(&self, status: &str) -> usize {
        match status.to_lowercase().as_str() {
            "passed" => self.passed,
            "failed" => self.failed,
            "skipped" => self.skipped,
            "unknown" => self.unknown,
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.unknown
    }

    /// Specs that actually ran (everything except skipped).
    pub fn executed(&self) -> usize {
        self.total() - self.skipped
    }

    /// `"<passed>/<executed>"`, e.g. `"2/3"`.
    pub fn ratio(&self) -> String {
        format!("{}/{}", self.passed, self.executed())
    }

    /// The three reported buckets as a name → count map.
    pub fn to_map(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("passed", self.passed),
            ("failed", self.failed),
            ("skipped", self.skipped),
        ])
    }
}

/// Count the specs of every suite in the run.
pub fn status_counts(test_run: &TestRun) -> StatusCounts {
    StatusCounts::from_specs(test_run.spec_runs())
}

/// Passed specs over specs that ran, skipped excluded from the denominator.
pub fn spec_run_ratio(test_run: &TestRun) -> String {
    status_counts(test_run).ratio()
}

/// Specs shown in a suite's detail table; skipped specs are hidden.
pub fn visible_spec_runs(suite: &SuiteRun) -> Vec<&SpecRun> {
    suite
        .spec_runs
        .iter()
        .filter(|spec| !spec.status.is_skipped())
        .collect()
}
