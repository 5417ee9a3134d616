//! Test run hierarchy: TestRun → SuiteRun → SpecRun → Tag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Outcome of a single spec run.
///
/// Parsed case-insensitively. Anything the backend sends that is not one of
/// the three known statuses is kept verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpecStatus {
    Passed,
    Failed,
    Skipped,
    Unknown(String),
}

impl SpecStatus {
    /// Parse from string representation.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "skipped" => Self::Skipped,
            _ => Self::Unknown(s.to_string()),
        }
    }

    /// Lowercase bucket name used as the status count key.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Capitalized label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Skipped => "Skipped",
            Self::Unknown(_) => "Unknown",
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// A missing status counts as unknown.
impl Default for SpecStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for SpecStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<SpecStatus> for String {
    fn from(status: SpecStatus) -> Self {
        match status {
            SpecStatus::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SpecStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tag attached to a spec run. Identity is the id, not the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl Tag {
    pub fn new(id: i64, name: &str) -> Self {
        Tag {
            id,
            name: name.to_string(),
        }
    }
}

/// Individual spec execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecRun {
    pub id: i64,
    #[serde(default, alias = "suite_id")]
    pub suite_id: i64,
    #[serde(default, alias = "spec_description")]
    pub spec_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: SpecStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, alias = "start_time")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "end_time")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

/// One suite inside a test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteRun {
    pub id: i64,
    #[serde(default, alias = "test_run_id")]
    pub test_run_id: i64,
    #[serde(default, alias = "suite_name")]
    pub suite_name: String,
    #[serde(default, alias = "start_time")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "end_time")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "spec_runs", deserialize_with = "null_as_default")]
    pub spec_runs: Vec<SpecRun>,
}

/// One execution of a test project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub id: i64,
    #[serde(default, alias = "test_project_name")]
    pub test_project_name: String,
    #[serde(default, alias = "test_seed")]
    pub test_seed: i64,
    #[serde(default, alias = "start_time")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "end_time")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "git_branch")]
    pub git_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "git_sha")]
    pub git_sha: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "build_trigger_actor"
    )]
    pub build_trigger_actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "build_url")]
    pub build_url: Option<String>,
    #[serde(default, alias = "suite_runs", deserialize_with = "null_as_default")]
    pub suite_runs: Vec<SuiteRun>,
}

impl TestRun {
    /// All spec runs across every suite, in suite order.
    pub fn spec_runs(&self) -> impl Iterator<Item = &SpecRun> {
        self.suite_runs.iter().flat_map(|suite| suite.spec_runs.iter())
    }
}
