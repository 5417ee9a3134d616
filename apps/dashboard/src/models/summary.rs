//! Per-project summary rows and latest-run status used by summaries and heatmaps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SuiteRun;

/// One suite-run row from `GET /reports/summary/{project}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportSummary {
    #[serde(rename = "SuiteRunID")]
    pub suite_run_id: i64,
    #[serde(default)]
    pub suite_name: String,
    #[serde(default)]
    pub test_project_name: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_passed_spec_runs: u32,
    #[serde(default)]
    pub total_skipped_spec_runs: u32,
    #[serde(default)]
    pub total_spec_runs: u32,
}

/// Response body of `GET /reports/projects/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListResponse {
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub total: u64,
}

/// One run in `GET /project/{uuid}/testruns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTestRun {
    pub id: i64,
    #[serde(default, alias = "test_project_name")]
    pub test_project_name: String,
    #[serde(default, alias = "start_time")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "end_time")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "suite_runs")]
    pub suite_runs: Option<Vec<SuiteRun>>,
}

/// Response body of `GET /project/{uuid}/testruns`, newest run first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTestRuns {
    #[serde(default)]
    pub id: i64,
    pub uuid: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "test_runs")]
    pub test_runs: Vec<ProjectTestRun>,
}
