//! Backend port consumed by the dashboard services.
//!
//! Services only ever talk to [`DashboardApi`]; the reqwest-backed
//! [`HttpDashboardClient`] is the production implementation.

use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    GroupedProjectsRequest, Page, ProjectGroup, ProjectTestRuns, ReportSummary, TestRun,
    UserPreference,
};

pub mod graphql;
pub mod http;

pub use http::HttpDashboardClient;

/// Operations the dashboard needs from the test report backend.
///
/// Reads fail with `AppError::Fetch`, writes with `AppError::Save`.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Fetch one page of test runs after `cursor` (newest first).
    async fn list_test_runs(&self, page_size: u32, cursor: Option<&str>)
    -> AppResult<Page<TestRun>>;

    /// Fetch a single test run. Missing runs are `AppError::NotFound`.
    async fn get_test_run(&self, id: i64) -> AppResult<TestRun>;

    /// Current user's project groups.
    async fn get_preferred_projects(&self) -> AppResult<Vec<ProjectGroup>>;

    /// Replace the current user's groups.
    async fn save_preferred_projects(&self, groups: &[GroupedProjectsRequest]) -> AppResult<()>;

    /// Delete persisted groups by id.
    async fn delete_preferred_projects(&self, group_ids: &[i64]) -> AppResult<()>;

    /// Uuids of every project the user has favorited.
    async fn get_favorites(&self) -> AppResult<BTreeSet<Uuid>>;

    async fn mark_favorite(&self, uuid: Uuid) -> AppResult<()>;

    async fn unmark_favorite(&self, uuid: Uuid) -> AppResult<()>;

    async fn get_user_preference(&self) -> AppResult<UserPreference>;

    async fn save_user_preference(&self, preference: &UserPreference) -> AppResult<()>;

    /// Names of every project with reported runs.
    async fn list_projects(&self) -> AppResult<Vec<String>>;

    /// Suite-run history rows for one project.
    async fn get_project_summary(&self, project_name: &str) -> AppResult<Vec<ReportSummary>>;

    /// Latest runs of one project, newest first.
    async fn get_project_test_runs(&self, uuid: Uuid) -> AppResult<ProjectTestRuns>;
}
