//! Shared test utilities: fixtures and a scriptable in-memory backend.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::api::DashboardApi;
use crate::error::{AppError, AppResult};
use crate::models::{
    GroupedProjectsRequest, Page, Project, ProjectGroup, ProjectTestRuns, ReportSummary, SpecRun,
    SpecStatus, SuiteRun, Tag, TestRun, UserPreference,
};

/// Build a spec run with the given status and tags.
pub fn spec(id: i64, status: &str, tags: Vec<Tag>) -> SpecRun {
    SpecRun {
        id,
        suite_id: 1,
        spec_description: format!("spec {}", id),
        status: SpecStatus::parse(status),
        message: String::new(),
        start_time: None,
        end_time: None,
        tags,
    }
}

/// Build a suite run around the given specs.
pub fn suite(id: i64, specs: Vec<SpecRun>) -> SuiteRun {
    SuiteRun {
        id,
        test_run_id: 1,
        suite_name: format!("suite {}", id),
        start_time: None,
        end_time: None,
        spec_runs: specs,
    }
}

/// Build a test run around the given suites.
pub fn test_run(id: i64, suites: Vec<SuiteRun>) -> TestRun {
    TestRun {
        id,
        test_project_name: "Atmos Acceptance Tests".to_string(),
        test_seed: 1717396142,
        start_time: None,
        end_time: None,
        git_branch: None,
        git_sha: None,
        build_trigger_actor: None,
        build_url: None,
        suite_runs: suites,
    }
}

/// A persisted group with freshly generated projects.
pub fn group(id: i64, name: &str, project_names: &[&str]) -> ProjectGroup {
    ProjectGroup {
        group_id: Some(id),
        group_name: name.to_string(),
        projects: project_names
            .iter()
            .map(|n| Project::new(Uuid::new_v4(), n))
            .collect(),
    }
}

/// Mutable backend state behind [`MockApi`].
#[derive(Default)]
pub struct MockState {
    /// Pages keyed by the cursor that requests them (`None` for the first page).
    pub pages: HashMap<Option<String>, Page<TestRun>>,
    pub runs_by_id: HashMap<i64, TestRun>,
    pub groups: Vec<ProjectGroup>,
    pub favorites: BTreeSet<Uuid>,
    pub preference: UserPreference,
    pub projects: Vec<String>,
    pub summaries: HashMap<String, Vec<ReportSummary>>,
    pub project_runs: HashMap<Uuid, ProjectTestRuns>,
    pub saved_requests: Vec<Vec<GroupedProjectsRequest>>,
    pub deleted_ids: Vec<Vec<i64>>,
    next_group_id: i64,
    failing: HashSet<&'static str>,
    calls: HashMap<&'static str, usize>,
}

/// In-memory [`DashboardApi`] that records calls and can be told to fail.
#[derive(Clone, Default)]
pub struct MockApi {
    pub state: Arc<Mutex<MockState>>,
    gate: Option<Arc<Notify>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` pages of `per_page` runs each, chained by cursors `c1`, `c2`, ...
    pub fn with_test_run_pages(count: usize, per_page: usize) -> Self {
        let api = Self::new();
        {
            let mut state = api.state.lock().unwrap();
            let total = (count * per_page) as u64;
            for page in 0..count {
                let cursor = (page > 0).then(|| format!("c{}", page));
                let records = (0..per_page)
                    .map(|i| {
                        let id = (page * per_page + i + 1) as i64;
                        test_run(id, vec![suite(id, vec![spec(id, "passed", vec![])])])
                    })
                    .collect();
                let has_next = page + 1 < count;
                state.pages.insert(
                    cursor,
                    Page {
                        records,
                        next_cursor: has_next.then(|| format!("c{}", page + 1)),
                        has_next_page: has_next,
                        total_count: total,
                    },
                );
            }
        }
        api
    }

    /// Hold every `list_test_runs` call until the returned handle is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn with_groups(self, groups: Vec<ProjectGroup>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_group_id = groups.iter().filter_map(|g| g.group_id).max().unwrap_or(0);
            state.groups = groups;
        }
        self
    }

    pub fn fail(&self, method: &'static str) {
        self.state.lock().unwrap().failing.insert(method);
    }

    pub fn recover(&self, method: &'static str) {
        self.state.lock().unwrap().failing.remove(method);
    }

    pub fn calls(&self, method: &'static str) -> usize {
        *self.state.lock().unwrap().calls.get(method).unwrap_or(&0)
    }

    /// Record the call and report whether it should fail.
    fn enter(&self, method: &'static str) -> bool {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(method).or_insert(0) += 1;
        state.failing.contains(method)
    }
}

fn fetch_failure(method: &str) -> AppError {
    AppError::Fetch(format!("{} failed", method))
}

fn save_failure(method: &str) -> AppError {
    AppError::Save(format!("{} failed", method))
}

#[async_trait]
impl DashboardApi for MockApi {
    async fn list_test_runs(
        &self,
        _page_size: u32,
        cursor: Option<&str>,
    ) -> AppResult<Page<TestRun>> {
        let failing = self.enter("list_test_runs");
        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }
        if failing {
            return Err(fetch_failure("list_test_runs"));
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .pages
            .get(&cursor.map(str::to_string))
            .cloned()
            .unwrap_or_else(|| Page::last(Vec::new(), 0)))
    }

    async fn get_test_run(&self, id: i64) -> AppResult<TestRun> {
        if self.enter("get_test_run") {
            return Err(fetch_failure("get_test_run"));
        }
        self.state
            .lock()
            .unwrap()
            .runs_by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Test run {}", id)))
    }

    async fn get_preferred_projects(&self) -> AppResult<Vec<ProjectGroup>> {
        if self.enter("get_preferred_projects") {
            return Err(fetch_failure("get_preferred_projects"));
        }
        Ok(self.state.lock().unwrap().groups.clone())
    }

    async fn save_preferred_projects(&self, groups: &[GroupedProjectsRequest]) -> AppResult<()> {
        if self.enter("save_preferred_projects") {
            return Err(save_failure("save_preferred_projects"));
        }
        let mut state = self.state.lock().unwrap();
        state.saved_requests.push(groups.to_vec());

        let names: HashMap<Uuid, String> = state
            .groups
            .iter()
            .flat_map(|g| g.projects.iter().map(|p| (p.uuid, p.name.clone())))
            .collect();
        let mut stored = Vec::with_capacity(groups.len());
        for request in groups {
            let group_id = if request.group_id == 0 {
                state.next_group_id += 1;
                state.next_group_id
            } else {
                request.group_id
            };
            stored.push(ProjectGroup {
                group_id: Some(group_id),
                group_name: request.group_name.clone(),
                projects: request
                    .projects
                    .iter()
                    .map(|uuid| Project {
                        uuid: *uuid,
                        name: names.get(uuid).cloned().unwrap_or_default(),
                    })
                    .collect(),
            });
        }
        state.groups = stored;
        Ok(())
    }

    async fn delete_preferred_projects(&self, group_ids: &[i64]) -> AppResult<()> {
        if self.enter("delete_preferred_projects") {
            return Err(save_failure("delete_preferred_projects"));
        }
        let mut state = self.state.lock().unwrap();
        state.deleted_ids.push(group_ids.to_vec());
        state
            .groups
            .retain(|g| !g.group_id.is_some_and(|id| group_ids.contains(&id)));
        Ok(())
    }

    async fn get_favorites(&self) -> AppResult<BTreeSet<Uuid>> {
        if self.enter("get_favorites") {
            return Err(fetch_failure("get_favorites"));
        }
        Ok(self.state.lock().unwrap().favorites.clone())
    }

    async fn mark_favorite(&self, uuid: Uuid) -> AppResult<()> {
        if self.enter("mark_favorite") {
            return Err(save_failure("mark_favorite"));
        }
        self.state.lock().unwrap().favorites.insert(uuid);
        Ok(())
    }

    async fn unmark_favorite(&self, uuid: Uuid) -> AppResult<()> {
        if self.enter("unmark_favorite") {
            return Err(save_failure("unmark_favorite"));
        }
        self.state.lock().unwrap().favorites.remove(&uuid);
        Ok(())
    }

    async fn get_user_preference(&self) -> AppResult<UserPreference> {
        if self.enter("get_user_preference") {
            return Err(fetch_failure("get_user_preference"));
        }
        Ok(self.state.lock().unwrap().preference.clone())
    }

    async fn save_user_preference(&self, preference: &UserPreference) -> AppResult<()> {
        if self.enter("save_user_preference") {
            return Err(save_failure("save_user_preference"));
        }
        self.state.lock().unwrap().preference = preference.clone();
        Ok(())
    }

    async fn list_projects(&self) -> AppResult<Vec<String>> {
        if self.enter("list_projects") {
            return Err(fetch_failure("list_projects"));
        }
        Ok(self.state.lock().unwrap().projects.clone())
    }

    async fn get_project_summary(&self, project_name: &str) -> AppResult<Vec<ReportSummary>> {
        if self.enter("get_project_summary") {
            return Err(fetch_failure("get_project_summary"));
        }
        Ok(self
            .state
            .lock()
            .unwrap()
            .summaries
            .get(project_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_project_test_runs(&self, uuid: Uuid) -> AppResult<ProjectTestRuns> {
        if self.enter("get_project_test_runs") {
            return Err(fetch_failure("get_project_test_runs"));
        }
        self.state
            .lock()
            .unwrap()
            .project_runs
            .get(&uuid)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Project {}", uuid)))
    }
}
