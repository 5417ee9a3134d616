//! reqwest implementation of [`DashboardApi`] over the REST and GraphQL endpoints.

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use super::DashboardApi;
use super::graphql::{
    GET_TEST_RUN_BY_ID, GET_TEST_RUNS, GraphQlRequest, GraphQlResponse, TestRunByIdData,
    TestRunByIdVariables, TestRunsData, TestRunsVariables,
};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    DeletePreferredRequest, FavouriteRequest, GroupedProjectsRequest, Page,
    PreferredProjectsResponse, ProjectGroup, ProjectListResponse, ProjectTestRuns, ReportSummary,
    SavePreferredRequest, TestRun, UserPreference, UserPreferenceResponse, WriteStatusResponse,
};

/// Test runs are always listed newest first.
const DESCENDING_ORDER: bool = true;

/// HTTP client for the test report backend.
#[derive(Clone)]
pub struct HttpDashboardClient {
    client: reqwest::Client,
    api_base_url: String,
    graphql_url: String,
    access_token: Option<SecretString>,
}

impl HttpDashboardClient {
    /// Build a client with the configured timeouts.
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpDashboardClient {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            graphql_url: config.graphql_url.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json");
        match self.access_token {
            Some(ref token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// GET a REST resource and decode it; any non-200 is a fetch error.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.request(Method::GET, &url).send().await.map_err(|e| {
            warn!("GET {} failed: {}", url, e);
            AppError::Fetch(e.to_string())
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("GET {} returned {}", url, status);
            return Err(AppError::Fetch(format!("GET {} returned {}", path, status)));
        }

        Ok(response.json::<T>().await?)
    }

    /// Send a write and check both the HTTP status and, when given, the
    /// `status` field of the JSON envelope.
    async fn write<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        expected: StatusCode,
        expected_body_status: Option<&str>,
    ) -> AppResult<()> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut builder = self.request(method.clone(), &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            AppError::Save(e.to_string())
        })?;

        let status = response.status();
        if status != expected {
            warn!("{} {} returned {}", method, url, status);
            return Err(AppError::Save(format!(
                "{} {} returned {}",
                method, path, status
            )));
        }

        if let Some(expected_status) = expected_body_status {
            let envelope: WriteStatusResponse = response
                .json()
                .await
                .map_err(|e| AppError::Save(format!("Malformed response: {}", e)))?;
            if envelope.status != expected_status {
                warn!(
                    "{} {} reported status '{}' (expected '{}')",
                    method, url, envelope.status, expected_status
                );
                return Err(AppError::Save(format!(
                    "{} {} reported status '{}'",
                    method, path, envelope.status
                )));
            }
        }

        Ok(())
    }

    async fn graphql<V: Serialize + Send + Sync, T: DeserializeOwned>(
        &self,
        query: &str,
        variables: V,
    ) -> AppResult<T> {
        let response = self
            .request(Method::POST, &self.graphql_url)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| {
                warn!("GraphQL request failed: {}", e);
                AppError::Fetch(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("GraphQL endpoint returned {}", status);
            return Err(AppError::Fetch(format!(
                "GraphQL endpoint returned {}",
                status
            )));
        }

        response.json::<GraphQlResponse<T>>().await?.into_data()
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn list_test_runs(
        &self,
        page_size: u32,
        cursor: Option<&str>,
    ) -> AppResult<Page<TestRun>> {
        let data: TestRunsData = self
            .graphql(
                GET_TEST_RUNS,
                TestRunsVariables {
                    first: page_size,
                    after: cursor,
                    is_descending_order: DESCENDING_ORDER,
                },
            )
            .await?;
        Ok(data.test_runs.into())
    }

    async fn get_test_run(&self, id: i64) -> AppResult<TestRun> {
        let data: TestRunByIdData = self
            .graphql(GET_TEST_RUN_BY_ID, TestRunByIdVariables { id })
            .await?;
        data.test_run_by_id
            .ok_or_else(|| AppError::NotFound(format!("Test run {}", id)))
    }

    async fn get_preferred_projects(&self) -> AppResult<Vec<ProjectGroup>> {
        let resp: PreferredProjectsResponse = self.get_json("user/preferred").await?;
        Ok(resp.preferred.unwrap_or_default())
    }

    async fn save_preferred_projects(&self, groups: &[GroupedProjectsRequest]) -> AppResult<()> {
        let body = SavePreferredRequest {
            preferred: groups.to_vec(),
        };
        self.write(
            Method::POST,
            "user/preferred",
            Some(&body),
            StatusCode::CREATED,
            Some("success"),
        )
        .await
    }

    async fn delete_preferred_projects(&self, group_ids: &[i64]) -> AppResult<()> {
        let body = DeletePreferredRequest::new(group_ids);
        self.write(
            Method::DELETE,
            "user/preferred",
            Some(&body),
            StatusCode::OK,
            Some("deleted"),
        )
        .await
    }

    async fn get_favorites(&self) -> AppResult<BTreeSet<Uuid>> {
        let groups = self.get_preferred_projects().await?;
        Ok(groups
            .iter()
            .flat_map(|group| group.projects.iter().map(|p| p.uuid))
            .collect())
    }

    async fn mark_favorite(&self, uuid: Uuid) -> AppResult<()> {
        self.write(
            Method::POST,
            "user/favourite",
            Some(&FavouriteRequest { favourite: uuid }),
            StatusCode::CREATED,
            None,
        )
        .await
    }

    async fn unmark_favorite(&self, uuid: Uuid) -> AppResult<()> {
        let path = format!("user/favourite/{}", uuid);
        self.write::<()>(Method::DELETE, &path, None, StatusCode::OK, None)
            .await
    }

    async fn get_user_preference(&self) -> AppResult<UserPreference> {
        let resp: UserPreferenceResponse = self.get_json("user/preference").await?;
        Ok(resp.into())
    }

    async fn save_user_preference(&self, preference: &UserPreference) -> AppResult<()> {
        self.write(
            Method::PUT,
            "user/preference",
            Some(preference),
            StatusCode::OK,
            None,
        )
        .await
    }

    async fn list_projects(&self) -> AppResult<Vec<String>> {
        let resp: ProjectListResponse = self.get_json("reports/projects/").await?;
        Ok(resp.projects)
    }

    async fn get_project_summary(&self, project_name: &str) -> AppResult<Vec<ReportSummary>> {
        let path = format!("reports/summary/{}/", urlencoding::encode(project_name));
        self.get_json(&path).await
    }

    async fn get_project_test_runs(&self, uuid: Uuid) -> AppResult<ProjectTestRuns> {
        let path = format!("project/{}/testruns", uuid);
        self.get_json(&path).await
    }
}
