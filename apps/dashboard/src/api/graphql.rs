//! GraphQL documents and response envelopes for test run queries.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Page, PageInfo, TestRun, null_as_default};

/// Paginated, newest-first list of test runs.
pub const GET_TEST_RUNS: &str = r#"
query GetTestRuns($first: Int, $after: String, $isDescendingOrder: Boolean) {
    testRuns(first: $first, after: $after, desc: $isDescendingOrder) {
        edges {
            cursor
            testRun {
                id
                testProjectName
                testSeed
                startTime
                endTime
                gitBranch
                gitSha
                buildTriggerActor
                buildUrl
                suiteRuns {
                    id
                    suiteName
                    startTime
                    endTime
                    specRuns {
                        id
                        specDescription
                        status
                        message
                        startTime
                        endTime
                        tags {
                            id
                            name
                        }
                    }
                }
            }
        }
        pageInfo {
            hasNextPage
            startCursor
            endCursor
        }
        totalCount
    }
}
"#;

/// Single test run with its full suite/spec tree.
pub const GET_TEST_RUN_BY_ID: &str = r#"
query GetTestRunById($id: Int!) {
    testRunById(id: $id) {
        id
        testProjectName
        testSeed
        startTime
        endTime
        gitBranch
        gitSha
        buildTriggerActor
        buildUrl
        suiteRuns {
            id
            testRunId
            suiteName
            startTime
            endTime
            specRuns {
                id
                suiteId
                specDescription
                status
                message
                startTime
                endTime
                tags {
                    id
                    name
                }
            }
        }
    }
}
"#;

/// Request body for a GraphQL POST.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunsVariables<'a> {
    pub first: u32,
    pub after: Option<&'a str>,
    pub is_descending_order: bool,
}

#[derive(Debug, Serialize)]
pub struct TestRunByIdVariables {
    pub id: i64,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Unwrap `data`, turning a non-empty `errors` array into a fetch error.
    pub fn into_data(self) -> AppResult<T> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(AppError::Fetch(format!(
                "GraphQL error: {}",
                messages.join("; ")
            )));
        }
        self.data
            .ok_or_else(|| AppError::Fetch("GraphQL response has no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunsData {
    pub test_runs: TestRunConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunConnection {
    #[serde(default)]
    pub edges: Option<Vec<TestRunEdge>>,
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default)]
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunEdge {
    #[serde(default)]
    pub cursor: Option<String>,
    pub test_run: TestRun,
}

impl From<TestRunConnection> for Page<TestRun> {
    fn from(conn: TestRunConnection) -> Self {
        Page {
            records: conn
                .edges
                .unwrap_or_default()
                .into_iter()
                .map(|edge| edge.test_run)
                .collect(),
            next_cursor: conn.page_info.end_cursor,
            has_next_page: conn.page_info.has_next_page,
            total_count: conn.total_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunByIdData {
    pub test_run_by_id: Option<TestRun>,
}
