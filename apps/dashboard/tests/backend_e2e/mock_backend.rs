//! Mock report backend for E2E tests.
//!
//! Starts an in-process HTTP server that answers the GraphQL test run queries
//! and the REST user/report endpoints with canned, mutable state.

use std::collections::{HashMap, HashSet};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpResponse, HttpServer, delete, get, post, put, web};
use serde_json::{Value, json};

use fern_dashboard_lib::config::Config;

/// Shared state for the mock backend.
#[derive(Default)]
pub struct MockBackendState {
    /// Test runs in server order (newest first), GraphQL shape.
    pub test_runs: Vec<Value>,
    /// Stored groups, `GET /user/preferred` shape.
    pub groups: Vec<Value>,
    /// Project names by uuid, used when saved groups only carry uuids.
    pub project_names: HashMap<String, String>,
    pub preference: Value,
    pub project_runs: HashMap<String, Value>,
    pub summaries: HashMap<String, Value>,
    /// Endpoint keys that answer with an error.
    pub failing: HashSet<&'static str>,
    /// Variables of every GraphQL request.
    pub graphql_variables: Vec<Value>,
    pub saved_bodies: Vec<Value>,
    pub deleted_bodies: Vec<Value>,
    pub preference_bodies: Vec<Value>,
    pub next_group_id: i64,
}

type SharedState = web::Data<Arc<Mutex<MockBackendState>>>;

fn server_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({"error": "internal", "message": "boom"}))
}

// ============================================================================
// GraphQL
// ============================================================================

#[post("/query")]
async fn graphql_endpoint(state: SharedState, body: web::Json<Value>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    let variables = body["variables"].clone();
    state.graphql_variables.push(variables.clone());

    if state.failing.contains("graphql") {
        return server_error();
    }
    if state.failing.contains("graphql_errors") {
        return HttpResponse::Ok().json(json!({"data": null, "errors": [{"message": "resolver failed"}]}));
    }

    let query = body["query"].as_str().unwrap_or_default();
    if query.contains("testRunById") {
        let id = variables["id"].as_i64().unwrap_or_default();
        let run = state
            .test_runs
            .iter()
            .find(|r| r["id"].as_i64() == Some(id))
            .cloned()
            .unwrap_or(Value::Null);
        return HttpResponse::Ok().json(json!({"data": {"testRunById": run}}));
    }

    let first = variables["first"].as_u64().unwrap_or(10) as usize;
    let start = match variables["after"].as_str() {
        Some(cursor) => state
            .test_runs
            .iter()
            .position(|r| r["id"].to_string() == cursor)
            .map(|i| i + 1)
            .unwrap_or(state.test_runs.len()),
        None => 0,
    };
    let end = (start + first).min(state.test_runs.len());
    let page = &state.test_runs[start.min(end)..end];

    let edges: Vec<Value> = page
        .iter()
        .map(|run| json!({"cursor": run["id"].to_string(), "testRun": run}))
        .collect();
    let end_cursor = page.last().map(|run| run["id"].to_string());

    HttpResponse::Ok().json(json!({
        "data": {
            "testRuns": {
                "edges": edges,
                "pageInfo": {
                    "hasNextPage": end < state.test_runs.len(),
                    "startCursor": page.first().map(|run| run["id"].to_string()),
                    "endCursor": end_cursor,
                },
                "totalCount": state.test_runs.len(),
            }
        }
    }))
}

// ============================================================================
// Preferred projects (groups and favorites)
// ============================================================================

#[get("/api/user/preferred")]
async fn get_preferred(state: SharedState) -> HttpResponse {
    let state = state.lock().unwrap();
    if state.failing.contains("get_preferred") {
        return server_error();
    }
    HttpResponse::Ok().json(json!({"preferred": state.groups}))
}

#[post("/api/user/preferred")]
async fn save_preferred(state: SharedState, body: web::Json<Value>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.saved_bodies.push(body.0.clone());

    if state.failing.contains("save_preferred") {
        return server_error();
    }
    if state.failing.contains("save_preferred_status") {
        return HttpResponse::Created().json(json!({"status": "error"}));
    }

    let mut stored = Vec::new();
    for group in body["preferred"].as_array().cloned().unwrap_or_default() {
        let group_id = match group["group_id"].as_i64() {
            Some(0) | None => {
                state.next_group_id += 1;
                state.next_group_id
            }
            Some(id) => id,
        };
        let projects: Vec<Value> = group["projects"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .iter()
            .filter_map(|uuid| uuid.as_str())
            .map(|uuid| {
                let name = state.project_names.get(uuid).cloned().unwrap_or_default();
                json!({"uuid": uuid, "name": name})
            })
            .collect();
        stored.push(json!({
            "group_id": group_id,
            "group_name": group["group_name"],
            "projects": projects,
        }));
    }
    state.groups = stored;

    HttpResponse::Created().json(json!({"status": "success"}))
}

#[delete("/api/user/preferred")]
async fn delete_preferred(state: SharedState, body: web::Json<Value>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.deleted_bodies.push(body.0.clone());

    if state.failing.contains("delete_preferred") {
        return server_error();
    }

    let ids: Vec<i64> = body["preferred"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|g| g["group_id"].as_i64())
        .collect();
    state
        .groups
        .retain(|g| !g["group_id"].as_i64().is_some_and(|id| ids.contains(&id)));

    HttpResponse::Ok().json(json!({"status": "deleted"}))
}

#[post("/api/user/favourite")]
async fn mark_favourite(state: SharedState, body: web::Json<Value>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    if state.failing.contains("favourite") {
        return server_error();
    }

    let uuid = body["favourite"].as_str().unwrap_or_default().to_string();
    let name = state.project_names.get(&uuid).cloned().unwrap_or_default();
    let project = json!({"uuid": uuid, "name": name});

    let existing = state
        .groups
        .iter()
        .position(|g| g["group_name"] == "Favourites");
    match existing {
        Some(index) => {
            if let Some(projects) = state.groups[index]["projects"].as_array_mut() {
                projects.push(project);
            }
        }
        None => {
            state.next_group_id += 1;
            let group_id = state.next_group_id;
            state.groups.push(json!({
                "group_id": group_id,
                "group_name": "Favourites",
                "projects": [project],
            }));
        }
    }

    HttpResponse::Created().json(json!({"status": "success"}))
}

#[delete("/api/user/favourite/{uuid}")]
async fn unmark_favourite(state: SharedState, path: web::Path<String>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    if state.failing.contains("favourite") {
        return server_error();
    }

    let uuid = path.into_inner();
    for group in state.groups.iter_mut() {
        if let Some(projects) = group["projects"].as_array_mut() {
            projects.retain(|p| p["uuid"].as_str() != Some(uuid.as_str()));
        }
    }

    HttpResponse::Ok().json(json!({"status": "deleted"}))
}

// ============================================================================
// Preference
// ============================================================================

#[get("/api/user/preference")]
async fn get_preference(state: SharedState) -> HttpResponse {
    let state = state.lock().unwrap();
    if state.failing.contains("preference") {
        return server_error();
    }
    HttpResponse::Ok().json(state.preference.clone())
}

#[put("/api/user/preference")]
async fn put_preference(state: SharedState, body: web::Json<Value>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.preference_bodies.push(body.0.clone());
    if state.failing.contains("preference") {
        return server_error();
    }
    state.preference = json!({
        "IsDark": body["isDark"],
        "Timezone": body["timezone"],
    });
    HttpResponse::Ok().json(json!({"status": "success"}))
}

// ============================================================================
// Reports
// ============================================================================

#[get("/api/reports/projects/")]
async fn list_projects(state: SharedState) -> HttpResponse {
    let state = state.lock().unwrap();
    let mut projects: Vec<&String> = state.summaries.keys().collect();
    projects.sort();
    HttpResponse::Ok().json(json!({"projects": projects, "total": projects.len()}))
}

#[get("/api/reports/summary/{project}/")]
async fn project_summary(state: SharedState, path: web::Path<String>) -> HttpResponse {
    let state = state.lock().unwrap();
    match state.summaries.get(&path.into_inner()) {
        Some(rows) => HttpResponse::Ok().json(rows),
        None => HttpResponse::Ok().json(json!([])),
    }
}

#[get("/api/project/{uuid}/testruns")]
async fn project_test_runs(state: SharedState, path: web::Path<String>) -> HttpResponse {
    let state = state.lock().unwrap();
    let uuid = path.into_inner();
    if state.failing.contains("project_runs") {
        return server_error();
    }
    match state.project_runs.get(&uuid) {
        Some(runs) => HttpResponse::Ok().json(runs),
        None => HttpResponse::NotFound().json(json!({"error": "not found"})),
    }
}

// ============================================================================
// Server
// ============================================================================

/// Mock backend serving REST under `/api` and GraphQL at `/query`.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<Mutex<MockBackendState>>,
}

impl MockBackend {
    /// Start the mock backend on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockBackendState {
            preference: json!({"IsDark": false, "Timezone": "UTC"}),
            ..Default::default()
        }));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .service(graphql_endpoint)
                .service(get_preferred)
                .service(save_preferred)
                .service(delete_preferred)
                .service(mark_favourite)
                .service(unmark_favourite)
                .service(get_preference)
                .service(put_preference)
                .service(list_projects)
                .service(project_summary)
                .service(project_test_runs)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Fire and forget, the server lives for the process lifetime
        tokio::spawn(server);

        MockBackend { base_url, state }
    }

    /// Development config pointing at this backend.
    pub fn config(&self) -> Config {
        Config::development(
            &format!("{}/api", self.base_url),
            &format!("{}/query", self.base_url),
        )
    }

    pub fn fail(&self, endpoint: &'static str) {
        self.state.lock().unwrap().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.state.lock().unwrap().failing.remove(endpoint);
    }

    /// Seed `count` runs with ids `count..=1`, newest first.
    ///
    /// Every run has one suite with specs passed, skipped, passed, failed;
    /// the skipped and failed specs carry tags 1 and 2.
    pub fn seed_test_runs(&self, count: i64) {
        let runs = (1..=count).rev().map(test_run_json).collect();
        self.state.lock().unwrap().test_runs = runs;
    }

    /// Register a persisted group whose projects are `(uuid, name)` pairs.
    pub fn seed_group(&self, group_id: i64, name: &str, projects: &[(&str, &str)]) {
        let mut state = self.state.lock().unwrap();
        for (uuid, project_name) in projects {
            state
                .project_names
                .insert(uuid.to_string(), project_name.to_string());
        }
        let projects: Vec<Value> = projects
            .iter()
            .map(|(uuid, name)| json!({"uuid": uuid, "name": name}))
            .collect();
        state.groups.push(json!({
            "group_id": group_id,
            "group_name": name,
            "projects": projects,
        }));
        state.next_group_id = state.next_group_id.max(group_id);
    }

    pub fn register_project(&self, uuid: &str, name: &str) {
        self.state
            .lock()
            .unwrap()
            .project_names
            .insert(uuid.to_string(), name.to_string());
    }
}

fn test_run_json(id: i64) -> Value {
    let tags = json!([{"id": 1, "name": "Tag1"}, {"id": 2, "name": "Tag2"}]);
    json!({
        "id": id,
        "testProjectName": "Atmos Acceptance Tests",
        "testSeed": 1717396142,
        "startTime": "2024-06-03T06:29:02Z",
        "endTime": "2024-06-03T06:34:02Z",
        "suiteRuns": [{
            "id": id,
            "testRunId": id,
            "suiteName": "Adding tests",
            "startTime": "2024-06-03T06:29:02Z",
            "endTime": "2024-06-03T06:34:02Z",
            "specRuns": [
                {"id": id * 10 + 1, "suiteId": id, "specDescription": "adds", "status": "passed", "message": "", "tags": null},
                {"id": id * 10 + 2, "suiteId": id, "specDescription": "skips", "status": "skipped", "message": "", "tags": tags},
                {"id": id * 10 + 3, "suiteId": id, "specDescription": "adds again", "status": "passed", "message": "", "tags": []},
                {"id": id * 10 + 4, "suiteId": id, "specDescription": "fails", "status": "failed", "message": "expected 2", "tags": tags},
            ]
        }]
    })
}
