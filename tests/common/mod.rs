//! In-process mock of the Harbor endpoints the client talks to.
//!
//! Login hands out `sid` cookies; every `api/` route rejects requests
//! without a live one. Tests can expire all sessions to simulate a server
//! restart or timeout, and read how many logins and session checks happened.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "Harbor12345";

#[derive(Default)]
pub struct Harbor {
    sessions: HashSet<String>,
    next_sid: u64,
    next_id: i64,
    pub logins: usize,
    pub probes: usize,
    expire_after_check: bool,
    projects: BTreeMap<i64, Value>,
    repositories: Vec<Value>,
    tags: BTreeMap<String, Vec<Value>>,
}

type Shared = Arc<Mutex<Harbor>>;

pub struct MockHarbor {
    pub url: String,
    state: Shared,
}

impl MockHarbor {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(Harbor {
            next_id: 1,
            ..Default::default()
        }));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn logins(&self) -> usize {
        self.state.lock().unwrap().logins
    }

    pub fn probes(&self) -> usize {
        self.state.lock().unwrap().probes
    }

    pub fn expire_sessions(&self) {
        self.state.lock().unwrap().sessions.clear();
    }

    /// The next session check succeeds, then every session is dropped, so
    /// the call that follows it is rejected.
    pub fn expire_sessions_after_next_check(&self) {
        self.state.lock().unwrap().expire_after_check = true;
    }

    pub fn add_repository(&self, id: i64, project_id: i64, name: &str, tags: &[&str]) {
        let mut harbor = self.state.lock().unwrap();
        harbor.repositories.push(json!({
            "id": id,
            "name": name,
            "project_id": project_id,
            "description": "",
            "pull_count": 3,
            "star_count": 0,
            "tags_count": tags.len(),
            "creation_time": "2019-05-10T08:21:54Z",
            "update_time": "2019-05-10T08:21:54Z"
        }));
        let tags = tags
            .iter()
            .map(|t| {
                json!({
                    "name": t,
                    "size": 1024,
                    "digest": format!("sha256:{t}"),
                    "author": "ops",
                    "created": "2019-05-10T08:21:54Z"
                })
            })
            .collect();
        harbor.tags.insert(name.to_string(), tags);
    }
}

fn app(state: Shared) -> Router {
    Router::new()
        .route("/c/login", post(login))
        .route("/api/users/current", get(current_user))
        .route(
            "/api/projects",
            get(list_projects).head(check_project).post(create_project),
        )
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/repositories", get(list_repositories))
        .route(
            "/api/repositories/{*rest}",
            get(get_repository_path).delete(delete_repository_path),
        )
        .with_state(state)
}

fn authorized(state: &Shared, headers: &HeaderMap) -> bool {
    let Some(cookie) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let harbor = state.lock().unwrap();
    cookie
        .split(';')
        .filter_map(|pair| pair.trim().strip_prefix("sid="))
        .any(|sid| harbor.sessions.contains(sid))
}

macro_rules! require_session {
    ($state:expr, $headers:expr) => {
        if !authorized(&$state, &$headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };
}

#[derive(Deserialize)]
struct LoginForm {
    principal: String,
    password: String,
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    if form.principal != USERNAME || form.password != PASSWORD {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut harbor = state.lock().unwrap();
    harbor.logins += 1;
    harbor.next_sid += 1;
    let sid = format!("session-{}", harbor.next_sid);
    harbor.sessions.insert(sid.clone());
    (
        StatusCode::OK,
        [(header::SET_COOKIE, format!("sid={sid}; Path=/; HttpOnly"))],
    )
        .into_response()
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.lock().unwrap().probes += 1;
    require_session!(state, headers);
    let mut harbor = state.lock().unwrap();
    if harbor.expire_after_check {
        harbor.expire_after_check = false;
        harbor.sessions.clear();
    }
    Json(json!({"user_id": 1, "username": USERNAME})).into_response()
}

#[derive(Deserialize)]
struct ProjectQuery {
    name: Option<String>,
    project_name: Option<String>,
}

async fn list_projects(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<ProjectQuery>,
) -> Response {
    require_session!(state, headers);
    let filter = query.name.unwrap_or_default();
    let harbor = state.lock().unwrap();
    let projects: Vec<Value> = harbor
        .projects
        .values()
        .filter(|p| p["name"].as_str().unwrap_or_default().contains(&filter))
        .cloned()
        .collect();
    Json(projects).into_response()
}

async fn check_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<ProjectQuery>,
) -> Response {
    require_session!(state, headers);
    let name = query.project_name.unwrap_or_default();
    let harbor = state.lock().unwrap();
    if harbor.projects.values().any(|p| p["name"] == name.as_str()) {
        StatusCode::OK.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn create_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    require_session!(state, headers);
    let Some(name) = body["project_name"].as_str().map(str::to_string) else {
        return (StatusCode::BAD_REQUEST, "project_name is required").into_response();
    };
    let mut harbor = state.lock().unwrap();
    if harbor.projects.values().any(|p| p["name"] == name.as_str()) {
        return (StatusCode::CONFLICT, "project already exists").into_response();
    }
    let id = harbor.next_id;
    harbor.next_id += 1;
    let metadata = body.get("metadata").cloned().unwrap_or_else(|| json!({}));
    harbor.projects.insert(
        id,
        json!({
            "project_id": id,
            "owner_id": 1,
            "name": name,
            "creation_time": "2019-05-10T08:21:54Z",
            "update_time": "2019-05-10T08:21:54Z",
            "deleted": false,
            "owner_name": USERNAME,
            "togglable": true,
            "current_user_role_id": 1,
            "repo_count": 0,
            "chart_count": 0,
            "metadata": metadata
        }),
    );
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/projects/{id}"))],
    )
        .into_response()
}

async fn get_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    require_session!(state, headers);
    let harbor = state.lock().unwrap();
    match harbor.projects.get(&id) {
        Some(project) => Json(project.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn update_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    require_session!(state, headers);
    let mut harbor = state.lock().unwrap();
    let Some(project) = harbor.projects.get_mut(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(metadata) = body.get("metadata") {
        project["metadata"] = metadata.clone();
    }
    StatusCode::OK.into_response()
}

async fn delete_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    require_session!(state, headers);
    let mut harbor = state.lock().unwrap();
    match harbor.projects.remove(&id) {
        Some(_) => StatusCode::OK.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Deserialize)]
struct RepositoryQuery {
    project_id: i64,
}

async fn list_repositories(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<RepositoryQuery>,
) -> Response {
    require_session!(state, headers);
    let harbor = state.lock().unwrap();
    let repos: Vec<Value> = harbor
        .repositories
        .iter()
        .filter(|r| r["project_id"] == query.project_id)
        .cloned()
        .collect();
    Json(repos).into_response()
}

async fn get_repository_path(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(rest): Path<String>,
) -> Response {
    require_session!(state, headers);
    let Some(name) = rest.strip_suffix("/tags") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let harbor = state.lock().unwrap();
    match harbor.tags.get(name) {
        Some(tags) => Json(tags.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_repository_path(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(rest): Path<String>,
) -> Response {
    require_session!(state, headers);
    let mut harbor = state.lock().unwrap();

    if let Some((name, tag)) = rest.split_once("/tags/") {
        let Some(tags) = harbor.tags.get_mut(name) else {
            return StatusCode::NOT_FOUND.into_response();
        };
        let before = tags.len();
        tags.retain(|t| t["name"] != tag);
        if tags.len() == before {
            return StatusCode::NOT_FOUND.into_response();
        }
        return StatusCode::OK.into_response();
    }

    let before = harbor.repositories.len();
    harbor.repositories.retain(|r| r["name"] != rest.as_str());
    if harbor.repositories.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    harbor.tags.remove(&rest);
    StatusCode::OK.into_response()
}
