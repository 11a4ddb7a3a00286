use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rusqlite::Connection;
use scheduler_core::db::open_db_in_memory;
use scheduler_server::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    _web_dir: TempDir,
}

impl TestApp {
    fn new(password: Option<&str>) -> Self {
        Self::with_connection(open_db_in_memory().unwrap(), password)
    }

    fn with_connection(conn: Connection, password: Option<&str>) -> Self {
        let web_dir = tempfile::tempdir().unwrap();
        std::fs::write(web_dir.path().join("index.html"), "<h1>scheduler</h1>").unwrap();
        let state = AppState::new(conn, password.map(str::to_string));
        Self {
            router: build_router(state, web_dir.path()),
            _web_dir: web_dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Bytes) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn send_json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, bytes) = self
            .send(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, bytes) = self.get(uri).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create(&self, task: Value) -> String {
        let (status, body) = self.send_json(Method::POST, "/api/task", task).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn next_date_returns_bare_date() {
    let app = TestApp::new(None);

    let (status, body) = app
        .get("/api/nextdate?now=20240126&date=20240113&repeat=d%207")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "20240127");

    let (status, body) = app
        .get("/api/nextdate?now=20240126&date=20240229&repeat=y")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "20250228");
}

#[tokio::test]
async fn next_date_rejects_bad_input_with_error_payload() {
    let app = TestApp::new(None);

    for uri in [
        "/api/nextdate?now=26.01.2024&date=20240113&repeat=d%207",
        "/api/nextdate?now=20240126&date=20240113&repeat=",
        "/api/nextdate?now=20240126&date=20240113&repeat=d%20401",
        "/api/nextdate?now=20240126&date=2024&repeat=y",
    ] {
        let (status, body) = app.get_json(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()), "{uri}");
    }
}

#[tokio::test]
async fn task_lifecycle_over_http() {
    let app = TestApp::new(None);

    let id = app
        .create(json!({"date": "20990101", "title": "water plants", "comment": "balcony", "repeat": "d 3"}))
        .await;

    let (status, task) = app.get_json(&format!("/api/task?id={id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        task,
        json!({"id": id, "date": "20990101", "title": "water plants", "comment": "balcony", "repeat": "d 3"})
    );

    let (status, updated) = app
        .send_json(
            Method::PUT,
            "/api/task",
            json!({"id": id, "date": "20990201", "title": "water all plants", "comment": "", "repeat": "d 3"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "water all plants");

    let (status, done) = app
        .send_json(Method::POST, &format!("/api/task/done?id={id}"), json!(null))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done, json!({}));
    let (_, task) = app.get_json(&format!("/api/task?id={id}")).await;
    assert_eq!(task["date"], "20990204");

    let (status, deleted) = app
        .send_json(Method::DELETE, &format!("/api/task?id={id}"), json!(null))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({}));

    let (status, body) = app.get_json(&format!("/api/task?id={id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn completing_one_off_task_deletes_it() {
    let app = TestApp::new(None);
    let id = app
        .create(json!({"date": "20990101", "title": "renew passport"}))
        .await;

    let (status, _) = app
        .send_json(Method::POST, &format!("/api/task/done?id={id}"), json!(null))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get_json(&format!("/api/task?id={id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .send_json(Method::POST, &format!("/api/task/done?id={id}"), json!(null))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_payloads_are_client_errors() {
    let app = TestApp::new(None);

    let (status, body) = app
        .send_json(Method::POST, "/api/task", json!({"date": "20990101", "title": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title is required");

    let (status, body) = app
        .send_json(Method::POST, "/api/task", json!({"title": "x", "repeat": "w 1"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("w 1"));

    let (status, bytes) = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/task")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("error parsing JSON"));

    let (status, _) = app
        .send_json(Method::PUT, "/api/task", json!({"title": "no id"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send_json(
            Method::PUT,
            "/api/task",
            json!({"id": "12345", "date": "20990101", "title": "ghost"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get_json("/api/task").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn task_listing_routes_search_terms() {
    let app = TestApp::new(None);

    let (status, body) = app.get_json("/api/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"tasks": []}));

    app.create(json!({"date": "20991225", "title": "gifts"})).await;
    app.create(json!({"date": "20990301", "title": "buy milk", "comment": "oat"}))
        .await;

    let titles = |body: &Value| -> Vec<String> {
        body["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|task| task["title"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, all) = app.get_json("/api/tasks").await;
    assert_eq!(titles(&all), ["buy milk", "gifts"]);

    let (_, by_date) = app.get_json("/api/tasks?search=25.12.2099").await;
    assert_eq!(titles(&by_date), ["gifts"]);

    let (_, by_text) = app.get_json("/api/tasks?search=oat").await;
    assert_eq!(titles(&by_text), ["buy milk"]);
}

#[tokio::test]
async fn password_protects_api_but_not_signin_or_static_files() {
    let app = TestApp::new(Some("hunter2"));

    let (status, body) = app.get_json("/api/tasks").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, body) = app
        .send_json(Method::POST, "/api/signin", json!({"password": "wrong"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "wrong password"}));

    let (status, body) = app
        .send_json(Method::POST, "/api/signin", json!({"password": "hunter2"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Request::builder()
                .uri("/api/tasks")
                .header(header::COOKIE, format!("token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Request::builder()
                .uri("/api/tasks")
                .header(header::COOKIE, "token=forged.token.value")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>scheduler</h1>");
}

#[tokio::test]
async fn without_password_api_is_open() {
    let app = TestApp::new(None);

    let (status, _) = app.get_json("/api/tasks").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn storage_failure_is_opaque_server_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO scheduler (date, title) VALUES ('garbage', 'secret title');",
        [],
    )
    .unwrap();
    let app = TestApp::with_connection(conn, None);

    let (status, bytes) = app.get("/api/tasks").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "internal server error"}));
    let raw = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!raw.contains("garbage"));
    assert!(!raw.contains("secret title"));
}

#[tokio::test]
async fn malformed_query_string_returns_error_payload() {
    let app = TestApp::new(None);
    let id = app
        .create(json!({"date": "20990101", "title": "keep me"}))
        .await;

    let (status, body) = app
        .send_json(Method::DELETE, &format!("/api/task?id={id}&id=2"), json!(null))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("error parsing query"));

    let (status, _) = app.get_json(&format!("/api/task?id={id}")).await;
    assert_eq!(status, StatusCode::OK);
}
