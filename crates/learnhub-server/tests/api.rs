use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use learnhub_config::ServerConfig;
use learnhub_server::{AppState, router};
use learnhub_store::Store;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let store = Store::in_memory().await.unwrap();
    router(AppState::new(store), &ServerConfig::default())
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

async fn register(app: &Router, email: &str) -> Value {
    let (status, user) = call(
        app,
        Method::POST,
        "/api/register",
        Some(json!({
            "email": email,
            "password": "secret",
            "name": "Ada",
            "phone": "555-0100"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{user}");
    user
}

async fn create_course(app: &Router, title: &str) -> Value {
    let (status, course) = call(
        app,
        Method::POST,
        "/api/courses",
        Some(json!({
            "title": title,
            "description": "Learn it",
            "modules": [{
                "id": "m1",
                "title": "Basics",
                "videos": [{"id": "v1", "title": "Intro"}, {"id": "v2", "title": "Next"}]
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{course}");
    course
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn register_and_login_never_return_the_password() {
    let app = app().await;
    let user = register(&app, "ada@example.com").await;
    assert_eq!(user["role"], "student");
    assert_eq!(user["status"], "inactive");
    assert!(user.get("password").is_none());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({"email": "ada@example.com", "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user["id"]);
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn bad_login_is_unauthorized() {
    let app = app().await;
    register(&app, "ada@example.com").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({"email": "ada@example.com", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid credentials"}));
}

#[tokio::test]
async fn duplicate_registration_is_a_bad_request() {
    let app = app().await;
    register(&app, "ada@example.com").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/register",
        Some(json!({"email": "ada@example.com", "password": "x", "name": "A", "phone": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Email already exists"}));

    let (_, users) = call(&app, Method::GET, "/api/users", None).await;
    assert_eq!(users.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn malformed_and_missing_course_ids() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/api/courses/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid course ID"}));

    let missing = uuid::Uuid::new_v4();
    let (status, body) = call(&app, Method::GET, &format!("/api/courses/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Course not found"}));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/courses")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn course_crud_and_search() {
    let app = app().await;
    let course = create_course(&app, "Rust for beginners").await;
    create_course(&app, "Go in practice").await;
    let id = course["id"].as_str().unwrap();

    let (status, found) = call(&app, Method::GET, "/api/courses?q=RUST", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/api/courses/{id}"),
        Some(json!({"status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "active");
    assert_eq!(updated["title"], "Rust for beginners");

    let (_, active) = call(&app, Method::GET, "/api/courses?status=active", None).await;
    assert_eq!(active.as_array().map(Vec::len), Some(1));

    let (status, body) = call(&app, Method::DELETE, &format!("/api/courses/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    let (status, _) = call(&app, Method::GET, &format!("/api/courses/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_title_is_a_bad_request() {
    let app = app().await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/courses",
        Some(json!({"title": "", "description": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing required field: title"}));
}

#[tokio::test]
async fn enroll_twice_counts_once() {
    let app = app().await;
    let user = register(&app, "ada@example.com").await;
    let course = create_course(&app, "Rust").await;
    let pair = json!({"studentId": user["id"], "courseId": course["id"]});

    for _ in 0..2 {
        let (status, body) = call(&app, Method::POST, "/api/enrollments", Some(pair.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }

    let course_id = course["id"].as_str().unwrap();
    let (_, fetched) = call(&app, Method::GET, &format!("/api/courses/{course_id}"), None).await;
    assert_eq!(fetched["enrolledStudents"], 1);

    let user_id = user["id"].as_str().unwrap();
    let (_, ids) = call(&app, Method::GET, &format!("/api/enrollments/{user_id}"), None).await;
    assert_eq!(ids, json!([course_id]));

    let (_, me) = call(&app, Method::GET, &format!("/api/users/{user_id}"), None).await;
    assert_eq!(me["status"], "active");

    for _ in 0..2 {
        call(&app, Method::DELETE, "/api/enrollments", Some(pair.clone())).await;
    }
    let (_, fetched) = call(&app, Method::GET, &format!("/api/courses/{course_id}"), None).await;
    assert_eq!(fetched["enrolledStudents"], 0);
}

#[tokio::test]
async fn request_approval_flow() {
    let app = app().await;
    let user = register(&app, "ada@example.com").await;
    let course = create_course(&app, "Rust").await;
    let pair = json!({"studentId": user["id"], "courseId": course["id"]});
    let access_uri = format!(
        "/api/access/{}/{}",
        user["id"].as_str().unwrap(),
        course["id"].as_str().unwrap()
    );

    let (status, body) = call(&app, Method::POST, "/api/requests/approve", Some(pair.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    call(&app, Method::POST, "/api/requests", Some(pair.clone())).await;
    let (_, state) = call(&app, Method::GET, &access_uri, None).await;
    assert_eq!(state, json!({"state": "requested"}));

    let uri = format!("/api/requests?studentId={}", user["id"].as_str().unwrap());
    let (_, pending) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));

    let (status, _) = call(&app, Method::POST, "/api/requests/approve", Some(pair)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, state) = call(&app, Method::GET, &access_uri, None).await;
    assert_eq!(state, json!({"state": "enrolled"}));
    let (_, pending) = call(&app, Method::GET, "/api/requests", None).await;
    assert_eq!(pending, json!([]));
    let (_, stats) = call(&app, Method::GET, "/api/stats", None).await;
    assert_eq!(stats["totalEnrollments"], 1);
    assert_eq!(stats["pendingRequests"], 0);
}

#[tokio::test]
async fn progress_marking_and_summary() {
    let app = app().await;
    let user = register(&app, "ada@example.com").await;
    let course = create_course(&app, "Rust").await;
    let base = format!(
        "/api/progress/{}/{}",
        user["id"].as_str().unwrap(),
        course["id"].as_str().unwrap()
    );

    let (_, empty) = call(&app, Method::GET, &base, None).await;
    assert_eq!(empty, json!({"watched": []}));

    for _ in 0..2 {
        let (status, body) = call(&app, Method::POST, &format!("{base}/v1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"watched": ["v1"]}));
    }

    let (_, summary) = call(&app, Method::GET, &format!("{base}/summary"), None).await;
    assert_eq!(summary["percent"], 50);
    assert_eq!(summary["completed"], false);
    assert_eq!(summary["nextVideo"]["video"]["id"], "v2");
}

#[tokio::test]
async fn a_video_named_summary_can_be_marked() {
    let app = app().await;
    let user = register(&app, "ada@example.com").await;
    let course = create_course(&app, "Rust").await;
    let base = format!(
        "/api/progress/{}/{}",
        user["id"].as_str().unwrap(),
        course["id"].as_str().unwrap()
    );

    let (status, body) = call(&app, Method::POST, &format!("{base}/summary"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"watched": ["summary"]}));

    let (status, summary) = call(&app, Method::GET, &format!("{base}/summary"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["watched"], json!(["summary"]));
    assert_eq!(summary["watchedCount"], 0);
}

#[tokio::test]
async fn unknown_routes_answer_with_json_errors() {
    let app = app().await;

    let (status, body) = call(&app, Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));

    let (status, body) = call(&app, Method::GET, "/elsewhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));

    let (status, body) = call(&app, Method::PATCH, "/api/courses", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "Method not allowed"}));
}

#[tokio::test]
async fn progress_rejects_malformed_ids() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/api/progress/abc/def", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid user or course ID"}));
}

#[tokio::test]
async fn reset_password_requires_matching_phone() {
    let app = app().await;
    register(&app, "ada@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/reset-password",
        Some(json!({"email": "ada@example.com", "phone": "000", "newPassword": "n"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found or phone number does not match."}));

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/reset-password",
        Some(json!({"email": "ada@example.com", "phone": "555-0100", "newPassword": "n"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({"email": "ada@example.com", "password": "n"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_user_management() {
    let app = app().await;
    let (status, admin) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({
            "email": "root@example.com",
            "password": "pw",
            "name": "Root",
            "phone": "1",
            "role": "admin"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{admin}");
    assert_eq!(admin["status"], "active");
    let id = admin["id"].as_str().unwrap();

    let (_, updated) = call(
        &app,
        Method::PUT,
        &format!("/api/users/{id}"),
        Some(json!({"name": "Admin"})),
    )
    .await;
    assert_eq!(updated["name"], "Admin");
    assert_eq!(updated["email"], "root@example.com");

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/users/{id}"),
        Some(json!({"phone": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing required field: phone"}));

    let (status, _) = call(&app, Method::DELETE, &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::GET, &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));
}
