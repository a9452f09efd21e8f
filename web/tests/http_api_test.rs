//! End-to-end HTTP tests over the router with in-memory providers.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use learngate_entitlements::mocks::{MockCatalog, MockNotificationSink, MockTicketStore};
use learngate_entitlements::{
    Content, ContentId, ContentLink, Course, CourseId, Environment, Package, PackageId,
    PackageType, Principal, Role, UserId,
};
use learngate_web::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

struct TestApp {
    server: TestServer,
    course_id: CourseId,
    package_id: PackageId,
}

fn user_principal() -> Principal {
    Principal {
        id: UserId::new(),
        role: Role::User,
        email: "learner@example.com".to_string(),
    }
}

fn admin_principal() -> Principal {
    Principal {
        id: UserId::new(),
        role: Role::Admin,
        email: "admin@example.com".to_string(),
    }
}

fn spawn_app(package_type: PackageType, mock_items: u32) -> TestApp {
    let catalog = MockCatalog::new();
    let course_id = CourseId::new();
    let package_id = PackageId::new();
    catalog.add_course(Course {
        id: course_id,
        title: "Thermodynamics".to_string(),
        description: "Heat and entropy".to_string(),
        image: "https://cdn.example.com/thermo.png".to_string(),
        packages: vec![],
    });
    catalog.add_package(Package {
        id: package_id,
        course_id,
        name: "Exam bundle".to_string(),
        price: 9900,
        start: Utc::now(),
        end: Utc::now() + Duration::days(90),
        package_type,
        mock_prices: vec![],
    });
    for week in 1..=mock_items {
        catalog.add_content(Content {
            id: ContentId::new(),
            course_id,
            package_id,
            topic: format!("Week {week}"),
            week_no: week,
            lecture_no: 1,
            link: ContentLink::Mock(format!("https://mocks.example.com/{week}")),
        });
    }

    let env = Environment::new(MockTicketStore::new(), catalog, MockNotificationSink::new());
    let app = router(Arc::new(AppState::new(env)));
    let server = TestServer::new(app).expect("router should build");
    TestApp {
        server,
        course_id,
        package_id,
    }
}

fn identity_headers(principal: &Principal) -> Vec<(HeaderName, HeaderValue)> {
    vec![
        (
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(&principal.id.0.to_string()).expect("valid header"),
        ),
        (
            HeaderName::from_static("x-user-role"),
            HeaderValue::from_static(match principal.role {
                Role::User => "user",
                Role::Admin => "admin",
            }),
        ),
        (
            HeaderName::from_static("x-user-email"),
            HeaderValue::from_str(&principal.email).expect("valid header"),
        ),
    ]
}

fn ticket_body(app: &TestApp) -> Value {
    json!({
        "course_id": app.course_id.0,
        "package_id": app.package_id.0,
        "paid_through": "bank transfer",
        "price_paid": 9900,
        "receipt": "TXN-7",
        "mocks_purchased": 2,
    })
}

async fn create_ticket(app: &TestApp, principal: &Principal) -> Value {
    let mut request = app.server.post("/api/tickets");
    for (name, value) in identity_headers(principal) {
        request = request.add_header(name, value);
    }
    let response = request.json(&ticket_body(app)).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

async fn approve_ticket(app: &TestApp, admin: &Principal, ticket_id: &str) {
    let mut request = app
        .server
        .put(&format!("/api/tickets/{ticket_id}/approve"));
    for (name, value) in identity_headers(admin) {
        request = request.add_header(name, value);
    }
    let response = request.await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn health_needs_no_identity() {
    let app = spawn_app(PackageType::Standard, 0);
    let response = app.server.get("/health").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn api_routes_reject_missing_identity() {
    let app = spawn_app(PackageType::Standard, 0);

    let response = app.server.post("/api/tickets").json(&ticket_body(&app)).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app.server.get("/api/tickets/mine").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ticket_create_and_duplicate_conflict() {
    let app = spawn_app(PackageType::Standard, 0);
    let user = user_principal();

    let body = create_ticket(&app, &user).await;
    assert_eq!(body["ticket"]["status"], "pending");
    assert_eq!(body["notification_sent"], true);

    let mut request = app.server.post("/api/tickets");
    for (name, value) in identity_headers(&user) {
        request = request.add_header(name, value);
    }
    let response = request.json(&ticket_body(&app)).await;
    response.assert_status(StatusCode::CONFLICT);
    let error = response.json::<Value>();
    assert_eq!(error["code"], "CONFLICT");
}

#[tokio::test]
async fn ticket_create_rejects_bad_input() {
    let app = spawn_app(PackageType::Standard, 0);
    let user = user_principal();

    let mut request = app.server.post("/api/tickets");
    for (name, value) in identity_headers(&user) {
        request = request.add_header(name, value);
    }
    let mut body = ticket_body(&app);
    body["email"] = json!("not-an-email");
    let response = request.json(&body).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn approval_flow_grants_access() {
    let app = spawn_app(PackageType::Standard, 0);
    let user = user_principal();
    let admin = admin_principal();

    let created = create_ticket(&app, &user).await;
    let ticket_id = created["ticket"]["id"].as_str().expect("id").to_string();

    // Listing the queue is admin-only.
    let mut request = app.server.get("/api/tickets");
    for (name, value) in identity_headers(&user) {
        request = request.add_header(name, value);
    }
    request.await.assert_status(StatusCode::FORBIDDEN);

    let mut request = app.server.get("/api/tickets");
    for (name, value) in identity_headers(&admin) {
        request = request.add_header(name, value);
    }
    let queue = request.await.json::<Value>();
    assert_eq!(queue["tickets"].as_array().expect("array").len(), 1);
    assert_eq!(queue["tickets"][0]["course_title"], "Thermodynamics");

    // A non-admin cannot approve.
    let mut request = app
        .server
        .put(&format!("/api/tickets/{ticket_id}/approve"));
    for (name, value) in identity_headers(&user) {
        request = request.add_header(name, value);
    }
    request.await.assert_status(StatusCode::FORBIDDEN);

    // Access flips from false to true on approval.
    let access_path = format!(
        "/api/access?course_id={}&package_id={}",
        app.course_id.0, app.package_id.0
    );
    let mut request = app.server.get(&access_path);
    for (name, value) in identity_headers(&user) {
        request = request.add_header(name, value);
    }
    assert_eq!(request.await.json::<Value>()["allowed"], false);

    approve_ticket(&app, &admin, &ticket_id).await;

    let mut request = app.server.get(&access_path);
    for (name, value) in identity_headers(&user) {
        request = request.add_header(name, value);
    }
    assert_eq!(request.await.json::<Value>()["allowed"], true);
}

#[tokio::test]
async fn mock_content_is_sorted_and_quota_truncated() {
    let app = spawn_app(PackageType::Mock, 20);
    let user = user_principal();
    let admin = admin_principal();

    let created = create_ticket(&app, &user).await;
    let ticket_id = created["ticket"]["id"].as_str().expect("id").to_string();
    approve_ticket(&app, &admin, &ticket_id).await;

    // 2 units purchased at 8 per unit: 16 of the 20 items.
    let content_path = format!(
        "/api/content?course_id={}&package_id={}",
        app.course_id.0, app.package_id.0
    );
    let mut request = app.server.get(&content_path);
    for (name, value) in identity_headers(&user) {
        request = request.add_header(name, value);
    }
    let body = request.await.json::<Value>();
    let content = body["content"].as_array().expect("array");
    assert_eq!(content.len(), 16);
    assert_eq!(content[0]["topic"], "Week 1");
    assert_eq!(content[15]["topic"], "Week 16");
    assert_eq!(content[0]["content_type"], "mock");

    // Admins see everything.
    let mut request = app.server.get(&content_path);
    for (name, value) in identity_headers(&admin) {
        request = request.add_header(name, value);
    }
    let body = request.await.json::<Value>();
    assert_eq!(body["content"].as_array().expect("array").len(), 20);
}

#[tokio::test]
async fn content_listing_requires_an_entitlement() {
    let app = spawn_app(PackageType::Standard, 0);
    let user = user_principal();

    let content_path = format!(
        "/api/content?course_id={}&package_id={}",
        app.course_id.0, app.package_id.0
    );
    let mut request = app.server.get(&content_path);
    for (name, value) in identity_headers(&user) {
        request = request.add_header(name, value);
    }
    request.await.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_revokes_access_and_drift_is_reported() {
    let app = spawn_app(PackageType::Standard, 0);
    let user = user_principal();
    let admin = admin_principal();

    let created = create_ticket(&app, &user).await;
    let ticket_id = created["ticket"]["id"].as_str().expect("id").to_string();
    approve_ticket(&app, &admin, &ticket_id).await;

    let mut request = app.server.delete(&format!("/api/tickets/{ticket_id}"));
    for (name, value) in identity_headers(&admin) {
        request = request.add_header(name, value);
    }
    request.await.assert_status(StatusCode::NO_CONTENT);

    // No approved ticket, no access.
    let access_path = format!(
        "/api/access?course_id={}&package_id={}",
        app.course_id.0, app.package_id.0
    );
    let mut request = app.server.get(&access_path);
    for (name, value) in identity_headers(&user) {
        request = request.add_header(name, value);
    }
    assert_eq!(request.await.json::<Value>()["allowed"], false);

    // The stale cache entry shows up in the drift report.
    let mut request = app
        .server
        .get(&format!("/api/users/{}/entitlement-drift", user.id.0));
    for (name, value) in identity_headers(&admin) {
        request = request.add_header(name, value);
    }
    let body = request.await.json::<Value>();
    assert_eq!(body["orphaned"].as_array().expect("array").len(), 1);
}
