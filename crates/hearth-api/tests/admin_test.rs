//! Staff back office integration tests: auth, inquiry workflow, notifications,
//! testimonials, media and profile.
//!
//! Run with: `cargo test -p hearth-api --test admin_test`

mod helpers;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::multipart::MultipartForm;
use hearth_core::models::{NewTestimonial, TestimonialStatus};
use hearth_db::{StaffRepositoryTrait, TestimonialRepositoryTrait};
use helpers::fixtures::png_part;
use helpers::{create_staff, setup_test_app, TestApp};
use serde_json::json;

async fn submit_contact(app: &TestApp, name: &str) -> uuid::Uuid {
    app.client()
        .post("/contact")
        .form(&[
            ("name", name),
            ("email", "visitor@example.com"),
            ("message", "Please call me back"),
        ])
        .await
        .assert_status(StatusCode::SEE_OTHER);
    let list: serde_json::Value = app
        .client()
        .get("/admin/inquiries")
        .authorization_bearer(app.bearer())
        .await
        .json();
    list["data"][0]["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_admin_requires_token() {
    let app = setup_test_app().await;

    let response = app.client().get("/admin/inquiries").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");

    let response = app
        .client()
        .get("/admin/inquiries")
        .authorization_bearer(format!("{}.{}", app.staff.user.id, "0".repeat(64)))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_browser_without_token_is_sent_to_login() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/admin/blog-posts")
        .add_header(header::ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"))
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn test_deactivated_staff_token_is_rejected() {
    let app = setup_test_app().await;
    StaffRepositoryTrait::set_active(&*app.db, app.staff.user.id, false)
        .await
        .unwrap();

    let response = app
        .client()
        .get("/admin/inquiries")
        .authorization_bearer(app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_marking_read_twice_keeps_first_timestamp() {
    let app = setup_test_app().await;
    let id = submit_contact(&app, "Maria Reyes").await;

    let first: serde_json::Value = app
        .client()
        .patch(&format!("/admin/inquiries/{}/read", id))
        .authorization_bearer(app.bearer())
        .await
        .json();
    assert_eq!(first["status"], "read");
    let read_at = first["read_at"].clone();
    assert!(read_at.is_string());

    let second: serde_json::Value = app
        .client()
        .patch(&format!("/admin/inquiries/{}/read", id))
        .authorization_bearer(app.bearer())
        .await
        .json();
    assert_eq!(second["read_at"], read_at);

    let replied: serde_json::Value = app
        .client()
        .patch(&format!("/admin/inquiries/{}/status", id))
        .authorization_bearer(app.bearer())
        .json(&json!({ "status": "replied" }))
        .await
        .json();
    assert_eq!(replied["status"], "replied");
    assert_eq!(replied["read_at"], read_at);
    assert!(replied["replied_at"].is_string());
}

#[tokio::test]
async fn test_unknown_status_is_rejected() {
    let app = setup_test_app().await;
    let id = submit_contact(&app, "Maria Reyes").await;

    let response = app
        .client()
        .patch(&format!("/admin/inquiries/{}/status", id))
        .authorization_bearer(app.bearer())
        .json(&json!({ "status": "archived" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert!(body["errors"]["status"].is_string());
}

#[tokio::test]
async fn test_deleting_missing_inquiry_is_not_found() {
    let app = setup_test_app().await;

    app.client()
        .delete(&format!("/admin/inquiries/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(app.bearer())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notification_survives_deleted_inquiry() {
    let app = setup_test_app().await;
    let id = submit_contact(&app, "Maria Reyes").await;
    assert_eq!(app.drain_jobs().await, 1);

    let inbox: serde_json::Value = app
        .client()
        .get("/admin/notifications")
        .authorization_bearer(app.bearer())
        .await
        .json();
    assert_eq!(inbox["unread_count"], 1);
    assert_eq!(inbox["data"][0]["type"], "new_inquiry");
    assert_eq!(inbox["data"][0]["source_available"], true);
    assert_eq!(inbox["data"][0]["data"]["name"], "Maria Reyes");

    app.client()
        .delete(&format!("/admin/inquiries/{}", id))
        .authorization_bearer(app.bearer())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let inbox: serde_json::Value = app
        .client()
        .get("/admin/notifications")
        .authorization_bearer(app.bearer())
        .await
        .json();
    assert_eq!(inbox["data"].as_array().unwrap().len(), 1);
    assert_eq!(inbox["data"][0]["source_available"], false);
    assert_eq!(
        inbox["data"][0]["headline"],
        "New contact inquiry from Maria Reyes"
    );
}

#[tokio::test]
async fn test_read_all_only_touches_callers_notifications() {
    let app = setup_test_app().await;
    let other = create_staff(&app.db, "Sam Ortiz", "sam@hearth.test").await;

    submit_contact(&app, "First Visitor").await;
    submit_contact(&app, "Second Visitor").await;
    app.drain_jobs().await;

    let result: serde_json::Value = app
        .client()
        .post("/admin/notifications/read-all")
        .authorization_bearer(app.bearer())
        .await
        .json();
    assert_eq!(result["updated"], 2);

    let mine: serde_json::Value = app
        .client()
        .get("/admin/notifications")
        .authorization_bearer(app.bearer())
        .await
        .json();
    assert_eq!(mine["unread_count"], 0);

    let theirs: serde_json::Value = app
        .client()
        .get("/admin/notifications")
        .authorization_bearer(other.token.clone())
        .await
        .json();
    assert_eq!(theirs["unread_count"], 2);

    // A notification of another staff member cannot be marked by the caller.
    let foreign_id = theirs["data"][0]["id"].as_str().unwrap();
    app.client()
        .post(&format!("/admin/notifications/{}/read", foreign_id))
        .authorization_bearer(app.bearer())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_testimonial_moderation() {
    let app = setup_test_app().await;
    let pending = TestimonialRepositoryTrait::create(
        &*app.db,
        NewTestimonial {
            name: "Lena Park".to_string(),
            relation: "Granddaughter".to_string(),
            content: "Warm and attentive staff.".to_string(),
            rating: 5,
            status: TestimonialStatus::Pending,
        },
    )
    .await
    .unwrap();

    let approved: serde_json::Value = app
        .client()
        .patch(&format!("/admin/testimonials/{}/approve", pending.id))
        .authorization_bearer(app.bearer())
        .await
        .json();
    assert_eq!(approved["status"], "approved");

    let home: serde_json::Value = app.client().get("/").await.json();
    assert_eq!(home["props"]["testimonials"][0]["name"], "Lena Park");

    let created = app
        .client()
        .post("/admin/testimonials")
        .authorization_bearer(app.bearer())
        .json(&json!({
            "name": "Omar Said",
            "relation": "Son",
            "content": "Great care.",
            "rating": 4
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let created: serde_json::Value = created.json();
    assert_eq!(created["status"], "approved");

    let invalid = app
        .client()
        .post("/admin/testimonials")
        .authorization_bearer(app.bearer())
        .json(&json!({
            "name": "Omar Said",
            "relation": "Son",
            "content": "Great care.",
            "rating": 6
        }))
        .await;
    assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_media_upload_returns_url() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/admin/media")
        .authorization_bearer(app.bearer())
        .multipart(MultipartForm::new().add_part("file", png_part("inline.png")))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    let path = body["path"].as_str().unwrap();
    assert!(path.starts_with("blog/images/"));
    assert_eq!(
        body["url"],
        format!("{}/{}", helpers::STORAGE_BASE_URL, path)
    );
    assert!(app.storage.exists(path).await.unwrap());

    let missing = app
        .client()
        .post("/admin/media")
        .authorization_bearer(app.bearer())
        .multipart(MultipartForm::new().add_text("caption", "no file"))
        .await;
    assert_eq!(missing.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_avatar_replacement() {
    let app = setup_test_app().await;

    let first: serde_json::Value = app
        .client()
        .post("/admin/profile/avatar")
        .authorization_bearer(app.bearer())
        .multipart(MultipartForm::new().add_part("avatar", png_part("me.png")))
        .await
        .json();
    let first_path = first["avatar"].as_str().unwrap().to_string();
    assert!(first_path.starts_with("avatars/"));
    assert!(first.get("api_token_hash").is_none());

    let second: serde_json::Value = app
        .client()
        .post("/admin/profile/avatar")
        .authorization_bearer(app.bearer())
        .multipart(MultipartForm::new().add_part("avatar", png_part("me-again.png")))
        .await
        .json();
    let second_path = second["avatar"].as_str().unwrap();

    assert!(app.storage.exists(second_path).await.unwrap());
    assert!(!app.storage.exists(&first_path).await.unwrap());
}

#[tokio::test]
async fn test_health_reports_storage_and_in_memory_database() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "in_memory");
    assert_eq!(body["storage"], "healthy");
}
