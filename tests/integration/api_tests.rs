//! API integration tests against the in-process router

use std::sync::Arc;

use attendance_server::{
    api,
    clock::FixedClock,
    config::{AppConfig, RosterConfig},
    AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use tower::ServiceExt;

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 18)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn test_app(clock: Arc<FixedClock>, mock_history_days: u32) -> Router {
    let config = AppConfig {
        roster: RosterConfig {
            mock_history_days,
            ..Default::default()
        },
        ..Default::default()
    };
    let state = AppState::new(config, clock).expect("Failed to build state");
    api::router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn todays_token(app: &Router) -> String {
    let (status, body) = get(app, "/api/v1/attendance/token").await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app(Arc::new(FixedClock::new(at(9, 0))), 0);
    let (status, body) = get(&app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["students"], 13);
}

#[tokio::test]
async fn test_mark_attendance_flow() {
    let clock = Arc::new(FixedClock::new(at(9, 5)));
    let app = test_app(clock.clone(), 0);
    let token = todays_token(&app).await;

    let (status, body) = post(
        &app,
        "/api/v1/attendance/mark",
        json!({ "student_id": "stu001", "token": token }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["kind"], "success");
    assert_eq!(body["status"], "PRESENT");
    assert_eq!(body["record"]["student_id"], "STU001");
    assert_eq!(body["record"]["time"], "09:05");

    let (status, body) = post(
        &app,
        "/api/v1/attendance/mark",
        json!({ "student_id": "STU001", "token": token }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "AlreadyRecorded");
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "notice");
    assert!(body["record"].is_null());

    clock.set(at(13, 30));
    let (status, body) = post(
        &app,
        "/api/v1/attendance/mark",
        json!({ "student_id": "STU002", "token": token }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "LATE_PRESENT");

    let (_, body) = get(&app, "/api/v1/attendance/today-stats").await;
    assert_eq!(body["present_today"], 1);
    assert_eq!(body["late_today"], 1);
    assert_eq!(body["absent_today"], 11);

    let (_, body) = get(&app, "/api/v1/attendance/today-list").await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["records"][0]["student_id"], "STU002");
}

#[tokio::test]
async fn test_mark_attendance_rejections() {
    let app = test_app(Arc::new(FixedClock::new(at(9, 0))), 0);
    let token = todays_token(&app).await;

    let (status, body) = post(
        &app,
        "/api/v1/attendance/mark",
        json!({ "student_id": "NOPE42", "token": "ATT-000000" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidToken");

    let (status, body) = post(
        &app,
        "/api/v1/attendance/mark",
        json!({ "student_id": "NOPE42", "token": token }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchStudent");

    let (status, body) = post(
        &app,
        "/api/v1/attendance/mark",
        json!({ "student_id": "", "token": token }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchStudent");
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "error");
}

#[tokio::test]
async fn test_any_wrong_token_is_invalid_token() {
    let app = test_app(Arc::new(FixedClock::new(at(9, 0))), 0);
    let long_token = "X".repeat(65);
    let long_student = "S".repeat(40);

    let cases = [
        json!({ "student_id": "STU001", "token": "" }),
        json!({ "student_id": "STU001", "token": long_token }),
        json!({ "student_id": long_student, "token": "ATT-000000" }),
        json!({ "student_id": "", "token": "" }),
    ];
    for request in cases {
        let (status, body) = post(&app, "/api/v1/attendance/mark", request.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{request}");
        assert_eq!(body["error"], "InvalidToken", "{request}");
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "error");
    }

    // A long unknown ID with today's token is an unknown student
    let token = todays_token(&app).await;
    let (status, body) = post(
        &app,
        "/api/v1/attendance/mark",
        json!({ "student_id": "S".repeat(40), "token": token }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchStudent");
}

#[tokio::test]
async fn test_student_stats_and_records() {
    let app = test_app(Arc::new(FixedClock::new(at(9, 0))), 30);

    let (status, body) = get(&app, "/api/v1/students/stu001/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["id"], "STU001");
    assert_eq!(body["window_days"], 30);

    let stats = &body["stats"];
    let total = stats["total_days"].as_u64().unwrap();
    let counted = stats["days_present"].as_u64().unwrap()
        + stats["days_late"].as_u64().unwrap()
        + stats["days_absent"].as_u64().unwrap();
    assert_eq!(total, counted);
    assert!(body["standing"].is_string());

    let (status, body) = get(&app, "/api/v1/students/STU001/records?limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().len() <= 3);

    let (status, _) = get(&app, "/api/v1/students/NOPE42/stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_report_filters() {
    let app = test_app(Arc::new(FixedClock::new(at(9, 0))), 30);

    let (status, body) = get(
        &app,
        "/api/v1/attendance/report?start_date=2024-03-11&end_date=2024-03-15&student_id=stu002",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let records = body["records"].as_array().unwrap();
    assert_eq!(body["count"], records.len());
    for record in records {
        assert_eq!(record["student_id"], "STU002");
        let date = record["date"].as_str().unwrap();
        assert!(("2024-03-11"..="2024-03-15").contains(&date));
    }
}

#[tokio::test]
async fn test_list_students_sorted_by_name() {
    let app = test_app(Arc::new(FixedClock::new(at(9, 0))), 0);
    let (status, body) = get(&app, "/api/v1/students").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_face_capture_flow() {
    let app = test_app(Arc::new(FixedClock::new(at(8, 45))), 0);
    let image = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

    let (_, body) = get(&app, "/api/v1/students/STU005/face-capture/eligibility").await;
    assert_eq!(body["state"], "not_marked_today");

    let (status, _) = post(
        &app,
        "/api/v1/students/STU005/face-capture",
        json!({ "image": image }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let token = todays_token(&app).await;
    post(
        &app,
        "/api/v1/attendance/mark",
        json!({ "student_id": "STU005", "token": token }),
    )
    .await;

    let (_, body) = get(&app, "/api/v1/students/STU005/attendance-today").await;
    assert_eq!(body["marked"], true);

    let (_, body) = get(&app, "/api/v1/students/STU005/face-capture/eligibility").await;
    assert_eq!(body["state"], "ready");

    let (status, body) = post(
        &app,
        "/api/v1/students/stu005/face-capture",
        json!({ "image": "%%%" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = post(
        &app,
        "/api/v1/students/stu005/face-capture",
        json!({ "image": image }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["student_id"], "STU005");

    let (status, _) = post(
        &app,
        "/api/v1/students/STU005/face-capture",
        json!({ "image": image }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = get(&app, "/api/v1/students/STU005/face-capture").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image"], image);

    let (_, body) = get(&app, "/api/v1/students/STU005/face-capture/eligibility").await;
    assert_eq!(body["state"], "already_captured");
}

#[tokio::test]
async fn test_token_rolls_over_at_midnight() {
    let clock = Arc::new(FixedClock::new(at(23, 59)));
    let app = test_app(clock.clone(), 0);
    let yesterday = todays_token(&app).await;

    clock.advance(chrono::Duration::minutes(2));
    let today = todays_token(&app).await;
    assert_ne!(yesterday, today);

    let (status, _) = post(
        &app,
        "/api/v1/attendance/mark",
        json!({ "student_id": "STU001", "token": yesterday }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_face_capture_size_limit_is_enforced_in_json() {
    let app = test_app(Arc::new(FixedClock::new(at(9, 0))), 0);
    let max_image_bytes = AppConfig::default().face_capture.max_image_bytes;
    let token = todays_token(&app).await;
    for student_id in ["STU006", "STU007"] {
        let (status, _) = post(
            &app,
            "/api/v1/attendance/mark",
            json!({ "student_id": student_id, "token": token }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let at_limit = format!(
        "data:image/jpeg;base64,{}",
        STANDARD.encode(vec![0xFFu8; max_image_bytes])
    );
    let (status, body) = post(
        &app,
        "/api/v1/students/STU006/face-capture",
        json!({ "image": at_limit }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["student_id"], "STU006");

    let over_limit = STANDARD.encode(vec![0xFFu8; max_image_bytes + 1]);
    let (status, body) = post(
        &app,
        "/api/v1/students/STU007/face-capture",
        json!({ "image": over_limit }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_responses_are_gzip_compressed_on_request() {
    let app = test_app(Arc::new(FixedClock::new(at(9, 0))), 0);
    let response = app
        .oneshot(
            Request::get("/api/v1/students")
                .header("accept-encoding", "gzip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-encoding"], "gzip");
}
