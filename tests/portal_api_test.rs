use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use eduportal_backend::middleware::auth::Claims;

fn token_for(sub: &str, role: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test_secret_key"),
    )
    .expect("encode token")
}

fn portal_router(state: eduportal_backend::AppState) -> Router {
    Router::new()
        .route(
            "/api/quiz/verify",
            post(eduportal_backend::routes::quiz::verify_quiz),
        )
        .route(
            "/api/views/start",
            post(eduportal_backend::routes::tracking::start_view),
        )
        .route(
            "/api/views/stop",
            post(eduportal_backend::routes::tracking::stop_view),
        )
        .route(
            "/api/materials",
            get(eduportal_backend::routes::materials::list_materials),
        )
        .route(
            "/api/progress/me",
            get(eduportal_backend::routes::progress::get_my_progress),
        )
        .route(
            "/api/staff/progress",
            get(eduportal_backend::routes::progress::get_progress),
        )
        .layer(axum::middleware::from_fn(
            eduportal_backend::middleware::auth::require_bearer_auth,
        ))
        .with_state(state)
}

async fn json_request(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, value)
}

#[tokio::test]
async fn portal_flow_end_to_end() {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("skipping portal_flow_end_to_end: DATABASE_URL not set");
        return;
    }
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("API_RPS", "100");
    env::set_var("STAFF_RPS", "100");

    eduportal_backend::config::init_config().expect("init config");
    let pool = eduportal_backend::database::connect().await.expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let admin_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    for (id, name, role) in [
        (admin_id, "Prof. Seed", "admin"),
        (student_id, "Alice", "student"),
    ] {
        sqlx::query(
            r#"INSERT INTO profiles (id, name, email, role) VALUES ($1, $2, $3, $4)"#,
        )
        .bind(id)
        .bind(name)
        .bind(format!("{}_{}@example.com", role, id))
        .bind(role)
        .execute(&pool)
        .await
        .expect("seed profile");
    }

    let material_service =
        eduportal_backend::services::material_service::MaterialService::new(pool.clone());
    let quiz = material_service
        .create(
            eduportal_backend::dto::material_dto::CreateMaterialRequest {
                title: "Algebra TVC".into(),
                subject: "math".into(),
                category: "tvc".into(),
                file_url: None,
                answer_key: Some(vec!["A".into(), "B".into(), "C".into(), "D".into()]),
            },
            admin_id,
        )
        .await
        .expect("create quiz material");
    let lesson = material_service
        .create(
            eduportal_backend::dto::material_dto::CreateMaterialRequest {
                title: "Algebra lesson".into(),
                subject: "math".into(),
                category: "lesson".into(),
                file_url: Some("lessons/algebra.pdf".into()),
                answer_key: None,
            },
            admin_id,
        )
        .await
        .expect("create lesson material");

    let state = eduportal_backend::AppState::new(pool.clone());
    let app = portal_router(state);
    let student_token = token_for(&student_id.to_string(), "student");

    // Students see materials without answer keys.
    let (status, body) = json_request(&app, "GET", "/api/materials?subject=math", &student_token, None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().expect("material list");
    assert!(listed.iter().any(|m| m["id"] == json!(quiz.id)));
    for m in listed {
        assert!(m.get("answer_key").is_none());
    }

    // Graded submission: 3 of 4 correct, index 1 mismatch reported.
    let (status, body) = json_request(
        &app,
        "POST",
        "/api/quiz/verify",
        &student_token,
        Some(json!({
            "material_id": quiz.id,
            "answers": ["A", "X", "C", "D"],
            "time_spent_seconds": 42
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["score"], json!(3));
    assert_eq!(body["total_questions"], json!(4));
    assert_eq!(body["time_spent_seconds"], json!(42));
    assert_eq!(
        body["results"][1],
        json!({
            "question_index": 1,
            "user_answer": "X",
            "correct_answer": "B",
            "is_correct": false
        })
    );

    // Length mismatch is rejected and writes nothing.
    let (status, _) = json_request(
        &app,
        "POST",
        "/api/quiz/verify",
        &student_token,
        Some(json!({
            "material_id": quiz.id,
            "answers": ["A", "B"],
            "time_spent_seconds": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A material without an answer key cannot be verified against.
    let (status, _) = json_request(
        &app,
        "POST",
        "/api/quiz/verify",
        &student_token,
        Some(json!({
            "material_id": lesson.id,
            "answers": ["A"],
            "time_spent_seconds": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let row_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE user_id = $1")
            .bind(student_id)
            .fetch_one(&pool)
            .await
            .expect("count submissions");
    assert_eq!(row_count, 1);

    // A perfect retake appends a second row; averages land on 75.
    let (status, body) = json_request(
        &app,
        "POST",
        "/api/quiz/verify",
        &student_token,
        Some(json!({
            "material_id": quiz.id,
            "answers": ["A", "B", "C", "D"],
            "time_spent_seconds": 30
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], json!(4));

    let (status, body) = json_request(&app, "GET", "/api/progress/me", &student_token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_tests"], json!(2));
    assert_eq!(body["average_score"].as_f64(), Some(87.5));

    // Timed lesson view: start, then a hidden-tab stop closes the row.
    let (status, body) = json_request(
        &app,
        "POST",
        "/api/views/start",
        &student_token,
        Some(json!({ "material_id": lesson.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records_view"], json!(true));
    assert_eq!(body["already_tracking"], json!(false));

    let (status, body) = json_request(
        &app,
        "POST",
        "/api/views/stop",
        &student_token,
        Some(json!({ "material_id": lesson.id, "reason": "hidden" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stopped"], json!(true));
    assert!(body["time_spent_seconds"].as_i64().unwrap() >= 0);

    let closed: (Option<i32>, bool) = sqlx::query_as(
        r#"SELECT time_spent_seconds, view_ended_at IS NOT NULL
           FROM lesson_views WHERE user_id = $1 AND material_id = $2
           ORDER BY created_at DESC LIMIT 1"#,
    )
    .bind(student_id)
    .bind(lesson.id)
    .fetch_one(&pool)
    .await
    .expect("fetch view row");
    assert!(closed.0.is_some());
    assert!(closed.1);

    // A second stop is a no-op.
    let (status, body) = json_request(
        &app,
        "POST",
        "/api/views/stop",
        &student_token,
        Some(json!({ "material_id": lesson.id, "reason": "unmount" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stopped"], json!(false));

    // Staff report includes the student and population-wide figures.
    let staff_token = token_for(&admin_id.to_string(), "admin");
    let (status, body) = json_request(&app, "GET", "/api/staff/progress", &staff_token, None).await;
    assert_eq!(status, StatusCode::OK);
    let students = body["students"].as_array().expect("students");
    let alice = students
        .iter()
        .find(|s| s["user_id"] == json!(student_id))
        .expect("alice in report");
    assert_eq!(alice["total_tests"], json!(2));
    assert!(body["global"]["total_active_students"].as_i64().unwrap() >= 1);
}
