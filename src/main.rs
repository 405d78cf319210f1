use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use eduportal_backend::{
    config::{get_config, init_config},
    database,
    middleware::{auth, rate_limit},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = database::connect().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let portal_api = Router::new()
        .route("/api/quiz/verify", post(routes::quiz::verify_quiz))
        .route(
            "/api/quiz/submissions",
            get(routes::quiz::list_my_submissions),
        )
        .route("/api/views/start", post(routes::tracking::start_view))
        .route("/api/views/stop", post(routes::tracking::stop_view))
        .route(
            "/api/views/status/:material_id",
            get(routes::tracking::view_status),
        )
        .route("/api/materials", get(routes::materials::list_materials))
        .route("/api/materials/:id", get(routes::materials::get_material))
        .route("/api/progress/me", get(routes::progress::get_my_progress))
        .layer(axum::middleware::from_fn(auth::require_bearer_auth))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RequestLimiter::per_second(config.api_rps),
            rate_limit::limit_middleware,
        ));

    let staff_api = Router::new()
        .route(
            "/api/staff/materials",
            post(routes::materials::create_material),
        )
        .route(
            "/api/staff/materials/:id",
            patch(routes::materials::update_material)
                .delete(routes::materials::delete_material),
        )
        .route(
            "/api/staff/students",
            get(routes::students::list_students).post(routes::students::create_student),
        )
        .route(
            "/api/staff/students/:id/status",
            patch(routes::students::update_student_status),
        )
        .route("/api/staff/progress", get(routes::progress::get_progress))
        .route(
            "/api/staff/views/open",
            get(routes::tracking::list_open_views),
        )
        .layer(axum::middleware::from_fn(auth::require_professor_or_admin))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RequestLimiter::per_second(config.staff_rps),
            rate_limit::limit_middleware,
        ));

    let app = base_routes
        .merge(portal_api)
        .merge(staff_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
