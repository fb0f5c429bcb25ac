mod api;
mod auth;
mod context;
mod db;
mod models;
mod schema;
mod sql;
mod storage;

use axum::extract::{DefaultBodyLimit, MatchedPath};
use axum::http::Request;
use axum::middleware;
use axum::Router;
use context::{AppContext, AppState};
use std::env;
use std::sync::Arc;
use storage::ImageStore;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa_swagger_ui::SwaggerUi;

/// Multipart bodies carry image uploads; the per-file cap lives in the
/// image store.
const BODY_LIMIT: usize = 8 * 1024 * 1024;

fn init_telemetry() {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Assembles the application router around the explicitly constructed
/// context; nothing here reaches for globals.
pub fn build_app(state: AppState) -> Router {
    // Everything under /admin except login requires an admin session.
    let admin_router = api::admin::router().layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_admin,
    ));

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api::public::router())
        .merge(api::recipes::router())
        .merge(api::blog::router())
        .merge(api::saved::router())
        .merge(api::admin::public_router())
        .merge(admin_router)
        .nest_service("/static/images", ServeDir::new(state.images.dir()))
        .merge(swagger_ui)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                ),
        )
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi().to_pretty_json().unwrap();
        println!("{}", spec);
        return;
    }

    init_telemetry();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "foodblog.db".to_string());
    let image_dir = env::var("IMAGE_DIR").unwrap_or_else(|_| "static/images".to_string());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let pool = db::create_pool(&database_url);

    // Admins are only ever provisioned here, never over HTTP.
    if let (Ok(username), Ok(password)) = (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
        let mut conn = pool
            .get()
            .expect("Failed to get DB connection for admin bootstrap");
        auth::ensure_admin(&mut conn, &username, &password);
    }

    let images = ImageStore::new(&image_dir);
    images
        .init()
        .await
        .expect("Failed to create image directory");

    let state: AppState = Arc::new(AppContext { pool, images });
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());
    tracing::info!("Swagger UI available at /swagger-ui/");
    tracing::info!("OpenAPI spec available at /api-docs/openapi.json");

    axum::serve(listener, app).await.unwrap();
}
