//! HTTP API for learnhub.
//!
//! [`router`] builds the axum app over an [`AppState`]; [`serve`] binds the
//! configured address and runs it until Ctrl+C or SIGTERM.

use std::future::Future;
use std::io;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use learnhub_config::ServerConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use error::ApiError;
pub use state::AppState;
pub use telemetry::init_tracing;

use routes::{access, auth, courses, health, progress, stats, users};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
    #[error("failed to initialise tracing: {0}")]
    Tracing(String),
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/stats", get(stats::stats))
        .route("/courses", get(courses::list).post(courses::create))
        .route(
            "/courses/{id}",
            get(courses::get).put(courses::update).delete(courses::delete),
        )
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/reset-password", post(auth::reset_password))
        .route(
            "/enrollments",
            get(access::list_enrollments)
                .post(access::enroll)
                .delete(access::unenroll),
        )
        .route("/enrollments/{user_id}", get(access::enrollments_for))
        .route(
            "/requests",
            get(access::list_requests)
                .post(access::create_request)
                .delete(access::delete_request),
        )
        .route("/requests/approve", post(access::approve))
        .route("/access/{student_id}/{course_id}", get(access::access_state))
        .route("/progress/{user_id}/{course_id}", get(progress::watched))
        .route(
            "/progress/{user_id}/{course_id}/summary",
            get(progress::summary).post(progress::mark_summary),
        )
        .route(
            "/progress/{user_id}/{course_id}/{video_id}",
            post(progress::mark),
        )
        .method_not_allowed_fallback(routes::method_not_allowed)
}

/// The full application: `/api` routes plus CORS, body limit and request tracing.
/// Unknown paths and methods answer with the usual `{"error"}` body.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    Router::new()
        .nest("/api", api_routes())
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `config.address()` and serve until a shutdown signal arrives.
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ServerError> {
    let address = config.address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Server running on {address}");

    serve_on(listener, router(state, config), shutdown_signal()).await?;
    info!("Server shut down");
    Ok(())
}

/// Serve `app` on an already-bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
