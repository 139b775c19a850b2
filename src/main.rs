use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use roboarchive::config;
use roboarchive::database::Database;
use roboarchive::handlers::{self, AppState};
use roboarchive::storage::AttachmentStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("roboarchive=info,tower_http=info")
            }),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting RoboArchive in {:?} mode", config.environment);

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::error!("DATABASE_URL is not set");
            std::process::exit(1);
        }
    };

    // A store we cannot reach at startup is fatal
    let db = match Database::connect(
        &database_url,
        config.database.max_connections,
        config.database.connect_timeout_secs,
    )
    .await
    {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Error connecting to PostgreSQL: {}", e);
            std::process::exit(1);
        }
    };

    let store = AttachmentStore::new(&config.uploads.dir);
    if let Err(e) = store.ensure_dirs() {
        tracing::error!("Failed to create upload directories: {}", e);
        std::process::exit(1);
    }

    let state = Arc::new(AppState { db, store });
    let app = app(state.clone());

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("RoboArchive server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    state.db.close().await;
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

fn app(state: Arc<AppState>) -> Router {
    let config = config::config();

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .merge(member_routes())
        .merge(task_routes())
        .merge(article_routes(config.uploads.article_max_bytes))
        .merge(robot_routes(config.uploads.robot_max_bytes))
        .nest_service("/uploads", ServeDir::new(&config.uploads.dir))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn member_routes() -> Router<Arc<AppState>> {
    use handlers::{auth, members};

    Router::new()
        // Public auth routes
        .route("/api/members/register", post(auth::register))
        .route("/api/members/login", post(auth::login))
        // Member routes (token required; mutation is admin-only)
        .route("/api/members", get(members::list_members))
        .route(
            "/api/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route("/api/members/:id/stats", get(members::member_stats))
}

fn task_routes() -> Router<Arc<AppState>> {
    use handlers::tasks;

    Router::new()
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/:id",
            axum::routing::put(tasks::update_task).delete(tasks::delete_task),
        )
}

fn article_routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    use handlers::articles;

    Router::new()
        .route(
            "/api/articles",
            get(articles::list_articles)
                .post(articles::create_article)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/api/articles/:id",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

fn robot_routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    use handlers::robots;

    Router::new()
        .route(
            "/api/robots",
            get(robots::list_robots)
                .post(robots::create_robot)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/api/robots/:id",
            get(robots::get_robot)
                .put(robots::update_robot)
                .delete(robots::delete_robot)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
