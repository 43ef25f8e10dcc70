use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use jasper_core::config::Config;
use jasper_core::pipeline::QueryPipeline;
use jasper_core::store::{DocumentStore, SqliteStore};
use jasper_providers::build_chain;

mod routes;

// ── AppState ──────────────────────────────────────────────────────────────

pub struct AppState {
    pub store: Arc<SqliteStore>,
    pub pipeline: QueryPipeline,
}

// ── main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jasper_server=info,jasper_core=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.data_dir)?;
    let db_path = format!("{}/jasper.db", config.data_dir);
    let store = Arc::new(SqliteStore::open(&db_path)?);
    store.migrate()?;

    // First run seeds non-sensitive settings; afterwards the DB wins.
    config.seed_db(&store)?;
    let config = config.load_from_db(&store);

    let chain = build_chain(&config)?;
    let doc_store: Arc<dyn DocumentStore> = store.clone();
    let pipeline = QueryPipeline::new(doc_store, chain).with_search_limit(config.search_limit);

    let state = Arc::new(AppState {
        store,
        pipeline,
    });

    let app = Router::new()
        // Health
        .route("/api/health", get(routes::health))
        // Chat
        .route("/api/chat/send", post(routes::send_message))
        .route("/api/chat/history", get(routes::chat_history))
        .route("/api/chat/:chat_id", get(routes::get_chat))
        .route("/api/chat/:chat_id", delete(routes::delete_chat))
        // Documents (admin surface plus tier-checked read)
        .route("/api/admin/documents", post(routes::create_document))
        .route("/api/admin/documents", get(routes::list_documents))
        .route("/api/admin/documents/:doc_id", put(routes::update_document))
        .route("/api/admin/documents/:doc_id", delete(routes::delete_document))
        .route("/api/documents/:doc_id", get(routes::get_document))
        // Fallback passthrough
        .route("/api/fallback/:provider", post(routes::query_fallback))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.web_bind, config.web_port);
    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
