use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use shelfmark_storage::DynCatalogStorage;

use crate::cache::CatalogCache;
use crate::config::{AppConfig, StorageBackend};
use crate::state::AppState;
use crate::{handlers, middleware as app_middleware, routes};

pub struct ShelfmarkServer {
    addr: SocketAddr,
    app: Router,
}

/// Builds the storage backend selected by configuration.
async fn build_storage(cfg: &AppConfig) -> anyhow::Result<DynCatalogStorage> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage backend");
            Ok(Arc::new(shelfmark_db_memory::InMemoryCatalog::new()))
        }
        StorageBackend::Postgres => {
            let pg = cfg
                .storage
                .postgres
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("storage.postgres config is required"))?;
            let storage = shelfmark_db_postgres::create_storage(pg.to_backend_config()).await?;
            Ok(storage)
        }
    }
}

/// Builds the application router with all state constructed up front.
///
/// The cache backend is created here, once, and injected through
/// `AppState`; nothing is lazily initialized at request time.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let storage = build_storage(cfg).await?;
    let backend = crate::create_cache_backend(&cfg.redis).await;
    let cache = Arc::new(CatalogCache::new(backend, cfg.cache.catalog_ttl()));
    let state = AppState::new(storage, cache, cfg.auth.clone());

    Ok(build_router(cfg, state))
}

fn author_collection() -> axum::routing::MethodRouter<AppState> {
    get(routes::authors::list_authors).post(routes::authors::create_author)
}

fn book_collection() -> axum::routing::MethodRouter<AppState> {
    get(routes::books::list_books).post(routes::books::create_book)
}

fn build_router(cfg: &AppConfig, state: AppState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Author CRUD. Collection routes answer with and without the
        // trailing slash; clients use both forms.
        .route("/authors", author_collection())
        .route("/authors/", author_collection())
        .route(
            "/authors/{id}",
            get(routes::authors::get_author)
                .put(routes::authors::update_author)
                .delete(routes::authors::delete_author),
        )
        .route("/authors/{id}/books", get(routes::authors::get_books_by_author))
        // Book CRUD
        .route("/books", book_collection())
        .route("/books/", book_collection())
        .route(
            "/books/{id}",
            get(routes::books::get_book)
                .put(routes::books::update_book)
                .delete(routes::books::delete_book),
        )
        // Middleware stack (order: request id -> cors -> compression -> trace -> body limit)
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %method,
                        http.target = %uri,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<ShelfmarkServer> {
        let app = build_app(&self.config).await?;

        Ok(ShelfmarkServer {
            addr: self.addr,
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ShelfmarkServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
