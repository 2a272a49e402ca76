use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::pages;
use crate::service::ArticleService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub article_service: Arc<ArticleService>,
}

impl AppState {
    pub fn new(article_service: ArticleService) -> Self {
        Self {
            article_service: Arc::new(article_service),
        }
    }
}

/// Build the router with the HTML pages and the JSON API.
pub fn router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(pages::index_handler))
        .route("/articles/{id}", get(pages::article_page_handler))
        .route(
            "/new",
            get(pages::new_article_form_handler).post(pages::submit_article_handler),
        )
        // API routes
        .route(
            "/api/v1/articles",
            get(api::articles::list_articles_handler)
                .post(api::articles::create_article_handler),
        )
        .route(
            "/api/v1/articles/{id}",
            get(api::articles::get_article_handler),
        )
        .route("/healthz", get(healthz))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
