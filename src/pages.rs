use ammonia::clean_text;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::AppError;
use crate::models::article::{Article, ArticleId, NewArticle};
use crate::models::category::Category;
use crate::rendering::html::{render_article, render_card};

const SITE_TITLE: &str = "Quill Blog";

const STYLES: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; color: #1f2937; }
header.site { display: flex; justify-content: space-between; align-items: center; padding: 1rem 1.5rem; border-bottom: 1px solid #e5e7eb; }
.layout { display: flex; min-height: calc(100vh - 5rem); }
.sidebar { width: 20rem; background: #f9fafb; border-right: 1px solid #e5e7eb; padding: 1rem; }
.detail { flex: 1; padding: 2rem; max-width: 48rem; margin: 0 auto; }
.card { display: block; padding: 1rem; margin-bottom: .75rem; background: #fff; border-left: 4px solid #e5e7eb; border-radius: .5rem; color: inherit; text-decoration: none; }
.card-selected { border-left-color: #2563eb; box-shadow: 0 2px 6px rgba(0,0,0,.1); }
.badge { font-size: .75rem; font-weight: 600; padding: .15rem .5rem; border-radius: .25rem; margin-right: .5rem; }
.badge-finance { background: #dbeafe; color: #1d4ed8; }
.badge-career { background: #dcfce7; color: #15803d; }
.badge-regulations { background: #f3e8ff; color: #7e22ce; }
.badge-skills { background: #ffedd5; color: #c2410c; }
.badge-technology { background: #e0e7ff; color: #4338ca; }
.badge-default { background: #f3f4f6; color: #374151; }
.avatar { display: inline-flex; width: 2.5rem; height: 2.5rem; border-radius: 50%; background: #e5e7eb; align-items: center; justify-content: center; margin-right: .75rem; }
.byline { display: flex; align-items: center; border-top: 1px solid #e5e7eb; padding-top: 1rem; }
.featured { width: 100%; height: auto; border-radius: .5rem; margin: 2rem 0; }
.error { color: #dc2626; }
.muted { color: #6b7280; }
form label { display: block; margin-top: 1rem; font-weight: 500; }
form input, form textarea, form select { width: 100%; margin-top: .5rem; }
"#;

/// Query string of the index page.
#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    /// Article shown in the detail panel.
    pub selected: Option<ArticleId>,
}

/// Axum handler for `GET /`: article list with a detail panel.
///
/// Without `?selected=` the first listed article is shown.
pub async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Response {
    let articles = match state.article_service.list_articles().await {
        Ok(articles) => articles,
        Err(e) => {
            tracing::error!("Failed to list articles: {e}");
            let body = r#"<p class="error">Error loading articles. Make sure the article store is running.</p>"#;
            return (e.status_code(), Html(layout(SITE_TITLE, body))).into_response();
        }
    };

    let selected = match query.selected {
        Some(id) => match state.article_service.get_article(id).await {
            Ok(article) => Some(article),
            Err(AppError::NotFound(_)) => None,
            Err(e) => {
                tracing::warn!("Failed to load article {id}: {e}");
                None
            }
        },
        None => articles.first().cloned(),
    };

    Html(layout(SITE_TITLE, &index_body(&articles, selected.as_ref()))).into_response()
}

/// Axum handler for `GET /articles/{id}`.
pub async fn article_page_handler(
    State(state): State<AppState>,
    Path(id): Path<ArticleId>,
) -> Response {
    match state.article_service.get_article(id).await {
        Ok(article) => Html(layout(&article.title, &render_article(&article))).into_response(),
        Err(e) => error_page(e),
    }
}

/// Axum handler for `GET /new`: the article creation form.
pub async fn new_article_form_handler() -> Html<String> {
    Html(layout("New Article", &new_article_form(None)))
}

/// Axum handler for `POST /new`.
///
/// Redirects to the index with the new article selected.
pub async fn submit_article_handler(
    State(state): State<AppState>,
    Form(input): Form<NewArticle>,
) -> Response {
    match state.article_service.create_article(input).await {
        Ok(article) => Redirect::to(&format!("/?selected={}", article.id)).into_response(),
        Err(AppError::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Html(layout("New Article", &new_article_form(Some(&msg)))),
        )
            .into_response(),
        Err(e) => error_page(e),
    }
}

fn error_page(err: AppError) -> Response {
    let status = err.status_code();
    let message = match &err {
        AppError::NotFound(_) => "Article not found.".to_string(),
        other => other.to_string(),
    };
    let body = format!(r#"<p class="error">{}</p>"#, clean_text(&message));
    (status, Html(layout(SITE_TITLE, &body))).into_response()
}

fn index_body(articles: &[Article], selected: Option<&Article>) -> String {
    let mut html = String::from(r#"<div class="layout"><aside class="sidebar"><h2>Latest Articles</h2>"#);
    for article in articles {
        let is_selected = selected.is_some_and(|s| s.id == article.id);
        html.push_str(&render_card(article, is_selected));
    }
    html.push_str(r#"</aside><main class="detail">"#);
    match selected {
        Some(article) => html.push_str(&render_article(article)),
        None => html.push_str(r#"<p class="muted">Select an article to read</p>"#),
    }
    html.push_str("</main></div>");
    html
}

fn new_article_form(error: Option<&str>) -> String {
    let mut html = String::from(r#"<main class="detail"><h1>Create New Article</h1>"#);
    if let Some(error) = error {
        html.push_str(&format!(r#"<p class="error">{}</p>"#, clean_text(error)));
    }
    html.push_str(r#"<form method="post" action="/new">"#);
    html.push_str(r#"<label>Title<input name="title" required placeholder="Enter article title"></label>"#);
    html.push_str(r#"<label>Category<select name="category">"#);
    for category in Category::KNOWN {
        html.push_str(&format!(r#"<option value="{0}">{0}</option>"#, category.as_str()));
    }
    html.push_str("</select></label>");
    html.push_str(r#"<label>Author<input name="author" required placeholder="Your name"></label>"#);
    html.push_str(r#"<label>Author Role<input name="authorRole" placeholder="e.g., Senior Financial Analyst"></label>"#);
    html.push_str(r#"<label>Description<textarea name="description" rows="2" required></textarea></label>"#);
    html.push_str(r#"<label>Content<textarea name="content" rows="8" required placeholder="Use ## for headings, - for lists, 1. for numbered lists"></textarea></label>"#);
    html.push_str(r#"<button type="submit">Publish Article</button></form></main>"#);
    html
}

fn layout(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">",
            "<title>{title}</title><style>{styles}</style></head><body>",
            "<header class=\"site\"><div><h1><a href=\"/\">{site}</a></h1>",
            "<p class=\"muted\">Stay updated with the latest trends in finance, accounting, and career growth</p></div>",
            "<a href=\"/new\">New Article</a></header>",
            "{body}</body></html>"
        ),
        title = clean_text(title),
        styles = STYLES,
        site = SITE_TITLE,
        body = body,
    )
}
