use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::AppError;
use crate::models::article::{Article, ArticleId, NewArticle};
use crate::rendering::blocks::{parse, Block};

/// An article together with its parsed body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleView {
    pub article: Article,
    pub blocks: Vec<Block>,
}

impl From<Article> for ArticleView {
    fn from(article: Article) -> Self {
        let blocks = parse(&article.content);
        Self { article, blocks }
    }
}

/// Axum handler for `GET /api/v1/articles`.
pub async fn list_articles_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Article>>, AppError> {
    let articles = state.article_service.list_articles().await?;
    Ok(Json(articles))
}

/// Axum handler for `GET /api/v1/articles/{id}`.
pub async fn get_article_handler(
    State(state): State<AppState>,
    Path(id): Path<ArticleId>,
) -> Result<Json<ArticleView>, AppError> {
    let article = state.article_service.get_article(id).await?;
    Ok(Json(ArticleView::from(article)))
}

/// Axum handler for `POST /api/v1/articles`.
///
/// Answers `201 Created` with the new record even when the primary store
/// could not persist it.
pub async fn create_article_handler(
    State(state): State<AppState>,
    Json(input): Json<NewArticle>,
) -> Result<(StatusCode, Json<Article>), AppError> {
    let article = state.article_service.create_article(input).await?;
    Ok((StatusCode::CREATED, Json(article)))
}
