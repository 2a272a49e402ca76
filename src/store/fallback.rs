use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::article::{Article, ArticleId};
use crate::store::source::{ArticleSource, Fetched};

/// Resilience decorator: reads go to `primary` and fall back to `fallback`
/// when the primary fails.
///
/// Only a failed call triggers the fallback. A primary that answers but has
/// no matching id yields `None` without consulting the fallback. Writes are
/// never redirected to the fallback. Reads answered by the fallback are
/// tagged [`crate::store::source::Origin::Fallback`].
pub struct FallbackSource {
    primary: Arc<dyn ArticleSource>,
    fallback: Arc<dyn ArticleSource>,
}

impl FallbackSource {
    pub fn new(primary: Arc<dyn ArticleSource>, fallback: Arc<dyn ArticleSource>) -> Self {
        Self { primary, fallback }
    }

    fn unavailable(&self, primary_err: &AppError, fallback_err: &AppError) -> AppError {
        tracing::error!(
            "Both {} and {} failed: {primary_err}; {fallback_err}",
            self.primary.name(),
            self.fallback.name()
        );
        AppError::FallbackUnavailable(format!(
            "{}: {primary_err}; {}: {fallback_err}",
            self.primary.name(),
            self.fallback.name()
        ))
    }
}

#[async_trait]
impl ArticleSource for FallbackSource {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn list(&self) -> Result<Vec<Article>, AppError> {
        self.list_fetched().await.map(|fetched| fetched.value)
    }

    async fn get(&self, id: ArticleId) -> Result<Option<Article>, AppError> {
        self.get_fetched(id).await.map(|fetched| fetched.value)
    }

    async fn list_fetched(&self) -> Result<Fetched<Vec<Article>>, AppError> {
        match self.primary.list_fetched().await {
            Ok(fetched) => Ok(fetched),
            Err(primary_err) => {
                tracing::warn!(
                    "{} unavailable, listing from {}: {primary_err}",
                    self.primary.name(),
                    self.fallback.name()
                );
                self.fallback
                    .list()
                    .await
                    .map(Fetched::fallback)
                    .map_err(|fallback_err| self.unavailable(&primary_err, &fallback_err))
            }
        }
    }

    async fn get_fetched(&self, id: ArticleId) -> Result<Fetched<Option<Article>>, AppError> {
        match self.primary.get_fetched(id).await {
            Ok(fetched) => Ok(fetched),
            Err(primary_err) => {
                tracing::warn!(
                    "{} unavailable, reading article {id} from {}: {primary_err}",
                    self.primary.name(),
                    self.fallback.name()
                );
                self.fallback
                    .get(id)
                    .await
                    .map(Fetched::fallback)
                    .map_err(|fallback_err| self.unavailable(&primary_err, &fallback_err))
            }
        }
    }

    async fn create(&self, article: &Article) -> Result<(), AppError> {
        self.primary.create(article).await
    }
}
