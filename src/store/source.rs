use async_trait::async_trait;

use crate::error::AppError;
use crate::models::article::{Article, ArticleId};

/// Which store answered a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Primary,
    /// The read was served by a fallback after the primary failed.
    Fallback,
}

/// A read result tagged with the store that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Fetched<T> {
    pub fn primary(value: T) -> Self {
        Self {
            value,
            origin: Origin::Primary,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            origin: Origin::Fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.origin == Origin::Fallback
    }
}

/// Trait for article record stores.
///
/// Abstracted as a trait so the remote store, the static snapshot and the
/// fallback combinator share one interface, and tests can use mocks.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// List every article, in the store's order.
    async fn list(&self) -> Result<Vec<Article>, AppError>;

    /// Retrieve an article by id. Returns `None` if the store has no such id.
    async fn get(&self, id: ArticleId) -> Result<Option<Article>, AppError>;

    /// Persist a fully built article record.
    async fn create(&self, article: &Article) -> Result<(), AppError>;

    /// Like [`ArticleSource::list`], also reporting which store answered.
    ///
    /// Plain stores always answer as [`Origin::Primary`].
    async fn list_fetched(&self) -> Result<Fetched<Vec<Article>>, AppError> {
        self.list().await.map(Fetched::primary)
    }

    /// Like [`ArticleSource::get`], also reporting which store answered.
    async fn get_fetched(&self, id: ArticleId) -> Result<Fetched<Option<Article>>, AppError> {
        self.get(id).await.map(Fetched::primary)
    }
}
