use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{Local, Utc};

use crate::cache::ArticleCache;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::article::{Article, ArticleId, NewArticle};
use crate::store::fallback::FallbackSource;
use crate::store::remote::RemoteSource;
use crate::store::snapshot::{SnapshotLocation, SnapshotSource};
use crate::store::source::ArticleSource;

/// Hands out time-derived article ids that never repeat within the process.
///
/// Ids are the current Unix time in milliseconds, bumped past the last id
/// issued when two calls land in the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn next_id(&self) -> ArticleId {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

/// Article operations used by the HTTP layer: list, get and create, with a
/// read-through cache in front of the configured source.
pub struct ArticleService {
    source: Arc<dyn ArticleSource>,
    cache: ArticleCache,
    ids: IdGenerator,
}

impl ArticleService {
    pub fn new(source: Arc<dyn ArticleSource>, cache: ArticleCache) -> Self {
        Self {
            source,
            cache,
            ids: IdGenerator::default(),
        }
    }

    /// Wire the primary store and the snapshot fallback described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::new();

        let primary = RemoteSource::new(client.clone(), &config.store_url, &config.collection)?;
        tracing::info!("Primary store at {}", primary.collection_url());

        let snapshot = SnapshotSource::new(client, SnapshotLocation::parse(&config.snapshot));
        tracing::info!("Fallback snapshot at {}", config.snapshot);

        let source = FallbackSource::new(Arc::new(primary), Arc::new(snapshot));
        let cache = ArticleCache::new(config.cache_capacity, config.cache_ttl);

        Ok(Self::new(Arc::new(source), cache))
    }

    /// List all articles.
    ///
    /// An empty list from a reachable source is a success. When neither the
    /// primary store nor the snapshot can be read this fails with
    /// [`AppError::FallbackUnavailable`].
    pub async fn list_articles(&self) -> Result<Vec<Article>, AppError> {
        let listing = self.cache.listing_or_fetch(self.source.list_fetched()).await?;
        Ok(listing.as_ref().clone())
    }

    /// Fetch a single article.
    ///
    /// Fails with [`AppError::NotFound`] when the consulted source has no
    /// such id. A primary store that answers without the id is not a reason
    /// to consult the snapshot.
    pub async fn get_article(&self, id: ArticleId) -> Result<Article, AppError> {
        let article = self
            .cache
            .article_or_fetch(id, self.source.get_fetched(id))
            .await?;
        Ok(article.as_ref().clone())
    }

    /// Create an article from `input`.
    ///
    /// The full record (id, date, read time, default image) is built locally
    /// and then sent to the store. This is best effort: when the store
    /// cannot persist it the failure is logged and the locally built record
    /// is still returned, so callers never block on the store. Such an
    /// article lives only in the caller's hands and is not written to the
    /// snapshot.
    ///
    /// Only invalid input fails, with [`AppError::Validation`].
    pub async fn create_article(&self, input: NewArticle) -> Result<Article, AppError> {
        input.validate()?;

        let article = Article::compose(input, self.ids.next_id(), &Local::now());

        match self.source.create(&article).await {
            Ok(()) => tracing::info!(
                "Created article {} '{}' on {}",
                article.id,
                article.title,
                self.source.name()
            ),
            Err(e) => tracing::warn!(
                "Article {} was not persisted, returning the local record: {e}",
                article.id
            ),
        }

        self.cache.invalidate_listing();
        self.cache.invalidate_article(article.id).await;

        Ok(article)
    }
}
