use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::error::AppError;
use crate::models::article::{Article, ArticleId};
use crate::store::source::Fetched;

/// Key of the cached article listing.
///
/// The generation moves on every invalidation, so a fetch that started
/// before an invalidation can only fill a slot nobody reads any more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AllArticles(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    value: Arc<T>,
    /// Served by the fallback snapshot. Shared with concurrent waiters but
    /// dropped right after, so the next read goes to the primary again.
    degraded: bool,
}

impl<T> Entry<T> {
    fn new(value: T, degraded: bool) -> Self {
        Self {
            value: Arc::new(value),
            degraded,
        }
    }
}

/// Read-through cache for article reads.
///
/// Concurrent lookups of the same key while a fetch is in flight wait for
/// that fetch instead of issuing their own. Failed fetches, misses and
/// results from the fallback snapshot are never kept. Cloning is cheap and
/// clones share the same entries.
#[derive(Clone)]
pub struct ArticleCache {
    listing: Cache<AllArticles, Entry<Vec<Article>>>,
    articles: Cache<ArticleId, Entry<Article>>,
    generation: Arc<AtomicU64>,
}

impl ArticleCache {
    /// Create a cache holding at most `capacity` articles.
    pub fn new(capacity: u64, ttl: Option<Duration>) -> Self {
        Self {
            listing: build(capacity, ttl),
            articles: build(capacity, ttl),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn listing_key(&self) -> AllArticles {
        AllArticles(self.generation.load(Ordering::Acquire))
    }

    /// Return the cached listing, or run `fetch` and cache its result.
    pub async fn listing_or_fetch<F>(&self, fetch: F) -> Result<Arc<Vec<Article>>, AppError>
    where
        F: Future<Output = Result<Fetched<Vec<Article>>, AppError>>,
    {
        let key = self.listing_key();
        let entry = self
            .listing
            .try_get_with::<_, AppError>(key, async move {
                let fetched = fetch.await?;
                let degraded = fetched.is_degraded();
                tracing::debug!(
                    "Fetched listing of {} articles (degraded: {degraded})",
                    fetched.value.len()
                );
                Ok(Entry::new(fetched.value, degraded))
            })
            .await
            .map_err(|e| (*e).clone())?;

        if entry.degraded {
            self.listing.invalidate(&key).await;
        }
        Ok(entry.value)
    }

    /// Return the cached article `id`, or run `fetch` and cache its result.
    ///
    /// A fetch that yields `None` fails with [`AppError::NotFound`].
    pub async fn article_or_fetch<F>(&self, id: ArticleId, fetch: F) -> Result<Arc<Article>, AppError>
    where
        F: Future<Output = Result<Fetched<Option<Article>>, AppError>>,
    {
        let entry = self
            .articles
            .try_get_with::<_, AppError>(id, async move {
                let fetched = fetch.await?;
                let degraded = fetched.is_degraded();
                match fetched.value {
                    Some(article) => {
                        tracing::debug!("Fetched article {id} (degraded: {degraded})");
                        Ok(Entry::new(article, degraded))
                    }
                    None => Err(AppError::NotFound(format!("Article {id} not found"))),
                }
            })
            .await
            .map_err(|e| (*e).clone())?;

        if entry.degraded {
            self.articles.invalidate(&id).await;
        }
        Ok(entry.value)
    }

    /// Drop the cached listing so the next read goes back to the store.
    ///
    /// Listings still being fetched when this runs are handed to their
    /// waiters but never served to later readers.
    pub fn invalidate_listing(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.listing.invalidate_all();
        tracing::debug!("Invalidated article listing");
    }

    pub async fn invalidate_article(&self, id: ArticleId) {
        self.articles.invalidate(&id).await;
    }

    #[cfg(test)]
    pub(crate) fn has_listing(&self) -> bool {
        self.listing.contains_key(&self.listing_key())
    }

    #[cfg(test)]
    pub(crate) fn has_article(&self, id: ArticleId) -> bool {
        self.articles.contains_key(&id)
    }
}

impl Default for ArticleCache {
    fn default() -> Self {
        Self::new(1_000, None)
    }
}

fn build<K, V>(capacity: u64, ttl: Option<Duration>) -> Cache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let mut builder = Cache::<K, V>::builder().max_capacity(capacity);
    if let Some(ttl) = ttl {
        builder = builder.time_to_live(ttl);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn article(id: ArticleId) -> Article {
        Article {
            id,
            title: format!("Article {id}"),
            description: String::new(),
            category: Category::Skills,
            content: "Body".to_string(),
            read_time: "1 min read".to_string(),
            date: "Oct 15, 2023".to_string(),
            author: "Meera Patel".to_string(),
            author_role: String::new(),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_listing_is_fetched_once() {
        let cache = ArticleCache::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let listing = cache
                .listing_or_fetch(async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Fetched::primary(vec![article(1)]))
                })
                .await
                .unwrap();
            assert_eq!(listing.len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.has_listing());
    }

    #[tokio::test]
    async fn test_invalidate_listing_forces_refetch() {
        let cache = ArticleCache::default();
        cache
            .listing_or_fetch(async { Ok(Fetched::primary(vec![article(1)])) })
            .await
            .unwrap();

        cache.invalidate_listing();
        assert!(!cache.has_listing());

        let listing = cache
            .listing_or_fetch(async { Ok(Fetched::primary(vec![article(1), article(2)])) })
            .await
            .unwrap();
        assert_eq!(listing.len(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = ArticleCache::default();
        let err = cache
            .listing_or_fetch(async { Err(AppError::FallbackUnavailable("down".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FallbackUnavailable(_)));
        assert!(!cache.has_listing());

        let listing = cache
            .listing_or_fetch(async { Ok(Fetched::primary(vec![])) })
            .await
            .unwrap();
        assert!(listing.is_empty());
    }

    #[tokio::test]
    async fn test_missing_article_is_not_found_and_not_cached() {
        let cache = ArticleCache::default();
        let err = cache
            .article_or_fetch(7, async { Ok(Fetched::primary(None)) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!cache.has_article(7));
    }

    #[tokio::test]
    async fn test_article_entries_are_keyed_by_id() {
        let cache = ArticleCache::default();
        cache
            .article_or_fetch(1, async { Ok(Fetched::primary(Some(article(1)))) })
            .await
            .unwrap();
        let second = cache
            .article_or_fetch(2, async { Ok(Fetched::primary(Some(article(2)))) })
            .await
            .unwrap();
        assert_eq!(second.id, 2);
        assert!(cache.has_article(1));

        cache.invalidate_article(1).await;
        assert!(!cache.has_article(1));
        assert!(cache.has_article(2));
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_fetch() {
        let cache = ArticleCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let lookups = (0..8).map(|_| {
            let cache = cache.clone();
            let calls = calls.clone();
            async move {
                cache
                    .article_or_fetch(3, async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(Fetched::primary(Some(article(3))))
                    })
                    .await
            }
        });

        let results = futures::future::join_all(lookups).await;
        assert!(results.iter().all(|r| r.as_ref().ok().map(|a| a.id) == Some(3)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidation_wins_over_in_flight_fetch() {
        let cache = ArticleCache::default();

        // The store has answered with the old listing; the response is
        // still on its way when the listing is invalidated.
        let in_flight = {
            let cache = cache.clone();
            let old = vec![article(1)];
            tokio::spawn(async move {
                cache
                    .listing_or_fetch(async move {
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        Ok(Fetched::primary(old))
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.invalidate_listing();

        assert_eq!(in_flight.await.unwrap().unwrap().len(), 1);

        let listing = cache
            .listing_or_fetch(async { Ok(Fetched::primary(vec![article(1), article(2)])) })
            .await
            .unwrap();
        assert_eq!(listing.len(), 2);
    }

    #[tokio::test]
    async fn test_fallback_listing_is_not_kept() {
        let cache = ArticleCache::default();
        let listing = cache
            .listing_or_fetch(async { Ok(Fetched::fallback(vec![article(1)])) })
            .await
            .unwrap();
        assert_eq!(listing.len(), 1);
        assert!(!cache.has_listing());

        let listing = cache
            .listing_or_fetch(async { Ok(Fetched::primary(vec![article(1), article(2)])) })
            .await
            .unwrap();
        assert_eq!(listing.len(), 2);
        assert!(cache.has_listing());
    }

    #[tokio::test]
    async fn test_fallback_article_is_not_kept() {
        let cache = ArticleCache::default();
        let stale = Article {
            title: "From snapshot".to_string(),
            ..article(4)
        };
        let first = cache
            .article_or_fetch(4, async move { Ok(Fetched::fallback(Some(stale))) })
            .await
            .unwrap();
        assert_eq!(first.title, "From snapshot");
        assert!(!cache.has_article(4));

        let second = cache
            .article_or_fetch(4, async { Ok(Fetched::primary(Some(article(4)))) })
            .await
            .unwrap();
        assert_eq!(second.title, "Article 4");
    }
}
