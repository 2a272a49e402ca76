use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::error::AppError;
use crate::models::article::{Article, ArticleId};
use crate::store::source::ArticleSource;

/// REST implementation of ArticleSource.
///
/// Talks to a json-server style collection: `GET /{collection}`,
/// `GET /{collection}/{id}` and `POST /{collection}`.
pub struct RemoteSource {
    client: reqwest::Client,
    collection_url: Url,
}

impl RemoteSource {
    /// Create a remote source for `collection` under `base_url`.
    pub fn new(client: reqwest::Client, base_url: &Url, collection: &str) -> Result<Self, AppError> {
        let mut collection_url = base_url.clone();
        collection_url
            .path_segments_mut()
            .map_err(|_| AppError::Config(format!("'{base_url}' cannot be a base URL")))?
            .pop_if_empty()
            .push(collection);

        Ok(Self {
            client,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn item_url(&self, id: ArticleId) -> Result<Url, AppError> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal(format!("'{}' cannot be a base URL", self.collection_url)))?
            .push(&id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl ArticleSource for RemoteSource {
    fn name(&self) -> &'static str {
        "primary store"
    }

    async fn list(&self) -> Result<Vec<Article>, AppError> {
        let articles = self
            .client
            .get(self.collection_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Article>>()
            .await?;

        Ok(articles)
    }

    async fn get(&self, id: ArticleId) -> Result<Option<Article>, AppError> {
        let response = self.client.get(self.item_url(id)?).send().await?;

        // A reachable store answering 404 is a miss, not a failure.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let article = response.error_for_status()?.json::<Article>().await?;
        Ok(Some(article))
    }

    async fn create(&self, article: &Article) -> Result<(), AppError> {
        self.client
            .post(self.collection_url.clone())
            .json(article)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
