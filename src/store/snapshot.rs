use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;
use crate::models::article::{Article, ArticleId};
use crate::store::source::ArticleSource;

/// The static snapshot document: `{ "blogs": [Article, ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub blogs: Vec<Article>,
}

/// Where the snapshot document is read from.
#[derive(Debug, Clone)]
pub enum SnapshotLocation {
    File(PathBuf),
    Url(Url),
    /// An in-memory snapshot, mostly for tests and embedded demo data.
    Inline(Arc<Snapshot>),
}

impl SnapshotLocation {
    /// Interpret `raw` as an `http(s)://` URL when it looks like one, otherwise as a file path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            if let Ok(url) = Url::parse(raw) {
                return SnapshotLocation::Url(url);
            }
        }
        SnapshotLocation::File(PathBuf::from(raw))
    }
}

/// Read-only ArticleSource backed by the snapshot document.
///
/// The document is read again on every call, so edits to the file are
/// picked up without a restart.
pub struct SnapshotSource {
    client: reqwest::Client,
    location: SnapshotLocation,
}

impl SnapshotSource {
    pub fn new(client: reqwest::Client, location: SnapshotLocation) -> Self {
        Self { client, location }
    }

    /// Snapshot source over an in-memory document.
    pub fn inline(snapshot: Snapshot) -> Self {
        Self::new(
            reqwest::Client::new(),
            SnapshotLocation::Inline(Arc::new(snapshot)),
        )
    }

    async fn load(&self) -> Result<Snapshot, AppError> {
        match &self.location {
            SnapshotLocation::File(path) => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    AppError::Internal(format!(
                        "Failed to read snapshot '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                serde_json::from_str(&raw).map_err(|e| {
                    AppError::Internal(format!(
                        "Malformed snapshot '{}': {}",
                        path.display(),
                        e
                    ))
                })
            }
            SnapshotLocation::Url(url) => {
                let snapshot = self
                    .client
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<Snapshot>()
                    .await?;
                Ok(snapshot)
            }
            SnapshotLocation::Inline(snapshot) => Ok(snapshot.as_ref().clone()),
        }
    }
}

#[async_trait]
impl ArticleSource for SnapshotSource {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn list(&self) -> Result<Vec<Article>, AppError> {
        Ok(self.load().await?.blogs)
    }

    async fn get(&self, id: ArticleId) -> Result<Option<Article>, AppError> {
        Ok(self
            .load()
            .await?
            .blogs
            .into_iter()
            .find(|article| article.id == id))
    }

    async fn create(&self, article: &Article) -> Result<(), AppError> {
        Err(AppError::Internal(format!(
            "Snapshot is read-only, article {} was not written",
            article.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT_JSON: &str = r#"{
        "blogs": [
            {
                "id": 1,
                "title": "The Future of Fintech in 2024",
                "category": "FINANCE",
                "description": "Exploring how AI and blockchain are reshaping finance",
                "content": "The intersection of finance and technology.",
                "readTime": "5 min read",
                "date": "Oct 24, 2023",
                "author": "Arjun Mehta",
                "authorRole": "Senior Financial Analyst",
                "image": "/placeholder.svg"
            },
            {
                "id": 4,
                "title": "Soft Skills for Auditors",
                "category": "SKILLS",
                "description": "Why technical knowledge isn't enough",
                "content": "1. Communication\n2. Negotiation",
                "readTime": "5 min read",
                "date": "Oct 15, 2023",
                "author": "Meera Patel",
                "authorRole": "Audit Director",
                "image": "/placeholder.svg"
            }
        ]
    }"#;

    fn write_snapshot(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn file_source(file: &tempfile::NamedTempFile) -> SnapshotSource {
        SnapshotSource::new(
            reqwest::Client::new(),
            SnapshotLocation::File(file.path().to_path_buf()),
        )
    }

    #[test]
    fn test_location_parse() {
        assert!(matches!(
            SnapshotLocation::parse("https://example.com/db.json"),
            SnapshotLocation::Url(_)
        ));
        assert!(matches!(
            SnapshotLocation::parse("public/db.json"),
            SnapshotLocation::File(_)
        ));
    }

    #[tokio::test]
    async fn test_list_reads_blogs_in_order() {
        let file = write_snapshot(SNAPSHOT_JSON);
        let articles = file_source(&file).list().await.unwrap();
        let ids: Vec<_> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[tokio::test]
    async fn test_get_searches_by_id() {
        let file = write_snapshot(SNAPSHOT_JSON);
        let source = file_source(&file);
        let article = source.get(4).await.unwrap().unwrap();
        assert_eq!(article.author, "Meera Patel");
        assert_eq!(source.get(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_collection_is_success() {
        let file = write_snapshot(r#"{ "blogs": [] }"#);
        assert!(file_source(&file).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let source = SnapshotSource::new(
            reqwest::Client::new(),
            SnapshotLocation::File(PathBuf::from("/nonexistent/quill/db.json")),
        );
        assert!(source.list().await.is_err());
    }

    #[tokio::test]
    async fn test_wrong_collection_key_is_error() {
        let file = write_snapshot(r#"{ "articles": [] }"#);
        assert!(file_source(&file).list().await.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_over_http() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/db.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SNAPSHOT_JSON)
            .create_async()
            .await;

        let location = SnapshotLocation::parse(&format!("{}/db.json", server.url()));
        let source = SnapshotSource::new(reqwest::Client::new(), location);
        assert_eq!(source.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_is_rejected() {
        let source = SnapshotSource::inline(Snapshot::default());
        let file = write_snapshot(SNAPSHOT_JSON);
        let article = file_source(&file).get(1).await.unwrap().unwrap();
        assert!(source.create(&article).await.is_err());
    }
}
