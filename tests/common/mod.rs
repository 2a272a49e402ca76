use std::path::PathBuf;

use axum::Router;

use quill::app::{router, AppState};
use quill::config::AppConfig;
use quill::service::ArticleService;

/// Address nothing listens on, used to simulate an unreachable primary store.
pub const UNREACHABLE_STORE: &str = "http://127.0.0.1:1";

/// Holds the mock primary store, the snapshot file and the Axum router for
/// integration tests.
///
/// The mock server and the temporary directory live as long as this struct.
pub struct TestEnv {
    pub primary: Option<mockito::ServerGuard>,
    _snapshot_dir: tempfile::TempDir,
    pub snapshot_path: PathBuf,
    pub router: Router,
}

impl TestEnv {
    /// Mock primary store plus the demo snapshot as fallback.
    pub async fn start() -> Self {
        let primary = mockito::Server::new_async().await;
        let url = primary.url();
        Self::build(Some(primary), &url, true).await
    }

    /// Unreachable primary store, demo snapshot as fallback.
    pub async fn with_primary_down() -> Self {
        Self::build(None, UNREACHABLE_STORE, true).await
    }

    /// Unreachable primary store and a snapshot path that does not exist.
    pub async fn with_everything_down() -> Self {
        Self::build(None, UNREACHABLE_STORE, false).await
    }

    async fn build(primary: Option<mockito::ServerGuard>, store_url: &str, seed: bool) -> Self {
        let snapshot_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let snapshot_path = snapshot_dir.path().join("db.json");
        if seed {
            quill::demo_seeder::seed_snapshot(&snapshot_path, false)
                .await
                .expect("Failed to seed snapshot");
        }

        let config = AppConfig::new(store_url, snapshot_path.to_string_lossy())
            .expect("Failed to build config");
        let app_state = AppState::new(
            ArticleService::from_config(&config).expect("Failed to build article service"),
        );

        Self {
            primary,
            _snapshot_dir: snapshot_dir,
            snapshot_path,
            router: router(app_state),
        }
    }

    /// The mock primary store. Panics for environments without one.
    pub fn primary(&mut self) -> &mut mockito::ServerGuard {
        self.primary
            .as_mut()
            .expect("This environment has no mock primary store")
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Helper: serve `articles` as the primary store's collection, expecting
    /// `hits` requests.
    pub async fn mock_listing(&mut self, articles: &[serde_json::Value], hits: usize) -> mockito::Mock {
        self.primary()
            .mock("GET", "/articles")
            .expect(hits)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::Value::from(articles.to_vec()).to_string())
            .create_async()
            .await
    }

    /// Helper: answer `GET /articles/{id}` with `status` and `body`.
    pub async fn mock_item(&mut self, id: i64, status: usize, body: serde_json::Value) -> mockito::Mock {
        self.primary()
            .mock("GET", format!("/articles/{id}").as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Helper: accept any `POST /articles`.
    pub async fn mock_create(&mut self) -> mockito::Mock {
        self.primary()
            .mock("POST", "/articles")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await
    }
}

/// A stored article in the primary store's wire format.
pub fn article_json(id: i64, title: &str, category: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": format!("About {title}"),
        "category": category,
        "content": content,
        "readTime": "1 min read",
        "date": "Oct 24, 2023",
        "author": "Rahul Mehta",
        "authorRole": "Senior Financial Analyst",
        "image": "/blog-article.jpg"
    })
}

/// A valid create request body.
pub fn new_article_json(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "A short summary",
        "category": "FINANCE",
        "content": "Intro paragraph.\n\n## Details\n\n- one\n- two",
        "author": "Ananya Iyer",
        "authorRole": "Tax Consultant"
    })
}
