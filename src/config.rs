use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::AppError;

const DEFAULT_STORE_URL: &str = "http://localhost:3001";
const DEFAULT_COLLECTION: &str = "articles";
const DEFAULT_SNAPSHOT: &str = "public/db.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SITE_ROOT: &str = "public";
const DEFAULT_CACHE_CAPACITY: u64 = 1_000;

/// Runtime configuration read from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base address of the primary REST store (e.g., `http://localhost:3001`).
    pub store_url: Url,
    /// Name of the article collection on the primary store.
    pub collection: String,
    /// Location of the fallback snapshot: a file path or an `http(s)://` URL.
    pub snapshot: String,
    /// Address the HTTP front end listens on.
    pub bind_addr: SocketAddr,
    /// Directory of static assets (images, stylesheets) served as-is.
    pub site_root: PathBuf,
    /// Maximum number of cached entries per cache.
    pub cache_capacity: u64,
    /// Optional time-to-live of cached entries. `None` keeps entries until invalidated.
    pub cache_ttl: Option<Duration>,
}

impl AppConfig {
    /// Build the config from environment variables.
    ///
    /// All variables are optional:
    /// - `QUILL_STORE_URL` (default `http://localhost:3001`)
    /// - `QUILL_COLLECTION` (default `articles`)
    /// - `QUILL_SNAPSHOT` (default `public/db.json`)
    /// - `QUILL_BIND_ADDR` (default `127.0.0.1:3000`)
    /// - `QUILL_SITE_ROOT` (default `public`)
    /// - `QUILL_CACHE_CAPACITY` (default `1000`)
    /// - `QUILL_CACHE_TTL_SECS` (unset by default)
    pub fn from_env() -> Result<Self, AppError> {
        let store_url = std::env::var("QUILL_STORE_URL")
            .unwrap_or_else(|_| DEFAULT_STORE_URL.to_string());
        let collection = std::env::var("QUILL_COLLECTION")
            .unwrap_or_else(|_| DEFAULT_COLLECTION.to_string());
        let snapshot =
            std::env::var("QUILL_SNAPSHOT").unwrap_or_else(|_| DEFAULT_SNAPSHOT.to_string());
        let bind_addr = std::env::var("QUILL_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let site_root = std::env::var("QUILL_SITE_ROOT")
            .unwrap_or_else(|_| DEFAULT_SITE_ROOT.to_string());

        let cache_capacity = match std::env::var("QUILL_CACHE_CAPACITY") {
            Ok(raw) => parse_number("QUILL_CACHE_CAPACITY", &raw)?,
            Err(_) => DEFAULT_CACHE_CAPACITY,
        };
        let cache_ttl = match std::env::var("QUILL_CACHE_TTL_SECS") {
            Ok(raw) => Some(Duration::from_secs(parse_number(
                "QUILL_CACHE_TTL_SECS",
                &raw,
            )?)),
            Err(_) => None,
        };

        Ok(Self {
            store_url: parse_store_url(&store_url)?,
            collection,
            snapshot,
            bind_addr: bind_addr.parse().map_err(|e| {
                AppError::Config(format!("Invalid QUILL_BIND_ADDR '{bind_addr}': {e}"))
            })?,
            site_root: PathBuf::from(site_root),
            cache_capacity,
            cache_ttl,
        })
    }

    /// Build with explicit store and snapshot locations (useful for testing).
    ///
    /// The remaining fields take their defaults.
    pub fn new(store_url: &str, snapshot: impl Into<String>) -> Result<Self, AppError> {
        Ok(Self {
            store_url: parse_store_url(store_url)?,
            collection: DEFAULT_COLLECTION.to_string(),
            snapshot: snapshot.into(),
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid default bind address: {e}")))?,
            site_root: PathBuf::from(DEFAULT_SITE_ROOT),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl: None,
        })
    }
}

fn parse_store_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw)
        .map_err(|e| AppError::Config(format!("Invalid store URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(AppError::Config(format!(
            "Store URL '{raw}' cannot be used as a base address"
        )));
    }
    Ok(url)
}

fn parse_number(name: &str, raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {name} '{raw}': {e}")))
}
