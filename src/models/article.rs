use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::category::Category;

/// Identifier of an article. Wide enough for time-derived ids.
pub type ArticleId = i64;

/// Average reading speed used for the read-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Image assigned to new articles that don't provide one.
pub const DEFAULT_IMAGE: &str = "/blog-article.jpg";

/// A blog article as stored by the primary store and the fallback snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    /// Raw body using the line-prefix markup (see [`crate::rendering::blocks`]).
    pub content: String,
    /// Display string such as `5 min read`, fixed at creation.
    #[serde(default)]
    pub read_time: String,
    /// Display string such as `Oct 24, 2023`, fixed at creation.
    #[serde(default)]
    pub date: String,
    pub author: String,
    #[serde(default)]
    pub author_role: String,
    /// URL or placeholder path. Not checked for existence.
    #[serde(default)]
    pub image: String,
}

impl Article {
    /// Build a complete record from validated input.
    ///
    /// `date` and `read_time` are computed here once and never recomputed.
    pub fn compose<Tz: TimeZone>(input: NewArticle, id: ArticleId, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let read_time = format_read_time(read_time_minutes(&input.content));

        Self {
            id,
            title: input.title,
            description: input.description,
            category: Category::from(input.category),
            read_time,
            date: format_display_date(now),
            author: input.author,
            author_role: input.author_role.unwrap_or_default(),
            image: input
                .image
                .filter(|image| !image.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            content: input.content,
        }
    }

    /// First letter of the author's name, used for the avatar fallback.
    pub fn author_initial(&self) -> Option<char> {
        self.author.chars().next()
    }
}

/// Input of the create operation.
///
/// Every field deserializes to its empty default so that a missing field
/// surfaces as a [`AppError::Validation`] instead of a decoding error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_role: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewArticle {
    /// Check that all mandatory fields carry non-blank text.
    ///
    /// `author_role` and `image` are optional.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("author", &self.author),
            ("category", &self.category),
            ("content", &self.content),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// Whitespace-separated word count of an article body.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Estimated reading time in whole minutes, rounded up.
pub fn read_time_minutes(content: &str) -> usize {
    word_count(content).div_ceil(WORDS_PER_MINUTE)
}

pub fn format_read_time(minutes: usize) -> String {
    format!("{minutes} min read")
}

/// Format a timestamp like `Oct 24, 2023`.
pub fn format_display_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} {}, {}", now.format("%b"), now.day(), now.year())
}
