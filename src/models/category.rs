use serde::{Deserialize, Serialize};
use std::fmt;

/// Article category.
///
/// The five known categories drive badge styling. Any other value is kept
/// verbatim in [`Category::Other`] so it survives a round trip through the
/// store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Finance,
    Career,
    Regulations,
    Skills,
    Technology,
    Other(String),
}

impl Category {
    /// The known categories, in the order they are offered to authors.
    pub const KNOWN: [Category; 5] = [
        Category::Finance,
        Category::Career,
        Category::Regulations,
        Category::Skills,
        Category::Technology,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Finance => "FINANCE",
            Category::Career => "CAREER",
            Category::Regulations => "REGULATIONS",
            Category::Skills => "SKILLS",
            Category::Technology => "TECHNOLOGY",
            Category::Other(value) => value,
        }
    }

    /// CSS classes for the category badge. Unknown categories get a neutral style.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Category::Finance => "badge badge-finance",
            Category::Career => "badge badge-career",
            Category::Regulations => "badge badge-regulations",
            Category::Skills => "badge badge-skills",
            Category::Technology => "badge badge-technology",
            Category::Other(_) => "badge badge-default",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "FINANCE" => Category::Finance,
            "CAREER" => Category::Career,
            "REGULATIONS" => Category::Regulations,
            "SKILLS" => Category::Skills,
            "TECHNOLOGY" => Category::Technology,
            _ => Category::Other(value),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
