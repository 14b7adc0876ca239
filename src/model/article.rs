use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A blog article. Stored under `blog_articles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    /// Markdown body
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    /// Category id (see [`Category`])
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
}

/// A blog category. Stored under `blog_categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl Category {
    fn new(id: &str, name: &str, icon: &str) -> Self {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Categories presented when none have been saved yet
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("frontend", "Frontend", "fa-palette"),
        Category::new("backend", "Backend", "fa-server"),
        Category::new("design", "UI/UX Design", "fa-paint-brush"),
        Category::new("tutorial", "Tutorials", "fa-book"),
        Category::new("other", "Other", "fa-folder"),
    ]
}

/// A reader comment on the article page. Stored under `article_comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub content: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub likes: u64,
    /// Article the comment was left on. Older comments carry none and show
    /// on every article.
    #[serde(rename = "articleId", default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,
}
