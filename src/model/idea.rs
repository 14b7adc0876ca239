use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A card on the ideas board. Stored under `ideas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
    pub date: DateTime<Utc>,
}

/// The board shown before anything has been saved
pub fn seed_ideas(new_id: impl Fn() -> String) -> Vec<Idea> {
    let seed = |title: &str, content: &str, tags: &[&str], pinned: bool, day: u32| Idea {
        id: new_id(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        pinned,
        date: NaiveDate::from_ymd_opt(2025, 10, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or_default(),
    };
    vec![
        seed(
            "Rebuild the personal site",
            "Redesign the whole site in a minimal Nordic style, with generous whitespace and clear hierarchy.",
            &["design", "website", "minimal"],
            true,
            28,
        ),
        seed(
            "Learn a new stack",
            "Dig into the new TypeScript and React 18 features to speed up day-to-day work.",
            &["tech", "learning", "TypeScript"],
            true,
            27,
        ),
        seed(
            "Open source plan",
            "Build a lightweight UI component library focused on accessibility and performance.",
            &["open-source", "components", "UI"],
            false,
            26,
        ),
    ]
}
