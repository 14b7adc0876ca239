use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Task priority, shown as a colored marker in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a priority name (`low`, `medium`, `high`)
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" | "med" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Next priority in the low → medium → high → low cycle
    pub fn cycle(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

/// A to-do item scheduled on a calendar day.
///
/// Serialized with the camelCase field names used by the `todos` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub priority: Priority,
    pub completed: bool,
    /// The day the task is scheduled for (`YYYY-MM-DD` on disk)
    pub date_str: NaiveDate,
    /// Label computed from `date_str` at creation time; never recomputed
    pub display_date: String,
    pub created_at: DateTime<Utc>,
}

/// Shape of a stored item before migration. Older data may lack `dateStr`,
/// `displayDate` or `createdAt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTodo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub date_str: Option<String>,
    #[serde(default)]
    pub display_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Format a date as its canonical `YYYY-MM-DD` key
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` key
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Human label for a task date relative to `today`: "today", "yesterday",
/// "tomorrow", or "<Mon> <day>".
pub fn display_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "today".to_string()
    } else if date == today - Duration::days(1) {
        "yesterday".to_string()
    } else if date == today + Duration::days(1) {
        "tomorrow".to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}
