use crate::model::config::{ProfileConfig, Skill};
use crate::model::idea::Idea;
use crate::ops::collection::char_prefix;

/// Characters of an idea's content shown on a home card
pub const CARD_EXCERPT_CHARS: usize = 100;

/// Skill level filter value matching every level
pub const ALL_LEVELS: &str = "all";

/// A pinned idea as it appears on the home page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaCard {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
}

impl IdeaCard {
    /// Content longer than [`CARD_EXCERPT_CHARS`] is cut and marked with `...`.
    pub fn from_idea(idea: &Idea) -> Self {
        let excerpt = if idea.content.chars().count() > CARD_EXCERPT_CHARS {
            format!("{}...", char_prefix(&idea.content, CARD_EXCERPT_CHARS))
        } else {
            idea.content.clone()
        };
        IdeaCard {
            id: idea.id.clone(),
            title: idea.title.clone(),
            excerpt,
            tags: idea.tags.clone(),
        }
    }
}

/// Skills at `level` (case-insensitive), or all of them for `all`
pub fn filter_skills<'a>(profile: &'a ProfileConfig, level: &str) -> Vec<&'a Skill> {
    let level = level.trim();
    profile
        .skills
        .iter()
        .filter(|s| level.eq_ignore_ascii_case(ALL_LEVELS) || s.level.eq_ignore_ascii_case(level))
        .collect()
}
