//! Helpers shared by the ordered collections (todos, ideas, articles).

use uuid::Uuid;

use crate::io::kv::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("content is required")]
    MissingContent,
    #[error("not a markdown file: {0}")]
    NotMarkdown(String),
    #[error("category name is required")]
    MissingCategoryName,
    #[error("category already exists: {0}")]
    DuplicateCategory(String),
    #[error("comment is empty")]
    EmptyComment,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A fresh opaque id
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Move the element at `from` so it ends up at index `to`.
///
/// Returns false (and leaves `items` alone) when either index is out of range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}

/// Split a comma-separated tag string, trimming and dropping empties.
/// Later duplicates are dropped.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// First `max_chars` characters of `s`
pub fn char_prefix(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
