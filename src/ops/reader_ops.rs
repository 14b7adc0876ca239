//! Reader-side state for the article page: likes, bookmarks and comments.
//!
//! `article_liked` and `article_bookmarked` hold the page's boolean, the
//! state left by the most recent toggle. Which articles carry the mark is
//! kept beside them under `<key>_ids`; until that list exists the boolean
//! applies to every article. `article_comments` is one list, newest first.
//! Not password-gated.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::io::kv::{self, KvStore, StorageError};
use crate::model::article::Comment;
use crate::ops::collection::{ContentError, ValidationError, new_id};

pub const LIKED_KEY: &str = "article_liked";
pub const BOOKMARKED_KEY: &str = "article_bookmarked";
pub const COMMENTS_KEY: &str = "article_comments";

/// A per-article mark stored as the page boolean plus the marked ids.
#[derive(Debug, Clone, Default)]
struct Mark {
    page: bool,
    ids: Option<Vec<String>>,
}

impl Mark {
    fn load(store: &impl KvStore, key: &str) -> Result<Self, StorageError> {
        Ok(Mark {
            page: kv::load(store, key)?.unwrap_or(false),
            ids: kv::load(store, &ids_key(key))?,
        })
    }

    fn is_set(&self, article_id: &str) -> bool {
        match &self.ids {
            Some(ids) => ids.iter().any(|id| id == article_id),
            None => self.page,
        }
    }

    fn ids(&self) -> &[String] {
        self.ids.as_deref().unwrap_or_default()
    }

    /// Flip the mark on one article and persist both keys. A failed write
    /// leaves the mark as it was.
    fn toggle(
        &mut self,
        store: &mut impl KvStore,
        key: &str,
        article_id: &str,
    ) -> Result<bool, StorageError> {
        let before = self.clone();
        let now = !self.is_set(article_id);
        let ids = self.ids.get_or_insert_with(Vec::new);
        ids.retain(|id| id != article_id);
        if now {
            ids.push(article_id.to_string());
        }
        self.page = now;

        let saved = kv::save(store, &ids_key(key), &*ids).and_then(|_| kv::save(store, key, &now));
        if let Err(e) = saved {
            *self = before;
            return Err(e);
        }
        Ok(now)
    }
}

fn ids_key(key: &str) -> String {
    format!("{}_ids", key)
}

#[derive(Debug)]
pub struct ReaderState<S: KvStore> {
    store: S,
    liked: Mark,
    bookmarked: Mark,
    comments: Vec<Comment>,
}

impl<S: KvStore> ReaderState<S> {
    pub fn load(store: S) -> Result<Self, StorageError> {
        Ok(ReaderState {
            liked: Mark::load(&store, LIKED_KEY)?,
            bookmarked: Mark::load(&store, BOOKMARKED_KEY)?,
            comments: kv::load(&store, COMMENTS_KEY)?.unwrap_or_default(),
            store,
        })
    }

    pub fn is_liked(&self, article_id: &str) -> bool {
        self.liked.is_set(article_id)
    }

    pub fn is_bookmarked(&self, article_id: &str) -> bool {
        self.bookmarked.is_set(article_id)
    }

    /// Bookmarked article ids, oldest first
    pub fn bookmarks(&self) -> &[String] {
        self.bookmarked.ids()
    }

    /// Returns whether the article is now liked.
    pub fn toggle_like(&mut self, article_id: &str) -> Result<bool, StorageError> {
        self.liked.toggle(&mut self.store, LIKED_KEY, article_id)
    }

    /// Returns whether the article is now bookmarked.
    pub fn toggle_bookmark(&mut self, article_id: &str) -> Result<bool, StorageError> {
        self.bookmarked
            .toggle(&mut self.store, BOOKMARKED_KEY, article_id)
    }

    /// Comments shown on an article, newest first. Comments saved without an
    /// article id show everywhere.
    pub fn comments(&self, article_id: &str) -> Vec<&Comment> {
        self.comments
            .iter()
            .filter(|c| c.article_id.as_deref().is_none_or(|id| id == article_id))
            .collect()
    }

    pub fn add_comment(
        &mut self,
        article_id: &str,
        content: &str,
    ) -> Result<&Comment, ContentError> {
        self.add_comment_at(article_id, content, Utc::now())
    }

    /// Prepend a comment signed by a generated guest name.
    pub fn add_comment_at(
        &mut self,
        article_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<&Comment, ContentError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyComment.into());
        }
        let comment = Comment {
            id: new_id(),
            author: guest_name(),
            content: content.to_string(),
            time: now,
            likes: 0,
            article_id: Some(article_id.to_string()),
        };
        self.comments.insert(0, comment);
        if let Err(e) = kv::save(&mut self.store, COMMENTS_KEY, &self.comments) {
            self.comments.remove(0);
            return Err(e.into());
        }
        log::info!("event=comment_add article={}", article_id);
        Ok(&self.comments[0])
    }
}

/// `Guest` followed by a number below 1000
fn guest_name() -> String {
    format!("Guest{}", Uuid::new_v4().as_u128() % 1000)
}
