//! The ideas board.
//!
//! Not password-gated. When nothing has been saved yet the board shows
//! three seed ideas; they are written out with the first mutation.

use chrono::{DateTime, Utc};

use crate::io::kv::{self, KvStore, StorageError};
use crate::model::idea::{Idea, seed_ideas};
use crate::ops::collection::{ContentError, ValidationError, new_id, parse_tags};

pub const IDEAS_KEY: &str = "ideas";

/// How many pinned ideas the home page shows
pub const HOME_PINNED_LIMIT: usize = 3;

/// Form input for creating or editing an idea
#[derive(Debug, Clone, Default)]
pub struct IdeaDraft {
    pub title: String,
    pub content: String,
    /// Comma-separated
    pub tags: String,
    pub pinned: bool,
}

#[derive(Debug)]
pub struct IdeaStore<S: KvStore> {
    store: S,
    ideas: Vec<Idea>,
}

impl<S: KvStore> IdeaStore<S> {
    pub fn load(store: S) -> Result<Self, StorageError> {
        let ideas = match kv::load::<Vec<Idea>>(&store, IDEAS_KEY)? {
            Some(ideas) => ideas,
            None => seed_ideas(new_id),
        };
        Ok(IdeaStore { store, ideas })
    }

    /// Ideas in stored order
    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn get(&self, id: &str) -> Option<&Idea> {
        self.ideas.iter().find(|i| i.id == id)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        kv::save(&mut self.store, IDEAS_KEY, &self.ideas)
    }

    pub fn add(&mut self, draft: &IdeaDraft) -> Result<&Idea, ContentError> {
        self.add_at(draft, Utc::now())
    }

    pub fn add_at(&mut self, draft: &IdeaDraft, now: DateTime<Utc>) -> Result<&Idea, ContentError> {
        let (title, content) = validate(draft)?;
        let idea = Idea {
            id: new_id(),
            title,
            content,
            tags: parse_tags(&draft.tags),
            pinned: draft.pinned,
            date: now,
        };
        log::info!("event=idea_add id={}", idea.id);
        self.ideas.insert(0, idea);
        if let Err(e) = self.persist() {
            self.ideas.remove(0);
            return Err(e.into());
        }
        Ok(&self.ideas[0])
    }

    /// Replace title, content, tags and pin state; the date stays.
    /// Returns false for an unknown id.
    pub fn update(&mut self, id: &str, draft: &IdeaDraft) -> Result<bool, ContentError> {
        let (title, content) = validate(draft)?;
        let Some(idx) = self.ideas.iter().position(|i| i.id == id) else {
            return Ok(false);
        };
        let before = self.ideas[idx].clone();
        let idea = &mut self.ideas[idx];
        idea.title = title;
        idea.content = content;
        idea.tags = parse_tags(&draft.tags);
        idea.pinned = draft.pinned;
        if let Err(e) = self.persist() {
            self.ideas[idx] = before;
            return Err(e.into());
        }
        Ok(true)
    }

    /// Returns the new pin state, or `None` for an unknown id.
    pub fn toggle_pin(&mut self, id: &str) -> Result<Option<bool>, StorageError> {
        let Some(idx) = self.ideas.iter().position(|i| i.id == id) else {
            return Ok(None);
        };
        self.ideas[idx].pinned = !self.ideas[idx].pinned;
        if let Err(e) = self.persist() {
            self.ideas[idx].pinned = !self.ideas[idx].pinned;
            return Err(e);
        }
        Ok(Some(self.ideas[idx].pinned))
    }

    pub fn delete(&mut self, id: &str) -> Result<Option<Idea>, StorageError> {
        let Some(idx) = self.ideas.iter().position(|i| i.id == id) else {
            return Ok(None);
        };
        let removed = self.ideas.remove(idx);
        if let Err(e) = self.persist() {
            self.ideas.insert(idx, removed);
            return Err(e);
        }
        kv::record_deleted(&self.store, IDEAS_KEY, &removed);
        log::info!("event=idea_delete id={}", id);
        Ok(Some(removed))
    }

    /// Board order: pinned first, then newest first.
    pub fn board(&self) -> Vec<&Idea> {
        let mut board: Vec<&Idea> = self.ideas.iter().collect();
        board.sort_by(|a, b| b.pinned.cmp(&a.pinned).then(b.date.cmp(&a.date)));
        board
    }

}

/// The first pinned saved ideas in stored order, for the home page. Seed
/// ideas are never shown there: nothing saved means nothing pinned.
pub fn pinned_for_home(store: &impl KvStore) -> Result<Vec<Idea>, StorageError> {
    let ideas: Vec<Idea> = kv::load(store, IDEAS_KEY)?.unwrap_or_default();
    Ok(ideas
        .into_iter()
        .filter(|i| i.pinned)
        .take(HOME_PINNED_LIMIT)
        .collect())
}

fn validate(draft: &IdeaDraft) -> Result<(String, String), ValidationError> {
    let title = draft.title.trim();
    let content = draft.content.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if content.is_empty() {
        return Err(ValidationError::MissingContent);
    }
    Ok((title.to_string(), content.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryStore;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn draft(title: &str, content: &str, tags: &str) -> IdeaDraft {
        IdeaDraft {
            title: title.into(),
            content: content.into(),
            tags: tags.into(),
            pinned: false,
        }
    }

    #[test]
    fn absent_key_shows_seeds_without_saving() {
        let backing = MemoryStore::new();
        let store = IdeaStore::load(backing.clone()).unwrap();
        assert_eq!(store.ideas().len(), 3);
        assert!(store.ideas().iter().any(|i| i.pinned));
        assert!(!backing.contains(IDEAS_KEY));
        // the home page only shows what was saved
        assert!(pinned_for_home(&backing).unwrap().is_empty());
    }

    #[test]
    fn saved_empty_board_stays_empty() {
        let mut backing = MemoryStore::new();
        backing.set_raw(IDEAS_KEY, "[]").unwrap();
        let store = IdeaStore::load(backing).unwrap();
        assert!(store.ideas().is_empty());
    }

    #[test]
    fn add_validates_and_prepends() {
        let backing = MemoryStore::new();
        let mut store = IdeaStore::load(backing.clone()).unwrap();
        assert!(matches!(
            store.add(&draft("  ", "body", "")),
            Err(ContentError::Invalid(ValidationError::MissingTitle))
        ));
        assert!(matches!(
            store.add(&draft("t", " ", "")),
            Err(ContentError::Invalid(ValidationError::MissingContent))
        ));

        let idea = store.add(&draft(" New ", " body ", "a, b,,a")).unwrap();
        assert_eq!(idea.title, "New");
        assert_eq!(idea.tags, vec!["a".to_string(), "b".to_string()]);
        assert!(!idea.pinned);
        assert_eq!(store.ideas().len(), 4);
        assert_eq!(store.ideas()[0].title, "New");
        assert!(backing.contains(IDEAS_KEY));
    }

    #[test]
    fn board_orders_pinned_then_newest() {
        let mut backing = MemoryStore::new();
        backing.set_raw(IDEAS_KEY, "[]").unwrap();
        let mut store = IdeaStore::load(backing).unwrap();
        let t0 = Utc::now();
        let old_id = store.add_at(&draft("old", "x", ""), t0).unwrap().id.clone();
        store.add_at(&draft("mid", "x", ""), t0 + Duration::hours(1)).unwrap();
        store.add_at(&draft("new", "x", ""), t0 + Duration::hours(2)).unwrap();
        store.toggle_pin(&old_id).unwrap();

        let titles: Vec<_> = store.board().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["old", "new", "mid"]);
    }

    #[test]
    fn update_pin_and_delete() {
        let mut store = IdeaStore::load(MemoryStore::new()).unwrap();
        let id = store.add(&draft("a", "b", "")).unwrap().id.clone();

        assert!(store.update(&id, &draft("A", "B", "x")).unwrap());
        assert_eq!(store.get(&id).unwrap().title, "A");
        assert!(!store.get(&id).unwrap().pinned);
        assert!(!store.update("missing", &draft("A", "B", "")).unwrap());

        assert_eq!(store.toggle_pin(&id).unwrap(), Some(true));
        assert_eq!(store.toggle_pin("missing").unwrap(), None);

        assert!(store.delete(&id).unwrap().is_some());
        assert!(store.get(&id).is_none());
        assert!(store.delete(&id).unwrap().is_none());
    }

    #[test]
    fn home_shows_at_most_three_pinned_in_stored_order() {
        let mut backing = MemoryStore::new();
        backing.set_raw(IDEAS_KEY, "[]").unwrap();
        let mut store = IdeaStore::load(backing.clone()).unwrap();
        for n in 0..5 {
            let id = store.add(&draft(&format!("i{n}"), "x", "")).unwrap().id.clone();
            store.toggle_pin(&id).unwrap();
        }
        let titles: Vec<_> = pinned_for_home(&backing)
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["i4", "i3", "i2"]);
    }

    #[test]
    fn pin_state_comes_from_the_draft() {
        let mut store = IdeaStore::load(MemoryStore::new()).unwrap();
        let mut d = draft("Pinned at birth", "x", "");
        d.pinned = true;
        let id = store.add(&d).unwrap().id.clone();
        assert!(store.get(&id).unwrap().pinned);
        assert_eq!(store.board()[0].id, id);

        d.pinned = false;
        store.update(&id, &d).unwrap();
        assert!(!store.get(&id).unwrap().pinned);
    }
}
