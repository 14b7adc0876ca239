//! Blog articles, categories and the tag vocabulary.
//!
//! Admin operations (everything that writes) take an [`Authorized`] token.
//! Reader queries work on published articles only.

use chrono::{Local, NaiveDate, Utc};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

use crate::io::kv::{self, KvStore, StorageError};
use crate::model::article::{Article, Category, default_categories};
use crate::ops::auth::Authorized;
use crate::ops::collection::{ContentError, ValidationError, char_prefix, new_id, parse_tags};

pub const ARTICLES_KEY: &str = "blog_articles";
pub const CATEGORIES_KEY: &str = "blog_categories";
pub const TAGS_KEY: &str = "blog_tags";

/// Characters kept from the content when no excerpt is given
pub const EXCERPT_CHARS: usize = 150;
/// Upper bound for tag rankings
pub const MAX_POPULAR_TAGS: usize = 10;
/// Category filter value matching every category
pub const ALL_CATEGORIES: &str = "all";

const SLUG_MAX_CHARS: usize = 20;

static SLUG_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static SLUG_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-\x{4e00}-\x{9fa5}]+").expect("valid regex"));

/// Form input for the article editor
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    /// Blank means "first 150 characters of the content"
    pub excerpt: String,
    /// Category id; blank means the first category
    pub category: String,
    /// Comma-separated
    pub tags: String,
    pub published: bool,
    /// Publication date; blank keeps the current one (today for new articles)
    pub date: Option<NaiveDate>,
}

#[derive(Debug)]
pub struct ArticleStore<S: KvStore> {
    store: S,
    articles: Vec<Article>,
    categories: Vec<Category>,
    tags: Vec<String>,
}

impl<S: KvStore> ArticleStore<S> {
    pub fn load(store: S) -> Result<Self, StorageError> {
        let articles = kv::load(&store, ARTICLES_KEY)?.unwrap_or_default();
        let categories = kv::load(&store, CATEGORIES_KEY)?.unwrap_or_else(default_categories);
        let tags = kv::load(&store, TAGS_KEY)?.unwrap_or_default();
        Ok(ArticleStore {
            store,
            articles,
            categories,
            tags,
        })
    }

    /// All articles, drafts included, in stored order
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Every tag ever saved on an article
    pub fn known_tags(&self) -> &[String] {
        &self.tags
    }

    /// Published articles in stored order
    pub fn published(&self) -> Vec<&Article> {
        self.articles.iter().filter(|a| a.published).collect()
    }

    /// Most used tags across all articles, for the editor's suggestions.
    pub fn suggested_tags(&self) -> Vec<(String, usize)> {
        popular_tags(self.articles.iter(), MAX_POPULAR_TAGS)
    }

    fn default_category_id(&self) -> String {
        self.categories
            .first()
            .map_or_else(|| "other".to_string(), |c| c.id.clone())
    }

    fn save_articles(&mut self) -> Result<(), StorageError> {
        kv::save(&mut self.store, ARTICLES_KEY, &self.articles)
    }

    /// Merge `tags` into the vocabulary, saving only when it grew.
    fn remember_tags(&mut self, tags: &[String]) -> Result<(), StorageError> {
        let before = self.tags.len();
        for tag in tags {
            if !self.tags.contains(tag) {
                self.tags.push(tag.clone());
            }
        }
        if self.tags.len() != before {
            kv::save(&mut self.store, TAGS_KEY, &self.tags)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Admin operations
    // -----------------------------------------------------------------------

    pub fn add(&mut self, draft: &ArticleDraft, auth: &Authorized) -> Result<&Article, ContentError> {
        self.add_on(draft, Local::now().date_naive(), auth)
    }

    /// Prepend a new article dated as the draft says, else `today`.
    pub fn add_on(
        &mut self,
        draft: &ArticleDraft,
        today: NaiveDate,
        _auth: &Authorized,
    ) -> Result<&Article, ContentError> {
        let fields = self.validate(draft)?;
        let article = Article {
            id: new_id(),
            title: fields.title,
            content: fields.content,
            excerpt: fields.excerpt,
            category: fields.category,
            tags: fields.tags,
            date: draft.date.unwrap_or(today),
            published: draft.published,
            views: 0,
            likes: 0,
            comments: 0,
        };
        log::info!("event=article_add id={} published={}", article.id, article.published);
        self.insert_front(article)?;
        Ok(&self.articles[0])
    }

    fn insert_front(&mut self, article: Article) -> Result<(), StorageError> {
        let tags = article.tags.clone();
        self.articles.insert(0, article);
        if let Err(e) = self.save_articles() {
            self.articles.remove(0);
            return Err(e);
        }
        self.remember_tags(&tags)
    }

    /// Rewrite an article's editable fields. Counters stay, and so does the
    /// date unless the draft sets one.
    /// Returns false for an unknown id.
    pub fn update(
        &mut self,
        id: &str,
        draft: &ArticleDraft,
        _auth: &Authorized,
    ) -> Result<bool, ContentError> {
        let fields = self.validate(draft)?;
        let Some(idx) = self.articles.iter().position(|a| a.id == id) else {
            return Ok(false);
        };
        let before = self.articles[idx].clone();
        let article = &mut self.articles[idx];
        article.title = fields.title;
        article.content = fields.content;
        article.excerpt = fields.excerpt;
        article.category = fields.category;
        article.tags = fields.tags.clone();
        article.published = draft.published;
        if let Some(date) = draft.date {
            article.date = date;
        }
        if let Err(e) = self.save_articles() {
            self.articles[idx] = before;
            return Err(e.into());
        }
        self.remember_tags(&fields.tags)?;
        log::info!("event=article_update id={}", id);
        Ok(true)
    }

    /// Returns the new published state, or `None` for an unknown id.
    pub fn toggle_publish(
        &mut self,
        id: &str,
        _auth: &Authorized,
    ) -> Result<Option<bool>, StorageError> {
        let Some(idx) = self.articles.iter().position(|a| a.id == id) else {
            return Ok(None);
        };
        self.articles[idx].published = !self.articles[idx].published;
        if let Err(e) = self.save_articles() {
            self.articles[idx].published = !self.articles[idx].published;
            return Err(e);
        }
        Ok(Some(self.articles[idx].published))
    }

    pub fn delete(
        &mut self,
        id: &str,
        _auth: &Authorized,
    ) -> Result<Option<Article>, StorageError> {
        let Some(idx) = self.articles.iter().position(|a| a.id == id) else {
            return Ok(None);
        };
        let removed = self.articles.remove(idx);
        if let Err(e) = self.save_articles() {
            self.articles.insert(idx, removed);
            return Err(e);
        }
        kv::record_deleted(&self.store, ARTICLES_KEY, &removed);
        log::info!("event=article_delete id={}", id);
        Ok(Some(removed))
    }

    /// Create a category from a display name.
    pub fn add_category(&mut self, name: &str, _auth: &Authorized) -> Result<&Category, ContentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingCategoryName.into());
        }
        if self.categories.iter().any(|c| c.name == name) {
            return Err(ValidationError::DuplicateCategory(name.to_string()).into());
        }
        let category = Category {
            id: category_id(name, Utc::now().timestamp_millis()),
            name: name.to_string(),
            icon: "fa-folder".to_string(),
        };
        self.categories.push(category);
        if let Err(e) = kv::save(&mut self.store, CATEGORIES_KEY, &self.categories) {
            self.categories.pop();
            return Err(e.into());
        }
        log::info!("event=category_add id={}", self.categories[self.categories.len() - 1].id);
        Ok(&self.categories[self.categories.len() - 1])
    }

    /// Add an article parsed from a markdown file (see [`crate::ops::import`]).
    pub(crate) fn add_imported(
        &mut self,
        mut article: Article,
        _auth: &Authorized,
    ) -> Result<&Article, StorageError> {
        if article.category.is_empty() {
            article.category = self.default_category_id();
        }
        self.insert_front(article)?;
        Ok(&self.articles[0])
    }

    fn validate(&self, draft: &ArticleDraft) -> Result<ValidFields, ValidationError> {
        let title = draft.title.trim();
        let content = draft.content.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if content.is_empty() {
            return Err(ValidationError::MissingContent);
        }
        let excerpt = match draft.excerpt.trim() {
            "" => char_prefix(content, EXCERPT_CHARS).to_string(),
            given => given.to_string(),
        };
        let category = match draft.category.trim() {
            "" => self.default_category_id(),
            given => given.to_string(),
        };
        Ok(ValidFields {
            title: title.to_string(),
            content: content.to_string(),
            excerpt,
            category,
            tags: parse_tags(&draft.tags),
        })
    }
}

struct ValidFields {
    title: String,
    content: String,
    excerpt: String,
    category: String,
    tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Reader queries
// ---------------------------------------------------------------------------

/// Articles in `category` (or any, for `all`) whose title, excerpt or a tag
/// contains `query`, ignoring case. An empty query matches everything.
pub fn search<'a>(articles: &[&'a Article], category: &str, query: &str) -> Vec<&'a Article> {
    let query = query.trim().to_lowercase();
    articles
        .iter()
        .copied()
        .filter(|a| category == ALL_CATEGORIES || a.category == category)
        .filter(|a| {
            query.is_empty()
                || a.title.to_lowercase().contains(&query)
                || a.excerpt.to_lowercase().contains(&query)
                || a.tags.iter().any(|t| t.to_lowercase().contains(&query))
        })
        .collect()
}

/// Tag frequencies, most used first; ties keep first-seen order.
pub fn popular_tags<'a>(
    articles: impl IntoIterator<Item = &'a Article>,
    limit: usize,
) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for article in articles {
        for tag in &article.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, n)| (tag.to_string(), n))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit.min(MAX_POPULAR_TAGS));
    ranked
}

/// Category id: a slug of `name` plus a short base-36 time suffix.
pub fn category_id(name: &str, now_millis: i64) -> String {
    let lowered = name.to_lowercase();
    let dashed = SLUG_SPACE_RE.replace_all(&lowered, "-");
    let stripped = SLUG_STRIP_RE.replace_all(&dashed, "");
    let slug = char_prefix(&stripped, SLUG_MAX_CHARS);
    let stamp = to_base36(now_millis.unsigned_abs());
    let suffix = &stamp[stamp.len().saturating_sub(4)..];
    format!("{}-{}", slug, suffix)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryStore;
    use crate::ops::auth::test_gate;
    use pretty_assertions::assert_eq;

    fn auth() -> Authorized {
        test_gate().authorize().unwrap()
    }

    fn draft(title: &str, category: &str, tags: &str) -> ArticleDraft {
        ArticleDraft {
            title: title.into(),
            content: format!("# {title}\n\nBody of {title}."),
            category: category.into(),
            tags: tags.into(),
            published: true,
            ..Default::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn defaults_when_keys_absent() {
        let store = ArticleStore::load(MemoryStore::new()).unwrap();
        assert!(store.articles().is_empty());
        let ids: Vec<_> = store.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["frontend", "backend", "design", "tutorial", "other"]);
    }

    #[test]
    fn add_fills_excerpt_and_category() {
        let mut store = ArticleStore::load(MemoryStore::new()).unwrap();
        let mut d = draft("Hello", "", "rust, tui");
        d.content = "x".repeat(200);
        let article = store.add_on(&d, today(), &auth()).unwrap();
        assert_eq!(article.excerpt.chars().count(), EXCERPT_CHARS);
        assert_eq!(article.category, "frontend");
        assert_eq!(article.date, today());
        assert_eq!(store.known_tags(), &["rust".to_string(), "tui".to_string()]);
    }

    #[test]
    fn add_requires_title_and_content() {
        let mut store = ArticleStore::load(MemoryStore::new()).unwrap();
        let auth = auth();
        let mut d = draft(" ", "", "");
        assert!(matches!(
            store.add_on(&d, today(), &auth),
            Err(ContentError::Invalid(ValidationError::MissingTitle))
        ));
        d.title = "t".into();
        d.content = "  ".into();
        assert!(matches!(
            store.add_on(&d, today(), &auth),
            Err(ContentError::Invalid(ValidationError::MissingContent))
        ));
        assert!(store.articles().is_empty());
    }

    #[test]
    fn publish_toggle_and_reader_view() {
        let backing = MemoryStore::new();
        let mut store = ArticleStore::load(backing.clone()).unwrap();
        let auth = auth();
        let mut hidden = draft("Draft", "", "");
        hidden.published = false;
        let hidden_id = store.add_on(&hidden, today(), &auth).unwrap().id.clone();
        store.add_on(&draft("Live", "", ""), today(), &auth).unwrap();

        let titles: Vec<_> = store.published().iter().map(|a| a.title.clone()).collect();
        assert_eq!(titles, vec!["Live"]);

        assert_eq!(store.toggle_publish(&hidden_id, &auth).unwrap(), Some(true));
        assert_eq!(store.published().len(), 2);

        let reloaded = ArticleStore::load(backing).unwrap();
        assert_eq!(reloaded.articles(), store.articles());
    }

    #[test]
    fn update_keeps_date_and_counters() {
        let mut store = ArticleStore::load(MemoryStore::new()).unwrap();
        let auth = auth();
        let id = store.add_on(&draft("One", "", ""), today(), &auth).unwrap().id.clone();
        assert!(store.update(&id, &draft("Uno", "design", "x"), &auth).unwrap());
        let a = store.get(&id).unwrap();
        assert_eq!(a.title, "Uno");
        assert_eq!(a.category, "design");
        assert_eq!(a.date, today());
        assert!(!store.update("nope", &draft("x", "", ""), &auth).unwrap());
    }

    #[test]
    fn draft_date_overrides_today() {
        let mut store = ArticleStore::load(MemoryStore::new()).unwrap();
        let auth = auth();
        let launch = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let mut d = draft("Backdated", "", "");
        d.date = Some(launch);
        let id = store.add_on(&d, today(), &auth).unwrap().id.clone();
        assert_eq!(store.get(&id).unwrap().date, launch);

        d.date = Some(today());
        store.update(&id, &d, &auth).unwrap();
        assert_eq!(store.get(&id).unwrap().date, today());
    }

    #[test]
    fn delete_unknown_is_noop() {
        let mut store = ArticleStore::load(MemoryStore::new()).unwrap();
        let auth = auth();
        let id = store.add_on(&draft("One", "", ""), today(), &auth).unwrap().id.clone();
        assert!(store.delete("nope", &auth).unwrap().is_none());
        assert!(store.delete(&id, &auth).unwrap().is_some());
        assert!(store.articles().is_empty());
    }

    #[test]
    fn search_by_category_and_query() {
        let mut store = ArticleStore::load(MemoryStore::new()).unwrap();
        let auth = auth();
        store.add_on(&draft("Rust Tips", "backend", "Rust"), today(), &auth).unwrap();
        store.add_on(&draft("CSS Grid", "frontend", "css"), today(), &auth).unwrap();
        store.add_on(&draft("Ferris", "frontend", "rust, mascot"), today(), &auth).unwrap();

        let published = store.published();
        let titles = |v: Vec<&Article>| v.iter().map(|a| a.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(search(&published, "all", "RUST")), vec!["Ferris", "Rust Tips"]);
        assert_eq!(titles(search(&published, "frontend", "rust")), vec!["Ferris"]);
        assert_eq!(titles(search(&published, "frontend", "")), vec!["Ferris", "CSS Grid"]);
        assert!(search(&published, "design", "").is_empty());
    }

    #[test]
    fn popular_tags_rank_with_stable_ties() {
        let mut store = ArticleStore::load(MemoryStore::new()).unwrap();
        let auth = auth();
        store.add_on(&draft("a", "", "b, a"), today(), &auth).unwrap();
        store.add_on(&draft("b", "", "c, a"), today(), &auth).unwrap();
        // stored order: b (c, a), a (b, a)
        let ranked = popular_tags(store.articles(), 10);
        assert_eq!(
            ranked,
            vec![("a".to_string(), 2), ("c".to_string(), 1), ("b".to_string(), 1)]
        );
        assert_eq!(popular_tags(store.articles(), 1).len(), 1);
        assert_eq!(popular_tags(store.articles(), 50).len(), 3);
    }

    #[test]
    fn category_ids_are_slugged_with_suffix() {
        // 36^4 = 1679616; 1679616 + 10 in base 36 is "1000a"
        assert_eq!(category_id("Web Dev", 1_679_626), "web-dev-000a");
        assert_eq!(category_id("设计 思考!", 35), "设计-思考-z");
        let long = category_id("a very long category name indeed", 0);
        assert_eq!(long, "a-very-long-category-0");
    }

    #[test]
    fn add_category_rejects_blank_and_duplicates() {
        let mut store = ArticleStore::load(MemoryStore::new()).unwrap();
        let auth = auth();
        assert!(matches!(
            store.add_category("  ", &auth),
            Err(ContentError::Invalid(ValidationError::MissingCategoryName))
        ));
        assert!(matches!(
            store.add_category("Frontend", &auth),
            Err(ContentError::Invalid(ValidationError::DuplicateCategory(_)))
        ));
        let cat = store.add_category("Life", &auth).unwrap();
        assert!(cat.id.starts_with("life-"));
        assert_eq!(store.categories().len(), 6);
    }

    #[test]
    fn base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
