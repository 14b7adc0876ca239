//! The dashboard's to-do store.
//!
//! Owns the `todos` collection in memory and writes the whole collection
//! back after every mutation. Mutations need an [`Authorized`] token; ids
//! that are no longer present are silently ignored.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::io::kv::{self, KvStore, StorageError};
use crate::model::todo::{Priority, StoredTodo, TodoItem, display_date, parse_date_key};
use crate::ops::auth::Authorized;
use crate::ops::collection::{move_item, new_id};

pub const TODOS_KEY: &str = "todos";

/// Which tasks the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Today,
    /// Tasks scheduled on the selected calendar day
    Date(NaiveDate),
    Active,
    Completed,
}

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Today => "today",
            Filter::Date(_) => "date",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    /// Parse a filter name. `date` without a selected day falls back to `all`.
    pub fn parse(name: &str, selected: Option<NaiveDate>) -> Option<Filter> {
        match name.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Filter::All),
            "today" => Some(Filter::Today),
            "date" => Some(selected.map_or(Filter::All, Filter::Date)),
            "active" => Some(Filter::Active),
            "completed" | "done" => Some(Filter::Completed),
            _ => None,
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        match self {
            Filter::Date(d) => Some(*d),
            _ => None,
        }
    }

    fn matches(&self, item: &TodoItem, today: NaiveDate) -> bool {
        match self {
            Filter::All => true,
            Filter::Today => item.date_str == today,
            Filter::Date(d) => item.date_str == *d,
            Filter::Active => !item.completed,
            Filter::Completed => item.completed,
        }
    }
}

/// Counters shown above the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug)]
pub struct TodoStore<S: KvStore> {
    store: S,
    items: Vec<TodoItem>,
}

impl<S: KvStore> TodoStore<S> {
    /// Load `todos`, migrating legacy items to today's date.
    pub fn load(store: S) -> Result<Self, StorageError> {
        Self::load_on(store, Local::now().date_naive(), Utc::now())
    }

    /// [`TodoStore::load`] with an explicit clock.
    pub fn load_on(store: S, today: NaiveDate, now: DateTime<Utc>) -> Result<Self, StorageError> {
        let stored: Vec<StoredTodo> = kv::load(&store, TODOS_KEY)?.unwrap_or_default();
        let (items, migrated) = migrate(stored, today, now);
        let mut todos = TodoStore { store, items };
        if migrated > 0 {
            log::info!("event=todo_migrate status=ok migrated={}", migrated);
            todos.persist()?;
        }
        Ok(todos)
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&TodoItem> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Backing index of `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|t| t.id == id)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        kv::save(&mut self.store, TODOS_KEY, &self.items)
    }

    /// Apply `change` and persist. A failed write rolls the change back.
    fn commit(&mut self, change: impl FnOnce(&mut Vec<TodoItem>)) -> Result<(), StorageError> {
        let before = self.items.clone();
        change(&mut self.items);
        if let Err(e) = self.persist() {
            self.items = before;
            return Err(e);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Prepend a task. Empty text (after trimming) is a no-op returning
    /// `None`. The task is scheduled on `target`, or today.
    pub fn add(
        &mut self,
        text: &str,
        priority: Priority,
        target: Option<NaiveDate>,
        auth: &Authorized,
    ) -> Result<Option<&TodoItem>, StorageError> {
        self.add_on(text, priority, target, Local::now().date_naive(), auth)
    }

    pub fn add_on(
        &mut self,
        text: &str,
        priority: Priority,
        target: Option<NaiveDate>,
        today: NaiveDate,
        _auth: &Authorized,
    ) -> Result<Option<&TodoItem>, StorageError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let date = target.unwrap_or(today);
        let item = TodoItem {
            id: new_id(),
            text: text.to_string(),
            priority,
            completed: false,
            date_str: date,
            display_date: display_date(date, today),
            created_at: Utc::now(),
        };
        log::info!("event=todo_add id={} date={}", item.id, item.date_str);
        self.commit(|items| items.insert(0, item))?;
        Ok(self.items.first())
    }

    /// Flip `completed`. Returns the new state, or `None` for an unknown id.
    pub fn toggle(&mut self, id: &str, _auth: &Authorized) -> Result<Option<bool>, StorageError> {
        let Some(idx) = self.position(id) else {
            return Ok(None);
        };
        self.commit(|items| items[idx].completed = !items[idx].completed)?;
        let completed = self.items[idx].completed;
        log::info!("event=todo_toggle id={} completed={}", id, completed);
        Ok(Some(completed))
    }

    /// Remove a task by id, returning it.
    pub fn delete(
        &mut self,
        id: &str,
        _auth: &Authorized,
    ) -> Result<Option<TodoItem>, StorageError> {
        let Some(idx) = self.position(id) else {
            return Ok(None);
        };
        let removed = self.items[idx].clone();
        self.commit(|items| {
            items.remove(idx);
        })?;
        kv::record_deleted(&self.store, TODOS_KEY, &removed);
        log::info!("event=todo_delete id={}", id);
        Ok(Some(removed))
    }

    /// Move the task at backing index `from` to backing index `to`.
    /// Out-of-range indices are a no-op returning false.
    pub fn reorder(
        &mut self,
        from: usize,
        to: usize,
        _auth: &Authorized,
    ) -> Result<bool, StorageError> {
        if from >= self.items.len() || to >= self.items.len() {
            return Ok(false);
        }
        if from != to {
            self.commit(|items| {
                move_item(items, from, to);
            })?;
            log::info!("event=todo_reorder from={} to={}", from, to);
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Tasks passing `filter`, in stored order.
    pub fn filtered_view(&self, filter: &Filter, today: NaiveDate) -> Vec<&TodoItem> {
        self.items
            .iter()
            .filter(|t| filter.matches(t, today))
            .collect()
    }

    pub fn has_tasks_on(&self, date: NaiveDate) -> bool {
        self.items.iter().any(|t| t.date_str == date)
    }

    /// Total and completed counts over the filtered view.
    pub fn stats(&self, filter: &Filter, today: NaiveDate) -> Stats {
        let view = self.filtered_view(filter, today);
        Stats {
            total: view.len(),
            completed: view.iter().filter(|t| t.completed).count(),
        }
    }
}

/// Fill in what older data lacks. Returns the items and how many changed.
fn migrate(
    stored: Vec<StoredTodo>,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> (Vec<TodoItem>, usize) {
    let mut migrated = 0;
    let items = stored
        .into_iter()
        .map(|raw| {
            let mut changed = false;
            let (date_str, display) = match raw.date_str.as_deref().and_then(parse_date_key) {
                Some(date) => {
                    let display = raw.display_date.unwrap_or_else(|| {
                        changed = true;
                        display_date(date, today)
                    });
                    (date, display)
                }
                None => {
                    changed = true;
                    (today, "today".to_string())
                }
            };
            let created_at = raw.created_at.unwrap_or_else(|| {
                changed = true;
                now
            });
            let id = if raw.id.is_empty() {
                changed = true;
                new_id()
            } else {
                raw.id
            };
            let priority = raw.priority.unwrap_or_else(|| {
                changed = true;
                Priority::default()
            });
            if changed {
                migrated += 1;
            }
            TodoItem {
                id,
                text: raw.text,
                priority,
                completed: raw.completed,
                date_str,
                display_date: display,
                created_at,
            }
        })
        .collect();
    (items, migrated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryStore;
    use crate::ops::auth::test_gate;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TODAY: (i32, u32, u32) = (2026, 10, 19);

    fn today() -> NaiveDate {
        d(TODAY.0, TODAY.1, TODAY.2)
    }

    fn empty_store() -> (TodoStore<MemoryStore>, MemoryStore) {
        let backing = MemoryStore::new();
        let store = TodoStore::load_on(backing.clone(), today(), Utc::now()).unwrap();
        (store, backing)
    }

    fn auth() -> Authorized {
        test_gate().authorize().unwrap()
    }

    fn texts(items: &[&TodoItem]) -> Vec<String> {
        items.iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn buy_milk_scenario() {
        let (mut store, _) = empty_store();
        let auth = auth();
        let id = store
            .add_on("Buy milk", Priority::High, None, today(), &auth)
            .unwrap()
            .unwrap()
            .id
            .clone();

        assert_eq!(store.items().len(), 1);
        let item = &store.items()[0];
        assert!(!item.completed);
        assert_eq!(item.date_str, today());
        assert_eq!(item.display_date, "today");
        assert_eq!(item.priority, Priority::High);

        assert_eq!(store.toggle(&id, &auth).unwrap(), Some(true));
        assert!(store.items()[0].completed);

        assert!(store.delete(&id, &auth).unwrap().is_some());
        assert!(store.items().is_empty());
    }

    #[test]
    fn add_prepends_and_trims() {
        let (mut store, _) = empty_store();
        let auth = auth();
        store.add_on("first", Priority::Low, None, today(), &auth).unwrap();
        store
            .add_on("  second  ", Priority::Medium, None, today(), &auth)
            .unwrap();
        assert_eq!(store.items().len(), 2);
        assert_eq!(store.items()[0].text, "second");
        assert_eq!(store.items()[1].text, "first");
    }

    #[test]
    fn add_empty_text_is_noop() {
        let (mut store, backing) = empty_store();
        let auth = auth();
        assert!(store.add_on("   ", Priority::High, None, today(), &auth).unwrap().is_none());
        assert!(store.items().is_empty());
        assert!(!backing.contains(TODOS_KEY));
    }

    #[test]
    fn add_on_selected_date_labels_relative_to_today() {
        let (mut store, _) = empty_store();
        let auth = auth();
        let item = store
            .add_on("dentist", Priority::Medium, Some(d(2026, 10, 20)), today(), &auth)
            .unwrap()
            .unwrap();
        assert_eq!(item.date_str, d(2026, 10, 20));
        assert_eq!(item.display_date, "tomorrow");
    }

    #[test]
    fn unknown_ids_are_noops() {
        let (mut store, _) = empty_store();
        let auth = auth();
        store.add_on("x", Priority::Low, None, today(), &auth).unwrap();
        assert_eq!(store.toggle("missing", &auth).unwrap(), None);
        assert!(store.delete("missing", &auth).unwrap().is_none());
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn reorder_moves_within_backing_sequence() {
        let (mut store, _) = empty_store();
        let auth = auth();
        for t in ["c", "b", "a"] {
            store.add_on(t, Priority::Low, None, today(), &auth).unwrap();
        }
        assert!(store.reorder(0, 2, &auth).unwrap());
        let order: Vec<_> = store.items().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert!(!store.reorder(0, 3, &auth).unwrap());
    }

    #[test]
    fn filtered_view_by_date_is_order_preserving_subset() {
        let (mut store, _) = empty_store();
        let auth = auth();
        let other = d(2026, 10, 25);
        store.add_on("a", Priority::Low, Some(other), today(), &auth).unwrap();
        store.add_on("b", Priority::Low, None, today(), &auth).unwrap();
        store.add_on("c", Priority::Low, Some(other), today(), &auth).unwrap();

        let view = store.filtered_view(&Filter::Date(other), today());
        assert_eq!(texts(&view), vec!["c", "a"]);
        assert_eq!(texts(&store.filtered_view(&Filter::Today, today())), vec!["b"]);
        assert!(store.has_tasks_on(other));
        assert!(!store.has_tasks_on(d(2026, 10, 26)));
    }

    #[test]
    fn stats_follow_filter() {
        let (mut store, _) = empty_store();
        let auth = auth();
        store.add_on("a", Priority::Low, None, today(), &auth).unwrap();
        let id = store
            .add_on("b", Priority::Low, None, today(), &auth)
            .unwrap()
            .unwrap()
            .id
            .clone();
        store.toggle(&id, &auth).unwrap();

        assert_eq!(store.stats(&Filter::All, today()), Stats { total: 2, completed: 1 });
        assert_eq!(store.stats(&Filter::Active, today()), Stats { total: 1, completed: 0 });
        assert_eq!(
            store.stats(&Filter::Completed, today()),
            Stats { total: 1, completed: 1 }
        );
    }

    #[test]
    fn persist_then_reload_is_equal() {
        let (mut store, backing) = empty_store();
        let auth = auth();
        store.add_on("one", Priority::High, Some(d(2026, 11, 1)), today(), &auth).unwrap();
        store.add_on("two", Priority::Low, None, today(), &auth).unwrap();

        let reloaded = TodoStore::load_on(backing, today(), Utc::now()).unwrap();
        assert_eq!(reloaded.items(), store.items());
    }

    #[test]
    fn legacy_items_migrate_once() {
        let mut backing = MemoryStore::new();
        backing
            .set_raw(
                TODOS_KEY,
                r#"[{"id":"old","text":"legacy","priority":"low","completed":false},
                    {"id":"blank","text":"blank date","priority":"high","completed":true,"dateStr":""}]"#,
            )
            .unwrap();

        let store = TodoStore::load_on(backing.clone(), today(), Utc::now()).unwrap();
        for item in store.items() {
            assert_eq!(item.date_str, today());
            assert_eq!(item.display_date, "today");
        }
        let first_pass = backing.get_raw(TODOS_KEY).unwrap();

        let again = TodoStore::load_on(backing.clone(), today(), Utc::now()).unwrap();
        assert_eq!(again.items(), store.items());
        assert_eq!(backing.get_raw(TODOS_KEY).unwrap(), first_pass);
    }

    #[test]
    fn migration_keeps_valid_fields() {
        let stored: Vec<StoredTodo> = serde_json::from_str(
            r#"[{"id":"k","text":"keep","priority":"high","completed":true,
                 "dateStr":"2026-10-01","displayDate":"Oct 1","createdAt":"2026-09-30T10:00:00Z"}]"#,
        )
        .unwrap();
        let (items, migrated) = migrate(stored, today(), Utc::now());
        assert_eq!(migrated, 0);
        assert_eq!(items[0].date_str, d(2026, 10, 1));
        assert_eq!(items[0].display_date, "Oct 1");
    }

    #[test]
    fn filter_parse() {
        assert_eq!(Filter::parse("date", None), Some(Filter::All));
        assert_eq!(
            Filter::parse("date", Some(today())),
            Some(Filter::Date(today()))
        );
        assert_eq!(Filter::parse("Completed", None), Some(Filter::Completed));
        assert_eq!(Filter::parse("soon", None), None);
    }
}
