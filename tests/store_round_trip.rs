//! Stores written through a `FileStore` read back the same after a reload,
//! and damaged files end up in the recovery log instead of being lost.

use std::fs;

use chrono::NaiveDate;
use folio::io::kv::FileStore;
use folio::io::recovery::read_recovery_entries;
use folio::model::todo::Priority;
use folio::ops::auth::AuthGate;
use folio::ops::idea_ops::{IdeaDraft, IdeaStore};
use folio::ops::todo_ops::{Filter, TodoStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn todos_survive_a_reload() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    let store = || FileStore::new(&data).with_recovery(tmp.path());

    let mut gate = AuthGate::new(store(), FileStore::new(tmp.path().join(".session"))).unwrap();
    gate.login("admin123").unwrap();
    let auth = gate.authorize().unwrap();

    let today = d(2026, 10, 19);
    let mut todos = TodoStore::load(store()).unwrap();
    todos
        .add_on("Renew passport", Priority::High, Some(d(2026, 10, 20)), today, &auth)
        .unwrap();
    todos
        .add_on("Water plants", Priority::Low, None, today, &auth)
        .unwrap();
    let first = todos.items()[1].id.clone();
    todos.toggle(&first, &auth).unwrap();

    let reloaded = TodoStore::load(store()).unwrap();
    assert_eq!(reloaded.items(), todos.items());
    assert_eq!(reloaded.items()[0].display_date, "today");
    assert_eq!(reloaded.items()[1].display_date, "tomorrow");
    assert!(reloaded.has_tasks_on(d(2026, 10, 20)));
    assert_eq!(reloaded.stats(&Filter::Completed, today).total, 1);

    // the session outlives the gate that created it
    let mut again = AuthGate::new(store(), FileStore::new(tmp.path().join(".session"))).unwrap();
    assert!(again.is_authenticated());
}

#[test]
fn damaged_file_is_salvaged() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("ideas.json"), "[{\"title\": \"half written").unwrap();

    let mut ideas = IdeaStore::load(FileStore::new(&data).with_recovery(tmp.path())).unwrap();
    let draft = IdeaDraft {
        title: "Fresh start".into(),
        content: "After a crash".into(),
        ..Default::default()
    };
    ideas.add(&draft).unwrap();

    let entries = read_recovery_entries(tmp.path(), None);
    assert_eq!(entries.len(), 1);
    assert!(entries[0].body.contains("half written"));

    let reloaded = IdeaStore::load(FileStore::new(&data)).unwrap();
    assert!(reloaded.ideas().iter().any(|i| i.title == "Fresh start"));
}
