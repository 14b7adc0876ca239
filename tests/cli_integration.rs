//! Integration tests for the `folio` CLI.
//!
//! Each test creates a temp site directory, runs `folio` as a subprocess
//! (piping the password on stdin where a command is gated), and verifies
//! stdout and/or the stored JSON.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const PASSWORD: &str = "admin123\n";

/// Get the path to the built `folio` binary.
fn folio_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_folio"))
}

/// Create a minimal test site in the given directory.
fn create_test_site(root: &Path) {
    let folio_dir = root.join("folio");
    fs::create_dir_all(folio_dir.join("data")).unwrap();

    fs::write(
        folio_dir.join("folio.toml"),
        r#"[site]
name = "Test Site"

[profile]
name = "Sam Lee"
title = "Systems programmer"
bio = "Writes about storage engines."

[[profile.skills]]
name = "Rust"
level = "expert"

[[profile.skills]]
name = "Go"
level = "intermediate"

[dashboard]
week_start = "sunday"
"#,
    )
    .unwrap();
}

/// Run `folio` with the given args and stdin in the given directory,
/// returning (stdout, stderr, success).
fn run_folio_with_input(dir: &Path, args: &[&str], input: &str) -> (String, String, bool) {
    let mut child = Command::new(folio_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("FOLIO_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run folio");
    // The command may exit before reading stdin
    let _ = child.stdin.take().unwrap().write_all(input.as_bytes());
    let output = child.wait_with_output().expect("failed to wait for folio");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn run_folio(dir: &Path, args: &[&str]) -> (String, String, bool) {
    run_folio_with_input(dir, args, "")
}

/// Run `folio` expecting success, return stdout.
fn run_folio_ok(dir: &Path, args: &[&str], input: &str) -> String {
    let (stdout, stderr, success) = run_folio_with_input(dir, args, input);
    if !success {
        panic!(
            "folio {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn read_json(root: &Path, key: &str) -> serde_json::Value {
    let path = root.join("folio/data").join(format!("{}.json", key));
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// Short id printed after "added " / "imported " etc.
fn printed_id(out: &str, verb: &str) -> String {
    out.lines()
        .find_map(|l| l.strip_prefix(verb))
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_else(|| panic!("no \"{}\" line in {:?}", verb, out))
        .to_string()
}

// ---------------------------------------------------------------------------
// Init and auth
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_site_once() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_folio_ok(tmp.path(), &["init", "--name", "My Folio"], "");
    assert!(out.contains("Initialized folio site: My Folio"));
    assert!(tmp.path().join("folio/folio.toml").is_file());
    assert!(tmp.path().join("folio/data").is_dir());

    let (_, stderr, success) = run_folio(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_commands_outside_a_site_fail() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_folio(tmp.path(), &["todo", "list"]);
    assert!(!success);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_login_retries_after_wrong_password() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());

    let out = run_folio_ok(tmp.path(), &["login"], "nope\nadmin123\n");
    assert!(out.contains("logged in for 24 hours"));

    let status = run_folio_ok(tmp.path(), &["status", "--json"], "");
    let parsed: serde_json::Value = serde_json::from_str(&status).unwrap();
    assert_eq!(parsed["authenticated"], true);
    assert!(parsed["expires"].is_string());

    run_folio_ok(tmp.path(), &["logout"], "");
    let status = run_folio_ok(tmp.path(), &["status"], "");
    assert_eq!(status.trim(), "logged out");
}

#[test]
fn test_gated_command_without_password_changes_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());

    // wrong password, then EOF cancels
    let (_, stderr, success) =
        run_folio_with_input(tmp.path(), &["todo", "add", "Buy", "milk"], "guess\n");
    assert!(!success);
    assert!(stderr.contains("Wrong password, try again"));
    assert!(stderr.contains("password required; nothing was changed"));
    assert!(!tmp.path().join("folio/data/todos.json").exists());
}

#[test]
fn test_empty_task_fails_before_prompting() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());

    let (_, stderr, success) = run_folio(tmp.path(), &["todo", "add", "  "]);
    assert!(!success);
    assert!(stderr.contains("task text is empty"));
    assert!(!stderr.contains("Password"));
}

#[test]
fn test_passwd_and_reset() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());

    let (_, stderr, success) =
        run_folio_with_input(tmp.path(), &["passwd"], "admin123\nshort\n");
    assert!(!success);
    assert!(stderr.contains("at least 6"));

    run_folio_ok(tmp.path(), &["passwd"], "admin123\nhunter22\n");
    let (_, _, success) = run_folio_with_input(tmp.path(), &["login"], "admin123\n");
    assert!(!success);
    run_folio_ok(tmp.path(), &["login"], "hunter22\n");

    let out = run_folio_ok(tmp.path(), &["reset-password"], "");
    assert!(out.contains("password reset"));
    assert_eq!(run_folio_ok(tmp.path(), &["status"], "").trim(), "logged out");
    run_folio_ok(tmp.path(), &["login"], PASSWORD);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[test]
fn test_todo_add_list_done_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());

    let out = run_folio_ok(
        tmp.path(),
        &["todo", "add", "Write", "release", "notes", "-p", "high"],
        PASSWORD,
    );
    assert!(out.contains("Write release notes (high, today)"));
    let id = printed_id(&out, "added ");

    // the session from the first add is reused
    run_folio_ok(
        tmp.path(),
        &["todo", "add", "Book flights", "--date", "2026-10-05"],
        "",
    );

    let list = run_folio_ok(tmp.path(), &["todo", "list"], "");
    assert!(list.starts_with("All tasks  (2 total, 0 completed)"));
    let lines: Vec<&str> = list.lines().collect();
    assert!(lines[1].contains("1. [ ] Book flights"));
    assert!(lines[2].contains("2. [ ] Write release notes  !high  today"));

    let out = run_folio_ok(tmp.path(), &["todo", "done", &id[..6]], "");
    assert!(out.starts_with("completed"));

    let json = run_folio_ok(tmp.path(), &["todo", "list", "--filter", "completed", "--json"], "");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["filter"], "completed");
    assert_eq!(parsed["stats"]["total"], 1);
    assert_eq!(parsed["tasks"][0]["text"], "Write release notes");
    assert_eq!(parsed["tasks"][0]["completed"], true);

    run_folio_ok(tmp.path(), &["todo", "rm", &id], "");
    let stored = read_json(tmp.path(), "todos");
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["dateStr"], "2026-10-05");

    // the deleted task lands in the recovery log
    let recovery = run_folio_ok(tmp.path(), &["recovery"], "");
    assert!(recovery.contains("Write release notes"));
}

#[test]
fn test_todo_mv_uses_positions() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());

    for text in ["first", "second", "third"] {
        run_folio_ok(tmp.path(), &["todo", "add", text], PASSWORD);
    }
    // stored newest first: third, second, first
    run_folio_ok(tmp.path(), &["todo", "mv", "3", "1"], "");
    let stored = read_json(tmp.path(), "todos");
    let texts: Vec<&str> = stored
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["first", "third", "second"]);

    let (_, stderr, success) = run_folio(tmp.path(), &["todo", "mv", "0", "4"]);
    assert!(!success);
    assert!(stderr.contains("positions must be between 1 and 3"));
}

#[test]
fn test_cal_selects_a_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());
    run_folio_ok(
        tmp.path(),
        &["todo", "add", "Dentist", "--date", "2026-10-05"],
        PASSWORD,
    );

    let out = run_folio_ok(
        tmp.path(),
        &["cal", "--month", "2026-10", "--select", "2026-10-05"],
        "",
    );
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "October 2026");
    assert!(lines[1].starts_with("Sun"));
    assert!(out.contains("< 5>*"));
    assert!(out.contains("Tasks for Oct 5"));
    assert!(out.contains("Dentist"));

    let (_, stderr, success) = run_folio(
        tmp.path(),
        &["cal", "--month", "2026-11", "--select", "2026-10-05"],
    );
    assert!(!success);
    assert!(stderr.contains("is not in November 2026"));

    let json = run_folio_ok(tmp.path(), &["cal", "--month", "2026-10", "--json"], "");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["cells"].as_array().unwrap().len(), 42);
}

#[test]
fn test_config_week_start() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());

    run_folio_ok(tmp.path(), &["config", "dashboard.week_start", "monday"], "");
    let out = run_folio_ok(tmp.path(), &["cal", "--month", "2026-10"], "");
    assert!(out.lines().nth(1).unwrap().starts_with("Mon"));
    let toml = fs::read_to_string(tmp.path().join("folio/folio.toml")).unwrap();
    assert!(toml.contains("week_start = \"monday\""));
    // untouched sections survive
    assert!(toml.contains("name = \"Sam Lee\""));
}

// ---------------------------------------------------------------------------
// Ideas and home
// ---------------------------------------------------------------------------

#[test]
fn test_idea_board_and_home() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());

    // seed ideas fill the board but never the home page
    let fresh = run_folio_ok(tmp.path(), &["home"], "");
    assert!(!fresh.contains("Pinned ideas"));
    let board = run_folio_ok(tmp.path(), &["idea", "list"], "");
    assert!(!board.contains("no ideas yet"));

    // ideas are not gated
    let out = run_folio_ok(
        tmp.path(),
        &[
            "idea",
            "add",
            "--title",
            "Tiny KV store",
            "--content",
            "Log-structured, one file per key.",
            "--tags",
            "rust, storage",
            "--pin",
        ],
        "",
    );
    let id = printed_id(&out, "added ");

    let board = run_folio_ok(tmp.path(), &["idea", "list", "--json"], "");
    let parsed: serde_json::Value = serde_json::from_str(&board).unwrap();
    let titles: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["pinned"] == true)
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Tiny KV store"));

    let home = run_folio_ok(tmp.path(), &["home", "--skills", "expert"], "");
    assert!(home.starts_with("Sam Lee\nSystems programmer"));
    assert!(home.contains("Rust (expert)"));
    assert!(!home.contains("Go (intermediate)"));
    assert!(home.contains("Pinned ideas"));
    assert!(home.contains("Tiny KV store"));

    run_folio_ok(tmp.path(), &["idea", "edit", &id, "--unpin"], "");
    let ideas = read_json(tmp.path(), "ideas");
    let edited = ideas
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["title"] == "Tiny KV store")
        .unwrap();
    assert_eq!(edited["pinned"], false);
    assert_eq!(edited["content"], "Log-structured, one file per key.");

    let (_, stderr, success) = run_folio(tmp.path(), &["idea", "add", "--title", " ", "--content", "x"]);
    assert!(!success);
    assert!(stderr.contains("error:"));
}

// ---------------------------------------------------------------------------
// Blog
// ---------------------------------------------------------------------------

#[test]
fn test_blog_publish_and_reader_actions() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());

    let out = run_folio_ok(
        tmp.path(),
        &[
            "blog",
            "add",
            "--title",
            "Async in practice",
            "--content",
            "Futures are state machines.",
            "--category",
            "backend",
            "--tags",
            "rust, async",
            "--publish",
            "--date",
            "2026-03-14",
        ],
        PASSWORD,
    );
    assert!(out.starts_with("published"));
    let id = printed_id(&out, "published ");
    assert_eq!(read_json(tmp.path(), "blog_articles")[0]["date"], "2026-03-14");

    run_folio_ok(
        tmp.path(),
        &["blog", "add", "--title", "Unfinished", "--content", "TODO"],
        "",
    );

    let list = run_folio_ok(tmp.path(), &["blog", "list"], "");
    assert!(list.contains("Async in practice"));
    assert!(list.contains("[Backend]"));
    assert!(!list.contains("Unfinished"));

    let drafts = run_folio_ok(tmp.path(), &["blog", "list", "--drafts"], "");
    assert!(drafts.contains("Unfinished (draft)"));

    let found = run_folio_ok(tmp.path(), &["blog", "list", "--search", "ASYNC"], "");
    assert!(found.contains("Async in practice"));
    let none = run_folio_ok(tmp.path(), &["blog", "list", "--category", "design"], "");
    assert!(none.contains("no articles found"));

    run_folio_ok(tmp.path(), &["blog", "like", &id], "");
    run_folio_ok(tmp.path(), &["blog", "comment", &id, "Great", "read"], "");
    let detail = run_folio_ok(tmp.path(), &["blog", "show", &id, "--json"], "");
    let parsed: serde_json::Value = serde_json::from_str(&detail).unwrap();
    assert_eq!(parsed["liked"], true);
    assert_eq!(parsed["bookmarked"], false);
    assert_eq!(parsed["reader_comments"][0]["content"], "Great read");

    let tags = run_folio_ok(tmp.path(), &["blog", "tags", "--json"], "");
    let parsed: serde_json::Value = serde_json::from_str(&tags).unwrap();
    assert_eq!(parsed[0]["tag"], "rust");
    assert_eq!(parsed[0]["count"], 1);

    let (_, stderr, success) = run_folio(
        tmp.path(),
        &["blog", "add", "--title", "x", "--content", "y", "--category", "nope"],
    );
    assert!(!success);
    assert!(stderr.contains("unknown category \"nope\""));

    run_folio_ok(tmp.path(), &["blog", "edit", &id, "--date", "2026-04-01"], "");
    let articles = read_json(tmp.path(), "blog_articles");
    let edited = articles
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["title"] == "Async in practice")
        .unwrap();
    assert_eq!(edited["date"], "2026-04-01");

    let (_, stderr, success) = run_folio(tmp.path(), &["blog", "edit", &id, "--date", "April 1"]);
    assert!(!success);
    assert!(stderr.contains("invalid date \"April 1\""));
}

#[test]
fn test_blog_import_markdown() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_site(tmp.path());
    let post = tmp.path().join("lifetimes.md");
    fs::write(
        &post,
        "# Lifetimes, gently\n\n## Intro\nBorrowing without tears.\n```rust\nfn main() {}\n```\n",
    )
    .unwrap();
    let notes = tmp.path().join("notes.txt");
    fs::write(&notes, "not markdown").unwrap();

    let (stdout, stderr, success) = run_folio_with_input(
        tmp.path(),
        &[
            "blog",
            "import",
            post.to_str().unwrap(),
            notes.to_str().unwrap(),
        ],
        PASSWORD,
    );
    assert!(!success);
    assert!(stdout.contains("imported"));
    assert!(stdout.contains("Lifetimes, gently"));
    assert!(stderr.contains("1 of 2 files not imported"));

    let stored = read_json(tmp.path(), "blog_articles");
    let article = &stored[0];
    assert_eq!(article["title"], "Lifetimes, gently");
    assert_eq!(article["excerpt"], "Borrowing without tears.");
    assert_eq!(article["category"], "frontend");
    assert_eq!(article["published"], false);
}

#[test]
fn test_site_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let site = tmp.path().join("site");
    fs::create_dir_all(&site).unwrap();
    create_test_site(&site);
    let elsewhere = tmp.path().join("elsewhere");
    fs::create_dir_all(&elsewhere).unwrap();

    let out = run_folio_ok(
        &elsewhere,
        &["-C", site.to_str().unwrap(), "home", "--json"],
        "",
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["name"], "Sam Lee");
    assert_eq!(parsed["skills"].as_array().unwrap().len(), 2);
}
