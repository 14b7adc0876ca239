use chrono::{Local, NaiveDate};

use super::{CmdResult, authorize, load_site_cwd, open_gate, print_lines, resolve_id};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::kv::FileStore;
use crate::io::site_io;
use crate::model::site::Site;
use crate::model::todo::{Priority, date_key, parse_date_key};
use crate::ops::calendar::{CalendarState, YearMonth};
use crate::ops::todo_ops::{Filter, TodoStore};

pub(super) fn parse_day(s: &str) -> Result<NaiveDate, String> {
    parse_date_key(s).ok_or_else(|| format!("invalid date \"{}\" (expected YYYY-MM-DD)", s))
}

fn load_todos(site: &Site) -> Result<TodoStore<FileStore>, Box<dyn std::error::Error>> {
    Ok(TodoStore::load(site_io::durable_store(site))?)
}

fn task_id(todos: &TodoStore<FileStore>, typed: &str) -> Result<String, Box<dyn std::error::Error>> {
    resolve_id(todos.items().iter().map(|t| t.id.as_str()), typed, "task")
}

pub(super) fn cmd_todo(action: TodoAction, json: bool) -> CmdResult {
    match action {
        TodoAction::List(args) => cmd_todo_list(args, json),
        TodoAction::Add(args) => cmd_todo_add(args),
        TodoAction::Done(args) => cmd_todo_done(args),
        TodoAction::Rm(args) => cmd_todo_rm(args),
        TodoAction::Mv(args) => cmd_todo_mv(args),
    }
}

fn cmd_todo_list(args: TodoListArgs, json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let todos = load_todos(&site)?;
    let today = Local::now().date_naive();

    let filter = match args.date.as_deref() {
        Some(day) => Filter::Date(parse_day(day)?),
        None => Filter::parse(&args.filter, None).ok_or_else(|| {
            format!(
                "unknown filter \"{}\" (all, today, date, active, completed)",
                args.filter
            )
        })?,
    };
    let mut state = CalendarState::new(today, site.config.dashboard.week_start);
    state.set_filter(filter);

    let view = todos.filtered_view(&filter, today);
    let stats = todos.stats(&filter, today);

    if json {
        let list = TodoListJson {
            title: state.list_title(),
            filter: filter.name(),
            selected_date: filter.selected_date().map(date_key),
            stats,
            tasks: view,
        };
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{}  ({})", state.list_title(), format_stats(&stats));
    if view.is_empty() {
        println!("  no tasks");
    }
    for item in view {
        let pos = todos.position(&item.id).map_or(0, |i| i + 1);
        println!("{}", format_todo_line(pos, item));
    }
    Ok(())
}

fn cmd_todo_add(args: TodoAddArgs) -> CmdResult {
    let text = args.text.join(" ");
    if text.trim().is_empty() {
        return Err("task text is empty".into());
    }
    let priority = Priority::parse(&args.priority).ok_or_else(|| {
        format!(
            "invalid priority \"{}\" (low, medium, high)",
            args.priority
        )
    })?;
    let target = args.date.as_deref().map(parse_day).transpose()?;

    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut todos = load_todos(&site)?;
    let auth = authorize(&mut gate)?;
    if let Some(item) = todos.add(&text, priority, target, &auth)? {
        println!(
            "added {}  {} ({}, {})",
            short_id(&item.id),
            item.text,
            item.priority.as_str(),
            item.display_date
        );
    }
    Ok(())
}

fn cmd_todo_done(args: TodoIdArg) -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut todos = load_todos(&site)?;
    let id = task_id(&todos, &args.id)?;
    let auth = authorize(&mut gate)?;
    if let Some(completed) = todos.toggle(&id, &auth)? {
        let state = if completed { "completed" } else { "reopened" };
        println!("{} {}", state, short_id(&id));
    }
    Ok(())
}

fn cmd_todo_rm(args: TodoIdArg) -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut todos = load_todos(&site)?;
    let id = task_id(&todos, &args.id)?;
    let auth = authorize(&mut gate)?;
    if let Some(removed) = todos.delete(&id, &auth)? {
        println!("deleted {}  {}", short_id(&removed.id), removed.text);
    }
    Ok(())
}

fn cmd_todo_mv(args: TodoMvArgs) -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut todos = load_todos(&site)?;
    let len = todos.items().len();
    if args.from == 0 || args.to == 0 || args.from > len || args.to > len {
        return Err(format!("positions must be between 1 and {}", len).into());
    }
    let auth = authorize(&mut gate)?;
    todos.reorder(args.from - 1, args.to - 1, &auth)?;
    println!("moved task {} to position {}", args.from, args.to);
    Ok(())
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

pub(super) fn cmd_cal(args: CalArgs, json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let todos = load_todos(&site)?;
    let today = Local::now().date_naive();
    let mut state = CalendarState::new(today, site.config.dashboard.week_start);

    if let Some(m) = args.month.as_deref() {
        state.month = YearMonth::parse(m)
            .ok_or_else(|| format!("invalid month \"{}\" (expected YYYY-MM)", m))?;
    }
    if let Some(day) = args.select.as_deref() {
        let date = parse_day(day)?;
        if args.month.is_none() {
            state.show_month_of(date);
        }
        if !state.select_day(date) {
            return Err(format!("{} is not in {}", date, state.month.title()).into());
        }
    }

    let grid = state.grid(today, |d| todos.has_tasks_on(d));
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&calendar_to_json(&state, &grid))?
        );
        return Ok(());
    }

    print_lines(&format_calendar(&state, &grid));
    if state.selected_date().is_some() {
        let view = todos.filtered_view(&state.filter, today);
        println!();
        println!("{}", state.list_title());
        if view.is_empty() {
            println!("  no tasks");
        }
        for item in view {
            let pos = todos.position(&item.id).map_or(0, |i| i + 1);
            println!("{}", format_todo_line(pos, item));
        }
    }
    Ok(())
}
