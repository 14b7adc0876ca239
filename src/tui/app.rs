use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::kv::{KvStore, MemoryStore, StorageError};
use crate::io::site_io::{self, discover_site, load_site};
use crate::model::config::SiteConfig;
use crate::model::todo::{Priority, TodoItem, date_key, parse_date_key};
use crate::ops::auth::{AuthGate, Authorized, Challenge};
use crate::ops::calendar::{CalendarState, YearMonth};
use crate::ops::todo_ops::{Filter, TodoStore};
use crate::util::unicode::LineInput;

use super::input;
use super::render;
use super::theme::Theme;

/// Durable store behind the dashboard (a `FileStore` when running)
pub type DynStore = Box<dyn KvStore>;

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Calendar,
    List,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task
    Edit,
    /// y/n prompt before a delete
    Confirm,
    /// Password modal
    Auth,
}

/// A mutation that needs a live session. Parked while the password modal is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatedAction {
    Add {
        text: String,
        priority: Priority,
        date: Option<NaiveDate>,
    },
    Toggle {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Swap with the neighbour above (`up`) or below in the visible list
    Reorder {
        id: String,
        up: bool,
    },
}

/// New-task input line
#[derive(Debug, Clone, Default)]
pub struct AddState {
    pub input: LineInput,
    pub priority: Priority,
}

/// Pending y/n delete prompt
#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub id: String,
    pub text: String,
}

/// Password modal state
#[derive(Debug, Clone, Default)]
pub struct AuthPrompt {
    pub input: LineInput,
    pub error: Option<&'static str>,
    /// `None` when the modal was opened just to log in
    pub pending: Option<GatedAction>,
}

/// Main application state
pub struct App {
    pub site_name: String,
    /// Where `.state.json` lives; `None` skips saving view state
    pub folio_dir: Option<PathBuf>,
    pub theme: Theme,
    pub todos: TodoStore<DynStore>,
    pub gate: AuthGate<DynStore, MemoryStore>,
    pub calendar: CalendarState,
    pub today: NaiveDate,
    /// Day under the calendar cursor
    pub cursor_day: NaiveDate,
    /// Cursor into the filtered list
    pub list_cursor: usize,
    pub focus: Focus,
    pub mode: Mode,
    pub add: Option<AddState>,
    pub confirm: Option<ConfirmState>,
    pub auth: Option<AuthPrompt>,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: &SiteConfig,
        todos: TodoStore<DynStore>,
        gate: AuthGate<DynStore, MemoryStore>,
        today: NaiveDate,
    ) -> Self {
        App {
            site_name: config.site.name.clone(),
            folio_dir: None,
            theme: Theme::from_config(&config.ui),
            todos,
            gate,
            calendar: CalendarState::new(today, config.dashboard.week_start),
            today,
            cursor_day: today,
            list_cursor: 0,
            focus: Focus::Calendar,
            mode: Mode::Navigate,
            add: None,
            confirm: None,
            auth: None,
            show_help: false,
            status_message: None,
            should_quit: false,
        }
    }

    /// Tasks in the current filter, in stored order
    pub fn visible(&self) -> Vec<&TodoItem> {
        self.todos.filtered_view(&self.calendar.filter, self.today)
    }

    pub fn cursor_item(&self) -> Option<&TodoItem> {
        self.visible().get(self.list_cursor).copied()
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
    }

    /// Put the list cursor on `id` if it is visible
    pub fn focus_item(&mut self, id: &str) {
        if let Some(pos) = self.visible().iter().position(|t| t.id == id) {
            self.list_cursor = pos;
        }
    }

    /// Move the calendar cursor, following it into other months
    pub fn move_cursor_day(&mut self, days: i64) {
        let Some(day) = self
            .cursor_day
            .checked_add_signed(chrono::Duration::days(days))
        else {
            return;
        };
        self.cursor_day = day;
        if !self.calendar.month.contains(day) {
            self.calendar.show_month_of(day);
        }
    }

    /// Show another month, keeping the cursor on the same day number
    pub fn shift_month(&mut self, forward: bool) {
        if forward {
            self.calendar.next_month();
        } else {
            self.calendar.prev_month();
        }
        let month = self.calendar.month;
        let day = self.cursor_day.day();
        self.cursor_day = (1..=day)
            .rev()
            .find_map(|d| NaiveDate::from_ymd_opt(month.year(), month.month(), d))
            .unwrap_or(month.first_day());
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.calendar.set_filter(filter);
        self.list_cursor = 0;
    }

    pub fn select_cursor_day(&mut self) {
        if self.calendar.select_day(self.cursor_day) {
            self.list_cursor = 0;
        }
    }

    // -----------------------------------------------------------------------
    // Gated actions
    // -----------------------------------------------------------------------

    /// Run `action` now if the session is live, otherwise park it behind the
    /// password modal.
    pub fn request(&mut self, action: GatedAction) {
        match self.gate.authorize() {
            Some(token) => self.perform(action, &token),
            None => self.open_auth(Some(action)),
        }
    }

    pub fn open_auth(&mut self, pending: Option<GatedAction>) {
        self.auth = Some(AuthPrompt {
            pending,
            ..AuthPrompt::default()
        });
        self.mode = Mode::Auth;
    }

    /// Submit the modal's input. On success the parked action runs.
    pub fn submit_password(&mut self) {
        let Some(prompt) = self.auth.as_mut() else {
            return;
        };
        let result = self.gate.challenge(prompt.input.text());
        match result {
            Ok(Challenge::Granted(token)) => {
                let pending = self.auth.take().and_then(|p| p.pending);
                self.mode = Mode::Navigate;
                self.status_message = Some("Logged in".into());
                if let Some(action) = pending {
                    self.perform(action, &token);
                }
            }
            Ok(other) => {
                if matches!(other, Challenge::Rejected) {
                    prompt.input.clear();
                }
                prompt.error = other.message();
            }
            Err(e) => {
                self.auth = None;
                self.mode = Mode::Navigate;
                self.report(e);
            }
        }
    }

    /// Close the modal and drop whatever action was waiting on it
    pub fn cancel_auth(&mut self) {
        if let Some(prompt) = self.auth.take()
            && prompt.pending.is_some()
        {
            self.status_message = Some("Cancelled; nothing was changed".into());
        }
        self.mode = Mode::Navigate;
    }

    pub fn toggle_login(&mut self) {
        if self.gate.is_authenticated() {
            match self.gate.logout() {
                Ok(()) => self.status_message = Some("Logged out".into()),
                Err(e) => self.report(e),
            }
        } else {
            self.open_auth(None);
        }
    }

    fn perform(&mut self, action: GatedAction, token: &Authorized) {
        if let Err(e) = self.apply(action, token) {
            self.report(e);
        }
        self.clamp_cursor();
    }

    fn apply(&mut self, action: GatedAction, token: &Authorized) -> Result<(), StorageError> {
        match action {
            GatedAction::Add {
                text,
                priority,
                date,
            } => {
                let added = self
                    .todos
                    .add_on(&text, priority, date, self.today, token)?
                    .map(|item| item.id.clone());
                if let Some(id) = added {
                    self.focus_item(&id);
                }
            }
            GatedAction::Toggle { id } => {
                self.todos.toggle(&id, token)?;
            }
            GatedAction::Delete { id } => {
                if let Some(item) = self.todos.delete(&id, token)? {
                    self.status_message = Some(format!("Deleted \"{}\"", item.text));
                }
            }
            GatedAction::Reorder { id, up } => self.reorder_visible(&id, up, token)?,
        }
        Ok(())
    }

    /// Move `id` past its neighbour in the visible list. The store works on
    /// backing indices, so the neighbour's index is the target.
    fn reorder_visible(
        &mut self,
        id: &str,
        up: bool,
        token: &Authorized,
    ) -> Result<(), StorageError> {
        let visible: Vec<String> = self.visible().iter().map(|t| t.id.clone()).collect();
        let Some(pos) = visible.iter().position(|v| v == id) else {
            return Ok(());
        };
        let neighbour = if up {
            pos.checked_sub(1)
        } else {
            Some(pos + 1).filter(|&n| n < visible.len())
        };
        let Some(neighbour) = neighbour else {
            return Ok(());
        };
        let (Some(from), Some(to)) = (
            self.todos.position(id),
            self.todos.position(&visible[neighbour]),
        ) else {
            return Ok(());
        };
        self.todos.reorder(from, to, token)?;
        self.list_cursor = neighbour;
        Ok(())
    }

    fn report(&mut self, error: StorageError) {
        log::error!("event=tui_action status=error error={}", error);
        self.status_message = Some(format!("Not saved: {}", error));
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let Some(folio_dir) = app.folio_dir.as_deref() else {
        return;
    };
    let Some(ui_state) = read_ui_state(folio_dir) else {
        return;
    };

    if let Some(month) = ui_state.month.as_deref().and_then(YearMonth::parse) {
        app.calendar.month = month;
        if !month.contains(app.cursor_day) {
            app.cursor_day = month.first_day();
        }
    }
    let selected = ui_state.selected_date.as_deref().and_then(parse_date_key);
    if let Some(filter) = ui_state
        .filter
        .as_deref()
        .and_then(|name| Filter::parse(name, selected))
    {
        app.calendar.set_filter(filter);
    }
    if let Some(id) = ui_state.cursor_id {
        app.focus_item(&id);
    }
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    let Some(folio_dir) = app.folio_dir.as_deref() else {
        return;
    };
    let ui_state = UiState {
        month: Some(app.calendar.month.key()),
        filter: Some(app.calendar.filter.name().to_string()),
        selected_date: app.calendar.selected_date().map(date_key),
        cursor_id: app.cursor_item().map(|t| t.id.clone()),
    };
    if let Err(e) = write_ui_state(folio_dir, &ui_state) {
        log::warn!("event=ui_state_save status=error error={}", e);
    }
}

fn open_app(start: &Path) -> Result<App, Box<dyn std::error::Error>> {
    let root = discover_site(start)?;
    let site = load_site(&root)?;
    site_io::start_logging(&site);

    let today = Local::now().date_naive();
    let todos = TodoStore::load(Box::new(site_io::durable_store(&site)) as DynStore)?;
    // The session lives only as long as this process
    let gate = AuthGate::new(
        Box::new(site_io::durable_store(&site)) as DynStore,
        MemoryStore::new(),
    )?;

    let mut app = App::new(&site.config, todos, gate, today);
    app.folio_dir = Some(site.folio_dir.clone());
    Ok(app)
}

/// Run the TUI application
pub fn run(site_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match site_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let mut app = open_app(&start)?;

    // Restore saved UI state
    restore_ui_state(&mut app);
    log::info!("event=tui_start site={}", app.site_name);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Save UI state before exit
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        // The clock can cross midnight while the dashboard is open
        app.today = Local::now().date_naive();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
