//! Calendar view model: the 42-cell month grid and the list filter state.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::model::config::WeekStart;
use crate::ops::todo_ops::Filter;

/// Six weeks of seven days
pub const GRID_CELLS: usize = 42;

/// A calendar month, always a valid one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// `None` unless `1 <= month <= 12` and `1 <= year <= 9999`
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=9999).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1).map(YearMonth)
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth(date.with_day(1).unwrap_or(date))
    }

    /// Parse `YYYY-MM`
    pub fn parse(s: &str) -> Option<Self> {
        let (y, m) = s.trim().split_once('-')?;
        YearMonth::new(y.parse().ok()?, m.parse().ok()?)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn prev(&self) -> Self {
        self.0
            .checked_sub_months(Months::new(1))
            .filter(|d| d.year() >= 1)
            .map_or(*self, YearMonth)
    }

    pub fn next(&self) -> Self {
        self.0
            .checked_add_months(Months::new(1))
            .filter(|d| d.year() <= 9999)
            .map_or(*self, YearMonth)
    }

    /// `YYYY-MM`
    pub fn key(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }

    /// "October 2026"
    pub fn title(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Padding from the previous or next month; not selectable
    OtherMonth,
    Today,
    Selected,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub kind: CellKind,
    pub has_tasks: bool,
}

impl DayCell {
    pub fn is_interactive(&self) -> bool {
        self.kind != CellKind::OtherMonth
    }
}

/// How many cells of the previous month precede the 1st
fn leading_days(first: NaiveDate, week_start: WeekStart) -> u32 {
    match week_start {
        WeekStart::Sunday => first.weekday().num_days_from_sunday(),
        WeekStart::Monday => first.weekday().num_days_from_monday(),
    }
}

/// Column headers in grid order
pub fn weekday_labels(week_start: WeekStart) -> [&'static str; 7] {
    match week_start {
        WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    }
}

/// Build the grid for `month`.
///
/// Today wins over the selection when both fall on the same day. Has-tasks
/// is filled in for every cell, padding included.
pub fn month_grid(
    month: YearMonth,
    week_start: WeekStart,
    selected: Option<NaiveDate>,
    today: NaiveDate,
    has_tasks: impl Fn(NaiveDate) -> bool,
) -> [DayCell; GRID_CELLS] {
    let first = month.first_day();
    let start = first - Days::new(u64::from(leading_days(first, week_start)));
    std::array::from_fn(|i| {
        let date = start + Days::new(i as u64);
        let kind = if !month.contains(date) {
            CellKind::OtherMonth
        } else if date == today {
            CellKind::Today
        } else if selected == Some(date) {
            CellKind::Selected
        } else {
            CellKind::Normal
        };
        DayCell {
            date,
            kind,
            has_tasks: has_tasks(date),
        }
    })
}

/// Displayed month plus the list filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    pub month: YearMonth,
    pub filter: Filter,
    pub week_start: WeekStart,
}

impl CalendarState {
    /// Showing the month of `today` with the `all` filter.
    pub fn new(today: NaiveDate, week_start: WeekStart) -> Self {
        CalendarState {
            month: YearMonth::of(today),
            filter: Filter::All,
            week_start,
        }
    }

    pub fn prev_month(&mut self) {
        self.month = self.month.prev();
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
    }

    /// Jump to the month of `date`, filter untouched.
    pub fn show_month_of(&mut self, date: NaiveDate) {
        self.month = YearMonth::of(date);
    }

    /// Select a day of the displayed month, switching to the `date` filter.
    /// Days outside the displayed month are ignored (returns false).
    pub fn select_day(&mut self, date: NaiveDate) -> bool {
        if !self.month.contains(date) {
            return false;
        }
        self.filter = Filter::Date(date);
        true
    }

    /// Explicit filter choice. Any non-date filter drops the selection.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.filter.selected_date()
    }

    pub fn grid(
        &self,
        today: NaiveDate,
        has_tasks: impl Fn(NaiveDate) -> bool,
    ) -> [DayCell; GRID_CELLS] {
        month_grid(
            self.month,
            self.week_start,
            self.selected_date(),
            today,
            has_tasks,
        )
    }

    /// Heading over the task list
    pub fn list_title(&self) -> String {
        match self.filter {
            Filter::Date(d) => format!("Tasks for {}", d.format("%b %-d")),
            Filter::Today => "Today's tasks".to_string(),
            _ => "All tasks".to_string(),
        }
    }
}
