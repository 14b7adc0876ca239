use serde::Serialize;

use crate::model::article::{Article, Comment};
use crate::model::config::Skill;
use crate::model::idea::Idea;
use crate::model::todo::{TodoItem, date_key};
use crate::ops::calendar::{CalendarState, CellKind, DayCell, weekday_labels};
use crate::ops::home::IdeaCard;
use crate::ops::todo_ops::Stats;

/// Characters of an id shown in listings; any unique prefix is accepted back
pub const SHORT_ID_LEN: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TodoListJson<'a> {
    pub title: String,
    pub filter: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<String>,
    pub stats: Stats,
    pub tasks: Vec<&'a TodoItem>,
}

#[derive(Serialize)]
pub struct CalendarJson {
    pub month: String,
    pub title: String,
    pub weekdays: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<String>,
    pub cells: Vec<DayCellJson>,
}

#[derive(Serialize)]
pub struct DayCellJson {
    pub date: String,
    pub kind: &'static str,
    pub has_tasks: bool,
}

#[derive(Serialize)]
pub struct ArticleSummaryJson<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub excerpt: &'a str,
    pub category: &'a str,
    pub tags: &'a [String],
    pub date: String,
    pub published: bool,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Serialize)]
pub struct ArticleDetailJson<'a> {
    #[serde(flatten)]
    pub article: &'a Article,
    pub liked: bool,
    pub bookmarked: bool,
    pub reader_comments: Vec<&'a Comment>,
}

#[derive(Serialize)]
pub struct TagCountJson {
    pub tag: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct IdeaCardJson {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
}

#[derive(Serialize)]
pub struct HomeJson<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub bio: &'a str,
    pub skills: Vec<&'a Skill>,
    pub pinned_ideas: Vec<IdeaCardJson>,
}

#[derive(Serialize)]
pub struct StatusJson {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn cell_kind_name(kind: CellKind) -> &'static str {
    match kind {
        CellKind::OtherMonth => "other-month",
        CellKind::Today => "today",
        CellKind::Selected => "selected",
        CellKind::Normal => "normal",
    }
}

pub fn calendar_to_json(state: &CalendarState, grid: &[DayCell]) -> CalendarJson {
    CalendarJson {
        month: state.month.key(),
        title: state.month.title(),
        weekdays: weekday_labels(state.week_start).to_vec(),
        selected_date: state.selected_date().map(date_key),
        cells: grid
            .iter()
            .map(|c| DayCellJson {
                date: date_key(c.date),
                kind: cell_kind_name(c.kind),
                has_tasks: c.has_tasks,
            })
            .collect(),
    }
}

pub fn article_to_summary(article: &Article) -> ArticleSummaryJson<'_> {
    ArticleSummaryJson {
        id: &article.id,
        title: &article.title,
        excerpt: &article.excerpt,
        category: &article.category,
        tags: &article.tags,
        date: date_key(article.date),
        published: article.published,
        views: article.views,
        likes: article.likes,
        comments: article.comments,
    }
}

pub fn card_to_json(card: IdeaCard) -> IdeaCardJson {
    IdeaCardJson {
        id: card.id,
        title: card.title,
        excerpt: card.excerpt,
        tags: card.tags,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Counter display: `999`, `1.2k`
pub fn format_number(n: u64) -> String {
    if n >= 1000 {
        format!("{:.1}k", n as f64 / 1000.0)
    } else {
        n.to_string()
    }
}

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One to-do as a list line. `pos` is the 1-based position in the full list.
pub fn format_todo_line(pos: usize, item: &TodoItem) -> String {
    let check = if item.completed { 'x' } else { ' ' };
    format!(
        "{:>3}. [{}] {}  !{}  {}  {}",
        pos,
        check,
        item.text,
        item.priority.as_str(),
        item.display_date,
        short_id(&item.id)
    )
}

pub fn format_stats(stats: &Stats) -> String {
    format!("{} total, {} completed", stats.total, stats.completed)
}

/// One grid cell, 5 columns wide: `[19]` today, `< 5>` selected, `(28)`
/// other month, then `*` when the day has tasks.
fn format_cell(cell: &DayCell) -> String {
    use chrono::Datelike;
    let day = cell.date.day();
    let body = match cell.kind {
        CellKind::Today => format!("[{:>2}]", day),
        CellKind::Selected => format!("<{:>2}>", day),
        CellKind::OtherMonth => format!("({:>2})", day),
        CellKind::Normal => format!(" {:>2} ", day),
    };
    format!("{}{}", body, if cell.has_tasks { '*' } else { ' ' })
}

/// The month as plain text: title, weekday header, six week rows.
pub fn format_calendar(state: &CalendarState, grid: &[DayCell]) -> Vec<String> {
    let mut lines = vec![state.month.title()];
    let header = weekday_labels(state.week_start)
        .iter()
        .map(|l| format!("{:^4}", l))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(header.trim_end().to_string());
    for week in grid.chunks(7) {
        let row = week.iter().map(format_cell).collect::<Vec<_>>().join(" ");
        lines.push(row.trim_end().to_string());
    }
    lines
}

/// Board entry for an idea
pub fn format_idea(idea: &Idea) -> Vec<String> {
    let pin = if idea.pinned { "* " } else { "  " };
    let mut lines = vec![format!(
        "{}{}  {}  {}",
        pin,
        idea.title,
        idea.date.format("%Y-%m-%d"),
        short_id(&idea.id)
    )];
    for line in idea.content.lines() {
        lines.push(format!("    {}", line));
    }
    if !idea.tags.is_empty() {
        lines.push(format!("    {}", format_tags(&idea.tags)));
    }
    lines
}

/// Listing line for an article, with its counters
pub fn format_article_line(article: &Article, category_name: &str) -> String {
    let draft = if article.published { "" } else { " (draft)" };
    format!(
        "{}  {}{}  [{}]  {}  views {}  likes {}  {}",
        article.date,
        article.title,
        draft,
        category_name,
        format_tags(&article.tags),
        format_number(article.views),
        format_number(article.likes),
        short_id(&article.id)
    )
}

/// Full article page: header, body, reader comments.
pub fn format_article(
    article: &Article,
    category_name: &str,
    liked: bool,
    bookmarked: bool,
    comments: &[&Comment],
) -> Vec<String> {
    let mut lines = vec![
        article.title.clone(),
        format!(
            "{}  {}  {}",
            article.date,
            category_name,
            format_tags(&article.tags)
        ),
        format!(
            "views {}  likes {}{}{}",
            format_number(article.views),
            format_number(article.likes),
            if liked { "  (liked)" } else { "" },
            if bookmarked { "  (bookmarked)" } else { "" },
        ),
        String::new(),
    ];
    lines.extend(article.content.lines().map(str::to_string));
    if !comments.is_empty() {
        lines.push(String::new());
        lines.push(format!("Comments ({})", comments.len()));
        for c in comments {
            lines.push(format!(
                "  {}  {}: {}",
                c.time.format("%Y-%m-%d %H:%M"),
                c.author,
                c.content
            ));
        }
    }
    lines
}

pub fn format_tag_counts(counts: &[(String, usize)]) -> Vec<String> {
    counts
        .iter()
        .map(|(tag, n)| format!("#{}  {}", tag, n))
        .collect()
}
