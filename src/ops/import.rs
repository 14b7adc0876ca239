use std::path::Path;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::io::kv::{KvStore, StorageError};
use crate::model::article::Article;
use crate::ops::article_ops::{ArticleStore, EXCERPT_CHARS};
use crate::ops::auth::Authorized;
use crate::ops::collection::{ValidationError, char_prefix, new_id};

/// Shown when a file has no prose line to excerpt
pub const NO_EXCERPT: &str = "No excerpt";

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("valid regex"));

/// Error type for markdown import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a markdown file contributes to a new article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMarkdown {
    pub title: String,
    pub excerpt: String,
    pub content: String,
}

/// Byte length of a `.md`/`.markdown` suffix (any case), if present
fn markdown_ext_len(file_name: &str) -> Option<usize> {
    [".markdown", ".md"].into_iter().find_map(|ext| {
        let start = file_name.len().checked_sub(ext.len())?;
        let tail = file_name.get(start..)?;
        tail.eq_ignore_ascii_case(ext).then_some(ext.len())
    })
}

pub fn is_markdown_name(file_name: &str) -> bool {
    markdown_ext_len(file_name).is_some()
}

fn strip_markdown_ext(file_name: &str) -> &str {
    match markdown_ext_len(file_name) {
        Some(n) => &file_name[..file_name.len() - n],
        None => file_name,
    }
}

/// Title from the first `# ` heading (else the file name without its
/// extension); excerpt from the first line that is neither a heading nor a
/// code fence.
pub fn parse_markdown(file_name: &str, text: &str) -> ParsedMarkdown {
    let title = HEADING_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| strip_markdown_ext(file_name).to_string());

    let excerpt = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("```"))
        .map_or_else(|| NO_EXCERPT.to_string(), |line| {
            char_prefix(line, EXCERPT_CHARS).to_string()
        });

    ParsedMarkdown {
        title,
        excerpt,
        content: text.to_string(),
    }
}

/// Unpublished article for `parsed`, dated `today`, in the default category.
pub fn article_from_markdown(parsed: ParsedMarkdown, today: NaiveDate) -> Article {
    Article {
        id: new_id(),
        title: parsed.title,
        content: parsed.content,
        excerpt: parsed.excerpt,
        category: String::new(),
        tags: Vec::new(),
        date: today,
        published: false,
        views: 0,
        likes: 0,
        comments: 0,
    }
}

/// Read a markdown file and add it to the blog as a draft.
pub fn import_file<'s, S: KvStore>(
    store: &'s mut ArticleStore<S>,
    path: &Path,
    auth: &Authorized,
) -> Result<&'s Article, ImportError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_markdown_name(&file_name) {
        return Err(ValidationError::NotMarkdown(file_name).into());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::ReadError {
        path: path.display().to_string(),
        source,
    })?;
    let parsed = parse_markdown(&file_name, &text);
    log::info!("event=article_import file={}", file_name);
    let article = article_from_markdown(parsed, Local::now().date_naive());
    Ok(store.add_imported(article, auth)?)
}
