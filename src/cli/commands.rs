use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio", about = concat!("folio v", env!("CARGO_PKG_VERSION"), " - dashboard, blog and ideas on local files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different site directory
    #[arg(short = 'C', long = "site-dir", global = true)]
    pub site_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a folio site in the current directory
    Init(InitArgs),
    /// Start an edit session (asks for the password)
    Login,
    /// End the edit session
    Logout,
    /// Show whether an edit session is active
    Status,
    /// Change the password
    Passwd,
    /// Restore the default password and end the session
    ResetPassword,
    /// Dashboard to-do list
    Todo(TodoCmd),
    /// Show the calendar month with task markers
    Cal(CalArgs),
    /// Ideas board
    Idea(IdeaCmd),
    /// Blog articles (admin and reader)
    Blog(BlogCmd),
    /// Show the home page: profile, skills, pinned ideas
    Home(HomeArgs),
    /// Set a value in folio.toml (e.g. `dashboard.week_start monday`)
    Config(ConfigArgs),
    /// View the recovery log
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Site name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if folio/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// To-do
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TodoCmd {
    #[command(subcommand)]
    pub action: TodoAction,
}

#[derive(Subcommand)]
pub enum TodoAction {
    /// List tasks
    List(TodoListArgs),
    /// Add a task (newest first)
    Add(TodoAddArgs),
    /// Toggle a task's completed state
    Done(TodoIdArg),
    /// Delete a task
    Rm(TodoIdArg),
    /// Move a task to another position (1-based, in the full list)
    Mv(TodoMvArgs),
}

#[derive(Args)]
pub struct TodoListArgs {
    /// all, today, date, active or completed
    #[arg(long, default_value = "all")]
    pub filter: String,
    /// Day for the date filter (YYYY-MM-DD); implies --filter date
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct TodoAddArgs {
    /// Task text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// low, medium or high
    #[arg(short, long, default_value = "medium")]
    pub priority: String,
    /// Schedule on this day (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct TodoIdArg {
    /// Task ID (a unique prefix is enough)
    pub id: String,
}

#[derive(Args)]
pub struct TodoMvArgs {
    /// Current position
    pub from: usize,
    /// New position
    pub to: usize,
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CalArgs {
    /// Month to show (YYYY-MM, default: this month)
    #[arg(long)]
    pub month: Option<String>,
    /// Highlight a selected day (YYYY-MM-DD)
    #[arg(long)]
    pub select: Option<String>,
}

// ---------------------------------------------------------------------------
// Ideas
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdeaCmd {
    #[command(subcommand)]
    pub action: IdeaAction,
}

#[derive(Subcommand)]
pub enum IdeaAction {
    /// Show the board (pinned first, newest first)
    List,
    /// Add an idea
    Add(IdeaFields),
    /// Edit an idea
    Edit(IdeaEditArgs),
    /// Pin or unpin an idea
    Pin(IdeaIdArg),
    /// Delete an idea
    Rm(IdeaIdArg),
}

#[derive(Args)]
pub struct IdeaFields {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub content: String,
    /// Comma-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,
    /// Pin the idea to the top of the board
    #[arg(long)]
    pub pin: bool,
}

#[derive(Args)]
pub struct IdeaEditArgs {
    /// Idea ID (a unique prefix is enough)
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    /// Comma-separated tags (replaces the current ones)
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long, conflicts_with = "unpin")]
    pub pin: bool,
    #[arg(long)]
    pub unpin: bool,
}

#[derive(Args)]
pub struct IdeaIdArg {
    /// Idea ID (a unique prefix is enough)
    pub id: String,
}

// ---------------------------------------------------------------------------
// Blog
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct BlogCmd {
    #[command(subcommand)]
    pub action: BlogAction,
}

#[derive(Subcommand)]
pub enum BlogAction {
    /// List published articles, optionally filtered
    List(BlogListArgs),
    /// Show one article with its comments
    Show(ArticleIdArg),
    /// Write a new article
    Add(ArticleFields),
    /// Edit an article
    Edit(ArticleEditArgs),
    /// Publish or unpublish an article
    Publish(ArticleIdArg),
    /// Delete an article
    Rm(ArticleIdArg),
    /// Import markdown files as draft articles
    Import(BlogImportArgs),
    /// Most used tags among published articles
    Tags,
    /// List categories, or add one
    Category(CategoryArgs),
    /// Like or unlike an article
    Like(ArticleIdArg),
    /// Bookmark or unbookmark an article
    Bookmark(ArticleIdArg),
    /// Comment on an article
    Comment(CommentArgs),
}

#[derive(Args)]
pub struct BlogListArgs {
    /// Category id, or `all`
    #[arg(long, default_value = "all")]
    pub category: String,
    /// Case-insensitive text to look for in titles, excerpts and tags
    #[arg(long)]
    pub search: Option<String>,
    /// Include unpublished drafts (admin view)
    #[arg(long)]
    pub drafts: bool,
}

#[derive(Args)]
pub struct ArticleIdArg {
    /// Article ID (a unique prefix is enough)
    pub id: String,
}

#[derive(Args)]
pub struct ArticleFields {
    #[arg(long)]
    pub title: String,
    /// Markdown body (use --file to read it from a file)
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,
    /// Read the markdown body from a file
    #[arg(long)]
    pub file: Option<String>,
    /// Summary line (default: start of the content)
    #[arg(long, default_value = "")]
    pub excerpt: String,
    /// Category id (default: the first category)
    #[arg(long, default_value = "")]
    pub category: String,
    /// Comma-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,
    /// Publish right away
    #[arg(long)]
    pub publish: bool,
    /// Publication date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct ArticleEditArgs {
    /// Article ID (a unique prefix is enough)
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub excerpt: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Comma-separated tags (replaces the current ones)
    #[arg(long)]
    pub tags: Option<String>,
    /// Publication date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct BlogImportArgs {
    /// Markdown files (.md or .markdown)
    #[arg(required = true)]
    pub files: Vec<String>,
}

#[derive(Args)]
pub struct CategoryArgs {
    /// Name of a category to add
    pub name: Option<String>,
}

#[derive(Args)]
pub struct CommentArgs {
    /// Article ID (a unique prefix is enough)
    pub id: String,
    /// Comment text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

// ---------------------------------------------------------------------------
// Home, config, recovery
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct HomeArgs {
    /// Only show skills at this level (`all` shows every skill)
    #[arg(long, default_value = "all")]
    pub skills: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key, e.g. profile.name
    pub key: String,
    pub value: String,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Show only the N most recent entries
    #[arg(long)]
    pub limit: Option<usize>,
}
