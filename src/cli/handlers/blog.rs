use std::path::Path;

use super::todo::parse_day;
use super::{CmdResult, authorize, load_site_cwd, open_gate, print_lines, resolve_id};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::kv::FileStore;
use crate::io::site_io;
use crate::model::article::Article;
use crate::model::site::Site;
use crate::ops::article_ops::{
    ALL_CATEGORIES, ArticleDraft, ArticleStore, MAX_POPULAR_TAGS, popular_tags, search,
};
use crate::ops::import;
use crate::ops::reader_ops::ReaderState;

type BlogStore = ArticleStore<FileStore>;

fn load_articles(site: &Site) -> Result<BlogStore, Box<dyn std::error::Error>> {
    Ok(ArticleStore::load(site_io::durable_store(site))?)
}

fn category_name<'a>(store: &'a BlogStore, id: &'a str) -> &'a str {
    store.category(id).map_or(id, |c| c.name.as_str())
}

/// Blank picks the default category; anything else must exist.
fn check_category(store: &BlogStore, id: &str) -> Result<(), String> {
    let id = id.trim();
    if id.is_empty() || store.category(id).is_some() {
        Ok(())
    } else {
        Err(format!("unknown category \"{}\"", id))
    }
}

/// Resolve among every article (admin commands)
fn any_article_id(store: &BlogStore, typed: &str) -> Result<String, Box<dyn std::error::Error>> {
    resolve_id(store.articles().iter().map(|a| a.id.as_str()), typed, "article")
}

/// Resolve among published articles (reader commands)
fn published_article_id(
    store: &BlogStore,
    typed: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    resolve_id(
        store.published().into_iter().map(|a| a.id.as_str()),
        typed,
        "published article",
    )
}

pub(super) fn cmd_blog(action: BlogAction, json: bool) -> CmdResult {
    match action {
        BlogAction::List(args) => cmd_blog_list(args, json),
        BlogAction::Show(args) => cmd_blog_show(args, json),
        BlogAction::Add(args) => cmd_blog_add(args),
        BlogAction::Edit(args) => cmd_blog_edit(args),
        BlogAction::Publish(args) => cmd_blog_publish(args),
        BlogAction::Rm(args) => cmd_blog_rm(args),
        BlogAction::Import(args) => cmd_blog_import(args),
        BlogAction::Tags => cmd_blog_tags(json),
        BlogAction::Category(args) => cmd_blog_category(args, json),
        BlogAction::Like(args) => cmd_blog_like(args),
        BlogAction::Bookmark(args) => cmd_blog_bookmark(args),
        BlogAction::Comment(args) => cmd_blog_comment(args),
    }
}

// ---------------------------------------------------------------------------
// Reader view
// ---------------------------------------------------------------------------

fn cmd_blog_list(args: BlogListArgs, json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let store = load_articles(&site)?;
    if args.category != ALL_CATEGORIES && store.category(&args.category).is_none() {
        return Err(format!("unknown category \"{}\"", args.category).into());
    }

    let pool: Vec<&Article> = if args.drafts {
        let mut gate = open_gate(&site)?;
        authorize(&mut gate)?;
        store.articles().iter().collect()
    } else {
        store.published()
    };
    let hits = search(&pool, &args.category, args.search.as_deref().unwrap_or(""));

    if json {
        let summaries: Vec<_> = hits.iter().map(|a| article_to_summary(a)).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    if hits.is_empty() {
        println!("no articles found");
    }
    for article in hits {
        println!(
            "{}",
            format_article_line(article, category_name(&store, &article.category))
        );
    }
    Ok(())
}

fn cmd_blog_show(args: ArticleIdArg, json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let store = load_articles(&site)?;
    let id = any_article_id(&store, &args.id)?;
    let Some(article) = store.get(&id) else {
        return Ok(());
    };
    if !article.published {
        let mut gate = open_gate(&site)?;
        authorize(&mut gate)?;
    }
    let reader = ReaderState::load(site_io::durable_store(&site))?;

    if json {
        let detail = ArticleDetailJson {
            article,
            liked: reader.is_liked(&id),
            bookmarked: reader.is_bookmarked(&id),
            reader_comments: reader.comments(&id),
        };
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }
    print_lines(&format_article(
        article,
        category_name(&store, &article.category),
        reader.is_liked(&id),
        reader.is_bookmarked(&id),
        &reader.comments(&id),
    ));
    Ok(())
}

fn cmd_blog_tags(json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let store = load_articles(&site)?;
    let counts = popular_tags(store.published(), MAX_POPULAR_TAGS);
    if json {
        let tags: Vec<TagCountJson> = counts
            .into_iter()
            .map(|(tag, count)| TagCountJson { tag, count })
            .collect();
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else if counts.is_empty() {
        println!("no tags yet");
    } else {
        print_lines(&format_tag_counts(&counts));
    }
    Ok(())
}

fn cmd_blog_like(args: ArticleIdArg) -> CmdResult {
    let site = load_site_cwd()?;
    let store = load_articles(&site)?;
    let id = published_article_id(&store, &args.id)?;
    let mut reader = ReaderState::load(site_io::durable_store(&site))?;
    let liked = reader.toggle_like(&id)?;
    println!("{} {}", if liked { "liked" } else { "unliked" }, short_id(&id));
    Ok(())
}

fn cmd_blog_bookmark(args: ArticleIdArg) -> CmdResult {
    let site = load_site_cwd()?;
    let store = load_articles(&site)?;
    let id = published_article_id(&store, &args.id)?;
    let mut reader = ReaderState::load(site_io::durable_store(&site))?;
    let marked = reader.toggle_bookmark(&id)?;
    let state = if marked { "bookmarked" } else { "removed bookmark on" };
    println!("{} {}", state, short_id(&id));
    Ok(())
}

fn cmd_blog_comment(args: CommentArgs) -> CmdResult {
    let site = load_site_cwd()?;
    let store = load_articles(&site)?;
    let id = published_article_id(&store, &args.id)?;
    let mut reader = ReaderState::load(site_io::durable_store(&site))?;
    let comment = reader.add_comment(&id, &args.text.join(" "))?;
    println!("commented as {}", comment.author);
    Ok(())
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

fn cmd_blog_add(args: ArticleFields) -> CmdResult {
    let content = match (args.content, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|e| format!("could not read {}: {}", path, e))?,
        (None, None) => return Err("give the body with --content or --file".into()),
    };
    let draft = ArticleDraft {
        title: args.title,
        content,
        excerpt: args.excerpt,
        category: args.category,
        tags: args.tags,
        published: args.publish,
        date: args.date.as_deref().map(parse_day).transpose()?,
    };

    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut store = load_articles(&site)?;
    check_category(&store, &draft.category)?;
    let auth = authorize(&mut gate)?;
    let article = store.add(&draft, &auth)?;
    let state = if article.published { "published" } else { "saved draft" };
    println!("{} {}  {}", state, short_id(&article.id), article.title);
    Ok(())
}

fn cmd_blog_edit(args: ArticleEditArgs) -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut store = load_articles(&site)?;
    let id = any_article_id(&store, &args.id)?;
    let Some(current) = store.get(&id) else {
        return Ok(());
    };
    let draft = ArticleDraft {
        title: args.title.unwrap_or_else(|| current.title.clone()),
        content: args.content.unwrap_or_else(|| current.content.clone()),
        excerpt: args.excerpt.unwrap_or_else(|| current.excerpt.clone()),
        category: args.category.unwrap_or_else(|| current.category.clone()),
        tags: args.tags.unwrap_or_else(|| current.tags.join(", ")),
        published: current.published,
        date: args.date.as_deref().map(parse_day).transpose()?,
    };
    check_category(&store, &draft.category)?;
    let auth = authorize(&mut gate)?;
    if store.update(&id, &draft, &auth)? {
        println!("updated {}", short_id(&id));
    }
    Ok(())
}

fn cmd_blog_publish(args: ArticleIdArg) -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut store = load_articles(&site)?;
    let id = any_article_id(&store, &args.id)?;
    let auth = authorize(&mut gate)?;
    if let Some(published) = store.toggle_publish(&id, &auth)? {
        let state = if published { "published" } else { "unpublished" };
        println!("{} {}", state, short_id(&id));
    }
    Ok(())
}

fn cmd_blog_rm(args: ArticleIdArg) -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut store = load_articles(&site)?;
    let id = any_article_id(&store, &args.id)?;
    let auth = authorize(&mut gate)?;
    if let Some(removed) = store.delete(&id, &auth)? {
        println!("deleted {}  {}", short_id(&removed.id), removed.title);
    }
    Ok(())
}

fn cmd_blog_import(args: BlogImportArgs) -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut store = load_articles(&site)?;
    let auth = authorize(&mut gate)?;

    let mut failed = 0;
    for file in &args.files {
        match import::import_file(&mut store, Path::new(file), &auth) {
            Ok(article) => println!("imported {}  {}", short_id(&article.id), article.title),
            Err(e) => {
                eprintln!("error: {}: {}", file, e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(format!("{} of {} files not imported", failed, args.files.len()).into());
    }
    Ok(())
}

fn cmd_blog_category(args: CategoryArgs, json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let mut store = load_articles(&site)?;

    let Some(name) = args.name else {
        if json {
            println!("{}", serde_json::to_string_pretty(store.categories())?);
        } else {
            for c in store.categories() {
                println!("{:<16} {}", c.id, c.name);
            }
        }
        return Ok(());
    };

    let mut gate = open_gate(&site)?;
    let auth = authorize(&mut gate)?;
    let category = store.add_category(&name, &auth)?;
    println!("added category {}  ({})", category.name, category.id);
    Ok(())
}
