mod blog;
mod idea;
mod init;
mod todo;

pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::Local;

/// Global override for the site directory (set by -C flag)
static SITE_DIR_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::cli::prompt::terminal_prompt;
use crate::io::config_io;
use crate::io::kv::FileStore;
use crate::io::recovery;
use crate::io::site_io::{self, SiteError};
use crate::model::site::Site;
use crate::ops::auth::{AuthGate, Authorized, Challenge, PasswordPrompt};
use crate::ops::home::{IdeaCard, filter_skills};
use crate::ops::idea_ops::pinned_for_home;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    // Store -C override for load_site_cwd()
    if let Some(ref dir) = cli.site_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        let _ = SITE_DIR_OVERRIDE.set(abs);
    }

    match cli.command {
        None => Err("no command given (try `folio --help`)".into()),
        Some(cmd) => match cmd {
            // Init is handled in main.rs before site discovery
            Commands::Init(args) => cmd_init(args),

            // Auth
            Commands::Login => cmd_login(),
            Commands::Logout => cmd_logout(),
            Commands::Status => cmd_status(json),
            Commands::Passwd => cmd_passwd(),
            Commands::ResetPassword => cmd_reset_password(),

            // Pages
            Commands::Todo(cmd) => todo::cmd_todo(cmd.action, json),
            Commands::Cal(args) => todo::cmd_cal(args, json),
            Commands::Idea(cmd) => idea::cmd_idea(cmd.action, json),
            Commands::Blog(cmd) => blog::cmd_blog(cmd.action, json),
            Commands::Home(args) => cmd_home(args, json),

            // Maintenance
            Commands::Config(args) => cmd_config(args),
            Commands::Recovery(args) => cmd_recovery(args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn site_start_dir() -> Result<PathBuf, SiteError> {
    match SITE_DIR_OVERRIDE.get() {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(SiteError::IoError),
    }
}

/// Discover and load the site, then start the diagnostic log.
fn load_site_cwd() -> Result<Site, SiteError> {
    let root = site_io::discover_site(&site_start_dir()?)?;
    let site = site_io::load_site(&root)?;
    site_io::start_logging(&site);
    Ok(site)
}

type CliGate = AuthGate<FileStore, FileStore>;

fn open_gate(site: &Site) -> Result<CliGate, Box<dyn std::error::Error>> {
    Ok(AuthGate::new(
        site_io::durable_store(site),
        site_io::session_store(site),
    )?)
}

/// A token for a gated command, prompting for the password when no
/// session is live.
fn authorize(gate: &mut CliGate) -> Result<Authorized, Box<dyn std::error::Error>> {
    let mut prompt = terminal_prompt("Password");
    match gate.require_auth(&mut prompt)? {
        Some(token) => Ok(token),
        None => Err("password required; nothing was changed".into()),
    }
}

/// Resolve a user-typed id: an exact match, or a unique prefix.
fn resolve_id<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    typed: &str,
    what: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let typed = typed.trim();
    if typed.is_empty() {
        return Err(format!("{} id cannot be empty", what).into());
    }
    let mut matches = Vec::new();
    for id in ids {
        if id == typed {
            return Ok(id.to_string());
        }
        if id.starts_with(typed) {
            matches.push(id);
        }
    }
    match matches.as_slice() {
        [] => Err(format!("no {} with id \"{}\"", what, typed).into()),
        [one] => Ok(one.to_string()),
        _ => Err(format!(
            "id \"{}\" matches {} {}s; type more of it",
            typed,
            matches.len(),
            what
        )
        .into()),
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Auth commands
// ---------------------------------------------------------------------------

fn cmd_login() -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut prompt = terminal_prompt("Password");
    let mut error = None;
    loop {
        let Some(input) = prompt.ask(error) else {
            return Err("login cancelled".into());
        };
        match gate.challenge(&input)? {
            Challenge::Granted(_) => break,
            other => error = other.message(),
        }
    }
    println!("logged in for 24 hours");
    Ok(())
}

fn cmd_logout() -> CmdResult {
    let site = load_site_cwd()?;
    open_gate(&site)?.logout()?;
    println!("logged out");
    Ok(())
}

fn cmd_status(json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let authenticated = gate.is_authenticated();
    let expires = gate
        .session()
        .filter(|_| authenticated)
        .and_then(|s| s.expires_at())
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string());

    if json {
        let status = StatusJson {
            authenticated,
            expires,
        };
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        match expires {
            Some(at) => println!("logged in until {}", at),
            None => println!("logged out"),
        }
    }
    Ok(())
}

fn cmd_passwd() -> CmdResult {
    let site = load_site_cwd()?;
    let mut gate = open_gate(&site)?;
    let mut prompt = terminal_prompt("Password");
    let old = prompt
        .read_value("Current password")
        .ok_or("password change cancelled")?;
    let new = prompt
        .read_value("New password")
        .ok_or("password change cancelled")?;
    gate.change_password(&old, &new)?;
    println!("password changed");
    Ok(())
}

fn cmd_reset_password() -> CmdResult {
    let site = load_site_cwd()?;
    open_gate(&site)?.reset_password()?;
    println!("password reset to the default; logged out");
    Ok(())
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

fn cmd_home(args: HomeArgs, json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let profile = &site.config.profile;
    let skills = filter_skills(profile, &args.skills);
    let cards: Vec<IdeaCard> = pinned_for_home(&site_io::durable_store(&site))?
        .iter()
        .map(IdeaCard::from_idea)
        .collect();

    if json {
        let home = HomeJson {
            name: &profile.name,
            title: &profile.title,
            bio: &profile.bio,
            skills,
            pinned_ideas: cards.into_iter().map(card_to_json).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&home)?);
        return Ok(());
    }

    let name = if profile.name.is_empty() {
        &site.config.site.name
    } else {
        &profile.name
    };
    println!("{}", name);
    if !profile.title.is_empty() {
        println!("{}", profile.title);
    }
    if !profile.bio.is_empty() {
        println!();
        println!("{}", profile.bio);
    }
    if !skills.is_empty() {
        println!();
        println!("Skills");
        for skill in skills {
            println!("  {} ({})", skill.name, skill.level);
        }
    }
    if !cards.is_empty() {
        println!();
        println!("Pinned ideas");
        for card in cards {
            println!("  {}", card.title);
            println!("    {}", card.excerpt);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigArgs) -> CmdResult {
    let site = load_site_cwd()?;
    let (_, mut doc) = config_io::read_config(&site.folio_dir)?;
    config_io::set_value(&mut doc, &args.key, &args.value)?;
    config_io::write_config(&site.folio_dir, &doc)?;
    log::info!("event=config_set key={}", args.key);
    println!("{} = {}", args.key, args.value);
    Ok(())
}

fn cmd_recovery(args: RecoveryArgs, json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let entries = recovery::read_recovery_entries(&site.folio_dir, args.limit);
    if json {
        let values: Vec<_> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else if entries.is_empty() {
        println!("recovery log is empty");
    } else {
        for entry in &entries {
            print!("{}", entry.to_markdown());
        }
    }
    Ok(())
}
