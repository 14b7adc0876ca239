use super::{CmdResult, load_site_cwd, print_lines, resolve_id};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::kv::FileStore;
use crate::io::site_io;
use crate::ops::idea_ops::{IdeaDraft, IdeaStore};

fn idea_id(ideas: &IdeaStore<FileStore>, typed: &str) -> Result<String, Box<dyn std::error::Error>> {
    resolve_id(ideas.ideas().iter().map(|i| i.id.as_str()), typed, "idea")
}

pub(super) fn cmd_idea(action: IdeaAction, json: bool) -> CmdResult {
    let site = load_site_cwd()?;
    let mut ideas = IdeaStore::load(site_io::durable_store(&site))?;

    match action {
        IdeaAction::List => {
            let board = ideas.board();
            if json {
                println!("{}", serde_json::to_string_pretty(&board)?);
                return Ok(());
            }
            if board.is_empty() {
                println!("no ideas yet");
            }
            for idea in board {
                print_lines(&format_idea(idea));
            }
        }
        IdeaAction::Add(fields) => {
            let draft = IdeaDraft {
                title: fields.title,
                content: fields.content,
                tags: fields.tags,
                pinned: fields.pin,
            };
            let idea = ideas.add(&draft)?;
            println!("added {}  {}", short_id(&idea.id), idea.title);
        }
        IdeaAction::Edit(args) => {
            let id = idea_id(&ideas, &args.id)?;
            let Some(current) = ideas.get(&id) else {
                return Ok(());
            };
            let draft = IdeaDraft {
                title: args.title.unwrap_or_else(|| current.title.clone()),
                content: args.content.unwrap_or_else(|| current.content.clone()),
                tags: args.tags.unwrap_or_else(|| current.tags.join(", ")),
                pinned: (current.pinned || args.pin) && !args.unpin,
            };
            if ideas.update(&id, &draft)? {
                println!("updated {}", short_id(&id));
            }
        }
        IdeaAction::Pin(args) => {
            let id = idea_id(&ideas, &args.id)?;
            if let Some(pinned) = ideas.toggle_pin(&id)? {
                let state = if pinned { "pinned" } else { "unpinned" };
                println!("{} {}", state, short_id(&id));
            }
        }
        IdeaAction::Rm(args) => {
            let id = idea_id(&ideas, &args.id)?;
            if let Some(removed) = ideas.delete(&id)? {
                println!("deleted {}  {}", short_id(&removed.id), removed.title);
            }
        }
    }
    Ok(())
}
