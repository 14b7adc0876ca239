use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::recovery::atomic_write;
use crate::io::site_io;

const FOLIO_TOML_TEMPLATE: &str = r##"[site]
name = "{name}"

# --- Home page ---
# Shown by `folio home`. Skill levels are free-form; filter with --skills.

[profile]
name = ""
title = ""
bio = ""

# [[profile.skills]]
# name = "Rust"
# level = "expert"

[dashboard]
# first column of the calendar: "sunday" or "monday"
week_start = "sunday"

[log]
# level = "info"        # or set FOLIO_LOG

# --- UI Customization ---
# Uncomment and edit to override defaults.
#
# [ui.colors]
# background = "#0C001B"
# text = "#A09BFE"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#5A5580"
# red = "#FF4444"
# yellow = "#FFD700"
# green = "#44FF88"
# cyan = "#44DDFF"
"##;

/// Session records, logs and UI state stay out of version control.
const GITIGNORE: &str = ".session/\nlogs/\n.state.json\n";

/// Infer a site name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_folio_toml(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    FOLIO_TOML_TEMPLATE.replace("{name}", &escaped)
}

/// Lay out `folio/` under `root`. Existing data is never touched; with
/// `force` only folio.toml is rewritten.
fn init_site(root: &Path, name: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let folio_dir = root.join("folio");
    if folio_dir.join("folio.toml").exists() && !force {
        return Err("folio site already exists in ./folio/ (use --force to rewrite folio.toml)".into());
    }
    fs::create_dir_all(folio_dir.join("data"))?;
    atomic_write(
        &folio_dir.join("folio.toml"),
        render_folio_toml(name).as_bytes(),
    )?;
    let gitignore = folio_dir.join(".gitignore");
    if !gitignore.exists() {
        fs::write(gitignore, GITIGNORE)?;
    }
    Ok(())
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;

    // Check for parent site and warn
    if let Some(parent) = cwd.parent()
        && let Ok(parent_root) = site_io::discover_site(parent)
    {
        eprintln!(
            "Note: parent site found at {}/",
            parent_root.join("folio").display()
        );
        eprintln!("Creating new site in ./folio/");
    }

    let name = args.name.unwrap_or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Untitled".to_string())
    });

    init_site(&cwd, &name, args.force)?;
    println!("Initialized folio site: {}", name);
    println!("  default password: admin123 (change it with `folio passwd`)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{SiteConfig, WeekStart};
    use tempfile::TempDir;

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("my-portfolio"), "My Portfolio");
        assert_eq!(infer_name("folio"), "Folio");
        assert_eq!(infer_name("dev-notes-2026"), "Dev Notes 2026");
    }

    #[test]
    fn template_parses_as_config() {
        let config: SiteConfig = toml::from_str(&render_folio_toml("Jo \"JJ\" Park")).unwrap();
        assert_eq!(config.site.name, "Jo \"JJ\" Park");
        assert_eq!(config.dashboard.week_start, WeekStart::Sunday);
        assert!(config.profile.skills.is_empty());
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn init_creates_layout_and_refuses_twice() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path(), "Test", false).unwrap();
        assert!(tmp.path().join("folio/data").is_dir());
        assert!(tmp.path().join("folio/.gitignore").is_file());
        let site = site_io::load_site(tmp.path()).unwrap();
        assert_eq!(site.config.site.name, "Test");

        assert!(init_site(tmp.path(), "Again", false).is_err());
        init_site(tmp.path(), "Again", true).unwrap();
        let site = site_io::load_site(tmp.path()).unwrap();
        assert_eq!(site.config.site.name, "Again");
    }
}
