//! `hestia-site config` command - View tool settings

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::open_project;
use crate::cli::GlobalOpts;
use crate::core::config::KEYS;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current settings
    Show(ShowArgs),

    /// Show paths to settings files
    Path,

    /// List all available settings keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global).ok();
    let config = Config::load(project.as_ref())?;

    if let Some(key) = &args.key {
        if !KEYS.iter().any(|(k, _)| *k == key.as_str()) {
            return Err(miette::miette!(
                help = "run `hestia-site config keys` to list the valid keys",
                "unknown key '{}'",
                key
            ));
        }
        return match config.get(key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in KEYS {
        match config.get(key) {
            Some(value) => println!("  {:<16} {}", style(key).cyan(), value),
            None => println!("  {:<16} {}", style(key).cyan(), style("(default)").dim()),
        }
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Environment variables (HESTIA_CONTENT_DIR, HESTIA_FORMAT)");
    println!("  2. Project config (.hestia/config.yaml)");
    println!("  3. Global config (~/.config/hestia-site/config.yaml)");

    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    match Config::global_config_path() {
        Some(path) => print_path("Global", &path),
        None => println!("{}: {}", style("Global").bold(), style("(unavailable)").dim()),
    }
    match open_project(global) {
        Ok(project) => print_path("Project", &project.config_file()),
        Err(_) => println!("{}: {}", style("Project").bold(), style("(not in a site project)").dim()),
    }
    Ok(())
}

fn print_path(scope: &str, path: &std::path::Path) {
    let state = if path.exists() {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("{}: {} {}", style(scope).bold(), path.display(), state);
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available Configuration Keys").bold().underlined());
    println!();
    for (key, description) in KEYS {
        println!("  {:<16} {}", style(key).cyan(), description);
    }
    Ok(())
}
