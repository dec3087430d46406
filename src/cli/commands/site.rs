//! `hestia-site site` command - Site configuration and navigation

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_layout;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::collection::DOCS;
use crate::core::{resolve_sidebar, Config, ContentCollectionRegistry, Layout, NavItem, SiteConfig};

#[derive(Subcommand, Debug)]
pub enum SiteCommands {
    /// Show the loaded site configuration
    Show,

    /// Show the resolved navigation sidebar
    Sidebar,
}

pub fn run(cmd: SiteCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SiteCommands::Show => run_show(global),
        SiteCommands::Sidebar => run_sidebar(global),
    }
}

fn load_site(global: &GlobalOpts) -> Result<(SiteConfig, Config, Layout)> {
    let (project, config, layout) = open_layout(global)?;
    let site = SiteConfig::load(&project.site_file())?;
    site.validate()?;
    Ok((site, config, layout))
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let (site, config, _layout) = load_site(global)?;

    match global.format.resolve(config.default_format.as_deref(), OutputFormat::Yaml) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&site).into_diagnostic()?),
        _ => print!("{}", serde_yml::to_string(&site).into_diagnostic()?),
    }
    Ok(())
}

fn run_sidebar(global: &GlobalOpts) -> Result<()> {
    let (site, config, layout) = load_site(global)?;
    let docs = ContentCollectionRegistry::builtin(&layout)?.resolve(DOCS)?;
    let sidebar = resolve_sidebar(&site, &docs)?;

    match global.format.resolve(config.default_format.as_deref(), OutputFormat::Auto) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sidebar).into_diagnostic()?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&sidebar).into_diagnostic()?),
        _ => {
            let mut out = String::new();
            render_tree(&sidebar, 0, &mut out);
            print!("{}", out);
        }
    }
    Ok(())
}

/// Indented outline of the navigation tree
fn render_tree(items: &[NavItem], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for item in items {
        match item {
            NavItem::Group { label, items, collapsed } => {
                let marker = if *collapsed { "▸" } else { "▾" };
                out.push_str(&format!("{}{} {}\n", indent, style(marker).dim(), style(label).bold()));
                render_tree(items, depth + 1, out);
            }
            NavItem::Link { label, href, badge, .. } => {
                out.push_str(&format!("{}• {} {}", indent, label, style(href).cyan()));
                if let Some(badge) = badge {
                    out.push_str(&format!(" {}", style(format!("[{}]", badge)).yellow()));
                }
                out.push('\n');
            }
        }
    }
}
