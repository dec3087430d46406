//! `hestia-site validate` command - Load and validate content collections

use console::style;
use miette::Result;
use rayon::prelude::*;

use crate::cli::helpers::open_layout;
use crate::cli::GlobalOpts;
use crate::core::collection::DOCS;
use crate::core::{resolve_sidebar, Collection, CollectionError, ContentCollectionRegistry, Project, SiteConfig};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Only validate these collections (default: all)
    #[arg(long = "collection", short = 'c', value_name = "NAME")]
    pub collections: Vec<String>,

    /// Also check site.yaml and resolve the sidebar against the docs
    #[arg(long)]
    pub site: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    collections_checked: usize,
    collections_passed: usize,
    collections_failed: usize,
    entries_loaded: usize,
    invalid_records: usize,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let (project, _config, layout) = open_layout(global)?;
    let registry = ContentCollectionRegistry::builtin(&layout)?;

    let names: Vec<String> = if args.collections.is_empty() {
        registry.names().map(str::to_string).collect()
    } else {
        for name in &args.collections {
            // Fail on unknown names before reading anything
            registry.source(name)?;
        }
        args.collections.clone()
    };

    if !global.quiet {
        println!("{} Validating {} collection(s)...\n", style("→").blue(), names.len());
    }

    let results: Vec<(&String, Result<Collection, CollectionError>)> = names
        .par_iter()
        .map(|name| (name, registry.resolve(name)))
        .collect();

    let mut stats = ValidationStats::default();
    let mut docs: Option<Collection> = None;
    let mut site_failed = false;

    for (name, result) in results {
        stats.collections_checked += 1;
        match result {
            Ok(collection) => {
                stats.collections_passed += 1;
                stats.entries_loaded += collection.len();
                if !args.summary && !global.quiet {
                    println!(
                        "{} {} ({} entries)",
                        style("✓").green(),
                        style(name).cyan(),
                        collection.len()
                    );
                }
                if name == DOCS {
                    docs = Some(collection);
                }
            }
            Err(e) => {
                stats.collections_failed += 1;
                let detail = match &e {
                    CollectionError::Validation(v) => {
                        stats.invalid_records += v.failures().len();
                        format!("{} invalid record(s)", v.failures().len())
                    }
                    CollectionError::Source { .. } => "source could not be loaded".to_string(),
                    CollectionError::Configuration(_) => "misconfigured".to_string(),
                };
                if !args.summary {
                    println!("{} {} - {}", style("✗").red(), style(name).cyan(), detail);
                    let report = miette::Report::new(e);
                    println!("{:?}", report);
                }
            }
        }
    }

    if args.site {
        let docs_failed = docs.is_none() && names.iter().any(|n| n == DOCS);
        let outcome = if docs_failed {
            Err(miette::miette!("the sidebar was not resolved because the docs collection failed"))
        } else {
            check_site(&project, &registry, docs)
        };
        match outcome {
            Ok(items) => {
                if !args.summary && !global.quiet {
                    println!("{} site.yaml ({} sidebar item(s))", style("✓").green(), items);
                }
            }
            Err(report) => {
                site_failed = true;
                if !args.summary {
                    println!("{} site.yaml", style("✗").red());
                    println!("{:?}", report);
                }
            }
        }
    }

    if !global.quiet {
        print_summary(&stats, args.site.then_some(site_failed));
    }

    let failed = stats.collections_failed + usize::from(site_failed);
    if failed > 0 {
        Err(miette::miette!("Validation failed: {} check(s) have errors", failed))
    } else {
        if !global.quiet {
            println!("{} All content passed validation!", style("✓").green().bold());
        }
        Ok(())
    }
}

/// Load site.yaml, check it and resolve its sidebar. Returns the number of
/// top-level sidebar items.
fn check_site(
    project: &Project,
    registry: &ContentCollectionRegistry,
    docs: Option<Collection>,
) -> std::result::Result<usize, miette::Report> {
    let site = SiteConfig::load(&project.site_file())?;
    site.validate()?;

    let docs = match docs {
        Some(docs) => docs,
        None => registry.resolve(DOCS)?,
    };
    let sidebar = resolve_sidebar(&site, &docs)?;
    Ok(sidebar.len())
}

fn print_summary(stats: &ValidationStats, site_failed: Option<bool>) {
    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Collections checked: {}", style(stats.collections_checked).cyan());
    println!("  Collections passed:  {}", style(stats.collections_passed).green());
    println!("  Collections failed:  {}", style(stats.collections_failed).red());
    println!("  Entries loaded:      {}", style(stats.entries_loaded).cyan());
    println!("  Invalid records:     {}", style(stats.invalid_records).red());
    match site_failed {
        Some(false) => println!("  Site configuration:  {}", style("ok").green()),
        Some(true) => println!("  Site configuration:  {}", style("failed").red()),
        None => {}
    }
    println!();
}
