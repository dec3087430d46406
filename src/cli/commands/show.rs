//! `hestia-site show` command - Print one entry of a collection

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::list::{columns_for, entry_row};
use crate::cli::helpers::open_layout;
use crate::cli::table::{TableConfig, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::ContentCollectionRegistry;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Collection name (comments, docs)
    pub collection: String,

    /// Entry id (comment id or page slug)
    pub id: String,

    /// Also print the markdown body of a page
    #[arg(long)]
    pub body: bool,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, config, layout) = open_layout(global)?;
    let registry = ContentCollectionRegistry::builtin(&layout)?;
    let collection = registry.resolve(&args.collection)?;

    let Some(entry) = collection.get(args.id.trim_matches('/')) else {
        return Err(miette::miette!(
            code = "hestia::cli::not_found",
            help = format!("run `hestia-site list {}` to see the available ids", args.collection),
            "no entry '{}' in collection '{}'",
            args.id,
            args.collection
        ));
    };

    let format = global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Yaml);

    match format {
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&entry.data).into_diagnostic()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry.data).into_diagnostic()?),
        OutputFormat::Id => println!("{}", entry.id),
        _ => {
            let (columns, noun) = columns_for(collection.name());
            TableFormatter::new(columns, noun)
                .with_config(TableConfig::for_pipe())
                .output(&[entry_row(entry)], format)?;
        }
    }

    if args.body {
        if let Some(doc) = entry.data.as_doc() {
            if !global.quiet {
                println!("{}", style("---").dim());
            }
            print!("{}", doc.body);
        }
    }

    Ok(())
}
