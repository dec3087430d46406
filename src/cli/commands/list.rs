//! `hestia-site list` command - Print the entries of a collection

use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{first_line, open_layout};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::collection::DOCS;
use crate::core::{ContentCollectionRegistry, ContentEntry, Entry};

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Collection name (comments, docs)
    pub collection: String,

    /// Include draft pages
    #[arg(long)]
    pub drafts: bool,

    /// Show at most this many entries
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

const COMMENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "NAME", 20),
    ColumnDef::new("login", "LOGIN", 16),
    ColumnDef::new("body", "BODY", 40),
    ColumnDef::new("href", "HREF", 36),
];

const DOC_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("title", "TITLE", 36),
    ColumnDef::new("label", "SIDEBAR", 20),
    ColumnDef::new("order", "ORDER", 7),
    ColumnDef::new("draft", "DRAFT", 7),
];

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, config, layout) = open_layout(global)?;
    let registry = ContentCollectionRegistry::builtin(&layout)?;
    let collection = registry.resolve(&args.collection)?;

    let entries: Vec<&Entry> = collection
        .iter()
        .filter(|e| args.drafts || !e.data.as_doc().is_some_and(|d| d.frontmatter.draft))
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    let format = global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Tsv);

    match format {
        OutputFormat::Yaml => {
            let data: Vec<&ContentEntry> = entries.iter().map(|e| &e.data).collect();
            print!("{}", serde_yml::to_string(&data).into_diagnostic()?);
        }
        OutputFormat::Json => {
            let data: Vec<&ContentEntry> = entries.iter().map(|e| &e.data).collect();
            println!("{}", serde_json::to_string_pretty(&data).into_diagnostic()?);
        }
        _ => {
            let (columns, noun) = columns_for(&args.collection);
            let rows: Vec<TableRow> = entries.into_iter().map(entry_row).collect();
            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            TableFormatter::new(columns, noun)
                .with_config(config)
                .output(&rows, format)?;
        }
    }

    Ok(())
}

/// Table columns and the singular noun for a collection
pub(crate) fn columns_for(collection: &str) -> (&'static [ColumnDef], &'static str) {
    if collection == DOCS {
        (DOC_COLUMNS, "page")
    } else {
        (COMMENT_COLUMNS, "comment")
    }
}

/// Table row for one entry
pub(crate) fn entry_row(entry: &Entry) -> TableRow {
    let row = TableRow::new(&entry.id);
    match &entry.data {
        ContentEntry::Comment(c) => row
            .cell("name", CellValue::Text(c.name.clone()))
            .cell("login", CellValue::Text(c.login.clone()))
            .cell("body", CellValue::Text(first_line(&c.body).to_string()))
            .cell("href", CellValue::Url(c.href.to_string())),
        ContentEntry::Doc(d) => {
            let fm = &d.frontmatter;
            let row = row
                .cell("title", CellValue::Text(fm.title.clone()))
                .cell("draft", CellValue::Flag(fm.draft));
            let row = match &fm.sidebar.label {
                Some(label) => row.cell("label", CellValue::Text(label.clone())),
                None => row,
            };
            match fm.sidebar.order {
                Some(order) => row.cell("order", CellValue::Number(order)),
                None => row,
            }
        }
    }
}
