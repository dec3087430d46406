//! Schema introspection
//!
//! Shows the record shape each collection accepts without reading any
//! content.

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::cli::helpers::{open_layout, truncate_str};
use crate::cli::GlobalOpts;
use crate::core::{Config, ConfigurationError, ContentCollectionRegistry, Layout};

#[derive(Subcommand, Debug)]
pub enum SchemaCommands {
    /// List all collection schemas
    List,

    /// Show detailed schema for a collection
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Collection name (comments, docs)
    pub collection: String,

    /// Show raw JSON schema instead of formatted summary
    #[arg(long)]
    pub raw: bool,
}

pub fn run(cmd: SchemaCommands, global: &GlobalOpts) -> Result<()> {
    // Schemas do not depend on content, so a project is optional here
    let layout = match open_layout(global) {
        Ok((_, _, layout)) => layout,
        Err(report) if global.project.is_none() && is_project_not_found(&report) => {
            Layout::new(Path::new("."), &Config::load(None)?)
        }
        Err(report) => return Err(report),
    };
    let registry = ContentCollectionRegistry::builtin(&layout)?;

    match cmd {
        SchemaCommands::List => list_schemas(&registry),
        SchemaCommands::Show(args) => show_schema(&registry, args),
    }
}

fn is_project_not_found(report: &miette::Report) -> bool {
    matches!(
        report.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::ProjectNotFound { .. })
    )
}

fn list_schemas(registry: &ContentCollectionRegistry) -> Result<()> {
    println!("Collections:\n");
    println!("{:<12} {:<12} {}", "NAME", "TITLE", "SOURCE");
    println!("{}", "-".repeat(70));

    for name in registry.names() {
        let schema = registry.json_schema(name)?;
        let title = schema["title"].as_str().unwrap_or(name);
        println!("{:<12} {:<12} {}", name, title, registry.source(name)?);
    }

    println!("\nUse 'hestia-site schema show <collection>' for field details");
    Ok(())
}

fn show_schema(registry: &ContentCollectionRegistry, args: ShowArgs) -> Result<()> {
    let schema = registry.json_schema(&args.collection)?;

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&schema).into_diagnostic()?);
        return Ok(());
    }

    print!("{}", describe(&schema, &args.collection));
    println!("\nUse --raw for full JSON schema");
    Ok(())
}

/// Field table of a JSON Schema document
fn describe(schema: &Value, fallback_title: &str) -> String {
    let mut out = String::new();

    let title = schema["title"].as_str().unwrap_or(fallback_title);
    let desc = schema["description"].as_str().unwrap_or("");
    out.push_str(&format!("{}\n{}\n", title, "=".repeat(title.len())));
    if !desc.is_empty() {
        out.push_str(&format!("{}\n\n", desc));
    }

    let required: Vec<&str> = schema["required"]
        .as_array()
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let Some(props) = schema["properties"].as_object() else {
        return out;
    };

    out.push_str("Fields:\n");
    out.push_str(&format!("{:<18} {:<16} {:<5} {}\n", "NAME", "TYPE", "REQ", "DESCRIPTION"));
    out.push_str(&format!("{}\n", "-".repeat(80)));

    // Sort properties for consistent display
    let sorted: BTreeMap<_, _> = props.iter().collect();
    for (name, prop) in &sorted {
        let is_required = if required.contains(&name.as_str()) { "yes" } else { "" };
        let prop_desc = prop["description"].as_str().unwrap_or("");
        out.push_str(&format!(
            "{:<18} {:<16} {:<5} {}\n",
            name,
            type_str(prop),
            is_required,
            truncate_str(prop_desc, 38)
        ));
    }

    let enums: Vec<String> = sorted
        .iter()
        .filter_map(|(name, prop)| {
            let values = prop["enum"].as_array()?;
            let values: Vec<&str> = values.iter().filter_map(|v| v.as_str()).collect();
            Some(format!("  {}: {}\n", name, values.join(", ")))
        })
        .collect();
    if !enums.is_empty() {
        out.push_str("\nEnum Values:\n");
        out.extend(enums);
    }

    out
}

fn type_str(prop: &Value) -> String {
    match &prop["type"] {
        Value::String(t) if t == "array" => match prop["items"]["type"].as_str() {
            Some(items) => format!("{}[]", items),
            None => "array".to_string(),
        },
        Value::String(t) => t.clone(),
        Value::Array(types) => types
            .iter()
            .filter_map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join("|"),
        _ if prop.get("enum").is_some() => "enum".to_string(),
        _ if prop.get("oneOf").is_some() => "one of".to_string(),
        _ => "any".to_string(),
    }
}
