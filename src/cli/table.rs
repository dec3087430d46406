//! Table formatting utilities for CLI list commands
//!
//! Rows are built from typed cells and rendered as aligned columns, CSV,
//! markdown or bare ids depending on the requested output format.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::io;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 comment(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// Create config optimized for piping (no summary)
    pub fn for_pipe() -> Self {
        Self { show_summary: false }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain text, truncated to the column width
    Text(String),
    /// URL, dimmed in terminal output
    Url(String),
    /// Yes/no flag
    Flag(bool),
    /// Numeric value
    Number(f64),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Format for aligned terminal output
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Url(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", style(truncated).dim(), width = width)
            }
            CellValue::Flag(true) => format!("{:<width$}", style("yes").yellow(), width = width),
            CellValue::Flag(false) => format!("{:<width$}", style("no").dim(), width = width),
            CellValue::Number(_) | CellValue::Empty => format!("{:<width$}", self.raw(), width = width),
        }
    }

    /// Format for markdown tables, escaping pipes
    pub fn format_md(&self) -> String {
        self.raw().replace('|', "\\|")
    }

    /// Unstyled value
    pub fn raw(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::Url(s) => s.clone(),
            CellValue::Flag(flag) => if *flag { "yes" } else { "no" }.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => "-".to_string(),
        }
    }

    /// Width of the unstyled value in characters
    pub fn display_width(&self) -> usize {
        self.raw().chars().count()
    }
}

/// A column of a list table
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    /// Maximum rendered width
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// One row: the entry id plus its cells by column key
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: String,
    cells: HashMap<&'static str, CellValue>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: HashMap::new(),
        }
    }

    /// Builder-style cell setter
    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.get(key)
    }

    fn value(&self, key: &str) -> &CellValue {
        self.get(key).unwrap_or(&EMPTY)
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// Renders rows of one collection
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    /// Singular noun used in the summary line
    noun: &'a str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], noun: &'a str) -> Self {
        Self {
            columns,
            noun,
            config: TableConfig::default(),
        }
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Output rows in the specified format
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Csv => self.output_csv(rows),
            OutputFormat::Md => {
                println!("{}", self.render_md(rows));
                Ok(())
            }
            OutputFormat::Id => {
                for row in rows {
                    println!("{}", row.id);
                }
                Ok(())
            }
            _ => {
                self.output_tsv(rows);
                Ok(())
            }
        }
    }

    /// Dynamic column widths: the longer of header and content, capped at the
    /// column's maximum
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        let id_width = rows
            .iter()
            .map(|r| r.id.chars().count())
            .max()
            .unwrap_or(0)
            .max(2);

        let mut widths = vec![id_width];
        for col in self.columns {
            let max_content = rows
                .iter()
                .map(|r| r.value(col.key).display_width())
                .max()
                .unwrap_or(0);
            let natural = col.header.len().max(max_content.saturating_add(2));
            widths.push(natural.min(col.width));
        }
        widths
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let mut header_parts = vec![format!("{:<width$}", style("ID").bold(), width = widths[0])];
        for (col, width) in self.columns.iter().zip(&widths[1..]) {
            header_parts.push(format!("{:<width$}", style(col.header).bold(), width = width));
        }
        println!("{}", header_parts.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len() - 1;
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let mut parts = vec![format!("{:<width$}", style(&row.id).cyan(), width = widths[0])];
            for (col, width) in self.columns.iter().zip(&widths[1..]) {
                parts.push(row.value(col.key).format_tsv(*width));
            }
            println!("{}", parts.join(" "));
        }

        if self.config.show_summary {
            println!();
            println!("{} {}(s) found.", style(rows.len()).cyan(), self.noun);
        }
    }

    fn output_csv(&self, rows: &[TableRow]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(io::stdout());

        let mut headers = vec!["id"];
        headers.extend(self.columns.iter().map(|c| c.key));
        writer.write_record(&headers).into_diagnostic()?;

        for row in rows {
            let mut record = vec![row.id.clone()];
            record.extend(self.columns.iter().map(|c| match row.value(c.key) {
                CellValue::Empty => String::new(),
                value => value.raw(),
            }));
            writer.write_record(&record).into_diagnostic()?;
        }

        writer.flush().into_diagnostic()?;
        Ok(())
    }

    /// Markdown table
    pub fn render_md(&self, rows: &[TableRow]) -> String {
        let mut builder = Builder::default();

        let mut headers = vec!["ID".to_string()];
        headers.extend(self.columns.iter().map(|c| c.header.to_string()));
        builder.push_record(headers);

        for row in rows {
            let mut values = vec![row.id.clone()];
            values.extend(self.columns.iter().map(|c| row.value(c.key).format_md()));
            builder.push_record(values);
        }

        builder.build().with(Style::markdown()).to_string()
    }
}
