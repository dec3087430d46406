//! Shared helper functions for CLI commands

use miette::Result;

use crate::core::{Config, Layout, Project};

use super::GlobalOpts;

/// Locate the project: `--project` when given, otherwise search upwards
/// from the current directory
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    let project = match &global.project {
        Some(path) => Project::at(path)?,
        None => Project::discover()?,
    };
    Ok(project)
}

/// Project, settings and the resulting content layout
pub fn open_layout(global: &GlobalOpts) -> Result<(Project, Config, Layout)> {
    let project = open_project(global)?;
    let config = Config::load(Some(&project))?;
    let layout = project.layout(&config);
    tracing::debug!(content = %layout.content_dir().display(), "content layout");
    Ok((project, config, layout))
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// First line of a text, for single-line table cells
pub fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("Натуральные числа", 8), "Натур...");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("  Great tool\nsecond line"), "Great tool");
        assert_eq!(first_line(""), "");
    }
}
