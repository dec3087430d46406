//! YAML sources: syntax diagnostics and frontmatter handling

pub mod diagnostics;
pub mod frontmatter;

pub use diagnostics::SyntaxError;
