//
//  bitbucket-server-client
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Output formatting for the `bbs` command-line tool. Two formats are
//! supported:
//!
//! - **Table format**: Human-readable output for interactive terminal use
//! - **JSON format**: Machine-readable JSON output for scripting and automation
//!
//! ## Core Components
//!
//! - [`OutputFormat`]: Enum representing the available output formats
//! - [`OutputWriter`]: Main entry point for writing formatted output
//! - [`TableOutput`]: Trait for types that can be rendered for humans
//!
//! ## Example
//!
//! ```rust,ignore
//! use bitbucket_server_client::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Json);
//! writer.write(&project)?;
//! writer.write_success("Created project TPO");
//! ```

mod table;

pub use table::*;

use serde::Serialize;

use crate::api::server::{Project, Repository};

/// Represents the available output formats for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable field listings and tables.
    ///
    /// Colors are applied when the terminal supports them.
    #[default]
    Table,

    /// Pretty-printed JSON, suitable for piping into `jq`.
    Json,
}

impl OutputFormat {
    /// Picks the format requested by the `--json` flag.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// Writes values and status messages in the selected [`OutputFormat`].
///
/// # Notes
///
/// Color output is automatically detected based on terminal capabilities.
/// Colors are disabled when output is piped or redirected.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a new output writer with the specified format.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let json_writer = OutputWriter::new(OutputFormat::Json);
    /// let table_writer = OutputWriter::new(OutputFormat::Table);
    /// ```
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Writes a value to stdout using the configured output format.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails (only applicable for JSON format).
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(value)?);
            }
            OutputFormat::Table => {
                value.print_table(self.color);
            }
        }
        Ok(())
    }

    /// Reports the outcome of an operation that returns no entity.
    ///
    /// In JSON mode `json` is printed instead of `msg`, so scripts always
    /// receive a JSON document on stdout.
    pub fn write_outcome(&self, msg: &str, json: serde_json::Value) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json)?),
            OutputFormat::Table => self.write_success(msg),
        }
        Ok(())
    }

    /// Writes a success message to stdout.
    ///
    /// ```rust,ignore
    /// writer.write_success("Deleted project TPO");
    /// // Output: ✓ Deleted project TPO
    /// ```
    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// A trait for types that can be rendered for a human reader.
///
/// Types implementing this trait can be written through an [`OutputWriter`].
/// For JSON output, types must also implement [`Serialize`].
pub trait TableOutput {
    /// Renders the type to stdout.
    ///
    /// Implementations should use the `color` parameter to conditionally
    /// apply styling, e.g. through [`format_bool`].
    fn print_table(&self, color: bool);
}

/// Prints a styled header with an underline.
///
/// ```rust,ignore
/// print_header("TestProject");
/// // Output:
/// // TestProject
/// // -----------
/// ```
pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints a key-value pair, dimming the key when color is enabled.
pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

impl TableOutput for Project {
    fn print_table(&self, color: bool) {
        print_header(&self.name);
        print_field("Key", &self.key, color);
        print_field("ID", &self.id.to_string(), color);
        print_field("Type", or_dash(Some(self.project_type.as_str())), color);
        print_field("Public", &format_bool(self.is_public, color), color);
        print_field("Description", or_dash(self.description.as_deref()), color);
        if let Some(scope) = &self.scope {
            print_field("Scope", scope, color);
        }
    }
}

impl TableOutput for Repository {
    fn print_table(&self, color: bool) {
        print_header(&self.name);
        print_field("Project", &self.project.key, color);
        print_field("Slug", &self.slug, color);
        print_field("ID", &self.id.to_string(), color);
        print_field("State", or_dash(Some(self.state.as_str())), color);
        print_field("SCM", or_dash(Some(self.scm_id.as_str())), color);
        print_field("Public", &format_bool(self.is_public, color), color);
        print_field("Forkable", &format_bool(self.forkable, color), color);
        print_field("Archived", &format_bool(self.archived, color), color);
        print_field(
            "Default branch",
            or_dash(self.default_branch.as_deref()),
            color,
        );
        print_field("Description", or_dash(self.description.as_deref()), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flag() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Table);
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("main")), "main");
    }
}
