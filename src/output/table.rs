//
//  bitbucket-server-client
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Tabular output in the terminal, rendered with `comfy_table`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bitbucket_server_client::output::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(["KEY", "VALUE"])
//!     .row(["server.host", "bitbucket.example.com"])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Creates a table with UTF-8 borders that adapts to the terminal width.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// A builder for constructing formatted tables with a fluent API.
///
/// Headers are shown in cyan when color is enabled. Color support is
/// detected on creation; use [`TableBuilder::color`] to override it.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    /// Sets whether color output is enabled.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the table headers. Call before adding rows.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            self.table
                .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
        } else {
            self.table.set_header(headers);
        }
        self
    }

    /// Adds a single row to the table.
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    /// Builds and prints the table to stdout.
    pub fn print(self) {
        println!("{}", self.table);
    }

    /// Returns the underlying table.
    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a boolean value as a human-readable Yes/No string.
///
/// # Returns
///
/// - `"Yes"` (green if colored) for `true`
/// - `"No"` (dimmed if colored) for `false`
pub fn format_bool(value: bool, color: bool) -> String {
    if color {
        use console::style;
        if value {
            style("Yes").green().to_string()
        } else {
            style("No").dim().to_string()
        }
    } else if value {
        "Yes".to_string()
    } else {
        "No".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bool_plain() {
        assert_eq!(format_bool(true, false), "Yes");
        assert_eq!(format_bool(false, false), "No");
    }

    #[test]
    fn test_table_builder_renders_rows() {
        let rendered = TableBuilder::new()
            .color(false)
            .headers(["KEY", "VALUE"])
            .row(["server.host", "bitbucket.example.com"])
            .build()
            .to_string();
        assert!(rendered.contains("KEY"));
        assert!(rendered.contains("bitbucket.example.com"));
    }
}
