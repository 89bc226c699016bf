//! Table formatting utilities for CLI list commands
//!
//! One formatter renders user rows as TSV, CSV, markdown or bare ids, so the
//! `users` and `cache` list commands share a single output path.

use chrono::{DateTime, NaiveDate, Utc};
use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::entities::UserStatus;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Plain text, truncated to the column width
    Text(String),
    /// User status with color coding
    Status(UserStatus),
    /// Calendar date
    Date(NaiveDate),
    /// Timestamp displayed with minutes
    DateTime(DateTime<Utc>),
    /// Numeric value
    Number(i64),
    /// Tags/labels as comma-separated
    Tags(Vec<String>),
    /// Yes/no flag (favorites)
    Flag(bool),
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Status(status) => {
                let s = status.to_string();
                let styled = match status {
                    UserStatus::Active => style(s).green(),
                    UserStatus::Inactive => style(s).dim(),
                    UserStatus::Pending => style(s).yellow(),
                    UserStatus::Blacklisted => style(s).red().bold(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Flag(true) => format!("{:<width$}", style("★").yellow(), width = width),
            CellValue::Flag(false) => format!("{:<width$}", style("-").dim(), width = width),
            CellValue::Tags(tags) => {
                let joined = truncate_str(&tags.join(", "), width.saturating_sub(2));
                format!("{:<width$}", style(joined).magenta(), width = width)
            }
            other => format!("{:<width$}", other.raw(), width = width),
        }
    }

    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Flag(flag) => flag.to_string(),
            CellValue::Tags(tags) => escape_csv(&tags.join(";")),
            other => escape_csv(&other.raw()),
        }
    }

    pub fn format_md(&self) -> String {
        match self {
            CellValue::Flag(true) => "★".to_string(),
            CellValue::Flag(false) => "-".to_string(),
            CellValue::Text(s) => s.replace('|', "\\|"),
            other => other.raw(),
        }
    }

    /// Plain, uncolored value
    pub fn raw(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Status(status) => status.to_string(),
            CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Tags(tags) => tags.join(", "),
            CellValue::Flag(flag) => (if *flag { "yes" } else { "no" }).to_string(),
        }
    }

    /// Character width of the raw value
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Date(_) => 10,
            CellValue::DateTime(_) => 16,
            CellValue::Flag(_) => 1,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    pub id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    item_name: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], item_name: &'static str) -> Self {
        Self {
            columns,
            item_name,
            show_summary: true,
        }
    }

    /// Drop the "N user(s)" line after TSV output
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Output rows in the specified format
    ///
    /// Structured formats (json, yaml) are the caller's job; they fall back
    /// to TSV here.
    pub fn output<I>(&self, rows: I, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();
        print!("{}", self.render(&rows, format));
    }

    /// Render rows to a string
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> String {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => self.render_md(rows),
            OutputFormat::Id => rows.iter().map(|r| format!("{}\n", r.id)).collect(),
            _ => self.render_tsv(rows),
        }
    }

    /// Column widths from content, capped at each column's defined width
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                // +2 for the truncation buffer
                col.header.len().max(max_content + 2).min(col.width)
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => format!("{:<width$}", "-", width = *w),
                })
                .collect();
            out.push_str(cells.join(" ").trim_end());
            out.push('\n');
        }

        if self.show_summary {
            out.push('\n');
            out.push_str(&format!("{} {}(s) found.\n", style(rows.len()).cyan(), self.item_name));
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&headers.join(","));
        out.push('\n');

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(CellValue::format_csv).unwrap_or_default())
                .collect();
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut table = Builder::default();
        table.push_record(self.columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            table.push_record(self.columns.iter().map(|col| {
                row.get(col.key)
                    .map(CellValue::format_md)
                    .unwrap_or_else(|| "-".to_string())
            }));
        }
        format!("{}\n", table.build().with(Style::markdown()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 10),
        ColumnDef::new("username", "USERNAME", 20),
        ColumnDef::new("status", "STATUS", 12),
    ];

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new("user_1")
                .cell("id", CellValue::Text("user_1".into()))
                .cell("username", CellValue::Text("adedeji, ola".into()))
                .cell("status", CellValue::Status(UserStatus::Active)),
            TableRow::new("user_2").cell("id", CellValue::Text("user_2".into())),
        ]
    }

    #[test]
    fn test_csv_escapes_and_blanks_missing_cells() {
        let out = TableFormatter::new(COLUMNS, "user").render(&rows(), OutputFormat::Csv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id,username,status");
        assert_eq!(lines[1], "user_1,\"adedeji, ola\",active");
        assert_eq!(lines[2], "user_2,,");
    }

    #[test]
    fn test_md_uses_markdown_table() {
        let out = TableFormatter::new(COLUMNS, "user").render(&rows(), OutputFormat::Md);
        assert!(out.lines().next().unwrap().starts_with('|'));
        assert!(out.contains("adedeji, ola"));
        assert!(out.contains("| -"));
    }

    #[test]
    fn test_id_format_lists_ids_only() {
        let out = TableFormatter::new(COLUMNS, "user").render(&rows(), OutputFormat::Id);
        assert_eq!(out, "user_1\nuser_2\n");
    }

    #[test]
    fn test_tsv_summary() {
        let formatter = TableFormatter::new(COLUMNS, "user");
        assert!(formatter.render(&rows(), OutputFormat::Tsv).contains("(s) found."));
        assert!(!formatter
            .without_summary()
            .render(&rows(), OutputFormat::Tsv)
            .contains("found"));
    }

    #[test]
    fn test_raw_values() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 15).unwrap();
        assert_eq!(CellValue::Date(date).raw(), "2020-05-15");
        assert_eq!(CellValue::Tags(vec!["a".into(), "b".into()]).raw(), "a, b");
        assert_eq!(CellValue::Tags(vec!["a".into(), "b".into()]).format_csv(), "a;b");
        assert_eq!(CellValue::Flag(true).raw(), "yes");
    }
}
