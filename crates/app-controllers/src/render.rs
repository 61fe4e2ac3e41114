//! Planner-facing text for query results and schemas

use dom_query::DomRecord;
use dom_query::TEXT_ATTRIBUTE;

use crate::ports::TableSchema;

/// A result grid scraped through the `results` query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Build from records shaped `{ headers: [{text}], rows: [{ cells: [{text}] }] }`.
    /// Only the first matched table is used.
    pub fn from_records(records: &[DomRecord]) -> Option<Self> {
        let table = records.first()?;
        let headers = table
            .children("headers")
            .iter()
            .map(cell_text)
            .collect::<Vec<_>>();
        let rows = table
            .children("rows")
            .iter()
            .map(|row| row.children("cells").iter().map(cell_text).collect())
            .filter(|cells: &Vec<String>| !cells.is_empty())
            .collect::<Vec<_>>();
        Some(Self { headers, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Markdown table of at most `max_rows` rows, with a note when cut.
    pub fn to_markdown(&self, max_rows: usize) -> String {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        if width == 0 {
            return String::new();
        }

        let mut headers = self.headers.clone();
        for column in headers.len()..width {
            headers.push(format!("column_{}", column + 1));
        }

        let mut lines = Vec::with_capacity(self.rows.len().min(max_rows) + 3);
        lines.push(markdown_row(&headers, width));
        lines.push(format!("|{}", " --- |".repeat(width)));
        for row in self.rows.iter().take(max_rows) {
            lines.push(markdown_row(row, width));
        }

        let mut out = lines.join("\n");
        if self.rows.len() > max_rows {
            out.push_str(&format!(
                "\n\n_Showing the first {} of {} rows._",
                max_rows,
                self.rows.len()
            ));
        }
        out
    }
}

fn cell_text(record: &DomRecord) -> String {
    record.attr(TEXT_ATTRIBUTE).unwrap_or_default().to_string()
}

fn markdown_row(cells: &[String], width: usize) -> String {
    let mut line = String::from("|");
    for column in 0..width {
        let cell = cells.get(column).map(String::as_str).unwrap_or("");
        line.push(' ');
        line.push_str(&escape_cell(cell));
        line.push_str(" |");
    }
    line
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// One Markdown section per table; unknown tables are listed at the end.
pub fn schemas_to_markdown(found: &[TableSchema], missing: &[String]) -> String {
    let mut sections = Vec::new();
    for table in found {
        let mut lines = vec![format!("Table `{}`:", table.name)];
        for column in &table.columns {
            match &column.description {
                Some(description) => lines.push(format!(
                    "- {} ({}): {}",
                    column.name, column.data_type, description
                )),
                None => lines.push(format!("- {} ({})", column.name, column.data_type)),
            }
        }
        sections.push(lines.join("\n"));
    }
    if !missing.is_empty() {
        sections.push(format!("Unknown tables: {}", missing.join(", ")));
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: usize) -> ResultTable {
        ResultTable {
            headers: vec!["id".into(), "name".into()],
            rows: (1..=rows)
                .map(|i| vec![i.to_string(), format!("user {}", i)])
                .collect(),
        }
    }

    #[test]
    fn renders_a_markdown_grid() {
        assert_eq!(
            table(2).to_markdown(50),
            "| id | name |\n| --- | --- |\n| 1 | user 1 |\n| 2 | user 2 |"
        );
    }

    #[test]
    fn truncates_with_a_note() {
        let out = table(5).to_markdown(3);
        assert_eq!(out.lines().filter(|l| l.starts_with("| ")).count(), 4);
        assert!(out.ends_with("_Showing the first 3 of 5 rows._"));
    }

    #[test]
    fn escapes_pipes_and_fills_missing_headers() {
        let table = ResultTable {
            headers: vec!["a".into()],
            rows: vec![vec!["x|y".into(), "multi\nline".into()]],
        };
        assert_eq!(
            table.to_markdown(10),
            "| a | column_2 |\n| --- | --- |\n| x\\|y | multi line |"
        );
    }

    #[test]
    fn schemas_list_columns() {
        let orders = TableSchema::new("orders")
            .column("id", "integer")
            .column("total", "numeric");
        assert_eq!(
            schemas_to_markdown(&[orders], &["refunds".to_string()]),
            "Table `orders`:\n- id (integer)\n- total (numeric)\n\nUnknown tables: refunds"
        );
    }
}
