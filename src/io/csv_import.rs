use std::path::Path;

use chrono::NaiveDate;

use crate::error::{Result, TimelineError};
use crate::model::ScheduledItem;

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Client,
    Status,
    Start,
    End,
}

/// Map a header to a column, ignoring case, spaces, dashes and underscores.
fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "name" | "project" | "projectname" | "title" | "label" | "task" => Some(Column::Name),
        "client" | "clientname" | "customer" | "account" => Some(Column::Client),
        "status" | "state" | "stage" => Some(Column::Status),
        "start" | "startdate" | "from" | "begin" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "due" | "duedate" | "deadline" => Some(Column::End),
        _ => None,
    }
}

/// Result of a CSV import.
#[derive(Debug)]
pub struct CsvImport {
    pub items: Vec<ScheduledItem>,
    /// Rows dropped for having no name or failing to parse.
    pub skipped: usize,
}

/// Import items from CSV text.
///
/// The delimiter is detected from the header line. Only a name column is
/// required; dates that are missing or unparseable import as `None`, which
/// keeps the item off the timeline until it is fixed.
pub fn import_csv_str(content: &str) -> Result<CsvImport> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();
    if !columns.contains(&Some(Column::Name)) {
        return Err(TimelineError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut items = Vec::new();
    let mut skipped = 0usize;

    for (i, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(row = i + 2, error = %e, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let field = |wanted: Column| {
            columns
                .iter()
                .position(|c| *c == Some(wanted))
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let Some(name) = field(Column::Name) else {
            skipped += 1;
            continue;
        };

        let start = field(Column::Start).and_then(parse_date);
        let end = field(Column::End).and_then(parse_date);
        if start.is_none() || end.is_none() {
            tracing::debug!(row = i + 2, name, "row imported without a full date range");
        }

        items.push(ScheduledItem {
            id: uuid::Uuid::new_v4(),
            name: name.to_string(),
            client: field(Column::Client).map(str::to_string),
            status: field(Column::Status).unwrap_or_default().to_string(),
            start,
            end,
        });
    }

    Ok(CsvImport { items, skipped })
}

/// Import items from a CSV file.
pub fn import_csv(path: &Path) -> Result<CsvImport> {
    let content = std::fs::read_to_string(path).map_err(|e| TimelineError::io(path, e))?;
    import_csv_str(&content)
}
