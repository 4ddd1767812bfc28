use std::path::Path;

use uuid::Uuid;

use crate::error::{Result, TimelineError};
use crate::model::{TaskCollection, TaskDates};

/// Columns we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Start,
    End,
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "taskid" | "key" => Some(Column::Id),
        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Column::Name)
        }
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Column::End),
        _ => None,
    }
}

/// Import task date ranges from a CSV file.
///
/// Returns `(tasks, skipped_count)`.
pub fn import_csv(path: &Path) -> Result<(TaskCollection, usize)> {
    let content = std::fs::read_to_string(path).map_err(|e| TimelineError::io(path, e))?;
    let imported = parse_csv(&content)?;
    log::info!(
        "Imported {} tasks from {:?} ({} rows skipped)",
        imported.0.len(),
        path,
        imported.1
    );
    Ok(imported)
}

/// Parse CSV text into a task collection.
///
/// Auto-detects the delimiter and matches headers loosely. Tasks are keyed
/// by the id column, else the name column, else a fresh UUID. Date strings are
/// kept as written; unreadable ones are skipped later when the extent is
/// computed, so only rows with neither date are dropped here.
pub fn parse_csv(content: &str) -> Result<(TaskCollection, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |col: Column| col_map.contains(&Some(col));
    if !has(Column::Start) || !has(Column::End) {
        return Err(TimelineError::MissingColumns(
            headers.iter().map(str::to_string).collect(),
        ));
    }

    let mut tasks = TaskCollection::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping CSV row {}: {}", i + 2, e);
                skipped += 1;
                continue;
            }
        };

        let mut id = None;
        let mut name = None;
        let mut start = String::new();
        let mut end = String::new();
        for (field, col) in record.iter().zip(&col_map) {
            match col {
                Some(Column::Id) => id = Some(field.to_string()),
                Some(Column::Name) => name = Some(field.to_string()),
                Some(Column::Start) => start = field.to_string(),
                Some(Column::End) => end = field.to_string(),
                None => {}
            }
        }

        if start.is_empty() && end.is_empty() {
            log::warn!("Skipping CSV row {}: no dates", i + 2);
            skipped += 1;
            continue;
        }

        let key = id
            .into_iter()
            .chain(name)
            .find(|k| !k.is_empty() && !tasks.contains_key(k))
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        tasks.insert(key, TaskDates::new(start, end));
    }

    if tasks.is_empty() {
        return Err(TimelineError::Empty);
    }

    Ok((tasks, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_semicolon_file_with_loose_headers() {
        let csv = "Task Label;Start Date;End Date;Status\n\
                   Design;2024-01-05;2024-01-20;Done\n\
                   Build;01/02/2024;15/03/2024;Active\n";
        let (tasks, skipped) = parse_csv(csv).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(tasks["Design"], TaskDates::new("2024-01-05", "2024-01-20"));
        assert_eq!(tasks["Build"].start_date, "01/02/2024");
    }

    #[test]
    fn prefers_id_column_and_generates_missing_keys() {
        let csv = "id,name,start,end\n\
                   a1,Design,2024-01-05,2024-01-20\n\
                   ,,2024-02-01,2024-02-03\n";
        let (tasks, _) = parse_csv(csv).unwrap();
        assert!(tasks.contains_key("a1"));
        assert_eq!(tasks.len(), 2);
        let generated = tasks.keys().find(|k| k.as_str() != "a1").unwrap();
        assert!(Uuid::parse_str(generated).is_ok());
    }

    #[test]
    fn keeps_unparsable_dates_but_drops_dateless_rows() {
        let csv = "name,start,end\n\
                   Fuzzy,someday,2024-02-01\n\
                   Empty,,\n";
        let (tasks, skipped) = parse_csv(csv).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(tasks["Fuzzy"].start_date, "someday");
        assert!(tasks["Fuzzy"].start().is_none());
    }

    #[test]
    fn duplicate_names_do_not_overwrite() {
        let csv = "name,start,end\nReview,2024-01-01,2024-01-02\nReview,2024-03-01,2024-03-02\n";
        let (tasks, _) = parse_csv(csv).unwrap();
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn missing_date_columns_is_an_error() {
        let csv = "name,when\nDesign,2024-01-05\n";
        assert!(matches!(
            parse_csv(csv),
            Err(TimelineError::MissingColumns(_))
        ));
    }

    #[test]
    fn header_only_is_empty() {
        assert!(matches!(parse_csv("name,start,end\n"), Err(TimelineError::Empty)));
    }

    #[test]
    fn delimiter_detection() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter("a,b,c"), b',');
    }
}
