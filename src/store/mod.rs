use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::error::IntakeError;

/// Append-only tabular sink for submitted records. Rows are never updated or
/// deleted; concurrent writers rely on the backing medium's own serialization.
pub trait SheetStore: Send + Sync {
    fn is_empty(&self) -> Result<bool, IntakeError>;

    fn append_row(&self, cells: &[String]) -> Result<(), IntakeError>;

    /// Where an operator can view the accumulated rows; used in the
    /// notification body.
    fn location(&self) -> String;
}

/// One CSV file per form variant, created on first append.
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: PathBuf) -> Result<Self, IntakeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }
}

impl SheetStore for CsvFileStore {
    fn is_empty(&self) -> Result<bool, IntakeError> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    fn append_row(&self, cells: &[String]) -> Result<(), IntakeError> {
        let line = cells.iter().map(|c| quote_cell(c)).collect::<Vec<_>>().join(",");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn quote_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// In-memory sheet, used by tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().expect("sheet lock poisoned").clone()
    }
}

impl SheetStore for MemoryStore {
    fn is_empty(&self) -> Result<bool, IntakeError> {
        Ok(self.rows.lock().expect("sheet lock poisoned").is_empty())
    }

    fn append_row(&self, cells: &[String]) -> Result<(), IntakeError> {
        self.rows
            .lock()
            .expect("sheet lock poisoned")
            .push(cells.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "(in-memory sheet)".to_string()
    }
}

/// Server-assigned id attached to every intake's log lines.
pub fn generate_submission_id() -> String {
    format!(
        "{}_{}",
        Utc::now().format("%Y%m%d"),
        &Uuid::new_v4().to_string()[..8]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn csv_store_starts_empty_and_accumulates_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvFileStore::new(dir.path().join("inquiries.csv")).unwrap();

        assert!(store.is_empty().unwrap());
        store.append_row(&row(&["Timestamp", "Name"])).unwrap();
        assert!(!store.is_empty().unwrap());
        store.append_row(&row(&["2025-01-01 00:00:00", "Jane"])).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("inquiries.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["Timestamp,Name", "2025-01-01 00:00:00,Jane"]);
    }

    #[test]
    fn csv_store_quotes_awkward_cells() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvFileStore::new(dir.path().join("sheet.csv")).unwrap();

        store
            .append_row(&row(&["plain", "has, comma", "has \"quotes\"", "two\nlines"]))
            .unwrap();

        let contents = std::fs::read_to_string(dir.path().join("sheet.csv")).unwrap();
        assert_eq!(
            contents,
            "plain,\"has, comma\",\"has \"\"quotes\"\"\",\"two\nlines\"\n"
        );
    }

    #[test]
    fn csv_store_creates_missing_data_folder() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("sheets").join("x.csv");
        let store = CsvFileStore::new(nested.clone()).unwrap();
        store.append_row(&row(&["a"])).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn submission_ids_are_distinct() {
        assert_ne!(generate_submission_id(), generate_submission_id());
    }
}
