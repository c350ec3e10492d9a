//! Delimited-table persistence with partial read/write operations
//!
//! This module provides:
//! - Whole-table read/write over a headerless delimited text file
//! - Partial operations (row, column, cell) that grow the table with
//!   empty-string padding instead of erroring on short data
//! - Byte-order-mark handling for round-trip fidelity with files written
//!   by `utf-8-sig` tooling

use crate::error::{Error, Result};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const BOM: &[u8] = b"\xef\xbb\xbf";

/// A table file handle: path plus delimiter.
///
/// Stateless accessor. Every operation re-reads the backing file and every
/// mutating operation rewrites it whole; nothing is cached between calls.
/// No locking governs the file, so interleaved writers from independent
/// processes end in last-writer-wins.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    delimiter: u8,
}

impl CsvStore {
    /// Create a store over `path` with the default comma delimiter
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_delimiter(path, b',')
    }

    /// Create a store over `path` with an explicit delimiter byte
    pub fn with_delimiter(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full table.
    ///
    /// Fails with [`Error::NotFound`] if the backing file does not exist;
    /// this is the only operation for which a missing file is an error.
    pub fn read_all(&self) -> Result<Vec<Vec<String>>> {
        if !self.path.exists() {
            return Err(Error::NotFound(self.path.clone()));
        }

        let bytes = fs::read(&self.path).map_err(|e| Error::FileRead {
            path: self.path.clone(),
            source: e,
        })?;
        let content = bytes.strip_prefix(BOM).unwrap_or(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // Allow varying number of fields
            .delimiter(self.delimiter)
            .from_reader(content);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::Csv {
                path: self.path.clone(),
                source: e,
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(path = %self.path.display(), rows = rows.len(), "read table");
        Ok(rows)
    }

    /// Overwrite the backing file with exactly the given rows, in order.
    ///
    /// No padding or validation is applied. The one representation caveat:
    /// a row with zero fields is written as a single empty field, since the
    /// delimited format cannot express a zero-field record.
    pub fn write_all<T: Display>(&self, rows: &[Vec<T>]) -> Result<()> {
        let mut file = File::create(&self.path).map_err(|e| Error::FileWrite {
            path: self.path.clone(),
            source: e,
        })?;
        file.write_all(BOM).map_err(|e| Error::FileWrite {
            path: self.path.clone(),
            source: e,
        })?;

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .delimiter(self.delimiter)
            .from_writer(file);

        for row in rows {
            if row.is_empty() {
                writer.write_record([""]).map_err(|e| Error::Csv {
                    path: self.path.clone(),
                    source: e,
                })?;
            } else {
                let fields: Vec<String> = row.iter().map(ToString::to_string).collect();
                writer.write_record(&fields).map_err(|e| Error::Csv {
                    path: self.path.clone(),
                    source: e,
                })?;
            }
        }

        writer.flush().map_err(|e| Error::FileWrite {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), rows = rows.len(), "wrote table");
        Ok(())
    }

    /// Read row `index`, or `None` if it is out of range.
    ///
    /// A missing backing file reads as an empty table, so this never fails
    /// with [`Error::NotFound`].
    pub fn read_row(&self, index: usize) -> Result<Option<Vec<String>>> {
        let mut rows = self.read_or_empty()?;
        if index < rows.len() {
            Ok(Some(rows.swap_remove(index)))
        } else {
            Ok(None)
        }
    }

    /// Overwrite row `index` with `row_data`.
    ///
    /// The table grows with empty rows until row `index` exists, and the
    /// row grows with empty cells until it holds `row_data.len()` fields.
    /// Cells past `row_data.len()` are left untouched.
    pub fn write_row<T: Display>(&self, index: usize, row_data: &[T]) -> Result<()> {
        let mut rows = self.read_or_empty()?;

        while rows.len() <= index {
            rows.push(Vec::new());
        }

        let row = &mut rows[index];
        while row.len() < row_data.len() {
            row.push(String::new());
        }
        for (i, value) in row_data.iter().enumerate() {
            row[i] = value.to_string();
        }

        self.write_all(&rows)
    }

    /// Read column `index`: one value per row, with empty string substituted
    /// for rows shorter than `index + 1`. Returns `None` for an empty table.
    pub fn read_column(&self, index: usize) -> Result<Option<Vec<String>>> {
        let rows = self.read_or_empty()?;
        if rows.is_empty() {
            return Ok(None);
        }

        let column = rows
            .into_iter()
            .map(|mut row| {
                if index < row.len() {
                    row.swap_remove(index)
                } else {
                    String::new()
                }
            })
            .collect();

        Ok(Some(column))
    }

    /// Overwrite column `index` with `col_data`.
    ///
    /// The table grows to at least `col_data.len()` rows, and each touched
    /// row grows to at least `index + 1` cells. Rows past `col_data.len()`
    /// keep their existing value in the column.
    pub fn write_column<T: Display>(&self, index: usize, col_data: &[T]) -> Result<()> {
        let mut rows = self.read_or_empty()?;

        while rows.len() < col_data.len() {
            rows.push(Vec::new());
        }

        for (i, value) in col_data.iter().enumerate() {
            let row = &mut rows[i];
            while row.len() <= index {
                row.push(String::new());
            }
            row[index] = value.to_string();
        }

        self.write_all(&rows)
    }

    /// Append one row of stringified values
    pub fn append_row<T: Display>(&self, row_data: &[T]) -> Result<()> {
        let mut rows = self.read_or_empty()?;
        rows.push(row_data.iter().map(ToString::to_string).collect());
        self.write_all(&rows)
    }

    /// Set cell `(row, col)`, growing the table to `row + 1` rows and the
    /// row to `col + 1` cells as needed. Newly created cells are empty.
    pub fn update_cell<T: Display>(&self, row: usize, col: usize, value: T) -> Result<()> {
        let mut rows = self.read_or_empty()?;

        while rows.len() <= row {
            rows.push(Vec::new());
        }
        let target = &mut rows[row];
        while target.len() <= col {
            target.push(String::new());
        }
        target[col] = value.to_string();

        self.write_all(&rows)
    }

    /// Get cell `(row, col)`, or `None` if the row does not exist or has
    /// fewer than `col + 1` cells
    pub fn get_cell(&self, row: usize, col: usize) -> Result<Option<String>> {
        let row = self.read_row(row)?;
        Ok(row.and_then(|mut r| {
            if col < r.len() {
                Some(r.swap_remove(col))
            } else {
                None
            }
        }))
    }

    /// Table dimensions as `(rows, max cells across rows)`; `(0, 0)` for an
    /// empty or nonexistent table
    pub fn shape(&self) -> Result<(usize, usize)> {
        let rows = self.read_or_empty()?;
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        Ok((rows.len(), cols))
    }

    /// Current rows, with a missing file treated as an empty table.
    /// Partial operations start from here so a first write implicitly
    /// creates the file.
    fn read_or_empty(&self) -> Result<Vec<Vec<String>>> {
        match self.read_all() {
            Ok(rows) => Ok(rows),
            Err(Error::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_round_trip_irregular_rows() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));

        let table = rows(&[
            &["Pixel", "S1", "alice", "alice_cookie.txt"],
            &["UNKNOWN", "S2"],
            &["one"],
        ]);
        store.write_all(&table).unwrap();

        assert_eq!(store.read_all().unwrap(), table);
    }

    #[test]
    fn test_round_trip_quoted_values() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));

        let table = rows(&[&["has,comma", "has\"quote", "plain"]]);
        store.write_all(&table).unwrap();

        assert_eq!(store.read_all().unwrap(), table);
    }

    #[test]
    fn test_read_all_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("absent.csv"));

        match store.read_all() {
            Err(Error::NotFound(path)) => assert_eq!(path, dir.path().join("absent.csv")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_write_emits_bom_and_read_strips_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let store = CsvStore::new(&path);

        store.write_all(&rows(&[&["a", "b"]])).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\xef\xbb\xbf"));
        assert_eq!(store.read_all().unwrap(), rows(&[&["a", "b"]]));
    }

    #[test]
    fn test_read_tolerates_file_without_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b\nc,d\n").unwrap();

        let store = CsvStore::new(&path);
        assert_eq!(store.read_all().unwrap(), rows(&[&["a", "b"], &["c", "d"]]));
    }

    #[test]
    fn test_read_row_out_of_range_is_none() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));
        store.write_all(&rows(&[&["a"]])).unwrap();

        assert_eq!(store.read_row(0).unwrap(), Some(vec!["a".to_string()]));
        assert_eq!(store.read_row(5).unwrap(), None);
    }

    #[test]
    fn test_read_row_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("absent.csv"));
        assert_eq!(store.read_row(0).unwrap(), None);
    }

    #[test]
    fn test_write_row_grows_table_and_row() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));

        store.write_row(2, &["x", "y"]).unwrap();

        let (row_count, _) = store.shape().unwrap();
        assert_eq!(row_count, 3);
        assert_eq!(
            store.read_row(2).unwrap(),
            Some(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn test_write_row_keeps_longer_existing_row_tail() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));
        store.write_all(&rows(&[&["a", "b", "c", "d"]])).unwrap();

        store.write_row(0, &["X", "Y"]).unwrap();

        assert_eq!(
            store.read_row(0).unwrap(),
            Some(vec![
                "X".to_string(),
                "Y".to_string(),
                "c".to_string(),
                "d".to_string()
            ])
        );
    }

    #[test]
    fn test_read_column_pads_short_rows() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));
        store
            .write_all(&rows(&[&["a", "b"], &["c"], &["d", "e", "f"]]))
            .unwrap();

        assert_eq!(
            store.read_column(1).unwrap(),
            Some(vec!["b".to_string(), String::new(), "e".to_string()])
        );
    }

    #[test]
    fn test_read_column_empty_table_is_none() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("absent.csv"));
        assert_eq!(store.read_column(0).unwrap(), None);
    }

    #[test]
    fn test_write_column_grows_ragged_table() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));
        store.write_all(&rows(&[&["a"]])).unwrap();

        store.write_column(2, &["1", "2", "3"]).unwrap();

        assert_eq!(
            store.read_column(2).unwrap(),
            Some(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        );
        // Row 0 kept its original first cell, padded in between
        assert_eq!(
            store.read_row(0).unwrap(),
            Some(vec!["a".to_string(), String::new(), "1".to_string()])
        );
    }

    #[test]
    fn test_append_row() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));
        store.write_all(&rows(&[&["a"]])).unwrap();

        store.append_row(&["b", "c"]).unwrap();

        assert_eq!(store.shape().unwrap(), (2, 2));
        assert_eq!(
            store.read_row(1).unwrap(),
            Some(vec!["b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_update_cell_creates_file_and_pads() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("fresh.csv"));

        store.update_cell(0, 2, "v").unwrap();

        assert_eq!(store.get_cell(0, 2).unwrap(), Some("v".to_string()));
        assert_eq!(store.get_cell(0, 0).unwrap(), Some(String::new()));
        assert_eq!(store.shape().unwrap(), (1, 3));
    }

    #[test]
    fn test_update_cell_stringifies_value() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));

        store.update_cell(0, 0, 42).unwrap();

        assert_eq!(store.get_cell(0, 0).unwrap(), Some("42".to_string()));
    }

    #[test]
    fn test_get_cell_short_row_is_none() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));
        store.write_all(&rows(&[&["a"]])).unwrap();

        assert_eq!(store.get_cell(0, 3).unwrap(), None);
        assert_eq!(store.get_cell(7, 0).unwrap(), None);
    }

    #[test]
    fn test_shape_tracks_max_columns() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));

        assert_eq!(store.shape().unwrap(), (0, 0));

        store
            .write_all(&rows(&[&["a"], &["b", "c", "d"], &["e", "f"]]))
            .unwrap();
        assert_eq!(store.shape().unwrap(), (3, 3));
    }

    #[test]
    fn test_custom_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.tsv");
        let store = CsvStore::with_delimiter(&path, b';');

        let table = rows(&[&["a", "b"], &["c", "d"]]);
        store.write_all(&table).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("a;b"));
        assert_eq!(store.read_all().unwrap(), table);
    }

    #[test]
    fn test_last_writer_wins_between_handles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let first = CsvStore::new(&path);
        let second = CsvStore::new(&path);

        first.write_all(&rows(&[&["first"]])).unwrap();
        second.write_all(&rows(&[&["second"]])).unwrap();

        assert_eq!(first.read_all().unwrap(), rows(&[&["second"]]));
    }
}
