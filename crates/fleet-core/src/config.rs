//! Explicit configuration for the core operations

use crate::store::CsvStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Paths and delimiter for one fleet.
///
/// Passed explicitly into the operations that need it; the core holds no
/// process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding imported cookie files
    pub cookies_dir: PathBuf,
    /// Backing file for the device/cookie table
    pub data_path: PathBuf,
    /// Field delimiter for the table file
    pub delimiter: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cookies_dir: PathBuf::from("cookies"),
            data_path: PathBuf::from("data.csv"),
            delimiter: b',',
        }
    }
}

impl Config {
    /// Store handle over the configured data file
    pub fn store(&self) -> CsvStore {
        CsvStore::with_delimiter(&self.data_path, self.delimiter)
    }
}
