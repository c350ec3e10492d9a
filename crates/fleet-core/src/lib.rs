//! fleet-core: reconciliation and tabular persistence for a cookie-loaded
//! device fleet
//!
//! This library provides functionality to:
//! - Enumerate attached devices through the adb bridge
//! - List imported cookie files in a designated directory
//! - Reconcile the two lists positionally into four-field rows
//! - Persist the result as delimited text with partial (row/column/cell)
//!   read and write operations

pub mod config;
pub mod cookies;
pub mod device;
pub mod error;
pub mod reconcile;
pub mod store;
pub mod username;

pub use config::Config;
pub use cookies::{import_cookies, list_cookie_files, COOKIE_EXTENSION};
pub use device::{parse_device_listing, AdbSource, Device, DeviceSource, UNKNOWN_MODEL};
pub use error::{Error, Result};
pub use reconcile::{reconcile, refresh, RefreshSummary, COLUMNS};
pub use store::CsvStore;
pub use username::infer_username;
