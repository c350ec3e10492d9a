//! Positional reconciliation of devices with cookie files

use crate::config::Config;
use crate::cookies::list_cookie_files;
use crate::device::{Device, DeviceSource};
use crate::error::Result;
use crate::username::infer_username;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column layout of the reconciled table: model, serial, username, cookie
/// filename. Fixed contract with the display layer; the order must not
/// change.
pub const COLUMNS: [&str; 4] = ["Model", "Serial", "Username", "Cookie File"];

/// Counts from one refresh pass, for the caller's status line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSummary {
    /// Devices enumerated
    pub devices: usize,
    /// Cookie files listed
    pub cookie_files: usize,
    /// Rows written to the data file
    pub rows: usize,
}

/// Pair devices with cookie files by list position.
///
/// Produces `max(devices, cookie_files)` rows; row `i` takes device `i`
/// and cookie file `i`, with empty fields past the end of the shorter
/// list. The username is inferred from the cookie filename when one is
/// present.
///
/// This is not a keyed join: reordering either input changes every
/// pairing. Callers wanting stable pairings across refreshes must impose
/// their own order on both lists first. Never errors.
pub fn reconcile(devices: &[Device], cookie_files: &[String]) -> Vec<Vec<String>> {
    let count = devices.len().max(cookie_files.len());
    let mut rows = Vec::with_capacity(count);

    for i in 0..count {
        let (model, serial) = match devices.get(i) {
            Some(d) => (d.model.clone(), d.serial.clone()),
            None => (String::new(), String::new()),
        };

        let cookie_file = cookie_files.get(i).cloned().unwrap_or_default();
        let username = if cookie_file.is_empty() {
            String::new()
        } else {
            infer_username(&cookie_file)
        };

        rows.push(vec![model, serial, username, cookie_file]);
    }

    rows
}

/// Enumerate devices and cookie files, reconcile them, and overwrite the
/// configured data file with the result.
pub fn refresh(source: &dyn DeviceSource, config: &Config) -> Result<RefreshSummary> {
    let devices = source.list_devices();
    let cookie_files = list_cookie_files(&config.cookies_dir);
    let rows = reconcile(&devices, &cookie_files);

    config.store().write_all(&rows)?;

    debug!(
        devices = devices.len(),
        cookies = cookie_files.len(),
        path = %config.data_path.display(),
        "refreshed data file"
    );

    Ok(RefreshSummary {
        devices: devices.len(),
        cookie_files: cookie_files.len(),
        rows: rows.len(),
    })
}
