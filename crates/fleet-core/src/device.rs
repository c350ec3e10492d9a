//! Device enumeration through the adb bridge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::process::Command;
use tracing::warn;

/// Model reported for a device line that carries no `model:` token
pub const UNKNOWN_MODEL: &str = "UNKNOWN";

/// A connected device as reported by one enumeration pass.
///
/// Ephemeral: rebuilt on every enumeration, never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Serial string, unique within one enumeration
    pub serial: String,
    /// Reported model, or [`UNKNOWN_MODEL`]
    pub model: String,
}

/// Source of attached devices.
///
/// Behind a trait so reconciliation can run against a fixed list in tests,
/// with no hardware or external tool present.
pub trait DeviceSource {
    /// Attached, authorized devices in enumeration order.
    ///
    /// Enumeration is never fatal: any failure is reported to the log and
    /// surfaces as an empty list.
    fn list_devices(&self) -> Vec<Device>;
}

/// Real device source backed by `adb devices -l`
#[derive(Debug, Clone, Copy, Default)]
pub struct AdbSource;

impl DeviceSource for AdbSource {
    fn list_devices(&self) -> Vec<Device> {
        match query_adb() {
            Ok(listing) => parse_device_listing(&listing),
            Err(e) => {
                warn!("device enumeration failed: {e}");
                Vec::new()
            }
        }
    }
}

fn query_adb() -> Result<String> {
    let output = Command::new("adb")
        .args(["devices", "-l"])
        .output()
        .map_err(|e| Error::ToolInvocation(format!("failed to run adb: {e}")))?;

    if !output.status.success() {
        return Err(Error::ToolInvocation(format!(
            "adb exited with {}",
            output.status
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| Error::ToolInvocation("adb produced non-UTF-8 output".to_string()))
}

/// Parse the line-oriented output of `adb devices -l`.
///
/// A line counts as a device only when its second whitespace-separated
/// token is exactly `device`; `offline`, `unauthorized` and the banner line
/// all fail that check. The serial is the first token, the model comes from
/// an optional later `model:<value>` token. A malformed line never fails
/// the enumeration; it is skipped.
pub fn parse_device_listing(listing: &str) -> Vec<Device> {
    let mut devices = Vec::new();

    for line in listing.lines() {
        let mut tokens = line.split_whitespace();

        let Some(serial) = tokens.next() else {
            continue;
        };
        if tokens.next() != Some("device") {
            continue;
        }

        let model = tokens
            .find_map(|t| t.strip_prefix("model:"))
            .unwrap_or(UNKNOWN_MODEL)
            .to_string();

        devices.push(Device {
            serial: serial.to_string(),
            model,
        });
    }

    devices
}
