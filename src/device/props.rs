//! Device property and metadata file reader
//!
//! All lookups go through a [`CommandExecutor`] so the same code reads a
//! real device (`getprop`, `cat`) or a scripted one in tests.

use super::identity::{parse_metadata, AbsentReason, MetadataOutcome};
use super::{SdCardKind, UpdateKind};
use crate::config::schema::DeviceConfig;
use crate::exec::CommandExecutor;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// SD card path used when the device does not advertise one
pub const DEFAULT_SD_PATH: &str = "sdcard";

/// Reads installed-build information from the device
pub struct PropertyReader {
    executor: Arc<dyn CommandExecutor>,
    device: DeviceConfig,
}

impl PropertyReader {
    pub fn new(executor: Arc<dyn CommandExecutor>, device: DeviceConfig) -> Self {
        Self { executor, device }
    }

    /// Path of the metadata file describing the installed build of `kind`
    pub fn metadata_path(&self, kind: UpdateKind) -> &Path {
        match kind {
            UpdateKind::Rom => &self.device.rom_metadata_path,
            UpdateKind::Kernel => &self.device.kernel_metadata_path,
        }
    }

    /// Query a device property; empty string when unset or unavailable
    pub async fn read_device_property(&self, name: &str) -> String {
        let command = format!("{} {}", self.device.property_command, shell_quote(name));
        self.executor.run(&command).await.trimmed().to_string()
    }

    /// Read and parse a metadata file
    pub async fn read_metadata_file(&self, path: &Path) -> MetadataOutcome {
        let path_text = path.to_string_lossy();
        let command = format!(
            "{} {}",
            self.device.read_file_command,
            shell_quote(&path_text)
        );
        let result = self.executor.run(&command).await;
        if result.is_empty() {
            debug!("No metadata read from {}", path.display());
            return MetadataOutcome::Absent(AbsentReason::NoOutput);
        }

        let outcome = parse_metadata(&result.stdout);
        if outcome == MetadataOutcome::Absent(AbsentReason::Malformed) {
            warn!("Error in metadata file {}", path.display());
        }
        outcome
    }

    /// Firmware version label: first non-empty of the configured version
    /// properties, then the platform display string
    pub async fn resolve_version_label(&self) -> String {
        let sources = self
            .device
            .version_properties
            .iter()
            .chain(std::iter::once(&self.device.display_property));

        for name in sources {
            let value = self.read_device_property(name).await;
            if !value.is_empty() {
                debug!("Version label from {}: {}", name, value);
                return value;
            }
        }
        String::new()
    }

    /// Running kernel release, `None` when the query prints nothing
    pub async fn resolve_kernel_uname(&self) -> Option<String> {
        let result = self.executor.run(&self.device.uname_command).await;
        if result.is_empty() {
            return None;
        }
        Some(result.trimmed().to_string())
    }

    /// SD card path advertised by the device, `None` when not set
    pub async fn lookup_sd_card_path(&self, kind: SdCardKind) -> Option<String> {
        let property = match kind {
            SdCardKind::Os => &self.device.sd_path_os_property,
            SdCardKind::Recovery => &self.device.sd_path_recovery_property,
        };
        let value = self.read_device_property(property).await;
        (!value.is_empty()).then_some(value)
    }

    /// SD card path, falling back to [`DEFAULT_SD_PATH`]
    pub async fn resolve_sd_card_path(&self, kind: SdCardKind) -> String {
        self.lookup_sd_card_path(kind)
            .await
            .unwrap_or_else(|| DEFAULT_SD_PATH.to_string())
    }
}

/// Quote an argument for `sh -c` unless it is made of safe characters
fn shell_quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._-/+:=,@%_".contains(c));
    if safe {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}
