//! Configuration schema for otacheck
//!
//! Configuration is stored at `~/.config/otacheck/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Device property and metadata sources
    pub device: DeviceConfig,

    /// Subprocess execution settings
    pub command: CommandConfig,

    /// Download destination settings
    pub download: DownloadConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Where the installed build identity comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// ROM OTA metadata file; its presence enables ROM lookups
    pub rom_metadata_path: PathBuf,

    /// Kernel OTA metadata file; its presence enables kernel lookups
    pub kernel_metadata_path: PathBuf,

    /// Command used to query a device property (property name is appended)
    pub property_command: String,

    /// Command used to read a metadata file (path is appended); the file
    /// must still exist locally for the source to count as present
    pub read_file_command: String,

    /// Command that prints the running kernel release
    pub uname_command: String,

    /// Firmware version properties, tried in order, first non-empty wins
    pub version_properties: Vec<String>,

    /// Platform display string used when no version property is set
    pub display_property: String,

    /// Property holding the SD card path as seen by the OS
    pub sd_path_os_property: String,

    /// Property holding the SD card path as seen by recovery
    pub sd_path_recovery_property: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            rom_metadata_path: PathBuf::from("/system/rom.ota.prop"),
            kernel_metadata_path: PathBuf::from("/system/kernel.ota.prop"),
            property_command: "getprop".to_string(),
            read_file_command: "cat".to_string(),
            uname_command: "uname -r -v".to_string(),
            version_properties: vec![
                "ro.modversion".to_string(),
                "ro.cm.version".to_string(),
                "ro.aokp.version".to_string(),
            ],
            display_property: "ro.build.display.id".to_string(),
            sd_path_os_property: "ro.ota.sdcard.os".to_string(),
            sd_path_recovery_property: "ro.ota.sdcard.recovery".to_string(),
        }
    }
}

/// Subprocess execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Interpreter used to run command lines (`<shell> -c <line>`)
    pub shell: String,

    /// Per-command timeout in seconds (unset = wait indefinitely)
    pub timeout_secs: Option<u64>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
            timeout_secs: None,
        }
    }
}

/// Download destination settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Root directory for downloads (default: the user download directory)
    pub directory: Option<PathBuf>,
}
