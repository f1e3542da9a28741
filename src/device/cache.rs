//! Fill-once cache of the installed build state
//!
//! Each field is read from the device on first access and then held for the
//! life of the cache. Only successful reads are stored: an absent result is
//! returned to the caller but the next access tries again. Once a field is
//! set it never changes, even if the device state does.
//!
//! Every field has its own [`OnceCell`], so concurrent first accesses run a
//! single read and all callers observe the same value.

use super::identity::{BuildIdentity, MetadataOutcome};
use super::props::{PropertyReader, DEFAULT_SD_PATH};
use super::{SdCardKind, UpdateKind};
use crate::config::Config;
use crate::exec::{CommandExecutor, ShellExecutor};
use crate::update;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Installed ROM/kernel state, read lazily from the device
pub struct IdentityCache {
    reader: PropertyReader,
    rom: OnceCell<BuildIdentity>,
    kernel: OnceCell<BuildIdentity>,
    rom_version_label: OnceCell<String>,
    kernel_uname: OnceCell<String>,
    os_sd_path: OnceCell<String>,
    recovery_sd_path: OnceCell<String>,
}

impl IdentityCache {
    pub fn new(reader: PropertyReader) -> Self {
        Self {
            reader,
            rom: OnceCell::new(),
            kernel: OnceCell::new(),
            rom_version_label: OnceCell::new(),
            kernel_uname: OnceCell::new(),
            os_sd_path: OnceCell::new(),
            recovery_sd_path: OnceCell::new(),
        }
    }

    /// Cache backed by a shell executor configured from `config`
    pub fn from_config(config: &Config) -> Self {
        let executor: Arc<dyn CommandExecutor> =
            Arc::new(ShellExecutor::from_config(&config.command));
        Self::new(PropertyReader::new(executor, config.device.clone()))
    }

    pub fn reader(&self) -> &PropertyReader {
        &self.reader
    }

    /// Whether the metadata file for `kind` exists
    ///
    /// Always checked on the local filesystem, whatever `read_file_command`
    /// is configured to run.
    pub async fn is_source_present(&self, kind: UpdateKind) -> bool {
        tokio::fs::try_exists(self.reader.metadata_path(kind))
            .await
            .unwrap_or(false)
    }

    /// Installed identity for `kind`; all-absent when unknown
    pub async fn installed_identity(&self, kind: UpdateKind) -> BuildIdentity {
        let cell = match kind {
            UpdateKind::Rom => &self.rom,
            UpdateKind::Kernel => &self.kernel,
        };
        if let Some(identity) = cell.get() {
            return identity.clone();
        }
        if !self.is_source_present(kind).await {
            debug!("{} metadata source not present", kind);
            return BuildIdentity::absent();
        }

        let path = self.reader.metadata_path(kind);
        let filled = cell
            .get_or_try_init(|| async {
                match self.reader.read_metadata_file(path).await {
                    MetadataOutcome::Parsed(identity) => {
                        debug!("Cached installed {} identity: {}", kind, identity);
                        Ok(identity)
                    }
                    MetadataOutcome::Absent(reason) => Err(reason),
                }
            })
            .await;

        match filled {
            Ok(identity) => identity.clone(),
            Err(reason) => {
                debug!("Installed {} identity unavailable: {}", kind, reason);
                BuildIdentity::absent()
            }
        }
    }

    pub async fn rom_identity(&self) -> BuildIdentity {
        self.installed_identity(UpdateKind::Rom).await
    }

    pub async fn kernel_identity(&self) -> BuildIdentity {
        self.installed_identity(UpdateKind::Kernel).await
    }

    /// Human-readable firmware version (may differ from the ROM identity's version)
    pub async fn rom_version_label(&self) -> String {
        fill(&self.rom_version_label, || async {
            let label = self.reader.resolve_version_label().await;
            (!label.is_empty()).then_some(label)
        })
        .await
        .unwrap_or_default()
    }

    pub async fn kernel_uname(&self) -> Option<String> {
        fill(&self.kernel_uname, || self.reader.resolve_kernel_uname()).await
    }

    /// SD card path for `kind`, `"sdcard"` when the device does not say
    pub async fn sd_card_path(&self, kind: SdCardKind) -> String {
        let cell = match kind {
            SdCardKind::Os => &self.os_sd_path,
            SdCardKind::Recovery => &self.recovery_sd_path,
        };
        fill(cell, || self.reader.lookup_sd_card_path(kind))
            .await
            .unwrap_or_else(|| DEFAULT_SD_PATH.to_string())
    }

    /// Compare `candidate` against the installed identity of `kind`
    pub async fn is_update_available(
        &self,
        kind: UpdateKind,
        candidate: Option<&BuildIdentity>,
    ) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        let installed = self.installed_identity(kind).await;
        update::is_update_available(Some(candidate), Some(&installed))
    }
}

async fn fill<F, Fut>(cell: &OnceCell<String>, read: F) -> Option<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Option<String>>,
{
    cell.get_or_try_init(|| async { read().await.ok_or(()) })
        .await
        .ok()
        .cloned()
}
