//! Collaborators that act on an update decision
//!
//! - [`DownloadSink`]: fetches an update artifact given a label and a URL
//! - [`NotificationSink`]: tells the user what the check found

use crate::config::schema::DownloadConfig;
use crate::device::UpdateKind;
use crate::error::{OtaError, OtaResult};
use crate::hash;
use crate::update::UpdateInfo;
use async_trait::async_trait;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Downloads land under this directory, relative to the download root
pub const DOWNLOAD_SUBDIR: &str = "OTA-Updater/download";

/// Accepts a label and a URL and places the artifact on disk
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Fetch `url` and return where the file was written
    async fn enqueue(&self, label: &str, url: &str) -> OtaResult<PathBuf>;
}

/// Renders the outcome of an update check
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: UpdateKind, available: bool, candidate: &UpdateInfo);
}

/// HTTP downloader writing to `<root>/OTA-Updater/download/<label>.zip`
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    root: PathBuf,
    show_progress: bool,
}

impl HttpDownloader {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            show_progress: console::user_attended_stderr(),
        }
    }

    /// Use the configured directory, else the user's download directory
    pub fn from_config(config: &DownloadConfig) -> OtaResult<Self> {
        config
            .directory
            .clone()
            .or_else(dirs::download_dir)
            .map(Self::new)
            .ok_or(OtaError::NoDownloadDir)
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Where an artifact with this label will be written
    pub fn destination(&self, label: &str) -> PathBuf {
        self.root
            .join(DOWNLOAD_SUBDIR)
            .join(format!("{}.zip", sanitize_label(label)))
    }
}

#[async_trait]
impl DownloadSink for HttpDownloader {
    async fn enqueue(&self, label: &str, url: &str) -> OtaResult<PathBuf> {
        let dest = self.destination(label);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OtaError::io(format!("creating {}", parent.display()), e))?;
        }

        info!("Downloading {} to {}", url, dest.display());
        let url_owned = url.to_string();
        let dest_owned = dest.clone();
        let show_progress = self.show_progress;
        let bytes = tokio::task::spawn_blocking(move || {
            fetch_to_file(&url_owned, &dest_owned, show_progress)
        })
        .await
        .map_err(|e| OtaError::Internal(format!("download task failed: {}", e)))??;

        debug!("Downloaded {} bytes", bytes);
        Ok(dest)
    }
}

/// Stream `url` into `dest` through a `.part` file
fn fetch_to_file(url: &str, dest: &Path, show_progress: bool) -> OtaResult<u64> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| OtaError::download(url, e))?;

    let total = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let bar = progress_bar(total, show_progress);
    let mut reader = bar.wrap_read(response.into_body().into_reader());

    let partial = dest.with_extension("zip.part");
    let mut file = File::create(&partial)
        .map_err(|e| OtaError::io(format!("creating {}", partial.display()), e))?;

    let bytes = match io::copy(&mut reader, &mut file) {
        Ok(bytes) => bytes,
        Err(e) => {
            bar.abandon();
            let _ = std::fs::remove_file(&partial);
            return Err(OtaError::download(url, e));
        }
    };
    bar.finish_and_clear();

    promote_partial(&partial, dest)?;
    Ok(bytes)
}

/// Move a finished `.part` file into place, removing it if that fails
fn promote_partial(partial: &Path, dest: &Path) -> OtaResult<()> {
    std::fs::rename(partial, dest).map_err(|e| {
        let _ = std::fs::remove_file(partial);
        OtaError::io(format!("moving download to {}", dest.display()), e)
    })
}

fn progress_bar(total: Option<u64>, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    match total {
        Some(len) => {
            let bar = ProgressBar::new(len);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.cyan} {bar:30.cyan/dim} {bytes}/{total_bytes} {eta:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {bytes} downloaded")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    }
}

/// Keep labels usable as a single file name component
fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match cleaned.trim_matches('.') {
        "" => "update".to_string(),
        _ => cleaned,
    }
}

/// Check a downloaded file against the digest advertised by the metadata
pub fn verify_download(path: &Path, expected_md5: &str) -> OtaResult<()> {
    let actual = hash::hash_file(path);
    if !actual.is_empty() && actual.eq_ignore_ascii_case(expected_md5.trim()) {
        debug!("Checksum verified for {}", path.display());
        return Ok(());
    }
    Err(OtaError::ChecksumMismatch {
        path: path.to_path_buf(),
        expected: expected_md5.trim().to_lowercase(),
        actual: if actual.is_empty() {
            "unavailable".to_string()
        } else {
            actual
        },
    })
}

/// Prints check results to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, kind: UpdateKind, available: bool, candidate: &UpdateInfo) {
        println!("{}", render_notice(kind, available, candidate));
        if available {
            if let Some(ref changelog) = candidate.changelog {
                println!("  {} {}", style("Changelog:").dim(), changelog);
            }
        }
    }
}

fn render_notice(kind: UpdateKind, available: bool, candidate: &UpdateInfo) -> String {
    let subject = match kind {
        UpdateKind::Rom => "ROM",
        UpdateKind::Kernel => "Kernel",
    };
    if available {
        format!(
            "{} {} update available: {} ({})",
            style("[UPDATE]").green().bold(),
            subject,
            candidate.label(),
            candidate.identity()
        )
    } else {
        format!("{} {} is up to date", style("[OK]").green(), subject)
    }
}
