//! Check command - decide whether metadata describes a newer build

use crate::cli::args::CheckArgs;
use crate::config::Config;
use crate::device::{BuildIdentity, IdentityCache, UpdateKind};
use crate::error::{OtaError, OtaResult};
use crate::sink::{
    verify_download, ConsoleNotifier, DownloadSink, HttpDownloader, NotificationSink,
};
use crate::update::UpdateInfo;
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::info;

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    kind: String,
    update_available: bool,
    installed: &'a BuildIdentity,
    candidate: &'a UpdateInfo,
}

/// Execute the check command
pub async fn execute(args: CheckArgs, config: &Config, cache: &IdentityCache) -> OtaResult<()> {
    let kind = UpdateKind::from(args.target);
    let text = read_metadata(&args.metadata).await?;
    let candidate = UpdateInfo::from_json(&text)?;

    let available = cache
        .is_update_available(kind, Some(candidate.identity()))
        .await;
    info!("{} update available: {}", kind, available);

    if args.json {
        let installed = cache.installed_identity(kind).await;
        let report = CheckReport {
            kind: kind.to_string(),
            update_available: available,
            installed: &installed,
            candidate: &candidate,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        ConsoleNotifier.notify(kind, available, &candidate);
    }

    if available && args.download {
        let downloader = HttpDownloader::from_config(&config.download)?;
        let path = deliver(&downloader, &candidate).await?;
        if !args.json {
            println!(
                "{} Saved to {}",
                style("[OK]").green(),
                style(path.display()).dim()
            );
        }
    }

    Ok(())
}

/// Hand the candidate to a download sink and verify the result
pub async fn deliver(sink: &dyn DownloadSink, candidate: &UpdateInfo) -> OtaResult<PathBuf> {
    let url = candidate.url.as_deref().ok_or(OtaError::MissingUrl)?;
    let path = sink.enqueue(&candidate.label(), url).await?;

    if let Some(ref expected) = candidate.md5 {
        verify_download(&path, expected)?;
    }
    Ok(path)
}

async fn read_metadata(source: &Path) -> OtaResult<String> {
    if source == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|e| OtaError::io("reading metadata from stdin", e))?;
        return Ok(text);
    }

    tokio::fs::read_to_string(source)
        .await
        .map_err(|e| OtaError::io(format!("reading metadata from {}", source.display()), e))
}
