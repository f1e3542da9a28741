//! Status command - show the installed build state

use crate::cli::args::StatusArgs;
use crate::device::{format_date, BuildIdentity, IdentityCache, SdCardKind, UpdateKind};
use crate::error::OtaResult;
use console::{style, Emoji};
use serde::Serialize;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static MISSING: Emoji<'_, '_> = Emoji("- ", "[--] ");

/// Everything the cache knows about the installed builds
#[derive(Debug, Serialize)]
struct StatusReport {
    rom_source_present: bool,
    kernel_source_present: bool,
    rom: BuildIdentity,
    kernel: BuildIdentity,
    rom_version_label: String,
    kernel_uname: Option<String>,
    os_sd_path: String,
    recovery_sd_path: String,
}

impl StatusReport {
    async fn collect(cache: &IdentityCache) -> Self {
        Self {
            rom_source_present: cache.is_source_present(UpdateKind::Rom).await,
            kernel_source_present: cache.is_source_present(UpdateKind::Kernel).await,
            rom: cache.rom_identity().await,
            kernel: cache.kernel_identity().await,
            rom_version_label: cache.rom_version_label().await,
            kernel_uname: cache.kernel_uname().await,
            os_sd_path: cache.sd_card_path(SdCardKind::Os).await,
            recovery_sd_path: cache.sd_card_path(SdCardKind::Recovery).await,
        }
    }
}

/// Execute the status command
pub async fn execute(args: StatusArgs, cache: &IdentityCache) -> OtaResult<()> {
    let report = StatusReport::collect(cache).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", style("Installed Builds").bold().cyan());

    println!();
    println!("{}", style("ROM:").bold());
    print_identity(report.rom_source_present, &report.rom, cache, UpdateKind::Rom);
    let label = report.rom_version_label.as_str();
    print_value("Version label", (!label.is_empty()).then_some(label));

    println!();
    println!("{}", style("Kernel:").bold());
    print_identity(
        report.kernel_source_present,
        &report.kernel,
        cache,
        UpdateKind::Kernel,
    );
    print_value("Uname", report.kernel_uname.as_deref());

    println!();
    println!("{}", style("Storage:").bold());
    print_value("OS SD card", Some(report.os_sd_path.as_str()));
    print_value("Recovery SD card", Some(report.recovery_sd_path.as_str()));

    Ok(())
}

fn print_identity(
    present: bool,
    identity: &BuildIdentity,
    cache: &IdentityCache,
    kind: UpdateKind,
) {
    if !present {
        println!(
            "  {} {} ({})",
            MISSING,
            style("No OTA metadata on device").yellow(),
            style(cache.reader().metadata_path(kind).display()).dim()
        );
        return;
    }
    print_value("ID", identity.id.as_deref());
    print_value("Version", identity.version.as_deref());
    print_value("Date", identity.date.map(format_date).as_deref());
}

fn print_value(label: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {} {}: {}", CHECK, label, v),
        None => println!("  {} {}: {}", MISSING, label, style("unknown").dim()),
    }
}
