//! Integration tests for otacheck

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn otacheck() -> Command {
        let mut cmd = cargo_bin_cmd!("otacheck");
        cmd.env_remove("OTACHECK_CONFIG").env_remove("RUST_LOG");
        cmd
    }

    /// Temp device: ROM metadata present, kernel metadata missing,
    /// properties unavailable
    struct Device {
        dir: TempDir,
    }

    impl Device {
        fn new(rom_metadata: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let rom = dir.path().join("rom.ota.prop");
            std::fs::write(&rom, rom_metadata).unwrap();
            let config = format!(
                r#"
[device]
rom_metadata_path = "{rom}"
kernel_metadata_path = "{kernel}"
property_command = "true"
uname_command = "true"
"#,
                rom = rom.display(),
                kernel = dir.path().join("kernel.ota.prop").display(),
            );
            std::fs::write(dir.path().join("config.toml"), config).unwrap();
            Self { dir }
        }

        fn config(&self) -> std::path::PathBuf {
            self.dir.path().join("config.toml")
        }

        fn candidate(&self, json: &str) -> std::path::PathBuf {
            let path = self.dir.path().join("candidate.json");
            std::fs::write(&path, json).unwrap();
            path
        }

        fn cmd(&self) -> Command {
            let mut cmd = otacheck();
            cmd.arg("--config").arg(self.config());
            cmd
        }
    }

    const INSTALLED: &str = r#"{"otaid":"rom","otaver":"1.0","otadate":"20230101-0930"}"#;

    #[test]
    fn help_displays() {
        otacheck()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("ROM and kernel update checker"));
    }

    #[test]
    fn version_displays() {
        otacheck()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("otacheck"));
    }

    #[test]
    fn hash_empty_string() {
        otacheck()
            .args(["hash", ""])
            .assert()
            .success()
            .stdout(predicate::str::contains("d41d8cd98f00b204e9800998ecf8427e"));
    }

    #[test]
    fn hash_missing_file_fails() {
        otacheck()
            .args(["hash", "--file", "/nonexistent/otacheck.zip"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("hashing"));
    }

    #[test]
    fn check_same_version_is_up_to_date() {
        let device = Device::new(INSTALLED);
        let candidate = device.candidate(r#"{"version":"1.0","date":"20230101-0930"}"#);

        device
            .cmd()
            .args(["check", "rom", "--metadata"])
            .arg(&candidate)
            .assert()
            .success()
            .stdout(predicate::str::contains("ROM is up to date"));
    }

    #[test]
    fn check_newer_date_is_update() {
        let device = Device::new(INSTALLED);
        let candidate = device.candidate(
            r#"{"name":"Nightly","version":"1.0","date":"20230101-0931"}"#,
        );

        device
            .cmd()
            .args(["check", "rom", "--json", "--metadata"])
            .arg(&candidate)
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""update_available": true"#))
            .stdout(predicate::str::contains(r#""date": "20230101-0930""#));
    }

    #[test]
    fn check_reads_stdin() {
        let device = Device::new(INSTALLED);

        device
            .cmd()
            .args(["check", "rom"])
            .write_stdin(r#"{"otaver":"A2"}"#)
            .assert()
            .success()
            .stdout(predicate::str::contains("ROM update available"));
    }

    #[test]
    fn check_kernel_without_metadata_reports_update() {
        let device = Device::new(INSTALLED);
        let candidate = device.candidate(r#"{"version":"3.4"}"#);

        device
            .cmd()
            .args(["check", "kernel", "--metadata"])
            .arg(&candidate)
            .assert()
            .success()
            .stdout(predicate::str::contains("Kernel update available"));
    }

    #[test]
    fn check_rejects_malformed_candidate() {
        let device = Device::new(INSTALLED);

        device
            .cmd()
            .args(["check", "rom"])
            .write_stdin("not json")
            .assert()
            .failure()
            .stderr(predicate::str::contains("JSON error"));
    }

    #[test]
    fn malformed_installed_metadata_is_not_fatal() {
        let device = Device::new("{broken");

        device
            .cmd()
            .args(["status", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""rom_source_present": true"#))
            .stdout(predicate::str::contains(r#""os_sd_path": "sdcard""#));
    }

    #[test]
    fn status_shows_installed_rom() {
        let device = Device::new(INSTALLED);

        device
            .cmd()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Version: 1.0"))
            .stdout(predicate::str::contains("No OTA metadata on device"));
    }

    #[test]
    fn config_path_follows_flag() {
        let device = Device::new(INSTALLED);

        device
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let dir = TempDir::new().unwrap();
        otacheck()
            .arg("--config")
            .arg(dir.path().join("none.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[device]"));
    }

    #[test]
    fn config_init_twice_fails_with_hint() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        otacheck()
            .arg("--config")
            .arg(&path)
            .args(["config", "init"])
            .assert()
            .success();
        assert!(Path::new(&path).exists());

        otacheck()
            .arg("--config")
            .arg(&path)
            .args(["config", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));
    }

    #[test]
    fn completions_generate() {
        otacheck()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("otacheck"));
    }
}
