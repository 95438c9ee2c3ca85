use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

const INSTALLED_SCRIPT: &str = "-- Cockpit++\r\n\
local clientIP={\"192.168.1.1\"}\r\n\
local DCS_PORT = 10310\r\n\
local ANDROID_PORT = 10311\r\n";

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new(config: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, config).expect("write config");
        Self {
            dir,
            config: config_path,
        }
    }

    fn saved_games(&self) -> PathBuf {
        self.dir.path().join("Saved Games")
    }

    fn scripts_dir(&self, folder: &str) -> PathBuf {
        let dir = self.saved_games().join(folder).join("Scripts");
        fs::create_dir_all(&dir).expect("create scripts dir");
        dir
    }

    fn run(&self, args: &[&str]) -> std::process::Output {
        let config = self.config.to_string_lossy().to_string();
        let saved_games = self.saved_games().to_string_lossy().to_string();
        Command::new(env!("CARGO_BIN_EXE_cockpitpp-installer"))
            .args(["--config", config.as_str(), "--saved-games", saved_games.as_str()])
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run cockpitpp-installer CLI")
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read script")
}

#[test]
fn show_prints_selected_fields_in_fixed_order() {
    let fixture = Fixture::new("");
    let scripts = fixture.scripts_dir("DCS");
    fs::write(scripts.join("Cockpit++.lua"), INSTALLED_SCRIPT).expect("write");

    let output = fixture.run(&["show", "--android-port", "--client-ips"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["client_ips=192.168.1.1", "android_port=10311"]);
}

#[test]
fn show_json_reports_missing_companion_as_warning() {
    let fixture = Fixture::new("");
    let scripts = fixture.scripts_dir("DCS");
    fs::write(scripts.join("Cockpit++.lua"), INSTALLED_SCRIPT).expect("write");

    let output = fixture.run(&["show", "--json"]);
    assert!(output.status.success());

    let json: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["dcs_port"], "10310");
    assert_eq!(json["companion"], "missing");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: "), "{stderr}");
    assert!(stderr.contains("Export.lua"), "{stderr}");
}

#[test]
fn show_picks_requested_variant() {
    let fixture = Fixture::new("");
    fixture.scripts_dir("DCS");
    let beta = fixture.scripts_dir("DCS.openbeta");
    fs::write(
        beta.join("Cockpit++.lua"),
        "local DCS_PORT = 20000\r\n",
    )
    .expect("write");

    let output = fixture.run(&["--variant", "openbeta", "show", "--dcs-port"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "dcs_port=20000");
}

#[test]
fn show_without_any_dcs_folder_fails() {
    let fixture = Fixture::new("");

    let output = fixture.run(&["show"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no DCS folder found"), "{stderr}");
}

#[test]
fn apply_rewrites_fields_and_keeps_unset_ones() {
    let fixture = Fixture::new("");
    let scripts = fixture.scripts_dir("DCS");
    let script = scripts.join("Cockpit++.lua");
    fs::write(&script, INSTALLED_SCRIPT).expect("write");

    let output = fixture.run(&[
        "apply",
        "--ip",
        "192.168.1.2",
        "--ip",
        "192.168.1.3",
        "--dcs-port",
        "4242",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(
        read(&script),
        "-- Cockpit++\r\n\
         local clientIP={\"192.168.1.2\",\"192.168.1.3\"}\r\n\
         local DCS_PORT = 4242\r\n\
         local ANDROID_PORT = 10311\r\n"
    );
}

#[test]
fn apply_json_reports_each_field_and_warns_about_companion() {
    let fixture = Fixture::new("");
    let scripts = fixture.scripts_dir("DCS");
    fs::write(scripts.join("Cockpit++.lua"), INSTALLED_SCRIPT).expect("write");

    let output = fixture.run(&["apply", "--dcs-port", "4242", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["primary_found"], true);
    assert_eq!(json["fields"]["client_ips"], "updated");
    assert_eq!(json["fields"]["dcs_port"], "updated");
    assert_eq!(json["fields"]["android_port"], "updated");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: "), "{stderr}");
    assert!(stderr.contains("Export.lua"), "{stderr}");
}

#[test]
fn apply_rejects_invalid_values_without_writing() {
    let fixture = Fixture::new("");
    let scripts = fixture.scripts_dir("DCS");
    let script = scripts.join("Cockpit++.lua");
    fs::write(&script, INSTALLED_SCRIPT).expect("write");

    let output = fixture.run(&["apply", "--ip", "192.168.1.999", "--android-port", "65535"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("clientIP"), "{stderr}");
    assert!(stderr.contains("ANDROID_PORT"), "{stderr}");
    assert_eq!(read(&script), INSTALLED_SCRIPT);
}

#[test]
fn apply_without_values_is_a_usage_error() {
    let fixture = Fixture::new("");
    fixture.scripts_dir("DCS");

    let output = fixture.run(&["apply"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn apply_with_explicit_scripts_dir_and_missing_script_is_not_fatal() {
    let fixture = Fixture::new("");
    let scripts = fixture.dir.path().join("custom");
    fs::create_dir_all(&scripts).expect("create");
    let scripts_arg = scripts.to_string_lossy().to_string();

    let output = fixture.run(&[
        "--scripts-dir",
        &scripts_arg,
        "apply",
        "--ip",
        "10.0.0.1",
        "--dcs-port",
        "1",
        "--android-port",
        "2",
    ]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("nothing applied"));
    assert!(!scripts.join("Cockpit++.lua").exists());
}

#[test]
fn variants_json_lists_detected_folders() {
    let fixture = Fixture::new("");
    fixture.scripts_dir("DCS.openbeta");

    let output = fixture.run(&["variants", "--json"]);
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let variants = json.as_array().expect("array");
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0]["variant"], "OpenBeta");
}

#[test]
fn config_file_renames_scripts() {
    let fixture = Fixture::new("[scripts]\nprimary_script = \"Custom.lua\"\n");
    let scripts = fixture.scripts_dir("DCS");
    fs::write(scripts.join("Custom.lua"), "local ANDROID_PORT = 9\r\n").expect("write");

    let output = fixture.run(&["show", "--android-port"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "android_port=9");
}

#[test]
fn invalid_config_file_is_reported() {
    let fixture = Fixture::new("this is = = not toml");

    let output = fixture.run(&["variants"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error parsing config"));
}

#[test]
fn local_ip_uses_configured_probe() {
    let fixture = Fixture::new("[scripts]\nprobe_addr = \"127.0.0.1:9\"\n");

    let output = fixture.run(&["local-ip"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "127.0.0.1");
}

#[test]
fn update_refuses_disallowed_url_and_leaves_scripts_alone() {
    let fixture = Fixture::new("");
    let scripts = fixture.scripts_dir("DCS");
    let script = scripts.join("Cockpit++.lua");
    fs::write(&script, INSTALLED_SCRIPT).expect("write");

    let output = fixture.run(&["update", "--url", "https://example.com/scripts.zip"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not in the allowed list"), "{stderr}");
    assert_eq!(read(&script), INSTALLED_SCRIPT);
    assert!(!merger_backup(&script).exists());
}

fn merger_backup(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".old");
    PathBuf::from(name)
}
