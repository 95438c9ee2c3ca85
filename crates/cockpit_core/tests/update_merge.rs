use std::fs;
use std::path::{Path, PathBuf};

use cockpit_core::core_api::{CoreErrorCode, FieldValues};
use cockpit_core::field::Marker;
use cockpit_core::merger::{self, CompanionOutcome, CompanionStatus};
use tempfile::TempDir;

const REFERENCE_SCRIPT: &str = "-- v2\r\n\
local clientIP={}\r\n\
local DCS_PORT = 14800\r\n\
local ANDROID_PORT = 14801\r\n\
local NEW_FEATURE = true\r\n";

fn user_values() -> FieldValues {
    FieldValues {
        client_ips: vec!["192.168.1.20".into(), "192.168.1.21".into()],
        dcs_port: 10310,
        android_port: 10311,
    }
}

fn put(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, content).expect("write fixture");
    path.to_path_buf()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

#[test]
fn merge_combines_reference_content_with_user_values() {
    let dir = TempDir::new().expect("tempdir");
    let reference = put(&dir.path().join("ref/Cockpit++.lua"), REFERENCE_SCRIPT);
    let target = put(
        &dir.path().join("Scripts/Cockpit++.lua"),
        "-- v1\nlocal clientIP={\"192.168.1.20\"}\n",
    );

    let outcome = merger::merge(&reference, &target, &user_values()).expect("merge");

    assert_eq!(outcome.backup, Some(merger::backup_path(&target)));
    assert!(outcome.patched.iter().all(|(_, o)| o.is_replaced()));
    assert_eq!(
        read(&target),
        "-- v2\r\n\
         local clientIP={\"192.168.1.20\",\"192.168.1.21\"}\r\n\
         local DCS_PORT = 10310\r\n\
         local ANDROID_PORT = 10311\r\n\
         local NEW_FEATURE = true\r\n"
    );
    assert_eq!(
        read(&merger::backup_path(&target)),
        "-- v1\nlocal clientIP={\"192.168.1.20\"}\n"
    );
}

#[test]
fn merge_without_existing_target_installs_directly() {
    let dir = TempDir::new().expect("tempdir");
    let reference = put(&dir.path().join("ref/Cockpit++.lua"), REFERENCE_SCRIPT);
    let target = dir.path().join("Scripts/Cockpit++.lua");

    let outcome = merger::merge(&reference, &target, &user_values()).expect("merge");

    assert_eq!(outcome.backup, None);
    assert!(!merger::backup_path(&target).exists());
    assert!(read(&target).contains("local DCS_PORT = 10310\r\n"));
}

#[test]
fn merge_overwrites_a_previous_backup() {
    let dir = TempDir::new().expect("tempdir");
    let reference = put(&dir.path().join("ref/Cockpit++.lua"), REFERENCE_SCRIPT);
    let target = put(&dir.path().join("Cockpit++.lua"), "current\n");
    put(&merger::backup_path(&target), "stale backup\n");

    merger::merge(&reference, &target, &user_values()).expect("merge");

    assert_eq!(read(&merger::backup_path(&target)), "current\n");
}

#[test]
fn merge_fails_when_reference_is_missing() {
    let dir = TempDir::new().expect("tempdir");
    let target = put(&dir.path().join("Cockpit++.lua"), "current\n");

    let err = merger::merge(&dir.path().join("missing.lua"), &target, &user_values())
        .expect_err("missing reference must abort");

    assert_eq!(err.code, CoreErrorCode::NotFound);
    assert_eq!(read(&target), "current\n");
    assert!(!merger::backup_path(&target).exists());
}

#[test]
fn companion_without_marker_gets_it_appended_and_backed_up() {
    let dir = TempDir::new().expect("tempdir");
    let reference = put(&dir.path().join("ref/Export.lua"), "unused\r\n");
    let target = put(&dir.path().join("Export.lua"), "dofile('other.lua')\r\n");
    let marker = Marker::default();

    let outcome = merger::ensure_companion(&reference, &target, &marker).expect("ensure");

    assert_eq!(
        outcome,
        CompanionOutcome::MarkerAppended {
            backup: merger::backup_path(&target)
        }
    );
    assert_eq!(
        read(&target),
        format!("dofile('other.lua')\r\n{}\r\n\r\n", marker.line)
    );
    assert_eq!(read(&merger::backup_path(&target)), "dofile('other.lua')\r\n");
    assert_eq!(
        merger::companion_status(&target, &marker.prefix).expect("status"),
        CompanionStatus::Ok
    );
}

#[test]
fn companion_without_final_newline_keeps_last_line_intact() {
    let dir = TempDir::new().expect("tempdir");
    let reference = put(&dir.path().join("ref/Export.lua"), "unused\r\n");
    let target = put(&dir.path().join("Export.lua"), "-- last line");
    let marker = Marker::default();

    merger::ensure_companion(&reference, &target, &marker).expect("ensure");

    assert_eq!(
        read(&target),
        format!("-- last line\r\n{}\r\n\r\n", marker.line)
    );
}

#[test]
fn valid_companion_is_left_alone() {
    let dir = TempDir::new().expect("tempdir");
    let reference = put(&dir.path().join("ref/Export.lua"), "unused\r\n");
    let content = "-- mine\n    local Cockpitpp=require('lfs')\n";
    let target = put(&dir.path().join("Export.lua"), content);

    let outcome =
        merger::ensure_companion(&reference, &target, &Marker::default()).expect("ensure");

    assert_eq!(outcome, CompanionOutcome::AlreadyValid);
    assert_eq!(read(&target), content);
    assert!(!merger::backup_path(&target).exists());
}

#[test]
fn missing_companion_is_installed_verbatim() {
    let dir = TempDir::new().expect("tempdir");
    let reference = put(&dir.path().join("ref/Export.lua"), "ref content\n");
    let target = dir.path().join("Scripts/Export.lua");

    let outcome =
        merger::ensure_companion(&reference, &target, &Marker::default()).expect("ensure");

    assert_eq!(outcome, CompanionOutcome::Installed);
    assert_eq!(read(&target), "ref content\n");
}

#[test]
fn missing_companion_and_reference_is_an_error() {
    let dir = TempDir::new().expect("tempdir");

    let err = merger::ensure_companion(
        &dir.path().join("ref/Export.lua"),
        &dir.path().join("Export.lua"),
        &Marker::default(),
    )
    .expect_err("nothing to install");

    assert_eq!(err.code, CoreErrorCode::NotFound);
}

#[test]
fn valid_companion_without_reference_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let target = put(
        &dir.path().join("Export.lua"),
        "local Cockpitpp=require('lfs')\r\n",
    );

    let err = merger::ensure_companion(
        &dir.path().join("ref/Export.lua"),
        &target,
        &Marker::default(),
    )
    .expect_err("reference is required");

    assert_eq!(err.code, CoreErrorCode::NotFound);
}
