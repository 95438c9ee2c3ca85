use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::codec::{self, FieldValue};
use crate::config_reader::FieldReadings;
use crate::field::{Field, Marker};
use crate::merger::{CompanionOutcome, CompanionStatus, MergeOutcome};
use crate::network::DEFAULT_PROBE_ADDR;
use crate::patcher::PatchOutcome;

use super::error::{CoreError, CoreErrorCode};

pub const DEFAULT_PRIMARY_SCRIPT: &str = "Cockpit++.lua";
pub const DEFAULT_COMPANION_SCRIPT: &str = "Export.lua";
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://github.com/CockpitPP/DCS-Scripts/archive/refs/heads/master.zip";
pub const DEFAULT_ARCHIVE_FILE: &str = "CockpitPP-scripts.zip";
pub const DEFAULT_ARCHIVE_ROOT: &str = "DCS-Scripts-master";

/// Everything the engine needs to know that is not a path to a DCS folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerSettings {
    pub primary_script: String,
    pub companion_script: String,
    pub marker: Marker,
    pub archive_url: String,
    pub archive_file: String,
    /// Folder inside the extracted archive holding the reference scripts.
    /// Empty means the archive root itself.
    pub archive_root: String,
    pub probe_addr: String,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            primary_script: DEFAULT_PRIMARY_SCRIPT.to_string(),
            companion_script: DEFAULT_COMPANION_SCRIPT.to_string(),
            marker: Marker::default(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            archive_file: DEFAULT_ARCHIVE_FILE.to_string(),
            archive_root: DEFAULT_ARCHIVE_ROOT.to_string(),
            probe_addr: DEFAULT_PROBE_ADDR.to_string(),
        }
    }
}

/// The three user-editable values, already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldValues {
    pub client_ips: Vec<String>,
    pub dcs_port: u16,
    pub android_port: u16,
}

impl FieldValues {
    /// Validates raw user input. Every invalid field is named in the error.
    pub fn parse<S: AsRef<str>>(
        client_ips: &[S],
        dcs_port: &str,
        android_port: &str,
    ) -> Result<Self, CoreError> {
        let mut issues = Vec::new();

        if client_ips.is_empty() {
            issues.push(format!("{}: at least one client IP is required", Field::ClientIps));
        }
        for ip in client_ips.iter().map(AsRef::as_ref) {
            if !codec::is_dotted_quad(ip) {
                issues.push(format!("{}: '{ip}' is not a dotted-quad IPv4 address", Field::ClientIps));
            }
        }
        let dcs = codec::parse_port(Field::PrimaryPort, dcs_port);
        let android = codec::parse_port(Field::SecondaryPort, android_port);
        for err in [&dcs, &android].into_iter().filter_map(|r| r.as_ref().err()) {
            issues.push(err.message.clone());
        }

        match (dcs, android) {
            (Ok(dcs_port), Ok(android_port)) if issues.is_empty() => Ok(Self {
                client_ips: client_ips.iter().map(|ip| ip.as_ref().to_string()).collect(),
                dcs_port,
                android_port,
            }),
            _ => Err(CoreError::new(CoreErrorCode::Validation, issues.join("; "))),
        }
    }

    /// Rebuilds values from what is currently in a script, validating them as user input.
    pub fn from_readings(readings: &FieldReadings) -> Result<Self, CoreError> {
        let missing = readings.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.variable_name()).collect();
            return Err(CoreError::new(
                CoreErrorCode::NotFound,
                format!("current script lacks {}", names.join(", ")),
            ));
        }
        Self::parse(
            readings.client_ips().unwrap_or_default(),
            readings.port(Field::PrimaryPort).unwrap_or_default(),
            readings.port(Field::SecondaryPort).unwrap_or_default(),
        )
    }

    /// Values in patch order.
    pub fn to_values(&self) -> [FieldValue; 3] {
        [
            FieldValue::ClientIps(self.client_ips.clone()),
            FieldValue::PrimaryPort(self.dcs_port),
            FieldValue::SecondaryPort(self.android_port),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsReport {
    pub primary_path: PathBuf,
    pub companion_path: PathBuf,
    pub readings: FieldReadings,
    pub companion: CompanionStatus,
}

impl SettingsReport {
    /// Human-readable warnings for everything the caller should know is absent.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.readings.file_found {
            out.push(format!("{} not found", self.primary_path.display()));
        } else {
            for field in self.readings.missing() {
                out.push(format!(
                    "{} has no {} line",
                    self.primary_path.display(),
                    field.variable_name()
                ));
            }
        }
        match self.companion {
            CompanionStatus::Missing => {
                out.push(format!("{} not found, run an update", self.companion_path.display()));
            }
            CompanionStatus::MarkerAbsent => out.push(format!(
                "{} does not load the primary script, run an update",
                self.companion_path.display()
            )),
            CompanionStatus::Ok => {}
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub path: PathBuf,
    pub file_found: bool,
    pub patched: Vec<(Field, PatchOutcome)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    pub primary_path: PathBuf,
    pub companion_path: PathBuf,
    pub merge: MergeOutcome,
    pub companion: CompanionOutcome,
}
