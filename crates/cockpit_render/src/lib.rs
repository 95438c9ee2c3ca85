use std::fmt::Write as _;
use std::path::Path;

use cockpit_core::core_api::{ApplyOutcome, SettingsReport, UpdateSummary};
use cockpit_core::field::Field;
use cockpit_core::merger::{CompanionOutcome, CompanionStatus};
use cockpit_core::patcher::PatchOutcome;
use cockpit_core::variant::Variant;
use serde_json::{Map as JsonMap, Value as JsonValue};

const LABEL_WIDTH: usize = 14;
const NOT_FOUND: &str = "not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub client_ips: bool,
    pub dcs_port: bool,
    pub android_port: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.client_ips || self.dcs_port || self.android_port
    }

    pub fn fields(&self) -> Vec<Field> {
        let mut out = Vec::new();
        if self.client_ips {
            out.push(Field::ClientIps);
        }
        if self.dcs_port {
            out.push(Field::PrimaryPort);
        }
        if self.android_port {
            out.push(Field::SecondaryPort);
        }
        out
    }
}

pub fn render_settings_json(report: &SettingsReport, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(settings_json(report)),
    }
}

pub fn render_settings_selected_json(
    report: &SettingsReport,
    fields: &FieldSelection,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let mut out = JsonMap::new();
            for field in fields.fields() {
                out.insert(field.key().to_string(), field_to_json(report, field));
            }
            JsonValue::Object(out)
        }
    }
}

/// `key=value` lines for the selected fields, in field order.
pub fn render_settings_selected_pairs(
    report: &SettingsReport,
    fields: &FieldSelection,
) -> Vec<(&'static str, String)> {
    fields
        .fields()
        .into_iter()
        .map(|field| (field.key(), field_to_text(report, field)))
        .collect()
}

pub fn render_settings_text(report: &SettingsReport) -> String {
    let mut out = String::new();

    writeln!(out, " ::: Cockpit++ :::").expect("writing to String cannot fail");
    write_row(&mut out, "Script", &report.primary_path.display().to_string());
    for field in Field::ALL {
        write_row(&mut out, field.variable_name(), &field_to_text(report, field));
    }
    writeln!(out).expect("writing to String cannot fail");
    writeln!(out, " ::: Export :::").expect("writing to String cannot fail");
    write_row(&mut out, "Script", &report.companion_path.display().to_string());
    write_row(&mut out, "Status", companion_status_label(report.companion));

    out
}

pub fn render_apply_text(outcome: &ApplyOutcome) -> String {
    let mut out = String::new();
    if !outcome.file_found {
        writeln!(out, "{} not found, nothing applied", outcome.path.display())
            .expect("writing to String cannot fail");
        return out;
    }
    writeln!(out, "Applied to {}", outcome.path.display())
        .expect("writing to String cannot fail");
    for (field, patch) in &outcome.patched {
        write_row(&mut out, field.variable_name(), patch_label(patch));
    }
    out
}

pub fn render_apply_json(outcome: &ApplyOutcome, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let mut out = JsonMap::new();
            out.insert("primary_path".to_string(), path_to_json(&outcome.path));
            out.insert(
                "primary_found".to_string(),
                JsonValue::Bool(outcome.file_found),
            );
            out.insert("fields".to_string(), patched_to_json(&outcome.patched));
            JsonValue::Object(out)
        }
    }
}

pub fn render_update_json(summary: &UpdateSummary) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "primary_path".to_string(),
        path_to_json(&summary.primary_path),
    );
    out.insert(
        "primary_backup".to_string(),
        summary
            .merge
            .backup
            .as_deref()
            .map(path_to_json)
            .unwrap_or(JsonValue::Null),
    );
    out.insert(
        "fields".to_string(),
        patched_to_json(&summary.merge.patched),
    );
    out.insert(
        "companion_path".to_string(),
        path_to_json(&summary.companion_path),
    );
    out.insert(
        "companion".to_string(),
        JsonValue::String(companion_outcome_label(&summary.companion).to_string()),
    );
    if let CompanionOutcome::MarkerAppended { backup } = &summary.companion {
        out.insert("companion_backup".to_string(), path_to_json(backup));
    }
    JsonValue::Object(out)
}

pub fn render_update_text(summary: &UpdateSummary) -> String {
    let mut out = String::new();
    writeln!(out, "Update complete").expect("writing to String cannot fail");
    write_row(&mut out, "Script", &summary.primary_path.display().to_string());
    if let Some(backup) = &summary.merge.backup {
        write_row(&mut out, "Backup", &backup.display().to_string());
    }
    for (field, patch) in &summary.merge.patched {
        write_row(&mut out, field.variable_name(), patch_label(patch));
    }
    write_row(&mut out, "Export", &summary.companion_path.display().to_string());
    write_row(&mut out, "Status", companion_outcome_label(&summary.companion));
    if let CompanionOutcome::MarkerAppended { backup } = &summary.companion {
        write_row(&mut out, "Backup", &backup.display().to_string());
    }
    out
}

pub fn render_variants_json(saved_games: &Path, variants: &[Variant]) -> JsonValue {
    JsonValue::Array(
        variants
            .iter()
            .map(|variant| {
                let mut m = JsonMap::new();
                m.insert(
                    "variant".to_string(),
                    JsonValue::String(variant.label().to_string()),
                );
                m.insert(
                    "folder".to_string(),
                    JsonValue::String(variant.folder().to_string()),
                );
                m.insert(
                    "scripts_dir".to_string(),
                    path_to_json(&variant.scripts_dir(saved_games)),
                );
                JsonValue::Object(m)
            })
            .collect(),
    )
}

pub fn render_variants_text(saved_games: &Path, variants: &[Variant]) -> String {
    let mut out = String::new();
    if variants.is_empty() {
        writeln!(out, "No DCS folders under {}", saved_games.display())
            .expect("writing to String cannot fail");
        return out;
    }
    for variant in variants {
        write_row(
            &mut out,
            variant.label(),
            &variant.scripts_dir(saved_games).display().to_string(),
        );
    }
    out
}

fn settings_json(report: &SettingsReport) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert(
        "primary_path".to_string(),
        path_to_json(&report.primary_path),
    );
    out.insert(
        "primary_found".to_string(),
        JsonValue::Bool(report.readings.file_found),
    );
    for field in Field::ALL {
        out.insert(field.key().to_string(), field_to_json(report, field));
    }
    out.insert(
        "companion_path".to_string(),
        path_to_json(&report.companion_path),
    );
    out.insert(
        "companion".to_string(),
        JsonValue::String(companion_status_key(report.companion).to_string()),
    );
    out.insert(
        "warnings".to_string(),
        JsonValue::Array(report.warnings().into_iter().map(JsonValue::String).collect()),
    );
    out
}

fn field_to_json(report: &SettingsReport, field: Field) -> JsonValue {
    match field {
        Field::ClientIps => match report.readings.client_ips() {
            Some(ips) => JsonValue::Array(ips.iter().cloned().map(JsonValue::String).collect()),
            None => JsonValue::Null,
        },
        Field::PrimaryPort | Field::SecondaryPort => match report.readings.port(field) {
            Some(raw) => JsonValue::String(raw.to_string()),
            None => JsonValue::Null,
        },
    }
}

fn field_to_text(report: &SettingsReport, field: Field) -> String {
    match field {
        Field::ClientIps => match report.readings.client_ips() {
            Some([]) => "none".to_string(),
            Some(ips) => ips.join(", "),
            None => NOT_FOUND.to_string(),
        },
        Field::PrimaryPort | Field::SecondaryPort => report
            .readings
            .port(field)
            .map(str::to_string)
            .unwrap_or_else(|| NOT_FOUND.to_string()),
    }
}

fn patched_to_json(patched: &[(Field, PatchOutcome)]) -> JsonValue {
    JsonValue::Object(
        patched
            .iter()
            .map(|(field, patch)| {
                (
                    field.key().to_string(),
                    JsonValue::String(patch_label(patch).to_string()),
                )
            })
            .collect(),
    )
}

fn path_to_json(path: &Path) -> JsonValue {
    JsonValue::String(path.display().to_string())
}

fn patch_label(outcome: &PatchOutcome) -> &'static str {
    match outcome {
        PatchOutcome::Replaced { .. } => "updated",
        PatchOutcome::FieldMissing => "line not found",
        PatchOutcome::FileMissing => "file not found",
    }
}

fn companion_status_key(status: CompanionStatus) -> &'static str {
    match status {
        CompanionStatus::Missing => "missing",
        CompanionStatus::MarkerAbsent => "marker_absent",
        CompanionStatus::Ok => "ok",
    }
}

fn companion_status_label(status: CompanionStatus) -> &'static str {
    match status {
        CompanionStatus::Missing => NOT_FOUND,
        CompanionStatus::MarkerAbsent => "Cockpit++ line missing",
        CompanionStatus::Ok => "OK",
    }
}

fn companion_outcome_label(outcome: &CompanionOutcome) -> &'static str {
    match outcome {
        CompanionOutcome::Installed => "installed",
        CompanionOutcome::MarkerAppended { .. } => "marker appended",
        CompanionOutcome::AlreadyValid => "unchanged",
    }
}

fn write_row(out: &mut String, label: &str, value: &str) {
    writeln!(out, "  {}: {}", fit_column(label, LABEL_WIDTH), value)
        .expect("writing to String cannot fail");
}

fn fit_column(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    format!("{}{}", " ".repeat(width - len), value)
}
