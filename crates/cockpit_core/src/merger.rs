use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core_api::{CoreError, CoreErrorCode, FieldValues};
use crate::field::{Field, Marker};
use crate::matcher::{self, LinePattern};
use crate::patcher::{self, PatchOutcome};
use crate::script::{LINE_TERMINATOR, ScriptFile};

pub const BACKUP_SUFFIX: &str = ".old";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub patched: Vec<(Field, PatchOutcome)>,
    /// Set when a previous target existed and was copied aside.
    pub backup: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CompanionOutcome {
    /// Target was absent; the reference copy was installed.
    Installed,
    /// Target lacked the marker; it was backed up and the marker appended.
    MarkerAppended { backup: PathBuf },
    /// Target already carried the marker; nothing was touched.
    AlreadyValid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompanionStatus {
    Missing,
    MarkerAbsent,
    Ok,
}

/// `<path>.old`, appended after the existing extension.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copies `path` to its backup location, replacing any previous backup.
pub fn backup(path: &Path) -> Result<PathBuf, CoreError> {
    let dest = backup_path(path);
    fs::copy(path, &dest).map_err(|e| CoreError::io(path, "back up", e))?;
    log::info!("backed up {} to {}", path.display(), dest.display());
    Ok(dest)
}

/// Fails with `NotFound` unless `path` is an existing file.
pub fn require_reference(path: &Path) -> Result<(), CoreError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CoreError::new(
            CoreErrorCode::NotFound,
            format!("reference file {} is missing", path.display()),
        ))
    }
}

/// Patches the user's values into the reference copy, then installs it over `target`.
///
/// The reference file is modified in place. An existing target is copied to
/// `<target>.old` before being overwritten, so a failed install leaves the
/// backup behind.
pub fn merge(
    reference: &Path,
    target: &Path,
    values: &FieldValues,
) -> Result<MergeOutcome, CoreError> {
    require_reference(reference)?;

    let patched = patcher::patch_each(reference, &values.to_values())?;

    let backup = if target.exists() {
        Some(backup(target)?)
    } else {
        ensure_parent(target)?;
        None
    };
    install(reference, target)?;

    Ok(MergeOutcome { patched, backup })
}

/// Makes sure `target` exists and carries `marker`. The reference must exist
/// even when the target turns out to be valid already.
pub fn ensure_companion(
    reference: &Path,
    target: &Path,
    marker: &Marker,
) -> Result<CompanionOutcome, CoreError> {
    require_reference(reference)?;
    match companion_status(target, &marker.prefix)? {
        CompanionStatus::Ok => {
            log::debug!("{} already carries the marker", target.display());
            Ok(CompanionOutcome::AlreadyValid)
        }
        CompanionStatus::Missing => {
            ensure_parent(target)?;
            install(reference, target)?;
            Ok(CompanionOutcome::Installed)
        }
        CompanionStatus::MarkerAbsent => {
            let backup = backup(target)?;
            append_marker(target, &marker.line)?;
            Ok(CompanionOutcome::MarkerAppended { backup })
        }
    }
}

pub fn companion_status(path: &Path, marker_prefix: &str) -> Result<CompanionStatus, CoreError> {
    let Some(script) = ScriptFile::load(path)? else {
        return Ok(CompanionStatus::Missing);
    };
    let found = matcher::find(&script.lines, &LinePattern::trimmed(marker_prefix)).is_some();
    Ok(if found {
        CompanionStatus::Ok
    } else {
        CompanionStatus::MarkerAbsent
    })
}

fn append_marker(path: &Path, marker_line: &str) -> Result<(), CoreError> {
    let existing = fs::read(path).map_err(|e| CoreError::io(path, "read", e))?;
    let mut tail = String::new();
    if !existing.is_empty() && !existing.ends_with(b"\n") {
        tail.push_str(LINE_TERMINATOR);
    }
    tail.push_str(marker_line);
    tail.push_str(LINE_TERMINATOR);
    tail.push_str(LINE_TERMINATOR);

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| CoreError::io(path, "open", e))?;
    file.write_all(tail.as_bytes())
        .map_err(|e| CoreError::io(path, "append to", e))?;
    log::info!("appended marker line to {}", path.display());
    Ok(())
}

fn install(source: &Path, target: &Path) -> Result<(), CoreError> {
    fs::copy(source, target).map_err(|e| CoreError::io(target, "install", e))?;
    log::info!("installed {} to {}", source.display(), target.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), CoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, "create", e))
        }
        _ => Ok(()),
    }
}
