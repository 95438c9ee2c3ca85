use std::path::Path;

use serde::Serialize;

use crate::codec::FieldValue;
use crate::core_api::CoreError;
use crate::field::Field;
use crate::matcher::{self, LinePattern};
use crate::script::ScriptFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PatchOutcome {
    /// The first line carrying the field was rewritten.
    Replaced { line_index: usize },
    /// No line carried the field; the file was rewritten with its lines unchanged.
    FieldMissing,
    /// The target file does not exist; nothing was written.
    FileMissing,
}

impl PatchOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}

/// Rewrites the first line matching the value's field. Later duplicates are left untouched.
pub fn patch_lines(script: &mut ScriptFile, value: &FieldValue) -> Option<usize> {
    let field = value.field();
    let pattern = LinePattern::anchored(field.prefix());
    let (index, _) = matcher::find(&script.lines, &pattern)?;
    script.lines[index] = value.encode().into_bytes();
    log::debug!("{field}: replaced line {}", index + 1);
    Some(index)
}

/// Patches `value` into the file at `path` and rewrites the whole file with CRLF terminators.
pub fn patch(path: &Path, value: &FieldValue) -> Result<PatchOutcome, CoreError> {
    let Some(mut script) = ScriptFile::load(path)? else {
        log::warn!("{} not found, nothing to patch", path.display());
        return Ok(PatchOutcome::FileMissing);
    };

    let outcome = match patch_lines(&mut script, value) {
        Some(line_index) => PatchOutcome::Replaced { line_index },
        None => {
            log::warn!("no {} line in {}", value.field(), path.display());
            PatchOutcome::FieldMissing
        }
    };
    script.write(path)?;
    Ok(outcome)
}

/// Applies several values in order, re-reading the file for each.
pub fn patch_each<'v, I>(
    path: &Path,
    values: I,
) -> Result<Vec<(Field, PatchOutcome)>, CoreError>
where
    I: IntoIterator<Item = &'v FieldValue>,
{
    values
        .into_iter()
        .map(|value| patch(path, value).map(|outcome| (value.field(), outcome)))
        .collect()
}
