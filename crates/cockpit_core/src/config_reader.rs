use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::codec::{self, FieldReading};
use crate::core_api::CoreError;
use crate::field::Field;
use crate::matcher::{self, LinePattern};
use crate::script::ScriptFile;

/// Decoded field values keyed by field. `None` means the line was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldReadings {
    pub file_found: bool,
    pub values: BTreeMap<Field, Option<FieldReading>>,
}

impl FieldReadings {
    pub fn get(&self, field: Field) -> Option<&FieldReading> {
        self.values.get(&field).and_then(Option::as_ref)
    }

    /// Requested fields whose line was absent, in field order.
    pub fn missing(&self) -> Vec<Field> {
        self.values
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| *field)
            .collect()
    }

    pub fn client_ips(&self) -> Option<&[String]> {
        self.get(Field::ClientIps).and_then(FieldReading::as_ips)
    }

    pub fn port(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldReading::as_port)
    }
}

/// Field lines are decoded as UTF-8, lossily; other lines are never decoded.
pub fn read_lines(
    lines: &[Vec<u8>],
    fields: &[Field],
) -> Result<BTreeMap<Field, Option<FieldReading>>, CoreError> {
    let mut values = BTreeMap::new();
    for &field in fields {
        let reading = match matcher::find(lines, &LinePattern::anchored(field.prefix())) {
            Some((index, line)) => {
                log::debug!("{field}: found on line {}", index + 1);
                Some(codec::decode(field, &String::from_utf8_lossy(line))?)
            }
            None => None,
        };
        values.insert(field, reading);
    }
    Ok(values)
}

/// Reads every requested field from `path`. A missing file yields all fields as not found.
pub fn read_all(path: &Path, fields: &[Field]) -> Result<FieldReadings, CoreError> {
    match ScriptFile::load(path)? {
        Some(script) => Ok(FieldReadings {
            file_found: true,
            values: read_lines(&script.lines, fields)?,
        }),
        None => {
            log::warn!("{} not found", path.display());
            Ok(FieldReadings {
                file_found: false,
                values: fields.iter().map(|f| (*f, None)).collect(),
            })
        }
    }
}
