use std::fs;
use std::io;
use std::path::Path;

use crate::core_api::CoreError;

pub const LINE_TERMINATOR: &str = "\r\n";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One on-disk text file as an ordered list of lines without terminators.
///
/// Lines are raw bytes: scripts are not required to be UTF-8, and every
/// line that is not rewritten goes back to disk exactly as it was read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptFile {
    pub lines: Vec<Vec<u8>>,
}

impl ScriptFile {
    /// Splits on `\n`, dropping a `\r` that precedes it. A final terminator
    /// does not produce an empty trailing line. A leading UTF-8 byte order
    /// mark is discarded.
    pub fn parse(content: impl AsRef<[u8]>) -> Self {
        let content = content.as_ref();
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        if content.is_empty() {
            return Self::default();
        }
        let body = content.strip_suffix(b"\n").unwrap_or(content);
        Self {
            lines: body
                .split(|&b| b == b'\n')
                .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
                .collect(),
        }
    }

    /// Reads `path` fresh from disk. Returns `Ok(None)` when the file is absent.
    pub fn load(path: &Path) -> Result<Option<Self>, CoreError> {
        match fs::read(path) {
            Ok(content) => Ok(Some(Self::parse(content))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::io(path, "read", e)),
        }
    }

    /// Renders every line followed by CRLF, whatever the source used.
    pub fn to_crlf_bytes(&self) -> Vec<u8> {
        let capacity = self
            .lines
            .iter()
            .map(|l| l.len() + LINE_TERMINATOR.len())
            .sum();
        let mut out = Vec::with_capacity(capacity);
        for line in &self.lines {
            out.extend_from_slice(line);
            out.extend_from_slice(LINE_TERMINATOR.as_bytes());
        }
        out
    }

    /// Replaces the whole content of `path`. Not atomic, and never writes a byte order mark.
    pub fn write(&self, path: &Path) -> Result<(), CoreError> {
        fs::write(path, self.to_crlf_bytes()).map_err(|e| CoreError::io(path, "write", e))?;
        log::info!("wrote {} lines to {}", self.lines.len(), path.display());
        Ok(())
    }
}
