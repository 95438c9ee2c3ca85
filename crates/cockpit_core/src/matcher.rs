/// How a line is compared against a literal prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Prefix must start at column 0 of the raw line.
    Anchored,
    /// Surrounding ASCII whitespace is trimmed before comparing.
    Trimmed,
}

/// Lines are compared as bytes so that scripts in any ASCII-compatible
/// encoding can be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePattern<'p> {
    pub prefix: &'p str,
    pub mode: MatchMode,
}

impl<'p> LinePattern<'p> {
    pub fn anchored(prefix: &'p str) -> Self {
        Self {
            prefix,
            mode: MatchMode::Anchored,
        }
    }

    pub fn trimmed(prefix: &'p str) -> Self {
        Self {
            prefix,
            mode: MatchMode::Trimmed,
        }
    }

    pub fn matches(&self, line: &[u8]) -> bool {
        let prefix = self.prefix.as_bytes();
        match self.mode {
            MatchMode::Anchored => line.starts_with(prefix),
            MatchMode::Trimmed => line.trim_ascii().starts_with(prefix),
        }
    }
}

/// Returns the first line matching `pattern`, with its index.
pub fn find<'a, S: AsRef<[u8]>>(
    lines: &'a [S],
    pattern: &LinePattern<'_>,
) -> Option<(usize, &'a [u8])> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .enumerate()
        .find(|(_, line)| pattern.matches(line))
}
