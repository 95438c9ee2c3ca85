use std::path::{Path, PathBuf};

use super::error::CoreError;

/// Obtains a reference copy of the scripts. The protocol is up to the implementor.
pub trait Transport {
    /// Downloads `url` to `dest` and returns the path written.
    fn fetch(&self, url: &str, dest: &Path) -> Result<PathBuf, CoreError>;

    /// Unpacks `archive` into `dest_dir` and returns the directory holding the contents.
    fn extract(&self, archive: &Path, dest_dir: &Path) -> Result<PathBuf, CoreError>;
}
