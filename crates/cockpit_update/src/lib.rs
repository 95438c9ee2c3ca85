//! Network transport for fetching reference Cockpit++ scripts.
//!
//! [`HttpTransport`] downloads the release archive over HTTPS and unpacks it
//! with the `zip` crate. It implements [`cockpit_core::core_api::Transport`],
//! so the core merge engine never touches the network itself.

pub mod archive;
pub mod http;

use std::fs;
use std::path::{Path, PathBuf};

use cockpit_core::core_api::{CoreError, CoreErrorCode, Transport};

#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str, dest: &Path) -> Result<PathBuf, CoreError> {
        let bytes = http::download_file(url)
            .map_err(|e| CoreError::new(CoreErrorCode::Transport, e))?;
        fs::write(dest, &bytes).map_err(|e| CoreError::io(dest, "write", e))?;
        log::info!("downloaded {} bytes to {}", bytes.len(), dest.display());
        Ok(dest.to_path_buf())
    }

    fn extract(&self, archive: &Path, dest_dir: &Path) -> Result<PathBuf, CoreError> {
        let data = fs::read(archive).map_err(|e| CoreError::io(archive, "read", e))?;
        let written = archive::extract_zip(&data, dest_dir)
            .map_err(|e| CoreError::new(CoreErrorCode::Transport, e))?;
        log::info!("extracted {written} files into {}", dest_dir.display());
        Ok(dest_dir.to_path_buf())
    }
}
