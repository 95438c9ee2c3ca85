use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use zip::ZipArchive;

/// Unpacks a ZIP archive held in memory into `dest_dir`, returning the number
/// of files written. Entries whose path would land outside `dest_dir` are skipped.
pub fn extract_zip(data: &[u8], dest_dir: &Path) -> Result<usize, String> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| format!("Failed to open zip: {}", e))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| format!("Failed to read zip entry: {}", e))?;

        let Some(relative) = entry.enclosed_name() else {
            log::warn!("skipping unsafe zip entry '{}'", entry.name());
            continue;
        };
        let outpath = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| format!("Failed to create {}: {}", outpath.display(), e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        let mut out = fs::File::create(&outpath)
            .map_err(|e| format!("Failed to create {}: {}", outpath.display(), e))?;
        io::copy(&mut entry, &mut out)
            .map_err(|e| format!("Failed to write {}: {}", outpath.display(), e))?;
        written += 1;
    }

    Ok(written)
}
