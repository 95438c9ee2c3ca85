use std::fs;
use std::path::{Path, PathBuf};

use crate::config_reader;
use crate::field::Field;
use crate::merger::{self, CompanionStatus};
use crate::patcher;

use super::error::{CoreError, CoreErrorCode};
use super::transport::Transport;
use super::types::{ApplyOutcome, FieldValues, InstallerSettings, SettingsReport, UpdateSummary};

/// Operations on one DCS `Scripts` folder.
#[derive(Debug, Clone)]
pub struct Installer {
    scripts_dir: PathBuf,
    settings: InstallerSettings,
}

impl Installer {
    pub fn new(scripts_dir: impl Into<PathBuf>, settings: InstallerSettings) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
            settings,
        }
    }

    pub fn primary_path(&self) -> PathBuf {
        self.scripts_dir.join(&self.settings.primary_script)
    }

    pub fn companion_path(&self) -> PathBuf {
        self.scripts_dir.join(&self.settings.companion_script)
    }

    pub fn read_settings(&self) -> Result<SettingsReport, CoreError> {
        let primary_path = self.primary_path();
        let readings = config_reader::read_all(&primary_path, &Field::ALL)?;
        let companion = self.companion_status()?;
        Ok(SettingsReport {
            primary_path,
            companion_path: self.companion_path(),
            readings,
            companion,
        })
    }

    pub fn companion_status(&self) -> Result<CompanionStatus, CoreError> {
        merger::companion_status(&self.companion_path(), &self.settings.marker.prefix)
    }

    /// Writes `values` into the installed primary script. A missing script is not an error.
    pub fn apply(&self, values: &FieldValues) -> Result<ApplyOutcome, CoreError> {
        let path = self.primary_path();
        if !path.is_file() {
            log::warn!("{} not found, nothing applied", path.display());
            return Ok(ApplyOutcome {
                path,
                file_found: false,
                patched: Vec::new(),
            });
        }

        let patched = patcher::patch_each(&path, &values.to_values())?;
        Ok(ApplyOutcome {
            path,
            file_found: true,
            patched,
        })
    }

    /// Fetches fresh reference scripts, merges `values` into them and installs the result.
    ///
    /// `staging_dir` is created if needed and removed afterwards, whatever the outcome.
    pub fn update(
        &self,
        transport: &dyn Transport,
        staging_dir: &Path,
        values: &FieldValues,
    ) -> Result<UpdateSummary, CoreError> {
        fs::create_dir_all(staging_dir).map_err(|e| CoreError::io(staging_dir, "create", e))?;

        let result = self.update_from_staging(transport, staging_dir, values);

        if let Err(e) = fs::remove_dir_all(staging_dir) {
            log::warn!("failed to remove {}: {e}", staging_dir.display());
        }
        result
    }

    fn update_from_staging(
        &self,
        transport: &dyn Transport,
        staging_dir: &Path,
        values: &FieldValues,
    ) -> Result<UpdateSummary, CoreError> {
        let archive_dest = staging_dir.join(&self.settings.archive_file);
        log::info!("fetching {}", self.settings.archive_url);
        let archive = transport.fetch(&self.settings.archive_url, &archive_dest)?;
        let extracted = transport.extract(&archive, staging_dir)?;

        let reference_dir = if self.settings.archive_root.is_empty() {
            extracted
        } else {
            extracted.join(&self.settings.archive_root)
        };
        if !reference_dir.is_dir() {
            return Err(CoreError::new(
                CoreErrorCode::NotFound,
                format!("archive has no {} folder", reference_dir.display()),
            ));
        }

        let reference_primary = reference_dir.join(&self.settings.primary_script);
        let reference_companion = reference_dir.join(&self.settings.companion_script);
        merger::require_reference(&reference_primary)?;
        merger::require_reference(&reference_companion)?;

        let primary_path = self.primary_path();
        let companion_path = self.companion_path();
        let merge = merger::merge(&reference_primary, &primary_path, values)?;
        let companion = merger::ensure_companion(
            &reference_companion,
            &companion_path,
            &self.settings.marker,
        )?;

        Ok(UpdateSummary {
            primary_path,
            companion_path,
            merge,
            companion,
        })
    }
}
