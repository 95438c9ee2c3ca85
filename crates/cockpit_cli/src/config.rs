use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cockpit_core::core_api::InstallerSettings;
use cockpit_core::variant::{self, Variant};
use serde::Deserialize;

const APP_DIR: &str = "cockpitpp-installer";
const CONFIG_FILE: &str = "config.toml";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub saved_games: Option<PathBuf>,
    pub variant: Option<Variant>,
    pub scripts_dir: Option<PathBuf>,
    pub scripts: InstallerSettings,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Loads `explicit` if given (it must exist), otherwise the default location if present.
pub fn load(explicit: Option<&Path>) -> Result<ConfigFile, String> {
    match explicit {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) => match read_config(&path) {
                Err(_) if !path.exists() => Ok(ConfigFile::default()),
                other => other,
            },
            None => Ok(ConfigFile::default()),
        },
    }
}

fn read_config(path: &Path) -> Result<ConfigFile, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Error reading config {}: {e}", path.display()))?;
    let config: ConfigFile = toml::from_str(&text)
        .map_err(|e| format!("Error parsing config {}: {e}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Chooses the `Scripts` folder to work on.
///
/// An explicit scripts dir wins. Otherwise the variant folder under the
/// saved-games dir is used, falling back to the first variant found on disk.
pub fn resolve_scripts_dir(
    scripts_dir: Option<PathBuf>,
    saved_games: Option<PathBuf>,
    variant: Option<Variant>,
) -> io::Result<PathBuf> {
    if let Some(dir) = scripts_dir {
        return Ok(dir);
    }
    let saved_games = resolve_saved_games(saved_games)?;
    let variant = match variant {
        Some(v) => v,
        None => variant::detect_variants(&saved_games)
            .into_iter()
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no DCS folder found under {}", saved_games.display()),
                )
            })?,
    };
    log::info!("using {variant} scripts");
    Ok(variant.scripts_dir(&saved_games))
}

pub fn resolve_saved_games(saved_games: Option<PathBuf>) -> io::Result<PathBuf> {
    match saved_games {
        Some(dir) => Ok(dir),
        None => dirs::home_dir()
            .map(|home| variant::default_saved_games(&home))
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "could not determine home directory")
            }),
    }
}
