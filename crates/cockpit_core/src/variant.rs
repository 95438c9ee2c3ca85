use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const SAVED_GAMES_DIR: &str = "Saved Games";
pub const SCRIPTS_DIR: &str = "Scripts";

/// A DCS installation flavour, each with its own folder under Saved Games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Release,
    OpenBeta,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Release, Variant::OpenBeta];

    pub fn folder(&self) -> &'static str {
        match *self {
            Self::Release => "DCS",
            Self::OpenBeta => "DCS.openbeta",
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Self::Release => "Release",
            Self::OpenBeta => "OpenBeta",
        }
    }

    pub fn from_folder(folder: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.folder() == folder)
    }

    pub fn scripts_dir(&self, saved_games: &Path) -> PathBuf {
        saved_games.join(self.folder()).join(SCRIPTS_DIR)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `<home>/Saved Games`.
pub fn default_saved_games(home: &Path) -> PathBuf {
    home.join(SAVED_GAMES_DIR)
}

/// Variants whose folder exists under `saved_games`, in declaration order.
pub fn detect_variants(saved_games: &Path) -> Vec<Variant> {
    Variant::ALL
        .into_iter()
        .filter(|v| saved_games.join(v.folder()).is_dir())
        .collect()
}
