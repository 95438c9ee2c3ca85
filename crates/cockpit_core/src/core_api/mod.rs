mod engine;
mod error;
mod transport;
mod types;

pub use engine::Installer;
pub use error::{CoreError, CoreErrorCode};
pub use transport::Transport;
pub use types::{
    ApplyOutcome, DEFAULT_ARCHIVE_ROOT, DEFAULT_ARCHIVE_URL, FieldValues, InstallerSettings,
    SettingsReport, UpdateSummary,
};
