//! Command implementations for breathe.
//!
//! Each command returns the text to print; `main` does the printing.

mod completions;
mod config;
mod history;
mod presets;
mod session;

pub use completions::completions;
pub use config::config;
pub use history::{clear, history, report};
pub use presets::{presets, show};
pub use session::{preview, quick, start};

use crate::config::{Config, Paths};
use crate::core::parse_duration;
use crate::error::BreatheError;
use crate::features::breathing::SessionStorage;
use crate::storage::Database;

/// Open the session store for the configured user.
///
/// # Errors
///
/// Returns an error if the data directory or database cannot be opened.
pub fn open_storage(paths: &Paths, config: &Config) -> Result<SessionStorage, BreatheError> {
    paths.ensure_dirs()?;
    let db = Database::open_at(&paths.database)?;
    Ok(SessionStorage::with_database(db, &config.user_id()))
}

/// Parse a `--limit` value, falling back to `default` when absent.
///
/// # Errors
///
/// Returns `BreatheError::Validation` if the value is not a duration.
pub fn resolve_limit(
    arg: Option<&str>,
    default: Option<u64>,
) -> Result<Option<u64>, BreatheError> {
    match arg {
        Some(raw) => parse_duration(raw).map(Some).ok_or_else(|| {
            BreatheError::Validation(format!(
                "invalid duration '{raw}' (try 90, 90s, 5m or 1m30s)"
            ))
        }),
        None => Ok(default.filter(|&secs| secs > 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit() {
        assert_eq!(resolve_limit(Some("5m"), None).unwrap(), Some(300));
        assert_eq!(resolve_limit(None, Some(60)).unwrap(), Some(60));
        assert_eq!(resolve_limit(None, Some(0)).unwrap(), None);
        assert_eq!(resolve_limit(None, None).unwrap(), None);
        assert!(matches!(
            resolve_limit(Some("soon"), None),
            Err(BreatheError::Validation(_))
        ));
    }

    #[test]
    fn test_open_storage_creates_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(dir.path().join("data"));
        let storage = open_storage(&paths, &Config::default()).unwrap();

        assert!(paths.database.exists());
        assert!(storage.get_recent(5).unwrap().is_empty());
    }
}
