mod sqlite;

pub use sqlite::SessionStore;

use crate::error::{Result, TutorbaseError};

/// Default SQLite path: `~/.config/tutorbase/tutorbase.db`
pub fn default_db_path() -> Result<std::path::PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("tutorbase").join("tutorbase.db"))
        .ok_or_else(|| TutorbaseError::Config("cannot determine config directory".to_string()))
}
