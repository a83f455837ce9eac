use std::path::{Path, PathBuf};

/// One playable audio file: its path plus the derived display name
/// (base filename). Identity is the path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub display: String,
}

impl Track {
    pub fn from_path(path: &Path) -> Self {
        let display = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        Self {
            path: path.to_path_buf(),
            display,
        }
    }
}
