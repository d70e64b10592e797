use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can stop a history export from loading.
///
/// All variants are fatal for the run: nothing gets aggregated from a
/// half-read export. `path` is filled in when the source was a file.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The export file couldn't be read at all
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a JSON array of records
    #[error("Parse error{}: {message}", in_file(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    /// A record is missing a field or has one we can't make sense of
    #[error("Schema error in record {index}{}: {reason}", in_file(.path))]
    Schema {
        path: Option<PathBuf>,
        index: usize,
        reason: String,
    },
}

fn in_file(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

impl HistoryError {
    pub fn parse(message: impl Into<String>) -> Self {
        HistoryError::Parse {
            path: None,
            message: message.into(),
        }
    }

    pub fn schema(index: usize, reason: impl Into<String>) -> Self {
        HistoryError::Schema {
            path: None,
            index,
            reason: reason.into(),
        }
    }

    /// Tag a parse/schema error with the file it came from
    pub fn in_path(mut self, file: &Path) -> Self {
        match &mut self {
            HistoryError::Parse { path, .. } | HistoryError::Schema { path, .. } => {
                *path = Some(file.to_path_buf());
            }
            HistoryError::Io { .. } => {}
        }
        self
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            HistoryError::Io { path, .. } => Some(path),
            HistoryError::Parse { path, .. } | HistoryError::Schema { path, .. } => path.as_deref(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;
