use std::path::PathBuf;

use thiserror::Error;

/// Fatal, startup-only failures while loading the source tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data unavailable: {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {path}: {reason}")]
    MalformedTable { path: PathBuf, reason: String },
}

impl DataError {
    /// The source file that caused the failure.
    pub fn path(&self) -> &std::path::Path {
        match self {
            DataError::DataUnavailable { path, .. }
            | DataError::MalformedTable { path, .. } => path,
        }
    }
}

/// A pane that has nothing to show for the current data or selection.
///
/// The display text is the notice shown in place of the pane.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmptySelection {
    /// The whole table is empty.
    #[error("No {subject} available{}.", .table.map(|t| format!(" for {t}")).unwrap_or_default())]
    NoRows {
        subject: &'static str,
        table: Option<&'static str>,
    },

    /// No row matched the selected value.
    #[error("No {subject} available for the selected {dimension}: {value}")]
    NoMatch {
        subject: &'static str,
        dimension: String,
        value: String,
    },
}
