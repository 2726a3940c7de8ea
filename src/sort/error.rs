//! Error types for sorting.
//!
//! Everything except [`SortError::CriticalStructuralInconsistency`] and
//! [`SortError::Listing`] is recovered where it happens and only counted as a weak error.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a failed filesystem operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    PermissionDenied,
    AlreadyExists,
    Other,
}

/// A filesystem operation failure with the kind already resolved.
#[derive(Debug, Error)]
#[error("{kind}: {source}")]
pub struct FsError {
    pub kind: FailureKind,
    #[source]
    pub source: io::Error,
}

/// Index update that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("series '{0}' already has a folder")]
    Occupied(String),
    #[error("series '{0}' has no folder to replace")]
    Vacant(String),
}

#[derive(Debug, Error)]
pub enum SortError {
    #[error("name does not match the expected '[group] series - episode' format: {0}")]
    MalformedName(String),

    #[error("failed to move '{}' to '{}': {source}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: FsError,
    },

    #[error("failed to rename folder '{}' to '{}': {source}", from.display(), to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: FsError,
    },

    #[error("failed to create folder '{}': {source}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    #[error("failed to copy '{}' to backup '{}': {source}", from.display(), to.display())]
    BackupFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: FsError,
    },

    #[error(transparent)]
    IndexCollision(#[from] IndexError),

    #[error("folder '{folder}' for series '{series}' no longer has a '[group]' prefix")]
    CriticalStructuralInconsistency { folder: String, series: String },

    #[error("failed to list directory '{}': {source}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: FsError,
    },
}

impl SortError {
    /// Failure kind of the underlying filesystem error, if there is one.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::MoveFailed { source, .. }
            | Self::RenameFailed { source, .. }
            | Self::CreateFailed { source, .. }
            | Self::BackupFailed { source, .. }
            | Self::Listing { source, .. } => Some(source.kind),
            Self::MalformedName(_) | Self::IndexCollision(_) | Self::CriticalStructuralInconsistency { .. } => None,
        }
    }

    /// True for the one error kind that halts the remaining run.
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self, Self::CriticalStructuralInconsistency { .. })
    }
}

impl From<io::ErrorKind> for FailureKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            _ => Self::Other,
        }
    }
}

impl From<io::Error> for FsError {
    fn from(source: io::Error) -> Self {
        Self {
            kind: source.kind().into(),
            source,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::AlreadyExists => "already exists",
            Self::Other => "failed",
        };
        write!(f, "{text}")
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn maps_io_error_kinds() {
        assert_eq!(FailureKind::from(io::ErrorKind::NotFound), FailureKind::NotFound);
        assert_eq!(
            FailureKind::from(io::ErrorKind::PermissionDenied),
            FailureKind::PermissionDenied
        );
        assert_eq!(FailureKind::from(io::ErrorKind::AlreadyExists), FailureKind::AlreadyExists);
        assert_eq!(FailureKind::from(io::ErrorKind::InvalidInput), FailureKind::Other);
    }

    #[test]
    fn only_structural_inconsistency_is_critical() {
        let critical = SortError::CriticalStructuralInconsistency {
            folder: "Show".to_string(),
            series: "Show".to_string(),
        };
        assert!(critical.is_critical());
        assert!(!SortError::MalformedName("BadName.mkv".to_string()).is_critical());
        assert!(!SortError::IndexCollision(IndexError::Occupied("Show".to_string())).is_critical());
    }

    #[test]
    fn move_failure_reports_kind() {
        let error = SortError::MoveFailed {
            from: PathBuf::from("a.mkv"),
            to: PathBuf::from("dir/a.mkv"),
            source: FsError::from(io::Error::from(io::ErrorKind::PermissionDenied)),
        };
        assert_eq!(error.failure_kind(), Some(FailureKind::PermissionDenied));
        assert!(error.to_string().contains("permission denied"));
    }
}
