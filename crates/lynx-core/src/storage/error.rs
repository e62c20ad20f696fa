//! Store error handling
//!
//! Provides typed errors for store operations with descriptive messages
//! and recovery suggestions. Every variant belongs to one [`ErrorKind`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::codec::RecordError;
use crate::models::EntryId;

/// Broad classification of a [`LynxError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An id, playlist or reference lookup failed
    NotFound,
    /// A create or reassign target id is already taken
    DuplicateId,
    /// A line of the database file does not parse
    MalformedRecord,
    /// The database file could not be read or written
    Io,
}

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum LynxError {
    /// No entry carries this id
    #[error("Entry {0} not found")]
    EntryNotFound(EntryId),

    /// No playlist matches the given name or index
    #[error("Playlist '{0}' not found")]
    PlaylistNotFound(String),

    /// The playlist does not reference this id
    #[error("Playlist '{playlist}' does not reference entry {id}")]
    ReferenceNotFound { playlist: String, id: EntryId },

    /// Target id is already held by another entry
    #[error("ID {0} is already in use")]
    DuplicateId(EntryId),

    /// A record line could not be decoded
    #[error("Malformed record on line {line_number}: {source}")]
    MalformedRecord {
        line_number: usize,
        #[source]
        source: RecordError,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LynxError {
    /// Create a read error with path context
    pub fn read(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => LynxError::PermissionDenied {
                path,
                source: error,
            },
            _ => LynxError::Read {
                path,
                source: error,
            },
        }
    }

    /// Create a write error with path context
    pub fn write(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => LynxError::PermissionDenied {
                path,
                source: error,
            },
            _ => LynxError::Write {
                path,
                source: error,
            },
        }
    }

    /// Which of the four error kinds this is
    pub fn kind(&self) -> ErrorKind {
        match self {
            LynxError::EntryNotFound(_)
            | LynxError::PlaylistNotFound(_)
            | LynxError::ReferenceNotFound { .. } => ErrorKind::NotFound,
            LynxError::DuplicateId(_) => ErrorKind::DuplicateId,
            LynxError::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            LynxError::PermissionDenied { .. }
            | LynxError::Read { .. }
            | LynxError::Write { .. }
            | LynxError::AtomicWriteFailed { .. } => ErrorKind::Io,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            LynxError::PermissionDenied { .. } => {
                Some("Check file and directory permissions.")
            }
            LynxError::MalformedRecord { .. } => {
                Some("Field values must not contain '^' or '+'. Fix the reported line by hand.")
            }
            LynxError::AtomicWriteFailed { .. } => {
                Some("The previous file is untouched. A leftover temporary file may be removed.")
            }
            LynxError::DuplicateId(_) => {
                Some("Pick an unused id, or let the store allocate one.")
            }
            _ => None,
        }
    }
}

/// Result type for store operations
pub type LynxResult<T> = Result<T, LynxError>;
