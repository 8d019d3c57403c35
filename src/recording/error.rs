//! Recording Errors

use std::path::PathBuf;

// =============================================================================
// Mapping Errors
// =============================================================================

/// A single event could not be flattened into a ledger row.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingError {
    /// A field every row needs was not set on the event.
    MissingField(&'static str),
    /// A field was set but cannot be written (e.g. NaN).
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field '{}'", field),
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for MappingError {}

// =============================================================================
// Ledger Errors
// =============================================================================

/// Failure to create, open or flush a ledger file.
#[derive(Debug)]
pub enum LedgerError {
    CreateDir { path: PathBuf, source: std::io::Error },
    Open { path: PathBuf, source: std::io::Error },
    Csv { path: PathBuf, source: csv::Error },
    Io { path: PathBuf, source: std::io::Error },
}

impl LedgerError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::CreateDir { path, .. }
            | Self::Open { path, .. }
            | Self::Csv { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "failed to create directory {}: {}", path.display(), source)
            }
            Self::Open { path, source } => {
                write!(f, "failed to open ledger {}: {}", path.display(), source)
            }
            Self::Csv { path, source } => {
                write!(f, "CSV error on ledger {}: {}", path.display(), source)
            }
            Self::Io { path, source } => {
                write!(f, "I/O error on ledger {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } | Self::Open { source, .. } | Self::Io { source, .. } => {
                Some(source)
            }
            Self::Csv { source, .. } => Some(source),
        }
    }
}

// =============================================================================
// Per-Record Errors
// =============================================================================

/// Why one record of a batch was not written.
#[derive(Debug)]
pub enum RecordError {
    Mapping(MappingError),
    Write(csv::Error),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mapping(e) => write!(f, "mapping failed: {}", e),
            Self::Write(e) => write!(f, "write failed: {}", e),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<MappingError> for RecordError {
    fn from(e: MappingError) -> Self {
        Self::Mapping(e)
    }
}

impl From<csv::Error> for RecordError {
    fn from(e: csv::Error) -> Self {
        Self::Write(e)
    }
}
