//! Error types for the embedding store.
//!
//! Every variant carries the underlying cause as a string so callers can
//! render a specific message. [`StoreError::kind`] gives a stable,
//! payload-free discriminant for matching and metrics.

use std::fmt;

use facegate_core::{IdentityId, IdentityName};
use facegate_settings::EmbeddingEncoding;
use thiserror::Error;

/// Errors returned by store operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Backend unreachable, pool creation failed, or migrations failed at
    /// open. Fatal: no store is constructed.
    #[error("store connection failed: {0}")]
    ConnectFailed(String),

    /// An insert or update was rejected; the transaction was rolled back.
    #[error("store write failed: {0}")]
    WriteFailed(String),

    /// An embedding could not be decoded or has the wrong length.
    #[error("corrupt embedding encoding: {0}")]
    CorruptEncoding(String),

    /// A fallible read failed at the backend.
    #[error("store read failed: {0}")]
    ReadFailed(String),

    /// The id or the name is already taken by an enrolled identity.
    #[error("identity already enrolled: id {id} or name '{name}' is taken")]
    AlreadyEnrolled {
        /// Requested id.
        id: IdentityId,
        /// Requested name.
        name: IdentityName,
    },

    /// The database was created with a different embedding encoding.
    #[error("embedding encoding mismatch: database uses {stored}, configured {configured}")]
    EncodingMismatch {
        /// Encoding recorded in the database.
        stored: String,
        /// Encoding the store was opened with.
        configured: EmbeddingEncoding,
    },
}

/// Payload-free error discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// See [`StoreError::ConnectFailed`].
    ConnectFailed,
    /// See [`StoreError::WriteFailed`].
    WriteFailed,
    /// See [`StoreError::CorruptEncoding`].
    CorruptEncoding,
    /// See [`StoreError::ReadFailed`].
    ReadFailed,
    /// See [`StoreError::AlreadyEnrolled`].
    AlreadyEnrolled,
    /// See [`StoreError::EncodingMismatch`].
    EncodingMismatch,
}

impl StoreErrorKind {
    /// Stable snake_case code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConnectFailed => "connect_failed",
            Self::WriteFailed => "write_failed",
            Self::CorruptEncoding => "corrupt_encoding",
            Self::ReadFailed => "read_failed",
            Self::AlreadyEnrolled => "already_enrolled",
            Self::EncodingMismatch => "encoding_mismatch",
        }
    }
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StoreError {
    /// The error's kind.
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::ConnectFailed(_) => StoreErrorKind::ConnectFailed,
            Self::WriteFailed(_) => StoreErrorKind::WriteFailed,
            Self::CorruptEncoding(_) => StoreErrorKind::CorruptEncoding,
            Self::ReadFailed(_) => StoreErrorKind::ReadFailed,
            Self::AlreadyEnrolled { .. } => StoreErrorKind::AlreadyEnrolled,
            Self::EncodingMismatch { .. } => StoreErrorKind::EncodingMismatch,
        }
    }

    pub(crate) fn connect(cause: impl fmt::Display) -> Self {
        Self::ConnectFailed(cause.to_string())
    }

    pub(crate) fn write(cause: impl fmt::Display) -> Self {
        Self::WriteFailed(cause.to_string())
    }

    pub(crate) fn read(cause: impl fmt::Display) -> Self {
        Self::ReadFailed(cause.to_string())
    }

    pub(crate) fn corrupt(cause: impl fmt::Display) -> Self {
        Self::CorruptEncoding(cause.to_string())
    }
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let cases = vec![
            (
                StoreError::ConnectFailed("unable to open database file".into()),
                "store connection failed: unable to open database file",
            ),
            (
                StoreError::WriteFailed("database is locked".into()),
                "store write failed: database is locked",
            ),
            (
                StoreError::CorruptEncoding("blob length 12".into()),
                "corrupt embedding encoding: blob length 12",
            ),
            (
                StoreError::ReadFailed("disk I/O error".into()),
                "store read failed: disk I/O error",
            ),
            (
                StoreError::AlreadyEnrolled {
                    id: IdentityId::new(7).unwrap(),
                    name: IdentityName::parse("Alice").unwrap(),
                },
                "identity already enrolled: id 7 or name 'Alice' is taken",
            ),
            (
                StoreError::EncodingMismatch {
                    stored: "binary".into(),
                    configured: EmbeddingEncoding::Text,
                },
                "embedding encoding mismatch: database uses binary, configured text",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(StoreError::write("x").kind(), StoreErrorKind::WriteFailed);
        assert_eq!(StoreError::read("x").kind().as_str(), "read_failed");
        assert_eq!(StoreError::connect("x").kind().to_string(), "connect_failed");
        assert_eq!(
            StoreError::corrupt("x").kind(),
            StoreErrorKind::CorruptEncoding
        );
    }

    #[test]
    fn constructors_keep_cause() {
        let err = StoreError::write(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().contains("Query returned no rows"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
