use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YmcaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural violation; `offset` is absolute within the archive.
    #[error("Format error at offset {offset}: {kind}")]
    Format { offset: u64, kind: FormatErrorKind },

    /// Decrypted message body is not UTF-8. `offset` points at the ciphertext.
    #[error("Decode error at offset {offset}: {source}")]
    Decode {
        offset: u64,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Invalid key: cipher key must not be empty")]
    InvalidKey,

    #[error("Timestamp out of range: {0}")]
    Timestamp(#[from] time::error::ComponentRange),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// A padding byte that must be zero was not.
    NonZeroPadding { value: u8 },
    /// The stream ended inside a record.
    Truncated { field: &'static str },
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatErrorKind::NonZeroPadding { value } => {
                write!(f, "3 all-zero bytes expected, found {value:#04x}")
            }
            FormatErrorKind::Truncated { field } => {
                write!(f, "stream ended inside record while reading {field}")
            }
        }
    }
}

impl YmcaError {
    /// Byte offset for structural and decode failures.
    pub fn offset(&self) -> Option<u64> {
        match self {
            YmcaError::Format { offset, .. } | YmcaError::Decode { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, YmcaError>;
