#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod markup;
pub mod stats;
pub mod zone;

pub mod util {
    pub mod position;
}

pub mod crypto {
    pub mod xor;
}

pub mod container {
    pub mod record;
}

pub mod read {
    pub mod archive;
    pub mod reader;
}

// Re-exports: stable API surface
pub use container::record::RawRecord;
pub use crypto::xor::{XorKey, transform};
pub use domain::{Direction, Message};
pub use error::{FormatErrorKind, Result, YmcaError};
pub use read::archive::{DecodeOptions, parse, read_archive, read_many, scan, scan_archive};
pub use read::reader::ArchiveReader;
pub use stats::{Summary, summarize};
pub use zone::Zone;
