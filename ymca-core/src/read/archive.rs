use super::reader::ArchiveReader;
use crate::container::record::RawRecord;
use crate::crypto::xor::XorKey;
use crate::domain::Message;
use crate::error::Result;
use crate::zone::Zone;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use time::UtcOffset;
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// Fixed offset applied to every timestamp. `None` converts each record
    /// with the local zone's offset at that record's instant.
    pub utc_offset: Option<UtcOffset>,
}

impl DecodeOptions {
    pub fn utc() -> Self {
        Self {
            utc_offset: Some(UtcOffset::UTC),
        }
    }

    pub fn zone(&self) -> Zone {
        self.utc_offset.map_or(Zone::Local, Zone::Fixed)
    }
}

/// Decode a whole archive stream. The first error aborts the parse.
pub fn parse<R: Read>(src: R, key: &XorKey, opts: &DecodeOptions) -> Result<Vec<Message>> {
    ArchiveReader::new(src).messages(key, opts.zone()).collect()
}

/// Structural pass only: validates padding and framing, no key needed.
pub fn scan<R: Read>(src: R) -> Result<Vec<RawRecord>> {
    ArchiveReader::new(src).collect()
}

/// Open `path`, decode it with `username` as the key, and close it again.
pub fn read_archive(path: &Path, username: &str, opts: &DecodeOptions) -> Result<Vec<Message>> {
    let key = XorKey::from_username(username)?;
    let f = File::open(path)?;
    debug!("decoding {}", path.display());
    let msgs = parse(BufReader::new(f), &key, opts)?;
    debug!("{}: {} messages", path.display(), msgs.len());
    Ok(msgs)
}

/// Structural pass over a file on disk.
pub fn scan_archive(path: &Path) -> Result<Vec<RawRecord>> {
    let f = File::open(path)?;
    scan(BufReader::new(f))
}

/// Decode independent archives in parallel. Results keep the input order,
/// and one file failing does not affect the others.
pub fn read_many<P>(
    paths: &[P],
    username: &str,
    opts: &DecodeOptions,
) -> Vec<(PathBuf, Result<Vec<Message>>)>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|p| {
            let p = p.as_ref();
            (p.to_path_buf(), read_archive(p, username, opts))
        })
        .collect()
}
