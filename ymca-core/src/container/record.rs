use crate::domain::Direction;
use crate::error::{FormatErrorKind, Result, YmcaError};
use crate::util::position::PositionedReader;
use std::io::Read;

/// Fixed part of a record before the ciphertext.
pub const HEADER_LEN: u64 = 16;
/// Opaque trailer after the ciphertext.
pub const FOOTER_LEN: usize = 4;
/// u32 LE seconds plus one unused byte.
pub const TIMESTAMP_FIELD_LEN: usize = 5;
pub const PADDING_LEN: usize = 3;

/// One record as stored on disk, before decryption.
///
/// Layout (little-endian):
/// `[0..4]` epoch seconds, `[4]` unused, `[5..8]` zero,
/// `[8]` direction flag, `[9..12]` zero, `[12]` body length, `[13..16]` zero,
/// `[16..16+len]` body, then a 4-byte footer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRecord {
    /// Absolute offset of the record's first byte.
    pub offset: u64,
    pub epoch_seconds: u32,
    pub direction_flag: u8,
    pub ciphertext: Vec<u8>,
    pub footer: [u8; FOOTER_LEN],
}

impl RawRecord {
    pub fn direction(&self) -> Direction {
        Direction::from_flag(self.direction_flag)
    }

    pub fn ciphertext_offset(&self) -> u64 {
        self.offset + HEADER_LEN
    }

    /// Total bytes this record occupied on disk.
    pub fn encoded_len(&self) -> u64 {
        HEADER_LEN + self.ciphertext.len() as u64 + FOOTER_LEN as u64
    }

    /// Read the next record. `Ok(None)` only when the stream is exhausted
    /// exactly at a record boundary.
    pub fn read_from<R: Read>(r: &mut PositionedReader<R>) -> Result<Option<Self>> {
        let offset = r.position();

        let mut ts = [0u8; TIMESTAMP_FIELD_LEN];
        match r.fill(&mut ts)? {
            0 => return Ok(None),
            TIMESTAMP_FIELD_LEN => {}
            _ => return Err(truncated(offset, "timestamp")),
        }
        let epoch_seconds = u32::from_le_bytes([ts[0], ts[1], ts[2], ts[3]]);

        expect_zeros(r)?;
        let [direction_flag] = read_field::<_, 1>(r, "direction flag")?;
        expect_zeros(r)?;
        let [len] = read_field::<_, 1>(r, "content length")?;
        expect_zeros(r)?;

        let mut ciphertext = vec![0u8; len as usize];
        if len > 0 {
            let at = r.position();
            if r.fill(&mut ciphertext)? < ciphertext.len() {
                return Err(truncated(at, "content"));
            }
        }

        let footer = read_field::<_, FOOTER_LEN>(r, "footer")?;

        Ok(Some(Self {
            offset,
            epoch_seconds,
            direction_flag,
            ciphertext,
            footer,
        }))
    }
}

fn truncated(offset: u64, field: &'static str) -> YmcaError {
    YmcaError::Format {
        offset,
        kind: FormatErrorKind::Truncated { field },
    }
}

fn read_field<R: Read, const N: usize>(
    r: &mut PositionedReader<R>,
    field: &'static str,
) -> Result<[u8; N]> {
    let at = r.position();
    let mut buf = [0u8; N];
    if r.fill(&mut buf)? < N {
        return Err(truncated(at, field));
    }
    Ok(buf)
}

/// Consume a padding triplet; a non-zero byte is reported at its own offset.
fn expect_zeros<R: Read>(r: &mut PositionedReader<R>) -> Result<()> {
    let at = r.position();
    let pad = read_field::<_, PADDING_LEN>(r, "padding")?;
    if let Some((i, &value)) = pad.iter().enumerate().find(|(_, b)| **b != 0) {
        return Err(YmcaError::Format {
            offset: at + i as u64,
            kind: FormatErrorKind::NonZeroPadding { value },
        });
    }
    Ok(())
}
