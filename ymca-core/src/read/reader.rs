use crate::container::record::RawRecord;
use crate::crypto::xor::{XorKey, decrypt_text};
use crate::domain::Message;
use crate::error::Result;
use crate::markup;
use crate::util::position::PositionedReader;
use crate::zone::Zone;
use std::io::Read;
use tracing::trace;

/// Sequential record walker over a chat archive stream.
///
/// Yields raw records in file order and stops after the first error.
pub struct ArchiveReader<R: Read> {
    src: PositionedReader<R>,
    done: bool,
}

impl<R: Read> ArchiveReader<R> {
    pub fn new(src: R) -> Self {
        Self {
            src: PositionedReader::new(src),
            done: false,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.src.position()
    }

    /// `Ok(None)` at a clean end of stream.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>> {
        if self.done {
            return Ok(None);
        }
        let res = RawRecord::read_from(&mut self.src);
        if !matches!(res, Ok(Some(_))) {
            self.done = true;
        }
        res
    }

    /// Decode records into messages with `key`, converting timestamps in `zone`.
    pub fn messages(self, key: &XorKey, zone: Zone) -> Messages<'_, R> {
        Messages {
            inner: self,
            key,
            zone,
        }
    }
}

impl<R: Read> Iterator for ArchiveReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Message-producing view of an [`ArchiveReader`].
pub struct Messages<'k, R: Read> {
    inner: ArchiveReader<R>,
    key: &'k XorKey,
    zone: Zone,
}

impl<R: Read> Iterator for Messages<'_, R> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        let rec = match self.inner.next()? {
            Ok(rec) => rec,
            Err(e) => return Some(Err(e)),
        };
        let msg = decode_record(rec, self.key, self.zone);
        if msg.is_err() {
            self.inner.done = true;
        }
        Some(msg)
    }
}

/// Turn one raw record into a message. Empty bodies skip decryption.
pub fn decode_record(rec: RawRecord, key: &XorKey, zone: Zone) -> Result<Message> {
    trace!(
        offset = rec.offset,
        len = rec.ciphertext.len(),
        flag = rec.direction_flag,
        "record"
    );
    let timestamp = zone.to_civil(rec.epoch_seconds)?;
    let direction = rec.direction();
    let content = if rec.ciphertext.is_empty() {
        String::new()
    } else {
        let at = rec.ciphertext_offset();
        let text = decrypt_text(rec.ciphertext, key, at)?;
        markup::strip(&text).into_owned()
    };
    Ok(Message::new(timestamp, direction, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::xor::transform;
    use crate::domain::Direction;
    use crate::error::YmcaError;
    use time::UtcOffset;

    fn record(ts: u32, flag: u8, body: &[u8]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&ts.to_le_bytes());
        v.extend_from_slice(&[0, 0, 0, 0, flag, 0, 0, 0, body.len() as u8, 0, 0, 0]);
        v.extend_from_slice(body);
        v.extend_from_slice(&[0; 4]);
        v
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut bytes = record(1, 0, b"");
        bytes.extend_from_slice(&[1, 2]);
        bytes.extend_from_slice(&record(2, 0, b""));
        let mut r = ArchiveReader::new(&bytes[..]);
        assert!(r.next().unwrap().is_ok());
        assert!(r.next().unwrap().is_err());
        assert!(r.next().is_none());
    }

    #[test]
    fn offsets_advance_across_records() {
        let mut bytes = record(1, 0, b"abcd");
        bytes.extend_from_slice(&record(2, 1, b""));
        let recs: Vec<_> = ArchiveReader::new(&bytes[..])
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(recs[0].offset, 0);
        assert_eq!(recs[1].offset, 24);
    }

    #[test]
    fn decode_uses_offset_and_strips_markup() {
        let key = XorKey::from_username("owner").unwrap();
        let body = transform(b"<font face=Tahoma>hey\x1B[#00ff00m!", &key);
        let bytes = record(1_700_000_000, 0, &body);
        let plus_two = UtcOffset::from_hms(2, 0, 0).unwrap();
        let msgs: Vec<_> = ArchiveReader::new(&bytes[..])
            .messages(&key, Zone::Fixed(plus_two))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].content(), "hey!");
        assert_eq!(msgs[0].direction(), Direction::Sent);
        assert_eq!(msgs[0].timestamp().offset(), plus_two);
        assert_eq!(msgs[0].timestamp().unix_timestamp(), 1_700_000_000);
        assert_eq!(msgs[0].timestamp().hour(), 0); // 22:13:20 UTC
    }

    #[test]
    fn decode_error_fuses_message_iterator() {
        let key = XorKey::from_username("k").unwrap();
        let mut bytes = record(1, 1, &transform(&[0xC3], &key));
        bytes.extend_from_slice(&record(2, 1, b""));
        let mut it = ArchiveReader::new(&bytes[..]).messages(&key, Zone::Fixed(UtcOffset::UTC));
        match it.next() {
            Some(Err(YmcaError::Decode { offset, .. })) => assert_eq!(offset, 16),
            other => panic!("unexpected {other:?}"),
        }
        assert!(it.next().is_none());
    }
}
