use crate::error::{Result, YmcaError};

/// Repeating XOR key: the UTF-8 bytes of the archive owner's username.
///
/// This is obfuscation, not confidentiality. The key is never stored in the
/// archive and must be supplied by the caller for every decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XorKey(Vec<u8>);

impl XorKey {
    /// Rejects empty keys.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(YmcaError::InvalidKey);
        }
        Ok(Self(bytes))
    }

    pub fn from_username(username: &str) -> Result<Self> {
        Self::new(username.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// out[i] = buf[i] ^ key[i % key.len()]
pub fn transform_in_place(buf: &mut [u8], key: &XorKey) {
    for (b, k) in buf.iter_mut().zip(key.0.iter().cycle()) {
        *b ^= k;
    }
}

/// Applying this twice with the same key yields the input again.
pub fn transform(bytes: &[u8], key: &XorKey) -> Vec<u8> {
    let mut out = bytes.to_vec();
    transform_in_place(&mut out, key);
    out
}

/// Decrypt a message body and require UTF-8. `offset` is reported on failure.
pub fn decrypt_text(mut ciphertext: Vec<u8>, key: &XorKey, offset: u64) -> Result<String> {
    transform_in_place(&mut ciphertext, key);
    String::from_utf8(ciphertext).map_err(|source| YmcaError::Decode { offset, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(XorKey::new(Vec::<u8>::new()), Err(YmcaError::InvalidKey)));
        assert!(matches!(XorKey::from_username(""), Err(YmcaError::InvalidKey)));
    }

    #[test]
    fn key_cycles_over_input() {
        let key = XorKey::new(vec![0x01u8, 0x02, 0x03]).unwrap();
        let input: Vec<u8> = (0u8..10).map(|i| i.wrapping_mul(37)).collect();
        let out = transform(&input, &key);
        assert_eq!(out.len(), input.len());
        for (i, b) in out.iter().enumerate() {
            assert_eq!(*b, input[i] ^ key.as_bytes()[i % 3], "index {i}");
        }
    }

    #[test]
    fn transform_is_involution() {
        let samples: [&[u8]; 4] = [b"", b"a", b"hello world", &[0u8, 0xFF, 0x7F, 0x80, 0x1B]];
        for name in ["x", "alice", "\u{00e9}mile_longer_than_input_by_far"] {
            let key = XorKey::from_username(name).unwrap();
            for s in samples {
                assert_eq!(transform(&transform(s, &key), &key), s);
            }
        }
    }

    #[test]
    fn non_ascii_username_keys_by_utf8_bytes() {
        let key = XorKey::from_username("é").unwrap();
        assert_eq!(key.as_bytes(), &[0xC3, 0xA9]);
    }

    #[test]
    fn decrypt_text_reports_offset_on_bad_utf8() {
        let key = XorKey::from_username("k").unwrap();
        let ct = transform(&[0xFF, 0xFE], &key);
        let err = decrypt_text(ct, &key, 42).unwrap_err();
        assert_eq!(err.offset(), Some(42));
        assert!(matches!(err, YmcaError::Decode { .. }));
    }
}
