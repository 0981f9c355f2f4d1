use std::io::{ErrorKind, Read, Result};

/// Read wrapper that tracks the absolute byte position consumed so far.
pub struct PositionedReader<R: Read> {
    inner: R,
    pos: u64,
}

impl<R: Read> PositionedReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read until `buf` is full or the stream ends. Returns the byte count;
    /// anything short of `buf.len()` means EOF was reached.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut got = 0;
        while got < buf.len() {
            match self.read(&mut buf[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(got)
    }
}

impl<R: Read> Read for PositionedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}
