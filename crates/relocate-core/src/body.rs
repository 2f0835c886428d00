//! Entry bodies as seen by the transcoder
//!
//! Most entries are streamed straight from the input archive into the output.
//! Entries whose content must be inspected or replaced are materialized first.
//! Both forms are plain readers so every entry is written the same way.

use std::fmt;
use std::io::{self, Cursor, Read};

pub enum EntryBody<'a> {
    /// Bytes pulled from the input on demand
    Stream(&'a mut dyn Read),
    /// Fully buffered content
    Buffered(Cursor<Vec<u8>>),
}

impl EntryBody<'_> {
    pub fn buffered(content: Vec<u8>) -> Self {
        EntryBody::Buffered(Cursor::new(content))
    }
}

impl Read for EntryBody<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            EntryBody::Stream(reader) => reader
                .read(buf)
                .map_err(|e| io::Error::new(e.kind(), SourceFailure(e))),
            EntryBody::Buffered(cursor) => cursor.read(buf),
        }
    }
}

/// Marks an I/O error raised by the input side of a streamed body, so a
/// failed copy can be attributed to the reader or the writer.
#[derive(Debug)]
struct SourceFailure(io::Error);

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for SourceFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Side of a body copy that failed
#[derive(Debug)]
pub enum CopyFailure {
    Read(io::Error),
    Write(io::Error),
}

impl CopyFailure {
    /// Classify an error returned while copying an [`EntryBody`] into the output
    pub fn classify(err: io::Error) -> Self {
        if !err.get_ref().is_some_and(|inner| inner.is::<SourceFailure>()) {
            return CopyFailure::Write(err);
        }
        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<SourceFailure>()) {
            Some(Ok(failure)) => CopyFailure::Read(failure.0),
            _ => CopyFailure::Read(io::Error::from(kind)),
        }
    }
}

/// Read a whole entry body into memory
///
/// `size_hint` is the size declared by the entry header.
pub fn materialize<R: Read + ?Sized>(reader: &mut R, size_hint: u64) -> io::Result<Vec<u8>> {
    let mut content = Vec::with_capacity(usize::try_from(size_hint).unwrap_or(0).min(1 << 20));
    reader.read_to_end(&mut content)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_and_buffered_read_the_same() {
        let data = b"replicaCount: 1\n".to_vec();

        let mut source = &data[..];
        let mut streamed = Vec::new();
        EntryBody::Stream(&mut source)
            .read_to_end(&mut streamed)
            .unwrap();

        let mut buffered = Vec::new();
        EntryBody::buffered(data.clone())
            .read_to_end(&mut buffered)
            .unwrap();

        assert_eq!(streamed, data);
        assert_eq!(buffered, data);
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"))
        }
    }

    #[test]
    fn test_classify_copy_failures() {
        let mut failing = Failing;
        let err = io::copy(&mut EntryBody::Stream(&mut failing), &mut io::sink()).unwrap_err();
        match CopyFailure::classify(err) {
            CopyFailure::Read(e) => {
                assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof);
                assert_eq!(e.to_string(), "truncated");
            }
            CopyFailure::Write(e) => panic!("expected a read failure, got {e}"),
        }

        let err = io::Error::new(io::ErrorKind::StorageFull, "disk full");
        assert!(matches!(CopyFailure::classify(err), CopyFailure::Write(_)));
    }

    #[test]
    fn test_materialize_ignores_bogus_hint() {
        let mut source = &b"abc"[..];
        let content = materialize(&mut source, u64::MAX).unwrap();
        assert_eq!(content, b"abc");
    }
}
