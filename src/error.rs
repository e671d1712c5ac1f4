use nom::error::{ErrorKind, ParseError};
use std::error::Error;
use std::fmt;

/// The error type which is returned when parsing a capture file
#[derive(Debug, PartialEq)]
pub enum PcapError<I: Sized> {
    /// No more data available
    Eof,
    /// Expected more data but got EOF
    UnexpectedEof,
    /// An error happened during a read operation
    ReadError,
    /// Last record is incomplete, and no more data available
    Incomplete(usize),
    /// File could not be recognized as Pcap nor PcapNG
    HeaderNotRecognized,
    /// An error encountered during parsing
    NomError(I, ErrorKind),
}

impl<I> PcapError<I> {
    /// Drop the input from the error, so it can outlive the parsed buffer
    pub fn to_owned(&self) -> PcapError<()> {
        match self {
            PcapError::Eof => PcapError::Eof,
            PcapError::UnexpectedEof => PcapError::UnexpectedEof,
            PcapError::ReadError => PcapError::ReadError,
            PcapError::Incomplete(n) => PcapError::Incomplete(*n),
            PcapError::HeaderNotRecognized => PcapError::HeaderNotRecognized,
            PcapError::NomError(_, k) => PcapError::NomError((), *k),
        }
    }
}

impl<I> ParseError<I> for PcapError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        PcapError::NomError(input, kind)
    }
    fn append(input: I, kind: ErrorKind, _other: Self) -> Self {
        PcapError::NomError(input, kind)
    }
}

impl<I> fmt::Display for PcapError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PcapError::Eof => write!(f, "End of file"),
            PcapError::UnexpectedEof => write!(f, "Unexpected end of file"),
            PcapError::ReadError => write!(f, "Read error"),
            PcapError::Incomplete(n) => write!(f, "Incomplete read: {}", n),
            PcapError::HeaderNotRecognized => write!(f, "Header not recognized as PCAP or PCAPNG"),
            PcapError::NomError(_, e) => write!(f, "Internal parser error {:?}", e),
        }
    }
}

impl<I: fmt::Debug> Error for PcapError<I> {}

/// Category of failure recorded by a capture engine.
///
/// Engines signal construction failure through their `valid` flag and
/// per-operation failure through absent return values; the category of the
/// last failure is kept so callers can tell a truncated file from a denied
/// write.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaptureError {
    /// Short read, short write or seek failure on the byte source
    Io,
    /// Unknown magic, bad length trailer, option-list overrun or truncated record
    Format,
    /// gzip initialization failure, bad stream, or scratch-file write failure
    Compression,
    /// Write requested on a read-only capture, or OS-level denial
    Permission,
    /// Requested index out of range
    Invariant,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Io => write!(f, "I/O error"),
            CaptureError::Format => write!(f, "Malformed capture file"),
            CaptureError::Compression => write!(f, "Compression error"),
            CaptureError::Permission => write!(f, "Permission denied"),
            CaptureError::Invariant => write!(f, "Index out of range"),
        }
    }
}

impl Error for CaptureError {}
