use std::path::Path;

use log::debug;

use crate::error::CaptureError;
use crate::gzip;
use crate::source::ByteSource;

/// Compression state of a capture file.
///
/// `Autodetect` is a request: after a successful open the effective value is
/// always `Uncompressed` or `Compressed`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaptureCompression {
    Autodetect,
    Uncompressed,
    Compressed,
    Unknown,
}

impl CaptureCompression {
    pub fn name(self) -> &'static str {
        match self {
            CaptureCompression::Autodetect => "autodetect",
            CaptureCompression::Uncompressed => "uncompressed",
            CaptureCompression::Compressed => "gzip",
            CaptureCompression::Unknown => "?",
        }
    }
}

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Peek the first two bytes of `src` and classify the stream.
///
/// The read position is restored in all cases.
pub fn detect_capture_compression(src: &mut ByteSource) -> CaptureCompression {
    let mut magic = [0u8; 2];
    if src.peek(&mut magic).is_err() {
        return CaptureCompression::Unknown;
    }
    if magic == GZIP_MAGIC {
        CaptureCompression::Compressed
    } else {
        CaptureCompression::Uncompressed
    }
}

/// Open `path` and resolve compression: a gzip-wrapped capture is
/// materialized to a `.pcap` scratch file which becomes the effective source.
///
/// On return `compression` is `Uncompressed` or `Compressed`.
pub(crate) fn resolve_source(
    path: &Path,
    compression: &mut CaptureCompression,
    read_only: bool,
) -> Result<ByteSource, CaptureError> {
    let mut source = ByteSource::open(path, read_only).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            CaptureError::Permission
        } else {
            CaptureError::Io
        }
    })?;
    if *compression == CaptureCompression::Autodetect {
        *compression = detect_capture_compression(&mut source);
        debug!("{}: detected {}", path.display(), compression.name());
    }
    match *compression {
        CaptureCompression::Uncompressed => Ok(source),
        CaptureCompression::Compressed => {
            let mut scratch =
                ByteSource::scratch(".pcap").map_err(|_| CaptureError::Compression)?;
            gzip::decompress_to(&mut source, &mut scratch)?;
            Ok(scratch)
        }
        // a two-byte probe failed: the file cannot hold a capture header either
        CaptureCompression::Autodetect | CaptureCompression::Unknown => Err(CaptureError::Io),
    }
}

/// A `(major, minor)` format version pair.
///
/// Ordering is strict lexicographic on `major`, then `minor`.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16) -> Version {
        Version { major, minor }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Generic interface for capture file access
pub trait Capture {
    /// True if construction fully succeeded. An invalid capture owns no
    /// observable state beyond released resources.
    fn valid(&self) -> bool;

    /// Category of the failure that invalidated the capture, if any
    fn error(&self) -> Option<CaptureError>;

    /// Effective compression of the backing file
    fn compression(&self) -> CaptureCompression;
}
