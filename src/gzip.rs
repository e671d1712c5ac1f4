use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, warn};

use crate::error::CaptureError;
use crate::source::ByteSource;

/// Decompression/compression chunk size
const CHUNK_LEN: usize = 8 * 1024;

/// Bulk-inflate a gzip-wrapped source into `sink`.
///
/// Random access over a compressed stream is infeasible without an index, so
/// a compressed capture is materialized in full to a scratch sink and the
/// engine runs against that. The sink is rewound before returning. Returns
/// the number of decompressed bytes.
pub fn decompress_to(src: &mut ByteSource, sink: &mut ByteSource) -> Result<u64, CaptureError> {
    src.rewind().map_err(|_| CaptureError::Io)?;
    let mut decoder = GzDecoder::new(src.file_mut());
    let mut chunk = [0u8; CHUNK_LEN];
    let mut total = 0u64;
    loop {
        let count = match decoder.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("gzip inflate failed: {}", e);
                return Err(CaptureError::Compression);
            }
        };
        sink.write_bytes(&chunk[..count])
            .map_err(|_| CaptureError::Compression)?;
        total += count as u64;
    }
    sink.rewind().map_err(|_| CaptureError::Io)?;
    debug!("decompressed {} bytes to {}", total, sink.path().display());
    Ok(total)
}

/// Deflate the full contents of `src` into a gzip stream at `dest`,
/// finalizing the stream.
pub fn compress_to<P: AsRef<Path>>(src: &mut ByteSource, dest: P) -> Result<(), CaptureError> {
    src.rewind().map_err(|_| CaptureError::Io)?;
    let out = std::fs::File::create(dest.as_ref()).map_err(|_| CaptureError::Permission)?;
    let mut encoder = GzEncoder::new(out, Compression::default());
    let mut chunk = [0u8; CHUNK_LEN];
    loop {
        let count = src
            .file_mut()
            .read(&mut chunk)
            .map_err(|_| CaptureError::Io)?;
        if count == 0 {
            break;
        }
        std::io::Write::write_all(&mut encoder, &chunk[..count])
            .map_err(|_| CaptureError::Compression)?;
    }
    encoder.finish().map_err(|_| CaptureError::Compression)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn inflate_round_trip() {
        let payload: Vec<u8> = (0u8..=255).cycle().take(20_000).collect();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload).unwrap();
        let gz = encoder.finish().unwrap();

        let mut src = ByteSource::scratch(".gz").unwrap();
        src.write_bytes(&gz).unwrap();
        let mut sink = ByteSource::scratch(".pcap").unwrap();
        let total = decompress_to(&mut src, &mut sink).unwrap();
        assert_eq!(total, payload.len() as u64);
        let back = sink.read_vec(payload.len()).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn inflate_rejects_garbage() {
        let mut src = ByteSource::scratch(".gz").unwrap();
        src.write_bytes(&[0x1F, 0x8B, 0xFF, 0xFF, 0x00, 0x01, 0x02]).unwrap();
        let mut sink = ByteSource::scratch(".pcap").unwrap();
        assert_eq!(
            decompress_to(&mut src, &mut sink),
            Err(CaptureError::Compression)
        );
    }
}
