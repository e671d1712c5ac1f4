use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use hex_literal::hex;
use tempfile::tempdir;

use capfile::{Capture, CaptureCompression, CaptureError, PcapCapture};

const CAPTURE_STANDARD_LE: &[u8] = &hex!(
    "
D4 C3 B2 A1 02 00 04 00 00 00 00 00 00 00 00 00
40 00 00 00 01 00 00 00
01 00 00 00 02 00 00 00 04 00 00 00 04 00 00 00
DE AD BE EF"
);

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn autodetect_opens_gzip_wrapped_capture() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wrapped.pcap.gz");
    std::fs::write(&path, gzip(CAPTURE_STANDARD_LE)).unwrap();

    let mut capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    assert_eq!(capture.compression(), CaptureCompression::Compressed);
    assert_eq!(capture.packet_count(), 1);
    assert_eq!(
        capture.get_packet(0).expect("packet 0").data,
        hex!("DE AD BE EF")
    );
}

#[test]
fn scratch_file_lives_and_dies_with_the_engine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wrapped.pcap.gz");
    std::fs::write(&path, gzip(CAPTURE_STANDARD_LE)).unwrap();

    let scratch: PathBuf = {
        let capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
        assert!(capture.valid());
        let scratch = capture.source_path().expect("effective source").to_path_buf();
        // the engine runs against a .pcap scratch file in the temp dir
        assert_ne!(scratch, path);
        assert_eq!(scratch.extension(), Some(OsStr::new("pcap")));
        assert!(scratch.starts_with(std::env::temp_dir()));
        assert!(scratch.exists());
        scratch
    };
    assert!(!scratch.exists());
}

#[test]
fn compressed_and_plain_twins_expose_identical_packets() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("twin.pcap");
    let wrapped = dir.path().join("twin.pcap.gz");
    std::fs::write(&plain, CAPTURE_STANDARD_LE).unwrap();
    std::fs::write(&wrapped, gzip(CAPTURE_STANDARD_LE)).unwrap();

    let mut a = PcapCapture::open(&plain, CaptureCompression::Autodetect, true, false);
    let mut b = PcapCapture::open(&wrapped, CaptureCompression::Autodetect, true, false);
    assert!(a.valid() && b.valid());
    assert_eq!(a.compression(), CaptureCompression::Uncompressed);
    assert_eq!(b.compression(), CaptureCompression::Compressed);
    assert_eq!(a.packet_count(), b.packet_count());
    assert_eq!(a.header().snaplen, b.header().snaplen);
    assert_eq!(a.get_packet(0).unwrap().data, b.get_packet(0).unwrap().data);
}

#[test]
fn explicit_hint_skips_the_probe() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wrapped.pcap.gz");
    std::fs::write(&path, gzip(CAPTURE_STANDARD_LE)).unwrap();

    let capture = PcapCapture::open(&path, CaptureCompression::Compressed, true, false);
    assert!(capture.valid());

    // forcing Uncompressed makes the gzip bytes hit the magic check
    let capture = PcapCapture::open(&path, CaptureCompression::Uncompressed, true, false);
    assert!(!capture.valid());
    assert_eq!(capture.error(), Some(CaptureError::Format));
}

#[test]
fn bad_gzip_stream_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.pcap.gz");
    std::fs::write(&path, hex!("1F 8B FF FF 00 01 02 03")).unwrap();

    let capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(!capture.valid());
    assert_eq!(capture.error(), Some(CaptureError::Compression));
}

#[test]
fn save_recompresses_to_the_original_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rw.pcap.gz");
    std::fs::write(&path, gzip(CAPTURE_STANDARD_LE)).unwrap();

    let mut capture = PcapCapture::open(&path, CaptureCompression::Autodetect, false, false);
    assert!(capture.valid());
    assert!(capture.save());
    drop(capture);

    // still a finalized gzip stream at the original path
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0x1F, 0x8B]);

    let mut reopened = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(reopened.valid());
    assert_eq!(reopened.compression(), CaptureCompression::Compressed);
    assert_eq!(reopened.packet_count(), 1);
    assert_eq!(
        reopened.get_packet(0).expect("packet 0").data,
        hex!("DE AD BE EF")
    );
}
