use hex_literal::hex;
use tempfile::tempdir;

use capfile::{Capture, CaptureCompression, CaptureError, PcapCapture, PcapVariant, Version};

// 24-byte byte-swapped standard header (snaplen 64, ethernet) followed by
// one packet with a 4-byte payload
const CAPTURE_STANDARD_LE: &[u8] = &hex!(
    "
D4 C3 B2 A1 02 00 04 00 00 00 00 00 00 00 00 00
40 00 00 00 01 00 00 00
01 00 00 00 02 00 00 00 04 00 00 00 04 00 00 00
DE AD BE EF"
);

// nanosecond dialect, forward magic, big-endian fields, one packet
const CAPTURE_NSEC_BE: &[u8] = &hex!(
    "
4D 3C B2 A1 00 02 00 04 00 00 00 00 00 00 00 00
00 00 00 40 00 00 00 01
00 00 00 01 3B 9A C9 FF 00 00 00 04 00 00 00 04
DE AD BE EF"
);

// modified dialect, byte-swapped, two packets with 10-byte payloads
const CAPTURE_MODIFIED_LE: &[u8] = &hex!(
    "
34 CD B2 A1 02 00 04 00 00 00 00 00 00 00 00 00
FF FF 00 00 71 00 00 00
01 00 00 00 00 00 00 00 0A 00 00 00 0A 00 00 00
02 00 00 00 00 08 00 00
00 01 02 03 04 05 06 07 08 09
02 00 00 00 00 00 00 00 0A 00 00 00 14 00 00 00
02 00 00 00 00 08 04 00
10 11 12 13 14 15 16 17 18 19"
);

fn write_capture(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write capture");
    path
}

#[test]
fn open_standard_swapped() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "standard.pcap", CAPTURE_STANDARD_LE);

    let mut capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    assert_eq!(capture.compression(), CaptureCompression::Uncompressed);

    let header = capture.header();
    assert_eq!(header.variant, PcapVariant::Standard);
    assert!(header.byte_order_swap);
    assert_eq!(header.version(), Version::new(2, 4));
    assert_eq!(header.snaplen, 64);
    assert_eq!(header.network.0, 1);
    assert_eq!(header.network.name(), "ETHERNET");

    assert_eq!(capture.packet_count(), 1);
    let entry = capture.entry(0).unwrap();
    assert_eq!(entry.offset(), 24);
    assert_eq!(entry.payload_len(), 4);
    assert!(entry.cached().is_none());

    let packet = capture.get_packet(0).expect("packet 0");
    assert_eq!(packet.data, hex!("DE AD BE EF"));
    assert_eq!(packet.caplen(), 4);
    assert_eq!(packet.origlen(), 4);
    assert!(packet.complete());
    assert_eq!(packet.header.base().ts_sec, 1);
    assert_eq!(packet.header.base().ts_subsec, 2);

    // second fetch comes from the cache
    assert!(capture.entry(0).unwrap().cached().is_some());
    assert!(capture.get_packet(0).is_some());

    // invariant: caplen is bounded by snaplen
    for entry in capture.iter() {
        assert!(entry.payload_len() <= capture.header().snaplen);
    }
}

#[test]
fn open_nanosecond_forward() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "nsec.pcap", CAPTURE_NSEC_BE);

    let mut capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    let header = capture.header();
    assert_eq!(header.variant, PcapVariant::Nanosecond);
    assert!(!header.byte_order_swap);
    assert!(header.is_nanosecond_precision());
    assert_eq!(header.snaplen, 64);

    // the sub-second field is nanoseconds and is not rescaled
    let packet = capture.get_packet(0).expect("packet 0");
    assert_eq!(packet.header.base().ts_subsec, 999_999_999);
}

#[test]
fn modified_variant_index_skip() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "modified.pcap", CAPTURE_MODIFIED_LE);

    let mut capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    assert_eq!(capture.header().variant, PcapVariant::Modified);
    assert_eq!(capture.packet_count(), 2);

    // 24-byte file header, then a 24-byte record header + 10-byte payload
    assert_eq!(capture.entry(0).unwrap().offset(), 24);
    assert_eq!(capture.entry(1).unwrap().offset(), 24 + 24 + 10);

    let second = capture.get_packet(1).expect("packet 1");
    assert_eq!(second.caplen(), 10);
    assert_eq!(second.origlen(), 20);
    assert!(!second.complete());
    match &second.header {
        capfile::RecordHeader::Modified(h) => {
            assert_eq!(h.if_index, 2);
            assert_eq!(h.protocol, 0x0800);
            assert_eq!(h.packet_type, 4);
            assert_eq!(capfile::packet_type_name(h.packet_type), "outgoing");
        }
        _ => panic!("expected a modified header"),
    }
}

#[test]
fn unknown_link_type_is_surfaced() {
    let dir = tempdir().unwrap();
    let mut bytes = CAPTURE_STANDARD_LE.to_vec();
    // patch the link type field to 0xFFFF (little-endian)
    bytes[20] = 0xFF;
    bytes[21] = 0xFF;
    let path = write_capture(&dir, "unknown-linktype.pcap", &bytes);

    let capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    assert_eq!(capture.header().network.0, 0xFFFF);
    assert_eq!(capture.header().network.name(), "?");
}

#[test]
fn unknown_magic_is_fatal() {
    let dir = tempdir().unwrap();
    let path = write_capture(
        &dir,
        "junk.pcap",
        &hex!(
            "
0B AD C0 DE 02 00 04 00 00 00 00 00 00 00 00 00
40 00 00 00 01 00 00 00"
        ),
    );

    let capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(!capture.valid());
    assert_eq!(capture.error(), Some(CaptureError::Format));
    assert_eq!(capture.packet_count(), 0);
}

#[test]
fn truncated_payload_is_fatal() {
    let dir = tempdir().unwrap();
    // drop the last payload byte
    let bytes = &CAPTURE_STANDARD_LE[..CAPTURE_STANDARD_LE.len() - 1];
    let path = write_capture(&dir, "truncated.pcap", bytes);

    let capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(!capture.valid());
    assert_eq!(capture.error(), Some(CaptureError::Format));
}

#[test]
fn partial_record_header_is_fatal() {
    let dir = tempdir().unwrap();
    // a full file header plus 8 stray bytes
    let mut bytes = CAPTURE_STANDARD_LE[..24].to_vec();
    bytes.extend_from_slice(&[0u8; 8]);
    let path = write_capture(&dir, "partial.pcap", &bytes);

    let capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(!capture.valid());
}

#[test]
fn empty_capture_is_valid() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "empty.pcap", &CAPTURE_STANDARD_LE[..24]);

    let capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    assert_eq!(capture.packet_count(), 0);
}

#[test]
fn iteration_is_double_ended() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "modified.pcap", CAPTURE_MODIFIED_LE);

    let capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    let forward: Vec<u64> = capture.iter().map(|e| e.offset()).collect();
    let backward: Vec<u64> = capture.iter().rev().map(|e| e.offset()).collect();
    assert_eq!(forward, vec![24, 58]);
    assert_eq!(backward, vec![58, 24]);
}

#[test]
fn prefetch_materializes_everything() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "modified.pcap", CAPTURE_MODIFIED_LE);

    let capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, true);
    assert!(capture.valid());
    assert!(capture.iter().all(|e| e.cached().is_some()));
}

#[test]
fn save_round_trips_byte_for_byte() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "rt.pcap", CAPTURE_MODIFIED_LE);

    let mut capture = PcapCapture::open(&path, CaptureCompression::Autodetect, false, false);
    assert!(capture.valid());
    assert!(capture.save());
    drop(capture);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..], CAPTURE_MODIFIED_LE);

    // saving twice in a row produces identical output
    let mut capture = PcapCapture::open(&path, CaptureCompression::Autodetect, false, false);
    assert!(capture.save());
    assert!(capture.save());
    drop(capture);
    let again = std::fs::read(&path).unwrap();
    assert_eq!(again, bytes);
}

#[test]
fn save_after_remove_drops_the_packet() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "remove.pcap", CAPTURE_MODIFIED_LE);

    let mut capture = PcapCapture::open(&path, CaptureCompression::Autodetect, false, false);
    assert!(capture.remove_packet(0));
    assert!(!capture.remove_packet(5));
    assert_eq!(capture.packet_count(), 1);
    assert!(capture.save());
    // index offsets are refreshed after the rewrite
    assert_eq!(capture.entry(0).unwrap().offset(), 24);
    drop(capture);

    let mut reopened = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(reopened.valid());
    assert_eq!(reopened.packet_count(), 1);
    let packet = reopened.get_packet(0).expect("surviving packet");
    assert_eq!(packet.data, hex!("10 11 12 13 14 15 16 17 18 19"));
}

#[test]
fn save_fails_on_read_only() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "ro.pcap", CAPTURE_STANDARD_LE);

    let mut capture = PcapCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    assert!(!capture.save());
    assert_eq!(capture.error(), Some(CaptureError::Permission));
}

#[test]
fn swapped_and_forward_twins_expose_identical_packets() {
    let dir = tempdir().unwrap();
    let le_path = write_capture(&dir, "le.pcap", CAPTURE_STANDARD_LE);
    // forward (big-endian) twin of the same capture
    let twin = hex!(
        "
A1 B2 C3 D4 00 02 00 04 00 00 00 00 00 00 00 00
00 00 00 40 00 00 00 01
00 00 00 01 00 00 00 02 00 00 00 04 00 00 00 04
DE AD BE EF"
    );
    let be_path = write_capture(&dir, "be.pcap", &twin);

    let mut le = PcapCapture::open(&le_path, CaptureCompression::Autodetect, true, false);
    let mut be = PcapCapture::open(&be_path, CaptureCompression::Autodetect, true, false);
    assert!(le.valid() && be.valid());
    assert_eq!(le.header().snaplen, be.header().snaplen);
    assert_eq!(le.header().network, be.header().network);
    assert_eq!(le.packet_count(), be.packet_count());
    let (p_le, p_be) = (
        le.get_packet(0).unwrap().data.clone(),
        be.get_packet(0).unwrap().data.clone(),
    );
    assert_eq!(p_le, p_be);
}
