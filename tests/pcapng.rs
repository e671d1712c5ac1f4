use hex_literal::hex;
use tempfile::tempdir;

use capfile::{
    Block, Capture, CaptureCompression, CaptureError, PcapNGCapture, PcapNGPacketBlock, Version,
};

// minimal little-endian SHB, no options, unknown section length
const SHB_LE: &[u8] = &hex!(
    "
0A 0D 0D 0A 1C 00 00 00 4D 3C 2B 1A 01 00 00 00
FF FF FF FF FF FF FF FF 1C 00 00 00"
);

// little-endian IDB: link type 1 (ethernet), snaplen 65535, no options
const IDB_LE: &[u8] = &hex!(
    "
01 00 00 00 14 00 00 00 01 00 00 00 FF FF 00 00
14 00 00 00"
);

// OpenVPN_UDP_tls-auth.pcapng EPB (first data block, file block 3)
const EPB_LE: &[u8] = &hex!(
    "
06 00 00 00 74 00 00 00 01 00 00 00 E9 D3 04 00
48 EE 39 44 54 00 00 00 54 00 00 00 08 00 27 4A
BE 45 08 00 27 BB 22 84 08 00 45 00 00 46 00 00
40 00 40 11 48 89 C0 A8 38 67 C0 A8 38 66 81 AE
04 AA 00 32 53 B4 38 81 38 14 62 1D 67 46 2D DE
86 73 4D 2C BF F1 51 B2 B1 23 1B 61 E4 23 08 A2
72 81 8E 00 00 00 01 50 FF 26 2C 00 00 00 00 00
74 00 00 00"
);

// little-endian SPB with a 4-byte payload
const SPB_LE: &[u8] = &hex!("03 00 00 00 14 00 00 00 04 00 00 00 DE AD BE EF 14 00 00 00");

// unknown block type 0x78563412, 4 bytes of body
const UNK_LE: &[u8] = &hex!("12 34 56 78 10 00 00 00 12 34 56 78 10 00 00 00");

// big-endian SHB, no options, unknown section length
const SHB_BE: &[u8] = &hex!(
    "
0A 0D 0D 0A 00 00 00 1C 1A 2B 3C 4D 00 01 00 00
FF FF FF FF FF FF FF FF 00 00 00 1C"
);

// big-endian ISB (interface 1, start/end time options)
const ISB_BE: &[u8] = &hex!(
    "
00 00 00 05 00 00 00 40 00 00 00 01 00 04 C3 97
64 CA 47 AA 00 02 00 08 00 04 C3 97 64 CA 47 AA
00 03 00 08 00 04 C3 97 64 CA 4B 92 00 05 00 08
00 00 00 00 00 00 00 0A 00 00 00 00 00 00 00 40
"
);

fn write_capture(dir: &tempfile::TempDir, name: &str, parts: &[&[u8]]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let bytes: Vec<u8> = parts.concat();
    std::fs::write(&path, bytes).expect("write capture");
    path
}

#[test]
fn two_section_file() {
    let dir = tempdir().unwrap();
    let path = write_capture(
        &dir,
        "two-sections.pcapng",
        &[SHB_LE, IDB_LE, EPB_LE, SHB_LE, SPB_LE],
    );

    let mut capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    assert_eq!(capture.section_count(), 2);

    let s0 = &capture.sections()[0];
    assert!(!s0.big_endian());
    assert!(s0.byte_order_swap());
    assert_eq!(s0.version(), Version::new(1, 0));
    assert_eq!(s0.section_len(), -1);
    assert_eq!(s0.block_count(), 2);
    let s1 = &capture.sections()[1];
    assert_eq!(s1.block_count(), 1);

    // framing: each block's offset plus its total length is the offset of
    // the next block (or the section end)
    assert_eq!(s0.entry(0).unwrap().offset(), 28);
    assert_eq!(s0.entry(0).unwrap().length(), 20);
    assert_eq!(s0.entry(1).unwrap().offset(), 48);
    assert_eq!(s0.entry(1).unwrap().length(), 116);
    assert_eq!(s1.offset(), 164);
    assert_eq!(s1.entry(0).unwrap().offset(), 192);

    match capture.get_block(0, 0) {
        Some(Block::InterfaceDescription(idb)) => {
            assert_eq!(idb.linktype.0, 1);
            assert_eq!(idb.snaplen, 65535);
        }
        other => panic!("expected an IDB, got {:?}", other.map(|b| b.name())),
    }
    match capture.get_block(0, 1) {
        Some(Block::EnhancedPacket(epb)) => {
            assert_eq!(epb.if_id, 1);
            assert_eq!(epb.orig_len(), 84);
            assert_eq!(epb.packet_data().len(), 84);
            assert!(!epb.truncated());
            assert!(epb.options.is_empty());
        }
        other => panic!("expected an EPB, got {:?}", other.map(|b| b.name())),
    }
    match capture.get_block(1, 0) {
        Some(Block::SimplePacket(spb)) => {
            assert_eq!(spb.orig_len(), 4);
            assert_eq!(spb.packet_data(), hex!("DE AD BE EF"));
        }
        other => panic!("expected an SPB, got {:?}", other.map(|b| b.name())),
    }
}

#[test]
fn big_endian_section() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "be.pcapng", &[SHB_BE, ISB_BE]);

    let mut capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    let section = &capture.sections()[0];
    assert!(section.big_endian());
    assert_eq!(section.version(), Version::new(1, 0));
    assert_eq!(section.entry(0).unwrap().block_type(), 5);

    match capture.get_block(0, 0) {
        Some(Block::InterfaceStatistics(isb)) => {
            assert_eq!(isb.if_id, 1);
            assert_eq!(isb.options.len(), 3);
        }
        other => panic!("expected an ISB, got {:?}", other.map(|b| b.name())),
    }
}

#[test]
fn shb_options_are_typed() {
    // SHB with one shb_hardware option ("ws") and the end sentinel
    let shb = &hex!(
        "
0A 0D 0D 0A 28 00 00 00 4D 3C 2B 1A 01 00 00 00
FF FF FF FF FF FF FF FF 02 00 02 00 77 73 00 00
00 00 00 00 28 00 00 00"
    );
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "options.pcapng", &[shb, SPB_LE]);

    let capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    let header = capture.sections()[0].header().expect("section header");
    assert_eq!(header.shb_hardware(), Some(Ok("ws")));
    assert!(header.shb_os().is_none());
}

#[test]
fn unknown_blocks_are_preserved() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "unknown.pcapng", &[SHB_LE, UNK_LE, SPB_LE]);

    let mut capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, false, false);
    assert!(capture.valid());
    assert_eq!(capture.sections()[0].block_count(), 2);
    match capture.get_block(0, 0) {
        Some(Block::Unknown(unk)) => {
            assert_eq!(unk.block_type, 0x78563412);
            assert_eq!(unk.data, hex!("12 34 56 78"));
            assert!(!unk.is_local_use());
        }
        other => panic!("expected an unknown block, got {:?}", other.map(|b| b.name())),
    }

    // unknown blocks round-trip on save
    assert!(capture.save());
    drop(capture);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, [SHB_LE, UNK_LE, SPB_LE].concat());
}

#[test]
fn local_use_types_stay_opaque() {
    // type 0x80000001: reserved for local use
    let local = &hex!("01 00 00 80 0C 00 00 00 0C 00 00 00");
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "local.pcapng", &[SHB_LE, local]);

    let mut capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    match capture.get_block(0, 0) {
        Some(Block::Unknown(unk)) => {
            assert_eq!(unk.block_type, 0x8000_0001);
            assert!(unk.is_local_use());
            assert!(unk.data.is_empty());
        }
        other => panic!("expected an opaque block, got {:?}", other.map(|b| b.name())),
    }
}

#[test]
fn declared_section_length_is_checked() {
    // SPB_LE is 20 bytes long
    let shb_sized = &hex!(
        "
0A 0D 0D 0A 1C 00 00 00 4D 3C 2B 1A 01 00 00 00
14 00 00 00 00 00 00 00 1C 00 00 00"
    );
    let dir = tempdir().unwrap();
    let good = write_capture(&dir, "sized.pcapng", &[shb_sized, SPB_LE]);
    let capture = PcapNGCapture::open(&good, CaptureCompression::Autodetect, true, false);
    assert!(capture.valid());
    assert_eq!(capture.sections()[0].section_len(), 20);

    // declared length says 20 bytes, but two blocks (40 bytes) follow
    let overrun = write_capture(&dir, "overrun.pcapng", &[shb_sized, SPB_LE, SPB_LE]);
    let capture = PcapNGCapture::open(&overrun, CaptureCompression::Autodetect, true, false);
    assert!(!capture.valid());
    assert_eq!(capture.error(), Some(CaptureError::Format));

    // declared length says 20 bytes, but the section ends early
    let short = write_capture(&dir, "short.pcapng", &[shb_sized]);
    let capture = PcapNGCapture::open(&short, CaptureCompression::Autodetect, true, false);
    assert!(!capture.valid());
}

#[test]
fn length_trailer_mismatch_is_fatal() {
    let mut spb = SPB_LE.to_vec();
    let last = spb.len() - 4;
    spb[last] = 0x18;
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "bad-trailer.pcapng", &[SHB_LE, &spb]);

    let capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(!capture.valid());
    assert_eq!(capture.error(), Some(CaptureError::Format));
}

#[test]
fn missing_leading_shb_is_fatal() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "headless.pcapng", &[SPB_LE]);

    let capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(!capture.valid());
    assert_eq!(capture.error(), Some(CaptureError::Format));
}

#[test]
fn out_of_range_block_is_absent() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "range.pcapng", &[SHB_LE, SPB_LE]);

    let mut capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, true, false);
    assert!(capture.get_block(0, 0).is_some());
    assert!(capture.get_block(0, 1).is_none());
    assert!(capture.get_block(2, 0).is_none());
    assert_eq!(capture.error(), Some(CaptureError::Invariant));
}

#[test]
fn save_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = write_capture(
        &dir,
        "save.pcapng",
        &[SHB_LE, IDB_LE, EPB_LE, SHB_BE, ISB_BE],
    );
    let original = std::fs::read(&path).unwrap();

    let mut capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, false, false);
    assert!(capture.valid());
    assert!(capture.save());
    assert!(capture.save());
    drop(capture);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, original);
}

#[test]
fn prefetch_caches_all_blocks() {
    let dir = tempdir().unwrap();
    let path = write_capture(&dir, "prefetch.pcapng", &[SHB_LE, IDB_LE, EPB_LE]);

    let capture = PcapNGCapture::open(&path, CaptureCompression::Autodetect, true, true);
    assert!(capture.valid());
    assert!(capture.sections()[0].blocks().all(|e| e.cached().is_some()));
}
