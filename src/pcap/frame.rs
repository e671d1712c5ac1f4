use nom::bytes::streaming::take;
use nom::number::streaming::u8 as nom_u8;
use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::error::PcapError;
use crate::pcap::PcapVariant;

/// Standard pcap packet record header (16 bytes on disk)
#[derive(Clone, Copy, Debug, Default)]
pub struct PacketHeader {
    pub ts_sec: u32,
    /// Microseconds, or nanoseconds for the nanosecond variant.
    /// The value is stored as found in the file and never rescaled.
    pub ts_subsec: u32,
    /// Bytes of packet data present in the file
    pub caplen: u32,
    /// Original length of the packet on the wire
    pub origlen: u32,
}

impl PacketHeader {
    pub const fn size() -> usize {
        16
    }

    /// True if the record holds the entire packet
    pub fn full_packet(&self) -> bool {
        self.caplen == self.origlen
    }
}

/// Packet record header of the modified pcap format (24 bytes on disk):
/// the standard header followed by interface, protocol and type fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModifiedPacketHeader {
    pub base: PacketHeader,
    pub if_index: u32,
    pub protocol: u16,
    pub packet_type: u8,
    pub padding: u8,
}

impl ModifiedPacketHeader {
    pub const fn size() -> usize {
        24
    }
}

/// Return the name of a modified-format packet type (the Linux SLL
/// direction/type byte), or `"?"` if unknown.
pub fn packet_type_name(packet_type: u8) -> &'static str {
    match packet_type {
        0 => "host",
        1 => "broadcast",
        2 => "multicast",
        3 => "otherhost",
        4 => "outgoing",
        _ => "?",
    }
}

/// Packet record header, one shape per dialect
#[derive(Clone, Copy, Debug)]
pub enum RecordHeader {
    Standard(PacketHeader),
    Modified(ModifiedPacketHeader),
}

impl RecordHeader {
    /// The embedded standard header
    pub fn base(&self) -> &PacketHeader {
        match self {
            RecordHeader::Standard(h) => h,
            RecordHeader::Modified(h) => &h.base,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            RecordHeader::Standard(_) => PacketHeader::size(),
            RecordHeader::Modified(_) => ModifiedPacketHeader::size(),
        }
    }
}

/// A materialized packet record: header plus an owned copy of the captured
/// payload bytes.
#[derive(Debug)]
pub struct Packet {
    pub header: RecordHeader,
    pub data: Vec<u8>,
}

impl Packet {
    pub fn caplen(&self) -> u32 {
        self.header.base().caplen
    }

    pub fn origlen(&self) -> u32 {
        self.header.base().origlen
    }

    /// True if nothing was truncated at capture time
    pub fn complete(&self) -> bool {
        self.header.base().full_packet()
    }
}

pub(crate) fn parse_packet_header<'a, En: PcapEndianness, E: nom::error::ParseError<&'a [u8]>>(
    i: &'a [u8],
) -> IResult<&'a [u8], PacketHeader, E> {
    let (i, ts_sec) = En::parse_u32(i)?;
    let (i, ts_subsec) = En::parse_u32(i)?;
    let (i, caplen) = En::parse_u32(i)?;
    let (i, origlen) = En::parse_u32(i)?;
    let header = PacketHeader {
        ts_sec,
        ts_subsec,
        caplen,
        origlen,
    };
    Ok((i, header))
}

pub(crate) fn parse_modified_packet_header<
    'a,
    En: PcapEndianness,
    E: nom::error::ParseError<&'a [u8]>,
>(
    i: &'a [u8],
) -> IResult<&'a [u8], ModifiedPacketHeader, E> {
    let (i, base) = parse_packet_header::<En, E>(i)?;
    let (i, if_index) = En::parse_u32(i)?;
    let (i, protocol) = En::parse_u16(i)?;
    let (i, packet_type) = nom_u8(i)?;
    let (i, padding) = nom_u8(i)?;
    let header = ModifiedPacketHeader {
        base,
        if_index,
        protocol,
        packet_type,
        padding,
    };
    Ok((i, header))
}

/// Read one packet record (header and payload) of the given dialect.
///
/// Each record starts with a small header and is followed by `caplen` bytes
/// of opaque payload. The payload format depends on the link type and is not
/// interpreted here.
pub fn parse_record(
    i: &[u8],
    variant: PcapVariant,
    byte_order_swap: bool,
) -> IResult<&[u8], Packet, PcapError<&[u8]>> {
    if byte_order_swap {
        inner_parse_record::<PcapLE>(i, variant)
    } else {
        inner_parse_record::<PcapBE>(i, variant)
    }
}

fn inner_parse_record<En: PcapEndianness>(
    i: &[u8],
    variant: PcapVariant,
) -> IResult<&[u8], Packet, PcapError<&[u8]>> {
    let (i, header) = match variant {
        PcapVariant::Modified => {
            let (i, h) = parse_modified_packet_header::<En, _>(i)?;
            (i, RecordHeader::Modified(h))
        }
        _ => {
            let (i, h) = parse_packet_header::<En, _>(i)?;
            (i, RecordHeader::Standard(h))
        }
    };
    let (i, data) = take(header.base().caplen as usize)(i)?;
    let packet = Packet {
        header,
        data: data.to_vec(),
    };
    Ok((i, packet))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use hex_literal::hex;

    // tls12-23.pcap frame 0 (little-endian capture)
    pub const FRAME_PCAP: &[u8] = &hex!(
        "
34 4E 5B 5A E1 96 08 00 4A 00 00 00 4A 00 00 00
72 4D 4A D1 13 0D 4E 9C AE DE CB 73 08 00 45 00
00 3C DF 08 40 00 40 06 47 9F 0A 09 00 01 0A 09
00 02 D1 F4 11 51 34 1B 5B 17 00 00 00 00 A0 02
72 10 14 43 00 00 02 04 05 B4 04 02 08 0A E4 DB
6B 7B 00 00 00 00 01 03 03 07"
    );

    #[test]
    fn parse_standard_record() {
        let (rem, pkt) =
            parse_record(FRAME_PCAP, PcapVariant::Standard, true).expect("packet parsing failed");
        assert!(rem.is_empty());
        assert_eq!(pkt.origlen(), 74);
        assert_eq!(pkt.caplen(), 74);
        assert!(pkt.complete());
        assert_eq!(pkt.header.base().ts_subsec, 562_913);
        assert_eq!(pkt.header.base().ts_sec, 1_515_933_236);
        assert_eq!(pkt.data.len(), 74);
    }

    #[test]
    fn parse_modified_record() {
        // modified header: standard fields, then if_index=2, proto=0x0800, type=0(host), pad
        let input = &hex!(
            "
01 00 00 00 02 00 00 00 04 00 00 00 08 00 00 00
02 00 00 00 00 08 00 00 DE AD BE EF"
        );
        let (rem, pkt) =
            parse_record(input, PcapVariant::Modified, true).expect("packet parsing failed");
        assert!(rem.is_empty());
        assert_eq!(pkt.caplen(), 4);
        assert_eq!(pkt.origlen(), 8);
        assert!(!pkt.complete());
        match pkt.header {
            RecordHeader::Modified(h) => {
                assert_eq!(h.if_index, 2);
                assert_eq!(h.protocol, 0x0800);
                assert_eq!(h.packet_type, 0);
                assert_eq!(packet_type_name(h.packet_type), "host");
            }
            _ => panic!("wrong header shape"),
        }
        assert_eq!(pkt.data, hex!("DE AD BE EF"));
    }

    #[test]
    fn truncated_payload_is_incomplete() {
        // header announces 8 bytes of data, only 4 present
        let input = &hex!("01 00 00 00 02 00 00 00 08 00 00 00 08 00 00 00 DE AD BE EF");
        assert!(parse_record(input, PcapVariant::Standard, true).is_err());
    }
}
