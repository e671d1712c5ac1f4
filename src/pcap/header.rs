use nom::number::streaming::be_u32;
use nom::{Err, IResult};

use crate::capture::Version;
use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::error::PcapError;
use crate::linktype::Linktype;

/// "Standard" pcap file magic
pub const STANDARD_MAGIC: u32 = 0xA1B2_C3D4;
/// Magic for the modified pcap format introduced by Alexey Kuznetsov's libpcap patches
pub const MODIFIED_MAGIC: u32 = 0xA1B2_CD34;
/// Magic for IXIA's hardware lcap format
pub const IXIA_HW_MAGIC: u32 = 0x1C00_01AC;
/// Magic for IXIA's software lcap format
pub const IXIA_SW_MAGIC: u32 = 0x1C00_01AB;
/// Magic for the nanosecond-resolution pcap format introduced by Ulf Lamping's patches
pub const NANOSECOND_MAGIC: u32 = 0x4D3C_B2A1;

/// pcap dialect, identified by the 32-bit file magic.
///
/// Each magic is recognized in both byte orders; a reversed magic means every
/// numeric field in the file is stored in the opposite byte order. IXIA's two
/// magics differ only in the low byte and parse identically, but are kept
/// distinct so a capture round-trips with its original magic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PcapVariant {
    Standard,
    Modified,
    IxiaHw,
    IxiaSw,
    Nanosecond,
}

impl PcapVariant {
    /// The forward (big-endian byte sequence) magic of this variant
    pub const fn magic(self) -> u32 {
        match self {
            PcapVariant::Standard => STANDARD_MAGIC,
            PcapVariant::Modified => MODIFIED_MAGIC,
            PcapVariant::IxiaHw => IXIA_HW_MAGIC,
            PcapVariant::IxiaSw => IXIA_SW_MAGIC,
            PcapVariant::Nanosecond => NANOSECOND_MAGIC,
        }
    }

    /// Match a magic value (read big-endian from the file) against the five
    /// variants and their byte-swapped forms.
    ///
    /// Returns the variant and whether subsequent fields are byte-swapped
    /// (i.e. stored little-endian).
    pub fn from_magic(magic: u32) -> Option<(PcapVariant, bool)> {
        const VARIANTS: [PcapVariant; 5] = [
            PcapVariant::Standard,
            PcapVariant::Modified,
            PcapVariant::IxiaHw,
            PcapVariant::IxiaSw,
            PcapVariant::Nanosecond,
        ];
        VARIANTS.iter().find_map(|&v| {
            if magic == v.magic() {
                Some((v, false))
            } else if magic == v.magic().swap_bytes() {
                Some((v, true))
            } else {
                None
            }
        })
    }

    /// Bytes of a packet record header following the captured-length field:
    /// 4 for all variants, 12 for the modified format.
    pub const fn header_tail(self) -> usize {
        match self {
            PcapVariant::Modified => 12,
            _ => 4,
        }
    }

    /// On-disk size of a packet record header for this variant
    pub const fn record_header_len(self) -> usize {
        // 8 timestamp bytes + 4 captured-length bytes + tail
        12 + self.header_tail()
    }

    /// True if packet timestamps carry nanoseconds in the sub-second field
    pub const fn is_nanosecond(self) -> bool {
        matches!(self, PcapVariant::Nanosecond)
    }

    pub fn name(self) -> &'static str {
        match self {
            PcapVariant::Standard => "standard",
            PcapVariant::Modified => "modified",
            PcapVariant::IxiaHw => "ixia-hw",
            PcapVariant::IxiaSw => "ixia-sw",
            PcapVariant::Nanosecond => "nanosecond",
        }
    }
}

/// pcap global header
#[derive(Clone, Debug)]
pub struct PcapHeader {
    /// File dialect, from the magic number
    pub variant: PcapVariant,
    /// True if all numeric fields in the file are byte-swapped relative to
    /// the forward magic (i.e. stored little-endian)
    pub byte_order_swap: bool,
    /// Version major number (currently 2)
    pub version_major: u16,
    /// Version minor number (currently 4)
    pub version_minor: u16,
    /// The correction time in seconds between GMT (UTC) and the local timezone of the following packet header timestamps
    pub thiszone: i32,
    /// In theory, the accuracy of time stamps in the capture; in practice, all tools set it to 0
    pub sigfigs: u32,
    /// max len of captured packets, in octets
    pub snaplen: u32,
    /// Data link type
    pub network: Linktype,
}

impl PcapHeader {
    pub fn new() -> PcapHeader {
        PcapHeader {
            variant: PcapVariant::Standard,
            byte_order_swap: false,
            version_major: 2,
            version_minor: 4,
            thiszone: 0,
            sigfigs: 0,
            snaplen: 0,
            network: Linktype(1), // default: LINKTYPE_ETHERNET
        }
    }

    pub const fn size(&self) -> usize {
        24
    }

    pub fn is_bigendian(&self) -> bool {
        !self.byte_order_swap
    }

    pub fn is_nanosecond_precision(&self) -> bool {
        self.variant.is_nanosecond()
    }

    pub fn version(&self) -> Version {
        Version::new(self.version_major, self.version_minor)
    }
}

impl Default for PcapHeader {
    fn default() -> Self {
        PcapHeader::new()
    }
}

/// Read the pcap global header
///
/// The magic number selects both the dialect and the byte order of every
/// numeric field that follows, in this header and in every packet header.
pub fn parse_pcap_header(i: &[u8]) -> IResult<&[u8], PcapHeader, PcapError<&[u8]>> {
    let (i, magic) = be_u32(i)?;
    match PcapVariant::from_magic(magic) {
        Some((variant, false)) => inner_parse_header::<PcapBE>(i, variant, false),
        Some((variant, true)) => inner_parse_header::<PcapLE>(i, variant, true),
        None => Err(Err::Error(PcapError::HeaderNotRecognized)),
    }
}

fn inner_parse_header<'a, En: PcapEndianness>(
    i: &'a [u8],
    variant: PcapVariant,
    byte_order_swap: bool,
) -> IResult<&'a [u8], PcapHeader, PcapError<&'a [u8]>> {
    let (i, version_major) = En::parse_u16(i)?;
    let (i, version_minor) = En::parse_u16(i)?;
    let (i, thiszone) = En::parse_i32(i)?;
    let (i, sigfigs) = En::parse_u32(i)?;
    let (i, snaplen) = En::parse_u32(i)?;
    let (i, network) = En::parse_u32(i)?;
    let header = PcapHeader {
        variant,
        byte_order_swap,
        version_major,
        version_minor,
        thiszone,
        sigfigs,
        snaplen,
        network: Linktype(network as i32),
    };
    Ok((i, header))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use hex_literal::hex;

    // byte-swapped (little-endian) standard header, snaplen 64, ethernet
    pub const PCAP_HDR_LE: &[u8] = &hex!(
        "
D4 C3 B2 A1 02 00 04 00 00 00 00 00 00 00 00 00
40 00 00 00 01 00 00 00"
    );

    // forward (big-endian) standard header
    pub const PCAP_HDR_BE: &[u8] = &hex!(
        "
A1 B2 C3 D4 00 02 00 04 00 00 00 00 00 00 00 00
00 04 00 00 00 00 00 01"
    );

    // nanosecond-resolution header, forward magic
    pub const PCAP_HDR_NSEC: &[u8] = &hex!(
        "
4D 3C B2 A1 00 02 00 04 00 00 00 00 00 00 00 00
00 00 00 40 00 00 00 01"
    );

    // byte-swapped modified-format header
    pub const PCAP_HDR_MODIFIED_LE: &[u8] = &hex!(
        "
34 CD B2 A1 02 00 04 00 00 00 00 00 00 00 00 00
FF FF 00 00 71 00 00 00"
    );

    #[test]
    fn parse_header_swapped() {
        let (rem, hdr) = parse_pcap_header(PCAP_HDR_LE).expect("header parsing failed");
        assert!(rem.is_empty());
        assert_eq!(hdr.variant, PcapVariant::Standard);
        assert!(hdr.byte_order_swap);
        assert_eq!(hdr.version_major, 2);
        assert_eq!(hdr.version_minor, 4);
        assert_eq!(hdr.snaplen, 64);
        assert_eq!(hdr.network, Linktype::ETHERNET);
        assert!(!hdr.is_nanosecond_precision());
    }

    #[test]
    fn parse_header_forward() {
        let (rem, hdr) = parse_pcap_header(PCAP_HDR_BE).expect("header parsing failed");
        assert!(rem.is_empty());
        assert_eq!(hdr.variant, PcapVariant::Standard);
        assert!(!hdr.byte_order_swap);
        assert_eq!(hdr.version(), Version::new(2, 4));
        assert_eq!(hdr.snaplen, 1024);
        assert_eq!(hdr.network, Linktype::ETHERNET);
    }

    #[test]
    fn parse_header_nanosecond() {
        let (_, hdr) = parse_pcap_header(PCAP_HDR_NSEC).expect("header parsing failed");
        assert_eq!(hdr.variant, PcapVariant::Nanosecond);
        assert!(!hdr.byte_order_swap);
        assert!(hdr.is_nanosecond_precision());
        assert_eq!(hdr.snaplen, 64);
    }

    #[test]
    fn parse_header_modified() {
        let (_, hdr) = parse_pcap_header(PCAP_HDR_MODIFIED_LE).expect("header parsing failed");
        assert_eq!(hdr.variant, PcapVariant::Modified);
        assert!(hdr.byte_order_swap);
        assert_eq!(hdr.snaplen, 0xFFFF);
        assert_eq!(hdr.network, Linktype(0x71));
        assert_eq!(hdr.variant.record_header_len(), 24);
    }

    #[test]
    fn unknown_linktype_is_not_an_error() {
        let input = &hex!(
            "
D4 C3 B2 A1 02 00 04 00 00 00 00 00 00 00 00 00
40 00 00 00 FF FF 00 00"
        );
        let (_, hdr) = parse_pcap_header(input).expect("header parsing failed");
        assert_eq!(hdr.network, Linktype(0xFFFF));
        assert_eq!(hdr.network.name(), "?");
    }

    #[test]
    fn unknown_magic_is_fatal() {
        let input = &hex!(
            "
0A 0B 0C 0D 02 00 04 00 00 00 00 00 00 00 00 00
40 00 00 00 01 00 00 00"
        );
        assert!(parse_pcap_header(input).is_err());
    }
}
