use cookie_factory::combinator::slice;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen, GenError, SerializeFn};
use rusticata_macros::align32;
use std::io::Write;

use crate::pcap::{ModifiedPacketHeader, Packet, PacketHeader, PcapHeader, RecordHeader};
use crate::pcapng::{
    EnhancedPacketBlock, InterfaceDescriptionBlock, PcapNGOption, SectionHeaderBlock,
    SimplePacketBlock, UnknownBlock, BOM_MAGIC, EPB_MAGIC, IDB_MAGIC, SHB_MAGIC, SPB_MAGIC,
};

/// Serialization to the on-disk representation, in the byte order the
/// capture was read with (or will be written in).
///
/// `big_endian = true` emits the forward byte sequences; `false` emits the
/// byte-swapped file layout.
pub trait ToVec {
    fn to_vec(&self, big_endian: bool) -> Result<Vec<u8>, GenError>;
}

fn n_u16<W: Write>(v: u16, big_endian: bool) -> impl SerializeFn<W> {
    slice(if big_endian {
        v.to_be_bytes()
    } else {
        v.to_le_bytes()
    })
}

fn n_u32<W: Write>(v: u32, big_endian: bool) -> impl SerializeFn<W> {
    slice(if big_endian {
        v.to_be_bytes()
    } else {
        v.to_le_bytes()
    })
}

fn n_i32<W: Write>(v: i32, big_endian: bool) -> impl SerializeFn<W> {
    slice(if big_endian {
        v.to_be_bytes()
    } else {
        v.to_le_bytes()
    })
}

fn n_i64<W: Write>(v: i64, big_endian: bool) -> impl SerializeFn<W> {
    slice(if big_endian {
        v.to_be_bytes()
    } else {
        v.to_le_bytes()
    })
}

fn padding_for<'a, W: Write + 'a>(unaligned_length: u32) -> impl SerializeFn<W> + 'a {
    let length = align32!(unaligned_length) - unaligned_length;
    slice(&[0u8, 0, 0, 0][..length as usize])
}

impl ToVec for PcapHeader {
    fn to_vec(&self, big_endian: bool) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(self.size());
        gen(
            tuple((
                n_u32(self.variant.magic(), big_endian),
                n_u16(self.version_major, big_endian),
                n_u16(self.version_minor, big_endian),
                n_i32(self.thiszone, big_endian),
                n_u32(self.sigfigs, big_endian),
                n_u32(self.snaplen, big_endian),
                n_u32(self.network.0 as u32, big_endian),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

fn packet_header<'a, W: Write + 'a>(
    header: &PacketHeader,
    big_endian: bool,
) -> impl SerializeFn<W> + 'a {
    tuple((
        n_u32(header.ts_sec, big_endian),
        n_u32(header.ts_subsec, big_endian),
        n_u32(header.caplen, big_endian),
        n_u32(header.origlen, big_endian),
    ))
}

fn modified_packet_header<'a, W: Write + 'a>(
    header: &ModifiedPacketHeader,
    big_endian: bool,
) -> impl SerializeFn<W> + 'a {
    tuple((
        packet_header(&header.base, big_endian),
        n_u32(header.if_index, big_endian),
        n_u16(header.protocol, big_endian),
        slice([header.packet_type, header.padding]),
    ))
}

impl ToVec for Packet {
    fn to_vec(&self, big_endian: bool) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(self.header.size() + self.data.len());
        // pcap records have no alignment constraints
        match &self.header {
            RecordHeader::Standard(h) => gen(
                tuple((packet_header(h, big_endian), slice(&self.data))),
                &mut v,
            ),
            RecordHeader::Modified(h) => gen(
                tuple((modified_packet_header(h, big_endian), slice(&self.data))),
                &mut v,
            ),
        }
        .map(|res| res.0.to_vec())
    }
}

fn pcapng_option<'a, 'b: 'a, W: Write + 'a>(
    option: &'b PcapNGOption,
    big_endian: bool,
) -> impl SerializeFn<W> + 'a {
    tuple((
        n_u16(option.code.0, big_endian),
        n_u16(option.len, big_endian),
        slice(&option.value),
        padding_for(option.value.len() as u32),
    ))
}

fn options_length(options: &[PcapNGOption]) -> usize {
    options
        .iter()
        .map(|o| 4 + align32!(o.value.len() as u32) as usize)
        .sum()
}

fn gen_options<'a, 'b: 'a, W: Write + 'a>(
    options: &'b [PcapNGOption],
    big_endian: bool,
) -> impl SerializeFn<W> + 'a {
    move |mut out| {
        for option in options {
            out = pcapng_option(option, big_endian)(out)?;
        }
        Ok(out)
    }
}

impl<'a> ToVec for PcapNGOption<'a> {
    fn to_vec(&self, big_endian: bool) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::new();
        gen(pcapng_option(self, big_endian), &mut v).map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for SectionHeaderBlock<'a> {
    fn to_vec(&self, big_endian: bool) -> Result<Vec<u8>, GenError> {
        let length = (28 + options_length(&self.options)) as u32;
        let mut v = Vec::with_capacity(length as usize);
        gen(
            tuple((
                n_u32(SHB_MAGIC, big_endian),
                n_u32(length, big_endian),
                n_u32(BOM_MAGIC, big_endian),
                n_u16(self.major_version, big_endian),
                n_u16(self.minor_version, big_endian),
                n_i64(self.section_len, big_endian),
                gen_options(&self.options, big_endian),
                n_u32(length, big_endian),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for InterfaceDescriptionBlock<'a> {
    fn to_vec(&self, big_endian: bool) -> Result<Vec<u8>, GenError> {
        let length = (20 + options_length(&self.options)) as u32;
        let mut v = Vec::with_capacity(length as usize);
        gen(
            tuple((
                n_u32(IDB_MAGIC, big_endian),
                n_u32(length, big_endian),
                n_u16(self.linktype.0 as u16, big_endian),
                n_u16(self.reserved, big_endian),
                n_u32(self.snaplen, big_endian),
                gen_options(&self.options, big_endian),
                n_u32(length, big_endian),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for EnhancedPacketBlock<'a> {
    fn to_vec(&self, big_endian: bool) -> Result<Vec<u8>, GenError> {
        // parsed blocks keep the padding in `data`; align again so
        // hand-built blocks serialize correctly too
        let padded = align32!(self.data.len() as u32) as usize;
        let length = (32 + padded + options_length(&self.options)) as u32;
        let mut v = Vec::with_capacity(length as usize);
        gen(
            tuple((
                n_u32(EPB_MAGIC, big_endian),
                n_u32(length, big_endian),
                n_u32(self.if_id, big_endian),
                n_u32(self.ts_high, big_endian),
                n_u32(self.ts_low, big_endian),
                n_u32(self.caplen, big_endian),
                n_u32(self.origlen, big_endian),
                slice(self.data),
                padding_for(self.data.len() as u32),
                gen_options(&self.options, big_endian),
                n_u32(length, big_endian),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for SimplePacketBlock<'a> {
    fn to_vec(&self, big_endian: bool) -> Result<Vec<u8>, GenError> {
        let length = (16 + align32!(self.data.len() as u32) as usize) as u32;
        let mut v = Vec::with_capacity(length as usize);
        gen(
            tuple((
                n_u32(SPB_MAGIC, big_endian),
                n_u32(length, big_endian),
                n_u32(self.origlen, big_endian),
                slice(self.data),
                padding_for(self.data.len() as u32),
                n_u32(length, big_endian),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for UnknownBlock<'a> {
    fn to_vec(&self, big_endian: bool) -> Result<Vec<u8>, GenError> {
        let length = (12 + self.data.len()) as u32;
        let mut v = Vec::with_capacity(length as usize);
        gen(
            tuple((
                n_u32(self.block_type, big_endian),
                n_u32(length, big_endian),
                slice(self.data),
                n_u32(length, big_endian),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcap::{parse_pcap_header, parse_record, PcapVariant};
    use crate::pcapng::parse_sectionheaderblock;
    use hex_literal::hex;

    #[test]
    fn pcap_header_round_trip() {
        let input = &hex!(
            "
D4 C3 B2 A1 02 00 04 00 00 00 00 00 00 00 00 00
40 00 00 00 01 00 00 00"
        );
        let (_, header) = parse_pcap_header(input).unwrap();
        let out = header.to_vec(header.is_bigendian()).unwrap();
        assert_eq!(&out[..], &input[..]);
    }

    #[test]
    fn packet_round_trip() {
        let input = &hex!("01 00 00 00 02 00 00 00 04 00 00 00 04 00 00 00 DE AD BE EF");
        let (_, packet) = parse_record(input, PcapVariant::Standard, true).unwrap();
        let out = packet.to_vec(false).unwrap();
        assert_eq!(&out[..], &input[..]);
    }

    #[test]
    fn shb_round_trip() {
        // minimal little-endian SHB, no options, unknown section length
        let input = &hex!(
            "
0A 0D 0D 0A 1C 00 00 00 4D 3C 2B 1A 01 00 00 00
FF FF FF FF FF FF FF FF 1C 00 00 00"
        );
        let (_, shb) = parse_sectionheaderblock(input).unwrap();
        assert!(!shb.big_endian());
        assert_eq!(shb.section_len, -1);
        let out = shb.to_vec(false).unwrap();
        assert_eq!(&out[..], &input[..]);
    }
}
