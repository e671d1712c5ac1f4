use nom::bytes::streaming::take;
use nom::error::{ErrorKind, ParseError};
use nom::{Err, IResult};
use rusticata_macros::align32;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::{PcapError, PcapNGOption};

use super::*;

/// The obsolete Packet Block (PB), predecessor of the Enhanced Packet Block.
///
/// Old captures still contain it, so it is parsed and re-emitted; new files
/// should use [`EnhancedPacketBlock`] instead. Compared to the EPB, the
/// interface field is 16 bits and is followed by a drop counter.
#[derive(Debug)]
pub struct PacketBlock<'a> {
    pub block_type: u32,
    pub block_len1: u32,
    pub if_id: u16,
    /// Packets dropped by the capture system between this packet and the
    /// preceding one
    pub drops_count: u16,
    pub ts_high: u32,
    pub ts_low: u32,
    /// Captured packet length
    pub caplen: u32,
    /// Original packet length
    pub origlen: u32,
    /// Raw data from packet (with padding)
    pub data: &'a [u8],
    pub options: Vec<PcapNGOption<'a>>,
    pub block_len2: u32,
}

impl<'a> PacketBlock<'a> {
    /// Decode the packet timestamp (see [`EnhancedPacketBlock::decode_ts`])
    #[inline]
    pub fn decode_ts(&self, ts_offset: u64, resolution: u64) -> (u32, u32) {
        build_ts(self.ts_high, self.ts_low, ts_offset, resolution)
    }
}

impl<'a> PcapNGPacketBlock for PacketBlock<'a> {
    fn truncated(&self) -> bool {
        self.origlen != self.caplen
    }
    fn orig_len(&self) -> u32 {
        self.origlen
    }
    fn raw_packet_data(&self) -> &[u8] {
        self.data
    }
    fn packet_data(&self) -> &[u8] {
        let caplen = self.caplen as usize;
        if caplen < self.data.len() {
            &self.data[..caplen]
        } else {
            self.data
        }
    }
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En, PacketBlock<'a>> for PacketBlock<'a> {
    const HDR_SZ: usize = 32;
    const MAGIC: u32 = PB_MAGIC;

    fn inner_parse<E: ParseError<&'a [u8]>>(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], PacketBlock<'a>, E> {
        // caller function already tested the framing
        let (i, if_id) = En::parse_u16(i)?;
        let (i, drops_count) = En::parse_u16(i)?;
        let (i, ts_high) = En::parse_u32(i)?;
        let (i, ts_low) = En::parse_u32(i)?;
        let (i, caplen) = En::parse_u32(i)?;
        let (i, origlen) = En::parse_u32(i)?;
        // align32 can overflow
        if caplen >= u32::MAX - 4 {
            return Err(Err::Error(E::from_error_kind(i, ErrorKind::Verify)));
        }
        let padded_length = align32!(caplen);
        let (i, data) = take(padded_length)(i)?;
        let current_offset = (32 + padded_length) as usize;
        let (i, options) = opt_parse_options::<En, E>(i, block_len1 as usize, current_offset)?;
        let block = PacketBlock {
            block_type,
            block_len1,
            if_id,
            drops_count,
            ts_high,
            ts_low,
            caplen,
            origlen,
            data,
            options,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse a Packet Block (little-endian)
pub fn parse_packetblock_le(i: &[u8]) -> IResult<&[u8], PacketBlock, PcapError<&[u8]>> {
    ng_block_parser::<PacketBlock, PcapLE, _, _>()(i)
}

/// Parse a Packet Block (big-endian)
pub fn parse_packetblock_be(i: &[u8]) -> IResult<&[u8], PacketBlock, PcapError<&[u8]>> {
    ng_block_parser::<PacketBlock, PcapBE, _, _>()(i)
}
