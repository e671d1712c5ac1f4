use nom::error::ParseError;
use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapError;

use super::*;

/// The Socket Aggregation Block (type 7, also seen carrying IRIG
/// timestamps). No public layout exists, so the body is kept opaque and
/// re-emitted untouched.
#[derive(Debug)]
pub struct SocketAggregationBlock<'a> {
    pub block_type: u32,
    pub block_len1: u32,
    pub data: &'a [u8],
    pub block_len2: u32,
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En, SocketAggregationBlock<'a>>
    for SocketAggregationBlock<'a>
{
    const HDR_SZ: usize = 12;
    const MAGIC: u32 = SAB_MAGIC;

    fn inner_parse<E: ParseError<&'a [u8]>>(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], SocketAggregationBlock<'a>, E> {
        let block = SocketAggregationBlock {
            block_type,
            block_len1,
            data: i,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse a Socket Aggregation Block (little-endian)
pub fn parse_socketaggregationblock_le(
    i: &[u8],
) -> IResult<&[u8], SocketAggregationBlock, PcapError<&[u8]>> {
    ng_block_parser::<SocketAggregationBlock, PcapLE, _, _>()(i)
}

/// Parse a Socket Aggregation Block (big-endian)
pub fn parse_socketaggregationblock_be(
    i: &[u8],
) -> IResult<&[u8], SocketAggregationBlock, PcapError<&[u8]>> {
    ng_block_parser::<SocketAggregationBlock, PcapBE, _, _>()(i)
}
