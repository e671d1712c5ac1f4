use nom::error::ParseError;
use nom::{Err, IResult};

use crate::capture::Version;
use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::{PcapError, PcapNGOption};

use super::*;

/// The Section Header Block (SHB) identifies the beginning of a section of
/// the capture file.
///
/// The Section Header Block does not contain data but it rather identifies a
/// list of blocks (interfaces, packets) that are logically correlated. Its
/// byte-order magic selects the byte order of every numeric field in the
/// section, including the framing lengths of all subsequent blocks.
#[derive(Debug)]
pub struct SectionHeaderBlock<'a> {
    pub block_type: u32,
    pub block_len1: u32,
    /// Byte-order magic
    pub bom: u32,
    pub major_version: u16,
    pub minor_version: u16,
    /// Declared byte length of the section, not counting this block.
    /// `-1` means the length is unknown and the section extends to the next
    /// section header or to the end of the file.
    pub section_len: i64,
    pub options: Vec<PcapNGOption<'a>>,
    pub block_len2: u32,
    /// True if the section is encoded big-endian
    pub big_endian: bool,
}

impl<'a> SectionHeaderBlock<'a> {
    pub fn big_endian(&self) -> bool {
        self.big_endian
    }

    pub fn version(&self) -> Version {
        Version::new(self.major_version, self.minor_version)
    }

    /// Return the `shb_hardware` option value, if present
    pub fn shb_hardware(&self) -> Option<Result<&str, PcapNGOptionError>> {
        options_get_as_string(&self.options, OptionCode::ShbHardware)
    }

    /// Return the `shb_os` option value, if present
    pub fn shb_os(&self) -> Option<Result<&str, PcapNGOptionError>> {
        options_get_as_string(&self.options, OptionCode::ShbOs)
    }

    /// Return the `shb_userappl` option value, if present
    pub fn shb_userappl(&self) -> Option<Result<&str, PcapNGOptionError>> {
        options_get_as_string(&self.options, OptionCode::ShbUserAppl)
    }
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En, SectionHeaderBlock<'a>>
    for SectionHeaderBlock<'a>
{
    const HDR_SZ: usize = 28;
    const MAGIC: u32 = SHB_MAGIC;

    fn inner_parse<E: ParseError<&'a [u8]>>(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], SectionHeaderBlock<'a>, E> {
        // caller function already tested the framing
        let (i, bom) = En::parse_u32(i)?;
        let (i, major_version) = En::parse_u16(i)?;
        let (i, minor_version) = En::parse_u16(i)?;
        let (i, section_len) = En::parse_i64(i)?;
        let (i, options) = opt_parse_options::<En, E>(i, block_len1 as usize, 28)?;
        let block = SectionHeaderBlock {
            block_type,
            block_len1,
            bom,
            major_version,
            minor_version,
            section_len,
            options,
            block_len2,
            big_endian: En::BIG_ENDIAN,
        };
        Ok((i, block))
    }
}

/// Parse a Section Header Block (little endian)
pub fn parse_sectionheaderblock_le(
    i: &[u8],
) -> IResult<&[u8], SectionHeaderBlock, PcapError<&[u8]>> {
    ng_block_parser::<SectionHeaderBlock, PcapLE, _, _>()(i)
}

/// Parse a Section Header Block (big endian)
pub fn parse_sectionheaderblock_be(
    i: &[u8],
) -> IResult<&[u8], SectionHeaderBlock, PcapError<&[u8]>> {
    ng_block_parser::<SectionHeaderBlock, PcapBE, _, _>()(i)
}

/// Parse a SectionHeaderBlock (little or big endian)
///
/// The byte-order magic inside the block body decides the byte order; its
/// on-disk byte sequence is inspected directly so the choice never depends
/// on the host.
pub fn parse_sectionheaderblock(i: &[u8]) -> IResult<&[u8], SectionHeaderBlock, PcapError<&[u8]>> {
    if i.len() < 12 {
        return Err(Err::Incomplete(nom::Needed::new(12 - i.len())));
    }
    let bom = u32::from_le_bytes([i[8], i[9], i[10], i[11]]);
    if bom == BOM_MAGIC {
        parse_sectionheaderblock_le(i)
    } else if bom == BOM_MAGIC.swap_bytes() {
        parse_sectionheaderblock_be(i)
    } else {
        Err(Err::Error(PcapError::HeaderNotRecognized))
    }
}
