use std::slice;

use crate::capture::Version;
use crate::pcapng::{
    parse_sectionheaderblock_be, parse_sectionheaderblock_le, SectionHeaderBlock,
};

/// Position of one block inside a pcapng capture file.
///
/// The section index keeps only the block type, total length and offset of
/// each block; the block itself is read and cached on first access.
#[derive(Debug)]
pub struct BlockEntry {
    pub(crate) block_type: u32,
    pub(crate) length: u32,
    pub(crate) offset: u64,
    pub(crate) cache: Option<Vec<u8>>,
}

impl BlockEntry {
    /// Native block type
    pub fn block_type(&self) -> u32 {
        self.block_type
    }

    /// Total on-disk length of the block, including both length trailers
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Offset of the first byte of the block in the capture file
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Raw bytes of the block, if it has been fetched already
    pub fn cached(&self) -> Option<&[u8]> {
        self.cache.as_deref()
    }
}

/// One section of a pcapng capture: a Section Header Block and the ordered
/// index of every block that follows it, up to the next section header or
/// the end of the file.
#[derive(Debug)]
pub struct Section {
    pub(crate) offset: u64,
    pub(crate) big_endian: bool,
    pub(crate) version: Version,
    pub(crate) section_len: i64,
    pub(crate) shb_raw: Vec<u8>,
    pub(crate) blocks: Vec<BlockEntry>,
}

impl Section {
    /// Offset of the section's header block in the capture file
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// True if the section is encoded big-endian
    pub fn big_endian(&self) -> bool {
        self.big_endian
    }

    /// True if every numeric field of the section is byte-swapped relative
    /// to the forward byte-order magic
    pub fn byte_order_swap(&self) -> bool {
        !self.big_endian
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Declared section length from the header, `-1` if unknown
    pub fn section_len(&self) -> i64 {
        self.section_len
    }

    /// Parse and return the Section Header Block
    pub fn header(&self) -> Option<SectionHeaderBlock<'_>> {
        let parse = if self.big_endian {
            parse_sectionheaderblock_be
        } else {
            parse_sectionheaderblock_le
        };
        parse(&self.shb_raw).map(|(_, shb)| shb).ok()
    }

    /// Number of indexed blocks, not counting the section header
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterate over the block index, in file order. The iterator is
    /// double-ended, so it can also walk the section backwards.
    pub fn blocks(&self) -> slice::Iter<'_, BlockEntry> {
        self.blocks.iter()
    }

    /// Index entry for block `index`
    pub fn entry(&self, index: usize) -> Option<&BlockEntry> {
        self.blocks.get(index)
    }
}
