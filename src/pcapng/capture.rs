use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::capture::{resolve_source, Capture, CaptureCompression, Version};
use crate::error::CaptureError;
use crate::gzip;
use crate::pcapng::{parse_block, parse_sectionheaderblock, Block, BlockEntry, Section, SHB_MAGIC};
use crate::source::ByteSource;

// minimum framed sizes
const BLOCK_MIN_LEN: u32 = 12;
const SHB_MIN_LEN: u32 = 28;

/// An opened pcapng capture file.
///
/// Opening walks the top-level blocks once, splitting them into sections and
/// recording `{type, length, offset}` for every block; block bodies are read
/// and cached on first access. A gzip-wrapped file is inflated to a scratch
/// file first, which is removed again when the capture is dropped.
///
/// Construction never panics and never returns an error: a capture that
/// failed to open reports `valid() == false` and holds nothing but the
/// failure category.
pub struct PcapNGCapture {
    file: Option<ByteSource>,
    origin: PathBuf,
    compression: CaptureCompression,
    read_only: bool,
    sections: Vec<Section>,
    valid: bool,
    error: Option<CaptureError>,
}

impl PcapNGCapture {
    /// Open a pcapng file.
    ///
    /// `compression` may be a definite value or `Autodetect`; `prefetch`
    /// reads every block body eagerly for callers that will touch all of
    /// them anyway.
    pub fn open<P: AsRef<Path>>(
        path: P,
        compression: CaptureCompression,
        read_only: bool,
        prefetch: bool,
    ) -> PcapNGCapture {
        let mut capture = PcapNGCapture {
            file: None,
            origin: path.as_ref().to_path_buf(),
            compression,
            read_only,
            sections: Vec::new(),
            valid: false,
            error: None,
        };
        match capture.ingest(prefetch) {
            Ok(()) => capture.valid = true,
            Err(e) => {
                warn!("{}: open failed: {}", capture.origin.display(), e);
                capture.error = Some(e);
                capture.file = None;
                capture.sections.clear();
            }
        }
        capture
    }

    fn ingest(&mut self, prefetch: bool) -> Result<(), CaptureError> {
        let source = resolve_source(&self.origin, &mut self.compression, self.read_only)?;
        self.file = Some(source);
        self.build_index()?;
        if prefetch {
            for section in 0..self.sections.len() {
                for block in 0..self.sections[section].blocks.len() {
                    self.fetch_raw(section, block).ok_or(CaptureError::Io)?;
                }
            }
        }
        Ok(())
    }

    /// Walk the top-level blocks, opening a new section at every SHB and
    /// recording the position of every other block in the current section.
    ///
    /// Only the 12 framing bytes of each block are read here; the leading
    /// and trailing length fields are checked for equality, and a section
    /// with a declared length must end exactly at a section boundary.
    fn build_index(&mut self) -> Result<(), CaptureError> {
        let total = match &self.file {
            Some(file) => file.len(),
            None => return Err(CaptureError::Io),
        };
        let mut pos = 0u64;
        while pos < total {
            if total - pos < u64::from(BLOCK_MIN_LEN) {
                return Err(CaptureError::Format);
            }
            let mut frame = [0u8; 8];
            {
                let file = self.file.as_mut().ok_or(CaptureError::Io)?;
                file.seek_to(pos).map_err(|_| CaptureError::Io)?;
                file.peek(&mut frame).map_err(|_| CaptureError::Io)?;
            }
            let type_bytes = [frame[0], frame[1], frame[2], frame[3]];
            let len_bytes = [frame[4], frame[5], frame[6], frame[7]];

            // the SHB type is a byte-order palindrome, so it can be
            // recognized before the section's byte order is known
            if u32::from_le_bytes(type_bytes) == SHB_MAGIC {
                self.finish_section(pos)?;
                let file = self.file.as_mut().ok_or(CaptureError::Io)?;
                let section = read_section_header(file, pos, total)?;
                pos += section.shb_raw.len() as u64;
                self.sections.push(section);
                continue;
            }

            let (big_endian, section_offset, shb_len, declared) = match self.sections.last() {
                Some(s) => (
                    s.big_endian,
                    s.offset,
                    s.shb_raw.len() as u64,
                    s.section_len,
                ),
                // the file must start with a section header
                None => return Err(CaptureError::Format),
            };
            let length = if big_endian {
                u32::from_be_bytes(len_bytes)
            } else {
                u32::from_le_bytes(len_bytes)
            };
            if length < BLOCK_MIN_LEN || length % 4 != 0 || pos + u64::from(length) > total {
                return Err(CaptureError::Format);
            }
            let block_type = if big_endian {
                u32::from_be_bytes(type_bytes)
            } else {
                u32::from_le_bytes(type_bytes)
            };
            // the trailing length must mirror the leading one
            let trailer = {
                let file = self.file.as_mut().ok_or(CaptureError::Io)?;
                file.seek_to(pos + u64::from(length) - 4)
                    .map_err(|_| CaptureError::Io)?;
                file.read_u32(big_endian).map_err(|_| CaptureError::Io)?
            };
            if trailer != length {
                return Err(CaptureError::Format);
            }
            if let Some(section) = self.sections.last_mut() {
                section.blocks.push(BlockEntry {
                    block_type,
                    length,
                    offset: pos,
                    cache: None,
                });
            }
            pos += u64::from(length);

            // a known section length must not be overrun
            if declared >= 0 {
                let consumed = pos - section_offset - shb_len;
                if consumed > declared as u64 {
                    return Err(CaptureError::Format);
                }
            }
        }
        // a declared length must also be fully consumed at EOF
        self.finish_section(pos)?;
        if self.sections.is_empty() {
            return Err(CaptureError::Format);
        }
        debug!(
            "{}: indexed {} sections, {} blocks",
            self.origin.display(),
            self.sections.len(),
            self.sections.iter().map(Section::block_count).sum::<usize>()
        );
        Ok(())
    }

    /// Check the declared-length invariant of the section being closed at
    /// `end` (the offset of the next SHB, or EOF).
    fn finish_section(&mut self, end: u64) -> Result<(), CaptureError> {
        if let Some(section) = self.sections.last() {
            if section.section_len >= 0 {
                let shb_len = section.shb_raw.len() as u64;
                let consumed = end - section.offset - shb_len;
                if consumed != section.section_len as u64 {
                    return Err(CaptureError::Format);
                }
            }
        }
        Ok(())
    }

    /// The discovered sections, in file order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Read the raw bytes of a block into its index entry, if not present
    /// yet, and return them.
    fn fetch_raw(&mut self, section: usize, block: usize) -> Option<&[u8]> {
        let entry = self.sections.get(section)?.blocks.get(block)?;
        if entry.cache.is_none() {
            let offset = entry.offset;
            let length = entry.length as usize;
            let file = self.file.as_mut()?;
            file.seek_to(offset).ok()?;
            let raw = file.read_vec(length).ok()?;
            self.sections[section].blocks[block].cache = Some(raw);
        }
        self.sections[section].blocks[block].cache.as_deref()
    }

    /// Materialize block `block` of section `section`.
    ///
    /// The block is read from the file on first access and parsed from the
    /// cached bytes on every call; the returned value borrows from the
    /// cache. Returns `None` if the position is out of range or the block
    /// is malformed.
    pub fn get_block(&mut self, section: usize, block: usize) -> Option<Block<'_>> {
        if section >= self.sections.len() || block >= self.sections[section].blocks.len() {
            self.error = Some(CaptureError::Invariant);
            return None;
        }
        self.fetch_raw(section, block)?;
        let big_endian = self.sections[section].big_endian;
        let raw = self.sections[section].blocks[block].cache.as_deref()?;
        let (_, parsed) = parse_block(raw, big_endian).ok()?;
        Some(parsed)
    }

    /// Rewrite the backing file: every section header followed by its
    /// blocks, byte-for-byte as indexed. Unknown and custom blocks are
    /// re-emitted verbatim.
    ///
    /// A capture whose source was gzip-compressed is re-compressed to the
    /// original path, finalizing the stream. Fails on a read-only capture.
    /// Saving twice in a row produces byte-identical output.
    pub fn save(&mut self) -> bool {
        if !self.valid {
            return false;
        }
        if self.read_only {
            self.error = Some(CaptureError::Permission);
            return false;
        }
        for section in 0..self.sections.len() {
            for block in 0..self.sections[section].blocks.len() {
                if self.fetch_raw(section, block).is_none() {
                    return false;
                }
            }
        }
        match self.rewrite() {
            Ok(()) => true,
            Err(e) => {
                warn!("{}: save failed: {}", self.origin.display(), e);
                self.error = Some(e);
                false
            }
        }
    }

    fn rewrite(&mut self) -> Result<(), CaptureError> {
        let mut out = Vec::new();
        let mut offsets = Vec::new();
        for section in &mut self.sections {
            section.offset = out.len() as u64;
            out.extend_from_slice(&section.shb_raw);
            for entry in &section.blocks {
                let raw = entry.cache.as_ref().ok_or(CaptureError::Io)?;
                offsets.push(out.len() as u64);
                out.extend_from_slice(raw);
            }
        }
        let compression = self.compression;
        let origin = self.origin.clone();
        let file = self.file.as_mut().ok_or(CaptureError::Io)?;
        file.truncate(0).map_err(|_| CaptureError::Io)?;
        file.write_bytes(&out).map_err(|_| CaptureError::Io)?;
        file.flush().map_err(|_| CaptureError::Io)?;
        if compression == CaptureCompression::Compressed {
            gzip::compress_to(file, &origin)?;
        }
        let mut offsets = offsets.into_iter();
        for section in &mut self.sections {
            for entry in &mut section.blocks {
                if let Some(offset) = offsets.next() {
                    entry.offset = offset;
                }
            }
        }
        Ok(())
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Path of the effective byte source: the original file, or the scratch
    /// decompressed copy for a gzip-wrapped capture.
    pub fn source_path(&self) -> Option<&Path> {
        self.file.as_ref().map(ByteSource::path)
    }
}

impl Capture for PcapNGCapture {
    fn valid(&self) -> bool {
        self.valid
    }

    fn error(&self) -> Option<CaptureError> {
        self.error
    }

    fn compression(&self) -> CaptureCompression {
        self.compression
    }
}

/// Read and validate the SHB starting at `pos`, returning a fresh section.
fn read_section_header(
    file: &mut ByteSource,
    pos: u64,
    total: u64,
) -> Result<Section, CaptureError> {
    if total - pos < u64::from(SHB_MIN_LEN) {
        return Err(CaptureError::Format);
    }
    file.seek_to(pos).map_err(|_| CaptureError::Io)?;
    let mut head = [0u8; 12];
    file.peek(&mut head).map_err(|_| CaptureError::Io)?;
    // the byte-order magic decides how the framing length is read
    let bom = [head[8], head[9], head[10], head[11]];
    let big_endian = match bom {
        [0x1A, 0x2B, 0x3C, 0x4D] => true,
        [0x4D, 0x3C, 0x2B, 0x1A] => false,
        _ => return Err(CaptureError::Format),
    };
    let len_bytes = [head[4], head[5], head[6], head[7]];
    let length = if big_endian {
        u32::from_be_bytes(len_bytes)
    } else {
        u32::from_le_bytes(len_bytes)
    };
    if length < SHB_MIN_LEN || length % 4 != 0 || pos + u64::from(length) > total {
        return Err(CaptureError::Format);
    }
    let raw = file
        .read_vec(length as usize)
        .map_err(|_| CaptureError::Io)?;
    let (_, shb) = parse_sectionheaderblock(&raw).map_err(|_| CaptureError::Format)?;
    Ok(Section {
        offset: pos,
        big_endian,
        version: Version::new(shb.major_version, shb.minor_version),
        section_len: shb.section_len,
        shb_raw: raw,
        blocks: Vec::new(),
    })
}
