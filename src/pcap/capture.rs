use std::path::{Path, PathBuf};
use std::slice;

use log::{debug, warn};

use crate::capture::{resolve_source, Capture, CaptureCompression};
use crate::error::CaptureError;
use crate::gzip;
use crate::linktype::Linktype;
use crate::pcap::{parse_pcap_header, parse_record, Packet, PcapHeader};
use crate::serialize::ToVec;
use crate::source::ByteSource;

/// Position of one packet record inside the capture file.
///
/// The index keeps only the payload length and the file offset of the record
/// header; the packet itself is read and cached on first access.
#[derive(Debug)]
pub struct PacketEntry {
    payload_len: u32,
    offset: u64,
    cache: Option<Packet>,
}

impl PacketEntry {
    /// Captured length of the payload, from the record header
    pub fn payload_len(&self) -> u32 {
        self.payload_len
    }

    /// Offset of the first byte of the record header in the capture file
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The materialized packet, if it has been fetched already
    pub fn cached(&self) -> Option<&Packet> {
        self.cache.as_ref()
    }
}

/// An opened legacy pcap capture file.
///
/// Opening builds a complete index of packet positions in a single cheap
/// pass; packets are materialized lazily, with at most one read per packet.
/// A gzip-wrapped file is inflated to a scratch file first, which is removed
/// again when the capture is dropped.
///
/// Construction never panics and never returns an error: a capture that
/// failed to open reports `valid() == false` and holds nothing but the
/// failure category.
pub struct PcapCapture {
    file: Option<ByteSource>,
    origin: PathBuf,
    compression: CaptureCompression,
    read_only: bool,
    header: PcapHeader,
    packets: Vec<PacketEntry>,
    valid: bool,
    error: Option<CaptureError>,
}

impl PcapCapture {
    /// Open a pcap file.
    ///
    /// `compression` may be a definite value or `Autodetect`; `prefetch`
    /// materializes every packet eagerly for callers that will touch all of
    /// them anyway.
    pub fn open<P: AsRef<Path>>(
        path: P,
        compression: CaptureCompression,
        read_only: bool,
        prefetch: bool,
    ) -> PcapCapture {
        let mut capture = PcapCapture {
            file: None,
            origin: path.as_ref().to_path_buf(),
            compression,
            read_only,
            header: PcapHeader::new(),
            packets: Vec::new(),
            valid: false,
            error: None,
        };
        match capture.ingest(prefetch) {
            Ok(()) => capture.valid = true,
            Err(e) => {
                warn!("{}: open failed: {}", capture.origin.display(), e);
                capture.error = Some(e);
                capture.file = None;
                capture.packets.clear();
            }
        }
        capture
    }

    fn ingest(&mut self, prefetch: bool) -> Result<(), CaptureError> {
        let source = resolve_source(&self.origin, &mut self.compression, self.read_only)?;
        self.file = Some(source);
        self.read_header()?;
        self.build_index()?;
        if prefetch {
            for index in 0..self.packets.len() {
                self.materialize(index).ok_or(CaptureError::Io)?;
            }
        }
        Ok(())
    }

    fn source(&mut self) -> Result<&mut ByteSource, CaptureError> {
        self.file.as_mut().ok_or(CaptureError::Io)
    }

    fn read_header(&mut self) -> Result<(), CaptureError> {
        let header_size = self.header.size();
        let file = self.source()?;
        let buf = file.read_vec(header_size).map_err(|_| CaptureError::Io)?;
        let (_, header) = parse_pcap_header(&buf).map_err(|_| CaptureError::Format)?;
        self.header = header;
        Ok(())
    }

    /// Walk the file once and record the offset and captured length of every
    /// packet. Only the length field of each record header is read; the rest
    /// is skipped over, so indexing cost is one seek pair per packet.
    fn build_index(&mut self) -> Result<(), CaptureError> {
        let big_endian = self.header.is_bigendian();
        let header_len = self.header.variant.record_header_len() as u64;
        let file = self.file.as_mut().ok_or(CaptureError::Io)?;
        let total = file.len();
        let mut pos = self.header.size() as u64;
        while pos < total {
            if total - pos < header_len {
                return Err(CaptureError::Format);
            }
            // skip the two timestamp fields
            file.seek_to(pos + 8).map_err(|_| CaptureError::Io)?;
            let caplen = file.read_u32(big_endian).map_err(|_| CaptureError::Io)?;
            let next = pos + header_len + u64::from(caplen);
            if next > total {
                return Err(CaptureError::Format);
            }
            self.packets.push(PacketEntry {
                payload_len: caplen,
                offset: pos,
                cache: None,
            });
            pos = next;
        }
        file.seek_to(pos).map_err(|_| CaptureError::Io)?;
        debug!(
            "{}: indexed {} packets ({})",
            self.origin.display(),
            self.packets.len(),
            self.header.variant.name()
        );
        Ok(())
    }

    /// The file header. Until [`save`](PcapCapture::save), a replaced header
    /// lives only in memory.
    pub fn header(&self) -> &PcapHeader {
        &self.header
    }

    /// Replace the file header. Takes effect on the next `save`.
    pub fn set_header(&mut self, header: PcapHeader) {
        self.header = header;
    }

    pub fn packet_count(&self) -> usize {
        self.packets.len()
    }

    /// Iterate over the packet index, in file order. The iterator is
    /// double-ended, so it can also walk the capture backwards.
    pub fn iter(&self) -> slice::Iter<'_, PacketEntry> {
        self.packets.iter()
    }

    /// Index entry for packet `index`
    pub fn entry(&self, index: usize) -> Option<&PacketEntry> {
        self.packets.get(index)
    }

    /// Fetch packet `index`, reading it from the file on first access.
    ///
    /// Returns `None` if the index is out of range or the read fails; the
    /// cached packet is returned without touching the file on later calls.
    pub fn get_packet(&mut self, index: usize) -> Option<&Packet> {
        if index >= self.packets.len() {
            self.error = Some(CaptureError::Invariant);
            return None;
        }
        if self.packets[index].cache.is_none() {
            self.materialize(index)?;
        }
        self.packets[index].cache.as_ref()
    }

    fn materialize(&mut self, index: usize) -> Option<()> {
        let offset = self.packets[index].offset;
        let payload_len = self.packets[index].payload_len;
        let variant = self.header.variant;
        let swap = self.header.byte_order_swap;
        let total = variant.record_header_len() + payload_len as usize;
        let file = self.file.as_mut()?;
        file.seek_to(offset).ok()?;
        let buf = file.read_vec(total).ok()?;
        let (_, packet) = parse_record(&buf, variant, swap).ok()?;
        self.packets[index].cache = Some(packet);
        Some(())
    }

    /// Drop packet `index` from the capture. The backing file is not
    /// rewritten until `save`.
    pub fn remove_packet(&mut self, index: usize) -> bool {
        if index >= self.packets.len() {
            self.error = Some(CaptureError::Invariant);
            return false;
        }
        self.packets.remove(index);
        true
    }

    /// Rewrite the backing file: the current header followed by every
    /// surviving packet in index order, in the capture's own byte order.
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
        // every payload must be in memory before the file is truncated
        for index in 0..self.packets.len() {
            if self.get_packet(index).is_none() {
                return false;
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
        let big_endian = self.header.is_bigendian();
        let mut out = self
            .header
            .to_vec(big_endian)
            .map_err(|_| CaptureError::Format)?;
        let mut offsets = Vec::with_capacity(self.packets.len());
        for entry in &self.packets {
            let packet = entry.cache.as_ref().ok_or(CaptureError::Io)?;
            offsets.push(out.len() as u64);
            let bytes = packet.to_vec(big_endian).map_err(|_| CaptureError::Format)?;
            out.extend_from_slice(&bytes);
        }
        let compression = self.compression;
        let origin = self.origin.clone();
        let file = self.source()?;
        file.truncate(0).map_err(|_| CaptureError::Io)?;
        file.write_bytes(&out).map_err(|_| CaptureError::Io)?;
        file.flush().map_err(|_| CaptureError::Io)?;
        if compression == CaptureCompression::Compressed {
            gzip::compress_to(file, &origin)?;
        }
        for (entry, offset) in self.packets.iter_mut().zip(offsets) {
            entry.offset = offset;
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

impl Capture for PcapCapture {
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

impl PcapCapture {
    pub fn get_datalink(&self) -> Linktype {
        self.header.network
    }

    pub fn get_snaplen(&self) -> u32 {
        self.header.snaplen
    }
}
