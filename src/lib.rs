//! # PCAP and PCAPNG capture file engine
//!
//! This crate reads and writes packet-capture files in the legacy pcap
//! format (including the modified, IXIA and nanosecond dialects, in either
//! byte order, optionally gzip-compressed) and in the block-structured
//! pcapng format.
//!
//! Unlike a streaming parser, the engines here are built for random access:
//! opening a file runs a single cheap indexing pass that records the offset
//! of every packet (or block), and records are materialized lazily with at
//! most one read each. Captures can be edited at the index level (packets
//! removed, the header replaced) and written back with [`PcapCapture::save`].
//! A gzip-wrapped capture is inflated to a scoped scratch file in the system
//! temp directory, which is deleted when the engine is dropped.
//!
//! # Example
//!
//! ```rust,no_run
//! use capfile::{Capture, CaptureCompression, PcapCapture};
//!
//! let mut capture = PcapCapture::open(
//!     "/tmp/file.pcap",
//!     CaptureCompression::Autodetect,
//!     true,
//!     false,
//! );
//! if capture.valid() {
//!     println!("link type: {}", capture.header().network);
//!     for index in 0..capture.packet_count() {
//!         if let Some(packet) = capture.get_packet(index) {
//!             println!("packet {}: {} bytes", index, packet.caplen());
//!         }
//!     }
//! }
//! ```
//!
//! The lower-level slice parsers (`parse_pcap_header`, `parse_block_le`,
//! ...) are exported as well, for callers that manage their own buffers.
//! Payloads are opaque octets throughout: the link-type value is recorded
//! and surfaced, never interpreted.

mod capture;
pub use capture::*;

mod error;
pub use error::*;

mod linktype;
pub use linktype::*;

pub mod source;
pub use source::ByteSource;

pub mod gzip;

pub mod pcap;
pub use pcap::*;

pub mod pcapng;
pub use pcapng::*;

mod serialize;
pub use serialize::ToVec;

pub(crate) mod endianness;
