//! Legacy PCAP file format
//!
//! See <https://wiki.wireshark.org/Development/LibpcapFileFormat> for details.
//!
//! A pcap file is a 24-byte global header followed by a flat sequence of
//! packet records. The magic number selects one of five dialects (standard,
//! modified, IXIA hardware/software, nanosecond) and the byte order of every
//! numeric field.
//!
//! The main entry point is [`PcapCapture`], which opens a file (optionally
//! gzip-compressed), indexes every packet record, and serves packets on
//! demand. The lower-level slice parsers ([`parse_pcap_header`],
//! [`parse_record`]) are also exported for callers that manage their own
//! buffers.

mod capture;
mod frame;
mod header;

pub use capture::*;
pub use frame::*;
pub use header::*;
