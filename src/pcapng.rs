//! PCAPNG file format
//!
//! See <https://github.com/pcapng/pcapng> for details.
//!
//! A pcapng file is organized in blocks, and blocks are organized in
//! sections: each section starts with a Section Header Block (SHB) and runs
//! until the next SHB or the end of the file. The SHB carries a byte-order
//! magic; every numeric field in the section, including the framing lengths
//! of subsequent blocks, is interpreted in that section's byte order. A
//! single file can therefore mix both byte orders.
//!
//! The main entry point is [`PcapNGCapture`], which opens a file (optionally
//! gzip-compressed), discovers its sections, indexes every block, and
//! materializes blocks on demand. The per-block slice parsers
//! ([`parse_block_le`], [`parse_block_be`], [`parse_sectionheaderblock`],
//! ...) are exported for callers that manage their own buffers.
//!
//! Unknown block types and option types are preserved verbatim, never
//! rejected; block types with the most significant bit set are reserved for
//! local use and always treated as opaque.

mod block;
mod capture;
mod custom;
mod decryption_secrets;
mod enhanced_packet;
mod interface_description;
mod interface_statistics;
mod name_resolution;
mod option;
mod packet;
mod section;
mod section_header;
mod simple_packet;
mod socket_aggregation;
mod systemd_journal_export;
mod time;
mod unknown;

pub use block::*;
pub use capture::*;
pub use custom::*;
pub use decryption_secrets::*;
pub use enhanced_packet::*;
pub use interface_description::*;
pub use interface_statistics::*;
pub use name_resolution::*;
pub use option::*;
pub use packet::*;
pub use section::*;
pub use section_header::*;
pub use simple_packet::*;
pub use socket_aggregation::*;
pub use systemd_journal_export::*;
pub use time::*;
pub use unknown::*;

/// Section Header Block magic
pub const SHB_MAGIC: u32 = 0x0A0D_0D0A;
/// Interface Description Block magic
pub const IDB_MAGIC: u32 = 0x0000_0001;
/// Packet Block magic (obsolete block, kept for old captures)
pub const PB_MAGIC: u32 = 0x0000_0002;
/// Simple Packet Block magic
pub const SPB_MAGIC: u32 = 0x0000_0003;
/// Name Resolution Block magic
pub const NRB_MAGIC: u32 = 0x0000_0004;
/// Interface Statistic Block magic
pub const ISB_MAGIC: u32 = 0x0000_0005;
/// Enhanced Packet Block magic
pub const EPB_MAGIC: u32 = 0x0000_0006;
/// Socket Aggregation Block magic (sometimes also IRIG timestamps)
pub const SAB_MAGIC: u32 = 0x0000_0007;
/// Systemd Journal Export Block magic
pub const SJE_MAGIC: u32 = 0x0000_0009;
/// Decryption Secrets Block magic
pub const DSB_MAGIC: u32 = 0x0000_000A;
/// Custom Block magic
pub const CB_MAGIC: u32 = 0x0000_0BAD;
/// Do-not-copy Custom Block magic
pub const DCB_MAGIC: u32 = 0x4000_0BAD;
/// Byte Order magic
pub const BOM_MAGIC: u32 = 0x1A2B_3C4D;

/// Return the name of a block type, or `"?"` if unknown
pub fn block_type_name(block_type: u32) -> &'static str {
    match block_type {
        SHB_MAGIC => "section_header",
        IDB_MAGIC => "interface_description",
        PB_MAGIC => "packet",
        SPB_MAGIC => "simple_packet",
        NRB_MAGIC => "name_resolution",
        ISB_MAGIC => "interface_statistics",
        EPB_MAGIC => "enhanced_packet",
        SAB_MAGIC => "socket_aggregation",
        SJE_MAGIC => "systemd_journal_export",
        DSB_MAGIC => "decryption_secrets",
        CB_MAGIC => "custom",
        DCB_MAGIC => "custom_no_copy",
        _ => "?",
    }
}
