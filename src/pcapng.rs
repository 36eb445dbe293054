//! PCAPNG file format
//!
//! See <https://github.com/pcapng/pcapng> for details.
//!
//! The preferred way to read a file is to create a [`PcapNGReader`], which returns packets
//! with their metadata and takes care of sections, interfaces, and endianness.
//!
//! Blocks can also be decoded manually: [`BlockScanner`] frames one block at a time (and
//! validates its mirrored length), and [`parse_block`] decodes the block content.
//!
//! ## File format and parsing
//!
//! A capture file is organized in blocks. Blocks are organized in sections, each section
//! starting with a Section Header Block (SHB), and followed by blocks (interface description,
//! statistics, packets, etc.).
//! A file is usually composed of one section, but can contain multiple sections. When a SHB is
//! encountered, this means a new section starts, with its own list of interfaces: interface
//! identifiers in packet blocks always refer to the current section.
//!
//! ## Endianness
//!
//! The endianness of a block is indicated by the Section Header Block that started the section
//! containing this block. Since a file can contain several sections, a single file can contain
//! both endianness variants.

use rusticata_macros::newtype_enum;

mod block;
mod enhanced_packet;
mod interface_description;
mod option;
mod packet;
mod reader;
mod registry;
mod section;
mod section_header;
mod simple_packet;
mod time;
mod unknown;

pub use block::*;
pub use enhanced_packet::*;
pub use interface_description::*;
pub use option::*;
pub use packet::*;
pub use reader::*;
pub use registry::*;
pub use section::*;
pub use section_header::*;
pub use simple_packet::*;
pub use time::*;
pub use unknown::*;

/// Section Header Block magic
pub const SHB_MAGIC: u32 = 0x0A0D_0D0A;
/// Interface Description Block magic
pub const IDB_MAGIC: u32 = 0x0000_0001;
/// Packet Block magic (obsolete)
pub const PB_MAGIC: u32 = 0x0000_0002;
/// Simple Packet Block magic
pub const SPB_MAGIC: u32 = 0x0000_0003;
/// Name Resolution Block magic
pub const NRB_MAGIC: u32 = 0x0000_0004;
/// Interface Statistic Block magic
pub const ISB_MAGIC: u32 = 0x0000_0005;
/// Enhanced Packet Block magic
pub const EPB_MAGIC: u32 = 0x0000_0006;

/// Byte Order magic
pub const BOM_MAGIC: u32 = 0x1A2B_3C4D;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct OptionCode(pub u16);

newtype_enum! {
impl debug OptionCode {
    EndOfOpt = 0,
    Comment = 1,
    ShbHardware = 2,
    ShbOs = 3,
    ShbUserAppl = 4,
    IfName = 2,
    IfDescription = 3,
    IfTsresol = 9,
    IfFilter = 11,
    IfOs = 12,
    IfTsoffset = 14,
}
}
