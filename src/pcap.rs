//! Legacy PCAP file format
//!
//! See <https://wiki.wireshark.org/Development/LibpcapFileFormat> for details.
//!
//! A legacy file has a single global header, followed by packet records. The link type and
//! timestamp precision are global, so all packets share them.
//!
//! This format is supported as a fallback of [`create_reader`](crate::create_reader), and to
//! compare a PCAPNG file with its legacy equivalent.

mod frame;
mod header;
mod reader;

pub use frame::*;
pub use header::*;
pub use reader::*;
