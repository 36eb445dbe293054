//! # PCAPNG packet reader
//!
//! This crate reads packet captures in the PCAPNG format, from any input providing the `Read`
//! trait, and returns packets with their capture metadata (timestamp, lengths, interface).
//!
//! It supports files with multiple sections, interfaces, and endianness: each section has its
//! own byte order and list of interfaces, and packet timestamps are converted using the
//! resolution and offset of their interface. Blocks are validated as they are read (length,
//! mirrored length, byte-order magic), and blocks not related to packets are skipped.
//!
//! Legacy PCAP files are also supported, and [`create_reader`] detects the format.
//!
//! # Example: streaming parser
//!
//! The following code shows how to read all packets from a file in the pcap-ng format, using
//! a [`PcapNGReader`] streaming parser.
//!
//! ```rust
//! use pcapng_reader::*;
//! use std::fs::File;
//!
//! # fn run(path: &str) -> Result<(), PcapError> {
//! let file = File::open(path)?;
//! let mut reader = PcapNGReader::open(file)?;
//! let linktype = reader.link_type();
//! let mut num_packets = 0;
//! loop {
//!     match reader.read_packet() {
//!         Ok((_data, info)) => {
//!             println!("{:?} packet, {} bytes at {}", linktype, info.caplen, info.timestamp);
//!             num_packets += 1;
//!         }
//!         Err(PcapError::Eof) => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! println!("num_packets: {}", num_packets);
//! # Ok(())
//! # }
//! ```
//!
//! Files with interfaces of different link types cannot be read with
//! [`read_packet`](PcapNGReader::read_packet), which fails with
//! `PcapError::PerPacketEncapsulation`. Use [`next_record`](PcapNGReader::next_record) instead:
//! each [`PacketRecord`] carries the link type of its interface.
//!
//! # Example: generic streaming parsing
//!
//! To create a pcap reader for input in either PCAP or PCAPNG format, use the
//! [`create_reader`] function.
//!
//! ```rust
//! use pcapng_reader::*;
//! # fn run(file: std::fs::File) -> Result<(), PcapError> {
//! let mut reader = create_reader(65536, file)?;
//! for packet in reader.packets() {
//!     let (data, info) = packet?;
//!     println!("{} bytes on interface {}", data.len(), info.interface_index);
//! }
//! # Ok(())
//! # }
//! ```

mod capture;
mod config;
mod cursor;
mod endianness;
mod error;
mod linktype;

pub use capture::*;
pub use config::*;
pub use cursor::ByteCursor;
pub use endianness::ByteOrder;
pub use error::*;
pub use linktype::*;

pub mod pcap;
pub mod pcapng;
pub use pcap::*;
pub use pcapng::*;
