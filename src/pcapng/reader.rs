use std::io::Read;

use chrono::{DateTime, Utc};
use log::{debug, trace};

use crate::capture::{CaptureInfo, PacketDataSource};
use crate::config::ReaderConfig;
use crate::cursor::ByteCursor;
use crate::error::PcapError;
use crate::linktype::Linktype;

use super::*;

/// A packet, with the interface it was captured on
///
/// Unlike [`CaptureInfo`], the record identifies its interface across sections and carries
/// the interface link type, so it can describe files mixing several link types.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PacketRecord {
    pub interface: InterfaceId,
    pub linktype: Linktype,
    pub timestamp: DateTime<Utc>,
    pub caplen: u32,
    pub origlen: u32,
    pub data: Vec<u8>,
}

impl PacketRecord {
    pub fn capture_info(&self) -> CaptureInfo {
        CaptureInfo {
            timestamp: self.timestamp,
            caplen: self.caplen,
            origlen: self.origlen,
            interface_index: self.interface.interface,
        }
    }

    /// Split the record into packet data and capture metadata
    pub fn into_parts(self) -> (Vec<u8>, CaptureInfo) {
        let info = self.capture_info();
        (self.data, info)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ReaderState {
    InSection,
    EndOfStream,
    Failed,
}

/// Packet reader for pcap-ng data (streaming version)
///
/// ## Pcap-NG Reader
///
/// This reader pulls blocks from any input providing the `Read` trait, using a circular
/// buffer: memory usage is bounded by the largest block, and it can be used to parse huge
/// files or infinite streams.
///
/// Section headers and interface descriptions are handled internally: interfaces are
/// registered in the section that declares them, and are used to resolve the interface
/// identifier, snaplen, and timestamp resolution of each packet. Other blocks (statistics,
/// name resolution, custom blocks, etc.) are skipped.
///
/// [`read_packet`](PcapNGReader::read_packet) returns packets with their capture metadata,
/// like a legacy pcap reader does. This requires all packets to share a single link type:
/// as soon as interfaces with two different link types have been declared, it fails with
/// `PcapError::PerPacketEncapsulation`. Use [`next_record`](PcapNGReader::next_record) to read
/// such files, since each record carries its own link type.
///
/// Errors other than `Eof` are fatal: the following calls return `PcapError::ReaderFailed`.
///
/// ## Example
///
/// ```rust
/// use pcapng_reader::*;
/// # fn run(file: std::fs::File) -> Result<(), PcapError> {
/// let mut reader = PcapNGReader::open(file)?;
/// println!("link type: {:?}", reader.link_type());
/// loop {
///     match reader.read_packet() {
///         Ok((data, info)) => {
///             println!("{} bytes captured at {}", data.len(), info.timestamp);
///         }
///         Err(PcapError::Eof) => break,
///         Err(e) => return Err(e),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct PcapNGReader<R>
where
    R: Read,
{
    scanner: BlockScanner<R>,
    registry: InterfaceRegistry,
    state: ReaderState,
}

impl<R> PcapNGReader<R>
where
    R: Read,
{
    /// Creates a new `PcapNGReader<R>` using the default configuration.
    ///
    /// Fails if the first block is not a valid Section Header Block.
    pub fn open(reader: R) -> Result<PcapNGReader<R>, PcapError> {
        Self::with_config(ReaderConfig::default(), reader)
    }

    /// Creates a new `PcapNGReader<R>` with the provided buffer capacity.
    pub fn new(capacity: usize, reader: R) -> Result<PcapNGReader<R>, PcapError> {
        Self::with_config(
            ReaderConfig::default().with_buffer_capacity(capacity),
            reader,
        )
    }

    pub fn with_config(config: ReaderConfig, reader: R) -> Result<PcapNGReader<R>, PcapError> {
        let cursor = ByteCursor::new(config.buffer_capacity, reader);
        Self::from_cursor(config, cursor)
    }

    /// Creates a new `PcapNGReader<R>` reading from the current position of `cursor`.
    ///
    /// The section header is read, as well as the following blocks up to the first interface
    /// description, so that the link type is known before reading packets.
    pub fn from_cursor(
        config: ReaderConfig,
        cursor: ByteCursor<R>,
    ) -> Result<PcapNGReader<R>, PcapError> {
        let mut scanner = BlockScanner::from_cursor(&config, cursor);
        let header = match scanner.scan(None)? {
            Some(header) if header.block_type == SHB_MAGIC => header,
            Some(_) => return Err(PcapError::HeaderNotRecognized),
            None => return Err(PcapError::Eof),
        };
        let mut registry = InterfaceRegistry::new();
        match parse_block(&header, scanner.body(&header))? {
            Block::SectionHeader(shb) => {
                registry.open_section(&shb);
            }
            _ => return Err(PcapError::HeaderNotRecognized),
        }
        scanner.consume(&header);
        let mut reader = PcapNGReader {
            scanner,
            registry,
            state: ReaderState::InSection,
        };
        reader.read_headers()?;
        Ok(reader)
    }

    /// The link type shared by all interfaces
    ///
    /// Returns `None` if no interface was declared yet, or if interfaces declare more than one
    /// link type (see [`is_ambiguous`](PcapNGReader::is_ambiguous)).
    pub fn link_type(&self) -> Option<Linktype> {
        self.registry.linktype()
    }

    /// True if interfaces declare more than one link type
    ///
    /// Once set, this never changes for the lifetime of the reader.
    pub fn is_ambiguous(&self) -> bool {
        self.registry.is_ambiguous()
    }

    /// Distinct link types of all interfaces seen so far, in registration order
    pub fn linktypes(&self) -> &[Linktype] {
        self.registry.linktypes()
    }

    /// All sections seen so far, including their interfaces
    pub fn sections(&self) -> &[Section] {
        self.registry.sections()
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.registry.current_section()
    }

    pub fn interface(&self, id: InterfaceId) -> Option<&Interface> {
        self.registry.interface(id)
    }

    /// Get the number of consumed bytes
    pub fn position(&self) -> u64 {
        self.scanner.position()
    }

    /// Read the next packet, with its capture metadata
    ///
    /// Returns `Err(PcapError::Eof)` at the end of the stream, and
    /// `Err(PcapError::PerPacketEncapsulation)` if the interfaces declare more than one link
    /// type. The latter is checked as each interface is registered, so it is returned by the
    /// first call after the second link type is seen (and all calls after that).
    pub fn read_packet(&mut self) -> Result<(Vec<u8>, CaptureInfo), PcapError> {
        self.next_packet(true).map(PacketRecord::into_parts)
    }

    /// Read the next packet, with the interface it was captured on
    ///
    /// This does not require a single link type for the file.
    pub fn next_record(&mut self) -> Result<PacketRecord, PcapError> {
        self.next_packet(false)
    }

    fn encapsulation_error(&self) -> PcapError {
        PcapError::PerPacketEncapsulation {
            linktypes: self.registry.linktypes().to_vec(),
        }
    }

    fn next_packet(&mut self, single_linktype: bool) -> Result<PacketRecord, PcapError> {
        match self.state {
            ReaderState::InSection => (),
            ReaderState::EndOfStream => return Err(PcapError::Eof),
            ReaderState::Failed => return Err(PcapError::ReaderFailed),
        }
        if single_linktype && self.registry.is_ambiguous() {
            return Err(self.encapsulation_error());
        }
        let res = self.read_blocks(single_linktype);
        match res {
            Err(PcapError::Eof) => self.state = ReaderState::EndOfStream,
            Err(PcapError::PerPacketEncapsulation { .. }) | Ok(_) => (),
            Err(_) => self.state = ReaderState::Failed,
        }
        res
    }

    /// Read blocks until a packet is decoded
    fn read_blocks(&mut self, single_linktype: bool) -> Result<PacketRecord, PcapError> {
        loop {
            let order = self.registry.current_section().map(|s| s.byte_order);
            let header = match self.scanner.scan(order)? {
                Some(header) => header,
                None => return Err(PcapError::Eof),
            };
            let record = self.handle_block(&header)?;
            self.scanner.consume(&header);
            if let Some(record) = record {
                return Ok(record);
            }
            if single_linktype && self.registry.is_ambiguous() {
                return Err(self.encapsulation_error());
            }
        }
    }

    /// Read blocks following the section header, up to the first interface
    ///
    /// Stops without consuming at the first packet block.
    fn read_headers(&mut self) -> Result<(), PcapError> {
        while self.registry.num_interfaces() == 0 {
            let order = self.registry.current_section().map(|s| s.byte_order);
            let header = match self.scanner.scan(order)? {
                Some(header) => header,
                None => break,
            };
            if header.is_data_block() {
                break;
            }
            self.handle_block(&header)?;
            self.scanner.consume(&header);
        }
        Ok(())
    }

    /// Decode a scanned block, and update sections and interfaces
    ///
    /// Returns the packet, if the block contains one.
    fn handle_block(&mut self, header: &BlockHeader) -> Result<Option<PacketRecord>, PcapError> {
        let block = parse_block(header, self.scanner.body(header))?;
        let record = match block {
            Block::SectionHeader(shb) => {
                self.registry.open_section(&shb);
                None
            }
            Block::InterfaceDescription(idb) => {
                self.registry.register_interface(&idb);
                None
            }
            Block::EnhancedPacket(epb) => {
                let (interface, itf) = self.registry.resolve(epb.if_id)?;
                itf.check_caplen(epb.caplen)?;
                Some(PacketRecord {
                    interface,
                    linktype: itf.linktype,
                    timestamp: itf.timestamp(epb.ts_high, epb.ts_low)?,
                    caplen: epb.caplen,
                    origlen: epb.origlen,
                    data: epb.data.to_vec(),
                })
            }
            Block::Packet(pb) => {
                let (interface, itf) = self.registry.resolve(u32::from(pb.if_id))?;
                itf.check_caplen(pb.caplen)?;
                Some(PacketRecord {
                    interface,
                    linktype: itf.linktype,
                    timestamp: itf.timestamp(pb.ts_high, pb.ts_low)?,
                    caplen: pb.caplen,
                    origlen: pb.origlen,
                    data: pb.data.to_vec(),
                })
            }
            Block::SimplePacket(spb) => {
                let (interface, itf) = self.registry.resolve(0)?;
                let data = spb.packet_data(itf.snaplen);
                Some(PacketRecord {
                    interface,
                    linktype: itf.linktype,
                    // no timestamp in simple packets
                    timestamp: timestamp_from_nanos(0)?,
                    caplen: data.len() as u32,
                    origlen: spb.origlen,
                    data: data.to_vec(),
                })
            }
            Block::Unknown(ub) => {
                trace!(
                    "skipping block type {:#010x} at offset {}",
                    ub.block_type,
                    header.offset
                );
                None
            }
        };
        if let Some(ref record) = record {
            trace!(
                "packet on {:?}: caplen {} origlen {}",
                record.interface,
                record.caplen,
                record.origlen
            );
        }
        Ok(record)
    }
}

impl<R> PacketDataSource for PcapNGReader<R>
where
    R: Read,
{
    fn link_type(&self) -> Option<Linktype> {
        PcapNGReader::link_type(self)
    }

    fn read_packet(&mut self) -> Result<(Vec<u8>, CaptureInfo), PcapError> {
        PcapNGReader::read_packet(self)
    }
}

impl<R> Drop for PcapNGReader<R>
where
    R: Read,
{
    fn drop(&mut self) {
        debug!(
            "pcapng reader: {} section(s), {} interface(s), {} bytes read",
            self.registry.sections().len(),
            self.registry.num_interfaces(),
            self.scanner.position()
        );
    }
}
