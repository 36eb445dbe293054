use std::io::Read;

use chrono::{DateTime, Utc};

use crate::config::ReaderConfig;
use crate::cursor::ByteCursor;
use crate::error::PcapError;
use crate::linktype::Linktype;
use crate::pcap::LegacyPcapReader;
use crate::pcapng::{PcapNGReader, SHB_MAGIC};

/// Metadata of a captured packet
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaptureInfo {
    /// Capture time
    pub timestamp: DateTime<Utc>,
    /// Number of bytes captured (length of the packet data)
    pub caplen: u32,
    /// Length of the packet on the wire
    pub origlen: u32,
    /// Index of the capture interface, local to its section (always 0 for legacy pcap)
    pub interface_index: u32,
}

/// Common interface of the packet readers
///
/// Both readers return the packet data (copied out of the reader buffer) and its metadata,
/// and fail instead of returning packets whose link type they cannot state.
pub trait PacketDataSource {
    /// The link type shared by all packets, if known and unique
    fn link_type(&self) -> Option<Linktype>;

    /// Read the next packet
    ///
    /// Returns `Err(PcapError::Eof)` when the input ends cleanly.
    fn read_packet(&mut self) -> Result<(Vec<u8>, CaptureInfo), PcapError>;

    /// Iterate over packets, until end of stream or the first error
    fn packets(&mut self) -> Packets<'_, Self>
    where
        Self: Sized,
    {
        Packets {
            source: self,
            done: false,
        }
    }
}

impl<S: PacketDataSource + ?Sized> PacketDataSource for Box<S> {
    fn link_type(&self) -> Option<Linktype> {
        (**self).link_type()
    }

    fn read_packet(&mut self) -> Result<(Vec<u8>, CaptureInfo), PcapError> {
        (**self).read_packet()
    }
}

/// Iterator over the packets of a [`PacketDataSource`]
///
/// `Eof` ends the iteration. Other errors are returned once, then the iterator is fused.
pub struct Packets<'a, S> {
    source: &'a mut S,
    done: bool,
}

impl<'a, S: PacketDataSource> Iterator for Packets<'a, S> {
    type Item = Result<(Vec<u8>, CaptureInfo), PcapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.read_packet() {
            Ok(packet) => Some(Ok(packet)),
            Err(PcapError::Eof) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Create a packet reader for input in either PCAP or PCAPNG format
///
/// The format is detected from the first 4 bytes.
pub fn create_reader<'b, R>(
    capacity: usize,
    reader: R,
) -> Result<Box<dyn PacketDataSource + 'b>, PcapError>
where
    R: Read + 'b,
{
    let config = ReaderConfig::default().with_buffer_capacity(capacity);
    let mut cursor = ByteCursor::new(config.buffer_capacity, reader);
    if cursor.at_end()? {
        return Err(PcapError::Eof);
    }
    let magic = cursor.peek(4)?;
    let magic = u32::from_le_bytes([magic[0], magic[1], magic[2], magic[3]]);
    if magic == SHB_MAGIC {
        let reader = PcapNGReader::from_cursor(config, cursor)?;
        Ok(Box::new(reader))
    } else {
        let reader = LegacyPcapReader::from_cursor(config, cursor)?;
        Ok(Box::new(reader))
    }
}
