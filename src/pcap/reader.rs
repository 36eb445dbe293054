use std::io::Read;

use log::{debug, trace};

use crate::capture::{CaptureInfo, PacketDataSource};
use crate::config::ReaderConfig;
use crate::cursor::ByteCursor;
use crate::error::PcapError;
use crate::linktype::Linktype;
use crate::pcapng::timestamp_from_nanos;

use super::*;

/// Packet reader for legacy pcap data (streaming version)
///
/// All packets share the link type of the global header, and are reported on interface 0.
///
/// ```rust
/// use pcapng_reader::*;
/// # fn run(file: std::fs::File) -> Result<(), PcapError> {
/// let mut reader = LegacyPcapReader::new(65536, file)?;
/// for packet in reader.packets() {
///     let (data, info) = packet?;
///     println!("{}: {} bytes", info.timestamp, data.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct LegacyPcapReader<R>
where
    R: Read,
{
    header: PcapHeader,
    cursor: ByteCursor<R>,
    max_record_len: usize,
    failed: bool,
}

impl<R> LegacyPcapReader<R>
where
    R: Read,
{
    /// Creates a new `LegacyPcapReader<R>` with the provided buffer capacity.
    pub fn new(capacity: usize, reader: R) -> Result<LegacyPcapReader<R>, PcapError> {
        let config = ReaderConfig::default().with_buffer_capacity(capacity);
        let cursor = ByteCursor::new(config.buffer_capacity, reader);
        Self::from_cursor(config, cursor)
    }

    /// Creates a new `LegacyPcapReader<R>` reading from the current position of `cursor`.
    pub fn from_cursor(
        config: ReaderConfig,
        mut cursor: ByteCursor<R>,
    ) -> Result<LegacyPcapReader<R>, PcapError> {
        if cursor.at_end()? {
            return Err(PcapError::Eof);
        }
        let header = parse_pcap_header(cursor.peek(PCAP_HEADER_SZ)?)?;
        cursor.advance(PCAP_HEADER_SZ);
        debug!(
            "pcap header: version {}.{}, {:?}, linktype {}, snaplen {}",
            header.version_major,
            header.version_minor,
            header.byte_order(),
            header.network,
            header.snaplen
        );
        Ok(LegacyPcapReader {
            header,
            cursor,
            max_record_len: config.max_block_len,
            failed: false,
        })
    }

    pub fn header(&self) -> &PcapHeader {
        &self.header
    }

    pub fn link_type(&self) -> Linktype {
        self.header.network
    }

    /// Get the number of consumed bytes
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Read the next packet, with its capture metadata
    ///
    /// Returns `Err(PcapError::Eof)` at the end of the stream.
    pub fn read_packet(&mut self) -> Result<(Vec<u8>, CaptureInfo), PcapError> {
        if self.failed {
            return Err(PcapError::ReaderFailed);
        }
        let res = self.read_record();
        match res {
            Ok(_) | Err(PcapError::Eof) => (),
            Err(_) => self.failed = true,
        }
        res
    }

    fn read_record(&mut self) -> Result<(Vec<u8>, CaptureInfo), PcapError> {
        if self.cursor.at_end()? {
            return Err(PcapError::Eof);
        }
        let hdr_len = self.header.record_header_size();
        let record = parse_pcap_record_header(self.cursor.peek(hdr_len)?, self.header.byte_order())?;
        let caplen = record.caplen as usize;
        if caplen > self.max_record_len {
            return Err(PcapError::BlockTooLarge {
                len: record.caplen,
                max: self.max_record_len,
            });
        }
        let frac_nanos = if self.header.is_nanosecond_precision() {
            i128::from(record.ts_frac)
        } else {
            i128::from(record.ts_frac) * 1000
        };
        let timestamp = timestamp_from_nanos(i128::from(record.ts_sec) * 1_000_000_000 + frac_nanos)?;
        let data = self.cursor.peek(hdr_len + caplen)?[hdr_len..].to_vec();
        self.cursor.advance(hdr_len + caplen);
        trace!("pcap record: caplen {} origlen {}", record.caplen, record.origlen);
        let info = CaptureInfo {
            timestamp,
            caplen: record.caplen,
            origlen: record.origlen,
            interface_index: 0,
        };
        Ok((data, info))
    }
}

impl<R> PacketDataSource for LegacyPcapReader<R>
where
    R: Read,
{
    fn link_type(&self) -> Option<Linktype> {
        Some(self.header.network)
    }

    fn read_packet(&mut self) -> Result<(Vec<u8>, CaptureInfo), PcapError> {
        LegacyPcapReader::read_packet(self)
    }
}
