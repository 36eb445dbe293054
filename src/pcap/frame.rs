use nom::IResult;

use crate::endianness::{ByteOrder, PcapBE, PcapEndianness, PcapLE};
use crate::error::{flatten_nom_error, PcapError};

/// Header of a packet record in legacy Pcap files
///
/// Packet data follows the header, and is `caplen` bytes long.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LegacyPcapRecordHeader {
    pub ts_sec: u32,
    /// Microseconds, or nanoseconds for nanosecond-precision files
    pub ts_frac: u32,
    pub caplen: u32,
    pub origlen: u32,
}

/// Read a PCAP record header
///
/// Only the first 16 bytes are decoded. The extra fields of the "modified" format (interface
/// index, protocol, packet type) are skipped by the caller.
pub fn parse_pcap_record_header(
    i: &[u8],
    order: ByteOrder,
) -> Result<LegacyPcapRecordHeader, PcapError> {
    let res = match order {
        ByteOrder::BigEndian => parse_record_header_en::<PcapBE>(i),
        ByteOrder::LittleEndian => parse_record_header_en::<PcapLE>(i),
    };
    res.map(|(_, header)| header).map_err(flatten_nom_error)
}

fn parse_record_header_en<En: PcapEndianness>(
    i: &[u8],
) -> IResult<&[u8], LegacyPcapRecordHeader, PcapError> {
    let (i, ts_sec) = En::parse_u32(i)?;
    let (i, ts_frac) = En::parse_u32(i)?;
    let (i, caplen) = En::parse_u32(i)?;
    let (i, origlen) = En::parse_u32(i)?;
    let header = LegacyPcapRecordHeader {
        ts_sec,
        ts_frac,
        caplen,
        origlen,
    };
    Ok((i, header))
}
