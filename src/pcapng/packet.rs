use nom::IResult;

use crate::endianness::PcapEndianness;
use crate::error::PcapError;

use super::*;

/// The Packet Block (PB) is obsolete, and replaced by the Enhanced Packet Block.
///
/// Its layout is the same as the EPB, except for a 16-bit interface identifier followed by
/// a 16-bit drops count. It is still found in files written by old tools.
#[derive(Debug)]
pub struct PacketBlock<'a> {
    pub if_id: u16,
    pub drops_count: u16,
    pub ts_high: u32,
    pub ts_low: u32,
    /// Captured packet length
    pub caplen: u32,
    /// Original packet length
    pub origlen: u32,
    /// Packet data, exactly `caplen` bytes
    pub data: &'a [u8],
    /// Raw options (not decoded)
    pub options: &'a [u8],
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En, PacketBlock<'a>> for PacketBlock<'a> {
    const HDR_SZ: usize = 32;

    fn inner_parse(_block_len: u32, i: &'a [u8]) -> IResult<&'a [u8], PacketBlock<'a>, PcapError> {
        let (i, if_id) = En::parse_u16(i)?;
        let (i, drops_count) = En::parse_u16(i)?;
        let (i, ts_high) = En::parse_u32(i)?;
        let (i, ts_low) = En::parse_u32(i)?;
        let (i, caplen) = En::parse_u32(i)?;
        let (i, origlen) = En::parse_u32(i)?;
        let (options, data) = split_packet_data(caplen, i)?;
        let block = PacketBlock {
            if_id,
            drops_count,
            ts_high,
            ts_low,
            caplen,
            origlen,
            data,
            options,
        };
        Ok((&options[options.len()..], block))
    }
}
