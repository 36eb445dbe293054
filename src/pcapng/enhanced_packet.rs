use nom::bytes::complete::take;
use nom::IResult;
use rusticata_macros::align32;

use crate::endianness::PcapEndianness;
use crate::error::PcapError;

use super::*;

/// An Enhanced Packet Block (EPB) is the standard container for storing
/// the packets coming from the network.
///
/// This struct is a thin abstraction layer over the block data: `data` borrows the
/// packet bytes (without padding) from the reader buffer, and options are not decoded.
#[derive(Debug)]
pub struct EnhancedPacketBlock<'a> {
    pub if_id: u32,
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

impl<'a> EnhancedPacketBlock<'a> {
    /// Returns true if the packet was truncated by the capture
    pub fn truncated(&self) -> bool {
        self.origlen != self.caplen
    }
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En, EnhancedPacketBlock<'a>>
    for EnhancedPacketBlock<'a>
{
    const HDR_SZ: usize = 32;

    fn inner_parse(
        _block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], EnhancedPacketBlock<'a>, PcapError> {
        // caller function already tested header type(magic) and length
        // read end of header
        let (i, if_id) = En::parse_u32(i)?;
        let (i, ts_high) = En::parse_u32(i)?;
        let (i, ts_low) = En::parse_u32(i)?;
        let (i, caplen) = En::parse_u32(i)?;
        let (i, origlen) = En::parse_u32(i)?;
        let (options, data) = split_packet_data(caplen, i)?;
        let block = EnhancedPacketBlock {
            if_id,
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

/// Split packet data and options, checking that `caplen` bytes fit in the block
///
/// Returns the options (after padding) as remaining input, and the packet data.
pub(crate) fn split_packet_data(caplen: u32, i: &[u8]) -> IResult<&[u8], &[u8], PcapError> {
    if caplen as usize > i.len() {
        return Err(nom::Err::Failure(PcapError::CaptureLengthExceeded {
            caplen,
            limit: i.len() as u32,
        }));
    }
    let (i, data) = take(caplen)(i)?;
    // the padding can only be missing for the last bytes of a malformed block
    let padding = (align32!(caplen as usize) - caplen as usize).min(i.len());
    Ok((&i[padding..], data))
}
