use nom::IResult;

use crate::endianness::PcapEndianness;
use crate::error::PcapError;

use super::*;

/// The Simple Packet Block (SPB) is a lightweight container for storing
/// the packets coming from the network.
///
/// It has no interface identifier (interface 0 of the section is implied), no timestamp,
/// and no captured length: the packet data is the block content, padding included. The
/// captured length is the minimum of the original length, the interface snaplen, and the
/// content length.
#[derive(Debug)]
pub struct SimplePacketBlock<'a> {
    /// Original packet length
    pub origlen: u32,
    /// Raw data from packet (with padding)
    pub data: &'a [u8],
}

impl<'a> SimplePacketBlock<'a> {
    /// Return the packet data, given the interface snaplen (0 if unlimited)
    pub fn packet_data(&self, snaplen: u32) -> &'a [u8] {
        let mut caplen = self.data.len().min(self.origlen as usize);
        if snaplen != 0 {
            caplen = caplen.min(snaplen as usize);
        }
        &self.data[..caplen]
    }
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En, SimplePacketBlock<'a>>
    for SimplePacketBlock<'a>
{
    const HDR_SZ: usize = 16;

    fn inner_parse(
        _block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], SimplePacketBlock<'a>, PcapError> {
        // caller function already tested header type(magic) and length
        let (data, origlen) = En::parse_u32(i)?;
        let block = SimplePacketBlock { origlen, data };
        Ok((&data[data.len()..], block))
    }
}
