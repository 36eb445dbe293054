use nom::IResult;

use crate::endianness::{ByteOrder, PcapBE, PcapEndianness, PcapLE};
use crate::error::{flatten_nom_error, PcapError};
use crate::linktype::Linktype;

/// Size of the global header
pub const PCAP_HEADER_SZ: usize = 24;

/// PCAP global header
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PcapHeader {
    /// File format and byte ordering, read as little-endian. If equal to `0xa1b2c3d4`,
    /// `0xa1b23c4d` or `0xa1b2cd34` then the rest of the file is little-endian. If swapped,
    /// then all following fields are big-endian.
    pub magic_number: u32,
    /// Version major number (currently 2)
    pub version_major: u16,
    /// Version minor number (currently 4)
    pub version_minor: u16,
    /// The correction time in seconds between GMT (UTC) and the local timezone of the following packet header timestamps
    pub thiszone: i32,
    /// In theory, the accuracy of time stamps in the capture; in practice, all tools set it to 0
    pub sigfigs: u32,
    /// max len of captured packets, in octets
    pub snaplen: u32,
    /// Data link type
    pub network: Linktype,
}

impl PcapHeader {
    pub const fn size(&self) -> usize {
        PCAP_HEADER_SZ
    }

    pub fn byte_order(&self) -> ByteOrder {
        // works for all timestamp precisions and the modified format
        if (self.magic_number & 0xFFFF) == 0xb2a1 {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Returns true for the "modified" format (Kuznetzov), with 24-byte record headers
    pub fn is_modified_format(&self) -> bool {
        self.magic_number == 0xa1b2_cd34 || self.magic_number == 0x34cd_b2a1
    }

    pub fn is_nanosecond_precision(&self) -> bool {
        self.magic_number == 0xa1b2_3c4d || self.magic_number == 0x4d3c_b2a1
    }

    /// Size of the header of each packet record
    pub fn record_header_size(&self) -> usize {
        if self.is_modified_format() {
            24
        } else {
            16
        }
    }
}

/// Read the PCAP global header
///
/// Fails with `HeaderNotRecognized` if the magic is not one of the known values.
pub fn parse_pcap_header(i: &[u8]) -> Result<PcapHeader, PcapError> {
    let magic = match i {
        [a, b, c, d, ..] => u32::from_le_bytes([*a, *b, *c, *d]),
        _ => return Err(PcapError::UnexpectedEof),
    };
    let res = match magic {
        0xa1b2_c3d4 | 0xa1b2_3c4d | 0xa1b2_cd34 => parse_pcap_header_en::<PcapLE>(magic, &i[4..]),
        0xd4c3_b2a1 | 0x4d3c_b2a1 | 0x34cd_b2a1 => parse_pcap_header_en::<PcapBE>(magic, &i[4..]),
        _ => return Err(PcapError::HeaderNotRecognized),
    };
    res.map(|(_, header)| header).map_err(flatten_nom_error)
}

fn parse_pcap_header_en<En: PcapEndianness>(
    magic_number: u32,
    i: &[u8],
) -> IResult<&[u8], PcapHeader, PcapError> {
    let (i, version_major) = En::parse_u16(i)?;
    let (i, version_minor) = En::parse_u16(i)?;
    let (i, thiszone) = En::parse_u32(i)?;
    let (i, sigfigs) = En::parse_u32(i)?;
    let (i, snaplen) = En::parse_u32(i)?;
    let (i, network) = En::parse_u32(i)?;
    let header = PcapHeader {
        magic_number,
        version_major,
        version_minor,
        thiszone: thiszone as i32,
        sigfigs,
        snaplen,
        network: Linktype(network as i32),
    };
    Ok((i, header))
}
