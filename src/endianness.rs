use nom::error::ParseError;
use nom::number::complete::{be_i64, be_u16, be_u32, le_i64, le_u16, le_u32};
use nom::IResult;

/// Byte order of a PcapNG section
///
/// Fixed for the lifetime of a section, and given by its byte-order magic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    /// Read a `u32` from the first 4 bytes of `b`
    ///
    /// Caller must ensure that `b` holds at least 4 bytes.
    #[inline]
    pub(crate) fn u32_from(self, b: &[u8]) -> u32 {
        let raw = [b[0], b[1], b[2], b[3]];
        match self {
            ByteOrder::BigEndian => u32::from_be_bytes(raw),
            ByteOrder::LittleEndian => u32::from_le_bytes(raw),
        }
    }
}

pub(crate) struct PcapBE;
pub(crate) struct PcapLE;

pub(crate) trait PcapEndianness {
    const ORDER: ByteOrder;

    fn parse_u16<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u16, E>;
    fn parse_u32<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u32, E>;
    fn parse_i64<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], i64, E>;
}

impl PcapEndianness for PcapBE {
    const ORDER: ByteOrder = ByteOrder::BigEndian;

    #[inline]
    fn parse_u16<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u16, E> {
        be_u16(i)
    }

    #[inline]
    fn parse_u32<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u32, E> {
        be_u32(i)
    }

    #[inline]
    fn parse_i64<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], i64, E> {
        be_i64(i)
    }
}

impl PcapEndianness for PcapLE {
    const ORDER: ByteOrder = ByteOrder::LittleEndian;

    #[inline]
    fn parse_u16<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u16, E> {
        le_u16(i)
    }

    #[inline]
    fn parse_u32<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u32, E> {
        le_u32(i)
    }

    #[inline]
    fn parse_i64<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], i64, E> {
        le_i64(i)
    }
}
