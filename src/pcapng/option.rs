use std::borrow::Cow;

use nom::bytes::complete::take;
use nom::IResult;
use rusticata_macros::align32;

use crate::endianness::PcapEndianness;
use crate::error::PcapError;

use super::OptionCode;

/// A PcapNG option (type-length-value)
///
/// The meaning of `code` depends on the block carrying the option.
#[derive(Debug)]
pub struct PcapNGOption<'a> {
    pub code: OptionCode,
    pub len: u16,
    /// Option value, without padding
    pub value: &'a [u8],
}

impl<'a> PcapNGOption<'a> {
    /// Return the option value as a string, replacing invalid UTF-8 sequences
    pub fn as_str_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.value)
    }

    /// Return the first byte of the option value, if any
    pub fn as_u8(&self) -> Option<u8> {
        self.value.first().copied()
    }
}

pub(crate) fn parse_option<'i, En: PcapEndianness>(
    i: &'i [u8],
) -> IResult<&'i [u8], PcapNGOption<'i>, PcapError> {
    let (i, code) = En::parse_u16(i)?;
    let (i, len) = En::parse_u16(i)?;
    let (i, value) = take(len)(i)?;
    // the padding of the last option is sometimes omitted
    let padding = (align32!(len as usize) - len as usize).min(i.len());
    let option = PcapNGOption {
        code: OptionCode(code),
        len,
        value,
    };
    Ok((&i[padding..], option))
}

/// Parse a list of options, stopping at `opt_endofopt` or at the end of the input
///
/// An option declaring a value longer than the remaining input is an error.
pub(crate) fn parse_options<'i, En: PcapEndianness>(
    mut i: &'i [u8],
) -> IResult<&'i [u8], Vec<PcapNGOption<'i>>, PcapError> {
    let mut options = Vec::new();
    // fewer than 4 bytes cannot hold an option header
    while i.len() >= 4 {
        let (rem, option) = parse_option::<En>(i)?;
        i = rem;
        if option.code == OptionCode::EndOfOpt {
            break;
        }
        options.push(option);
    }
    Ok((i, options))
}

/// Return the first value of option `code` as a string
pub(crate) fn options_get_string(options: &[PcapNGOption], code: OptionCode) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.code == code)
        .map(|opt| opt.as_str_lossy().into_owned())
}

/// Return all values of option `code` as strings
pub(crate) fn options_get_strings(options: &[PcapNGOption], code: OptionCode) -> Vec<String> {
    options
        .iter()
        .filter(|opt| opt.code == code)
        .map(|opt| opt.as_str_lossy().into_owned())
        .collect()
}
