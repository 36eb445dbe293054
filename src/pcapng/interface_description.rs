use nom::IResult;

use crate::endianness::PcapEndianness;
use crate::error::PcapError;
use crate::linktype::Linktype;

use super::*;

/// An Interface Description Block (IDB) is the container for information
/// describing an interface on which packet data is captured.
#[derive(Debug)]
pub struct InterfaceDescriptionBlock<'a> {
    pub linktype: Linktype,
    pub reserved: u16,
    pub snaplen: u32,
    pub options: Vec<PcapNGOption<'a>>,
    pub if_tsresol: u8,
    pub if_tsoffset: i64,
}

impl<'a> InterfaceDescriptionBlock<'a> {
    /// Decode the interface time resolution
    #[inline]
    pub fn ts_resolution(&self) -> TsResolution {
        TsResolution(self.if_tsresol)
    }

    /// Return the interface timestamp offset, in seconds
    #[inline]
    pub fn ts_offset(&self) -> i64 {
        self.if_tsoffset
    }

    /// Return the `if_name` option value, if present
    ///
    /// If the option is present multiple times, the first value is returned.
    pub fn if_name(&self) -> Option<String> {
        options_get_string(&self.options, OptionCode::IfName)
    }

    /// Return the `if_description` option value, if present
    pub fn if_description(&self) -> Option<String> {
        options_get_string(&self.options, OptionCode::IfDescription)
    }

    /// Return the `if_filter` option value, if present
    ///
    /// The first byte of the value is the filter type, and is kept in the string.
    pub fn if_filter(&self) -> Option<String> {
        options_get_string(&self.options, OptionCode::IfFilter)
    }

    /// Return the `if_os` option value, if present
    pub fn if_os(&self) -> Option<String> {
        options_get_string(&self.options, OptionCode::IfOs)
    }

    /// Return all `opt_comment` values
    pub fn comments(&self) -> Vec<String> {
        options_get_strings(&self.options, OptionCode::Comment)
    }
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En, InterfaceDescriptionBlock<'a>>
    for InterfaceDescriptionBlock<'a>
{
    const HDR_SZ: usize = 20;

    fn inner_parse(
        _block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], InterfaceDescriptionBlock<'a>, PcapError> {
        // caller function already tested header type(magic) and length
        // read end of header
        let (i, linktype) = En::parse_u16(i)?;
        let (i, reserved) = En::parse_u16(i)?;
        let (i, snaplen) = En::parse_u32(i)?;
        // read options
        let (i, options) = parse_options::<En>(i)?;
        let (if_tsresol, if_tsoffset) = if_extract_tsoffset_and_tsresol::<En>(&options);
        let block = InterfaceDescriptionBlock {
            linktype: Linktype(linktype as i32),
            reserved,
            snaplen,
            options,
            if_tsresol,
            if_tsoffset,
        };
        Ok((i, block))
    }
}

/// Extract `if_tsresol` and `if_tsoffset`, or their default values (6 and 0)
///
/// Values with an invalid length are ignored.
fn if_extract_tsoffset_and_tsresol<En: PcapEndianness>(options: &[PcapNGOption]) -> (u8, i64) {
    let mut if_tsresol: u8 = TsResolution::MICROSECONDS.0;
    let mut if_tsoffset: i64 = 0;
    for opt in options {
        match opt.code {
            OptionCode::IfTsresol => {
                if let Some(v) = opt.as_u8() {
                    if_tsresol = v;
                }
            }
            OptionCode::IfTsoffset => {
                if let Ok((_, v)) = En::parse_i64::<PcapError>(opt.value) {
                    if_tsoffset = v;
                }
            }
            _ => (),
        }
    }
    (if_tsresol, if_tsoffset)
}
