use nom::number::complete::le_u32;
use nom::IResult;

use crate::endianness::{ByteOrder, PcapEndianness};
use crate::error::PcapError;

use super::*;

/// The Section Header Block (SHB) identifies the
/// beginning of a section of the capture capture file.
///
/// The
/// Section Header Block does not contain data but it rather identifies a
/// list of blocks (interfaces, packets) that are logically correlated.
#[derive(Debug)]
pub struct SectionHeaderBlock<'a> {
    /// Byte-order magic, as read in little-endian
    pub bom: u32,
    pub major_version: u16,
    pub minor_version: u16,
    /// Length of the section, or -1 if not specified
    pub section_len: i64,
    pub options: Vec<PcapNGOption<'a>>,
}

impl<'a> SectionHeaderBlock<'a> {
    pub fn big_endian(&self) -> bool {
        self.bom != BOM_MAGIC
    }

    pub fn byte_order(&self) -> ByteOrder {
        if self.big_endian() {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Return the `shb_hardware` option value, if present
    pub fn shb_hardware(&self) -> Option<String> {
        options_get_string(&self.options, OptionCode::ShbHardware)
    }

    /// Return the `shb_os` option value, if present
    pub fn shb_os(&self) -> Option<String> {
        options_get_string(&self.options, OptionCode::ShbOs)
    }

    /// Return the `shb_userappl` option value, if present
    pub fn shb_userappl(&self) -> Option<String> {
        options_get_string(&self.options, OptionCode::ShbUserAppl)
    }

    /// Return all `opt_comment` values
    pub fn comments(&self) -> Vec<String> {
        options_get_strings(&self.options, OptionCode::Comment)
    }
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En, SectionHeaderBlock<'a>>
    for SectionHeaderBlock<'a>
{
    const HDR_SZ: usize = 28;

    fn inner_parse(
        _block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], SectionHeaderBlock<'a>, PcapError> {
        // caller function already tested header type(magic) and length
        // read end of header
        let (i, bom) = le_u32(i)?;
        let (i, major_version) = En::parse_u16(i)?;
        let (i, minor_version) = En::parse_u16(i)?;
        let (i, section_len) = En::parse_i64(i)?;
        let (i, options) = parse_options::<En>(i)?;
        let block = SectionHeaderBlock {
            bom,
            major_version,
            minor_version,
            section_len,
            options,
        };
        Ok((i, block))
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::config::ReaderConfig;

    #[test]
    fn section_header_be_with_options() {
        let data = hex!(
            "
0a 0d 0d 0a 00 00 00 2c 1a 2b 3c 4d 00 01 00 00
ff ff ff ff ff ff ff ff 00 03 00 05 4c 69 6e 75
78 00 00 00 00 00 00 00 00 00 00 2c"
        );
        let mut scanner = BlockScanner::new(&ReaderConfig::default(), &data[..]);
        let header = scanner.scan(None).expect("scan").expect("block");
        assert_eq!(header.byte_order, ByteOrder::BigEndian);
        assert_eq!(header.block_len, 44);
        let block = parse_block(&header, scanner.body(&header)).expect("parse");
        if let Block::SectionHeader(shb) = block {
            assert!(shb.big_endian());
            assert_eq!(shb.major_version, 1);
            assert_eq!(shb.minor_version, 0);
            assert_eq!(shb.section_len, -1);
            assert_eq!(shb.shb_os().as_deref(), Some("Linux"));
            assert_eq!(shb.shb_hardware(), None);
        } else {
            panic!("expected a section header");
        }
    }

    #[test]
    fn section_header_bad_magic() {
        let data = hex!(
            "
0a 0d 0d 0a 1c 00 00 00 4d 3c 1a 2b 01 00 00 00
ff ff ff ff ff ff ff ff 1c 00 00 00"
        );
        let mut scanner = BlockScanner::new(&ReaderConfig::default(), &data[..]);
        assert!(matches!(
            scanner.scan(None),
            Err(PcapError::HeaderNotRecognized)
        ));
    }
}
