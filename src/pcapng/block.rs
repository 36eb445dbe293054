use std::io::Read;

use log::trace;

use crate::config::ReaderConfig;
use crate::cursor::ByteCursor;
use crate::endianness::{ByteOrder, PcapBE, PcapEndianness, PcapLE};
use crate::error::{flatten_nom_error, PcapError};

use super::*;

/// Generic block layout: block type (4), block total length (4), trailing length (4)
pub const BLOCK_OVERHEAD: usize = 12;

/// Header of a framed block
///
/// Only valid while the block has not been consumed from its [`BlockScanner`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockHeader {
    /// Block type, in the byte order of the section
    pub block_type: u32,
    /// Block total length, including header and trailing length
    pub block_len: u32,
    /// Byte order used to read this block
    pub byte_order: ByteOrder,
    /// Offset of the block in the stream
    pub offset: u64,
}

impl BlockHeader {
    /// Returns true if block contains a network packet
    pub fn is_data_block(&self) -> bool {
        matches!(self.block_type, EPB_MAGIC | SPB_MAGIC | PB_MAGIC)
    }
}

/// A block from a PcapNG file
#[derive(Debug)]
pub enum Block<'a> {
    SectionHeader(SectionHeaderBlock<'a>),
    InterfaceDescription(InterfaceDescriptionBlock<'a>),
    EnhancedPacket(EnhancedPacketBlock<'a>),
    SimplePacket(SimplePacketBlock<'a>),
    Packet(PacketBlock<'a>),
    Unknown(UnknownBlock<'a>),
}

impl<'a> Block<'a> {
    /// Returns true if blocks contains a network packet
    pub fn is_data_block(&self) -> bool {
        matches!(
            self,
            &Block::EnhancedPacket(_) | &Block::SimplePacket(_) | &Block::Packet(_)
        )
    }

    /// Return the normalized magic number of the block
    pub fn magic(&self) -> u32 {
        match self {
            Block::SectionHeader(_) => SHB_MAGIC,
            Block::InterfaceDescription(_) => IDB_MAGIC,
            Block::EnhancedPacket(_) => EPB_MAGIC,
            Block::SimplePacket(_) => SPB_MAGIC,
            Block::Packet(_) => PB_MAGIC,
            Block::Unknown(ub) => ub.block_type,
        }
    }
}

/// Reads one self-describing block at a time from a byte stream
///
/// `scan` frames the next block (type, lengths, and mirrored length check) and leaves it in
/// the buffer; the caller then inspects it with `body` and releases it with `consume`.
/// A block that was scanned but not consumed is returned again by the next `scan`.
pub struct BlockScanner<R>
where
    R: Read,
{
    cursor: ByteCursor<R>,
    max_block_len: usize,
}

impl<R> BlockScanner<R>
where
    R: Read,
{
    pub fn new(config: &ReaderConfig, reader: R) -> BlockScanner<R> {
        let cursor = ByteCursor::new(config.buffer_capacity, reader);
        Self::from_cursor(config, cursor)
    }

    pub fn from_cursor(config: &ReaderConfig, cursor: ByteCursor<R>) -> BlockScanner<R> {
        BlockScanner {
            cursor,
            max_block_len: config.max_block_len,
        }
    }

    /// Frame the next block
    ///
    /// `order` is the byte order of the current section, or `None` before the first section.
    /// A Section Header Block always establishes its own byte order, from its byte-order magic.
    ///
    /// Returns `Ok(None)` if the stream ends exactly at the block boundary.
    pub fn scan(&mut self, order: Option<ByteOrder>) -> Result<Option<BlockHeader>, PcapError> {
        if self.cursor.at_end()? {
            return Ok(None);
        }
        let offset = self.cursor.position();
        let hdr = self.cursor.peek(8)?;
        // the SHB type is a palindrome, so it can be matched before knowing the byte order
        let is_shb = ByteOrder::LittleEndian.u32_from(hdr) == SHB_MAGIC;
        let order = if is_shb {
            let hdr = self.cursor.peek(12)?;
            section_byte_order(&hdr[8..12]).ok_or(PcapError::HeaderNotRecognized)?
        } else {
            order.ok_or(PcapError::HeaderNotRecognized)?
        };
        let hdr = self.cursor.peek(8)?;
        let block_type = order.u32_from(&hdr[0..4]);
        let block_len = order.u32_from(&hdr[4..8]);
        if (block_len as usize) < BLOCK_OVERHEAD {
            return Err(PcapError::InvalidBlockLength {
                block_type,
                len: block_len,
            });
        }
        if block_len as usize > self.max_block_len {
            return Err(PcapError::BlockTooLarge {
                len: block_len,
                max: self.max_block_len,
            });
        }
        let len = block_len as usize;
        let block = self.cursor.peek(len)?;
        let block_len2 = order.u32_from(&block[len - 4..]);
        if block_len2 != block_len {
            return Err(PcapError::BlockLengthMismatch {
                block_type,
                len1: block_len,
                len2: block_len2,
            });
        }
        trace!(
            "block type {:#010x} len {} at offset {}",
            block_type,
            block_len,
            offset
        );
        Ok(Some(BlockHeader {
            block_type,
            block_len,
            byte_order: order,
            offset,
        }))
    }

    /// Return the content of the last scanned block (without type, lengths)
    pub fn body(&self, header: &BlockHeader) -> &[u8] {
        let len = header.block_len as usize;
        &self.cursor.buffered()[8..len - 4]
    }

    /// Release the last scanned block
    ///
    /// Slices returned by `body` must be dropped before calling this function.
    pub fn consume(&mut self, header: &BlockHeader) {
        self.cursor.advance(header.block_len as usize);
    }

    /// Get the number of consumed bytes
    #[inline]
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }
}

/// Decode the byte-order magic of a section header
pub fn section_byte_order(bom: &[u8]) -> Option<ByteOrder> {
    match ByteOrder::LittleEndian.u32_from(bom) {
        BOM_MAGIC => Some(ByteOrder::LittleEndian),
        m if m == BOM_MAGIC.swap_bytes() => Some(ByteOrder::BigEndian),
        _ => None,
    }
}

pub(crate) trait PcapNGBlockParser<'a, En: PcapEndianness, O: 'a> {
    /// Minimum block total length, in bytes
    const HDR_SZ: usize;

    // caller function must have tested header type(magic) and length
    fn inner_parse(block_len: u32, i: &'a [u8]) -> nom::IResult<&'a [u8], O, PcapError>;
}

/// Check block length against the block kind, and decode the block content
pub(crate) fn ng_block_parser<'a, P, En, O>(
    header: &BlockHeader,
    body: &'a [u8],
) -> Result<O, PcapError>
where
    P: PcapNGBlockParser<'a, En, O>,
    En: PcapEndianness,
    O: 'a,
{
    if (header.block_len as usize) < P::HDR_SZ {
        return Err(PcapError::InvalidBlockLength {
            block_type: header.block_type,
            len: header.block_len,
        });
    }
    let (_, b) = P::inner_parse(header.block_len, body).map_err(flatten_nom_error)?;
    Ok(b)
}

/// Decode the content of a scanned block
///
/// Unknown block types are not an error, they are returned as [`Block::Unknown`].
pub fn parse_block<'a>(header: &BlockHeader, body: &'a [u8]) -> Result<Block<'a>, PcapError> {
    match header.byte_order {
        ByteOrder::BigEndian => parse_block_en::<PcapBE>(header, body),
        ByteOrder::LittleEndian => parse_block_en::<PcapLE>(header, body),
    }
}

fn parse_block_en<'a, En: PcapEndianness>(
    header: &BlockHeader,
    body: &'a [u8],
) -> Result<Block<'a>, PcapError> {
    match header.block_type {
        SHB_MAGIC => {
            ng_block_parser::<SectionHeaderBlock, En, _>(header, body).map(Block::SectionHeader)
        }
        IDB_MAGIC => ng_block_parser::<InterfaceDescriptionBlock, En, _>(header, body)
            .map(Block::InterfaceDescription),
        EPB_MAGIC => {
            ng_block_parser::<EnhancedPacketBlock, En, _>(header, body).map(Block::EnhancedPacket)
        }
        SPB_MAGIC => {
            ng_block_parser::<SimplePacketBlock, En, _>(header, body).map(Block::SimplePacket)
        }
        PB_MAGIC => ng_block_parser::<PacketBlock, En, _>(header, body).map(Block::Packet),
        _ => Ok(Block::Unknown(UnknownBlock {
            block_type: header.block_type,
            block_len: header.block_len,
            data: body,
        })),
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    fn scanner(data: &[u8]) -> BlockScanner<&[u8]> {
        BlockScanner::new(&ReaderConfig::default(), data)
    }

    #[test]
    fn scan_unknown_block_be() {
        let data = hex!("00 00 0b ad 00 00 00 10 de ad be ef 00 00 00 10");
        let mut scanner = scanner(&data);
        let header = scanner
            .scan(Some(ByteOrder::BigEndian))
            .expect("scan")
            .expect("block");
        assert_eq!(header.block_type, 0x0bad);
        assert_eq!(header.block_len, 16);
        assert_eq!(scanner.body(&header), &hex!("de ad be ef"));
        match parse_block(&header, scanner.body(&header)).expect("parse") {
            Block::Unknown(ub) => assert_eq!(ub.data, &hex!("de ad be ef")),
            b => panic!("unexpected block {:?}", b),
        }
        scanner.consume(&header);
        assert!(scanner.scan(Some(ByteOrder::BigEndian)).unwrap().is_none());
    }

    #[test]
    fn scan_mirrored_length_mismatch() {
        let data = hex!("05 00 00 00 10 00 00 00 00 00 00 00 14 00 00 00");
        let mut scanner = scanner(&data);
        let res = scanner.scan(Some(ByteOrder::LittleEndian));
        assert!(matches!(
            res,
            Err(PcapError::BlockLengthMismatch {
                len1: 16,
                len2: 20,
                ..
            })
        ));
    }

    #[test]
    fn scan_length_too_small() {
        let data = hex!("05 00 00 00 08 00 00 00");
        let mut scanner = scanner(&data);
        let res = scanner.scan(Some(ByteOrder::LittleEndian));
        assert!(matches!(
            res,
            Err(PcapError::InvalidBlockLength { len: 8, .. })
        ));
    }

    #[test]
    fn scan_truncated_block() {
        let data = hex!("05 00 00 00 10 00 00 00 00 00 00 00 10 00 00");
        let mut scanner = scanner(&data);
        let res = scanner.scan(Some(ByteOrder::LittleEndian));
        assert!(matches!(res, Err(PcapError::UnexpectedEof)));
    }

    #[test]
    fn scan_requires_section_first() {
        let data = hex!("05 00 00 00 0c 00 00 00 0c 00 00 00");
        let mut scanner = scanner(&data);
        assert!(matches!(
            scanner.scan(None),
            Err(PcapError::HeaderNotRecognized)
        ));
    }

    #[test]
    fn scan_block_too_large() {
        let data = hex!("05 00 00 00 00 01 00 00");
        let config = ReaderConfig::default().with_max_block_len(128);
        let mut scanner = BlockScanner::new(&config, &data[..]);
        assert!(matches!(
            scanner.scan(Some(ByteOrder::LittleEndian)),
            Err(PcapError::BlockTooLarge { len: 256, max: 128 })
        ));
    }

    #[test]
    fn byte_order_magic() {
        assert_eq!(
            section_byte_order(&hex!("4d 3c 2b 1a")),
            Some(ByteOrder::LittleEndian)
        );
        assert_eq!(
            section_byte_order(&hex!("1a 2b 3c 4d")),
            Some(ByteOrder::BigEndian)
        );
        assert_eq!(section_byte_order(&hex!("1a 2b 4d 3c")), None);
    }
}
