/// Unknown block (magic not recognized, or not decoded by this crate)
///
/// Statistics, name resolution, and custom blocks end up here, and are skipped by the reader.
#[derive(Debug)]
pub struct UnknownBlock<'a> {
    /// Block type, in the byte order of the section
    pub block_type: u32,
    pub block_len: u32,
    pub data: &'a [u8],
}
