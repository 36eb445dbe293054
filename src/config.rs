/// Default initial size of the reader buffer, in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 65536;

/// Default upper bound for the total length of a single block, in bytes
pub const DEFAULT_MAX_BLOCK_LEN: usize = 16 * 1024 * 1024;

/// Reader configuration
///
/// The buffer only needs to hold one complete block, and grows on demand up to
/// `max_block_len`. Using a larger initial value (at least 65k) is advised to avoid frequent
/// reads and buffer shifts.
///
/// ```rust
/// use pcapng_reader::ReaderConfig;
///
/// let config = ReaderConfig::default()
///     .with_buffer_capacity(1 << 20)
///     .with_max_block_len(1 << 24);
/// assert_eq!(config.buffer_capacity, 1 << 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReaderConfig {
    /// Initial size of the circular buffer
    pub buffer_capacity: usize,
    /// Blocks declaring a larger total length are rejected
    pub max_block_len: usize,
}

impl ReaderConfig {
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_max_block_len(mut self, max: usize) -> Self {
        self.max_block_len = max;
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_block_len: DEFAULT_MAX_BLOCK_LEN,
        }
    }
}
