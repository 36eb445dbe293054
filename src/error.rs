use std::io;

use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

use crate::linktype::Linktype;

/// Errors (and the end-of-stream signal) returned by the readers
///
/// `Eof` is not a failure: it is returned when the input ends cleanly at a block boundary,
/// and is the normal way for a read loop to terminate. Every other variant is fatal for the
/// reader that returned it.
#[derive(Debug, Error)]
pub enum PcapError {
    /// End of stream, at a block boundary
    #[error("end of stream")]
    Eof,
    /// Stream ended in the middle of a block
    #[error("unexpected end of stream (truncated capture)")]
    UnexpectedEof,
    /// The underlying byte source failed
    #[error("read error: {0}")]
    ReadError(#[from] io::Error),

    /// First block is not a section header, or byte-order magic not recognized
    #[error("header not recognized")]
    HeaderNotRecognized,
    #[error("invalid length {len} for block type {block_type:#010x}")]
    InvalidBlockLength { block_type: u32, len: u32 },
    #[error("block type {block_type:#010x}: leading length {len1} differs from trailing length {len2}")]
    BlockLengthMismatch { block_type: u32, len1: u32, len2: u32 },
    #[error("block length {len} exceeds maximum of {max} bytes")]
    BlockTooLarge { len: u32, max: usize },
    #[error("packet references interface {if_id}, but section has {count} interface(s)")]
    InvalidInterface { if_id: u32, count: usize },
    #[error("captured length {caplen} exceeds limit of {limit} bytes")]
    CaptureLengthExceeded { caplen: u32, limit: u32 },
    #[error("timestamp out of range")]
    TimestampOutOfRange,
    #[error("malformed block content ({0:?})")]
    NomError(ErrorKind),

    /// Interfaces declare more than one link type, which a single-link-type read cannot represent
    #[error("capture uses per-packet encapsulation (link types: {linktypes:?})")]
    PerPacketEncapsulation { linktypes: Vec<Linktype> },

    /// A previous call returned a fatal error
    #[error("reader is unusable after a previous fatal error")]
    ReaderFailed,
}

impl PcapError {
    /// Returns true if the error reports malformed input data
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            PcapError::HeaderNotRecognized
                | PcapError::InvalidBlockLength { .. }
                | PcapError::BlockLengthMismatch { .. }
                | PcapError::BlockTooLarge { .. }
                | PcapError::InvalidInterface { .. }
                | PcapError::CaptureLengthExceeded { .. }
                | PcapError::TimestampOutOfRange
                | PcapError::NomError(_)
        )
    }

    /// Returns true for the end-of-stream signal
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, PcapError::Eof)
    }
}

impl<I> ParseError<I> for PcapError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        PcapError::NomError(kind)
    }
    fn append(_input: I, kind: ErrorKind, _other: Self) -> Self {
        PcapError::NomError(kind)
    }
}

/// Flatten a nom error from a complete (non-streaming) parser
///
/// Block bodies are always fully buffered before parsing, so `Incomplete` means the body is
/// shorter than its own fields claim.
pub(crate) fn flatten_nom_error(e: nom::Err<PcapError>) -> PcapError {
    match e {
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
        nom::Err::Incomplete(_) => PcapError::NomError(ErrorKind::Eof),
    }
}
