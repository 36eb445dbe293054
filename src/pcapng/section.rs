use chrono::{DateTime, Utc};

use crate::endianness::ByteOrder;
use crate::error::PcapError;
use crate::linktype::Linktype;

use super::*;

/// A section of a PcapNG file, as opened by a Section Header Block
///
/// Interfaces are owned by the section that declared them, and interface identifiers in
/// packet blocks are indices into the section's interface list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    pub byte_order: ByteOrder,
    pub major_version: u16,
    pub minor_version: u16,
    /// Length of the section, or -1 if not specified
    pub section_len: i64,
    pub hardware: Option<String>,
    pub os: Option<String>,
    pub user_application: Option<String>,
    pub comments: Vec<String>,
    pub interfaces: Vec<Interface>,
}

impl Section {
    pub fn from_header(shb: &SectionHeaderBlock) -> Section {
        Section {
            byte_order: shb.byte_order(),
            major_version: shb.major_version,
            minor_version: shb.minor_version,
            section_len: shb.section_len,
            hardware: shb.shb_hardware(),
            os: shb.shb_os(),
            user_application: shb.shb_userappl(),
            comments: shb.comments(),
            interfaces: Vec::new(),
        }
    }

    /// Resolve an interface identifier from a packet block
    pub fn interface(&self, if_id: u32) -> Result<&Interface, PcapError> {
        self.interfaces
            .get(if_id as usize)
            .ok_or(PcapError::InvalidInterface {
                if_id,
                count: self.interfaces.len(),
            })
    }
}

/// A capture interface, as described by an Interface Description Block
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interface {
    /// Index of the interface in its section
    pub index: u32,
    pub linktype: Linktype,
    /// Maximum number of captured bytes per packet, or 0 if unlimited
    pub snaplen: u32,
    pub ts_resolution: TsResolution,
    /// Offset added to timestamps, in seconds
    pub ts_offset: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub filter: Option<String>,
    pub os: Option<String>,
    pub comments: Vec<String>,
}

impl Interface {
    pub fn from_description(index: u32, idb: &InterfaceDescriptionBlock) -> Interface {
        Interface {
            index,
            linktype: idb.linktype,
            snaplen: idb.snaplen,
            ts_resolution: idb.ts_resolution(),
            ts_offset: idb.ts_offset(),
            name: idb.if_name(),
            description: idb.if_description(),
            filter: idb.if_filter(),
            os: idb.if_os(),
            comments: idb.comments(),
        }
    }

    /// Absolute timestamp of a packet captured on this interface
    #[inline]
    pub fn timestamp(&self, ts_high: u32, ts_low: u32) -> Result<DateTime<Utc>, PcapError> {
        build_timestamp(ts_high, ts_low, self.ts_resolution, self.ts_offset)
    }

    /// Check a captured length against the interface snaplen
    ///
    /// Writers sometimes count the block padding in the captured length, so the limit is the
    /// snaplen rounded up to 4 bytes. A snaplen of 0 means no limit.
    pub fn check_caplen(&self, caplen: u32) -> Result<(), PcapError> {
        if self.snaplen == 0 {
            return Ok(());
        }
        let limit = (u64::from(self.snaplen) + 3) & !3;
        if u64::from(caplen) > limit {
            return Err(PcapError::CaptureLengthExceeded {
                caplen,
                limit: limit.min(u64::from(u32::MAX)) as u32,
            });
        }
        Ok(())
    }
}
