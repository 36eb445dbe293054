use log::{debug, warn};

use crate::error::PcapError;
use crate::linktype::Linktype;

use super::*;

/// Identifies an interface across all sections of a file
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct InterfaceId {
    /// Index of the section, in order of appearance
    pub section: usize,
    /// Index of the interface in its section
    pub interface: u32,
}

/// Sections and interfaces seen so far, and the set of distinct link types
///
/// All sections are kept for the lifetime of the registry, but only the last one is used to
/// resolve interface identifiers. The set of link types only grows.
#[derive(Debug, Default)]
pub struct InterfaceRegistry {
    sections: Vec<Section>,
    // distinct link types, in registration order
    linktypes: Vec<Linktype>,
}

impl InterfaceRegistry {
    pub fn new() -> InterfaceRegistry {
        InterfaceRegistry::default()
    }

    /// Start a new section, which becomes the current one
    ///
    /// Returns the section index.
    pub fn open_section(&mut self, shb: &SectionHeaderBlock) -> usize {
        let section = Section::from_header(shb);
        debug!(
            "section {}: {:?}, version {}.{}",
            self.sections.len(),
            section.byte_order,
            section.major_version,
            section.minor_version
        );
        self.sections.push(section);
        self.sections.len() - 1
    }

    /// Add an interface to the current section
    ///
    /// Returns `None` if no section was opened.
    pub fn register_interface(&mut self, idb: &InterfaceDescriptionBlock) -> Option<InterfaceId> {
        let section_index = self.sections.len().checked_sub(1)?;
        let section = &mut self.sections[section_index];
        let index = section.interfaces.len() as u32;
        let interface = Interface::from_description(index, idb);
        debug!(
            "section {} interface {}: linktype {}, snaplen {}, tsresol {:#x}",
            section_index, index, interface.linktype, interface.snaplen, idb.if_tsresol
        );
        if !self.linktypes.contains(&interface.linktype) {
            self.linktypes.push(interface.linktype);
            if self.linktypes.len() == 2 {
                warn!(
                    "mixed link types {:?}, packets need per-packet encapsulation",
                    self.linktypes
                );
            }
        }
        section.interfaces.push(interface);
        Some(InterfaceId {
            section: section_index,
            interface: index,
        })
    }

    /// Resolve an interface identifier of the current section
    pub fn resolve(&self, if_id: u32) -> Result<(InterfaceId, &Interface), PcapError> {
        match self.sections.last() {
            Some(section) => {
                let interface = section.interface(if_id)?;
                let id = InterfaceId {
                    section: self.sections.len() - 1,
                    interface: if_id,
                };
                Ok((id, interface))
            }
            None => Err(PcapError::InvalidInterface { if_id, count: 0 }),
        }
    }

    pub fn interface(&self, id: InterfaceId) -> Option<&Interface> {
        self.sections
            .get(id.section)
            .and_then(|s| s.interfaces.get(id.interface as usize))
    }

    /// All sections, in order of appearance
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.last()
    }

    /// Number of interfaces, in all sections
    pub fn num_interfaces(&self) -> usize {
        self.sections.iter().map(|s| s.interfaces.len()).sum()
    }

    /// Distinct link types of all interfaces, in registration order
    pub fn linktypes(&self) -> &[Linktype] {
        &self.linktypes
    }

    /// The link type shared by all interfaces, if there is exactly one
    pub fn linktype(&self) -> Option<Linktype> {
        match self.linktypes.as_slice() {
            [linktype] => Some(*linktype),
            _ => None,
        }
    }

    /// True if interfaces declare more than one link type
    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        self.linktypes.len() > 1
    }
}
