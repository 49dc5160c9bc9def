use std::sync::OnceLock;

use crate::display::Atom;

use super::error::Error;
use super::server::SelectionServer;

/// the property on our window the owner writes the converted selection into
pub const SCRATCH_PROPERTY: &str = "XSELECTION_OUT";

pub const INCR: &str = "INCR";
pub const UTF8_STRING: &str = "UTF8_STRING";
pub const CLIPBOARD: &str = "CLIPBOARD";
pub const HTML: &str = "text/html";

static TRANSFER_ATOMS: OnceLock<TransferAtoms> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferAtoms {
    pub property: Atom,
    pub incr: Atom,
}

impl TransferAtoms {
    /// interned on first use and kept for the lifetime of the process
    pub fn get<S: SelectionServer + ?Sized>(server: &mut S) -> Result<TransferAtoms, Error> {
        if let Some(atoms) = TRANSFER_ATOMS.get() {
            return Ok(*atoms);
        }

        let atoms = TransferAtoms {
            property: server.intern_atom(SCRATCH_PROPERTY, false)?,
            incr: server.intern_atom(INCR, false)?,
        };

        log::debug!("transfer atoms: property={}, incr={}", atoms.property, atoms.incr);

        Ok(*TRANSFER_ATOMS.get_or_init(|| atoms))
    }
}
