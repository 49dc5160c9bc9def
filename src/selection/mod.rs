//! retrieving the contents of a selection.
//!
//! a [`transfer::Transfer`] asks the owner of a selection to convert it into a property on our
//! window and follows the owner through either a single reply or an incremental (INCR) transfer.
//! [`driver`] runs that against a [`SelectionServer`], applies the UTF8_STRING to STRING fallback
//! and the trailing newline policy, and hands the result to [`format`].

pub mod atoms;
pub mod driver;
pub mod error;
pub mod format;
pub mod server;
pub mod transfer;

pub use driver::{retrieve, run, Options, Retrieved};
pub use error::Error;
pub use server::{Requestor, SelectionServer};

use std::str::FromStr;

use crate::display::Atom;

/// which selection to read, `CutBuffer` is the legacy CUT_BUFFER0 on the root window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionKind {
    #[default]
    Primary,
    Secondary,
    Clipboard,
    CutBuffer,
}

impl SelectionKind {
    pub fn atom<S: SelectionServer + ?Sized>(&self, server: &mut S) -> Result<Atom, Error> {
        match self {
            SelectionKind::Primary => Ok(Atom::PRIMARY),
            SelectionKind::Secondary => Ok(Atom::SECONDARY),
            SelectionKind::Clipboard => server.intern_atom(atoms::CLIPBOARD, false),
            SelectionKind::CutBuffer => Ok(Atom::STRING),
        }
    }
}

impl FromStr for SelectionKind {
    type Err = String;

    /// any non-empty prefix of a selection name, so `c` and `clip` both mean clipboard
    fn from_str(name: &str) -> Result<SelectionKind, String> {
        let kinds = [
            ("primary", SelectionKind::Primary),
            ("secondary", SelectionKind::Secondary),
            ("clipboard", SelectionKind::Clipboard),
            ("buffer-cut", SelectionKind::CutBuffer),
        ];

        kinds.iter()
            .find(|(full, _)| !name.is_empty() && full.starts_with(name))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| format!("unknown selection: {}", name))
    }
}

/// the target to ask for, STRING when utf8 is disabled, otherwise the named target or UTF8_STRING
pub fn target<S: SelectionServer + ?Sized>(server: &mut S, name: Option<&str>, noutf8: bool) -> Result<Atom, Error> {
    match name {
        _ if noutf8 => Ok(Atom::STRING),
        Some(name) => server.intern_atom(name, false),
        None => server.intern_atom(atoms::UTF8_STRING, false),
    }
}
