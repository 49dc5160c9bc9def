use std::mem;

use crate::display::Atom;
use crate::proto::{Event, PropertyState};
use crate::window::Property;

use super::atoms::TransferAtoms;
use super::error::Error;
use super::server::SelectionServer;

/// where a selection request stands. a transfer starts and finishes in `Idle`,
/// `NegotiationFailed` stays put until the caller resets it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    AwaitingAnswer,
    IncrementalTransfer,
    NegotiationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Pending,
    Complete,
}

/// bytes per item for a property format, the protocol only knows 8, 16 and 32.
/// anything else copies nothing
pub fn item_width(format: u8) -> usize {
    match format {
        8 => 1,
        16 => 2,
        32 => 4,
        _ => 0,
    }
}

fn payload(property: &Property) -> &[u8] {
    let len = property.items as usize * item_width(property.format);

    &property.value[..len.min(property.value.len())]
}

/// one selection request in flight, fed events until it hands back the assembled buffer
#[derive(Debug)]
pub struct Transfer {
    state: State,
    buffer: Vec<u8>,
    type_: Option<Atom>,
}

impl Default for Transfer {
    fn default() -> Self {
        Transfer::new()
    }
}

impl Transfer {
    pub fn new() -> Transfer {
        Transfer {
            state: State::Idle,
            buffer: Vec::new(),
            type_: None,
        }
    }

    pub fn state(&self) -> State { self.state }

    pub fn is_idle(&self) -> bool { self.state == State::Idle }

    /// back to `Idle` after a failed negotiation
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }

    /// the assembled buffer and its type, leaving the transfer empty
    pub fn take(&mut self) -> (Vec<u8>, Atom) {
        (mem::take(&mut self.buffer), self.type_.take().unwrap_or(Atom::NONE))
    }

    fn append(&mut self, chunk: &[u8]) -> Result<(), Error> {
        self.buffer.try_reserve(chunk.len()).map_err(|_| Error::AllocationFailure {
            requested: self.buffer.len() + chunk.len(),
        })?;

        self.buffer.extend_from_slice(chunk);

        Ok(())
    }

    /// advance the transfer by one event, `None` is only meaningful while idle
    pub fn step<S: SelectionServer + ?Sized>(
        &mut self,
        server: &mut S,
        event: Option<&Event>,
        selection: Atom,
        target: Atom,
    ) -> Result<Progress, Error> {
        let atoms = TransferAtoms::get(server)?;

        match (self.state, event) {
            (State::Idle, _) => {
                self.buffer = Vec::new();
                self.type_ = None;

                server.convert_selection(selection, target, atoms.property)?;

                self.state = State::AwaitingAnswer;

                Ok(Progress::Pending)
            },
            (State::AwaitingAnswer, Some(Event::SelectionNotify { property, .. })) => {
                self.answered(server, atoms, *property)
            },
            (State::IncrementalTransfer, Some(Event::PropertyNotify { atom, state: PropertyState::NewValue, .. })) if *atom == atoms.property => {
                self.chunk(server, atoms)
            },
            (state, event) => {
                if let Some(event) = event {
                    log::trace!("ignoring event {} while {:?}", event.opcode(), state);
                }

                Ok(Progress::Pending)
            },
        }
    }

    fn answered<S: SelectionServer + ?Sized>(&mut self, server: &mut S, atoms: TransferAtoms, property: Atom) -> Result<Progress, Error> {
        if property.is_null() {
            log::debug!("owner declined the conversion");

            self.state = State::NegotiationFailed;

            return Ok(Progress::Pending);
        }

        let probe = server.get_property(atoms.property, 0, 0, false)?;

        if probe.type_ == atoms.incr {
            log::debug!("owner started an incremental transfer");

            server.delete_property(atoms.property)?;
            server.flush()?;

            self.state = State::IncrementalTransfer;

            return Ok(Progress::Pending);
        }

        let property = server.get_property(atoms.property, 0, probe.bytes_after.div_ceil(4), false)?;

        server.delete_property(atoms.property)?;

        self.append(payload(&property))?;
        self.type_ = Some(property.type_);
        self.state = State::Idle;

        log::debug!("direct transfer complete: {} bytes of {}", self.buffer.len(), property.type_);

        Ok(Progress::Complete)
    }

    fn chunk<S: SelectionServer + ?Sized>(&mut self, server: &mut S, atoms: TransferAtoms) -> Result<Progress, Error> {
        let probe = server.get_property(atoms.property, 0, 0, false)?;

        if probe.bytes_after == 0 {
            server.delete_property(atoms.property)?;

            self.type_.get_or_insert(probe.type_);
            self.state = State::Idle;

            log::debug!("incremental transfer complete: {} bytes", self.buffer.len());

            return Ok(Progress::Complete);
        }

        let property = server.get_property(atoms.property, 0, probe.bytes_after.div_ceil(4), false)?;

        self.append(payload(&property))?;
        self.type_.get_or_insert(property.type_);

        log::trace!("incremental chunk: {} bytes, {} total", property.value.len(), self.buffer.len());

        server.delete_property(atoms.property)?;
        server.flush()?;

        Ok(Progress::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_width() {
        assert_eq!(item_width(8), 1);
        assert_eq!(item_width(16), 2);
        assert_eq!(item_width(32), 4);
        assert_eq!(item_width(0), 0);
        assert_eq!(item_width(24), 0);
    }

    #[test]
    fn test_payload_of_unknown_format_is_empty() {
        let property = Property {
            type_: Atom::STRING,
            format: 12,
            items: 3,
            bytes_after: 0,
            value: vec![1, 2, 3],
        };

        assert!(payload(&property).is_empty());
    }

    #[test]
    fn test_payload_never_reads_past_the_value() {
        let property = Property {
            type_: Atom::INTEGER,
            format: 32,
            items: 2,
            bytes_after: 0,
            value: vec![0; 6],
        };

        assert_eq!(payload(&property).len(), 6);
    }

    #[test]
    fn test_take_leaves_transfer_empty() {
        let mut transfer = Transfer::new();

        transfer.append(b"abc").unwrap();
        transfer.type_ = Some(Atom::STRING);

        assert_eq!(transfer.take(), (b"abc".to_vec(), Atom::STRING));
        assert_eq!(transfer.take(), (Vec::new(), Atom::NONE));
        assert!(transfer.is_idle());
    }
}
