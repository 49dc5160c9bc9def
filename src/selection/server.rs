use crate::display::{Atom, Display};
use crate::proto::{Event, EventMask, WindowClass};
use crate::window::{Property, Window, WindowArguments};

use super::error::Error;

/// what retrieving a selection needs from the x server. properties are always read from and
/// deleted on the requestor's own window, conversions are requested at CurrentTime
pub trait SelectionServer {
    fn intern_atom(&mut self, name: &str, only_if_exists: bool) -> Result<Atom, Error>;

    /// the answer arrives later as a SelectionNotify event
    fn convert_selection(&mut self, selection: Atom, target: Atom, property: Atom) -> Result<(), Error>;

    /// read a property of any type, offset and length count 32-bit units
    fn get_property(&mut self, property: Atom, long_offset: u32, long_length: u32, delete: bool) -> Result<Property, Error>;

    fn delete_property(&mut self, property: Atom) -> Result<(), Error>;

    fn flush(&mut self) -> Result<(), Error>;

    /// blocks without a timeout
    fn next_event(&mut self) -> Result<Event, Error>;

    fn atom_name(&mut self, atom: Atom) -> Result<String, Error>;

    /// contents of CUT_BUFFER0 on the root window, empty unless it holds 8-bit STRING data
    fn fetch_cut_buffer(&mut self) -> Result<Vec<u8>, Error>;
}

/// an invisible 1x1 window listening for property changes, used as the requestor of conversions
pub struct Requestor {
    display: Display,
    root: Window,
    window: Window,
}

impl Requestor {
    pub fn new(display: Display) -> Result<Requestor, Error> {
        let root = display.default_root_window()?;

        let window = root.create_window(WindowArguments {
            depth: 0,
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            border_width: 0,
            class: WindowClass::InputOutput,
            visual: 0,
        })?;

        window.select_input(&[EventMask::PropertyChange])?;

        Ok(Requestor {
            display,
            root,
            window,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl SelectionServer for Requestor {
    fn intern_atom(&mut self, name: &str, only_if_exists: bool) -> Result<Atom, Error> {
        Ok(self.display.intern_atom(name, only_if_exists)?)
    }

    fn convert_selection(&mut self, selection: Atom, target: Atom, property: Atom) -> Result<(), Error> {
        log::debug!("convert_selection: selection={}, target={}, property={}", selection, target, property);

        Ok(self.window.convert_selection(selection, target, property)?)
    }

    fn get_property(&mut self, property: Atom, long_offset: u32, long_length: u32, delete: bool) -> Result<Property, Error> {
        Ok(self.window.get_property(property, Atom::ANY_PROPERTY_TYPE, long_offset, long_length, delete)?)
    }

    fn delete_property(&mut self, property: Atom) -> Result<(), Error> {
        Ok(self.window.delete_property(property)?)
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(self.display.flush()?)
    }

    fn next_event(&mut self) -> Result<Event, Error> {
        Ok(self.display.next_event()?)
    }

    fn atom_name(&mut self, atom: Atom) -> Result<String, Error> {
        Ok(self.display.get_atom_name(atom)?)
    }

    fn fetch_cut_buffer(&mut self) -> Result<Vec<u8>, Error> {
        let probe = self.root.get_property(Atom::CUT_BUFFER0, Atom::STRING, 0, 0, false)?;

        if probe.type_ != Atom::STRING || probe.format != 8 {
            return Ok(Vec::new());
        }

        let property = self.root.get_property(Atom::CUT_BUFFER0, Atom::STRING, 0, probe.bytes_after.div_ceil(4), false)?;

        Ok(property.value)
    }
}
