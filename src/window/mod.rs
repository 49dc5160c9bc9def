use crate::display::request::{self, *};
use crate::display::error::Error;
use crate::display::{xid, Atom, Handle};
use crate::proto::*;


pub struct WindowArguments {
    pub depth: u8,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub border_width: u16,
    pub class: WindowClass,
    pub visual: u32,
}

/// the reply to a GetProperty request, `value` holds `items` elements of `format` bits each
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Property {
    pub type_: Atom,
    pub format: u8,
    pub items: u32,
    pub bytes_after: u32,
    pub value: Vec<u8>,
}

#[derive(Clone)]
pub struct Window {
    handle: Handle,
    id: u32,
    depth: u8,
    visual: u32,
}

impl Window {
    pub(crate) fn new(handle: Handle, id: u32, depth: u8, visual: u32) -> Window {
        Window {
            handle,
            id,
            depth,
            visual,
        }
    }

    /// window id
    pub fn id(&self) -> u32 { self.id }

    /// window depth
    pub fn depth(&self) -> u8 { self.depth }

    /// visual assigned to the window
    pub fn visual(&self) -> u32 { self.visual }

    /// create a child window with provided window arguments
    pub fn create_window(&self, window: WindowArguments) -> Result<Window, Error> {
        let wid = xid::next()?;

        self.handle.lock()?.request(
            CreateWindow {
                opcode: Opcode::CREATE_WINDOW,
                depth: window.depth,
                length: 8,
                wid,
                parent: self.id(),
                x: window.x,
                y: window.y,
                width: window.width,
                height: window.height,
                border_width: window.border_width,
                class: window.class as u16,
                visual: window.visual,
                value_mask: 0,
            },
            &[],
        );

        log::debug!("created window {:#x} under {:#x}", wid, self.id());

        Ok(Window::new(self.handle.clone(), wid, window.depth, window.visual))
    }

    /// choose the events you want to recieve
    pub fn select_input(&self, events: &[EventMask]) -> Result<(), Error> {
        let mask = events.iter()
            .map(|event_mask| *event_mask as u32)
            .fold(0, |acc, x| acc | x);

        self.handle.lock()?.request(
            ChangeWindowAttributes {
                opcode: Opcode::CHANGE_WINDOW_ATTRIBUTES,
                pad0: 0,
                length: 4,
                wid: self.id(),
                mask: 0x00000800,
            },
            request::encode(&mask),
        );

        Ok(())
    }

    /// ask the owner of `selection` to convert it to `target` and store the result in `property` on this window
    pub fn convert_selection(&self, selection: Atom, target: Atom, property: Atom) -> Result<(), Error> {
        self.handle.lock()?.request(
            ConvertSelection {
                opcode: Opcode::CONVERT_SELECTION,
                pad0: 0,
                length: 6,
                requestor: self.id(),
                selection: selection.id(),
                target: target.id(),
                property: property.id(),
                time: 0,
            },
            &[],
        );

        Ok(())
    }

    /// delete a property from a window
    pub fn delete_property(&self, property: Atom) -> Result<(), Error> {
        self.handle.lock()?.request(
            DeleteProperty {
                opcode: Opcode::DELETE_PROPERTY,
                pad0: 0,
                length: 3,
                window: self.id(),
                property: property.id(),
            },
            &[],
        );

        Ok(())
    }

    /// get the value of a property from a window, `long_offset` and `long_length` count 32-bit units
    pub fn get_property(
        &self,
        property: Atom,
        type_: Atom,
        long_offset: u32,
        long_length: u32,
        delete: bool,
    ) -> Result<Property, Error> {
        let mut connection = self.handle.lock()?;

        let sequence = connection.request(
            GetProperty {
                opcode: Opcode::GET_PROPERTY,
                delete: delete as u8,
                length: 6,
                window: self.id(),
                property: property.id(),
                type_: type_.id(),
                long_offset,
                long_length,
            },
            &[],
        );

        let (header, mut data) = connection.wait_reply(sequence)?;
        let reply: GetPropertyResponse = request::decode(&header)?;

        let len = reply.value_len as usize * (reply.format as usize / 8);

        if len > data.len() {
            return Err(Error::InvalidReply);
        }

        data.truncate(len);

        Ok(Property {
            type_: Atom::new(reply.type_),
            format: reply.format,
            items: reply.value_len,
            bytes_after: reply.bytes_after,
            value: data,
        })
    }
}
