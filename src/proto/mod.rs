use crate::display::Atom;


#[non_exhaustive]
pub struct Response;

impl Response {
    pub const ERROR: u8 = 0;
    pub const REPLY: u8 = 1;

    pub const PROPERTY_NOTIFY: u8 = 28;
    pub const SELECTION_NOTIFY: u8 = 31;
}

#[non_exhaustive]
pub struct Opcode;

impl Opcode {
    pub const CREATE_WINDOW: u8 = 1;
    pub const CHANGE_WINDOW_ATTRIBUTES: u8 = 2;
    pub const INTERN_ATOM: u8 = 16;
    pub const GET_ATOM_NAME: u8 = 17;
    pub const DELETE_PROPERTY: u8 = 19;
    pub const GET_PROPERTY: u8 = 20;
    pub const CONVERT_SELECTION: u8 = 24;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub enum ErrorCode {
    Request,
    Value,
    Window,
    Pixmap,
    Atom,
    Cursor,
    Font,
    Match,
    Drawable,
    Access,
    Alloc,
    Colormap,
    GContext,
    IdChoice,
    Name,
    Length,
    Implementation,
    Unknown,
}

impl From<u8> for ErrorCode {
    fn from(value: u8) -> ErrorCode {
        match value {
            1 => ErrorCode::Request,
            2 => ErrorCode::Value,
            3 => ErrorCode::Window,
            4 => ErrorCode::Pixmap,
            5 => ErrorCode::Atom,
            6 => ErrorCode::Cursor,
            7 => ErrorCode::Font,
            8 => ErrorCode::Match,
            9 => ErrorCode::Drawable,
            10 => ErrorCode::Access,
            11 => ErrorCode::Alloc,
            12 => ErrorCode::Colormap,
            13 => ErrorCode::GContext,
            14 => ErrorCode::IdChoice,
            15 => ErrorCode::Name,
            16 => ErrorCode::Length,
            17 => ErrorCode::Implementation,
            _ => ErrorCode::Unknown,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Unknown => f.write_str("unknown error"),
            code => f.write_fmt(format_args!("Bad{:?}", code)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum WindowClass {
    InputOutput = 1,
}

#[derive(Clone, Copy)]
pub enum EventMask {
    PropertyChange = 4194304,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyState {
    NewValue,
    Deleted,
}

impl From<u8> for PropertyState {
    fn from(value: u8) -> PropertyState {
        match value {
            0 => PropertyState::NewValue,
            _ => PropertyState::Deleted,
        }
    }
}

/// the events a selection requestor cares about, everything else is reported by its opcode only
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PropertyNotify {
        window: u32,
        atom: Atom,
        time: u32,
        state: PropertyState,
    },
    SelectionNotify {
        time: u32,
        requestor: u32,
        selection: Atom,
        target: Atom,
        property: Atom,
    },
    Other {
        opcode: u8,
    },
}

impl Event {
    pub fn opcode(&self) -> u8 {
        match self {
            Event::PropertyNotify { .. } => Response::PROPERTY_NOTIFY,
            Event::SelectionNotify { .. } => Response::SELECTION_NOTIFY,
            Event::Other { opcode } => *opcode,
        }
    }
}
