//! display owns the connection to the x11 server.
//!
//! requests are queued in an outgoing buffer and written on [`Display::flush`] or before any
//! blocking read. replies are read synchronously, events that arrive while a reply is awaited
//! are queued and handed out by [`Display::next_event`] in the order they were received.

pub mod error;
pub mod parse;
pub mod auth;
pub mod request;
pub mod xid;

use error::Error;
use request::*;
use parse::DisplayInfo;
use auth::Entry;

use crate::proto::*;
use crate::window::Window;

use std::os::unix::net::UnixStream;
use std::net::TcpStream;
use std::io::{Read, Write};
use std::collections::VecDeque;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;
use std::env;
use std::mem;

// https://www.x.org/docs/XProtocol/proto.pdf

const X_TCP_PORT: u16 = 6000;
const X_PROTOCOL: u16 = 11;
const X_PROTOCOL_REVISION: u16 = 0;

/// an interned name, the numeric values of the predefined atoms are fixed by the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Atom {
    id: u32,
}

impl Atom {
    pub const NONE: Atom = Atom::new(0);
    pub const ANY_PROPERTY_TYPE: Atom = Atom::new(0);
    pub const PRIMARY: Atom = Atom::new(1);
    pub const SECONDARY: Atom = Atom::new(2);
    pub const ATOM: Atom = Atom::new(4);
    pub const CUT_BUFFER0: Atom = Atom::new(9);
    pub const INTEGER: Atom = Atom::new(19);
    pub const STRING: Atom = Atom::new(31);

    pub const fn new(id: u32) -> Atom {
        Atom {
            id,
        }
    }

    pub fn id(&self) -> u32 { self.id }

    pub fn is_null(&self) -> bool { self.id == 0 }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Atom({})", self.id))
    }
}

pub trait Transport: Read + Write {}

impl<T> Transport for T where T: Read + Write {}

pub struct Stream {
    inner: Box<dyn Transport>,
    outgoing: Vec<u8>,
}

impl Stream {
    pub fn new<T: Transport + 'static>(inner: T) -> Stream {
        Stream {
            inner: Box::new(inner),
            outgoing: Vec::new(),
        }
    }

    pub fn send(&mut self, bytes: &[u8]) {
        self.outgoing.extend_from_slice(bytes);
    }

    pub fn send_encode<T>(&mut self, request: T) {
        self.send(request::encode(&request));
    }

    pub fn send_pad(&mut self, bytes: &[u8]) {
        self.send(bytes);

        self.outgoing.resize(self.outgoing.len() + request::pad(bytes.len()), 0);
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        if !self.outgoing.is_empty() {
            self.inner.write_all(&self.outgoing)?;
            self.outgoing.clear();
        }

        self.inner.flush()?;

        Ok(())
    }

    pub fn recv(&mut self, size: usize) -> Result<Vec<u8>, Error> {
        self.flush()?;

        let mut buffer = vec![0u8; size];

        self.inner.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    pub fn recv_decode<R>(&mut self) -> Result<R, Error> {
        let bytes = self.recv(mem::size_of::<R>())?;

        request::decode(&bytes)
    }
}

/// anything the server can send us, every message is 32 bytes, replies may carry more
enum Message {
    Reply {
        header: Vec<u8>,
        data: Vec<u8>,
    },
    Error(ErrorEvent),
    Event(Event),
}

pub struct Connection {
    stream: Stream,
    sequence: u16,
    events: VecDeque<Event>,
}

impl Connection {
    fn new(stream: Stream) -> Connection {
        Connection {
            stream,
            sequence: 0,
            events: VecDeque::new(),
        }
    }

    /// queue a request and return the sequence number the server will refer to it by
    pub fn request<T>(&mut self, header: T, data: &[u8]) -> u16 {
        self.stream.send_encode(header);
        self.stream.send_pad(data);

        self.sequence = self.sequence.wrapping_add(1);

        log::trace!("request queued, sequence={}", self.sequence);

        self.sequence
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.stream.flush()
    }

    fn recv_message(&mut self) -> Result<Message, Error> {
        let block = self.stream.recv(32)?;

        match block[0] {
            Response::ERROR => Ok(Message::Error(request::decode(&block)?)),
            Response::REPLY => {
                let reply: GenericReply = request::decode(&block)?;
                let data = self.stream.recv(reply.length as usize * 4)?;

                Ok(Message::Reply { header: block, data })
            },
            _ => Ok(Message::Event(Connection::parse_event(&block)?)),
        }
    }

    fn parse_event(block: &[u8]) -> Result<Event, Error> {
        match block[0] & 0x7f {
            Response::PROPERTY_NOTIFY => {
                let event: PropertyNotify = request::decode(block)?;

                Ok(Event::PropertyNotify {
                    window: event.window,
                    atom: Atom::new(event.atom),
                    time: event.time,
                    state: PropertyState::from(event.state),
                })
            },
            Response::SELECTION_NOTIFY => {
                let event: SelectionNotify = request::decode(block)?;

                Ok(Event::SelectionNotify {
                    time: event.time,
                    requestor: event.requestor,
                    selection: Atom::new(event.selection),
                    target: Atom::new(event.target),
                    property: Atom::new(event.property),
                })
            },
            opcode => Ok(Event::Other { opcode }),
        }
    }

    fn request_error(error: ErrorEvent) -> Error {
        Error::Request {
            code: ErrorCode::from(error.code),
            sequence: error.sequence,
            major_opcode: error.major_opcode,
            bad_value: error.bad_value,
        }
    }

    /// block until the reply for `sequence` arrives, every x11 error is fatal to the caller
    pub fn wait_reply(&mut self, sequence: u16) -> Result<(Vec<u8>, Vec<u8>), Error> {
        loop {
            match self.recv_message()? {
                Message::Reply { header, data } => {
                    let reply: GenericReply = request::decode(&header)?;

                    if reply.sequence == sequence {
                        return Ok((header, data));
                    }

                    log::debug!("dropping reply for sequence {}, waiting for {}", { reply.sequence }, sequence);
                },
                Message::Error(error) => return Err(Connection::request_error(error)),
                Message::Event(event) => self.events.push_back(event),
            }
        }
    }

    pub fn next_event(&mut self) -> Result<Event, Error> {
        if let Some(event) = self.events.pop_front() {
            return Ok(event);
        }

        loop {
            match self.recv_message()? {
                Message::Event(event) => return Ok(event),
                Message::Error(error) => return Err(Connection::request_error(error)),
                Message::Reply { .. } => log::debug!("dropping unexpected reply"),
            }
        }
    }
}

/// shared handle to the connection, everything here is single threaded
#[derive(Clone)]
pub struct Handle {
    connection: Rc<RefCell<Connection>>,
}

impl Handle {
    fn new(connection: Connection) -> Handle {
        Handle {
            connection: Rc::new(RefCell::new(connection)),
        }
    }

    pub fn lock(&self) -> Result<RefMut<'_, Connection>, Error> {
        self.connection.try_borrow_mut().map_err(|_| Error::FailedToLock)
    }
}

#[derive(Debug, Clone)]
pub struct Screen {
    pub root: u32,
    pub root_depth: u8,
    pub root_visual: u32,
}

#[derive(Clone)]
pub struct Display {
    handle: Handle,
    roots: Vec<Screen>,
}

impl Display {
    pub fn connect<T: Transport + 'static>(inner: T, auth: Option<Entry>) -> Result<Display, Error> {
        let mut stream = Stream::new(inner);

        let roots = Display::setup(&mut stream, auth)?;

        Ok(Display {
            handle: Handle::new(Connection::new(stream)),
            roots,
        })
    }

    fn endian() -> u8 {
        if cfg!(target_endian = "little") { 0x6c } else { 0x42 }
    }

    fn setup(stream: &mut Stream, auth: Option<Entry>) -> Result<Vec<Screen>, Error> {
        let (name, data) = auth.map(|entry| (entry.name, entry.data)).unwrap_or_default();

        stream.send_encode(SetupRequest::new(
            Display::endian(),
            X_PROTOCOL,
            X_PROTOCOL_REVISION,
            name.len() as u16,
            data.len() as u16,
        ));

        stream.send_pad(&name);
        stream.send_pad(&data);

        let response: SetupResponse = stream.recv_decode()?;
        let body = stream.recv(response.length as usize * 4)?;

        log::debug!("setup response: status={}, version={}.{}", response.status, { response.major_version }, { response.minor_version });

        let reason = |len: usize| String::from_utf8_lossy(&body[..len.min(body.len())]).trim_end_matches('\0').to_string();

        match response.status {
            1 => Display::read_setup(&body),
            0 => Err(Error::SetupFailed { reason: reason(response.reason_len as usize) }),
            2 => Err(Error::Authenthicate { reason: reason(body.len()) }),
            _ => Err(Error::InvalidStatus),
        }
    }

    fn read_setup(body: &[u8]) -> Result<Vec<Screen>, Error> {
        let response: SuccessResponse = request::decode(body)?;

        let mut offset = mem::size_of::<SuccessResponse>();

        offset += response.vendor_len as usize + request::pad(response.vendor_len as usize);
        offset += mem::size_of::<PixmapFormat>() * response.pixmap_formats_len as usize;

        let mut roots = Vec::with_capacity(response.roots_len as usize);

        for _ in 0..response.roots_len {
            let screen: ScreenResponse = request::decode(body.get(offset..).ok_or(Error::InvalidReply)?)?;

            offset += mem::size_of::<ScreenResponse>();

            for _ in 0..screen.allowed_depths_len {
                let depth: DepthResponse = request::decode(body.get(offset..).ok_or(Error::InvalidReply)?)?;

                offset += mem::size_of::<DepthResponse>() + mem::size_of::<VisualResponse>() * depth.visuals_len as usize;
            }

            roots.push(Screen {
                root: screen.root,
                root_depth: screen.root_depth,
                root_visual: screen.root_visual,
            });
        }

        xid::setup(response.resource_id_base, response.resource_id_mask)?;

        Ok(roots)
    }

    pub fn default_root_window(&self) -> Result<Window, Error> {
        let screen = self.roots.first().ok_or(Error::NoScreens)?;

        Ok(Window::new(self.handle.clone(), screen.root, screen.root_depth, screen.root_visual))
    }

    /// get the atom for a name, `only_if_exists` makes a missing name come back as [`Atom::NONE`]
    pub fn intern_atom(&self, name: &str, only_if_exists: bool) -> Result<Atom, Error> {
        let mut connection = self.handle.lock()?;

        let sequence = connection.request(
            InternAtom {
                opcode: Opcode::INTERN_ATOM,
                only_if_exists: only_if_exists as u8,
                length: 2 + (name.len() + request::pad(name.len())) as u16 / 4,
                name_len: name.len() as u16,
                pad1: [0; 2],
            },
            name.as_bytes(),
        );

        let (header, _) = connection.wait_reply(sequence)?;
        let reply: InternAtomResponse = request::decode(&header)?;

        log::trace!("intern_atom: {} = {}", name, { reply.atom });

        Ok(Atom::new(reply.atom))
    }

    pub fn get_atom_name(&self, atom: Atom) -> Result<String, Error> {
        let mut connection = self.handle.lock()?;

        let sequence = connection.request(
            GetAtomName {
                opcode: Opcode::GET_ATOM_NAME,
                pad0: 0,
                length: 2,
                atom: atom.id(),
            },
            &[],
        );

        let (header, data) = connection.wait_reply(sequence)?;
        let reply: GetAtomNameResponse = request::decode(&header)?;

        let name = data.get(..reply.name_len as usize).ok_or(Error::InvalidReply)?;

        Ok(atom_name(name.to_vec()))
    }

    /// block until the next event arrives
    pub fn next_event(&self) -> Result<Event, Error> {
        self.handle.lock()?.next_event()
    }

    /// write every queued request to the server
    pub fn flush(&self) -> Result<(), Error> {
        self.handle.lock()?.flush()
    }
}

/// atom names are STRING8, decode them as latin-1 unless they happen to be valid utf-8
fn atom_name(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| {
        err.into_bytes().into_iter().map(char::from).collect()
    })
}

pub fn open_tcp(host: &str, display: u16, auth: Option<Entry>) -> Result<Display, Error> {
    let stream = TcpStream::connect((host, X_TCP_PORT + display))?;

    stream.set_nodelay(true)?;

    Display::connect(stream, auth)
}

pub fn open_unix(display: u16, auth: Option<Entry>) -> Result<Display, Error> {
    let stream = UnixStream::connect(format!("/tmp/.X11-unix/X{}", display))?;

    Display::connect(stream, auth)
}

/// the name of the display [`open`] would connect to
pub fn name(display: Option<&str>) -> Option<String> {
    display.map(|display| display.to_string()).or_else(|| env::var("DISPLAY").ok())
}

/// open a connection to the display, `None` means the one named by $DISPLAY
pub fn open(display: Option<&str>) -> Result<Display, Error> {
    let name = name(display).ok_or(Error::InvalidDisplay)?;
    let info: DisplayInfo = parse::parse(&name)?;
    let auth = auth::entry(&info);

    log::debug!("opening display {:?}", info);

    if info.is_local() {
        open_unix(info.display, auth)
    } else {
        open_tcp(&info.host, info.display, auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_name_utf8() {
        assert_eq!(atom_name(b"UTF8_STRING".to_vec()), "UTF8_STRING");
        assert_eq!(atom_name("text/\u{e9}".as_bytes().to_vec()), "text/\u{e9}");
    }

    #[test]
    fn test_atom_name_latin1() {
        assert_eq!(atom_name(vec![b'c', b'a', b'f', 0xe9]), "caf\u{e9}");
        assert_eq!(atom_name(vec![0xff]), "\u{ff}");
    }
}
