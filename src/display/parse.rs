use crate::display::error::*;

use std::iter::Peekable;
use std::str::Chars;


/// represents which protocol the x11 connection should use

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Protocol {
    TcpSocket,

    #[default]
    UnixSocket,
}

impl Protocol {
    pub fn from(value: String) -> Result<Protocol, Error> {
        match value.to_lowercase().as_str() {
            "unix" | "local" => Ok(Protocol::UnixSocket),
            "tcp" | "inet" => Ok(Protocol::TcpSocket),
            _ => Err(Error::InvalidProtocol { protocol: value }),
        }
    }
}

/// representing the $DISPLAY environment variable
/// syntax: <host>/<protocol>:<display>.<screen>

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayInfo {
    pub host: String,
    pub protocol: Protocol,
    pub display: u16,
    pub screen: u16,
}

impl DisplayInfo {
    /// connect over the local unix socket. [`parse`] picks tcp for a named host other than `unix`
    /// when no protocol was written
    pub fn is_local(&self) -> bool {
        self.protocol == Protocol::UnixSocket
    }
}

#[derive(PartialEq)]
pub enum State {
    Host,
    Protocol,
    Display,
    Screen,
    Finished,
}

pub struct Iter<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Iter<'a> {
    pub fn new(chars: Peekable<Chars<'a>>) -> Iter<'a> {
        Iter {
            chars,
        }
    }

    pub fn take_while<F: Fn(&char) -> bool>(&mut self, f: F) -> String {
        let mut buf = String::new();

        while let Some(c) = self.chars.next_if(|c| f(c)) {
            buf.push(c);
        }

        buf
    }

    pub fn next_option(&mut self) -> Option<char> { self.chars.next() }

    pub fn next(&mut self) -> Result<char, Error> {
        self.chars.next().ok_or(Error::InvalidDisplay)
    }
}

/// this parses the $DISPLAY environment variable using a state machine
pub struct Parser<'a> {
    iter: Iter<'a>,
    display: DisplayInfo,
    state: State,
    explicit_protocol: bool,
}

impl<'a> Parser<'a> {
    pub fn new(display: &'a str) -> Parser<'a> {
        Parser {
            iter: Iter::new(display.chars().peekable()),
            display: DisplayInfo::default(),
            state: State::Host,
            explicit_protocol: false,
        }
    }

    fn number(&mut self) -> Result<u16, Error> {
        self.iter.take_while(|c| c.is_ascii_digit())
            .parse::<u16>()
            .map_err(|_| Error::InvalidDisplay)
    }

    pub fn parse(&mut self) -> Result<DisplayInfo, Error> {
        while self.state != State::Finished {
            match self.state {
                State::Host => {
                    self.display.host = self.iter.take_while(|c| *c != ':' && *c != '/');

                    match self.iter.next()? {
                        ':' => self.state = State::Display,
                        '/' => self.state = State::Protocol,
                        _ => return Err(Error::InvalidDisplay),
                    }
                },
                State::Protocol => {
                    self.display.protocol = Protocol::from(self.iter.take_while(|c| *c != ':'))?;
                    self.explicit_protocol = true;

                    self.iter.next()?;

                    self.state = State::Display;
                },
                State::Display => {
                    self.display.display = self.number()?;

                    match self.iter.next_option() {
                        Some('.') => self.state = State::Screen,
                        None => self.state = State::Finished,
                        Some(_) => return Err(Error::InvalidDisplay),
                    }
                },
                State::Screen => {
                    self.display.screen = self.number()?;

                    match self.iter.next_option() {
                        None => self.state = State::Finished,
                        Some(_) => return Err(Error::InvalidDisplay),
                    }
                },
                State::Finished => {},
            }
        }

        if !self.explicit_protocol && !self.display.host.is_empty() && self.display.host != "unix" {
            self.display.protocol = Protocol::TcpSocket;
        }

        Ok(self.display.clone())
    }
}

pub fn parse(display: &str) -> Result<DisplayInfo, Error> {
    Parser::new(display).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple() {
        let display = parse(":69").unwrap();

        assert_eq!(display, DisplayInfo { host: String::new(), protocol: Protocol::UnixSocket, display: 69, screen: 0 });
        assert!(display.is_local());
    }

    #[test]
    fn test_screen() {
        let display = parse(":1.2").unwrap();

        assert_eq!(display.display, 1);
        assert_eq!(display.screen, 2);
    }

    #[test]
    fn test_unix_host() {
        let display = parse("unix:0").unwrap();

        assert!(display.is_local());
        assert_eq!(display.display, 0);
    }

    #[test]
    fn test_tcp() {
        let display = parse("13.37.13.37/tcp:69.420").unwrap();

        assert_eq!(display, DisplayInfo { host: String::from("13.37.13.37"), protocol: Protocol::TcpSocket, display: 69, screen: 420 });
        assert!(!display.is_local());
    }

    #[test]
    fn test_remote_host_defaults_to_tcp() {
        let display = parse("localhost:10.0").unwrap();

        assert_eq!(display.protocol, Protocol::TcpSocket);
        assert_eq!(display.host, "localhost");
        assert_eq!(display.display, 10);
    }

    #[test]
    fn test_explicit_unix_protocol_with_host() {
        let display = parse("myhost/unix:3").unwrap();

        assert_eq!(display.protocol, Protocol::UnixSocket);
        assert_eq!(display.host, "myhost");
        assert!(display.is_local());
    }

    #[test]
    fn test_invalid() {
        assert!(parse("").is_err());
        assert!(parse("localhost").is_err());
        assert!(parse(":abc").is_err());
        assert!(parse(":0.1x").is_err());
        assert!(parse("host/carrier-pigeon:0").is_err());
    }
}
