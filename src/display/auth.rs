use super::error::Error;
use super::parse::DisplayInfo;

use std::path::PathBuf;
use std::env;
use std::fs;


const MIT_MAGIC_COOKIE: &[u8] = b"MIT-MAGIC-COOKIE-1";

const FAMILY_LOCAL: u16 = 256;
const FAMILY_WILD: u16 = 65535;

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub family: u16,
    pub address: Vec<u8>,
    pub number: Vec<u8>,
    pub name: Vec<u8>,
    pub data: Vec<u8>,
}

impl Entry {
    fn matches(&self, display: &DisplayInfo) -> bool {
        let family = !display.is_local() || self.family == FAMILY_LOCAL || self.family == FAMILY_WILD;
        let number = self.number.is_empty() || self.number == display.display.to_string().as_bytes();

        family && number && self.name == MIT_MAGIC_COOKIE
    }
}

/// reader for the Xauthority file format, every field is big endian
pub struct XAuth {
    bytes: Vec<u8>,
    offset: usize,
}

impl XAuth {
    pub fn new(bytes: Vec<u8>) -> XAuth {
        XAuth {
            bytes,
            offset: 0,
        }
    }

    pub fn open() -> Result<XAuth, Error> {
        let path = env::var_os("XAUTHORITY")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".Xauthority")))
            .ok_or_else(|| Error::Authenthicate { reason: String::from("no authority file") })?;

        Ok(XAuth::new(fs::read(path)?))
    }

    fn recv(&mut self, size: usize) -> Result<&[u8], Error> {
        let bytes = self.bytes.get(self.offset..self.offset + size).ok_or(Error::Authenthicate {
            reason: String::from("truncated authority file"),
        })?;

        self.offset += size;

        Ok(bytes)
    }

    fn recv_u16(&mut self) -> Result<u16, Error> {
        self.recv(2).map(|bytes| (bytes[0] as u16) << 8 | bytes[1] as u16)
    }

    fn value(&mut self) -> Result<Vec<u8>, Error> {
        let size = self.recv_u16()?;

        self.recv(size as usize).map(|bytes| bytes.to_vec())
    }

    pub fn entry(&mut self) -> Result<Option<Entry>, Error> {
        if self.offset >= self.bytes.len() {
            return Ok(None);
        }

        Ok(Some(Entry {
            family: self.recv_u16()?,
            address: self.value()?,
            number: self.value()?,
            name: self.value()?,
            data: self.value()?,
        }))
    }

    pub fn find(&mut self, display: &DisplayInfo) -> Result<Option<Entry>, Error> {
        while let Some(entry) = self.entry()? {
            if entry.matches(display) {
                return Ok(Some(entry));
            }
        }

        Ok(None)
    }
}

/// the cookie used to authenthicate against the display, a missing authority file means no authenthication
pub fn entry(display: &DisplayInfo) -> Option<Entry> {
    match XAuth::open().and_then(|mut auth| auth.find(display)) {
        Ok(entry) => entry,
        Err(err) => {
            log::debug!("no authority entry for display {}: {}", display.display, err);

            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::parse;

    fn field(bytes: &mut Vec<u8>, value: &[u8]) {
        bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        bytes.extend_from_slice(value);
    }

    fn record(family: u16, number: &[u8], name: &[u8], data: &[u8]) -> Vec<u8> {
        let mut bytes = family.to_be_bytes().to_vec();

        field(&mut bytes, b"myhost");
        field(&mut bytes, number);
        field(&mut bytes, name);
        field(&mut bytes, data);

        bytes
    }

    #[test]
    fn test_find_matching_display() {
        let mut bytes = record(FAMILY_LOCAL, b"1", MIT_MAGIC_COOKIE, &[1; 16]);
        bytes.extend(record(FAMILY_LOCAL, b"0", MIT_MAGIC_COOKIE, &[2; 16]));

        let display = parse::parse(":0").unwrap();
        let entry = XAuth::new(bytes).find(&display).unwrap().unwrap();

        assert_eq!(entry.data, vec![2; 16]);
        assert_eq!(entry.address, b"myhost".to_vec());
    }

    #[test]
    fn test_skip_unknown_scheme() {
        let bytes = record(FAMILY_WILD, b"0", b"XDM-AUTHORIZATION-1", &[3; 8]);

        let display = parse::parse(":0").unwrap();

        assert_eq!(XAuth::new(bytes).find(&display).unwrap(), None);
    }

    #[test]
    fn test_truncated() {
        let mut bytes = record(FAMILY_LOCAL, b"0", MIT_MAGIC_COOKIE, &[2; 16]);
        bytes.truncate(bytes.len() - 4);

        let display = parse::parse(":0").unwrap();

        assert!(XAuth::new(bytes).find(&display).is_err());
    }
}
