use std::io::Write;

use crate::display::Atom;

use super::atoms;
use super::error::Error;
use super::server::SelectionServer;

/// how a retrieved buffer is rendered, decided by its declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Raw,
    IntegerList,
    AtomList,
    RichText,
}

impl ContentType {
    pub fn classify<S: SelectionServer + ?Sized>(server: &mut S, type_: Atom) -> Result<ContentType, Error> {
        match type_ {
            Atom::INTEGER => Ok(ContentType::IntegerList),
            Atom::ATOM => Ok(ContentType::AtomList),
            _ if type_.is_null() => Ok(ContentType::Raw),
            _ => {
                let html = server.intern_atom(atoms::HTML, true)?;

                if !html.is_null() && html == type_ {
                    Ok(ContentType::RichText)
                } else {
                    Ok(ContentType::Raw)
                }
            },
        }
    }
}

fn words(bytes: &[u8]) -> impl Iterator<Item = [u8; 4]> + '_ {
    bytes.chunks_exact(4).map(|chunk| {
        let mut word = [0u8; 4];

        word.copy_from_slice(chunk);

        word
    })
}

/// write `bytes` to `sink` as `content`, no trimming and no trailing newline beyond the
/// one per item of a list
pub fn format<W, S>(sink: &mut W, server: &mut S, content: ContentType, bytes: &[u8]) -> Result<(), Error>
where
    W: Write + ?Sized,
    S: SelectionServer + ?Sized,
{
    match content {
        ContentType::IntegerList => {
            for word in words(bytes) {
                writeln!(sink, "{}", i32::from_ne_bytes(word))?;
            }
        },
        ContentType::AtomList => {
            for word in words(bytes) {
                let name = server.atom_name(Atom::new(u32::from_ne_bytes(word)))?;

                writeln!(sink, "{}", name)?;
            }
        },
        ContentType::RichText => rich_text(sink, bytes)?,
        ContentType::Raw => sink.write_all(bytes)?,
    }

    Ok(())
}

#[cfg(feature = "transcode")]
fn rich_text<W: Write + ?Sized>(sink: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    match transcode(bytes) {
        Some(text) => sink.write_all(text.as_bytes()),
        None => sink.write_all(bytes),
    }
}

#[cfg(not(feature = "transcode"))]
fn rich_text<W: Write + ?Sized>(sink: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    sink.write_all(bytes)
}

/// utf-16 with a byte order mark to utf-8, `None` when there is no mark.
/// conversion stops at the first invalid sequence, an odd trailing byte is dropped
#[cfg(feature = "transcode")]
pub fn transcode(bytes: &[u8]) -> Option<String> {
    let decode: fn([u8; 2]) -> u16 = match bytes.get(..2)? {
        [0xff, 0xfe] => u16::from_le_bytes,
        [0xfe, 0xff] => u16::from_be_bytes,
        _ => return None,
    };

    let units = bytes[2..].chunks_exact(2).map(|pair| decode([pair[0], pair[1]]));

    Some(char::decode_utf16(units).map_while(Result::ok).collect())
}

#[cfg(all(test, feature = "transcode"))]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_little_endian() {
        assert_eq!(transcode(&[0xff, 0xfe, b'h', 0, b'i', 0]).as_deref(), Some("hi"));
    }

    #[test]
    fn test_transcode_big_endian() {
        assert_eq!(transcode(&[0xfe, 0xff, 0, b'o', 0, b'k']).as_deref(), Some("ok"));
    }

    #[test]
    fn test_transcode_without_mark() {
        assert_eq!(transcode(b"<b>hi</b>"), None);
        assert_eq!(transcode(&[0xff]), None);
    }

    #[test]
    fn test_transcode_surrogate_pair() {
        assert_eq!(transcode(&[0xff, 0xfe, 0x3d, 0xd8, 0x00, 0xde]).as_deref(), Some("\u{1f600}"));
    }

    #[test]
    fn test_transcode_stops_at_invalid_sequence() {
        // lone low surrogate
        assert_eq!(transcode(&[0xff, 0xfe, b'a', 0, 0x00, 0xdc, b'b', 0]).as_deref(), Some("a"));
    }

    #[test]
    fn test_transcode_ignores_odd_byte() {
        assert_eq!(transcode(&[0xff, 0xfe, b'a', 0, b'b']).as_deref(), Some("a"));
    }
}
