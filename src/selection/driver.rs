use std::io::Write;

use crate::display::Atom;

use super::atoms;
use super::error::Error;
use super::format::{self, ContentType};
use super::server::SelectionServer;
use super::transfer::{State, Transfer};

/// a selection's contents as the owner delivered them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Retrieved {
    pub bytes: Vec<u8>,
    pub type_: Atom,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// leave a trailing line feed in place instead of dropping it
    pub keep_newline: bool,
}

/// fetch the contents of `selection` converted to `target`.
///
/// [`Atom::STRING`] as the selection means the legacy cut buffer, which is read directly without
/// asking any owner. otherwise a declined UTF8_STRING request is retried once as STRING, any other
/// declined target fails with [`Error::TargetUnavailable`]
pub fn retrieve<S: SelectionServer + ?Sized>(server: &mut S, selection: Atom, target: Atom) -> Result<Retrieved, Error> {
    if selection == Atom::STRING {
        log::debug!("reading cut buffer");

        return Ok(Retrieved {
            bytes: server.fetch_cut_buffer()?,
            type_: Atom::NONE,
        });
    }

    let utf8 = server.intern_atom(atoms::UTF8_STRING, false)?;

    let mut target = target;
    let mut transfer = Transfer::new();
    let mut event = None;

    loop {
        if !transfer.is_idle() {
            event = Some(server.next_event()?);
        }

        transfer.step(server, event.as_ref(), selection, target)?;

        if transfer.state() == State::NegotiationFailed {
            if target != utf8 {
                return Err(Error::TargetUnavailable(server.atom_name(target)?));
            }

            log::debug!("UTF8_STRING declined, falling back to STRING");

            transfer.reset();
            target = Atom::STRING;
            event = None;

            continue;
        }

        if transfer.is_idle() {
            break;
        }
    }

    let (bytes, type_) = transfer.take();

    Ok(Retrieved {
        bytes,
        type_,
    })
}

/// drop one trailing line feed, if there is one
pub fn trim_newline(bytes: &mut Vec<u8>) {
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
}

/// render what was retrieved to `sink` followed by a single newline, nothing at all when empty
pub fn print<W, S>(server: &mut S, sink: &mut W, retrieved: Retrieved, options: Options) -> Result<(), Error>
where
    W: Write + ?Sized,
    S: SelectionServer + ?Sized,
{
    let Retrieved { mut bytes, type_ } = retrieved;

    if !options.keep_newline {
        trim_newline(&mut bytes);
    }

    if bytes.is_empty() {
        return Ok(());
    }

    let content = ContentType::classify(server, type_)?;

    log::debug!("printing {} bytes as {:?}", bytes.len(), content);

    format::format(sink, server, content, &bytes)?;

    writeln!(sink)?;

    Ok(())
}

/// retrieve `selection` as `target` and print it to `sink`
pub fn run<W, S>(server: &mut S, sink: &mut W, selection: Atom, target: Atom, options: Options) -> Result<(), Error>
where
    W: Write + ?Sized,
    S: SelectionServer + ?Sized,
{
    let retrieved = retrieve(server, selection, target)?;

    print(server, sink, retrieved, options)?;

    sink.flush()?;

    Ok(())
}
