//! This crate reads the contents of an x11 selection (PRIMARY, SECONDARY, CLIPBOARD or the legacy
//! cut buffer) over a pure Rust implementation of the parts of the x11 [protocol] it needs.
//!
//! [protocol]: https://www.x.org/docs/XProtocol/proto.pdf
//!
//! # Usage
//! ```no_run
//! use xselection::display;
//! use xselection::selection::{self, Options, Requestor, SelectionKind};
//!
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let display = display::open(None)?;
//!
//!     let mut requestor = Requestor::new(display)?;
//!
//!     let selection = SelectionKind::Clipboard.atom(&mut requestor)?;
//!     let target = selection::target(&mut requestor, None, false)?;
//!
//!     selection::run(&mut requestor, &mut std::io::stdout(), selection, target, Options::default())?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Crate features
//! - `transcode` (default) - text/html selections that start with a UTF-16 byte order mark are
//!   printed as UTF-8
//!

pub mod display;

/// proto contains protocol specific code such as opcodes, replies and so on.
pub mod proto;

/// window contains the requests made on behalf of a single window
pub mod window;

pub mod selection;
