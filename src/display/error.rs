use crate::proto::ErrorCode;


pub enum Error {
    InvalidStatus,
    SetupFailed {
        reason: String,
    },
    Authenthicate {
        reason: String,
    },
    RanOutOfXid,
    NoScreens,
    FailedToLock,
    InvalidDisplay,
    InvalidProtocol {
        protocol: String,
    },
    InvalidReply,
    Request {
        code: ErrorCode,
        sequence: u16,
        major_opcode: u8,
        bad_value: u32,
    },
    Io(std::io::Error),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidStatus => {
                f.write_str("server responded with invalid status code")
            },
            Error::SetupFailed { reason } => {
                f.write_fmt(format_args!("connection initiation setup failed: {}", reason))
            },
            Error::Authenthicate { reason } => {
                f.write_fmt(format_args!("authenthication required: {}", reason))
            },
            Error::RanOutOfXid => {
                f.write_str("server ran out of xid's")
            },
            Error::NoScreens => {
                f.write_str("server never informed of any screens")
            },
            Error::FailedToLock => {
                f.write_str("connection is already in use")
            },
            Error::InvalidDisplay => {
                f.write_str("invalid display name")
            },
            Error::InvalidProtocol { protocol } => {
                f.write_fmt(format_args!("invalid protocol: {}", protocol))
            },
            Error::InvalidReply => {
                f.write_str("server sendt a malformed reply")
            },
            Error::Request { code, sequence, major_opcode, bad_value } => {
                f.write_fmt(format_args!(
                    "request failed: {} (major opcode {}, sequence {}, value {:#x})",
                    code,
                    major_opcode,
                    sequence,
                    bad_value,
                ))
            },
            Error::Io(err) => {
                f.write_fmt(format_args!("io: {}", err))
            },
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
