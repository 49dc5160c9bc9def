use crate::display;

#[derive(Debug)]
pub enum Error {
    /// the owner declined every target we asked for
    TargetUnavailable(String),
    AllocationFailure {
        requested: usize,
    },
    Display(display::error::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TargetUnavailable(target) => write!(f, "target {} not available", target),
            Error::AllocationFailure { .. } => write!(f, "Could not allocate memory."),
            Error::Display(e) => write!(f, "{}", e),
            Error::Io(e) => write!(f, "{}", e),
        }
    }
}

impl From<display::error::Error> for Error {
    fn from(e: display::error::Error) -> Self {
        Error::Display(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl std::error::Error for Error {}
