use std::time::Duration;

#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    // Errors from external libraries
    Io(std::io::Error),

    // Errors from the bot core
    Transport(String),
    Timeout(Duration),
    MissingField(&'static str),
    Simple(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(ref err) => err.fmt(f),

            Error::Transport(ref err) => write!(f, "transport error: {err}"),
            Error::Timeout(limit) => write!(f, "send timed out after {limit:?}"),
            Error::MissingField(field) => write!(f, "required field missing at format time: {field}"),
            Error::Simple(ref err) => write!(f, "error occurred: {err}"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
