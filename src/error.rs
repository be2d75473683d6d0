use thiserror::Error;

/// Why an inbound request could not be turned into a [`Command`].
///
/// [`Command`]: crate::broker::Command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected an array of bulk strings")]
    NotAnArray,

    #[error("empty command")]
    Empty,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("timeout is not an integer: {0:?}")]
    InvalidTimeout(String),
}
