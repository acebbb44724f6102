use embedded_io::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The expected response did not arrive in time.
    Timeout,
    /// The modem answered with an error result code, or with something other
    /// than what the command waits for.
    Rejected,
    /// The serial transport failed. End of stream is reported as `BrokenPipe`.
    Io(ErrorKind),
    /// The power pin could not be switched.
    Pin,
    /// A number, message or response does not fit its buffer.
    Overflow,
    /// Phone numbers may only contain digits, `+`, `*` and `#`.
    InvalidNumber,
    /// SMS bodies may not contain SUB (0x1A) or ESC (0x1B).
    InvalidMessage,
}

impl Error {
    pub(crate) fn io<E: embedded_io::Error>(e: E) -> Self {
        Error::Io(e.kind())
    }
}

impl From<atat::Error> for Error {
    fn from(e: atat::Error) -> Self {
        match e {
            atat::Error::Timeout => Error::Timeout,
            _ => Error::Rejected,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Timeout => f.write_str("response timed out"),
            Error::Rejected => f.write_str("command rejected by modem"),
            Error::Io(kind) => write!(f, "serial error: {:?}", kind),
            Error::Pin => f.write_str("power pin error"),
            Error::Overflow => f.write_str("buffer overflow"),
            Error::InvalidNumber => f.write_str("invalid phone number"),
            Error::InvalidMessage => f.write_str("invalid message body"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_atat() {
        assert_eq!(Error::from(atat::Error::Timeout), Error::Timeout);
        assert_eq!(Error::from(atat::Error::Error), Error::Rejected);
        assert_eq!(Error::from(atat::Error::Parse), Error::Rejected);
    }
}
