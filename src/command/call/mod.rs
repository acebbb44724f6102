//! Voice call commands

pub mod responses;

use atat::{nom::FindSubstring, AtatCmd};

use super::{no_response, types::CallState, validate_number, NoResponse, MAX_NUMBER_LEN};
use crate::error::Error;
use responses::CallStatus;

/// `ATD<n>;`, voice call to `number`
#[derive(Debug, Clone)]
pub struct Dial<'a> {
    number: &'a str,
}

impl<'a> Dial<'a> {
    pub fn new(number: &'a str) -> Result<Self, Error> {
        validate_number(number)?;
        Ok(Self { number })
    }
}

impl AtatCmd for Dial<'_> {
    type Response = NoResponse;

    const MAX_LEN: usize = 5 + MAX_NUMBER_LEN;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        use embedded_io::Write;
        let buf_len = buf.len();
        write!(buf, "ATD{};\r", self.number).ok();
        buf_len - buf.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// `ATH`, hang up
#[derive(Debug, Clone)]
pub struct HangUp;

impl AtatCmd for HangUp {
    type Response = NoResponse;

    const MAX_LEN: usize = 4;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        use embedded_io::Write;
        let buf_len = buf.len();
        buf.write_all(b"ATH\r").ok();
        buf_len - buf.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// `AT+CLCC`, list current calls
///
/// The listing is not parsed. It is only searched for the status line of our
/// own call in `state`, see [`CallState::status_line`].
#[derive(Debug, Clone)]
pub struct ListCurrentCalls {
    pub state: CallState,
}

impl AtatCmd for ListCurrentCalls {
    type Response = CallStatus;

    const MAX_LEN: usize = 8;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        use embedded_io::Write;
        let buf_len = buf.len();
        buf.write_all(b"AT+CLCC\r").ok();
        buf_len - buf.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let resp = resp.map_err(|_| atat::Error::Error)?;
        let line = self.state.status_line().map_err(|_| atat::Error::Parse)?;

        Ok(CallStatus {
            in_state: resp.find_substring(line.as_bytes()).is_some(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::render;

    #[test]
    fn dial_and_hang_up() {
        assert_eq!(render(&Dial::new("112").unwrap()), "ATD112;\r");
        assert_eq!(render(&HangUp), "ATH\r");
        assert_eq!(Dial::new("").unwrap_err(), Error::InvalidNumber);
    }

    #[test]
    fn list_current_calls() {
        let cmd = ListCurrentCalls {
            state: CallState::Alerting,
        };
        assert_eq!(render(&cmd), "AT+CLCC\r");

        let listing = b"+CLCC: 1,0,3,0,0,\"112\",129,\"\"";
        assert_eq!(cmd.parse(Ok(&listing[..])).unwrap(), CallStatus { in_state: true });

        let dialing = b"+CLCC: 1,0,2,0,0,\"112\",129,\"\"";
        assert_eq!(cmd.parse(Ok(&dialing[..])).unwrap(), CallStatus { in_state: false });

        assert_eq!(cmd.parse(Ok(&b""[..])).unwrap(), CallStatus { in_state: false });
        assert!(cmd.parse(Err(atat::InternalError::Error)).is_err());
    }
}
