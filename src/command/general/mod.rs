//! General commands: attention and echo

use atat::AtatCmd;

use super::{no_response, types::OnOff, NoResponse};

/// `AT`, attention
///
/// Answers `OK` once the modem accepts commands.
#[derive(Debug, Clone)]
pub struct At;

impl AtatCmd for At {
    type Response = NoResponse;

    const MAX_LEN: usize = 3;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        use embedded_io::Write;
        let buf_len = buf.len();
        buf.write_all(b"AT\r").ok();
        buf_len - buf.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// `ATE<n>`, command echo
#[derive(Debug, Clone)]
pub struct SetEcho {
    pub state: OnOff,
}

impl AtatCmd for SetEcho {
    type Response = NoResponse;

    const MAX_LEN: usize = 5;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        use embedded_io::Write;
        let buf_len = buf.len();
        write!(buf, "ATE{}\r", self.state as u8).ok();
        buf_len - buf.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}
