//! SMS commands for text mode messages

use atat::AtatCmd;

use super::{
    no_response, types::SmsMode, validate_message, validate_number, NoResponse, MAX_NUMBER_LEN,
    MAX_SMS_LEN, SUB,
};
use crate::error::Error;

/// `AT+CMGF=<mode>`, SMS message format
#[derive(Debug, Clone)]
pub struct SetSmsMode {
    pub mode: SmsMode,
}

impl AtatCmd for SetSmsMode {
    type Response = NoResponse;

    const MAX_LEN: usize = 10;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        use embedded_io::Write;
        let buf_len = buf.len();
        write!(buf, "AT+CMGF={}\r", self.mode as u8).ok();
        buf_len - buf.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// `AT+CMGS="<da>"`, start a text mode SMS to `number`
///
/// The modem answers with the `> ` prompt and then expects [`SmsBody`]. Any
/// response instead of the prompt means the message was refused.
#[derive(Debug, Clone)]
pub struct SendSms<'a> {
    number: &'a str,
}

impl<'a> SendSms<'a> {
    pub fn new(number: &'a str) -> Result<Self, Error> {
        validate_number(number)?;
        Ok(Self { number })
    }
}

impl AtatCmd for SendSms<'_> {
    type Response = NoResponse;

    const MAX_LEN: usize = 11 + MAX_NUMBER_LEN;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        use embedded_io::Write;
        let buf_len = buf.len();
        write!(buf, "AT+CMGS=\"{}\"\r", self.number).ok();
        buf_len - buf.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// Message text written after the prompt, terminated with SUB.
///
/// The modem confirms with `+CMGS: <mr>` and `OK`. The message reference is
/// not kept.
#[derive(Debug, Clone)]
pub struct SmsBody<'a> {
    text: &'a str,
}

impl<'a> SmsBody<'a> {
    pub fn new(text: &'a str) -> Result<Self, Error> {
        validate_message(text)?;
        Ok(Self { text })
    }
}

impl AtatCmd for SmsBody<'_> {
    type Response = NoResponse;

    const MAX_LEN: usize = MAX_SMS_LEN + 1;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        use embedded_io::Write;
        let buf_len = buf.len();
        buf.write_all(self.text.as_bytes()).ok();
        buf.write_all(&[SUB]).ok();
        buf_len - buf.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}
