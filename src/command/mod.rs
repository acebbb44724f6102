//! AT commands for SIM800 class GSM modules
//!
//! Only the handful of commands needed for SMS and voice calls are modelled,
//! one [`atat::AtatCmd`] per command. Responses are framed by atat's digester,
//! see [`response`].

pub mod call;
pub mod general;
pub mod response;
pub mod sms;
pub mod types;

use atat::atat_derive::AtatUrc;

use crate::error::Error;

/// Terminates the body of an SMS in text mode (Ctrl-Z).
pub const SUB: u8 = 0x1A;

const ESC: u8 = 0x1B;

/// Longest accepted dial string.
pub const MAX_NUMBER_LEN: usize = 32;

/// A single text mode SMS carries at most 160 characters.
pub const MAX_SMS_LEN: usize = 160;

/// Write buffer for a single command, sized for the SMS body.
pub(crate) const MAX_CMD_LEN: usize = MAX_SMS_LEN + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoResponse;

impl atat::AtatResp for NoResponse {}

/// Unsolicited lines a SIM800 prints around our exchanges. They are skipped
/// while waiting for a response.
#[derive(Debug, Clone, AtatUrc)]
pub enum Urc {
    #[at_urc("RDY")]
    Ready,
    #[at_urc("Call Ready")]
    CallReady,
    #[at_urc("SMS Ready")]
    SmsReady,
    #[at_urc("RING")]
    Ring,
}

/// Any final result code other than `OK` fails the command.
pub(crate) fn no_response(
    resp: Result<&[u8], atat::InternalError>,
) -> Result<NoResponse, atat::Error> {
    match resp {
        Ok(_) => Ok(NoResponse),
        Err(_) => Err(atat::Error::Error),
    }
}

/// Dial strings are restricted to digits, `+`, `*` and `#`, so a number can
/// never break out of the quoted `AT+CMGS` argument or the `ATD` line.
pub fn validate_number(number: &str) -> Result<(), Error> {
    if number.len() > MAX_NUMBER_LEN {
        return Err(Error::Overflow);
    }

    let valid = !number.is_empty()
        && number
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'*' | b'#'));

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidNumber)
    }
}

/// SUB would end the message early and ESC aborts it.
pub fn validate_message(text: &str) -> Result<(), Error> {
    if text.bytes().any(|b| b == SUB || b == ESC) {
        Err(Error::InvalidMessage)
    } else if text.len() > MAX_SMS_LEN {
        Err(Error::Overflow)
    } else {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn render<Cmd: atat::AtatCmd>(cmd: &Cmd) -> std::string::String {
    let mut buf = [0u8; MAX_CMD_LEN];
    let len = cmd.write(&mut buf);
    std::string::String::from_utf8(buf[..len].to_vec()).unwrap()
}
