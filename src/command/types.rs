use core::fmt::Write;
use heapless::String;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OnOff {
    Off = 0,
    On = 1,
}

impl From<bool> for OnOff {
    fn from(b: bool) -> Self {
        if b {
            OnOff::On
        } else {
            OnOff::Off
        }
    }
}

/// Message format selected with `+CMGF`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SmsMode {
    Pdu = 0,
    Text = 1,
}

/// `<stat>` field of a `+CLCC` call entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CallState {
    Active = 0,
    Held = 1,
    /// Mobile originated call, dialing
    Dialing = 2,
    /// Mobile originated call, remote party is ringing
    Alerting = 3,
    Incoming = 4,
    Waiting = 5,
}

pub const STATUS_LINE_LEN: usize = 24;

impl CallState {
    /// The `+CLCC` line the modem reports for our own single voice call in
    /// this state: call index 1, mobile originated, voice, not multiparty.
    pub fn status_line(self) -> Result<String<STATUS_LINE_LEN>, Error> {
        let mut line = String::new();
        write!(line, "+CLCC: 1,0,{},0,0", self as u8).map_err(|_| Error::Overflow)?;
        Ok(line)
    }
}
