//! Response side of a command exchange
//!
//! Received bytes are collected in a bounded buffer and handed to atat's
//! [`DefaultDigester`], which frames them into echo, URCs, the `> ` prompt and
//! final responses. A response only completes at its final result code, so
//! nothing of it is left on the wire for the next command.

use atat::{helpers::LossyStr, AtatCmd, DefaultDigester, DigestResult, Digester};
use heapless::Vec;

use super::Urc;
use crate::error::Error;

/// Room for the longest response waited for, a `+CLCC` listing.
pub const INGRESS_BUF_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum Reply<R> {
    /// Final response to the command, parsed by the command itself
    Response(R),
    /// The modem waits for more input, e.g. an SMS body
    Prompt,
}

/// Matches the bytes received after `cmd` was written to its reply.
pub struct Exchange<'a, Cmd: AtatCmd> {
    cmd: &'a Cmd,
    digester: DefaultDigester<Urc>,
    buf: Vec<u8, INGRESS_BUF_SIZE>,
}

impl<'a, Cmd: AtatCmd> Exchange<'a, Cmd> {
    pub fn new(cmd: &'a Cmd) -> Self {
        Self {
            cmd,
            digester: DefaultDigester::<Urc>::new(),
            buf: Vec::new(),
        }
    }

    /// Takes the next received byte. Returns `None` until the reply is
    /// complete.
    ///
    /// A negative result code or a response the command cannot parse is
    /// `Error::Rejected`.
    pub fn feed(&mut self, byte: u8) -> Option<Result<Reply<Cmd::Response>, Error>> {
        if self.buf.push(byte).is_err() {
            return Some(Err(Error::Overflow));
        }

        loop {
            let (result, used) = self.digester.digest(&self.buf);
            let reply = match result {
                DigestResult::None => None,
                DigestResult::Urc(line) => {
                    debug!("Skipping URC: {:?}", LossyStr(line));
                    None
                }
                DigestResult::Prompt(_) => Some(Ok(Reply::Prompt)),
                DigestResult::Response(resp) => Some(
                    self.cmd
                        .parse(resp)
                        .map(Reply::Response)
                        .map_err(Error::from),
                ),
            };

            self.consume(used);

            if reply.is_some() || used == 0 {
                return reply;
            }
        }
    }

    fn consume(&mut self, amount: usize) {
        let amount = amount.min(self.buf.len());
        self.buf.rotate_left(amount);
        self.buf.truncate(self.buf.len() - amount);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::{
        call::{responses::CallStatus, ListCurrentCalls},
        general::At,
        sms::SendSms,
        types::CallState,
        NoResponse,
    };

    fn feed_all<Cmd: AtatCmd>(
        exchange: &mut Exchange<'_, Cmd>,
        bytes: &[u8],
    ) -> Option<Result<Reply<Cmd::Response>, Error>> {
        let (last, head) = bytes.split_last().unwrap();
        for &byte in head {
            if let Some(reply) = exchange.feed(byte) {
                panic!("settled early at {:?}", reply.map(|_| ()));
            }
        }
        exchange.feed(*last)
    }

    #[test]
    fn ok() {
        let mut exchange = Exchange::new(&At);
        assert_eq!(
            feed_all(&mut exchange, b"\r\nOK\r\n"),
            Some(Ok(Reply::Response(NoResponse)))
        );
    }

    #[test]
    fn echo_is_skipped() {
        let mut exchange = Exchange::new(&At);
        assert_eq!(
            feed_all(&mut exchange, b"AT\r\r\nOK\r\n"),
            Some(Ok(Reply::Response(NoResponse)))
        );
    }

    #[test]
    fn error_is_rejected() {
        let mut exchange = Exchange::new(&At);
        assert_eq!(
            feed_all(&mut exchange, b"\r\nERROR\r\n"),
            Some(Err(Error::Rejected))
        );
    }

    #[test]
    fn status_listing_settles_at_final_ok() {
        let cmd = ListCurrentCalls {
            state: CallState::Dialing,
        };
        let mut exchange = Exchange::new(&cmd);
        assert_eq!(
            feed_all(
                &mut exchange,
                b"\r\n+CLCC: 1,0,2,0,0,\"112\",129,\"\"\r\n\r\nOK\r\n"
            ),
            Some(Ok(Reply::Response(CallStatus { in_state: true })))
        );
    }

    #[test]
    fn prompt() {
        let cmd = SendSms::new("112").unwrap();
        let mut exchange = Exchange::new(&cmd);

        let mut reply = None;
        for &byte in b"\r\n> " {
            reply = reply.or(exchange.feed(byte));
        }
        assert_eq!(reply, Some(Ok(Reply::Prompt)));
    }

    #[test]
    fn urc_is_skipped() {
        let mut exchange = Exchange::new(&At);
        assert_eq!(
            feed_all(&mut exchange, b"\r\nSMS Ready\r\n\r\nOK\r\n"),
            Some(Ok(Reply::Response(NoResponse)))
        );
    }
}
