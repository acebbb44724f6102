//! Scripted serial port and power pin for driving the clients in tests.

use core::convert::Infallible;
use std::collections::VecDeque;
use std::vec::Vec;

use embassy_time::{Duration, Instant, Timer};

use crate::command::SUB;

/// Reply chunks, each readable `Duration` after the write that triggered it.
type Reply = Vec<(Duration, Vec<u8>)>;

/// Serial port that answers each terminated write (`\r` or SUB) with the next
/// scripted reply. Writes beyond the script get the `always` reply, if any.
#[derive(Default)]
pub struct MockSerial {
    written: Vec<u8>,
    rx: VecDeque<(Instant, u8)>,
    replies: VecDeque<Reply>,
    fallback: Option<Reply>,
    pub baudrate: Option<u32>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `bytes` as the answer to the next terminated write.
    pub fn reply(mut self, bytes: &[u8]) -> Self {
        self.replies.push_back(vec![(Duration::from_ticks(0), bytes.to_vec())]);
        self
    }

    /// Like [`reply`](Self::reply), but `late` only becomes readable `delay`
    /// after the write.
    pub fn reply_delayed(mut self, now: &[u8], delay: Duration, late: &[u8]) -> Self {
        self.replies.push_back(vec![
            (Duration::from_ticks(0), now.to_vec()),
            (delay, late.to_vec()),
        ]);
        self
    }

    /// Answer given once the script has run out.
    pub fn always(mut self, bytes: &[u8]) -> Self {
        self.fallback = Some(vec![(Duration::from_ticks(0), bytes.to_vec())]);
        self
    }

    /// Queues an empty answer, leaving the next command unanswered.
    pub fn silence(self) -> Self {
        self.reply(b"")
    }

    /// Bytes that are already waiting before anything is written.
    pub fn pending(mut self, bytes: &[u8]) -> Self {
        let now = Instant::now();
        self.rx.extend(bytes.iter().map(|&b| (now, b)));
        self
    }

    pub fn written(&self) -> &str {
        core::str::from_utf8(&self.written).unwrap()
    }

    pub fn count(&self, command: &str) -> usize {
        self.written().matches(command).count()
    }

    fn push_written(&mut self, buf: &[u8]) {
        self.written.extend_from_slice(buf);
        if matches!(buf.last(), Some(&b'\r') | Some(&SUB)) {
            if let Some(reply) = self.replies.pop_front().or_else(|| self.fallback.clone()) {
                let now = Instant::now();
                for (delay, bytes) in reply {
                    self.rx.extend(bytes.into_iter().map(|b| (now + delay, b)));
                }
            }
        }
    }

    fn ready(&self) -> bool {
        self.rx
            .front()
            .is_some_and(|(at, _)| *at <= Instant::now())
    }

    fn pop_into(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() && self.ready() {
            if let Some((_, b)) = self.rx.pop_front() {
                buf[n] = b;
                n += 1;
            }
        }
        n
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = Infallible;
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.ready())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(self.pop_into(buf))
    }
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.push_written(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl embedded_io_async::Read for MockSerial {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.rx.front() {
            // Nothing more is coming: only a timeout ends the read.
            None => core::future::pending::<()>().await,
            Some(&(at, _)) => Timer::at(at).await,
        }
        Ok(self.pop_into(buf))
    }
}

impl embedded_io_async::Write for MockSerial {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.push_written(buf);
        Ok(buf.len())
    }
}

impl crate::config::BlockingTransport for MockSerial {
    fn set_baudrate(&mut self, baudrate: u32) {
        self.baudrate = Some(baudrate);
    }
}

impl crate::config::Transport for MockSerial {
    fn set_baudrate(&mut self, baudrate: u32) {
        self.baudrate = Some(baudrate);
    }
}

/// Output pin that remembers every level it was driven to.
#[derive(Default)]
pub struct MockPin {
    pub levels: Vec<bool>,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Pin whose every switch fails.
pub struct BrokenPin;

#[derive(Debug)]
pub struct BrokenPinError;

impl embedded_hal::digital::Error for BrokenPinError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl embedded_hal::digital::ErrorType for BrokenPin {
    type Error = BrokenPinError;
}

impl embedded_hal::digital::OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(BrokenPinError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(BrokenPinError)
    }
}

/// Timings short enough for tests: no power cycle delays and 20 ms answers.
pub fn fast_config() -> crate::Config {
    use embassy_time::Duration;

    crate::Config::new()
        .power_pulse(Duration::from_ticks(0))
        .power_settle(Duration::from_ticks(0))
        .boot_delay(Duration::from_ticks(0))
        .command_timeout(Duration::from_millis(20))
        .sms_prompt_timeout(Duration::from_millis(20))
        .sms_send_timeout(Duration::from_millis(20))
        .call_status_timeout(Duration::from_millis(20))
        .dialing_timeout(Duration::from_millis(100))
}
