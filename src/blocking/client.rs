use atat::{helpers::LossyStr, AtatCmd};
use embassy_time::Duration;
use embedded_hal::digital::OutputPin;
use embedded_io::{Read as _, ReadReady as _, Write as _};

use super::timer::Timer;
use crate::{
    command::{
        call::{Dial, HangUp, ListCurrentCalls},
        general::{At, SetEcho},
        response::{Exchange, Reply},
        sms::{SendSms, SetSmsMode, SmsBody},
        types::{CallState, OnOff, SmsMode},
        MAX_CMD_LEN,
    },
    config::{BlockingTransport, Config},
    error::Error,
};

/// Blocking driver for a SIM800 class modem.
///
/// Every call blocks until the expected answer arrives or its timeout from
/// [`Config`] passes.
pub struct GsmClient<T, P>
where
    T: BlockingTransport,
    P: OutputPin,
{
    initialized: bool,
    transport: T,
    power: P,
    config: Config,
}

impl<T, P> GsmClient<T, P>
where
    T: BlockingTransport,
    P: OutputPin,
{
    pub fn new(transport: T, power: P, config: Config) -> Self {
        GsmClient {
            initialized: false,
            transport,
            power,
            config,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives back the serial port and the power pin.
    pub fn release(self) -> (T, P) {
        (self.transport, self.power)
    }

    /// Brings the modem up: sets the baud rate, then power cycles and probes
    /// with `AT` until it answers `OK`, at most `max_retries` times.
    pub fn init(&mut self, baud_rate: u32, max_retries: u8) -> Result<(), Error> {
        self.initialized = false;
        self.transport.set_baudrate(baud_rate);

        for attempt in 1..=max_retries {
            debug!("Initializing modem, attempt {}/{}", attempt, max_retries);
            self.power_cycle()?;
            Timer::after(self.config.boot_delay).wait();

            match self.send(&At, self.config.command_timeout) {
                Ok(_) => {
                    info!("Modem ready after {} attempt(s)", attempt);
                    self.initialized = true;
                    return Ok(());
                }
                Err(Error::Timeout | Error::Rejected) => warn!("No answer to AT"),
                Err(e) => return Err(e),
            }
        }

        warn!("Modem did not answer after {} attempt(s)", max_retries);
        Err(Error::Timeout)
    }

    pub fn power_cycle(&mut self) -> Result<(), Error> {
        warn!("Power cycling modem");
        self.power.set_high().map_err(|_| Error::Pin)?;
        Timer::after(self.config.power_pulse).wait();
        self.power.set_low().map_err(|_| Error::Pin)?;
        Timer::after(self.config.power_settle).wait();
        Ok(())
    }

    pub fn set_echo(&mut self, state: OnOff) -> Result<(), Error> {
        self.send(&SetEcho { state }, self.config.command_timeout)?;
        Ok(())
    }

    pub fn disable_echo(&mut self) -> Result<(), Error> {
        self.set_echo(OnOff::Off)
    }

    pub fn set_sms_mode(&mut self, mode: SmsMode) -> Result<(), Error> {
        self.send(&SetSmsMode { mode }, self.config.command_timeout)?;
        Ok(())
    }

    pub fn set_sms_text_mode(&mut self) -> Result<(), Error> {
        self.set_sms_mode(SmsMode::Text)
    }

    /// Sends `text` to `number`. Requires text mode, see
    /// [`set_sms_text_mode`](Self::set_sms_text_mode).
    ///
    /// Nothing of the body is written unless the modem shows its prompt.
    pub fn send_sms(&mut self, number: &str, text: &str) -> Result<(), Error> {
        let body = SmsBody::new(text)?;
        let start = SendSms::new(number)?;

        self.write_command(&start)?;
        if let Reply::Response(_) = self.read_reply(&start, self.config.sms_prompt_timeout)? {
            warn!("No SMS prompt");
            return Err(Error::Rejected);
        }

        self.send(&body, self.config.sms_send_timeout)?;
        Ok(())
    }

    pub fn start_call(&mut self, number: &str) -> Result<(), Error> {
        info!("Calling {}", number);
        self.send(&Dial::new(number)?, self.config.command_timeout)?;
        Ok(())
    }

    pub fn hang_call(&mut self) -> Result<(), Error> {
        self.send(&HangUp, self.config.command_timeout)?;
        Ok(())
    }

    /// Asks the modem whether our call is in `state`.
    ///
    /// The listing counts only once its final `OK` arrived within the
    /// timeout. No complete listing, or one without our status line, means
    /// `false`.
    pub fn call_is(&mut self, state: CallState) -> Result<bool, Error> {
        match self.send(&ListCurrentCalls { state }, self.config.call_status_timeout) {
            Ok(status) => Ok(status.in_state),
            Err(Error::Timeout | Error::Rejected) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn call_is_dialing(&mut self) -> Result<bool, Error> {
        self.call_is(CallState::Dialing)
    }

    pub fn call_is_ringing(&mut self) -> Result<bool, Error> {
        self.call_is(CallState::Alerting)
    }

    /// Polls until the call leaves the dialing state. Fails with
    /// `Error::Timeout` if it is still dialing after the configured
    /// dialing timeout.
    pub fn wait_on_dialing(&mut self) -> Result<(), Error> {
        let timer = Timer::after(self.config.dialing_timeout);

        while self.call_is_dialing()? {
            if timer.is_expired() {
                warn!("Call still dialing, giving up");
                return Err(Error::Timeout);
            }
        }

        Ok(())
    }

    /// Polls until the remote party stops ringing or `duration` passes.
    pub fn wait_on_ringing(&mut self, duration: Duration) -> Result<(), Error> {
        let timer = Timer::after(duration);

        while !timer.is_expired() {
            if !self.call_is_ringing()? {
                break;
            }
        }

        Ok(())
    }

    /// Polls until the remote party is ringing or `timeout` passes.
    pub fn call_rings(&mut self, timeout: Duration) -> Result<bool, Error> {
        let timer = Timer::after(timeout);

        while !timer.is_expired() {
            if self.call_is_ringing()? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Calls `number`, lets it ring for at most `ringing` and hangs up.
    ///
    /// Only a failure to start the call is returned. Once dialed, the call is
    /// always hung up.
    pub fn missed_call(&mut self, number: &str, ringing: Duration) -> Result<(), Error> {
        self.start_call(number)?;

        if let Err(e) = self.ring_out(ringing) {
            warn!("Lost track of call progress: {:?}", e);
        }

        if let Err(e) = self.hang_call() {
            warn!("Failed to hang up: {:?}", e);
        }

        Ok(())
    }

    fn ring_out(&mut self, ringing: Duration) -> Result<(), Error> {
        self.wait_on_dialing()?;

        if self.call_is_ringing()? {
            self.wait_on_ringing(ringing)?;
        }

        Ok(())
    }

    /// Writes `cmd` and waits up to `timeout` for its response.
    pub fn send<Cmd: AtatCmd>(
        &mut self,
        cmd: &Cmd,
        timeout: Duration,
    ) -> Result<Cmd::Response, Error> {
        self.write_command(cmd)?;

        match self.read_reply(cmd, timeout)? {
            Reply::Response(resp) => Ok(resp),
            Reply::Prompt => Err(Error::Rejected),
        }
    }

    /// Bytes are taken one at a time, so whatever follows the reply stays in
    /// the transport.
    fn read_reply<Cmd: AtatCmd>(
        &mut self,
        cmd: &Cmd,
        timeout: Duration,
    ) -> Result<Reply<Cmd::Response>, Error> {
        let mut exchange = Exchange::new(cmd);
        let transport = &mut self.transport;

        Timer::with_timeout(timeout, || {
            match transport.read_ready() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(Error::io(e))),
            }

            let mut byte = [0u8; 1];
            match transport.read(&mut byte) {
                Ok(0) => Some(Err(Error::Io(embedded_io::ErrorKind::BrokenPipe))),
                Ok(_) => exchange.feed(byte[0]),
                Err(e) => Some(Err(Error::io(e))),
            }
        })
        .map_err(Error::from)
    }

    fn write_command<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<(), Error> {
        let mut buf = [0u8; MAX_CMD_LEN];
        if Cmd::MAX_LEN > buf.len() {
            return Err(Error::Overflow);
        }
        let len = cmd.write(&mut buf);

        self.drain()?;
        trace!("Sending command: {:?}", LossyStr(&buf[..len]));
        self.write_all(&buf[..len])
    }

    /// Throws away anything left over from earlier exchanges.
    fn drain(&mut self) -> Result<(), Error> {
        let mut buf = [0u8; 32];
        while self.transport.read_ready().map_err(Error::io)? {
            if self.transport.read(&mut buf).map_err(Error::io)? == 0 {
                break;
            }
        }
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.transport.write_all(bytes).map_err(Error::io)?;
        self.transport.flush().map_err(Error::io)
    }
}
