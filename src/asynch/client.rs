use atat::{helpers::LossyStr, AtatCmd};
use embassy_time::{with_timeout, Duration, Instant, Timer};
use embedded_hal::digital::OutputPin;
use embedded_io::ReadReady as _;
use embedded_io_async::{Read as _, Write as _};

use crate::{
    command::{
        call::{Dial, HangUp, ListCurrentCalls},
        general::{At, SetEcho},
        response::{Exchange, Reply},
        sms::{SendSms, SetSmsMode, SmsBody},
        types::{CallState, OnOff, SmsMode},
        MAX_CMD_LEN,
    },
    config::{Config, Transport},
    error::Error,
};

/// Async driver for a SIM800 class modem.
///
/// Same operations as [`crate::blocking::GsmClient`], but waiting suspends
/// the task instead of spinning.
pub struct GsmClient<T: Transport, P: OutputPin> {
    initialized: bool,
    transport: T,
    power: P,
    config: Config,
}

impl<T: Transport, P: OutputPin> GsmClient<T, P> {
    pub fn new(transport: T, power: P, config: Config) -> Self {
        Self {
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

    pub fn release(self) -> (T, P) {
        (self.transport, self.power)
    }

    pub async fn init(&mut self, baud_rate: u32, max_retries: u8) -> Result<(), Error> {
        self.initialized = false;
        self.transport.set_baudrate(baud_rate);

        for attempt in 1..=max_retries {
            debug!("Initializing modem, attempt {}/{}", attempt, max_retries);
            self.power_cycle().await?;
            Timer::after(self.config.boot_delay).await;

            match self.send(&At, self.config.command_timeout).await {
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

    pub async fn power_cycle(&mut self) -> Result<(), Error> {
        warn!("Power cycling modem");
        self.power.set_high().map_err(|_| Error::Pin)?;
        Timer::after(self.config.power_pulse).await;
        self.power.set_low().map_err(|_| Error::Pin)?;
        Timer::after(self.config.power_settle).await;
        Ok(())
    }

    pub async fn set_echo(&mut self, state: OnOff) -> Result<(), Error> {
        self.send(&SetEcho { state }, self.config.command_timeout)
            .await?;
        Ok(())
    }

    pub async fn disable_echo(&mut self) -> Result<(), Error> {
        self.set_echo(OnOff::Off).await
    }

    pub async fn set_sms_mode(&mut self, mode: SmsMode) -> Result<(), Error> {
        self.send(&SetSmsMode { mode }, self.config.command_timeout)
            .await?;
        Ok(())
    }

    pub async fn set_sms_text_mode(&mut self) -> Result<(), Error> {
        self.set_sms_mode(SmsMode::Text).await
    }

    pub async fn send_sms(&mut self, number: &str, text: &str) -> Result<(), Error> {
        let body = SmsBody::new(text)?;
        let start = SendSms::new(number)?;

        self.write_command(&start).await?;
        if let Reply::Response(_) = self
            .read_reply(&start, self.config.sms_prompt_timeout)
            .await?
        {
            warn!("No SMS prompt");
            return Err(Error::Rejected);
        }

        self.send(&body, self.config.sms_send_timeout).await?;
        Ok(())
    }

    pub async fn start_call(&mut self, number: &str) -> Result<(), Error> {
        info!("Calling {}", number);
        self.send(&Dial::new(number)?, self.config.command_timeout)
            .await?;
        Ok(())
    }

    pub async fn hang_call(&mut self) -> Result<(), Error> {
        self.send(&HangUp, self.config.command_timeout).await?;
        Ok(())
    }

    pub async fn call_is(&mut self, state: CallState) -> Result<bool, Error> {
        match self
            .send(&ListCurrentCalls { state }, self.config.call_status_timeout)
            .await
        {
            Ok(status) => Ok(status.in_state),
            Err(Error::Timeout | Error::Rejected) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn call_is_dialing(&mut self) -> Result<bool, Error> {
        self.call_is(CallState::Dialing).await
    }

    pub async fn call_is_ringing(&mut self) -> Result<bool, Error> {
        self.call_is(CallState::Alerting).await
    }

    pub async fn wait_on_dialing(&mut self) -> Result<(), Error> {
        let deadline = Instant::now() + self.config.dialing_timeout;

        while self.call_is_dialing().await? {
            if Instant::now() >= deadline {
                warn!("Call still dialing, giving up");
                return Err(Error::Timeout);
            }
        }

        Ok(())
    }

    pub async fn wait_on_ringing(&mut self, duration: Duration) -> Result<(), Error> {
        let deadline = Instant::now() + duration;

        while Instant::now() < deadline {
            if !self.call_is_ringing().await? {
                break;
            }
        }

        Ok(())
    }

    pub async fn call_rings(&mut self, timeout: Duration) -> Result<bool, Error> {
        let deadline = Instant::now() + timeout;

        while Instant::now() < deadline {
            if self.call_is_ringing().await? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Calls `number`, lets it ring for at most `ringing` and hangs up.
    pub async fn missed_call(&mut self, number: &str, ringing: Duration) -> Result<(), Error> {
        self.start_call(number).await?;

        if let Err(e) = self.ring_out(ringing).await {
            warn!("Lost track of call progress: {:?}", e);
        }

        if let Err(e) = self.hang_call().await {
            warn!("Failed to hang up: {:?}", e);
        }

        Ok(())
    }

    async fn ring_out(&mut self, ringing: Duration) -> Result<(), Error> {
        self.wait_on_dialing().await?;

        if self.call_is_ringing().await? {
            self.wait_on_ringing(ringing).await?;
        }

        Ok(())
    }

    /// Writes `cmd` and waits up to `timeout` for its response.
    pub async fn send<Cmd: AtatCmd>(
        &mut self,
        cmd: &Cmd,
        timeout: Duration,
    ) -> Result<Cmd::Response, Error> {
        self.write_command(cmd).await?;

        match self.read_reply(cmd, timeout).await? {
            Reply::Response(resp) => Ok(resp),
            Reply::Prompt => Err(Error::Rejected),
        }
    }

    async fn read_reply<Cmd: AtatCmd>(
        &mut self,
        cmd: &Cmd,
        timeout: Duration,
    ) -> Result<Reply<Cmd::Response>, Error> {
        let mut exchange = Exchange::new(cmd);
        let transport = &mut self.transport;

        let fut = async {
            let mut byte = [0u8; 1];
            loop {
                match transport.read(&mut byte).await {
                    Ok(0) => return Err(Error::Io(embedded_io::ErrorKind::BrokenPipe)),
                    Ok(_) => {
                        if let Some(reply) = exchange.feed(byte[0]) {
                            return reply;
                        }
                    }
                    Err(e) => return Err(Error::io(e)),
                }
            }
        };

        with_timeout(timeout, fut)
            .await
            .map_err(|_| Error::Timeout)?
    }

    async fn write_command<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<(), Error> {
        let mut buf = [0u8; MAX_CMD_LEN];
        if Cmd::MAX_LEN > buf.len() {
            return Err(Error::Overflow);
        }
        let len = cmd.write(&mut buf);

        self.drain().await?;
        trace!("Sending command: {:?}", LossyStr(&buf[..len]));
        self.write_all(&buf[..len]).await
    }

    /// Only reads while data is ready, so this never waits on the modem.
    async fn drain(&mut self) -> Result<(), Error> {
        let mut buf = [0u8; 32];
        while self.transport.read_ready().map_err(Error::io)? {
            if self.transport.read(&mut buf).await.map_err(Error::io)? == 0 {
                break;
            }
        }
        Ok(())
    }

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.transport.write_all(bytes).await.map_err(Error::io)?;
        self.transport.flush().await.map_err(Error::io)
    }
}
