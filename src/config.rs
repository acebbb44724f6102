use embassy_time::Duration;

/// Async serial link to the modem.
pub trait Transport:
    embedded_io_async::Read + embedded_io_async::Write + embedded_io::ReadReady
{
    fn set_baudrate(&mut self, baudrate: u32);
}

/// Blocking serial link to the modem.
///
/// `read_ready` is used to poll for data, so `read` is only ever called when
/// it will not block.
pub trait BlockingTransport: embedded_io::Read + embedded_io::Write + embedded_io::ReadReady {
    fn set_baudrate(&mut self, baudrate: u32);
}

/// Power and response timings of the modem.
///
/// The defaults fit the SIM800 family. Every field can be overridden:
///
/// ```ignore
/// let config = Config::new()
///     .sms_prompt_timeout(Duration::from_secs(4))
///     .dialing_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) power_pulse: Duration,
    pub(crate) power_settle: Duration,
    pub(crate) boot_delay: Duration,
    pub(crate) command_timeout: Duration,
    pub(crate) sms_prompt_timeout: Duration,
    pub(crate) sms_send_timeout: Duration,
    pub(crate) call_status_timeout: Duration,
    pub(crate) dialing_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            power_pulse: Duration::from_secs(12),
            power_settle: Duration::from_secs(1),
            boot_delay: Duration::from_secs(1),
            command_timeout: Duration::from_secs(2),
            sms_prompt_timeout: Duration::from_secs(2),
            sms_send_timeout: Duration::from_secs(8),
            call_status_timeout: Duration::from_millis(500),
            dialing_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long the power line is held asserted during a power cycle.
    pub fn power_pulse(mut self, duration: Duration) -> Self {
        self.power_pulse = duration;
        self
    }

    /// Pause after the power line is released.
    pub fn power_settle(mut self, duration: Duration) -> Self {
        self.power_settle = duration;
        self
    }

    /// Pause between a power cycle and the first `AT` probe.
    pub fn boot_delay(mut self, duration: Duration) -> Self {
        self.boot_delay = duration;
        self
    }

    /// Timeout for the `OK` of plain commands.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Timeout for the `> ` prompt after `AT+CMGS`.
    pub fn sms_prompt_timeout(mut self, timeout: Duration) -> Self {
        self.sms_prompt_timeout = timeout;
        self
    }

    /// Timeout for the `OK` after the SMS body has been submitted.
    pub fn sms_send_timeout(mut self, timeout: Duration) -> Self {
        self.sms_send_timeout = timeout;
        self
    }

    /// Timeout for each `AT+CLCC` status line.
    pub fn call_status_timeout(mut self, timeout: Duration) -> Self {
        self.call_status_timeout = timeout;
        self
    }

    /// Upper bound on how long a call may stay in the dialing state.
    pub fn dialing_timeout(mut self, timeout: Duration) -> Self {
        self.dialing_timeout = timeout;
        self
    }
}
