use embassy_time::{Duration, Instant};

/// Busy-waiting deadline for the blocking client.
pub struct Timer {
    expires_at: Instant,
}

pub enum Error<E> {
    Timeout,
    Other(E),
}

impl Timer {
    pub fn after(duration: Duration) -> Self {
        Self {
            expires_at: Instant::now() + duration,
        }
    }

    /// Calls `e` until it yields a result or `timeout` passes. `e` is always
    /// polled at least once.
    pub fn with_timeout<F, R, E>(timeout: Duration, mut e: F) -> Result<R, Error<E>>
    where
        F: FnMut() -> Option<Result<R, E>>,
    {
        let timer = Timer::after(timeout);

        loop {
            if let Some(res) = e() {
                return res.map_err(Error::Other);
            }
            if timer.is_expired() {
                return Err(Error::Timeout);
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Instant::now()
    }

    pub fn wait(self) {
        while !self.is_expired() {}
    }
}

impl From<Error<crate::Error>> for crate::Error {
    fn from(e: Error<crate::Error>) -> Self {
        match e {
            Error::Timeout => crate::Error::Timeout,
            Error::Other(e) => e,
        }
    }
}
