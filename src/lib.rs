#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "log", feature = "defmt"))]
compile_error!("You may not enable both `log` and `defmt` features.");

mod fmt;

pub mod asynch;
pub mod blocking;

pub mod command;
pub mod config;
pub mod error;

#[cfg(test)]
mod test_helpers;

pub use atat;
pub use embedded_io;
pub use embedded_io_async;

pub use config::{BlockingTransport, Config, Transport};
pub use error::Error;
