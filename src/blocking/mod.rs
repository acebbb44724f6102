mod client;
pub mod timer;

pub use client::GsmClient;
