mod client;

pub use client::GsmClient;
