//! Trait abstraction for the outgoing datagram path to enable testing

use async_trait::async_trait;
use std::io;

/// Trait for the fire-and-forget datagram send operation
#[async_trait]
pub trait DatagramSink: Send {
    /// Send one datagram to the configured receiver
    async fn send_datagram(&mut self, payload: &[u8]) -> io::Result<()>;
}
