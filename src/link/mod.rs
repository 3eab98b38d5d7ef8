//! # Network Link Module
//!
//! UDP transport to the receiver, plus the shared connection flag.
//!
//! This module handles:
//! - Opening the UDP socket and sending channel packets as single datagrams
//! - The connection flag shared between the network-event side and the
//!   transmit loop
//! - Processing association/disassociation events, including the passive
//!   status banner

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use crate::display::{colors, DisplaySurface};
use crate::error::{PropoError, Result};

pub mod sink;

pub use sink::DatagramSink;

/// Shared connection flag.
///
/// Single writer (the network-event handler), single reader (the transmit
/// loop). A plain atomic bool is the whole concurrency contract: the store
/// uses `Release` and the load `Acquire`, so a reader observing `true` also
/// observes everything the writer did before flipping the flag; there are
/// no torn reads and no lock.
#[derive(Debug, Clone, Default)]
pub struct LinkState {
    connected: Arc<AtomicBool>,
}

impl LinkState {
    /// Create a flag in the disconnected state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the flag; called by the transmit loop before every send.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Write the flag; called from the network-event handler.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }
}

/// Network lifecycle events delivered by the platform's network stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// Association succeeded; packets may flow
    Associated,
    /// Association lost; packets are suppressed until reassociation
    Disassociated,
}

/// Status banner geometry (top strip of the display)
const BANNER_X: i32 = 20;
const BANNER_W: u32 = 300;
const BANNER_H: u32 = 16;

/// Handle one network lifecycle event.
///
/// Flips the connection flag and repaints the status banner. Events are
/// handled exactly once, in arrival order, by whatever serializes the
/// network callbacks on the platform; no debouncing is applied, so a
/// flickering link simply repaints on every event.
pub fn handle_link_event(event: LinkEvent, state: &LinkState, surface: &mut dyn DisplaySurface) {
    surface.fill_rect(BANNER_X, 0, BANNER_W, BANNER_H, colors::BLACK);
    match event {
        LinkEvent::Associated => {
            info!("link up");
            surface.draw_text(BANNER_X, 0, colors::GREEN, colors::BLACK, "link up");
            state.set_connected(true);
        }
        LinkEvent::Disassociated => {
            warn!("link lost");
            surface.draw_text(BANNER_X, 0, colors::RED, colors::BLACK, "link lost");
            state.set_connected(false);
        }
    }
}

/// UDP transport to the receiver.
///
/// Fire-and-forget: one channel packet per datagram, no acknowledgment, no
/// retransmission. A failed send is a single lost packet on a lossy link.
pub struct UdpLink {
    socket: UdpSocket,
    dest: SocketAddr,
}

impl std::fmt::Debug for UdpLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpLink")
            .field("dest", &self.dest)
            .finish_non_exhaustive()
    }
}

impl UdpLink {
    /// Bind a local socket and remember the destination.
    ///
    /// # Arguments
    ///
    /// * `bind` - Local address, usually `0.0.0.0:0`
    /// * `dest` - Receiver address and port
    ///
    /// # Errors
    ///
    /// Returns [`PropoError::Link`] if the bind fails.
    pub async fn open(bind: SocketAddr, dest: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(bind)
            .await
            .map_err(|e| PropoError::Link(format!("failed to bind {}: {}", bind, e)))?;

        info!("UDP link bound at {}, receiver {}", socket.local_addr()?, dest);
        Ok(Self { socket, dest })
    }

    /// Destination address packets are sent to.
    #[must_use]
    pub fn dest(&self) -> SocketAddr {
        self.dest
    }
}

#[async_trait]
impl DatagramSink for UdpLink {
    async fn send_datagram(&mut self, payload: &[u8]) -> io::Result<()> {
        let sent = self.socket.send_to(payload, self.dest).await?;
        debug!("sent {} byte datagram to {}", sent, self.dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NullSurface;

    #[test]
    fn test_link_state_starts_disconnected() {
        let state = LinkState::new();
        assert!(!state.is_connected());
    }

    #[test]
    fn test_link_state_toggles() {
        let state = LinkState::new();
        state.set_connected(true);
        assert!(state.is_connected());
        state.set_connected(false);
        assert!(!state.is_connected());
    }

    #[test]
    fn test_link_state_clones_share_flag() {
        let state = LinkState::new();
        let reader = state.clone();
        state.set_connected(true);
        assert!(reader.is_connected());
    }

    #[test]
    fn test_events_flip_flag_in_arrival_order() {
        let state = LinkState::new();
        let mut surface = NullSurface;

        handle_link_event(LinkEvent::Associated, &state, &mut surface);
        assert!(state.is_connected());

        handle_link_event(LinkEvent::Disassociated, &state, &mut surface);
        assert!(!state.is_connected());

        // No debouncing: a flickering link just toggles again
        handle_link_event(LinkEvent::Associated, &state, &mut surface);
        assert!(state.is_connected());
    }

    #[tokio::test]
    async fn test_udp_link_sends_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let dest = receiver.local_addr().unwrap();

        let mut link = UdpLink::open("127.0.0.1:0".parse().unwrap(), dest)
            .await
            .unwrap();
        assert_eq!(link.dest(), dest);

        link.send_datagram(&[1, 2, 3, 4]).await.unwrap();

        let mut buf = [0u8; 16];
        let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &[1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_udp_link_open_bad_bind_addr() {
        // Binding a non-local address fails with a Link error
        let result = UdpLink::open(
            "203.0.113.1:9".parse().unwrap(),
            "127.0.0.1:5005".parse().unwrap(),
        )
        .await;
        assert!(matches!(result, Err(PropoError::Link(_))));
    }
}
