//! # Transmit Loop
//!
//! The per-tick orchestrator: drains one attitude sample, renders the
//! display at a decimated rate, shapes the channels, and streams the packet
//! when the link is up.
//!
//! ## State machine
//!
//! Each tick attempts one non-blocking pop from the attitude queue:
//!
//! - **Idle** (queue empty): nothing else happens this tick. Pilot input is
//!   polled only on active ticks — the throttle steps are sized for the
//!   attitude sample cadence, not the tick cadence.
//! - **Active** (sample available): one full cycle — render every
//!   `refresh_divider`-th frame, poll input, recompute throttle and all
//!   four flight channels, build the packet, and send it if connected.
//!
//! The packet is always built; while the link is down it is discarded and
//! the sequence counter does not advance, so the receiver sees a gap-free
//! sequence across everything actually put on the wire. A send error still
//! advances the sequence (the packet left our hands, the link is lossy) and
//! never stalls the next tick. No path out of [`TransmitLoop::tick`] blocks
//! or fails.

use tracing::{info, trace, warn};

use crate::attitude::AttitudeReceiver;
use crate::display::{DisplaySurface, Renderer};
use crate::link::{DatagramSink, LinkState};
use crate::packet::encoder::{Clock, RcPacket};
use crate::packet::protocol::FlightChannels;
use crate::shaper::{shape_axis, throttle_pwm, ThrottleInput, ThrottleShaper};

/// Default display decimation: render every Nth active cycle
pub const DEFAULT_REFRESH_DIVIDER: u64 = 10;

/// Number of transmitted packets between status log lines
const LOG_INTERVAL_PACKETS: u64 = 1000;

/// Opaque seam over the pilot's throttle input device (button pair or
/// analog lever). Polled once per active tick, never blocks.
pub trait PilotInput: Send {
    /// Read the current input state.
    fn read(&mut self) -> ThrottleInput;
}

/// Fixed per-channel center offsets in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelTrims {
    pub roll: i16,
    pub pitch: i16,
    pub yaw: i16,
}

/// Outcome of one tick, mainly for tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No attitude sample available
    Idle,
    /// Packet built but discarded: link down
    Suppressed,
    /// Packet handed to the sink
    Sent,
    /// Sink reported an error; packet counted as sent and lost
    SendFailed,
}

/// The transmit-side orchestrator. Owns every piece of per-session state:
/// throttle, sequence and frame counters, the clock, and the renderer.
pub struct TransmitLoop<S, I, D> {
    rx: AttitudeReceiver,
    input: I,
    sink: S,
    surface: D,
    renderer: Renderer,
    shaper: ThrottleShaper,
    trims: ChannelTrims,
    link: LinkState,
    clock: Clock,
    refresh_divider: u64,
    sequence: u16,
    frames: u64,
    packets_sent: u64,
    last_log: u64,
}

impl<S, I, D> TransmitLoop<S, I, D>
where
    S: DatagramSink,
    I: PilotInput,
    D: DisplaySurface,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rx: AttitudeReceiver,
        input: I,
        sink: S,
        surface: D,
        renderer: Renderer,
        shaper: ThrottleShaper,
        trims: ChannelTrims,
        link: LinkState,
        refresh_divider: u64,
    ) -> Self {
        Self {
            rx,
            input,
            sink,
            surface,
            renderer,
            shaper,
            trims,
            link,
            clock: Clock::new(),
            refresh_divider: refresh_divider.max(1),
            sequence: 0,
            frames: 0,
            packets_sent: 0,
            last_log: 0,
        }
    }

    /// Draw the static display chrome. Called once before the loop starts.
    pub fn draw_static(&mut self) {
        self.renderer.draw_static(&mut self.surface);
    }

    /// Run one tick of the control loop.
    pub async fn tick(&mut self) -> TickOutcome {
        let Some(att) = self.rx.try_pop() else {
            return TickOutcome::Idle;
        };

        if self.frames % self.refresh_divider == 0 {
            self.renderer
                .render(&mut self.surface, &att, self.shaper.value());
        }
        self.frames += 1;

        let throttle = self.shaper.update(self.input.read());
        let flight: FlightChannels = [
            shape_axis(att.roll, self.trims.roll),
            shape_axis(att.pitch, self.trims.pitch),
            throttle_pwm(throttle),
            shape_axis(0.0, self.trims.yaw),
        ];

        let packet = RcPacket::new(flight, self.sequence, self.clock.micros());

        if !self.link.is_connected() {
            trace!(sequence = packet.sequence, "link down, packet suppressed");
            return TickOutcome::Suppressed;
        }

        let outcome = match self.sink.send_datagram(&packet.to_bytes()).await {
            Ok(()) => TickOutcome::Sent,
            Err(e) => {
                // Single lost packet on a lossy link; the loop carries on
                warn!(sequence = packet.sequence, "send failed: {}", e);
                TickOutcome::SendFailed
            }
        };

        self.sequence = self.sequence.wrapping_add(1);
        self.packets_sent += 1;

        if self.packets_sent - self.last_log >= LOG_INTERVAL_PACKETS {
            info!(
                packets = self.packets_sent,
                sequence = self.sequence,
                throttle = self.shaper.value(),
                "transmit status"
            );
            self.last_log = self.packets_sent;
        }

        outcome
    }

    /// Total packets handed to the sink this session.
    #[must_use]
    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    /// Active cycles completed this session.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current sequence counter value.
    #[must_use]
    pub fn sequence(&self) -> u16 {
        self.sequence
    }
}
