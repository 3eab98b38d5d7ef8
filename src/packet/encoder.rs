//! # Packet Encoder
//!
//! Builds and serializes the fixed-layout channel packet.
//!
//! Serialization writes every field explicitly at its offset instead of
//! casting an in-memory struct, so the wire layout never depends on compiler
//! padding or the host architecture. Byte order is little-endian — identical
//! to what the original little-endian transmitter hardware put on the wire.

use bytes::{BufMut, Bytes, BytesMut};
use std::time::Instant;

use super::protocol::*;

/// One frame of control-channel state, as sent to the receiver.
///
/// Channels 0-3 carry roll/pitch/throttle/yaw; channels 4-7 are reserved and
/// pinned to [`PWM_CENTER`].
///
/// # Examples
///
/// ```
/// use propo_link::packet::encoder::RcPacket;
///
/// let packet = RcPacket::new([1500, 1500, 1100, 1560], 0, 0);
/// assert_eq!(packet.pwms[2], 1100); // throttle
/// assert_eq!(packet.pwms[7], 1500); // reserved
/// assert_eq!(packet.to_bytes().len(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RcPacket {
    /// Protocol version, always [`PACKET_VERSION`]
    pub version: u32,

    /// Microseconds since process start, monotonic within a session
    pub timestamp_us: u64,

    /// Wrapping packet counter; advanced by the caller per transmitted packet
    pub sequence: u16,

    /// Channel PWM values in microseconds
    pub pwms: [u16; NUM_CHANNELS],
}

impl RcPacket {
    /// Build a packet from the four shaped flight channels.
    ///
    /// Reserved channels 4-7 are filled with [`PWM_CENTER`]. Pure
    /// construction, always succeeds; the caller owns the sequence counter
    /// and is responsible for advancing it exactly once per packet that is
    /// actually transmitted.
    ///
    /// # Arguments
    ///
    /// * `flight` - Shaped roll/pitch/throttle/yaw values
    /// * `sequence` - Current value of the packet counter
    /// * `timestamp_us` - Monotonic microseconds, sampled at build time
    #[must_use]
    pub fn new(flight: FlightChannels, sequence: u16, timestamp_us: u64) -> Self {
        let mut pwms = [PWM_CENTER; NUM_CHANNELS];
        pwms[..NUM_FLIGHT_CHANNELS].copy_from_slice(&flight);

        Self {
            version: PACKET_VERSION,
            timestamp_us,
            sequence,
            pwms,
        }
    }

    /// Serialize into the packed 30-byte wire form.
    ///
    /// Field order: version, timestamp_us, sequence, pwms[0..8]. All fields
    /// little-endian, no padding.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(PACKET_SIZE);
        buf.put_u32_le(self.version);
        buf.put_u64_le(self.timestamp_us);
        buf.put_u16_le(self.sequence);
        for &pwm in &self.pwms {
            buf.put_u16_le(pwm);
        }
        buf.freeze()
    }
}

/// Monotonic microsecond clock anchored at construction time.
///
/// Provides the `timestamp_us` field of outgoing packets. Never goes
/// backwards within a session.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Microseconds elapsed since the clock was created.
    #[must_use]
    pub fn micros(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_reserved_channels() {
        let packet = RcPacket::new([1505, 1490, 1100, 1560], 3, 42);

        assert_eq!(packet.version, PACKET_VERSION);
        assert_eq!(packet.timestamp_us, 42);
        assert_eq!(packet.sequence, 3);
        assert_eq!(packet.pwms[0], 1505);
        assert_eq!(packet.pwms[1], 1490);
        assert_eq!(packet.pwms[2], 1100);
        assert_eq!(packet.pwms[3], 1560);
        for ch in NUM_FLIGHT_CHANNELS..NUM_CHANNELS {
            assert_eq!(packet.pwms[ch], PWM_CENTER, "channel {} not centered", ch);
        }
    }

    #[test]
    fn test_to_bytes_length() {
        let packet = RcPacket::new([PWM_CENTER; 4], 0, 0);
        assert_eq!(packet.to_bytes().len(), PACKET_SIZE);
    }

    #[test]
    fn test_wire_layout_fixture() {
        // Literal fixture: version=2, timestamp_us=123456789, sequence=7,
        // pwms=[1500,1600,1100,1900,1500,1500,1500,1500]
        let packet = RcPacket::new([1500, 1600, 1100, 1900], 7, 123_456_789);
        let bytes = packet.to_bytes();

        #[rustfmt::skip]
        let expected: [u8; 30] = [
            0x02, 0x00, 0x00, 0x00,                         // version = 2
            0x15, 0xCD, 0x5B, 0x07, 0x00, 0x00, 0x00, 0x00, // timestamp_us = 123456789
            0x07, 0x00,                                     // sequence = 7
            0xDC, 0x05,                                     // pwms[0] = 1500
            0x40, 0x06,                                     // pwms[1] = 1600
            0x4C, 0x04,                                     // pwms[2] = 1100
            0x6C, 0x07,                                     // pwms[3] = 1900
            0xDC, 0x05, 0xDC, 0x05, 0xDC, 0x05, 0xDC, 0x05, // pwms[4..8] = 1500
        ];
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn test_construction_is_pure() {
        let a = RcPacket::new([1500, 1600, 1100, 1900], 7, 123_456_789);
        let b = RcPacket::new([1500, 1600, 1100, 1900], 7, 123_456_789);
        assert_eq!(a, b);
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_sequence_wraps_in_wire_form() {
        let packet = RcPacket::new([PWM_CENTER; 4], u16::MAX, 0);
        let bytes = packet.to_bytes();
        assert_eq!(&bytes[12..14], &[0xFF, 0xFF]);

        let wrapped = RcPacket::new([PWM_CENTER; 4], u16::MAX.wrapping_add(1), 0);
        assert_eq!(wrapped.sequence, 0);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::new();
        let a = clock.micros();
        let b = clock.micros();
        assert!(b >= a);
    }
}
