//! # Protocol Constants and Types
//!
//! Core definitions for the channel packet streamed to the receiver.

/// Protocol version stamped into every packet
pub const PACKET_VERSION: u32 = 2;

/// Number of channels carried in a packet
pub const NUM_CHANNELS: usize = 8;

/// Number of live flight channels (roll, pitch, throttle, yaw)
pub const NUM_FLIGHT_CHANNELS: usize = 4;

/// PWM value range in microseconds (servo convention)
pub const PWM_MIN: u16 = 1100;
pub const PWM_MAX: u16 = 1900;
pub const PWM_CENTER: u16 = 1500;

/// Half-range gain: a full-scale axis deflection spans `PWM_GAIN` microseconds
pub const PWM_GAIN: f32 = 800.0;

/// Serialized packet size in bytes
/// Layout: version(4) + timestamp_us(8) + sequence(2) + 8 × pwm(2)
pub const PACKET_SIZE: usize = 30;

/// Channel indices for semantic access.
pub mod channels {
    /// Roll - attitude X axis
    pub const ROLL: usize = 0;
    /// Pitch - attitude Y axis
    pub const PITCH: usize = 1;
    /// Throttle - button pair or analog lever
    pub const THROTTLE: usize = 2;
    /// Yaw - fixed center plus trim (no sensor axis)
    pub const YAW: usize = 3;
}

/// The four live flight-channel values, in channel order
pub type FlightChannels = [u16; NUM_FLIGHT_CHANNELS];
