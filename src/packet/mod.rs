//! # Wire Protocol Module
//!
//! Fixed-layout channel packet for the UDP control link.
//!
//! This module handles:
//! - Protocol constants (PWM range, channel count, packet size)
//! - Packet construction and explicit byte serialization
//! - The monotonic microsecond clock stamped into each packet

pub mod protocol;
pub mod encoder;
