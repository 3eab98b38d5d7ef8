//! # propo-link Library
//!
//! Stream RC servo channels from a handheld transmitter to a UDP receiver.
//!
//! This library provides the core functionality of a radio-control
//! transmitter: it consumes attitude samples from an inertial sensor task,
//! shapes them (plus a throttle input) into servo pulse-width values, and
//! streams fixed-layout channel packets to a remote receiver over UDP.

pub mod config;
pub mod error;
pub mod packet;
pub mod shaper;
pub mod attitude;
pub mod link;
pub mod display;
pub mod transmit;
