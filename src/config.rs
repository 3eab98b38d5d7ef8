//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! The device is configured entirely at deploy time: receiver address,
//! throttle mode and hover set-point, per-channel trims, display style, and
//! the pipeline timing knobs all come from one TOML file.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use crate::display::DisplayMode;
use crate::error::Result;
use crate::packet::protocol::{PWM_MAX, PWM_MIN};
use crate::shaper::ThrottleMode;
use crate::transmit::ChannelTrims;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub trim: TrimConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Receiver address and local bind
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    #[serde(default = "default_dest_addr")]
    pub dest_addr: String,

    #[serde(default = "default_dest_port")]
    pub dest_port: u16,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub bind_port: u16,
}

/// Throttle input mode and set-point
#[derive(Debug, Deserialize, Clone)]
pub struct ThrottleConfig {
    /// "buttons" or "analog"
    #[serde(default = "default_throttle_mode")]
    pub mode: String,

    /// Hover set-point as a PWM value, button mode only
    #[serde(default = "default_hover_pwm")]
    pub hover_pwm: u16,
}

/// Per-channel center offsets in microseconds
#[derive(Debug, Deserialize, Clone)]
pub struct TrimConfig {
    #[serde(default = "default_trim_roll")]
    pub roll: i16,

    #[serde(default = "default_trim_pitch")]
    pub pitch: i16,

    #[serde(default = "default_trim_yaw")]
    pub yaw: i16,
}

/// Display style
#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// "off", "bar" or "mark"
    #[serde(default = "default_display_mode")]
    pub mode: String,

    /// Draw the compass marker in mark mode
    #[serde(default)]
    pub show_compass: bool,

    /// Render every Nth active cycle
    #[serde(default = "default_refresh_divider")]
    pub refresh_divider: u64,
}

/// Timing and queue knobs of the sensor-to-network pipeline
#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Transmit loop tick period in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Attitude sampler period in milliseconds
    #[serde(default = "default_sample_ms")]
    pub sample_ms: u64,

    /// Attitude queue depth in samples
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

// Default value functions
fn default_dest_addr() -> String { "192.168.4.2".to_string() }
fn default_dest_port() -> u16 { 5005 }
fn default_bind_addr() -> String { "0.0.0.0".to_string() }

fn default_throttle_mode() -> String { "buttons".to_string() }
fn default_hover_pwm() -> u16 { 1500 }

fn default_trim_roll() -> i16 { 5 }
fn default_trim_pitch() -> i16 { -10 }
fn default_trim_yaw() -> i16 { 60 }

fn default_display_mode() -> String { "bar".to_string() }
fn default_refresh_divider() -> u64 { crate::transmit::DEFAULT_REFRESH_DIVIDER }

fn default_tick_ms() -> u64 { 1 }
fn default_sample_ms() -> u64 { 10 }
fn default_queue_depth() -> usize { crate::attitude::DEFAULT_QUEUE_DEPTH }

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            dest_addr: default_dest_addr(),
            dest_port: default_dest_port(),
            bind_addr: default_bind_addr(),
            bind_port: 0,
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            mode: default_throttle_mode(),
            hover_pwm: default_hover_pwm(),
        }
    }
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            roll: default_trim_roll(),
            pitch: default_trim_pitch(),
            yaw: default_trim_yaw(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: default_display_mode(),
            show_compass: false,
            refresh_divider: default_refresh_divider(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            sample_ms: default_sample_ms(),
            queue_depth: default_queue_depth(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            throttle: ThrottleConfig::default(),
            trim: TrimConfig::default(),
            display: DisplayConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Largest trim offset accepted, in microseconds
const TRIM_LIMIT: i16 = 400;

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, TOML parsing fails, or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.network.dest_addr.parse::<IpAddr>().is_err() {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                format!("dest_addr '{}' is not a valid IP address", self.network.dest_addr),
            )));
        }

        if self.network.dest_port == 0 {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                "dest_port must be greater than 0",
            )));
        }

        if self.network.bind_addr.parse::<IpAddr>().is_err() {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                format!("bind_addr '{}' is not a valid IP address", self.network.bind_addr),
            )));
        }

        if !["buttons", "analog"].contains(&self.throttle.mode.as_str()) {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                "throttle mode must be 'buttons' or 'analog'",
            )));
        }

        if self.throttle.hover_pwm < PWM_MIN || self.throttle.hover_pwm > PWM_MAX {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                format!("hover_pwm must be between {} and {}", PWM_MIN, PWM_MAX),
            )));
        }

        for (name, value) in [
            ("trim.roll", self.trim.roll),
            ("trim.pitch", self.trim.pitch),
            ("trim.yaw", self.trim.yaw),
        ] {
            if value < -TRIM_LIMIT || value > TRIM_LIMIT {
                return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                    format!("{} must be between {} and {}", name, -TRIM_LIMIT, TRIM_LIMIT),
                )));
            }
        }

        if !["off", "bar", "mark"].contains(&self.display.mode.as_str()) {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                "display mode must be 'off', 'bar' or 'mark'",
            )));
        }

        if self.display.refresh_divider == 0 || self.display.refresh_divider > 1000 {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                "refresh_divider must be between 1 and 1000",
            )));
        }

        if self.pipeline.tick_ms == 0 || self.pipeline.tick_ms > 1000 {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                "tick_ms must be between 1 and 1000",
            )));
        }

        if self.pipeline.sample_ms == 0 || self.pipeline.sample_ms > 1000 {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                "sample_ms must be between 1 and 1000",
            )));
        }

        if self.pipeline.queue_depth == 0 || self.pipeline.queue_depth > 1024 {
            return Err(crate::error::PropoError::Config(toml::de::Error::custom(
                "queue_depth must be between 1 and 1024",
            )));
        }

        Ok(())
    }

    /// Destination socket address. Call after `validate()`.
    ///
    /// # Errors
    ///
    /// Returns a config error if `dest_addr` does not parse (caught earlier
    /// by validation under normal use).
    pub fn dest(&self) -> Result<SocketAddr> {
        let addr: IpAddr = self.network.dest_addr.parse().map_err(|_| {
            crate::error::PropoError::Config(toml::de::Error::custom("invalid dest_addr"))
        })?;
        Ok(SocketAddr::new(addr, self.network.dest_port))
    }

    /// Local bind socket address. Call after `validate()`.
    ///
    /// # Errors
    ///
    /// Returns a config error if `bind_addr` does not parse.
    pub fn bind(&self) -> Result<SocketAddr> {
        let addr: IpAddr = self.network.bind_addr.parse().map_err(|_| {
            crate::error::PropoError::Config(toml::de::Error::custom("invalid bind_addr"))
        })?;
        Ok(SocketAddr::new(addr, self.network.bind_port))
    }

    /// Throttle strategy selected by this configuration. The hover
    /// set-point PWM converts to the fraction of full range the button
    /// shaper converges to.
    #[must_use]
    pub fn throttle_mode(&self) -> ThrottleMode {
        match self.throttle.mode.as_str() {
            "analog" => ThrottleMode::Analog,
            _ => ThrottleMode::Buttons {
                hover_point: (self.throttle.hover_pwm.saturating_sub(PWM_MIN)) as f32 / 800.0,
            },
        }
    }

    /// Display style selected by this configuration.
    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        match self.display.mode.as_str() {
            "off" => DisplayMode::Off,
            "mark" => DisplayMode::Mark,
            _ => DisplayMode::Bar,
        }
    }

    /// Per-channel trims as the transmit loop consumes them.
    #[must_use]
    pub fn trims(&self) -> ChannelTrims {
        ChannelTrims {
            roll: self.trim.roll,
            pitch: self.trim.pitch,
            yaw: self.trim.yaw,
        }
    }
}
