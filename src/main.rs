//! # propo-link
//!
//! Handheld-transmitter control loop: attitude samples in, channel packets
//! out over UDP, live control-state display on the side.
//!
//! The binary wires the library pieces together:
//!
//! 1. **Initialization** — tracing subscriber, configuration file (first
//!    CLI argument, default `config/default.toml`, falling back to built-in
//!    defaults when the file is absent), UDP link bind.
//! 2. **Attitude producer** — a spawned sampler task polling an attitude
//!    source on its own cadence and pushing into the bounded queue. On a
//!    development host this is the synthetic orbit source; a real IMU
//!    driver implements the same trait.
//! 3. **Main loop** — a fixed-period tick driving [`TransmitLoop::tick`],
//!    alongside Ctrl+C for graceful shutdown.
//!
//! The transmit loop itself never fails; the only startup errors are bad
//! configuration and a failed socket bind.

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::info;

use propo_link::attitude::{self, SyntheticSource};
use propo_link::config::Config;
use propo_link::display::{Renderer, TraceSurface};
use propo_link::link::{handle_link_event, LinkEvent, LinkState, UdpLink};
use propo_link::shaper::{ButtonInput, ThrottleInput, ThrottleMode, ThrottleShaper};
use propo_link::transmit::{PilotInput, TransmitLoop};

/// Pilot-input stand-in for a development host: holds the hover button in
/// button mode, mid-lever in analog mode. A real button pair or ADC lever
/// implements [`PilotInput`] and takes this seat.
struct BenchInput {
    mode: ThrottleMode,
}

impl PilotInput for BenchInput {
    fn read(&mut self) -> ThrottleInput {
        match self.mode {
            ThrottleMode::Buttons { .. } => ThrottleInput::Buttons(ButtonInput {
                hover: true,
                ..Default::default()
            }),
            ThrottleMode::Analog => ThrottleInput::Analog(0.5),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("propo-link v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        info!("no config file at {}, using defaults", config_path);
        Config::default()
    };

    let mode = config.throttle_mode();
    let link_state = LinkState::new();
    let link = UdpLink::open(config.bind()?, config.dest()?).await?;

    // UDP has no session; a successful bind stands in for the association
    // event. A Wi-Fi-backed platform calls the same handler from its
    // network-stack callbacks.
    let mut status_surface = TraceSurface;
    handle_link_event(LinkEvent::Associated, &link_state, &mut status_surface);
    info!("streaming to {}", link.dest());

    // Attitude producer task. The synthetic source is a bench stand-in for
    // the real inertial sensor driver behind the same trait.
    let (att_tx, att_rx) = attitude::channel(config.pipeline.queue_depth);
    tokio::spawn(attitude::run_sampler(
        SyntheticSource::default(),
        att_tx,
        Duration::from_millis(config.pipeline.sample_ms),
    ));

    let mut transmit = TransmitLoop::new(
        att_rx,
        BenchInput { mode },
        link,
        TraceSurface,
        Renderer::new(config.display_mode(), config.display.show_compass),
        ThrottleShaper::new(mode),
        config.trims(),
        link_state.clone(),
        config.display.refresh_divider,
    );
    transmit.draw_static();

    let mut tick = interval(Duration::from_millis(config.pipeline.tick_ms));
    info!(
        "transmit loop running, tick period {} ms",
        config.pipeline.tick_ms
    );

    loop {
        tokio::select! {
            _ = tick.tick() => {
                transmit.tick().await;
            }

            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!(
        "session totals: {} packets sent over {} active frames",
        transmit.packets_sent(),
        transmit.frames()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_input_matches_button_mode() {
        let mut input = BenchInput {
            mode: ThrottleMode::Buttons { hover_point: 0.5 },
        };
        match input.read() {
            ThrottleInput::Buttons(buttons) => assert!(buttons.hover),
            other => panic!("expected button input, got {:?}", other),
        }
    }

    #[test]
    fn test_bench_input_matches_analog_mode() {
        let mut input = BenchInput {
            mode: ThrottleMode::Analog,
        };
        assert_eq!(input.read(), ThrottleInput::Analog(0.5));
    }
}
