//! # Attitude Pipeline Module
//!
//! The producer side of the control loop: attitude samples from an inertial
//! sensor task, carried to the transmit loop over a bounded queue.
//!
//! This module handles:
//! - The attitude sample value type
//! - A bounded single-producer/single-consumer queue where neither side
//!   ever blocks the other
//! - The opaque sensor seam ([`AttitudeSource`]) and the sampler task that
//!   polls it

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::debug;

/// Default queue depth; a few tens of samples is ample headroom since only
/// the latest sample matters to the consumer
pub const DEFAULT_QUEUE_DEPTH: usize = 32;

/// One attitude/heading sample from the inertial sensor.
///
/// All components are conventionally in [-1, 1]. `north`/`east` are the
/// horizontal heading components, used only by the compass overlay.
/// Pure value type: no identity, older samples are silently superseded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttitudeSample {
    /// Roll deflection
    pub roll: f32,
    /// Pitch deflection
    pub pitch: f32,
    /// Heading north component
    pub north: f32,
    /// Heading east component
    pub east: f32,
}

/// Producer handle of the attitude queue.
///
/// Push never blocks: when the queue is full the new sample is dropped
/// (drop-newest), preserving the oldest unconsumed run of samples. The
/// producer therefore can never be stalled by a slow consumer.
#[derive(Debug, Clone)]
pub struct AttitudeSender {
    tx: mpsc::Sender<AttitudeSample>,
}

impl AttitudeSender {
    /// Push a sample without blocking.
    ///
    /// Returns `true` if the sample was enqueued, `false` if it was dropped
    /// because the queue is full or the consumer is gone.
    pub fn push(&self, sample: AttitudeSample) -> bool {
        self.tx.try_send(sample).is_ok()
    }

    /// Whether the consumer side has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer handle of the attitude queue.
#[derive(Debug)]
pub struct AttitudeReceiver {
    rx: mpsc::Receiver<AttitudeSample>,
}

impl AttitudeReceiver {
    /// Pop the oldest queued sample without blocking.
    ///
    /// Returns `None` immediately when the queue is empty; the transmit
    /// loop treats that as an idle tick.
    pub fn try_pop(&mut self) -> Option<AttitudeSample> {
        self.rx.try_recv().ok()
    }
}

/// Create the bounded attitude queue.
///
/// # Examples
///
/// ```
/// use propo_link::attitude::{channel, AttitudeSample};
///
/// let (tx, mut rx) = channel(4);
/// assert!(tx.push(AttitudeSample::default()));
/// assert!(rx.try_pop().is_some());
/// assert!(rx.try_pop().is_none());
/// ```
#[must_use]
pub fn channel(depth: usize) -> (AttitudeSender, AttitudeReceiver) {
    let (tx, rx) = mpsc::channel(depth);
    (AttitudeSender { tx }, AttitudeReceiver { rx })
}

/// Opaque seam over the inertial sensor driver.
///
/// The real device driver lives outside this crate; anything that can
/// produce an attitude sample on demand fits here.
#[async_trait]
pub trait AttitudeSource: Send {
    /// Read the current attitude.
    async fn sample(&mut self) -> AttitudeSample;
}

/// Poll an attitude source on a fixed period and push into the queue.
///
/// Runs until the consumer side of the queue is dropped. Dropped samples
/// (full queue) are logged at debug level and otherwise ignored; only the
/// latest attitude matters.
pub async fn run_sampler<S: AttitudeSource>(
    mut source: S,
    tx: AttitudeSender,
    period: Duration,
) {
    let mut tick = interval(period);
    loop {
        tick.tick().await;
        if tx.is_closed() {
            debug!("attitude consumer gone, stopping sampler");
            return;
        }
        let sample = source.sample().await;
        if !tx.push(sample) {
            debug!(?sample, "attitude queue full, dropping sample");
        }
    }
}

/// Synthetic attitude source: a slow orbit through roll/pitch with a
/// rotating heading. Stand-in for a real IMU driver behind the same trait,
/// useful for bench-testing the link end to end.
#[derive(Debug, Default)]
pub struct SyntheticSource {
    phase: f32,
}

#[async_trait]
impl AttitudeSource for SyntheticSource {
    async fn sample(&mut self) -> AttitudeSample {
        self.phase = (self.phase + 0.01) % (2.0 * std::f32::consts::PI);
        AttitudeSample {
            roll: 0.4 * self.phase.sin(),
            pitch: 0.4 * self.phase.cos(),
            north: self.phase.cos(),
            east: self.phase.sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(roll: f32) -> AttitudeSample {
        AttitudeSample {
            roll,
            ..Default::default()
        }
    }

    #[test]
    fn test_push_pop_fifo() {
        let (tx, mut rx) = channel(8);
        assert!(tx.push(sample(0.1)));
        assert!(tx.push(sample(0.2)));

        assert_eq!(rx.try_pop().unwrap().roll, 0.1);
        assert_eq!(rx.try_pop().unwrap().roll, 0.2);
        assert!(rx.try_pop().is_none());
    }

    #[test]
    fn test_pop_empty_is_non_blocking() {
        let (_tx, mut rx) = channel(4);
        assert!(rx.try_pop().is_none());
    }

    #[test]
    fn test_overflow_drops_newest() {
        let (tx, mut rx) = channel(4);

        // Push 6 samples into a depth-4 queue before any consumption
        for i in 0..6 {
            let accepted = tx.push(sample(i as f32));
            assert_eq!(accepted, i < 4, "push {} acceptance", i);
        }

        // The retained set is the oldest capacity-worth of samples
        for i in 0..4 {
            assert_eq!(rx.try_pop().unwrap().roll, i as f32);
        }
        assert!(rx.try_pop().is_none());
    }

    #[test]
    fn test_push_after_receiver_dropped() {
        let (tx, rx) = channel(4);
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.push(sample(0.0)));
    }

    #[tokio::test]
    async fn test_synthetic_source_stays_in_range() {
        let mut source = SyntheticSource::default();
        for _ in 0..1000 {
            let s = source.sample().await;
            assert!(s.roll.abs() <= 1.0);
            assert!(s.pitch.abs() <= 1.0);
            assert!(s.north.abs() <= 1.0);
            assert!(s.east.abs() <= 1.0);
        }
    }

    #[tokio::test]
    async fn test_sampler_feeds_queue() {
        let (tx, mut rx) = channel(8);
        let handle = tokio::spawn(run_sampler(
            SyntheticSource::default(),
            tx,
            Duration::from_millis(1),
        ));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_pop().is_some());

        // Sampler stops once the consumer is gone
        drop(rx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sampler did not stop")
            .unwrap();
    }
}
