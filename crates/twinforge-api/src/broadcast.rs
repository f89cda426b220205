//! Periodic synthetic device readings for the realtime channel.
//!
//! A single process-wide ticker fires on a fixed period and, on each
//! firing, pushes one [`IotReading`] to every open socket through the
//! broadcast channel in [`AppState`]. Sockets that are not subscribed at
//! fire time simply miss the reading; nothing is queued or replayed.
//!
//! Readings come from a [`ReadingSource`] so tests can inject
//! deterministic values.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use rand::seq::IndexedRandom;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use twinforge_types::{DeviceId, IotReading, ServerMessage};

use crate::state::AppState;

/// Errors raised when configuring the ticker.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RealtimeError {
    /// No device ids to attribute readings to.
    #[error("at least one device id is required for synthetic readings")]
    NoDevices,

    /// The value range is empty or not finite.
    #[error("invalid reading range {min}..{max}")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound (exclusive).
        max: f64,
    },

    /// A zero period would fire continuously.
    #[error("broadcast interval must be greater than zero")]
    ZeroInterval,
}

/// Produces the reading sent on each tick.
pub trait ReadingSource: Send {
    /// The next reading to broadcast, or `None` to skip this tick.
    fn next_reading(&mut self) -> Option<IotReading>;
}

/// Uniformly random readings over a fixed device set and value range.
#[derive(Debug, Clone)]
pub struct RandomReadings<R> {
    rng: R,
    device_ids: Vec<DeviceId>,
    min: f64,
    max: f64,
}

impl<R: Rng> RandomReadings<R> {
    /// Create a source drawing devices from `device_ids` and values from
    /// `min..max`.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::NoDevices`] for an empty device list and
    /// [`RealtimeError::InvalidRange`] unless `min < max` with both finite.
    pub fn new(
        rng: R,
        device_ids: Vec<DeviceId>,
        min: f64,
        max: f64,
    ) -> Result<Self, RealtimeError> {
        if device_ids.is_empty() {
            return Err(RealtimeError::NoDevices);
        }
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(RealtimeError::InvalidRange { min, max });
        }
        Ok(Self {
            rng,
            device_ids,
            min,
            max,
        })
    }
}

impl<R: Rng + Send> ReadingSource for RandomReadings<R> {
    fn next_reading(&mut self) -> Option<IotReading> {
        let device_id = *self.device_ids.choose(&mut self.rng)?;
        Some(IotReading {
            device_id,
            value: self.rng.random_range(self.min..self.max),
            timestamp: Utc::now(),
        })
    }
}

/// Fire one tick: send a reading to every subscribed socket.
///
/// Returns the number of sockets reached. With no sockets open this is a
/// no-op and the source is not consulted.
pub fn tick(state: &AppState, source: &mut dyn ReadingSource) -> usize {
    if state.connected_clients() == 0 {
        return 0;
    }
    let Some(reading) = source.next_reading() else {
        return 0;
    };
    let reached = state.broadcast(ServerMessage::IotUpdate { data: reading });
    debug!(device_id = %reading.device_id, value = reading.value, reached, "iot reading broadcast");
    reached
}

/// Spawn the process-wide ticker.
///
/// The first firing happens one `period` after the call. Missed firings
/// are skipped rather than bunched up.
///
/// # Errors
///
/// Returns [`RealtimeError::ZeroInterval`] if `period` is zero.
pub fn spawn_ticker<S>(
    state: Arc<AppState>,
    period: Duration,
    mut source: S,
) -> Result<JoinHandle<()>, RealtimeError>
where
    S: ReadingSource + 'static,
{
    if period.is_zero() {
        return Err(RealtimeError::ZeroInterval);
    }
    let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(period_ms = period.as_millis(), "starting realtime ticker");
    Ok(tokio::spawn(async move {
        loop {
            interval.tick().await;
            tick(&state, &mut source);
        }
    }))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use twinforge_genai::{GenerationConfig, GenerationService};
    use twinforge_store::EntityStore;

    use super::*;
    use crate::state::ApiSettings;

    fn devices() -> Vec<DeviceId> {
        (1..=4).map(DeviceId::new).collect()
    }

    fn state() -> Option<Arc<AppState>> {
        let generation = GenerationService::new(&GenerationConfig::default()).ok()?;
        Some(Arc::new(AppState::new(
            EntityStore::new(),
            generation,
            ApiSettings::default(),
        )))
    }

    #[test]
    fn rejects_bad_configuration() {
        let rng = SmallRng::seed_from_u64(1);
        assert_eq!(
            RandomReadings::new(rng.clone(), Vec::new(), 0.0, 100.0).err(),
            Some(RealtimeError::NoDevices)
        );
        assert!(matches!(
            RandomReadings::new(rng.clone(), devices(), 5.0, 5.0),
            Err(RealtimeError::InvalidRange { .. })
        ));
        assert!(RandomReadings::new(rng, devices(), 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn readings_stay_in_range() {
        let Ok(mut source) = RandomReadings::new(SmallRng::seed_from_u64(3), devices(), 0.0, 100.0)
        else {
            return;
        };
        for _ in 0..200 {
            let reading = source.next_reading();
            assert!(reading.is_some_and(|r| (1..=4).contains(&r.device_id.into_inner())
                && (0.0..100.0).contains(&r.value)));
        }
    }

    struct Fixed(u32);

    impl ReadingSource for Fixed {
        fn next_reading(&mut self) -> Option<IotReading> {
            self.0 = self.0.saturating_add(1);
            Some(IotReading {
                device_id: DeviceId::new(2),
                value: 21.5,
                timestamp: Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn tick_without_clients_is_a_noop() {
        let Some(state) = state() else { return };
        let mut source = Fixed(0);
        assert_eq!(tick(&state, &mut source), 0);
        assert_eq!(source.0, 0);
    }

    #[tokio::test]
    async fn tick_reaches_every_subscriber() {
        let Some(state) = state() else { return };
        let mut a = state.subscribe();
        let mut b = state.subscribe();
        let mut source = Fixed(0);

        assert_eq!(tick(&state, &mut source), 2);

        for rx in [&mut a, &mut b] {
            let message = rx.try_recv().ok();
            assert!(matches!(
                message,
                Some(ServerMessage::IotUpdate { data }) if data.device_id == DeviceId::new(2)
            ));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_fires_after_one_period() {
        let Some(state) = state() else { return };
        let mut rx = state.subscribe();
        let handle = spawn_ticker(Arc::clone(&state), Duration::from_secs(5), Fixed(0));
        assert!(handle.is_ok());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::IotUpdate { .. })));

        if let Ok(handle) = handle {
            handle.abort();
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        let Some(state) = state() else { return };
        assert!(matches!(
            spawn_ticker(state, Duration::ZERO, Fixed(0)),
            Err(RealtimeError::ZeroInterval)
        ));
    }
}
