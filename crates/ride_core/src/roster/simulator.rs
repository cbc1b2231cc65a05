//! Simulated driver movement.
//!
//! Random jitter stands in for a real driver-location feed. Each tick nudges
//! every driver by a sub-100 m offset and moves its ETA by at most a minute.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::DriverStore;
use crate::driver::{Driver, MIN_ESTIMATED_ARRIVAL_MINUTES};
use crate::location::LocationStore;
use crate::task::TaskHandle;

/// Largest offset applied to either axis in one tick, in degrees.
pub const JITTER_MAX_DEGREES: f64 = 0.0005;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(10);

const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Produce the next roster without touching `roster`.
///
/// Only the position and the ETA change; the ETA never drops below
/// [`MIN_ESTIMATED_ARRIVAL_MINUTES`].
pub fn advance_tick<R: Rng + ?Sized>(roster: &[Driver], rng: &mut R) -> Vec<Driver> {
    roster
        .iter()
        .map(|driver| {
            let mut next = driver.clone();
            next.current_location.latitude += (rng.gen::<f64>() - 0.5) * 2.0 * JITTER_MAX_DEGREES;
            next.current_location.longitude += (rng.gen::<f64>() - 0.5) * 2.0 * JITTER_MAX_DEGREES;

            let step: i64 = rng.gen_range(-1..=1);
            let eta = (i64::from(driver.estimated_arrival_minutes) + step)
                .max(i64::from(MIN_ESTIMATED_ARRIVAL_MINUTES));
            next.estimated_arrival_minutes =
                u32::try_from(eta).unwrap_or(driver.estimated_arrival_minutes);
            next
        })
        .collect()
}

/// Seedable source of roster jitter.
#[derive(Debug)]
pub struct RosterJitter {
    rng: StdRng,
}

impl RosterJitter {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn perturb(&mut self, roster: &[Driver]) -> Vec<Driver> {
        advance_tick(roster, &mut self.rng)
    }
}

impl Default for RosterJitter {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Periodic producer of roster updates.
#[derive(Debug, Clone)]
pub struct RosterSimulator {
    drivers: DriverStore,
    location: LocationStore,
    period: Duration,
    jitter: Arc<Mutex<RosterJitter>>,
}

impl RosterSimulator {
    pub fn new(
        drivers: DriverStore,
        location: LocationStore,
        period: Duration,
        jitter: RosterJitter,
    ) -> Self {
        Self {
            drivers,
            location,
            period: period.max(MIN_TICK_PERIOD),
            jitter: Arc::new(Mutex::new(jitter)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn jitter(&self) -> MutexGuard<'_, RosterJitter> {
        self.jitter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one jitter step to the store as a single replacement.
    pub fn tick(&self) {
        let mut jitter = self.jitter();
        self.drivers.map_drivers(|roster| jitter.perturb(roster));
        roster_debug!("(tick) roster advanced");
    }

    /// Start the supervisor. The timer runs only while a user location is
    /// known; cancelling the returned handle stops everything.
    pub fn attach(&self) -> TaskHandle {
        let simulator = self.clone();
        TaskHandle::spawn(move |token| simulator.supervise(token))
    }

    async fn supervise(self, token: CancellationToken) {
        let mut location = self.location.subscribe();
        let mut timer: Option<TaskHandle> = None;

        loop {
            let user_known = location.borrow_and_update().has_user();
            match (user_known, timer.is_some()) {
                (true, false) => {
                    roster_info!("(supervise) user location known, starting roster timer");
                    let simulator = self.clone();
                    timer = Some(TaskHandle::spawn(move |t| simulator.run_timer(t)));
                }
                (false, true) => {
                    if let Some(mut handle) = timer.take() {
                        handle.cancel();
                    }
                    roster_info!("(supervise) user location lost, roster timer stopped");
                }
                _ => {}
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                changed = location.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        if let Some(mut handle) = timer.take() {
            handle.cancel();
        }
        roster_debug!("(supervise) roster simulator detached");
    }

    async fn run_timer(self, token: CancellationToken) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => self.tick(),
            }
        }
    }
}
