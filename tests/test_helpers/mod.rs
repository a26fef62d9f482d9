//! Shared fixtures for task board integration tests.


use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex, PoisonError};
use taskboard::task::{
    domain::TaskId,
    ports::{TaskRepository, TransitionLog},
    services::TaskBoardService,
};

/// Clock whose reading only changes when a test advances it.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Service under test together with the clock driving it.
pub struct Board<R>
where
    R: TaskRepository + TransitionLog,
{
    /// Service wired to the repository under test.
    pub service: TaskBoardService<R, ManualClock>,
    /// Clock shared with the service.
    pub clock: Arc<ManualClock>,
}

impl<R> Board<R>
where
    R: TaskRepository + TransitionLog,
{
    /// Wires `repository` to a service whose clock starts at [`epoch`].
    pub fn new(repository: R) -> Self {
        let clock = Arc::new(ManualClock::new(epoch()));
        let service = TaskBoardService::new(Arc::new(repository), Arc::clone(&clock));
        Self { service, clock }
    }

    /// Advances the shared clock by whole seconds.
    pub fn advance_secs(&self, seconds: i64) {
        self.clock.advance(TimeDelta::seconds(seconds));
    }
}

/// Fixed starting instant for every scenario.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26)
        .single()
        .unwrap_or_default()
}

/// Builds a task identifier, failing the test on blank input.
///
/// # Errors
///
/// Returns an error when `value` is blank.
pub fn task_id(value: &str) -> eyre::Result<TaskId> {
    Ok(TaskId::new(value)?)
}
