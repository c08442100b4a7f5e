//! The tasks of the cyclic executor.
//!
//! [`AcquisitionTask`] runs on every tick; the others are wrapped in
//! [`Downstream`], which keeps them idle until the first reading exists and
//! then lets their payload run once every `divisor` ticks.

pub mod acquisition;
pub mod alarm;
pub mod display;
pub mod indicator;
pub mod trend;

use core::num::NonZeroU32;

use crate::{
    scheduler::{PeriodicTask, SharedState, TaskThrottle},
    support::Clock,
};

pub use acquisition::AcquisitionTask;
pub use alarm::AlarmTask;
pub use display::{Display, DisplayTask, QueuedConsole};
pub use indicator::{Indicator, IndicatorTask};
pub use trend::{DeltaTrend, Trend, TrendAnalyzer, TrendTask};

/// Work of a downstream task.
pub trait Payload {
    fn name(&self) -> &'static str;
    fn execute(&mut self, shared: &mut SharedState);
}

/// Readiness-gated, throttled, timed wrapper around a [`Payload`].
pub struct Downstream<P, C> {
    payload: P,
    throttle: TaskThrottle,
    clock: C,
    last_duration_us: u64,
    executions: u32,
}

impl<P: Payload, C: Clock> Downstream<P, C> {
    pub fn new(payload: P, divisor: NonZeroU32, clock: C) -> Self {
        Self {
            payload,
            throttle: TaskThrottle::new(divisor),
            clock,
            last_duration_us: 0,
            executions: 0,
        }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn throttle(&self) -> &TaskThrottle {
        &self.throttle
    }

    /// Wall-clock duration of the last payload execution.
    pub fn last_duration_us(&self) -> u64 {
        self.last_duration_us
    }

    pub fn executions(&self) -> u32 {
        self.executions
    }
}

impl<P: Payload, C: Clock> PeriodicTask<SharedState> for Downstream<P, C> {
    fn run(&mut self, shared: &mut SharedState) -> bool {
        if !shared.is_data_ready() {
            return true;
        }
        if !self.throttle.tick() {
            return true;
        }

        let start = self.clock.now_us();
        self.payload.execute(shared);
        self.last_duration_us = self.clock.elapsed_us(start, self.clock.now_us());
        self.executions = self.executions.wrapping_add(1);

        debug!(
            "{}: done in {} us",
            self.payload.name(),
            self.last_duration_us
        );
        true
    }
}
