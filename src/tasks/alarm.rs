use crate::scheduler::SharedState;

use super::{Indicator, Payload};

/// Blinks the indicator alarm output while the average is below `threshold`.
///
/// The blink phase survives warm periods: the output is forced off there,
/// and blinking resumes from the kept phase when it gets cold again.
pub struct AlarmTask<I> {
    indicator: I,
    threshold: f32,
    phase: bool,
    lit: bool,
}

impl<I: Indicator> AlarmTask<I> {
    pub fn new(indicator: I, threshold: f32) -> Self {
        Self {
            indicator,
            threshold,
            phase: false,
            lit: false,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl<I: Indicator> Payload for AlarmTask<I> {
    fn name(&self) -> &'static str {
        "alarm"
    }

    fn execute(&mut self, shared: &mut SharedState) {
        if shared.latest_average() < self.threshold {
            self.phase = !self.phase;
            self.lit = self.phase;
        } else {
            self.lit = false;
        }
        self.indicator.set_alarm(self.lit);
    }
}
