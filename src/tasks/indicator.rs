use core::cell::RefCell;

use crate::scheduler::SharedState;

use super::{Payload, Trend};

/// Visual indicator: a trend output plus an alarm output.
pub trait Indicator {
    fn show_trend(&mut self, trend: Trend);
    fn set_alarm(&mut self, on: bool);
}

// one physical indicator serves several tasks on the same thread
impl<I: Indicator> Indicator for &RefCell<I> {
    fn show_trend(&mut self, trend: Trend) {
        self.borrow_mut().show_trend(trend)
    }

    fn set_alarm(&mut self, on: bool) {
        self.borrow_mut().set_alarm(on)
    }
}

pub struct IndicatorTask<I> {
    indicator: I,
}

impl<I: Indicator> IndicatorTask<I> {
    pub fn new(indicator: I) -> Self {
        Self { indicator }
    }
}

impl<I: Indicator> Payload for IndicatorTask<I> {
    fn name(&self) -> &'static str {
        "indicator"
    }

    fn execute(&mut self, shared: &mut SharedState) {
        self.indicator.show_trend(shared.trend());
    }
}
