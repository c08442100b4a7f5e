use crate::scheduler::SharedState;

use super::Payload;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        }
    }
}

impl Default for Trend {
    fn default() -> Self {
        Trend::Stable
    }
}

/// Classifies a sequence of averages.
pub trait TrendAnalyzer {
    fn analyze(&mut self, average: f32) -> Trend;
}

/// Compares each average with the previous one; changes inside
/// `±dead_band` are [`Trend::Stable`].
pub struct DeltaTrend {
    previous: Option<f32>,
    dead_band: f32,
}

impl DeltaTrend {
    pub fn new(dead_band: f32) -> Self {
        Self {
            previous: None,
            dead_band,
        }
    }
}

impl TrendAnalyzer for DeltaTrend {
    fn analyze(&mut self, average: f32) -> Trend {
        let trend = match self.previous {
            Some(prev) => {
                let delta = average - prev;
                if libm::fabsf(delta) <= self.dead_band {
                    Trend::Stable
                } else if delta > 0.0 {
                    Trend::Rising
                } else {
                    Trend::Falling
                }
            }
            None => Trend::Stable,
        };
        self.previous = Some(average);
        trend
    }
}

/// Feeds the latest average to an analyzer and publishes the class.
pub struct TrendTask<A> {
    analyzer: A,
}

impl<A: TrendAnalyzer> TrendTask<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }
}

impl<A: TrendAnalyzer> Payload for TrendTask<A> {
    fn name(&self) -> &'static str {
        "trend"
    }

    fn execute(&mut self, shared: &mut SharedState) {
        let trend = self.analyzer.analyze(shared.latest_average());
        shared.set_trend(trend);
        debug!("Trend: {}", trend.as_str());
    }
}
