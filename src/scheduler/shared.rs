use crate::tasks::trend::Trend;

use super::ReadinessGate;

/// Single-slot "latest value" cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatestReading {
    /// Average of the last finished window, *C
    pub value: f32,
    /// Bumped (wrapping) on every publication, 0 before the first one.
    pub version: u32,
}

/// State shared by the tasks of one scheduler.
///
/// Written by the acquisition task (reading, gate) and the trend task (trend),
/// read by the others. All tasks run on the same cooperative thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SharedState {
    gate: ReadinessGate,
    latest: LatestReading,
    trend: Trend,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            gate: ReadinessGate::new(),
            latest: LatestReading {
                value: 0.0,
                version: 0,
            },
            trend: Trend::Stable,
        }
    }

    /// Latch a new average and open the readiness gate.
    ///
    /// Returns `true` for the first publication (the one that opened the gate).
    pub fn publish(&mut self, value: f32) -> bool {
        self.latest = LatestReading {
            value,
            version: self.latest.version.wrapping_add(1),
        };
        self.gate.open()
    }

    /// Most recent average, 0 before the first finished cycle.
    #[inline]
    pub fn latest_average(&self) -> f32 {
        self.latest.value
    }

    #[inline]
    pub fn latest(&self) -> LatestReading {
        self.latest
    }

    #[inline]
    pub fn is_data_ready(&self) -> bool {
        self.gate.is_open()
    }

    #[inline]
    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn set_trend(&mut self, trend: Trend) {
        self.trend = trend;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_before_first_publication() {
        let s = SharedState::new();
        assert!(!s.is_data_ready());
        assert_eq!(s.latest_average(), 0.0);
        assert_eq!(s.latest().version, 0);
        assert_eq!(s.trend(), Trend::Stable);
    }

    #[test]
    fn publication_versions_and_gate() {
        let mut s = SharedState::new();
        assert!(s.publish(21.5));
        assert!(s.is_data_ready());
        assert!(!s.publish(22.0));
        assert!(!s.publish(22.5));
        assert!(s.is_data_ready());

        assert_eq!(
            s.latest(),
            LatestReading {
                value: 22.5,
                version: 3
            }
        );
    }
}
