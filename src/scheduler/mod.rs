//! Cooperative scheduler: a fixed table of periodic callbacks, run in
//! registration order from one timer-driven thread.

mod gate;
mod shared;
mod throttle;

pub use gate::ReadinessGate;
pub use shared::{LatestReading, SharedState};
pub use throttle::TaskThrottle;

/// Periodic callback. Must return quickly: all tasks share one thread.
pub trait PeriodicTask<S> {
    /// Returning `false` stops further invocations of this task.
    fn run(&mut self, shared: &mut S) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskHandle(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// Task table is full
    Full,
    /// Period must be at least 1 ms
    ZeroInterval,
}

struct Slot<'a, S> {
    task: &'a mut dyn PeriodicTask<S>,
    interval_ms: u32,
    next_due_ms: u64,
    active: bool,
}

pub struct Scheduler<'a, S, const N: usize> {
    slots: heapless::Vec<Slot<'a, S>, N>,
    now_ms: u64,
}

impl<'a, S, const N: usize> Scheduler<'a, S, N> {
    pub fn new() -> Self {
        Self {
            slots: heapless::Vec::new(),
            now_ms: 0,
        }
    }

    /// Add `task`, first due one `interval_ms` after the last seen tick.
    pub fn register_periodic(
        &mut self,
        interval_ms: u32,
        task: &'a mut dyn PeriodicTask<S>,
    ) -> Result<TaskHandle, SchedulerError> {
        if interval_ms == 0 {
            error!("Scheduler: zero period rejected");
            return Err(SchedulerError::ZeroInterval);
        }

        let handle = TaskHandle(self.slots.len());
        self.slots
            .push(Slot {
                task,
                interval_ms,
                next_due_ms: self.now_ms + interval_ms as u64,
                active: true,
            })
            .map_err(|_| {
                error!("Scheduler: task table full ({})", N);
                SchedulerError::Full
            })?;

        Ok(handle)
    }

    /// Timer event at `now_ms`: run every due task once, in registration order.
    ///
    /// Returns the number of callbacks invoked. Missed periods are skipped,
    /// not replayed.
    pub fn tick(&mut self, now_ms: u64, shared: &mut S) -> usize {
        self.now_ms = now_ms;

        let mut invoked = 0;
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if !slot.active || now_ms < slot.next_due_ms {
                continue;
            }

            invoked += 1;
            if !slot.task.run(shared) {
                warn!("Scheduler: task {} stopped", id);
                slot.active = false;
                continue;
            }

            slot.next_due_ms += slot.interval_ms as u64;
            if slot.next_due_ms <= now_ms {
                slot.next_due_ms = now_ms + slot.interval_ms as u64;
            }
        }
        invoked
    }

    pub fn is_active(&self, handle: TaskHandle) -> bool {
        self.slots.get(handle.0).map_or(false, |s| s.active)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<'a, S, const N: usize> Default for Scheduler<'a, S, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = std::cell::RefCell<Vec<(&'static str, u64)>>;

    struct Recorder<'l> {
        name: &'static str,
        log: &'l Log,
        runs_left: Option<u32>,
    }

    impl<'l> PeriodicTask<u64> for Recorder<'l> {
        fn run(&mut self, now: &mut u64) -> bool {
            self.log.borrow_mut().push((self.name, *now));
            match self.runs_left.as_mut() {
                Some(n) => {
                    *n -= 1;
                    *n > 0
                }
                None => true,
            }
        }
    }

    fn recorder<'l>(name: &'static str, log: &'l Log) -> Recorder<'l> {
        Recorder {
            name,
            log,
            runs_left: None,
        }
    }

    fn drive<const N: usize>(s: &mut Scheduler<'_, u64, N>, until_ms: u64, step_ms: u64) {
        let mut now = step_ms;
        while now <= until_ms {
            let mut shared = now;
            s.tick(now, &mut shared);
            now += step_ms;
        }
    }

    #[test]
    fn runs_in_registration_order() {
        let log = Log::default();
        let (mut a, mut b, mut c) = (recorder("a", &log), recorder("b", &log), recorder("c", &log));

        let mut s: Scheduler<u64, 4> = Scheduler::new();
        s.register_periodic(500, &mut c).unwrap();
        s.register_periodic(500, &mut a).unwrap();
        s.register_periodic(500, &mut b).unwrap();

        drive(&mut s, 1000, 500);

        let names: Vec<_> = log.borrow().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["c", "a", "b", "c", "a", "b"]);
    }

    #[test]
    fn independent_periods() {
        let log = Log::default();
        let (mut fast, mut slow) = (recorder("fast", &log), recorder("slow", &log));

        let mut s: Scheduler<u64, 2> = Scheduler::new();
        s.register_periodic(100, &mut fast).unwrap();
        s.register_periodic(250, &mut slow).unwrap();

        drive(&mut s, 1000, 50);

        let slow_at: Vec<_> = log
            .borrow()
            .iter()
            .filter(|(n, _)| *n == "slow")
            .map(|(_, t)| *t)
            .collect();
        assert_eq!(slow_at, [250, 500, 750, 1000]);
        assert_eq!(log.borrow().iter().filter(|(n, _)| *n == "fast").count(), 10);
    }

    #[test]
    fn not_due_before_first_period() {
        let log = Log::default();
        let mut a = recorder("a", &log);

        let mut s: Scheduler<u64, 1> = Scheduler::new();
        s.register_periodic(500, &mut a).unwrap();

        let mut shared = 0;
        assert_eq!(s.tick(499, &mut shared), 0);
        assert_eq!(s.tick(500, &mut shared), 1);
        assert_eq!(s.tick(500, &mut shared), 0);
    }

    #[test]
    fn skips_missed_periods() {
        let log = Log::default();
        let mut a = recorder("a", &log);

        let mut s: Scheduler<u64, 1> = Scheduler::new();
        s.register_periodic(100, &mut a).unwrap();

        let mut shared = 0;
        assert_eq!(s.tick(1000, &mut shared), 1);
        assert_eq!(s.tick(1050, &mut shared), 0);
        assert_eq!(s.tick(1100, &mut shared), 1);
    }

    #[test]
    fn stopped_task_is_never_called_again() {
        let log = Log::default();
        let mut once = Recorder {
            name: "once",
            log: &log,
            runs_left: Some(2),
        };
        let mut other = recorder("other", &log);

        let mut s: Scheduler<u64, 2> = Scheduler::new();
        let h = s.register_periodic(10, &mut once).unwrap();
        let h2 = s.register_periodic(10, &mut other).unwrap();

        drive(&mut s, 100, 10);

        assert!(!s.is_active(h));
        assert!(s.is_active(h2));
        assert_eq!(log.borrow().iter().filter(|(n, _)| *n == "once").count(), 2);
        assert_eq!(log.borrow().iter().filter(|(n, _)| *n == "other").count(), 10);
    }

    #[test]
    fn registration_errors() {
        let log = Log::default();
        let (mut a, mut b, mut c) = (recorder("a", &log), recorder("b", &log), recorder("c", &log));
        let mut z = recorder("z", &log);

        let mut s: Scheduler<u64, 2> = Scheduler::new();
        assert_eq!(
            s.register_periodic(0, &mut z).unwrap_err(),
            SchedulerError::ZeroInterval
        );
        assert!(s.is_empty());

        s.register_periodic(1, &mut a).unwrap();
        s.register_periodic(1, &mut b).unwrap();
        assert_eq!(
            s.register_periodic(1, &mut c).unwrap_err(),
            SchedulerError::Full
        );
        assert_eq!(s.len(), 2);
    }
}
