use core::num::NonZeroU32;

/// Lets a task payload run once every `divisor` invocations.
///
/// Invariant: `counter < divisor`; the counter wraps to 0 exactly on the
/// invocation that runs the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskThrottle {
    counter: u32,
    divisor: NonZeroU32,
}

impl TaskThrottle {
    pub const fn new(divisor: NonZeroU32) -> Self {
        Self {
            counter: 0,
            divisor,
        }
    }

    /// Counts one invocation, `true` when the payload is due.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.divisor.get() {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn divisor(&self) -> u32 {
        self.divisor.get()
    }
}
