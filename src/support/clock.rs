/// Monotonic wall clock with microsecond resolution.
pub trait Clock {
    fn now_us(&self) -> u64;

    /// `t1 - t0`, zero if `t1` is earlier.
    fn elapsed_us(&self, t0: u64, t1: u64) -> u64 {
        t1.saturating_sub(t0)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }

    fn elapsed_us(&self, t0: u64, t1: u64) -> u64 {
        (**self).elapsed_us(t0, t1)
    }
}
