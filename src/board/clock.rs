use tempcycle::support::Clock;

use crate::app::monotonics;

/// Microseconds from the RTIC SysTick monotonic (1 ms resolution).
#[derive(Clone, Copy, Default)]
pub struct MonoClock;

impl Clock for MonoClock {
    fn now_us(&self) -> u64 {
        monotonics::now().ticks() * (1_000_000 / tempcycle::config::SYSTICK_HZ as u64)
    }
}
