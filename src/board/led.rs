use embedded_hal::digital::v2::OutputPin;

use tempcycle::tasks::{Indicator, Trend};

/// Trend LED plus alarm output.
///
/// The blue pill LED on PC13 is wired to VCC: low = on.
pub struct BoardIndicator<L, A> {
    led: L,
    alarm: A,
    blink: bool,
}

impl<L, A> BoardIndicator<L, A>
where
    L: OutputPin,
    A: OutputPin,
{
    pub fn new(led: L, alarm: A) -> Self {
        Self {
            led,
            alarm,
            blink: false,
        }
    }

    fn led(&mut self, on: bool) {
        let _ = if on {
            self.led.set_low()
        } else {
            self.led.set_high()
        };
    }
}

impl<L, A> Indicator for BoardIndicator<L, A>
where
    L: OutputPin,
    A: OutputPin,
{
    /// Rising: steady on, falling: off, stable: blinks at the task rate.
    fn show_trend(&mut self, trend: Trend) {
        match trend {
            Trend::Rising => self.led(true),
            Trend::Falling => self.led(false),
            Trend::Stable => {
                self.blink = !self.blink;
                self.led(self.blink);
            }
        }
    }

    fn set_alarm(&mut self, on: bool) {
        let _ = if on {
            self.alarm.set_high()
        } else {
            self.alarm.set_low()
        };
    }
}
