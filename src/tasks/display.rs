use core::fmt::{self, Write};

use crate::{config::CONSOLE_LINE_LEN, scheduler::SharedState, support::write_fixed};

use super::{Payload, Trend};

/// Output device showing the current average and trend.
pub trait Display {
    fn show(&mut self, average: f32, trend: Trend);
}

/// `"Temperature: 23.45 C | trend: rising\r\n"`
pub fn write_line<W: Write>(w: &mut W, average: f32, trend: Trend) -> fmt::Result {
    w.write_str("Temperature: ")?;
    write_fixed(w, average, 2)?;
    write!(w, " C | trend: {}\r\n", trend.as_str())
}

/// [`write_line`] into a console-sized buffer; an overlong line is cut.
pub fn format_line(average: f32, trend: Trend) -> heapless::String<CONSOLE_LINE_LEN> {
    let mut line = heapless::String::new();
    if write_line(&mut line, average, trend).is_err() {
        warn!("Display: line truncated to {} bytes", CONSOLE_LINE_LEN);
    }
    line
}

pub struct DisplayTask<D> {
    display: D,
}

impl<D: Display> DisplayTask<D> {
    pub fn new(display: D) -> Self {
        Self { display }
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

impl<D: Display> Payload for DisplayTask<D> {
    fn name(&self) -> &'static str {
        "display"
    }

    fn execute(&mut self, shared: &mut SharedState) {
        self.display.show(shared.latest_average(), shared.trend());
    }
}

/// [`Display`] that queues text lines for another context to send.
///
/// Bytes that do not fit are dropped and counted.
pub struct QueuedConsole<'q, const Q: usize> {
    tx: heapless::spsc::Producer<'q, u8, Q>,
    dropped: u32,
}

impl<'q, const Q: usize> QueuedConsole<'q, Q> {
    pub fn new(tx: heapless::spsc::Producer<'q, u8, Q>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Queue `bytes`, returns how many of them were dropped.
    pub fn push(&mut self, bytes: &[u8]) -> u32 {
        let lost = bytes
            .iter()
            .filter(|b| self.tx.enqueue(**b).is_err())
            .count() as u32;
        self.dropped = self.dropped.wrapping_add(lost);
        lost
    }

    /// Bytes dropped since start-up.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<'q, const Q: usize> Display for QueuedConsole<'q, Q> {
    fn show(&mut self, average: f32, trend: Trend) {
        let line = format_line(average, trend);
        if self.push(line.as_bytes()) > 0 {
            // nobody reads the port
            trace!("Console: {} bytes dropped so far", self.dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_layout() {
        assert_eq!(
            format_line(23.456, Trend::Rising).as_str(),
            "Temperature: 23.46 C | trend: rising\r\n"
        );
        assert_eq!(
            format_line(-5.0, Trend::Stable).as_str(),
            "Temperature: -5.00 C | trend: stable\r\n"
        );
    }

    #[test]
    fn short_buffer_reports_overflow() {
        let mut tiny: heapless::String<16> = heapless::String::new();
        assert!(write_line(&mut tiny, 23.456, Trend::Rising).is_err());
        assert!(tiny.starts_with("Temperature: "));

        let mut exact: heapless::String<CONSOLE_LINE_LEN> = heapless::String::new();
        assert!(write_line(&mut exact, -40.0, Trend::Falling).is_ok());
    }

    #[test]
    fn task_shows_latest() {
        #[derive(Default)]
        struct Last(Option<(f32, Trend)>);
        impl Display for Last {
            fn show(&mut self, average: f32, trend: Trend) {
                self.0 = Some((average, trend));
            }
        }

        let mut task = DisplayTask::new(Last::default());
        let mut shared = SharedState::new();
        shared.publish(30.5);
        shared.set_trend(Trend::Falling);

        task.execute(&mut shared);
        assert_eq!(task.display().0, Some((30.5, Trend::Falling)));
    }

    #[test]
    fn console_counts_drops_per_line() {
        let mut q: heapless::spsc::Queue<u8, 64> = heapless::spsc::Queue::new();
        let (tx, mut rx) = q.split();
        let mut console = QueuedConsole::new(tx);

        let line = format_line(21.0, Trend::Stable);
        assert_eq!(console.push(line.as_bytes()), 0);
        let lost = console.push(line.as_bytes());
        assert!(lost > 0);
        assert_eq!(console.dropped(), lost);

        // once the reader catches up nothing new is lost
        while rx.dequeue().is_some() {}
        assert_eq!(console.push(line.as_bytes()), 0);
        assert_eq!(console.dropped(), lost);

        console.show(21.0, Trend::Stable);
        assert_eq!(console.dropped(), lost * 2);
    }
}
