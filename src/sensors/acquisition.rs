use crate::support::Clock;

use super::{BlockTransfer, Calibration, CompletionSignal, SampleSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    Idle,
    StartingBlock,
    AwaitingTransfer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleStatus {
    InProgress,
    Completed,
}

/// Result of the last finished window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AveragedReading {
    pub value: f32,
    pub cycle_complete: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Accumulation {
    // f64: thousands of f32 samples per window
    running_sum: f64,
    samples_accumulated: u32,
    blocks: u32,
    window_start_us: u64,
}

/// Block-streamed averaging of one ADC channel.
///
/// Each call of [`acquire_one_tick`](Self::acquire_one_tick) makes at most one
/// state transition and never waits for the hardware:
///
/// ```text
/// Idle --> StartingBlock --> AwaitingTransfer --+--> Idle           (window elapsed)
///                ^                              |
///                +------------------------------+   (more blocks)
/// ```
///
/// A transfer that never completes leaves the machine in `AwaitingTransfer`.
pub struct Acquisition<'a, S, D, C, const N: usize> {
    source: S,
    dma: D,
    clock: C,
    done: &'a CompletionSignal,
    buffer: &'a mut [u16; N],

    calibration: Calibration,
    channel: u8,
    window_us: u64,

    state: AcquisitionState,
    acc: Accumulation,
    reading: AveragedReading,
}

impl<'a, S, D, C, const N: usize> Acquisition<'a, S, D, C, N>
where
    S: SampleSource,
    D: BlockTransfer,
    C: Clock,
{
    pub fn new(
        source: S,
        dma: D,
        clock: C,
        done: &'a CompletionSignal,
        buffer: &'a mut [u16; N],
        calibration: Calibration,
        channel: u8,
    ) -> Self {
        Self {
            source,
            dma,
            clock,
            done,
            buffer,
            calibration,
            channel,
            window_us: crate::config::SAMPLING_WINDOW_US,
            state: AcquisitionState::Idle,
            acc: Accumulation::default(),
            reading: AveragedReading::default(),
        }
    }

    pub fn with_window_us(mut self, window_us: u64) -> Self {
        self.window_us = window_us;
        self
    }

    pub fn acquire_one_tick(&mut self) -> CycleStatus {
        match self.state {
            AcquisitionState::Idle => {
                self.acc = Accumulation {
                    window_start_us: self.clock.now_us(),
                    ..Accumulation::default()
                };
                trace!("Acquisition: window started");
                self.state = AcquisitionState::StartingBlock;
            }
            AcquisitionState::StartingBlock => {
                self.done.clear();
                self.start_block();
                self.state = AcquisitionState::AwaitingTransfer;
            }
            AcquisitionState::AwaitingTransfer => {
                if self.done.is_raised() {
                    self.source.stop();
                    self.accumulate_block();

                    let elapsed = self
                        .clock
                        .elapsed_us(self.acc.window_start_us, self.clock.now_us());
                    if elapsed >= self.window_us {
                        self.finish_cycle();
                        self.state = AcquisitionState::Idle;
                        return CycleStatus::Completed;
                    } else {
                        self.state = AcquisitionState::StartingBlock;
                    }
                }
            }
        }
        CycleStatus::InProgress
    }

    fn start_block(&mut self) {
        self.source.select_channel(self.channel);
        self.source.drain();
        self.source.start_continuous();

        let src = self.source.data_register();
        self.dma.start_transfer(&mut self.buffer[..], src);

        trace!("Acquisition: block {} started", self.acc.blocks);
    }

    fn accumulate_block(&mut self) {
        let cal = &self.calibration;
        self.acc.running_sum += self
            .buffer
            .iter()
            .fold(0f64, |acc, raw| acc + cal.convert(*raw) as f64);
        self.acc.samples_accumulated += N as u32;
        self.acc.blocks += 1;

        trace!(
            "Acquisition: block {} done, {} samples",
            self.acc.blocks,
            self.acc.samples_accumulated
        );
    }

    fn finish_cycle(&mut self) {
        self.reading = AveragedReading {
            value: (self.acc.running_sum / self.acc.samples_accumulated as f64) as f32,
            cycle_complete: true,
        };

        debug!(
            "Acquisition: average {} over {} blocks ({} samples)",
            self.reading.value,
            self.acc.blocks,
            self.acc.samples_accumulated
        );
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// Last finished window, `cycle_complete == false` before the first one.
    pub fn reading(&self) -> AveragedReading {
        self.reading
    }

    /// Samples summed so far in the current (or just finished) window.
    pub fn samples_accumulated(&self) -> u32 {
        self.acc.samples_accumulated
    }

    /// Blocks transferred so far in the current (or just finished) window.
    pub fn blocks_in_cycle(&self) -> u32 {
        self.acc.blocks
    }

    pub fn window_us(&self) -> u64 {
        self.window_us
    }
}
