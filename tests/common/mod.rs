//! Simulated hardware for driving the acquisition core on the host.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use tempcycle::{
    sensors::{BlockTransfer, CompletionSignal, SampleSource},
    support::Clock,
};

pub const ADC_DR: usize = 0x4001_244C;

/// Manually advanced microsecond clock.
#[derive(Default)]
pub struct SimClock {
    now: Cell<u64>,
}

impl SimClock {
    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }

    pub fn set(&self, us: u64) {
        self.now.set(us);
    }
}

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcCall {
    Select(u8),
    Drain,
    Start,
    Stop,
}

/// Records how the state machine drives the converter.
pub struct SimAdc<'a> {
    pub calls: &'a RefCell<Vec<AdcCall>>,
}

impl<'a> SampleSource for SimAdc<'a> {
    fn select_channel(&mut self, channel: u8) {
        self.calls.borrow_mut().push(AdcCall::Select(channel));
    }

    fn drain(&mut self) {
        self.calls.borrow_mut().push(AdcCall::Drain);
    }

    fn start_continuous(&mut self) {
        self.calls.borrow_mut().push(AdcCall::Start);
    }

    fn stop(&mut self) {
        self.calls.borrow_mut().push(AdcCall::Stop);
    }

    fn data_register(&self) -> usize {
        ADC_DR
    }
}

/// Transfer engine that completes instantly: fills the block with `value`,
/// lets `block_duration_us` pass and raises the completion signal, the way
/// the DMA interrupt would.
pub struct SimDma<'a> {
    pub clock: &'a SimClock,
    pub done: &'a CompletionSignal,
    pub value: u16,
    pub block_duration_us: u64,
    pub blocks: &'a Cell<u32>,
    pub hold: bool,
}

impl<'a> SimDma<'a> {
    pub fn new(
        clock: &'a SimClock,
        done: &'a CompletionSignal,
        blocks: &'a Cell<u32>,
        value: u16,
        block_duration_us: u64,
    ) -> Self {
        Self {
            clock,
            done,
            value,
            block_duration_us,
            blocks,
            hold: false,
        }
    }
}

impl<'a> BlockTransfer for SimDma<'a> {
    fn start_transfer(&mut self, destination: &mut [u16], source_register: usize) {
        assert_eq!(source_register, ADC_DR);
        assert!(
            !self.done.is_raised(),
            "transfer started with a stale completion flag"
        );

        destination.iter_mut().for_each(|s| *s = self.value);
        self.blocks.set(self.blocks.get() + 1);
        self.clock.advance(self.block_duration_us);
        if !self.hold {
            self.done.raise();
        }
    }
}
