//! Cyclic-executor core of the internal temperature monitor.
//!
//! One acquisition task streams fixed-size DMA blocks of raw ADC samples,
//! averages them over a time window and publishes the result; throttled
//! downstream tasks (trend, display, indicator, alarm) consume it once the
//! first reading exists. All tasks share one cooperative scheduler tick.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod logging;

pub mod config;
pub mod scheduler;
pub mod sensors;
pub mod support;
pub mod tasks;
