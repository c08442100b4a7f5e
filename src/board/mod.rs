//! STM32F103 implementations of the hardware contracts used by the core.

pub mod adc;
pub mod clock;
pub mod console;
pub mod dma;
pub mod led;

pub use adc::TemperatureAdc;
pub use clock::MonoClock;
pub use console::UsbConsole;
pub use dma::AdcDma;
pub use led::BoardIndicator;
