pub mod acquisition;
pub mod completion;
pub mod converter;
pub mod transfer;

pub use acquisition::{Acquisition, AcquisitionState, AveragedReading, CycleStatus};
pub use completion::CompletionSignal;
pub use converter::Calibration;
pub use transfer::{BlockTransfer, SampleSource};
