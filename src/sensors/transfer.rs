/// Hardware sampling source (the ADC side of a block transfer).
pub trait SampleSource {
    fn select_channel(&mut self, channel: u8);

    /// Throw away any conversion result still pending.
    fn drain(&mut self);

    /// Free-running conversions, each result requests a DMA transfer.
    fn start_continuous(&mut self);
    fn stop(&mut self);

    /// Address of the conversion result register, DMA source.
    fn data_register(&self) -> usize;
}

/// Peripheral -> memory block transfer engine.
pub trait BlockTransfer {
    /// Start moving `destination.len()` samples from `source_register` into
    /// `destination` and return immediately.
    ///
    /// The engine keeps writing into `destination` until it reports completion
    /// through the [`CompletionSignal`](super::CompletionSignal) it was wired
    /// to; exactly one completion is signalled per call.
    fn start_transfer(&mut self, destination: &mut [u16], source_register: usize);
}
