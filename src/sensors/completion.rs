use core::sync::atomic::{AtomicBool, Ordering};

/// Transfer-complete flag.
///
/// Raised from the DMA interrupt, cleared by the acquisition state machine
/// right before it starts the next block. Single producer, single consumer.
pub struct CompletionSignal(AtomicBool);

impl CompletionSignal {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// can call from interrupt context
    #[inline]
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}
