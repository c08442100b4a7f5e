/// One-way latch: opened by the first finished acquisition cycle, never closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadinessGate {
    open: bool,
}

impl ReadinessGate {
    pub const fn new() -> Self {
        Self { open: false }
    }

    /// Returns `true` only for the call that actually opened the gate.
    pub fn open(&mut self) -> bool {
        let was_open = self.open;
        self.open = true;
        !was_open
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::ReadinessGate;

    #[test]
    fn opens_exactly_once() {
        let mut gate = ReadinessGate::new();
        assert!(!gate.is_open());

        let transitions = (0..100).filter(|_| gate.open()).count();
        assert_eq!(transitions, 1);
        assert!(gate.is_open());
    }
}
