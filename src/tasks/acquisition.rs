use crate::{
    scheduler::{PeriodicTask, SharedState},
    sensors::{Acquisition, BlockTransfer, CycleStatus, SampleSource},
    support::Clock,
};

/// Drives the acquisition state machine one transition per tick and
/// publishes every finished average.
pub struct AcquisitionTask<'a, S, D, C, const N: usize> {
    machine: Acquisition<'a, S, D, C, N>,
}

impl<'a, S, D, C, const N: usize> AcquisitionTask<'a, S, D, C, N>
where
    S: SampleSource,
    D: BlockTransfer,
    C: Clock,
{
    pub fn new(machine: Acquisition<'a, S, D, C, N>) -> Self {
        Self { machine }
    }

    /// Advance the machine; on [`CycleStatus::Completed`] latch the average
    /// into `shared` and open the readiness gate.
    pub fn acquire_one_tick(&mut self, shared: &mut SharedState) -> CycleStatus {
        let status = self.machine.acquire_one_tick();
        if status == CycleStatus::Completed {
            let average = self.machine.reading().value;
            info!("Temperature: {} C", average);

            if shared.publish(average) {
                info!(">> First reading done, downstream tasks released");
            }
        }
        status
    }

    pub fn machine(&self) -> &Acquisition<'a, S, D, C, N> {
        &self.machine
    }
}

impl<'a, S, D, C, const N: usize> PeriodicTask<SharedState> for AcquisitionTask<'a, S, D, C, N>
where
    S: SampleSource,
    D: BlockTransfer,
    C: Clock,
{
    fn run(&mut self, shared: &mut SharedState) -> bool {
        self.acquire_one_tick(shared);
        true
    }
}
