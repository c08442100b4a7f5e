use stm32f1xx_hal::{device::DMA1, dma::dma1::C1};

use tempcycle::sensors::BlockTransfer;

/// DMA1 channel 1 (the ADC1 request line), peripheral -> memory, 16 bit.
pub struct AdcDma {
    dma: C1,
}

impl AdcDma {
    pub fn new(mut dma: C1) -> Self {
        dma.stop();

        unsafe {
            (*DMA1::ptr()).ch1.cr.modify(|_, w| {
                w.pl()
                    .high() // prio
                    .msize()
                    .bits16() // 16 bit
                    .psize()
                    .bits16() // 16 bit
                    .minc()
                    .enabled()
                    .pinc()
                    .disabled()
                    .circ()
                    .disabled() // one block per start
                    .dir()
                    .from_peripheral() // P -> M
                    .teie()
                    .disabled()
                    .htie()
                    .disabled() // half transfer - disable
                    .tcie()
                    .enabled() // transfer complete - enable
            });
        }

        Self { dma }
    }
}

impl BlockTransfer for AdcDma {
    fn start_transfer(&mut self, destination: &mut [u16], source_register: usize) {
        self.dma.stop();
        clear_transfer_complete();

        self.dma
            .set_peripheral_address(source_register as u32, false);
        self.dma
            .set_memory_address(destination.as_mut_ptr() as u32, true);
        self.dma.set_transfer_length(destination.len());

        self.dma.start();
    }
}

/// Acknowledge the channel 1 interrupt, called from the DMA1_CHANNEL1 handler.
pub fn clear_transfer_complete() {
    unsafe { (*DMA1::ptr()).ifcr.write(|w| w.cgif1().set_bit()) };
}
