use core::sync::atomic::{compiler_fence, Ordering};

use stm32f1xx_hal::device::{ADC1, RCC};

use tempcycle::sensors::SampleSource;

/// ADC1 in continuous DMA mode, register level.
///
/// The hal ADC driver only offers one-shot and its own DMA wrapper, which
/// owns the buffer. The acquisition machine owns the buffer, so ADC1 is
/// driven directly here.
pub struct TemperatureAdc {
    adc: ADC1,
}

impl TemperatureAdc {
    /// Power up ADC1, enable the internal sensor and run the self-calibration.
    ///
    /// ADC clock prescaler is expected to be set by the RCC configuration.
    pub fn new(adc: ADC1) -> Self {
        let rcc = unsafe { &*RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());
        rcc.apb2rstr.modify(|_, w| w.adc1rst().set_bit());
        compiler_fence(Ordering::SeqCst);
        rcc.apb2rstr.modify(|_, w| w.adc1rst().clear_bit());

        // single conversion in the regular sequence
        adc.sqr1.modify(|_, w| unsafe { w.l().bits(0) });

        // temperature sensor needs >= 17.1 us sample time
        adc.smpr1.modify(|_, w| unsafe { w.smp16().bits(0b111) }); // 239.5 cycles

        adc.cr2.modify(|_, w| unsafe {
            w.tsvrefe()
                .set_bit() // internal sensor on
                .align()
                .clear_bit() // right aligned
                .extsel()
                .bits(0b111) // SWSTART
                .exttrig()
                .set_bit()
                .adon()
                .set_bit()
        });

        // t_stab
        cortex_m::asm::delay(tempcycle::config::SYSCLK_FREQ / 1_000_000 * 2);

        adc.cr2.modify(|_, w| w.rstcal().set_bit());
        while adc.cr2.read().rstcal().bit_is_set() {}
        adc.cr2.modify(|_, w| w.cal().set_bit());
        while adc.cr2.read().cal().bit_is_set() {}

        defmt::info!("ADC1 calibrated, temperature sensor on");

        Self { adc }
    }
}

impl SampleSource for TemperatureAdc {
    fn select_channel(&mut self, channel: u8) {
        self.adc.sqr3.write(|w| unsafe { w.sq1().bits(channel) });
    }

    fn drain(&mut self) {
        while self.adc.sr.read().eoc().bit_is_set() {
            let _ = self.adc.dr.read(); // clears EOC
        }
        self.adc.sr.modify(|_, w| w.strt().clear_bit());
    }

    fn start_continuous(&mut self) {
        self.adc
            .cr2
            .modify(|_, w| w.cont().set_bit().dma().set_bit());
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
    }

    fn stop(&mut self) {
        self.adc
            .cr2
            .modify(|_, w| w.cont().clear_bit().dma().clear_bit());
    }

    fn data_register(&self) -> usize {
        &self.adc.dr as *const _ as usize
    }
}
