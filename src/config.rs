/// Raw samples moved by one DMA block transfer (working buffer capacity).
pub const BLOCK_SAMPLES: usize = 1024;

/// Target duration of one averaging window, us.
pub const SAMPLING_WINDOW_US: u64 = 500_000;

/// Cooperative scheduler base period, ms.
pub const BASE_PERIOD_MS: u32 = 500;

/// Downstream tasks execute once every `DOWNSTREAM_DIVISOR` base ticks.
pub const DOWNSTREAM_DIVISOR: u32 = 3;

/// Scheduler task table capacity.
pub const MAX_TASKS: usize = 8;

//-----------------------------------------------------------------------------

/// ADC1 channel wired to the internal temperature sensor.
pub const TEMPERATURE_ADC_CHANNEL: u8 = 16;

/// Below this average (*C) the alarm output blinks.
pub const LOW_TEMPERATURE_ALARM_C: f32 = 1.0;

/// Average changes within this band (*C) are classified as stable.
pub const TREND_DEAD_BAND_C: f32 = 0.1;

//-----------------------------------------------------------------------------

pub const XTAL_FREQ: u32 = 8_000_000;
pub const SYSCLK_FREQ: u32 = 72_000_000;
pub const PCLK1_FREQ: u32 = 36_000_000;

/// ADC clock, must stay below 14 MHz.
pub const ADC_FREQ: u32 = 12_000_000;

/// Monotonic timer rate, Hz.
pub const SYSTICK_HZ: u32 = 1000;

//-----------------------------------------------------------------------------

pub const USB_VID: u16 = 0x16c0;
pub const USB_PID: u16 = 0x27dd;

/// Longest console line, bytes.
pub const CONSOLE_LINE_LEN: usize = 64;

/// Console output queue between the display task and the USB port.
pub const CONSOLE_QUEUE_LEN: usize = 256;
