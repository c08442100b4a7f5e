#![no_std]
#![no_main]

mod board;

use core::cell::RefCell;

use defmt_rtt as _;
use panic_abort as _;

use stm32f1xx_hal::gpio::{Output, PushPull, PB12, PC13};

use tempcycle::{
    config::{BLOCK_SAMPLES, MAX_TASKS},
    scheduler::{Scheduler, SharedState},
    sensors::CompletionSignal,
    tasks::{AcquisitionTask, AlarmTask, DeltaTrend, DisplayTask, Downstream, IndicatorTask, TrendTask},
};

use board::{AdcDma, BoardIndicator, MonoClock, TemperatureAdc, UsbConsole};

//---------------------------------------------------------------

/// Raised by the DMA1 channel 1 interrupt, polled by the acquisition task.
static DMA_DONE: CompletionSignal = CompletionSignal::new();

type Board = BoardIndicator<PC13<Output<PushPull>>, PB12<Output<PushPull>>>;
type SharedBoard = &'static RefCell<Board>;

type TemperatureTask = AcquisitionTask<'static, TemperatureAdc, AdcDma, MonoClock, BLOCK_SAMPLES>;
type TrendJob = Downstream<TrendTask<DeltaTrend>, MonoClock>;
type DisplayJob = Downstream<DisplayTask<UsbConsole>, MonoClock>;
type IndicatorJob = Downstream<IndicatorTask<SharedBoard>, MonoClock>;
type AlarmJob = Downstream<AlarmTask<SharedBoard>, MonoClock>;

/// Scheduler plus the state its tasks share.
pub struct Executor {
    scheduler: Scheduler<'static, SharedState, MAX_TASKS>,
    shared: SharedState,
}

// Owned and run by the `tick` task only.
unsafe impl Send for Executor {}

defmt::timestamp!("{=u64:ms}", app::monotonics::now().ticks());

//---------------------------------------------------------------

#[rtic::app(device = stm32f1xx_hal::pac, dispatchers = [EXTI0])]
mod app {
    use super::*;

    use core::num::NonZeroU32;

    use heapless::spsc::{Consumer, Queue};
    use stm32f1xx_hal::{
        gpio::PinState,
        prelude::*,
        usb::{Peripheral, UsbBus, UsbBusType},
    };
    use systick_monotonic::{ExtU64, Systick};
    use usb_device::{bus::UsbBusAllocator, prelude::*};
    use usbd_serial::SerialPort;

    use tempcycle::{
        config::{
            ADC_FREQ, BASE_PERIOD_MS, CONSOLE_QUEUE_LEN, DOWNSTREAM_DIVISOR,
            LOW_TEMPERATURE_ALARM_C, PCLK1_FREQ, SYSCLK_FREQ, SYSTICK_HZ,
            TEMPERATURE_ADC_CHANNEL, TREND_DEAD_BAND_C, USB_PID, USB_VID, XTAL_FREQ,
        },
        sensors::{Acquisition, Calibration},
    };

    use crate::board::console;

    #[monotonic(binds = SysTick, default = true)]
    type Tonic = Systick<SYSTICK_HZ>;

    #[shared]
    struct Shared {
        usb_dev: UsbDevice<'static, UsbBusType>,
        serial: SerialPort<'static, UsbBusType>,
    }

    #[local]
    struct Local {
        executor: Executor,
        console_rx: Consumer<'static, u8, CONSOLE_QUEUE_LEN>,
    }

    #[init(local = [
        usb_bus: Option<UsbBusAllocator<UsbBusType>> = None,
        console_q: Queue<u8, CONSOLE_QUEUE_LEN> = Queue::new(),
        samples: [u16; BLOCK_SAMPLES] = [0; BLOCK_SAMPLES],
        board: Option<RefCell<Board>> = None,
        temperature: Option<TemperatureTask> = None,
        trend: Option<TrendJob> = None,
        display: Option<DisplayJob> = None,
        indicator: Option<IndicatorJob> = None,
        alarm: Option<AlarmJob> = None,
    ])]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        defmt::trace!("++ Start up! ++");

        let mut flash = cx.device.FLASH.constrain();
        let rcc = cx.device.RCC.constrain();

        let clocks = rcc
            .cfgr
            .use_hse(XTAL_FREQ.Hz())
            .sysclk(SYSCLK_FREQ.Hz())
            .pclk1(PCLK1_FREQ.Hz())
            .adcclk(ADC_FREQ.Hz())
            .freeze(&mut flash.acr);
        defmt::info!(
            "Clocks: sysclk={} Hz, adc={} Hz",
            clocks.sysclk().raw(),
            clocks.adcclk().raw()
        );

        let mono = Systick::new(cx.core.SYST, clocks.sysclk().raw());

        let mut gpioa = cx.device.GPIOA.split();
        let mut gpiob = cx.device.GPIOB.split();
        let mut gpioc = cx.device.GPIOC.split();

        // USB: pull D+ low for a moment so the host re-enumerates after reset
        defmt::info!("Creating usb low-level driver: PA11, PA12");
        let mut usb_dp = gpioa.pa12.into_push_pull_output(&mut gpioa.crh);
        usb_dp.set_low();
        cortex_m::asm::delay(clocks.sysclk().raw() / 100);

        *cx.local.usb_bus = Some(UsbBus::new(Peripheral {
            usb: cx.device.USB,
            pin_dm: gpioa.pa11,
            pin_dp: usb_dp.into_floating_input(&mut gpioa.crh),
        }));
        let usb_bus = cx.local.usb_bus.as_ref().unwrap();

        defmt::info!("Allocating ACM device");
        let serial = SerialPort::new(usb_bus);

        let vid_pid = UsbVidPid(USB_VID, USB_PID);
        defmt::info!("Building usb device: vid={} pid={}", &vid_pid.0, &vid_pid.1);
        let usb_dev = UsbDeviceBuilder::new(usb_bus, vid_pid)
            .manufacturer("Fake company")
            .product("Temperature monitor")
            .serial_number("TEST")
            .device_class(usbd_serial::USB_CLASS_CDC)
            .build();

        let (console_tx, console_rx) = cx.local.console_q.split();

        // indicator: on-board LED + alarm output
        let led = gpioc
            .pc13
            .into_push_pull_output_with_state(&mut gpioc.crh, PinState::High);
        let alarm_pin = gpiob
            .pb12
            .into_push_pull_output_with_state(&mut gpiob.crh, PinState::Low);
        let board: SharedBoard = cx
            .local
            .board
            .insert(RefCell::new(BoardIndicator::new(led, alarm_pin)));

        // acquisition: ADC1 temperature channel -> DMA1 channel 1
        let dma = cx.device.DMA1.split();
        let machine = Acquisition::new(
            TemperatureAdc::new(cx.device.ADC1),
            AdcDma::new(dma.1),
            MonoClock,
            &DMA_DONE,
            cx.local.samples,
            Calibration::STM32F1,
            TEMPERATURE_ADC_CHANNEL,
        );
        defmt::info!(
            "Acquisition: {} samples per block, {} us window",
            BLOCK_SAMPLES,
            machine.window_us()
        );

        let every = NonZeroU32::new(DOWNSTREAM_DIVISOR).unwrap();

        let temperature = cx
            .local
            .temperature
            .insert(AcquisitionTask::new(machine));
        let trend = cx.local.trend.insert(Downstream::new(
            TrendTask::new(DeltaTrend::new(TREND_DEAD_BAND_C)),
            every,
            MonoClock,
        ));
        let display = cx.local.display.insert(Downstream::new(
            DisplayTask::new(UsbConsole::new(console_tx)),
            every,
            MonoClock,
        ));
        let indicator = cx.local.indicator.insert(Downstream::new(
            IndicatorTask::new(board),
            every,
            MonoClock,
        ));
        let alarm = cx.local.alarm.insert(Downstream::new(
            AlarmTask::new(board, LOW_TEMPERATURE_ALARM_C),
            every,
            MonoClock,
        ));

        // acquisition first: downstream tasks see a fresh reading on the same tick
        let mut scheduler = Scheduler::new();
        scheduler.register_periodic(BASE_PERIOD_MS, temperature).unwrap();
        scheduler.register_periodic(BASE_PERIOD_MS, trend).unwrap();
        scheduler.register_periodic(BASE_PERIOD_MS, display).unwrap();
        scheduler.register_periodic(BASE_PERIOD_MS, indicator).unwrap();
        scheduler.register_periodic(BASE_PERIOD_MS, alarm).unwrap();
        defmt::info!("{} tasks, period {} ms", scheduler.len(), BASE_PERIOD_MS);

        tick::spawn_after(ExtU64::millis(BASE_PERIOD_MS as u64)).unwrap();

        (
            Shared { usb_dev, serial },
            Local {
                executor: Executor {
                    scheduler,
                    shared: SharedState::new(),
                },
                console_rx,
            },
            init::Monotonics(mono),
        )
    }

    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }

    /// Cooperative scheduler timer event.
    #[task(local = [executor, console_rx], shared = [serial], priority = 1)]
    fn tick(mut cx: tick::Context) {
        let executor = cx.local.executor;
        executor
            .scheduler
            .tick(monotonics::now().ticks(), &mut executor.shared);

        let rx = cx.local.console_rx;
        cx.shared.serial.lock(|serial| console::flush(rx, serial));

        tick::spawn_after(ExtU64::millis(BASE_PERIOD_MS as u64)).unwrap();
    }

    #[task(binds = DMA1_CHANNEL1, priority = 3)]
    fn dma1_channel1(_: dma1_channel1::Context) {
        crate::board::dma::clear_transfer_complete();
        DMA_DONE.raise();
    }

    #[task(binds = USB_HP_CAN_TX, shared = [usb_dev, serial], priority = 2)]
    fn usb_tx(cx: usb_tx::Context) {
        (cx.shared.usb_dev, cx.shared.serial).lock(usb_poll);
    }

    #[task(binds = USB_LP_CAN_RX0, shared = [usb_dev, serial], priority = 2)]
    fn usb_rx0(cx: usb_rx0::Context) {
        (cx.shared.usb_dev, cx.shared.serial).lock(usb_poll);
    }

    fn usb_poll(
        usb_dev: &mut UsbDevice<'static, UsbBusType>,
        serial: &mut SerialPort<'static, UsbBusType>,
    ) {
        if !usb_dev.poll(&mut [serial]) {
            return;
        }

        // output only console, discard input
        let mut buf = [0u8; 64];
        if let Ok(count) = serial.read(&mut buf) {
            defmt::trace!("Serial> {} bytes ignored", count);
        }
    }
}
