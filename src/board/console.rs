use heapless::spsc::Consumer;
use stm32f1xx_hal::usb::UsbBusType;
use usbd_serial::SerialPort;

use tempcycle::{config::CONSOLE_QUEUE_LEN, tasks::QueuedConsole};

/// Display task side of the USB CDC console.
///
/// Lines are queued here and pushed to the port by [`flush`] from the
/// context that owns the USB stack.
pub type UsbConsole = QueuedConsole<'static, CONSOLE_QUEUE_LEN>;

/// Move queued bytes into the CDC write buffer until it is full.
pub fn flush(
    rx: &mut Consumer<'static, u8, CONSOLE_QUEUE_LEN>,
    serial: &mut SerialPort<'static, UsbBusType>,
) {
    while let Some(&b) = rx.peek() {
        match serial.write(&[b]) {
            Ok(1) => {
                rx.dequeue();
            }
            _ => break,
        }
    }
}
