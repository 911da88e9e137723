// Blinking LED
// 1. Run the app
// cargo r -r
#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{Level, Output, OutputConfig},
    main,
};
use iot_sketches::led::{self, BlinkCycle};
use log::{error, info};

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // On-board LED on GPIO2, off until the first half period ends.
    let mut led = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());
    let delay = Delay::new();

    for step in BlinkCycle::default() {
        if step.cycle_start {
            info!("Hello world!");
        }
        delay.delay_millis(u32::try_from(step.delay_ms).unwrap_or(u32::MAX));
        if let Err(e) = led::apply(&mut led, step.state) {
            error!("Failed to drive LED: {:?}", e);
        }
    }

    unreachable!("blink cycle never ends")
}
