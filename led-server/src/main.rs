// LED switch over HTTP
// 1. Run the app
// SSID=<ssid> PASSWORD=<password> cargo r -r
// Add `--features scan` to log the networks in range first.
// 2. Open http://<MCU_IP>/ and use the links, or
// curl http://<MCU_IP>/H ; curl http://<MCU_IP>/L
#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

mod network;
mod server;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    gpio::{Level, Output, OutputConfig},
    interrupt::software::SoftwareInterruptControl,
    ram,
    timer::timg::TimerGroup,
};
use esp_radio::Controller;

use crate::network::{connection, create_stack, credentials, net_task, wait_for_ip};
use crate::server::led_server_task;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[ram(reclaimed)] size: 64 * 1024);
    esp_alloc::heap_allocator!(size: 36 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_int = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_int.software_interrupt0);

    let led = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());
    let credentials = credentials();

    static ESP_RADIO_CTRL_CELL: static_cell::StaticCell<Controller<'static>> =
        static_cell::StaticCell::new();
    let esp_radio_ctrl = &*ESP_RADIO_CTRL_CELL
        .uninit()
        .write(esp_radio::init().expect("Failed to initialize radio controller"));

    let (controller, interfaces) =
        esp_radio::wifi::new(esp_radio_ctrl, peripherals.WIFI, Default::default())
            .expect("Failed to create WiFi controller");

    let (stack, runner) = create_stack(interfaces.sta);

    spawner.spawn(connection(controller, credentials)).ok();
    spawner.spawn(net_task(runner)).ok();

    wait_for_ip(stack).await;

    spawner.spawn(led_server_task(stack, led)).ok();

    // Keep main task alive
    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}
