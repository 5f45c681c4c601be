// LumiTouch — Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging and take the peripherals.
//   2. Configure the radio, debug and sensor-enable outputs (all idle LOW).
//   3. Spawn the control task (touch polling + gesture detection + radio).
//
// The radio bit clock runs as a periodic esp_timer callback owned by the
// radio driver; everything else happens in the control task.

mod config;
mod drivers;
mod encoding;
mod input;
mod message;
mod tasks;

use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyOutputPin, Output, OutputPin, PinDriver};
use esp_idf_hal::prelude::*;
use esp_idf_svc::timer::EspTaskTimerService;

use crate::config::*;

// ---------------------------------------------------------------------------
// Utility: microseconds since boot (monotonic, 64-bit)
// ---------------------------------------------------------------------------
pub fn now_us() -> u64 {
    unsafe { esp_idf_sys::esp_timer_get_time() as u64 }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------
fn main() -> anyhow::Result<()> {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("LumiTouch firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // All control outputs start LOW: radio off, sensor unpowered.
    let mut radio_enable: PinDriver<'static, AnyOutputPin, Output> =
        PinDriver::output(peripherals.pins.gpio3.downgrade_output())?;
    radio_enable.set_low()?;

    let mut radio_data: PinDriver<'static, AnyOutputPin, Output> =
        PinDriver::output(peripherals.pins.gpio4.downgrade_output())?;
    radio_data.set_low()?;

    let mut sensor_enable: PinDriver<'static, AnyOutputPin, Output> =
        PinDriver::output(peripherals.pins.gpio5.downgrade_output())?;
    sensor_enable.set_low()?;

    let mut debug: PinDriver<'static, AnyOutputPin, Output> =
        PinDriver::output(peripherals.pins.gpio10.downgrade_output())?;
    debug.set_low()?;

    // ---- Timer service (bit clock source) ---------------------------------
    let timer_service = EspTaskTimerService::new()?;

    // ---- Spawn the control task -------------------------------------------
    thread::Builder::new()
        .name("control".into())
        .stack_size(STACK_CONTROL)
        .spawn(move || {
            tasks::control::control_task(
                radio_enable,
                radio_data,
                debug,
                sensor_enable,
                timer_service,
            );
        })?;

    log::info!(
        "Boot complete — house {} room {} channel {}",
        HOUSE_ADDRESS,
        ROOM_ADDRESS,
        CHANNEL_ADDRESS
    );

    // Main thread has nothing left to do — park it forever.
    // (All work happens in the control task and the timer callback.)
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
