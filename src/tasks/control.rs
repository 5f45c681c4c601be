// LumiTouch — Control Task
//
// The main loop: polls the touch sensor, debounces the signal, runs the
// gesture state machine and transmits the resulting commands. Radio
// transmission drains in the background via the bit-clock timer, but the
// repeat pacing inside `send()` keeps this loop blocked for the duration
// of a command burst — gestures cannot pile up mid-transmission.

use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_svc::timer::EspTaskTimerService;

use crate::config::*;
use crate::drivers::radio::RadioTx;
use crate::drivers::touch::TouchSensor;
use crate::input::{Debouncer, GestureAction, GestureDetector};
use crate::message::CommandMsg;

pub fn control_task(
    radio_enable: PinDriver<'static, AnyOutputPin, Output>,
    radio_data: PinDriver<'static, AnyOutputPin, Output>,
    debug: PinDriver<'static, AnyOutputPin, Output>,
    sensor_enable: PinDriver<'static, AnyOutputPin, Output>,
    timer_service: EspTaskTimerService,
) {
    log::info!("Control task started");

    let mut radio = match RadioTx::new(radio_enable, radio_data, debug, &timer_service) {
        Ok(radio) => radio,
        Err(e) => {
            log::error!("Radio init failed: {}", e);
            return;
        }
    };

    let mut touch = match TouchSensor::new(sensor_enable) {
        Ok(touch) => touch,
        Err(e) => {
            log::error!("Touch sensor init failed: {}", e);
            return;
        }
    };
    touch.power_on();

    let mut debouncer = Debouncer::new(false);
    let mut detector = GestureDetector::new();
    let poll_interval = Duration::from_millis(TOUCH_POLL_INTERVAL_MS);

    loop {
        let level = debouncer.sample(touch.is_touched());

        match detector.update(level, crate::now_us()) {
            Some(GestureAction::Send(command)) => {
                log::info!("Gesture -> {:?}", command);
                let msg = CommandMsg {
                    house: HOUSE_ADDRESS,
                    room: ROOM_ADDRESS,
                    channel: CHANNEL_ADDRESS,
                    command,
                };
                if let Err(e) = radio.send(&msg) {
                    log::error!("Radio send failed: {}", e);
                }
            }
            Some(GestureAction::Recalibrate) => {
                log::warn!(
                    "Touch held ≥ {} s — power-cycling the sensor",
                    STUCK_HOLD_US / 1_000_000
                );
                touch.power_cycle();
                debouncer.force(false);
            }
            None => {}
        }

        thread::sleep(poll_interval);
    }
}
