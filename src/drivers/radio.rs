// LumiTouch — Radio Transmitter Driver
//
// Owns the radio-enable/data pins and the encoded bit buffer. A periodic
// esp_timer callback is the bit clock: one buffer bit is shifted onto the
// data line every BIT_PERIOD_US while a frame is in flight. The protocol
// is open-loop, so every command is repeated SEND_REPEATS times and no
// delivery feedback exists.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_svc::timer::{EspTaskTimerService, EspTimer};

use crate::config::*;
use crate::encoding::{self, BitBuffer};
use crate::message::CommandMsg;

// Everything the bit-clock callback touches, behind one lock. The control
// task only writes it between transmissions (guarded by `sending`).
struct TxState {
    enable: PinDriver<'static, AnyOutputPin, Output>,
    data: PinDriver<'static, AnyOutputPin, Output>,
    debug: PinDriver<'static, AnyOutputPin, Output>,
    buf: BitBuffer,
    sending: bool,
}

pub struct RadioTx {
    state: Arc<Mutex<TxState>>,
    timer: EspTimer<'static>,
}

impl RadioTx {
    pub fn new(
        enable: PinDriver<'static, AnyOutputPin, Output>,
        data: PinDriver<'static, AnyOutputPin, Output>,
        debug: PinDriver<'static, AnyOutputPin, Output>,
        timer_service: &EspTaskTimerService,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(Mutex::new(TxState {
            enable,
            data,
            debug,
            buf: BitBuffer::new(),
            sending: false,
        }));

        let tick_state = Arc::clone(&state);
        let timer = timer_service.timer(move || tick(&tick_state))?;

        Ok(Self { state, timer })
    }

    /// Encode and transmit `msg`, repeated SEND_REPEATS times with a
    /// REPEAT_GAP_MS pause between repeats. Blocks the calling task until
    /// the last repeat has fully drained; the bit clock keeps running
    /// independently throughout.
    pub fn send(&mut self, msg: &CommandMsg) -> anyhow::Result<()> {
        for _ in 0..SEND_REPEATS {
            // Never start loading the buffer while a previous frame is
            // still draining. On timeout, proceed anyway.
            self.wait_until_idle();

            {
                let mut tx = self.state.lock().unwrap();
                encoding::encode(msg, &mut tx.buf);
                let _ = tx.debug.set_high();
                let _ = tx.enable.set_high();
                tx.sending = true;
            }

            self.timer.every(Duration::from_micros(BIT_PERIOD_US))?;

            thread::sleep(Duration::from_millis(REPEAT_GAP_MS));
        }

        // A timer cannot cancel itself from its own callback, so the final
        // disarm happens here once the last frame has drained.
        self.wait_until_idle();
        self.timer.cancel()?;
        Ok(())
    }

    /// Bounded wait for the in-flight frame to finish. The timeout covers
    /// a worst-case frame many times over; if it ever fires the frame is
    /// abandoned rather than blocking the control loop forever.
    fn wait_until_idle(&self) {
        let start = crate::now_us();
        while self.state.lock().unwrap().sending {
            if crate::now_us() - start > SEND_BUSY_TIMEOUT_US {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }
}

// Bit-clock tick. Runs in the esp_timer task; must never block beyond the
// state lock, which the control task only holds briefly between frames.
fn tick(state: &Mutex<TxState>) {
    let mut tx = state.lock().unwrap();
    if !tx.sending {
        return;
    }

    match tx.buf.advance() {
        Some(bit) => {
            if bit {
                let _ = tx.data.set_high();
            } else {
                let _ = tx.data.set_low();
            }
        }
        None => {
            // Cursor reached the end on the previous tick: drop the lines
            // and go idle.
            let _ = tx.enable.set_low();
            let _ = tx.data.set_low();
            let _ = tx.debug.set_low();
            tx.sending = false;
        }
    }
}
