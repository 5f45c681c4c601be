// LumiTouch — Touch Sensor Driver
//
// The capacitive sense element outputs an analog level read through ADC1;
// anything at or above TOUCH_THRESHOLD_RAW counts as a touch. The sensor
// is powered through an enable pin so a stuck/miscalibrated element can be
// power-cycled to force recalibration.

use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use crate::config::*;

pub struct TouchSensor {
    enable: PinDriver<'static, AnyOutputPin, Output>,
    adc: esp_idf_sys::adc_oneshot_unit_handle_t,
    channel: esp_idf_sys::adc_channel_t,
}

impl TouchSensor {
    /// Set up ADC1 for one-shot reads of the touch sense line (GPIO2 /
    /// ADC1_CHANNEL_2, 11 dB attenuation for the 0–3.3 V range).
    pub fn new(enable: PinDriver<'static, AnyOutputPin, Output>) -> anyhow::Result<Self> {
        unsafe {
            let mut handle: esp_idf_sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();
            let unit_cfg = esp_idf_sys::adc_oneshot_unit_init_cfg_t {
                unit_id: esp_idf_sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: esp_idf_sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            let ret = esp_idf_sys::adc_oneshot_new_unit(&unit_cfg, &mut handle);
            if ret != esp_idf_sys::ESP_OK {
                anyhow::bail!("ADC unit init failed ({})", ret);
            }

            let chan_cfg = esp_idf_sys::adc_oneshot_chan_cfg_t {
                atten: esp_idf_sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: esp_idf_sys::adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            let channel = esp_idf_sys::adc_channel_t_ADC_CHANNEL_2; // GPIO2
            let ret = esp_idf_sys::adc_oneshot_config_channel(handle, channel, &chan_cfg);
            if ret != esp_idf_sys::ESP_OK {
                anyhow::bail!("ADC channel config failed ({})", ret);
            }

            Ok(Self {
                enable,
                adc: handle,
                channel,
            })
        }
    }

    /// Power up the sense element.
    pub fn power_on(&mut self) {
        let _ = self.enable.set_high();
    }

    /// Raw touch classification for this instant. Read failures count as
    /// "not touched" — the debouncer absorbs the glitch.
    pub fn is_touched(&mut self) -> bool {
        let mut raw: i32 = 0;
        let ret = unsafe { esp_idf_sys::adc_oneshot_read(self.adc, self.channel, &mut raw) };
        if ret != esp_idf_sys::ESP_OK {
            log::warn!("Touch ADC read failed ({})", ret);
            return false;
        }
        raw >= TOUCH_THRESHOLD_RAW
    }

    /// Drop sensor power for SENSOR_RESET_HOLD_MS and re-enable it, forcing
    /// the element to recalibrate against its untouched baseline.
    pub fn power_cycle(&mut self) {
        let _ = self.enable.set_low();
        thread::sleep(Duration::from_millis(SENSOR_RESET_HOLD_MS));
        let _ = self.enable.set_high();
    }
}
