// LumiTouch — Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_RADIO_ENABLE: i32 = 3;  // D1 — Radio module enable (active HIGH)
pub const PIN_RADIO_DATA: i32 = 4;    // D2 — Radio data line (OOK keying)
pub const PIN_SENSOR_ENABLE: i32 = 5; // D3 — Touch sensor power enable
pub const PIN_DEBUG: i32 = 10;        // D10 — Scope trigger, high while transmitting
pub const PIN_TOUCH_ADC: u32 = 2;     // D0/A0 — Touch sense level (ADC)

// ---------------------------------------------------------------------------
// Installation Address
// ---------------------------------------------------------------------------
// Which house/room/channel this sensor controls. Programmed per install.
pub const HOUSE_ADDRESS: u8 = 5;
pub const ROOM_ADDRESS: u8 = 4;
pub const CHANNEL_ADDRESS: u8 = 2;

// ---------------------------------------------------------------------------
// Radio Timing
// ---------------------------------------------------------------------------
pub const BIT_PERIOD_US: u64 = 544;              // Bit clock period on the data line
pub const SEND_REPEATS: u32 = 4;                 // Every command is sent 4 times
pub const REPEAT_GAP_MS: u64 = 100;              // Gap between repeats (receiver debounce)
pub const SEND_BUSY_TIMEOUT_US: u64 = 1_000_000; // Max wait for an in-flight send

// ---------------------------------------------------------------------------
// Touch Sensing
// ---------------------------------------------------------------------------
pub const TOUCH_THRESHOLD_RAW: i32 = 2048;   // 12-bit ADC reading ≥ threshold = touched
pub const DEBOUNCE_SAMPLES: u32 = 50;        // Consecutive samples to accept a level
pub const TOUCH_POLL_INTERVAL_MS: u64 = 1;   // Control loop poll pacing

// ---------------------------------------------------------------------------
// Gesture Thresholds
// ---------------------------------------------------------------------------
pub const FADE_HOLD_US: u64 = 500_000;       // Hold this long → start raise/lower
pub const STUCK_HOLD_US: u64 = 10_000_000;   // Hold this long → sensor is stuck
pub const SENSOR_RESET_HOLD_MS: u64 = 500;   // Power-off time during recalibration

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_CONTROL: usize = 4096;
