// LumiTouch — Touch Gesture Detection
//
// Debounced gesture state machine, polled from the control task. A short
// tap toggles the scene on/off; a hold past 500 ms starts a raise/lower
// fade that runs until release (STOP); a hold past 10 s is treated as a
// stuck sensor and requests a recalibration power-cycle instead of a
// command.

use crate::config::*;
use crate::message::Command;

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Majority-of-consistency filter over the raw touch classification: the
/// accepted level only changes after `DEBOUNCE_SAMPLES` consecutive raw
/// samples at the opposite level.
pub struct Debouncer {
    stable: bool,
    candidate: bool,
    count: u32,
}

impl Debouncer {
    pub fn new(initial: bool) -> Self {
        Self {
            stable: initial,
            candidate: initial,
            count: 0,
        }
    }

    /// Feed one raw sample; returns the current debounced level.
    pub fn sample(&mut self, raw: bool) -> bool {
        if raw == self.stable {
            self.candidate = raw;
            self.count = 0;
        } else if raw == self.candidate {
            self.count += 1;
            if self.count >= DEBOUNCE_SAMPLES {
                self.stable = raw;
                self.count = 0;
            }
        } else {
            self.candidate = raw;
            self.count = 1;
        }
        self.stable
    }

    /// Override the accepted level, discarding any pending transition.
    /// Used after the sensor has been power-cycled.
    pub fn force(&mut self, level: bool) {
        self.stable = level;
        self.candidate = level;
        self.count = 0;
    }
}

// ---------------------------------------------------------------------------
// Gesture Detector
// ---------------------------------------------------------------------------

/// What the control task should do in response to an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    /// Transmit a protocol command.
    Send(Command),
    /// Power-cycle the touch sensor and reset the debounced state.
    Recalibrate,
}

/// Edge/hold state machine over the debounced touch level. Owns the
/// logical light toggle (`on`) and the fade-in-progress flag.
pub struct GestureDetector {
    last: bool,
    press_start_us: u64,
    on: bool,
    fading: bool,
}

impl GestureDetector {
    pub fn new() -> Self {
        Self {
            last: false,
            press_start_us: 0,
            on: false,
            fading: false,
        }
    }

    /// Advance the state machine by one poll iteration.
    pub fn update(&mut self, current: bool, now_us: u64) -> Option<GestureAction> {
        let action = if current && !self.last {
            // Rising edge: start timing the press.
            self.press_start_us = now_us;
            None
        } else if current && self.last {
            let duration = now_us - self.press_start_us;

            if duration >= STUCK_HOLD_US {
                // Sensor saturated or miscalibrated; abandon the gesture.
                self.last = false;
                self.fading = false;
                return Some(GestureAction::Recalibrate);
            }

            if !self.fading && duration >= FADE_HOLD_US {
                self.fading = true;
                Some(GestureAction::Send(self.toggle_fade()))
            } else {
                None
            }
        } else if !current && self.last {
            if self.fading {
                self.fading = false;
                Some(GestureAction::Send(Command::Stop))
            } else {
                Some(GestureAction::Send(self.toggle_scene()))
            }
        } else {
            None
        };

        self.last = current;
        action
    }

    fn toggle_fade(&mut self) -> Command {
        if self.on {
            self.on = false;
            Command::Lower
        } else {
            self.on = true;
            Command::Raise
        }
    }

    fn toggle_scene(&mut self) -> Command {
        if self.on {
            self.on = false;
            Command::Off
        } else {
            self.on = true;
            Command::Scene1
        }
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000;

    /// Press for `hold_ms`, then release, stepping the detector every
    /// millisecond. Returns every action emitted.
    fn run_press(detector: &mut GestureDetector, t: &mut u64, hold_ms: u64) -> Vec<GestureAction> {
        let mut actions = Vec::new();
        let press_start = *t;
        while *t < press_start + hold_ms * MS {
            actions.extend(detector.update(true, *t));
            *t += MS;
        }
        actions.extend(detector.update(false, *t));
        *t += MS;
        actions
    }

    #[test]
    fn tap_toggles_scene_and_off_alternately() {
        let mut detector = GestureDetector::new();
        let mut t = 0u64;

        let expected = [
            Command::Scene1,
            Command::Off,
            Command::Scene1,
            Command::Off,
        ];
        for want in expected {
            let actions = run_press(&mut detector, &mut t, 200);
            assert_eq!(actions, vec![GestureAction::Send(want)]);
        }
    }

    #[test]
    fn even_tap_count_restores_toggle_state() {
        let mut detector = GestureDetector::new();
        let mut t = 0u64;

        for cycle in 0..6 {
            let actions = run_press(&mut detector, &mut t, 100);
            // Even cycles start from "off", so the toggle alternates
            // deterministically from the initial state.
            let want = if cycle % 2 == 0 {
                Command::Scene1
            } else {
                Command::Off
            };
            assert_eq!(actions, vec![GestureAction::Send(want)]);
        }
    }

    #[test]
    fn hold_starts_fade_then_stops_on_release() {
        let mut detector = GestureDetector::new();
        let mut t = 0u64;

        let actions = run_press(&mut detector, &mut t, 600);
        assert_eq!(
            actions,
            vec![
                GestureAction::Send(Command::Raise),
                GestureAction::Send(Command::Stop),
            ]
        );

        // Fade direction alternates with the toggle state.
        let actions = run_press(&mut detector, &mut t, 600);
        assert_eq!(
            actions,
            vec![
                GestureAction::Send(Command::Lower),
                GestureAction::Send(Command::Stop),
            ]
        );
    }

    #[test]
    fn fade_fires_once_near_threshold() {
        let mut detector = GestureDetector::new();
        let mut t = 0u64;

        detector.update(true, t); // rising edge
        t += 499 * MS;
        assert_eq!(detector.update(true, t), None);
        t += MS;
        assert_eq!(
            detector.update(true, t),
            Some(GestureAction::Send(Command::Raise))
        );
        // Still held: no repeats.
        for _ in 0..100 {
            t += MS;
            assert_eq!(detector.update(true, t), None);
        }
    }

    #[test]
    fn stuck_hold_requests_recalibration_only() {
        let mut detector = GestureDetector::new();
        let mut t = 0u64;

        detector.update(true, t);
        t += 500 * MS;
        assert_eq!(
            detector.update(true, t),
            Some(GestureAction::Send(Command::Raise))
        );

        t += 10_000 * MS; // now held 10.5 s in total
        assert_eq!(detector.update(true, t), Some(GestureAction::Recalibrate));

        // The gesture was abandoned: the forced-unpressed state means the
        // physical release produces no falling edge, and no STOP is sent.
        t += MS;
        assert_eq!(detector.update(false, t), None);
    }

    #[test]
    fn idle_signal_emits_nothing() {
        let mut detector = GestureDetector::new();
        for i in 0..1_000u64 {
            assert_eq!(detector.update(false, i * MS), None);
        }
    }

    #[test]
    fn debounce_rejects_changes_before_fifty_consistent_samples() {
        let mut debouncer = Debouncer::new(false);

        // Alternating noise: never 50 consistent samples, never a change.
        for i in 0..49 {
            assert!(!debouncer.sample(i % 2 == 1));
        }

        // Now hold high: the 50th consistent sample flips the level.
        for _ in 0..49 {
            assert!(!debouncer.sample(true));
        }
        assert!(debouncer.sample(true));
    }

    #[test]
    fn debounce_force_discards_pending_transition() {
        let mut debouncer = Debouncer::new(false);
        for _ in 0..40 {
            debouncer.sample(true);
        }
        debouncer.force(false);
        for _ in 0..49 {
            assert!(!debouncer.sample(true));
        }
        assert!(debouncer.sample(true));
    }
}
