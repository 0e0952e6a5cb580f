//! Toggle vs. tap arbitration.
//!
//! Runs once per input event while a contact is down and unconsumed. A
//! contact that starts in the hotspot and is held past the hold time flips
//! numpad mode; any other contact, when the mode is enabled, types the key
//! under its landing position. Either action consumes the contact.

use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::emitter::{KeyEmitter, KeyOutput};
use crate::error::EngineError;
use crate::geometry::Layout;
use crate::key::KeySymbol;
use crate::touch::TouchState;

/// Default hold time in the hotspot before the mode flips
pub const HOLD_TIME: Duration = Duration::from_millis(800);

/// Whether taps are translated into keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumpadMode {
    #[default]
    Disabled,
    Enabled,
}

impl NumpadMode {
    pub fn is_enabled(self) -> bool {
        self == NumpadMode::Enabled
    }

    pub fn toggled(self) -> Self {
        match self {
            NumpadMode::Disabled => NumpadMode::Enabled,
            NumpadMode::Enabled => NumpadMode::Disabled,
        }
    }
}

impl fmt::Display for NumpadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumpadMode::Disabled => f.write_str("disabled"),
            NumpadMode::Enabled => f.write_str("enabled"),
        }
    }
}

/// Exclusive ownership of the physical touch device
pub trait DeviceGrab {
    /// Stop the device's events from reaching other consumers
    fn grab(&mut self) -> io::Result<()>;
    /// Return the device to normal delivery
    fn release(&mut self) -> io::Result<()>;
}

/// User-facing toggle feedback (sound, notification). Must not block.
pub trait Feedback {
    fn notify_toggle(&mut self, enabled: bool);
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing fired
    Idle,
    /// Mode flipped to the contained state
    Toggled(NumpadMode),
    /// A key was typed
    KeyEmitted(KeySymbol),
}

/// Owns the layout and the numpad mode
#[derive(Debug, Clone)]
pub struct Arbiter {
    layout: Layout,
    mode: NumpadMode,
    hold_time: Duration,
}

impl Arbiter {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            mode: NumpadMode::Disabled,
            hold_time: HOLD_TIME,
        }
    }

    pub fn with_hold_time(mut self, hold_time: Duration) -> Self {
        self.hold_time = hold_time;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn mode(&self) -> NumpadMode {
        self.mode
    }

    pub fn hold_time(&self) -> Duration {
        self.hold_time
    }

    /// Evaluate the current contact
    ///
    /// Only a key write failure is an error; grab failures are logged and the
    /// mode change stands.
    pub fn tick<O: KeyOutput>(
        &mut self,
        touch: &mut TouchState,
        now: Instant,
        emitter: &mut KeyEmitter<O>,
        grab: &mut dyn DeviceGrab,
        feedback: &mut dyn Feedback,
    ) -> Result<TickOutcome, EngineError> {
        if !touch.is_active() || touch.action_taken() {
            return Ok(TickOutcome::Idle);
        }

        let (x, y) = touch.start_position();
        let in_hotspot = self.layout.in_hotspot(x, y);

        if in_hotspot && touch.held_for(now) >= self.hold_time {
            touch.mark_action_taken();
            return Ok(TickOutcome::Toggled(self.toggle(grab, feedback)));
        }

        if !self.mode.is_enabled() || in_hotspot {
            return Ok(TickOutcome::Idle);
        }

        match self.layout.hit_test(x, y) {
            Some(symbol) => {
                emitter.emit(symbol)?;
                touch.mark_action_taken();
                Ok(TickOutcome::KeyEmitted(symbol))
            }
            None => Ok(TickOutcome::Idle),
        }
    }

    fn toggle(&mut self, grab: &mut dyn DeviceGrab, feedback: &mut dyn Feedback) -> NumpadMode {
        self.mode = self.mode.toggled();
        feedback.notify_toggle(self.mode.is_enabled());

        match self.mode {
            NumpadMode::Enabled => match grab.grab() {
                Ok(()) => info!("Numpad enabled (touchpad grabbed)"),
                Err(e) => warn!("Numpad enabled, but grabbing the touchpad failed: {}", e),
            },
            NumpadMode::Disabled => match grab.release() {
                Ok(()) => info!("Numpad disabled (touchpad released)"),
                Err(e) => warn!("Numpad disabled, but releasing the touchpad failed: {}", e),
            },
        }
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DeviceGeometry;
    use crate::key::KeyCode;

    #[derive(Default)]
    struct Keys(Vec<(KeyCode, bool)>);

    impl KeyOutput for Keys {
        fn send(&mut self, code: KeyCode, pressed: bool) -> io::Result<()> {
            self.0.push((code, pressed));
            Ok(())
        }
    }

    #[derive(Default)]
    struct Grab {
        grabbed: bool,
        calls: usize,
        fail: bool,
    }

    impl DeviceGrab for Grab {
        fn grab(&mut self) -> io::Result<()> {
            self.calls += 1;
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "device busy"));
            }
            self.grabbed = true;
            Ok(())
        }

        fn release(&mut self) -> io::Result<()> {
            self.calls += 1;
            self.grabbed = false;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Toggles(Vec<bool>);

    impl Feedback for Toggles {
        fn notify_toggle(&mut self, enabled: bool) {
            self.0.push(enabled);
        }
    }

    struct Rig {
        arbiter: Arbiter,
        touch: TouchState,
        emitter: KeyEmitter<Keys>,
        grab: Grab,
        feedback: Toggles,
        t0: Instant,
    }

    impl Rig {
        fn new() -> Self {
            let geometry = DeviceGeometry::new(0, 1000, 0, 600).unwrap();
            Self {
                arbiter: Arbiter::new(Layout::new(geometry)),
                touch: TouchState::new(),
                emitter: KeyEmitter::new(Keys::default()).with_key_hold(Duration::ZERO),
                grab: Grab::default(),
                feedback: Toggles::default(),
                t0: Instant::now(),
            }
        }

        fn press(&mut self, x: i32, y: i32) {
            self.touch.set_x(x);
            self.touch.set_y(y);
            self.touch.touch_down(self.t0);
        }

        fn tick_at(&mut self, ms: u64) -> TickOutcome {
            self.arbiter
                .tick(
                    &mut self.touch,
                    self.t0 + Duration::from_millis(ms),
                    &mut self.emitter,
                    &mut self.grab,
                    &mut self.feedback,
                )
                .unwrap()
        }
    }

    #[test]
    fn test_idle_without_contact() {
        let mut rig = Rig::new();
        assert_eq!(rig.tick_at(5000), TickOutcome::Idle);
    }

    #[test]
    fn test_hold_below_threshold_does_nothing() {
        let mut rig = Rig::new();
        rig.press(950, 50);
        assert_eq!(rig.tick_at(799), TickOutcome::Idle);
        assert_eq!(rig.arbiter.mode(), NumpadMode::Disabled);
        assert!(rig.feedback.0.is_empty());
    }

    #[test]
    fn test_hold_toggles_and_grabs() {
        let mut rig = Rig::new();
        rig.press(950, 50);
        assert_eq!(rig.tick_at(800), TickOutcome::Toggled(NumpadMode::Enabled));
        assert!(rig.grab.grabbed);
        assert_eq!(rig.feedback.0, vec![true]);
        assert!(rig.touch.action_taken());
        assert!(rig.emitter.output().0.is_empty());
    }

    #[test]
    fn test_toggle_off_releases() {
        let mut rig = Rig::new();
        rig.press(950, 50);
        rig.tick_at(900);
        rig.touch.touch_up();

        rig.press(950, 50);
        assert_eq!(rig.tick_at(900), TickOutcome::Toggled(NumpadMode::Disabled));
        assert!(!rig.grab.grabbed);
        assert_eq!(rig.feedback.0, vec![true, false]);
    }

    #[test]
    fn test_grab_failure_still_toggles() {
        let mut rig = Rig::new();
        rig.grab.fail = true;
        rig.press(950, 50);
        assert_eq!(rig.tick_at(1000), TickOutcome::Toggled(NumpadMode::Enabled));
        assert_eq!(rig.arbiter.mode(), NumpadMode::Enabled);
        assert_eq!(rig.grab.calls, 1);
    }

    #[test]
    fn test_long_hold_outside_hotspot_does_not_toggle() {
        let mut rig = Rig::new();
        rig.press(100, 500);
        assert_eq!(rig.tick_at(3000), TickOutcome::Idle);
        assert_eq!(rig.arbiter.mode(), NumpadMode::Disabled);
    }

    #[test]
    fn test_tap_ignored_while_disabled() {
        let mut rig = Rig::new();
        rig.press(100, 75);
        assert_eq!(rig.tick_at(0), TickOutcome::Idle);
        assert!(rig.emitter.output().0.is_empty());
    }

    #[test]
    fn test_tap_emits_once_per_contact() {
        let mut rig = Rig::new();
        rig.arbiter.mode = NumpadMode::Enabled;
        rig.press(100, 75);
        assert_eq!(rig.tick_at(0), TickOutcome::KeyEmitted(KeySymbol::Seven));
        assert_eq!(rig.tick_at(10), TickOutcome::Idle);
        assert_eq!(rig.tick_at(2000), TickOutcome::Idle);
        assert_eq!(
            rig.emitter.output().0,
            vec![(KeyCode::KEY_7, true), (KeyCode::KEY_7, false)]
        );
    }

    #[test]
    fn test_tap_uses_latched_position() {
        let mut rig = Rig::new();
        rig.arbiter.mode = NumpadMode::Enabled;
        rig.press(100, 75);
        // Finger slides to the '0' cell before the first tick
        rig.touch.set_x(100);
        rig.touch.set_y(500);
        assert_eq!(rig.tick_at(0), TickOutcome::KeyEmitted(KeySymbol::Seven));
    }

    #[test]
    fn test_tap_outside_grid_leaves_contact_open() {
        let mut rig = Rig::new();
        rig.arbiter.mode = NumpadMode::Enabled;
        rig.press(1000, 300); // x_max is outside the half-open grid
        assert_eq!(rig.tick_at(0), TickOutcome::Idle);
        assert!(!rig.touch.action_taken());
    }

    #[test]
    fn test_custom_hold_time() {
        let mut rig = Rig::new();
        rig.arbiter = rig.arbiter.clone().with_hold_time(Duration::from_millis(2000));
        rig.press(950, 50);
        assert_eq!(rig.tick_at(1500), TickOutcome::Idle);
        assert_eq!(rig.tick_at(2000), TickOutcome::Toggled(NumpadMode::Enabled));
    }
}
