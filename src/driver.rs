//! Event loop driver
//!
//! Owns the touchpad and the virtual keyboard for the lifetime of the run,
//! feeds every touchpad event to a [`NumpadSession`] and shuts down cleanly on
//! Ctrl-C or when the touchpad goes away.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use numpad_engine::{
    Arbiter, DeviceGrab, Feedback, KeyEmitter, KeyOutput, Layout, NumpadSession, TickOutcome,
    TouchInput,
};
use tracing::{debug, info, warn};

use crate::config::NumpadConfig;
use crate::keyboard::VirtualKeyboard;
use crate::touchpad::Touchpad;

/// How often a blocked wait wakes up to check for Ctrl-C
const INTERRUPT_POLL: Duration = Duration::from_millis(250);

/// Set up a Ctrl-C handler that clears the returned flag when triggered.
pub fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    if let Err(e) = ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    running
}

/// Build the session for a touchpad's geometry and the configured timings
pub fn build_session(
    touchpad: &Touchpad,
    keyboard: VirtualKeyboard,
    config: &NumpadConfig,
) -> anyhow::Result<NumpadSession<VirtualKeyboard>> {
    let geometry = touchpad
        .geometry()
        .with_context(|| format!("Unusable touchpad {}", touchpad.path().display()))?;
    info!(
        "Touchpad range: x {}..{}, y {}..{}",
        geometry.x_min(),
        geometry.x_max(),
        geometry.y_min(),
        geometry.y_max()
    );

    let arbiter = Arbiter::new(Layout::new(geometry)).with_hold_time(config.hold_time());
    let emitter = KeyEmitter::new(keyboard).with_key_hold(config.key_hold());
    Ok(NumpadSession::new(arbiter, emitter))
}

/// A touch device the event loop can drive
pub trait TouchSource: DeviceGrab {
    /// Human-readable identity for logs
    fn describe(&self) -> String;
    /// Wait up to `timeout` for input; `Ok(false)` on timeout
    fn wait_readable(&self, timeout: Duration) -> io::Result<bool>;
    /// Pending inputs; an error means the stream has ended
    fn read_inputs(&mut self) -> io::Result<Vec<TouchInput>>;
    /// Whether a grab is currently held
    fn is_grabbed(&self) -> bool;
}

impl TouchSource for Touchpad {
    fn describe(&self) -> String {
        format!("{} ({})", self.name(), self.path().display())
    }

    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        Touchpad::wait_readable(self, timeout)
    }

    fn read_inputs(&mut self) -> io::Result<Vec<TouchInput>> {
        Touchpad::read_inputs(self)
    }

    fn is_grabbed(&self) -> bool {
        Touchpad::is_grabbed(self)
    }
}

/// Run until interrupted or until the touchpad stops producing events
///
/// The grab is always released before returning, and the virtual keyboard is
/// destroyed after it.
pub fn run<S: TouchSource, O: KeyOutput>(
    mut source: S,
    mut session: NumpadSession<O>,
    feedback: &mut dyn Feedback,
    running: &AtomicBool,
) -> anyhow::Result<()> {
    info!(
        "Listening on {}. Hold the top-right corner to toggle the numpad, Ctrl+C to exit.",
        source.describe()
    );

    let result = event_loop(&mut source, &mut session, feedback, running);

    if source.is_grabbed() {
        if let Err(e) = source.release() {
            warn!("Failed to release touchpad: {}", e);
        }
    }
    drop(session.into_output());
    info!("Stopped");

    result
}

fn event_loop<S: TouchSource, O: KeyOutput>(
    source: &mut S,
    session: &mut NumpadSession<O>,
    feedback: &mut dyn Feedback,
    running: &AtomicBool,
) -> anyhow::Result<()> {
    while running.load(Ordering::SeqCst) {
        if !source.wait_readable(INTERRUPT_POLL)? {
            continue;
        }

        let inputs = match source.read_inputs() {
            Ok(inputs) => inputs,
            Err(e) => {
                info!("Touchpad event stream ended: {}", e);
                return Ok(());
            }
        };

        let now = Instant::now();
        for input in inputs {
            match session
                .handle(input, now, source, feedback)
                .context("Virtual keyboard unavailable")?
            {
                TickOutcome::Idle => {}
                TickOutcome::Toggled(mode) => debug!("Mode is now {}", mode),
                TickOutcome::KeyEmitted(symbol) => debug!("Typed {}", symbol),
            }
        }
    }

    info!("Interrupted, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use numpad_engine::{DeviceGeometry, KeyCode, NumpadMode};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct ScriptedPad {
        batches: VecDeque<io::Result<Vec<TouchInput>>>,
        grabbed: bool,
        log: Log,
    }

    impl ScriptedPad {
        fn new(log: &Log, batches: Vec<io::Result<Vec<TouchInput>>>) -> Self {
            Self {
                batches: batches.into(),
                grabbed: false,
                log: Rc::clone(log),
            }
        }
    }

    impl DeviceGrab for ScriptedPad {
        fn grab(&mut self) -> io::Result<()> {
            self.grabbed = true;
            self.log.borrow_mut().push("grab");
            Ok(())
        }

        fn release(&mut self) -> io::Result<()> {
            self.grabbed = false;
            self.log.borrow_mut().push("release");
            Ok(())
        }
    }

    impl TouchSource for ScriptedPad {
        fn describe(&self) -> String {
            "scripted pad".to_string()
        }

        fn wait_readable(&self, _timeout: Duration) -> io::Result<bool> {
            Ok(true)
        }

        fn read_inputs(&mut self) -> io::Result<Vec<TouchInput>> {
            self.batches
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::from(io::ErrorKind::UnexpectedEof)))
        }

        fn is_grabbed(&self) -> bool {
            self.grabbed
        }
    }

    struct Keys {
        sent: Vec<(KeyCode, bool)>,
        log: Log,
    }

    impl KeyOutput for Keys {
        fn send(&mut self, code: KeyCode, pressed: bool) -> io::Result<()> {
            self.sent.push((code, pressed));
            Ok(())
        }
    }

    impl Drop for Keys {
        fn drop(&mut self) {
            self.log.borrow_mut().push("keyboard dropped");
        }
    }

    struct Silent;

    impl Feedback for Silent {
        fn notify_toggle(&mut self, _enabled: bool) {}
    }

    /// 1000×600 pad that toggles as soon as the hotspot is touched
    fn session(log: &Log) -> NumpadSession<Keys> {
        let geometry = DeviceGeometry::new(0, 1000, 0, 600).unwrap();
        let arbiter = Arbiter::new(Layout::new(geometry)).with_hold_time(Duration::ZERO);
        let keys = Keys {
            sent: Vec::new(),
            log: Rc::clone(log),
        };
        NumpadSession::new(arbiter, KeyEmitter::new(keys).with_key_hold(Duration::ZERO))
    }

    fn hotspot_tap() -> Vec<TouchInput> {
        vec![
            TouchInput::X(950),
            TouchInput::Y(50),
            TouchInput::Touch(true),
            TouchInput::Touch(false),
        ]
    }

    #[test]
    fn test_stream_end_releases_grab_before_keyboard() {
        let log = Log::default();
        let pad = ScriptedPad::new(&log, vec![Ok(hotspot_tap())]);
        let running = AtomicBool::new(true);

        run(pad, session(&log), &mut Silent, &running).unwrap();

        assert_eq!(*log.borrow(), vec!["grab", "release", "keyboard dropped"]);
    }

    #[test]
    fn test_release_skipped_when_never_grabbed() {
        let log = Log::default();
        let pad = ScriptedPad::new(
            &log,
            vec![Err(io::Error::from(io::ErrorKind::NotConnected))],
        );
        let running = AtomicBool::new(true);

        run(pad, session(&log), &mut Silent, &running).unwrap();

        assert_eq!(*log.borrow(), vec!["keyboard dropped"]);
    }

    #[test]
    fn test_disable_before_stream_end_does_not_release_twice() {
        let log = Log::default();
        let pad = ScriptedPad::new(&log, vec![Ok(hotspot_tap()), Ok(hotspot_tap())]);
        let running = AtomicBool::new(true);

        run(pad, session(&log), &mut Silent, &running).unwrap();

        assert_eq!(*log.borrow(), vec!["grab", "release", "keyboard dropped"]);
    }

    #[test]
    fn test_cleared_flag_stops_without_reading() {
        let log = Log::default();
        let mut pad = ScriptedPad::new(&log, vec![Ok(hotspot_tap())]);
        let mut session = session(&log);
        let running = AtomicBool::new(false);

        event_loop(&mut pad, &mut session, &mut Silent, &running).unwrap();

        assert_eq!(pad.batches.len(), 1);
        assert_eq!(session.mode(), NumpadMode::Disabled);
    }

    #[test]
    fn test_taps_reach_keyboard() {
        let log = Log::default();
        let tap_seven = vec![
            TouchInput::X(100),
            TouchInput::Y(75),
            TouchInput::Touch(true),
            TouchInput::Touch(false),
        ];
        let mut pad = ScriptedPad::new(&log, vec![Ok(hotspot_tap()), Ok(tap_seven)]);
        let mut session = session(&log);
        let running = AtomicBool::new(true);

        event_loop(&mut pad, &mut session, &mut Silent, &running).unwrap();

        assert_eq!(session.mode(), NumpadMode::Enabled);
        assert_eq!(
            session.emitter().output().sent,
            vec![(KeyCode::KEY_7, true), (KeyCode::KEY_7, false)]
        );
    }
}
