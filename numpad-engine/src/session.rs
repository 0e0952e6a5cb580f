//! Device-independent event pipeline.
//!
//! A [`NumpadSession`] owns all mutable numpad state. The driver translates
//! each raw device event into a [`TouchInput`] and hands it over together
//! with the time it was read; the session updates the touch state and runs
//! one arbiter tick.

use std::time::Instant;

use tracing::trace;

use crate::arbiter::{Arbiter, DeviceGrab, Feedback, NumpadMode, TickOutcome};
use crate::emitter::{KeyEmitter, KeyOutput};
use crate::error::EngineError;
use crate::touch::TouchState;

/// A raw device event reduced to what the numpad cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchInput {
    /// Absolute X position
    X(i32),
    /// Absolute Y position
    Y(i32),
    /// Primary contact went down (`true`) or up (`false`)
    Touch(bool),
    /// Anything else; still counts as a tick
    Other,
}

/// Touch state, mode and key output for one touchpad
#[derive(Debug)]
pub struct NumpadSession<O> {
    touch: TouchState,
    arbiter: Arbiter,
    emitter: KeyEmitter<O>,
}

impl<O: KeyOutput> NumpadSession<O> {
    pub fn new(arbiter: Arbiter, emitter: KeyEmitter<O>) -> Self {
        Self {
            touch: TouchState::new(),
            arbiter,
            emitter,
        }
    }

    /// Apply one input and run a tick
    pub fn handle(
        &mut self,
        input: TouchInput,
        now: Instant,
        grab: &mut dyn DeviceGrab,
        feedback: &mut dyn Feedback,
    ) -> Result<TickOutcome, EngineError> {
        match input {
            TouchInput::X(x) => self.touch.set_x(x),
            TouchInput::Y(y) => self.touch.set_y(y),
            TouchInput::Touch(true) => {
                if self.touch.touch_down(now) {
                    let (x, y) = self.touch.start_position();
                    trace!("Touch down at ({}, {})", x, y);
                }
            }
            TouchInput::Touch(false) => {
                if self.touch.touch_up() {
                    trace!("Touch up");
                }
            }
            TouchInput::Other => {}
        }

        self.arbiter
            .tick(&mut self.touch, now, &mut self.emitter, grab, feedback)
    }

    pub fn mode(&self) -> NumpadMode {
        self.arbiter.mode()
    }

    pub fn emitter(&self) -> &KeyEmitter<O> {
        &self.emitter
    }

    /// Tear down, handing back the key output for cleanup
    pub fn into_output(self) -> O {
        self.emitter.into_output()
    }
}
