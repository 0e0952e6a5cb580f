//! Symbol → key event sequences.
//!
//! A tap is a press, a short hold, then a release. Shifted symbols wrap the
//! base key in left shift so the base key is never seen without the modifier.

use std::io;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::EngineError;
use crate::key::{KeyCode, KeySymbol};

/// Sink for synthesized key events
///
/// Implementations must deliver each transition as its own report (key event
/// followed by a sync) before returning.
pub trait KeyOutput {
    fn send(&mut self, code: KeyCode, pressed: bool) -> io::Result<()>;
}

/// Shortest press that downstream consumers reliably register
pub const MIN_KEY_HOLD: Duration = Duration::from_millis(10);

/// Types numpad symbols on a [`KeyOutput`]
#[derive(Debug)]
pub struct KeyEmitter<O> {
    output: O,
    key_hold: Duration,
}

impl<O: KeyOutput> KeyEmitter<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            key_hold: MIN_KEY_HOLD,
        }
    }

    /// Override the press-to-release delay
    pub fn with_key_hold(mut self, key_hold: Duration) -> Self {
        self.key_hold = key_hold;
        self
    }

    pub fn key_hold(&self) -> Duration {
        self.key_hold
    }

    /// Type one symbol
    pub fn emit(&mut self, symbol: KeySymbol) -> Result<(), EngineError> {
        let stroke = symbol.stroke();
        debug!("Emitting {} (code {})", symbol, stroke.code.raw());

        if stroke.shifted {
            self.output.send(KeyCode::KEY_LEFTSHIFT, true)?;
        }
        self.output.send(stroke.code, true)?;
        if !self.key_hold.is_zero() {
            thread::sleep(self.key_hold);
        }
        self.output.send(stroke.code, false)?;
        if stroke.shifted {
            self.output.send(KeyCode::KEY_LEFTSHIFT, false)?;
        }
        Ok(())
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }
}
