//! Gesture-to-keystroke engine for a touchpad numeric keypad
//!
//! This crate holds everything that does not touch the OS:
//!
//! - Geometry: the 4×5 key grid and the toggle hotspot for a device's
//!   coordinate range
//! - Key emission: symbol → key event sequences, shift handling
//! - Touch tracking: contact down/up, latched landing position
//! - Arbitration: long-press toggle vs. key tap
//!
//! Device access, feedback and key output are injected through the
//! [`DeviceGrab`], [`Feedback`] and [`KeyOutput`] traits.

pub mod arbiter;
pub mod emitter;
pub mod error;
pub mod geometry;
pub mod key;
pub mod session;
pub mod touch;

pub use arbiter::{Arbiter, DeviceGrab, Feedback, NumpadMode, TickOutcome, HOLD_TIME};
pub use emitter::{KeyEmitter, KeyOutput, MIN_KEY_HOLD};
pub use error::{EngineError, GeometryError, ParseSymbolError};
pub use geometry::{DeviceGeometry, HotspotRect, KeyRect, Layout, COLS, ROWS};
pub use key::{required_key_codes, KeyCode, KeyStroke, KeySymbol};
pub use session::{NumpadSession, TouchInput};
pub use touch::{TouchPhase, TouchState};
