//! Touchpad Numpad
//!
//! Turns a laptop touchpad into a numeric keypad: hold the top-right corner
//! to toggle, then tap cells of a 4×5 grid to type digits and operators
//! through a virtual keyboard. The gesture logic lives in `numpad-engine`;
//! this crate wires it to evdev, uinput and the desktop.

pub mod config;
pub mod discovery;
pub mod driver;
pub mod feedback;
pub mod keyboard;
pub mod touchpad;

pub use config::{FeedbackConfig, NumpadConfig};
pub use discovery::{find_touchpad, scan, Candidate, StartupError};
pub use feedback::{DesktopFeedback, NoFeedback};
pub use keyboard::{KeyboardError, VirtualKeyboard};
pub use touchpad::Touchpad;
