//! Virtual keyboard device using evdev/uinput
//!
//! Creates a keyboard that advertises exactly the keys the numpad can type.
//! The device node disappears when the value is dropped.

use std::io;
use std::path::PathBuf;

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key,
};
use numpad_engine::{required_key_codes, KeyCode, KeyOutput};
use thiserror::Error;
use tracing::trace;

/// Errors from virtual keyboard operations
#[derive(Debug, Error)]
pub enum KeyboardError {
    #[error("Failed to create virtual keyboard: {0}")]
    CreateDevice(#[source] io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] io::Error),
}

/// Virtual numpad keyboard
pub struct VirtualKeyboard {
    device: VirtualDevice,
    name: String,
}

/// Key set advertised by the virtual device
pub fn supported_keys() -> AttributeSet<Key> {
    let mut keys = AttributeSet::<Key>::new();
    for code in required_key_codes() {
        keys.insert(Key::new(code.raw()));
    }
    keys
}

impl VirtualKeyboard {
    /// Create the uinput device
    ///
    /// # Arguments
    /// * `name` - Device name (shown in `evtest` and `libinput list-devices`)
    pub fn new(name: &str) -> Result<Self, KeyboardError> {
        let device = VirtualDeviceBuilder::new()
            .map_err(KeyboardError::CreateDevice)?
            .name(name)
            .with_keys(&supported_keys())
            .map_err(KeyboardError::CreateDevice)?
            .build()
            .map_err(KeyboardError::CreateDevice)?;

        Ok(Self {
            device,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write one key transition followed by a sync report
    pub fn send_key(&mut self, code: KeyCode, pressed: bool) -> Result<(), KeyboardError> {
        trace!("key {} {}", code.raw(), if pressed { "down" } else { "up" });
        let event = InputEvent::new(EventType::KEY, code.raw(), i32::from(pressed));
        self.device.emit(&[event]).map_err(KeyboardError::EmitEvent)
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl KeyOutput for VirtualKeyboard {
    fn send(&mut self, code: KeyCode, pressed: bool) -> io::Result<()> {
        self.send_key(code, pressed).map_err(|e| match e {
            KeyboardError::CreateDevice(err) | KeyboardError::EmitEvent(err) => err,
        })
    }
}
