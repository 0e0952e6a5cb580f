//! Physical touchpad access via evdev.
//!
//! Wraps the opened input device: reads its coordinate range, waits for and
//! reads events, and grabs/releases it for exclusive use while the numpad is
//! enabled.

use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use evdev::{AbsoluteAxisType, Device, InputEvent, InputEventKind, Key};
use numpad_engine::{DeviceGeometry, DeviceGrab, TouchInput};
use tracing::debug;

use crate::discovery::{geometry_from_ranges, StartupError};

/// An opened touch input device
pub struct Touchpad {
    device: Device,
    path: PathBuf,
    name: String,
    grabbed: bool,
}

impl Touchpad {
    /// Open a specific event node
    pub fn open(path: &Path) -> Result<Self, StartupError> {
        let device = Device::open(path).map_err(|source| StartupError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_device(device, path.to_path_buf()))
    }

    pub(crate) fn from_device(device: Device, path: PathBuf) -> Self {
        let name = device.name().unwrap_or("unknown").to_string();
        Self {
            device,
            path,
            name,
            grabbed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coordinate range from the device's ABS_X / ABS_Y capabilities
    pub fn geometry(&self) -> Result<DeviceGeometry, StartupError> {
        let axes = self.device.supported_absolute_axes();
        let state = self
            .device
            .get_abs_state()
            .map_err(|source| StartupError::Capabilities {
                path: self.path.clone(),
                source,
            })?;

        let range = |axis: AbsoluteAxisType| {
            axes.is_some_and(|set| set.contains(axis)).then(|| {
                let info = &state[axis.0 as usize];
                (info.minimum, info.maximum)
            })
        };

        geometry_from_ranges(
            self.path.clone(),
            range(AbsoluteAxisType::ABS_X),
            range(AbsoluteAxisType::ABS_Y),
        )
    }

    /// Wait until events are readable, up to `timeout`
    ///
    /// Returns `Ok(false)` on timeout or when interrupted by a signal.
    pub fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        let mut fds = [libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        }];
        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;

        let result = unsafe { libc::poll(fds.as_mut_ptr(), 1, timeout_ms) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err);
        }
        Ok(result > 0)
    }

    /// Drain pending events as numpad inputs
    ///
    /// An error means the event stream is gone (device removed or closed).
    pub fn read_inputs(&mut self) -> io::Result<Vec<TouchInput>> {
        match self.device.fetch_events() {
            Ok(events) => Ok(events.map(|ev| translate(&ev)).collect()),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }
}

impl DeviceGrab for Touchpad {
    fn grab(&mut self) -> io::Result<()> {
        self.device.grab()?;
        self.grabbed = true;
        debug!("Grabbed {}", self.path.display());
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        self.device.ungrab()?;
        self.grabbed = false;
        debug!("Released {}", self.path.display());
        Ok(())
    }
}

/// Reduce an evdev event to a numpad input
///
/// Single-touch and slot multi-touch positions are treated the same; only the
/// primary BTN_TOUCH contact changes the touch state.
pub fn translate(event: &InputEvent) -> TouchInput {
    match event.kind() {
        InputEventKind::AbsAxis(axis)
            if axis == AbsoluteAxisType::ABS_X || axis == AbsoluteAxisType::ABS_MT_POSITION_X =>
        {
            TouchInput::X(event.value())
        }
        InputEventKind::AbsAxis(axis)
            if axis == AbsoluteAxisType::ABS_Y || axis == AbsoluteAxisType::ABS_MT_POSITION_Y =>
        {
            TouchInput::Y(event.value())
        }
        InputEventKind::Key(key) if key == Key::BTN_TOUCH => match event.value() {
            1 => TouchInput::Touch(true),
            0 => TouchInput::Touch(false),
            _ => TouchInput::Other,
        },
        _ => TouchInput::Other,
    }
}
