//! Touchpad discovery
//!
//! Scans `/dev/input/event*` nodes and picks the first device that reports
//! absolute X/Y and whose name contains one of the configured patterns.

use std::io;
use std::path::PathBuf;

use evdev::{AbsoluteAxisType, Device};
use numpad_engine::{DeviceGeometry, GeometryError};
use thiserror::Error;
use tracing::{debug, info};

use crate::touchpad::Touchpad;

/// Errors that stop the numpad from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("No touchpad found matching {patterns:?}{}", denied_hint(.denied))]
    NoTouchpad { patterns: Vec<String>, denied: usize },

    #[error("{} does not report ABS_X/ABS_Y", .0.display())]
    MissingAxes(PathBuf),

    #[error("Invalid touchpad geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),

    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read axis ranges of {}: {source}", .path.display())]
    Capabilities {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn denied_hint(denied: &usize) -> String {
    if *denied > 0 {
        format!(" ({denied} device(s) not readable, try running as root or joining the input group)")
    } else {
        String::new()
    }
}

/// One scanned input device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub name: String,
    pub matches: bool,
}

/// Event node path for an index
pub fn event_path(index: u32) -> PathBuf {
    PathBuf::from(format!("/dev/input/event{index}"))
}

/// Case-insensitive substring match against any pattern
pub fn matches_name(name: &str, patterns: &[String]) -> bool {
    let name = name.to_lowercase();
    patterns
        .iter()
        .any(|p| !p.is_empty() && name.contains(&p.to_lowercase()))
}

/// Name match on a device that reports absolute X/Y
///
/// Our own virtual keyboard carries "Touchpad" in its name but has no
/// absolute axes, so it is never picked.
pub fn is_touchpad(name: &str, has_position_axes: bool, patterns: &[String]) -> bool {
    has_position_axes && matches_name(name, patterns)
}

fn has_position_axes(device: &Device) -> bool {
    device.supported_absolute_axes().is_some_and(|axes| {
        axes.contains(AbsoluteAxisType::ABS_X) && axes.contains(AbsoluteAxisType::ABS_Y)
    })
}

/// Build a geometry from optional (min, max) axis ranges
pub fn geometry_from_ranges(
    path: PathBuf,
    x: Option<(i32, i32)>,
    y: Option<(i32, i32)>,
) -> Result<DeviceGeometry, StartupError> {
    match (x, y) {
        (Some((x_min, x_max)), Some((y_min, y_max))) => {
            Ok(DeviceGeometry::new(x_min, x_max, y_min, y_max)?)
        }
        _ => Err(StartupError::MissingAxes(path)),
    }
}

/// Open every event node below `max_index`
///
/// Missing nodes are skipped. Returns the opened devices plus how many nodes
/// were present but not readable.
fn open_all(max_index: u32) -> (Vec<(PathBuf, Device)>, usize) {
    let mut devices = Vec::new();
    let mut denied = 0;

    for index in 0..max_index {
        let path = event_path(index);
        match Device::open(&path) {
            Ok(device) => devices.push((path, device)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                if e.kind() == io::ErrorKind::PermissionDenied {
                    denied += 1;
                }
                debug!("Skipping {}: {}", path.display(), e);
            }
        }
    }

    (devices, denied)
}

/// List every readable input device and whether it would be selected
pub fn scan(max_index: u32, patterns: &[String]) -> Vec<Candidate> {
    let (devices, _) = open_all(max_index);
    devices
        .into_iter()
        .map(|(path, device)| {
            let name = device.name().unwrap_or("").to_string();
            let matches = is_touchpad(&name, has_position_axes(&device), patterns);
            Candidate {
                path,
                name,
                matches,
            }
        })
        .collect()
}

/// Find and open the first matching touchpad
///
/// Devices without ABS_X/ABS_Y are skipped even when the name matches.
pub fn find_touchpad(max_index: u32, patterns: &[String]) -> Result<Touchpad, StartupError> {
    let (devices, denied) = open_all(max_index);

    for (path, device) in devices {
        let name = device.name().unwrap_or("");
        if is_touchpad(name, has_position_axes(&device), patterns) {
            info!("Found touchpad: {} at {}", name, path.display());
            return Ok(Touchpad::from_device(device, path));
        }
    }

    Err(StartupError::NoTouchpad {
        patterns: patterns.to_vec(),
        denied,
    })
}
