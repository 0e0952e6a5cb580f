//! Toggle feedback: a short sound and a desktop notification
//!
//! The numpad usually runs as root, so both helpers are pointed at the
//! invoking user's session (`/run/user/<uid>`). Children are detached and
//! reaped on a background thread; failures are only logged.

use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use numpad_engine::Feedback;
use tracing::{debug, warn};

use crate::config::FeedbackConfig;

const NOTIFICATION_TITLE: &str = "Touchpad Numpad";

/// Feedback through `paplay` and `notify-send`
pub struct DesktopFeedback {
    config: FeedbackConfig,
    uid: u32,
}

/// UID of the desktop session owner
///
/// Prefers `SUDO_UID` so `sudo touchpad-numpad` still reaches the user's
/// audio and notification daemons.
pub fn session_uid() -> u32 {
    std::env::var("SUDO_UID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| unsafe { libc::getuid() })
}

impl DesktopFeedback {
    pub fn new(config: FeedbackConfig) -> Self {
        Self::with_uid(config, session_uid())
    }

    pub fn with_uid(config: FeedbackConfig, uid: u32) -> Self {
        Self { config, uid }
    }

    fn runtime_dir(&self) -> String {
        format!("/run/user/{}", self.uid)
    }

    /// `paplay` invocation for a toggle, if sounds are enabled
    pub fn sound_command(&self, enabled: bool) -> Option<Command> {
        if !self.config.sound {
            return None;
        }
        let file: &Path = if enabled {
            &self.config.sound_on
        } else {
            &self.config.sound_off
        };

        let mut cmd = Command::new("paplay");
        cmd.arg(file).env("XDG_RUNTIME_DIR", self.runtime_dir());
        Some(cmd)
    }

    /// `notify-send` invocation for a toggle, if notifications are enabled
    pub fn notification_command(&self, enabled: bool) -> Option<Command> {
        if !self.config.notifications {
            return None;
        }
        let message = if enabled {
            "Numpad enabled"
        } else {
            "Numpad disabled"
        };

        let mut cmd = Command::new("notify-send");
        cmd.arg("-t")
            .arg(self.config.notification_timeout_ms.to_string())
            .arg(NOTIFICATION_TITLE)
            .arg(message)
            .env("DISPLAY", ":0")
            .env(
                "DBUS_SESSION_BUS_ADDRESS",
                format!("unix:path={}/bus", self.runtime_dir()),
            );
        Some(cmd)
    }
}

/// Start a helper without waiting for it
fn spawn_detached(mut cmd: Command) {
    let program = cmd.get_program().to_string_lossy().into_owned();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match cmd.spawn() {
        Ok(mut child) => {
            let reaper = thread::Builder::new()
                .name(format!("reap-{program}"))
                .spawn(move || match child.wait() {
                    Ok(status) if !status.success() => {
                        debug!("{} exited with {}", program, status);
                    }
                    Ok(_) => {}
                    Err(e) => debug!("Failed to wait for {}: {}", program, e),
                });
            if let Err(e) = reaper {
                warn!("Failed to start reaper thread: {}", e);
            }
        }
        Err(e) => warn!("Failed to run {}: {}", program, e),
    }
}

impl Feedback for DesktopFeedback {
    fn notify_toggle(&mut self, enabled: bool) {
        if let Some(cmd) = self.sound_command(enabled) {
            spawn_detached(cmd);
        }
        if let Some(cmd) = self.notification_command(enabled) {
            spawn_detached(cmd);
        }
    }
}

/// Feedback sink used with `--quiet`
#[derive(Debug, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn notify_toggle(&mut self, _enabled: bool) {}
}
