//! Single-contact touch state machine.
//!
//! Tracks whether a finger is down, where and when it landed, and whether the
//! current contact has already produced an action. The landing position is
//! latched at touch-down; later coordinate updates only move `last_x/last_y`.

use std::time::{Duration, Instant};

/// Contact phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchPhase {
    #[default]
    Idle,
    TouchDown,
}

/// Per-session touch tracking
#[derive(Debug, Clone, Default)]
pub struct TouchState {
    phase: TouchPhase,
    start_time: Option<Instant>,
    start_x: i32,
    start_y: i32,
    action_taken: bool,
    last_x: i32,
    last_y: i32,
}

impl TouchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new X coordinate (any phase)
    pub fn set_x(&mut self, x: i32) {
        self.last_x = x;
    }

    /// Record a new Y coordinate (any phase)
    pub fn set_y(&mut self, y: i32) {
        self.last_y = y;
    }

    /// Finger landed. Latches the current position and time.
    ///
    /// Returns `false` (and changes nothing) if a contact is already active.
    pub fn touch_down(&mut self, now: Instant) -> bool {
        if self.phase == TouchPhase::TouchDown {
            return false;
        }
        self.phase = TouchPhase::TouchDown;
        self.start_time = Some(now);
        self.start_x = self.last_x;
        self.start_y = self.last_y;
        self.action_taken = false;
        true
    }

    /// Finger lifted. Returns `false` if no contact was active.
    pub fn touch_up(&mut self) -> bool {
        if self.phase == TouchPhase::Idle {
            return false;
        }
        self.phase = TouchPhase::Idle;
        self.action_taken = false;
        true
    }

    pub fn phase(&self) -> TouchPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == TouchPhase::TouchDown
    }

    /// Position latched at touch-down
    pub fn start_position(&self) -> (i32, i32) {
        (self.start_x, self.start_y)
    }

    /// Most recent reported position
    pub fn last_position(&self) -> (i32, i32) {
        (self.last_x, self.last_y)
    }

    /// Time since touch-down, zero when idle
    pub fn held_for(&self, now: Instant) -> Duration {
        match (self.phase, self.start_time) {
            (TouchPhase::TouchDown, Some(start)) => now.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub fn action_taken(&self) -> bool {
        self.action_taken
    }

    /// Mark the current contact as consumed
    pub fn mark_action_taken(&mut self) {
        self.action_taken = true;
    }
}
