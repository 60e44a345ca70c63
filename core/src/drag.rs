//! Drag session state machine
//!
//! One session exists per pointer sequence, from pointer-down to
//! pointer-up/cancel:
//!
//! ```text
//! Idle ──down──▶ Armed ──move ≥ debounce──▶ Dragging
//!                  │                           │
//!                  └────────── up/cancel ──────┴──▶ ClosedByTarget
//!                                                 │ Committed (snap)
//!                                                 │ Cancelled
//! ```
//!
//! The session only tracks pointer state. It never owns geometry; the
//! registry applies the deltas it hands out.

use floatwin_types::SnapMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pointer is down but has not moved past the debounce threshold
    Armed,
    /// Movement is being applied to the overlay
    Dragging,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRelease {
    /// Released over the close target; the overlay is torn down
    ClosedByTarget,
    /// Released with a snap mode configured; a snap animation follows
    Committed(SnapMode),
    /// Released where it is
    Cancelled,
}

/// Raw pointer action, as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer event in raw screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub raw_x: f32,
    pub raw_y: f32,
}

impl PointerEvent {
    pub fn new(action: PointerAction, raw_x: f32, raw_y: f32) -> Self {
        Self {
            action,
            raw_x,
            raw_y,
        }
    }

    pub fn down(raw_x: f32, raw_y: f32) -> Self {
        Self::new(PointerAction::Down, raw_x, raw_y)
    }

    pub fn moved(raw_x: f32, raw_y: f32) -> Self {
        Self::new(PointerAction::Move, raw_x, raw_y)
    }

    pub fn up(raw_x: f32, raw_y: f32) -> Self {
        Self::new(PointerAction::Up, raw_x, raw_y)
    }
}

/// Pointer state for one drag
#[derive(Debug, Clone)]
pub struct DragSession {
    last_x: f32,
    last_y: f32,
    phase: DragPhase,
    debounce_sq: f32,
    close_on_drag: bool,
}

impl DragSession {
    pub fn begin(raw_x: f32, raw_y: f32, debounce_sq: f32, close_on_drag: bool) -> Self {
        Self {
            last_x: raw_x,
            last_y: raw_y,
            phase: DragPhase::Armed,
            debounce_sq,
            close_on_drag,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_committed(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    pub fn close_on_drag(&self) -> bool {
        self.close_on_drag
    }

    /// Feed a pointer move. Returns the integer delta to apply to the
    /// overlay, or `None` while the pointer is still inside the debounce
    /// radius of the down position.
    pub fn on_move(&mut self, raw_x: f32, raw_y: f32) -> Option<(i32, i32)> {
        let dx = raw_x - self.last_x;
        let dy = raw_y - self.last_y;

        if self.phase == DragPhase::Armed {
            if dx * dx + dy * dy < self.debounce_sq {
                return None;
            }
            self.phase = DragPhase::Dragging;
        }

        self.last_x = raw_x;
        self.last_y = raw_y;
        Some((dx.round() as i32, dy.round() as i32))
    }

    /// Decide how the session ends
    pub fn release(&self, over_close_target: bool, snap_mode: SnapMode) -> DragRelease {
        if self.close_on_drag && over_close_target {
            DragRelease::ClosedByTarget
        } else if snap_mode != SnapMode::None {
            DragRelease::Committed(snap_mode)
        } else {
            DragRelease::Cancelled
        }
    }
}
