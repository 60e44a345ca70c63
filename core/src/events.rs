//! Outbound notifications
//!
//! Fire-and-forget events the engine publishes for overlay content and the
//! embedding application. Positions are logical units.

use floatwin_types::{OverlayId, Position};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OverlayEvent {
    Shown {
        id: OverlayId,
    },
    /// The pointer moved past the debounce radius
    DragStarted {
        id: OverlayId,
    },
    DragEnded {
        id: OverlayId,
        position: Position,
    },
    SnapFinished {
        id: OverlayId,
        position: Position,
    },
    CloseTargetHighlighted {
        id: OverlayId,
        highlighted: bool,
    },
    ClosedByTarget {
        id: OverlayId,
    },
    Removed {
        id: OverlayId,
    },
    /// The last overlay is gone; the owner may shut down
    AllClosed,
    /// The host dropped the surface behind the engine's back
    SurfaceLost {
        id: OverlayId,
    },
}

impl OverlayEvent {
    /// Overlay this event refers to, if any
    pub fn overlay(&self) -> Option<&OverlayId> {
        match self {
            Self::Shown { id }
            | Self::DragStarted { id }
            | Self::DragEnded { id, .. }
            | Self::SnapFinished { id, .. }
            | Self::CloseTargetHighlighted { id, .. }
            | Self::ClosedByTarget { id }
            | Self::Removed { id }
            | Self::SurfaceLost { id } => Some(id),
            Self::AllClosed => None,
        }
    }
}
