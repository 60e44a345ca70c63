//! Geometry animators
//!
//! Each animator holds its own start/target state and is advanced by the
//! registry's scheduler tick. Cancelling an animator is dropping it: there is
//! no timer living elsewhere, and whatever frame was applied last stays.
//!
//! - **Resize**: time-bounded linear interpolation toward a target size,
//!   keeping the edge opposite the drag handle fixed
//! - **Snap**: step-based ease-out toward a screen edge after a drag release

mod resize;
mod snap;

pub use resize::ResizeAnimator;
pub use snap::SnapAnimator;

use crate::geometry::OverlayGeometry;

/// Result of advancing an animator by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Geometry to apply, already clamped to the screen
    pub geometry: OverlayGeometry,
    /// True when this is the last frame
    pub finished: bool,
}
