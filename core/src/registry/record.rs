//! Per-overlay aggregate record

use floatwin_types::{Extent, Gravity, OverlaySpec, SnapMode, WindowFlag};

use crate::animation::{ResizeAnimator, SnapAnimator};
use crate::drag::DragSession;
use crate::geometry::{OverlayGeometry, ScreenSize, SurfacePlacement};
use crate::host::SurfaceHandle;
use crate::normalize;

/// Configuration of one overlay. Requested sizes are logical units.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub enable_drag: bool,
    pub enable_close_on_drag: bool,
    pub snap_mode: SnapMode,
    pub width: Extent,
    pub height: Extent,
    pub gravity: Gravity,
    pub flag: WindowFlag,
}

impl From<&OverlaySpec> for OverlayConfig {
    fn from(spec: &OverlaySpec) -> Self {
        Self {
            enable_drag: spec.enable_drag,
            // only a resize request turns this on
            enable_close_on_drag: false,
            snap_mode: spec.snap_mode,
            width: spec.width,
            height: spec.height,
            gravity: spec.gravity,
            flag: spec.flag,
        }
    }
}

/// Whatever is currently mutating the overlay's geometry. Holding exactly
/// one of these per overlay is what keeps animators from overlapping.
#[derive(Debug, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeAnimator),
    Snapping(SnapAnimator),
}

impl Interaction {
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Resizing(_) | Self::Snapping(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging(_) => "dragging",
            Self::Resizing(_) => "resizing",
            Self::Snapping(_) => "snapping",
        }
    }
}

#[derive(Debug)]
pub struct OverlayRecord {
    pub config: OverlayConfig,
    /// Absolute top-left geometry, physical pixels
    pub geometry: OverlayGeometry,
    /// Gravity the host placement is expressed in. Starts as the configured
    /// gravity and becomes `TopLeft` after the first interactive operation.
    pub frame: Gravity,
    /// `None` once the host reported the surface gone
    pub surface: Option<SurfaceHandle>,
    pub interaction: Interaction,
}

impl OverlayRecord {
    pub fn placement(&self, screen: ScreenSize) -> SurfacePlacement {
        normalize::placement_in(self.frame, self.geometry, screen)
    }

    /// Switch to the absolute working frame. Returns true if the frame changed.
    pub fn normalize_frame(&mut self) -> bool {
        let changed = self.frame != Gravity::TopLeft;
        self.frame = Gravity::TopLeft;
        changed
    }
}
