//! Resize animator
//!
//! Interpolates size linearly over a fixed duration. On each axis the edge
//! opposite the active handle stays put: `anchor_left` pins the right edge,
//! `anchor_top` pins the bottom edge. Axes involving a fill extent jump to
//! the target at once and keep their start position.

use std::time::{Duration, Instant};

use floatwin_types::Extent;

use super::Frame;
use crate::geometry::{OverlayGeometry, ScreenSize, coord};

/// Per-axis interpolation input
#[derive(Debug, Clone, Copy)]
struct Axis {
    start_pos: i32,
    start: Extent,
    target: Extent,
    /// Keep the trailing edge fixed instead of the leading one
    pin_trailing: bool,
}

impl Axis {
    fn at(&self, t: f64) -> (i32, Extent) {
        match (self.start, self.target) {
            (Extent::Px(from), Extent::Px(to)) => {
                let size = (from as f64 + (to as f64 - from as f64) * t).round() as u32;
                let pos = if self.pin_trailing {
                    self.start_pos
                        .saturating_add(coord(from))
                        .saturating_sub(coord(size))
                } else {
                    self.start_pos
                };
                (pos, Extent::Px(size))
            }
            _ => (self.start_pos, self.target),
        }
    }
}

/// Eases an overlay from its start geometry to a target size
#[derive(Debug, Clone)]
pub struct ResizeAnimator {
    horizontal: Axis,
    vertical: Axis,
    started_at: Instant,
    duration: Duration,
}

impl ResizeAnimator {
    pub fn new(
        start: OverlayGeometry,
        target_width: Extent,
        target_height: Extent,
        anchor_left: bool,
        anchor_top: bool,
        started_at: Instant,
        duration: Duration,
    ) -> Self {
        Self {
            horizontal: Axis {
                start_pos: start.x,
                start: start.width,
                target: target_width,
                pin_trailing: anchor_left,
            },
            vertical: Axis {
                start_pos: start.y,
                start: start.height,
                target: target_height,
                pin_trailing: anchor_top,
            },
            started_at,
            duration,
        }
    }

    /// Time fraction in `[0, 1]`
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Unclamped geometry at time fraction `t`
    pub fn geometry_at(&self, t: f64) -> OverlayGeometry {
        let t = t.clamp(0.0, 1.0);
        let (x, width) = self.horizontal.at(t);
        let (y, height) = self.vertical.at(t);
        OverlayGeometry::new(x, y, width, height)
    }

    pub fn frame(&self, now: Instant, screen: ScreenSize) -> Frame {
        let t = self.progress(now);
        Frame {
            geometry: self.geometry_at(t).clamped(screen),
            finished: t >= 1.0,
        }
    }
}
