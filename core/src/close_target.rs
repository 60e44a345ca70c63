//! Close target
//!
//! A transient circular drop zone anchored to the bottom-center of the
//! screen. Dragging an overlay onto it and releasing closes the overlay.
//!
//! Overlap uses hysteresis: once highlighted, the detection radius grows by
//! `close_target_hysteresis`, so an overlay resting right on the boundary
//! does not flicker between states.

use std::time::{Duration, Instant};

use floatwin_types::{EngineSettings, Extent, Gravity, OverlayId, WindowFlag};
use tracing::warn;

use crate::geometry::{Density, OverlayGeometry, ScreenSize, SurfacePlacement, coord};
use crate::host::{SurfaceHandle, SurfaceRole, WindowHost};

/// Bounce keyframes played while highlighted
const BOUNCE_KEYFRAMES: [f64; 5] = [1.0, 1.2, 0.9, 1.1, 1.0];

/// Highlight feedback in flight
#[derive(Debug, Clone, Copy)]
struct Feedback {
    started_at: Instant,
    duration: Duration,
}

impl Feedback {
    fn scale_at(&self, now: Instant) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.started_at);
        if self.duration.is_zero() || elapsed >= self.duration {
            return None;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let segments = (BOUNCE_KEYFRAMES.len() - 1) as f64;
        let pos = t * segments;
        let idx = pos.floor() as usize;
        let frac = pos - idx as f64;
        let from = BOUNCE_KEYFRAMES[idx];
        let to = BOUNCE_KEYFRAMES[idx + 1];
        Some(from + (to - from) * frac)
    }
}

/// Close target state, owned by the drag session that showed it
#[derive(Debug)]
pub struct CloseTarget {
    owner: OverlayId,
    surface: Option<SurfaceHandle>,
    diameter: u32,
    margin: i32,
    resting_center: (i32, i32),
    /// Vertical displacement of the displayed target from its resting spot
    offset_y: i32,
    hysteresis: f64,
    highlighted: bool,
    feedback_duration: Duration,
    feedback: Option<Feedback>,
    scale: f64,
}

impl CloseTarget {
    pub fn new(
        owner: OverlayId,
        screen: ScreenSize,
        density: Density,
        settings: &EngineSettings,
    ) -> Self {
        let diameter = density.to_px(coord(settings.close_target_size)).max(1) as u32;
        let margin = density.to_px(coord(settings.close_target_margin));
        let resting_center = (
            screen.center_x(),
            coord(screen.height).saturating_sub((coord(diameter) / 2).saturating_add(margin)),
        );
        Self {
            owner,
            surface: None,
            diameter,
            margin,
            resting_center,
            offset_y: 0,
            hysteresis: settings.close_target_hysteresis,
            highlighted: false,
            feedback_duration: Duration::from_millis(settings.feedback_duration_ms),
            feedback: None,
            scale: 1.0,
        }
    }

    pub fn owner(&self) -> &OverlayId {
        &self.owner
    }

    pub fn is_visible(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn radius(&self) -> f64 {
        self.diameter as f64 / 2.0
    }

    /// Currently displayed center
    pub fn center(&self) -> (i32, i32) {
        (self.resting_center.0, self.resting_center.1 + self.offset_y)
    }

    /// Shift the displayed target vertically away from its resting spot
    pub fn set_vertical_offset(&mut self, offset_y: i32) {
        self.offset_y = offset_y;
    }

    pub fn detection_radius(&self) -> f64 {
        if self.highlighted {
            self.radius() * self.hysteresis
        } else {
            self.radius()
        }
    }

    /// Whether the overlay's center lies inside the detection radius
    pub fn overlaps(&self, geometry: &OverlayGeometry, screen: ScreenSize) -> bool {
        if !self.is_visible() {
            return false;
        }
        let (ox, oy) = geometry.center(screen);
        let (tx, ty) = self.center();
        let dx = ox as f64 - tx as f64;
        let dy = oy as f64 - ty as f64;
        let r = self.detection_radius();
        dx * dx + dy * dy < r * r
    }

    /// Returns true if the state changed
    pub fn highlight(&mut self, now: Instant) -> bool {
        if self.highlighted {
            return false;
        }
        self.highlighted = true;
        self.feedback = Some(Feedback {
            started_at: now,
            duration: self.feedback_duration,
        });
        true
    }

    /// Returns true if the state changed
    pub fn reset<H: WindowHost>(&mut self, host: &mut H) -> bool {
        if !self.highlighted {
            return false;
        }
        self.highlighted = false;
        self.feedback = None;
        self.apply_scale(host, 1.0);
        true
    }

    fn placement(&self, scale: f64) -> SurfacePlacement {
        let size = ((self.diameter as f64 * scale).round() as u32).max(1);
        // bottom-center gravity: grow around the center, not the bottom edge
        let y = self.margin - (size as i32 - self.diameter as i32) / 2 - self.offset_y;
        SurfacePlacement {
            gravity: Gravity::BottomCenter,
            x: 0,
            y,
            width: Extent::Px(size),
            height: Extent::Px(size),
        }
    }

    pub fn show<H: WindowHost>(&mut self, host: &mut H) {
        if self.surface.is_some() {
            return;
        }
        match host.create_surface(
            self.placement(1.0),
            WindowFlag::ClickThrough,
            SurfaceRole::CloseTarget,
        ) {
            Ok(handle) => self.surface = Some(handle),
            Err(e) => warn!(owner = %self.owner, error = %e, "failed to show close target"),
        }
    }

    pub fn hide<H: WindowHost>(&mut self, host: &mut H) {
        self.highlighted = false;
        self.feedback = None;
        self.scale = 1.0;
        if let Some(handle) = self.surface.take()
            && let Err(e) = host.destroy_surface(handle)
        {
            warn!(owner = %self.owner, error = %e, "failed to hide close target");
        }
    }

    /// Advance the highlight feedback. Returns true while it is still running.
    pub fn advance<H: WindowHost>(&mut self, host: &mut H, now: Instant) -> bool {
        let Some(feedback) = self.feedback else {
            return false;
        };
        match feedback.scale_at(now) {
            Some(scale) => {
                self.apply_scale(host, scale);
                true
            }
            None => {
                self.feedback = None;
                self.apply_scale(host, 1.0);
                false
            }
        }
    }

    fn apply_scale<H: WindowHost>(&mut self, host: &mut H, scale: f64) {
        if (self.scale - scale).abs() < f64::EPSILON {
            return;
        }
        self.scale = scale;
        let Some(handle) = self.surface else { return };
        if let Err(e) = host.update_surface(handle, self.placement(scale)) {
            warn!(owner = %self.owner, error = %e, "failed to animate close target");
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;

    const SCREEN: ScreenSize = ScreenSize {
        width: 1000,
        height: 2000,
    };

    fn target(host: &mut HeadlessHost) -> CloseTarget {
        let mut t = CloseTarget::new("a".into(), SCREEN, Density::default(), &EngineSettings::default());
        t.show(host);
        t
    }

    /// 10x10 overlay whose center sits `dx` right of the target center
    fn overlay_at_distance(t: &CloseTarget, dx: i32) -> OverlayGeometry {
        let (cx, cy) = t.center();
        OverlayGeometry::new(cx + dx - 5, cy - 5, Extent::Px(10), Extent::Px(10))
    }

    #[test]
    fn resting_geometry() {
        let mut host = HeadlessHost::new(SCREEN);
        let t = target(&mut host);
        assert_eq!(t.center(), (500, 2000 - (40 + 50)));
        assert_eq!(t.radius(), 40.0);
        assert!(t.is_visible());
    }

    #[test]
    fn boundary_is_not_overlapping_until_highlighted() {
        let mut host = HeadlessHost::new(SCREEN);
        let mut t = target(&mut host);

        assert!(t.overlaps(&overlay_at_distance(&t, 39), SCREEN));
        assert!(!t.overlaps(&overlay_at_distance(&t, 40), SCREEN));

        t.highlight(Instant::now());
        assert!(t.overlaps(&overlay_at_distance(&t, 40), SCREEN));
        assert!(t.overlaps(&overlay_at_distance(&t, 51), SCREEN));
        assert!(!t.overlaps(&overlay_at_distance(&t, 52), SCREEN));
    }

    #[test]
    fn overlap_uses_displayed_center() {
        let mut host = HeadlessHost::new(SCREEN);
        let mut t = target(&mut host);
        let resting = overlay_at_distance(&t, 0);
        t.set_vertical_offset(-300);
        assert!(!t.overlaps(&resting, SCREEN));
        assert!(t.overlaps(&overlay_at_distance(&t, 0), SCREEN));
    }

    #[test]
    fn highlight_and_reset_are_idempotent() {
        let mut host = HeadlessHost::new(SCREEN);
        let mut t = target(&mut host);
        let start = Instant::now();

        assert!(t.highlight(start));
        assert!(t.advance(&mut host, start + Duration::from_millis(150)));
        let mid_scale = t.scale();

        // A second highlight must not restart the bounce
        assert!(!t.highlight(start + Duration::from_millis(150)));
        assert!(t.advance(&mut host, start + Duration::from_millis(150)));
        assert_eq!(t.scale(), mid_scale);

        assert!(t.reset(&mut host));
        assert!(!t.reset(&mut host));
        assert_eq!(t.scale(), 1.0);
    }

    #[test]
    fn bounce_runs_to_completion() {
        let mut host = HeadlessHost::new(SCREEN);
        let mut t = target(&mut host);
        let start = Instant::now();
        t.highlight(start);

        assert!(t.advance(&mut host, start + Duration::from_millis(150)));
        assert!((t.scale() - 1.2).abs() < 1e-9);
        assert!(!t.advance(&mut host, start + Duration::from_millis(600)));
        assert_eq!(t.scale(), 1.0);
        assert!(t.is_highlighted());
    }

    #[test]
    fn hide_destroys_surface() {
        let mut host = HeadlessHost::new(SCREEN);
        let mut t = target(&mut host);
        assert_eq!(host.surface_count(), 1);
        t.hide(&mut host);
        assert_eq!(host.surface_count(), 0);
        assert!(!t.is_visible());
        assert!(!t.overlaps(&overlay_at_distance(&t, 0), SCREEN));
    }
}
