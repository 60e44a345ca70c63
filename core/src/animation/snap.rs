//! Snap animator
//!
//! After a drag release, eases the overlay horizontally toward a screen
//! edge. Each step covers two thirds of the remaining distance; there is no
//! fixed duration. The vertical destination is the release position.

use std::time::{Duration, Instant};

use floatwin_types::SnapMode;

use super::Frame;
use crate::geometry::{OverlayGeometry, ScreenSize, coord};

/// Resolve the destination for a snap mode, or `None` when snapping is off
pub fn destination(
    mode: SnapMode,
    geometry: &OverlayGeometry,
    screen: ScreenSize,
) -> Option<(i32, i32)> {
    let width = geometry.resolved_width(screen);
    let right = coord(screen.width).saturating_sub(width).max(0);
    let x = match mode {
        SnapMode::None => return None,
        SnapMode::Left => 0,
        SnapMode::Right => right,
        SnapMode::Auto => {
            if geometry.x.saturating_add(width / 2) <= screen.center_x() {
                0
            } else {
                right
            }
        }
    };
    Some((x, geometry.y))
}

/// One ease-out step toward `dest`
fn step_toward(pos: i32, dest: i32) -> i32 {
    pos + ((dest - pos) as f64 * 2.0 / 3.0).round() as i32
}

/// Eases a released overlay toward its snap edge
#[derive(Debug, Clone)]
pub struct SnapAnimator {
    dest: (i32, i32),
    settle_px: i32,
    interval: Duration,
    next_due: Instant,
}

impl SnapAnimator {
    pub fn new(
        mode: SnapMode,
        geometry: &OverlayGeometry,
        screen: ScreenSize,
        settle_px: u32,
        interval: Duration,
        now: Instant,
    ) -> Option<Self> {
        let dest = destination(mode, geometry, screen)?;
        Some(Self {
            dest,
            settle_px: settle_px as i32,
            interval,
            next_due: now,
        })
    }

    pub fn destination(&self) -> (i32, i32) {
        self.dest
    }

    /// Pure single step from the given geometry
    pub fn step(&self, current: OverlayGeometry, screen: ScreenSize) -> Frame {
        let mut next = current;
        next.x = step_toward(current.x, self.dest.0);
        next.y = step_toward(current.y, self.dest.1);

        let settled = (next.x - self.dest.0).abs() <= self.settle_px
            && (next.y - self.dest.1).abs() <= self.settle_px;
        if settled {
            next.x = self.dest.0;
            next.y = self.dest.1;
        }
        Frame {
            geometry: next.clamped(screen),
            finished: settled,
        }
    }

    /// Advance if a step is due. Steps never burst to catch up.
    pub fn tick(
        &mut self,
        now: Instant,
        current: OverlayGeometry,
        screen: ScreenSize,
    ) -> Option<Frame> {
        if now < self.next_due {
            return None;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        Some(self.step(current, screen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatwin_types::Extent;

    const SCREEN: ScreenSize = ScreenSize {
        width: 1080,
        height: 1920,
    };

    fn overlay(x: i32, y: i32) -> OverlayGeometry {
        OverlayGeometry::new(x, y, Extent::Px(80), Extent::Px(80))
    }

    #[test]
    fn destinations() {
        let g = overlay(300, 700);
        assert_eq!(destination(SnapMode::None, &g, SCREEN), None);
        assert_eq!(destination(SnapMode::Left, &g, SCREEN), Some((0, 700)));
        assert_eq!(destination(SnapMode::Right, &g, SCREEN), Some((1000, 700)));
        assert_eq!(destination(SnapMode::Auto, &g, SCREEN), Some((0, 700)));
        assert_eq!(
            destination(SnapMode::Auto, &overlay(600, 700), SCREEN),
            Some((1000, 700))
        );
        // center exactly on the screen center goes left
        assert_eq!(
            destination(SnapMode::Auto, &overlay(500, 10), SCREEN),
            Some((0, 10))
        );
    }

    #[test]
    fn converges_from_far_away() {
        let screen = ScreenSize::new(4000, 1920);
        let now = Instant::now();
        let mut g = OverlayGeometry::new(1000, 50, Extent::Px(80), Extent::Px(80));
        let anim = SnapAnimator::new(SnapMode::Left, &g, screen, 2, Duration::from_millis(25), now)
            .expect("snap enabled");

        let mut ticks = 0;
        loop {
            let frame = anim.step(g, screen);
            ticks += 1;
            g = frame.geometry;
            if frame.finished {
                break;
            }
            assert!(ticks < 12, "did not converge");
        }
        assert_eq!((g.x, g.y), (0, 50));
        assert!(ticks <= 12);
    }

    #[test]
    fn first_step_covers_two_thirds() {
        let now = Instant::now();
        let g = overlay(900, 100);
        let anim = SnapAnimator::new(SnapMode::Left, &g, SCREEN, 2, Duration::from_millis(25), now)
            .expect("snap enabled");
        let frame = anim.step(g, SCREEN);
        assert_eq!(frame.geometry.x, 300);
        assert!(!frame.finished);
    }

    #[test]
    fn tick_respects_interval() {
        let now = Instant::now();
        let g = overlay(900, 100);
        let mut anim =
            SnapAnimator::new(SnapMode::Left, &g, SCREEN, 2, Duration::from_millis(25), now)
                .expect("snap enabled");

        assert!(anim.tick(now, g, SCREEN).is_some());
        assert!(anim.tick(now + Duration::from_millis(10), g, SCREEN).is_none());
        assert!(anim.tick(now + Duration::from_millis(25), g, SCREEN).is_some());
        // a long stall yields one step, not a burst
        assert!(anim.tick(now + Duration::from_millis(500), g, SCREEN).is_some());
        assert!(anim.tick(now + Duration::from_millis(510), g, SCREEN).is_none());
    }

    #[test]
    fn already_at_destination_finishes_immediately() {
        let g = overlay(0, 100);
        let anim = SnapAnimator::new(
            SnapMode::Left,
            &g,
            SCREEN,
            2,
            Duration::from_millis(25),
            Instant::now(),
        )
        .expect("snap enabled");
        let frame = anim.step(g, SCREEN);
        assert!(frame.finished);
        assert_eq!(frame.geometry, g);
    }
}
