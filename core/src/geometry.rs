//! Geometry model
//!
//! Plain data describing where an overlay sits on screen, plus the clamp
//! that keeps it there. Everything in this module is in physical pixels
//! unless a name says otherwise.

use floatwin_types::{Extent, Gravity, LogicalSize, Position};

/// Largest concrete extent the engine works with. Bigger requests are
/// saturated to it so coordinate arithmetic stays inside `i32`.
pub const MAX_EXTENT_PX: u32 = 1 << 20;

/// Pixel count as a coordinate, saturating at `i32::MAX`
pub fn coord(px: u32) -> i32 {
    i32::try_from(px).unwrap_or(i32::MAX)
}

/// Screen size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center_x(&self) -> i32 {
        coord(self.width) / 2
    }
}

/// Conversion factor between logical units and physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density(f64);

impl Density {
    pub fn new(factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            Self(factor)
        } else {
            Self(1.0)
        }
    }

    pub fn factor(&self) -> f64 {
        self.0
    }

    /// Logical units to physical pixels
    pub fn to_px(&self, logical: i32) -> i32 {
        self.px(logical as f64)
    }

    /// Fractional logical coordinate to physical pixels
    pub fn px(&self, logical: f64) -> i32 {
        (logical * self.0).round() as i32
    }

    /// Logical extent to physical extent; fill stays fill
    pub fn extent_to_px(&self, extent: Extent) -> Extent {
        match extent {
            Extent::Px(dp) => {
                let px = (dp as f64 * self.0).round().min(MAX_EXTENT_PX as f64);
                Extent::Px(px as u32)
            }
            Extent::Fill => Extent::Fill,
        }
    }

    pub fn to_logical(&self, px: i32) -> f64 {
        px as f64 / self.0
    }

    pub fn position(&self, x: i32, y: i32) -> Position {
        Position {
            x: self.to_logical(x),
            y: self.to_logical(y),
        }
    }

    pub fn logical_size(&self, screen: ScreenSize) -> LogicalSize {
        LogicalSize {
            width: screen.width as f64 / self.0,
            height: screen.height as f64 / self.0,
        }
    }
}

impl Default for Density {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Current absolute top-left position and size of one overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayGeometry {
    pub x: i32,
    pub y: i32,
    pub width: Extent,
    pub height: Extent,
}

impl OverlayGeometry {
    pub fn new(x: i32, y: i32, width: Extent, height: Extent) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn resolved_width(&self, screen: ScreenSize) -> i32 {
        coord(self.width.resolve(screen.width))
    }

    pub fn resolved_height(&self, screen: ScreenSize) -> i32 {
        coord(self.height.resolve(screen.height))
    }

    /// Geometric center in absolute coordinates
    pub fn center(&self, screen: ScreenSize) -> (i32, i32) {
        (
            self.x.saturating_add(self.resolved_width(screen) / 2),
            self.y.saturating_add(self.resolved_height(screen) / 2),
        )
    }

    /// Keep the bounding box on screen, each axis independently. Sizes wider
    /// than the screen pin the coordinate to 0. Concrete sizes are kept
    /// within `1..=MAX_EXTENT_PX`.
    pub fn clamped(mut self, screen: ScreenSize) -> Self {
        self.width = bounded(self.width);
        self.height = bounded(self.height);
        let max_x = coord(screen.width)
            .saturating_sub(self.resolved_width(screen))
            .max(0);
        let max_y = coord(screen.height)
            .saturating_sub(self.resolved_height(screen))
            .max(0);
        self.x = self.x.clamp(0, max_x);
        self.y = self.y.clamp(0, max_y);
        self
    }

    pub fn is_within(&self, screen: ScreenSize) -> bool {
        *self == self.clamped(screen)
    }
}

fn bounded(extent: Extent) -> Extent {
    match extent {
        Extent::Px(px) => Extent::Px(px.clamp(1, MAX_EXTENT_PX)),
        Extent::Fill => Extent::Fill,
    }
}

/// What the host needs to place a surface: a gravity, an offset relative to
/// that gravity, and a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfacePlacement {
    pub gravity: Gravity,
    pub x: i32,
    pub y: i32,
    pub width: Extent,
    pub height: Extent,
}

impl SurfacePlacement {
    /// Placement in the absolute top-left frame
    pub fn absolute(geometry: OverlayGeometry) -> Self {
        Self {
            gravity: Gravity::TopLeft,
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenSize = ScreenSize {
        width: 1080,
        height: 1920,
    };

    #[test]
    fn clamp_keeps_box_on_screen() {
        let g = OverlayGeometry::new(-40, 5000, Extent::Px(300), Extent::Px(200)).clamped(SCREEN);
        assert_eq!((g.x, g.y), (0, 1720));

        let g = OverlayGeometry::new(900, 10, Extent::Px(300), Extent::Px(200)).clamped(SCREEN);
        assert_eq!((g.x, g.y), (780, 10));
    }

    #[test]
    fn clamp_oversized_and_fill_pin_to_zero() {
        let g = OverlayGeometry::new(50, 50, Extent::Px(2000), Extent::Fill).clamped(SCREEN);
        assert_eq!((g.x, g.y), (0, 0));
    }

    #[test]
    fn clamp_grows_empty_size() {
        let g = OverlayGeometry::new(10, 10, Extent::Px(0), Extent::Px(0)).clamped(SCREEN);
        assert_eq!(g.width, Extent::Px(1));
        assert_eq!(g.height, Extent::Px(1));
    }

    #[test]
    fn density_conversions() {
        let d = Density::new(2.625);
        assert_eq!(d.to_px(80), 210);
        assert_eq!(d.extent_to_px(Extent::Px(100)), Extent::Px(263));
        assert_eq!(d.extent_to_px(Extent::Fill), Extent::Fill);
        assert_eq!(d.to_logical(210), 80.0);
        assert_eq!(Density::new(0.0).factor(), 1.0);
    }

    #[test]
    fn huge_sizes_saturate_instead_of_wrapping() {
        let d = Density::new(2.0);
        assert_eq!(
            d.extent_to_px(Extent::Px(1_073_741_824)),
            Extent::Px(MAX_EXTENT_PX)
        );

        let g = OverlayGeometry::new(600, 40, Extent::Px(u32::MAX), Extent::Px(100))
            .clamped(SCREEN);
        assert_eq!((g.x, g.y), (0, 40));
        assert_eq!(g.width, Extent::Px(MAX_EXTENT_PX));

        let wide = OverlayGeometry::new(i32::MAX, 0, Extent::Px(u32::MAX), Extent::Px(1));
        assert_eq!(wide.resolved_width(SCREEN), i32::MAX);
        assert_eq!(wide.center(SCREEN).0, i32::MAX);
    }
}
