//! Coordinate normalizer
//!
//! Converts between gravity-relative placement ("bottom-right, offset
//! 10,20") and the absolute top-left frame used during interactive
//! operations. Pure functions, one axis at a time.

use floatwin_types::{Gravity, HorizontalAnchor, VerticalAnchor};

use crate::geometry::{OverlayGeometry, ScreenSize, SurfacePlacement, coord};

/// Edge an axis is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisAnchor {
    Leading,
    Center,
    Trailing,
}

impl From<HorizontalAnchor> for AxisAnchor {
    fn from(anchor: HorizontalAnchor) -> Self {
        match anchor {
            HorizontalAnchor::Left => AxisAnchor::Leading,
            HorizontalAnchor::Center => AxisAnchor::Center,
            HorizontalAnchor::Right => AxisAnchor::Trailing,
        }
    }
}

impl From<VerticalAnchor> for AxisAnchor {
    fn from(anchor: VerticalAnchor) -> Self {
        match anchor {
            VerticalAnchor::Top => AxisAnchor::Leading,
            VerticalAnchor::Center => AxisAnchor::Center,
            VerticalAnchor::Bottom => AxisAnchor::Trailing,
        }
    }
}

fn axis_to_absolute(anchor: AxisAnchor, offset: i32, size: i32, screen: i32) -> i32 {
    match anchor {
        AxisAnchor::Leading => offset,
        AxisAnchor::Center => (screen.saturating_sub(size) / 2).saturating_add(offset),
        AxisAnchor::Trailing => screen.saturating_sub(size).saturating_sub(offset),
    }
}

fn axis_to_relative(anchor: AxisAnchor, absolute: i32, size: i32, screen: i32) -> i32 {
    match anchor {
        AxisAnchor::Leading => absolute,
        AxisAnchor::Center => absolute.saturating_sub(screen.saturating_sub(size) / 2),
        AxisAnchor::Trailing => screen.saturating_sub(size).saturating_sub(absolute),
    }
}

/// Gravity-relative offset to absolute top-left coordinate
pub fn to_absolute(
    gravity: Gravity,
    offset: (i32, i32),
    size: (i32, i32),
    screen: ScreenSize,
) -> (i32, i32) {
    (
        axis_to_absolute(
            gravity.horizontal().into(),
            offset.0,
            size.0,
            coord(screen.width),
        ),
        axis_to_absolute(
            gravity.vertical().into(),
            offset.1,
            size.1,
            coord(screen.height),
        ),
    )
}

/// Absolute top-left coordinate to gravity-relative offset
pub fn to_relative(
    gravity: Gravity,
    absolute: (i32, i32),
    size: (i32, i32),
    screen: ScreenSize,
) -> (i32, i32) {
    (
        axis_to_relative(
            gravity.horizontal().into(),
            absolute.0,
            size.0,
            coord(screen.width),
        ),
        axis_to_relative(
            gravity.vertical().into(),
            absolute.1,
            size.1,
            coord(screen.height),
        ),
    )
}

/// Express an absolute geometry as a host placement in the given gravity
pub fn placement_in(gravity: Gravity, geometry: OverlayGeometry, screen: ScreenSize) -> SurfacePlacement {
    let size = (
        geometry.resolved_width(screen),
        geometry.resolved_height(screen),
    );
    let (x, y) = to_relative(gravity, (geometry.x, geometry.y), size, screen);
    SurfacePlacement {
        gravity,
        x,
        y,
        width: geometry.width,
        height: geometry.height,
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
    fn bottom_right_offset() {
        let abs = to_absolute(Gravity::BottomRight, (10, 20), (300, 200), SCREEN);
        assert_eq!(abs, (1080 - 300 - 10, 1920 - 200 - 20));
    }

    #[test]
    fn center_offset() {
        let abs = to_absolute(Gravity::Center, (5, -5), (300, 200), SCREEN);
        assert_eq!(abs, ((1080 - 300) / 2 + 5, (1920 - 200) / 2 - 5));
    }

    #[test]
    fn top_left_is_identity() {
        assert_eq!(
            to_absolute(Gravity::TopLeft, (33, 44), (300, 200), SCREEN),
            (33, 44)
        );
    }

    #[test]
    fn round_trip_all_gravities() {
        let sizes = [(300, 200), (301, 199), (1, 1), (1200, 2400)];
        let offsets = [(0, 0), (10, 20), (-17, 33), (999, -999)];
        for &gravity in Gravity::all() {
            for &size in &sizes {
                for &offset in &offsets {
                    let abs = to_absolute(gravity, offset, size, SCREEN);
                    let back = to_relative(gravity, abs, size, SCREEN);
                    assert!(
                        (back.0 - offset.0).abs() <= 1 && (back.1 - offset.1).abs() <= 1,
                        "{gravity:?} {size:?} {offset:?} -> {abs:?} -> {back:?}"
                    );
                }
            }
        }
    }
}
