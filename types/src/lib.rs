//! Shared configuration types for floatwin
//!
//! This crate contains the serializable vocabulary shared between the
//! geometry engine (floatwin-core) and whatever embeds it: placement
//! gravities, snap modes, window flags, overlay specs and engine settings.
//! Everything here is plain data; behavior lives in floatwin-core.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Stable identifier of one overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(String);

impl OverlayId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OverlayId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OverlayId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Placement
// ─────────────────────────────────────────────────────────────────────────────

/// Horizontal component of a gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

/// Vertical component of a gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Center,
    Bottom,
}

/// Compass-style anchor defining how an offset is interpreted relative to
/// the screen edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gravity {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Gravity {
    pub fn horizontal(self) -> HorizontalAnchor {
        match self {
            Gravity::TopLeft | Gravity::CenterLeft | Gravity::BottomLeft => HorizontalAnchor::Left,
            Gravity::TopCenter | Gravity::Center | Gravity::BottomCenter => {
                HorizontalAnchor::Center
            }
            Gravity::TopRight | Gravity::CenterRight | Gravity::BottomRight => {
                HorizontalAnchor::Right
            }
        }
    }

    pub fn vertical(self) -> VerticalAnchor {
        match self {
            Gravity::TopLeft | Gravity::TopCenter | Gravity::TopRight => VerticalAnchor::Top,
            Gravity::CenterLeft | Gravity::Center | Gravity::CenterRight => VerticalAnchor::Center,
            Gravity::BottomLeft | Gravity::BottomCenter | Gravity::BottomRight => {
                VerticalAnchor::Bottom
            }
        }
    }

    /// All nine gravities
    pub fn all() -> &'static [Gravity] {
        &[
            Gravity::TopLeft,
            Gravity::TopCenter,
            Gravity::TopRight,
            Gravity::CenterLeft,
            Gravity::Center,
            Gravity::CenterRight,
            Gravity::BottomLeft,
            Gravity::BottomCenter,
            Gravity::BottomRight,
        ]
    }

    /// Parse from the alignment names used by overlay content
    pub fn from_alignment(name: &str) -> Option<Self> {
        match name {
            "topLeft" => Some(Gravity::TopLeft),
            "topCenter" => Some(Gravity::TopCenter),
            "topRight" => Some(Gravity::TopRight),
            "centerLeft" => Some(Gravity::CenterLeft),
            "center" => Some(Gravity::Center),
            "centerRight" => Some(Gravity::CenterRight),
            "bottomLeft" => Some(Gravity::BottomLeft),
            "bottomCenter" => Some(Gravity::BottomCenter),
            "bottomRight" => Some(Gravity::BottomRight),
            _ => None,
        }
    }
}

impl FromStr for Gravity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_alignment(s).ok_or_else(|| format!("unknown gravity '{s}'"))
    }
}

/// Post-drag horizontal re-alignment policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapMode {
    #[default]
    None,
    Auto,
    Left,
    Right,
}

impl FromStr for SnapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SnapMode::None),
            "auto" => Ok(SnapMode::Auto),
            "left" => Ok(SnapMode::Left),
            "right" => Ok(SnapMode::Right),
            _ => Err(format!("unknown snap mode '{s}'")),
        }
    }
}

/// Window interaction flags handed to the host when a surface is created
/// or its flags are updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowFlag {
    /// Neither touchable nor focusable; input passes through
    #[serde(rename = "clickThrough")]
    ClickThrough,
    /// Touchable but never takes focus
    #[default]
    #[serde(rename = "flagNotFocusable", alias = "defaultFlag")]
    NotFocusable,
    /// Focusable so text input can request the keyboard, without capturing
    /// touches outside the surface
    #[serde(rename = "focusPointer")]
    FocusPointer,
}

impl WindowFlag {
    pub fn is_touchable(self) -> bool {
        !matches!(self, WindowFlag::ClickThrough)
    }

    pub fn is_focusable(self) -> bool {
        matches!(self, WindowFlag::FocusPointer)
    }
}

impl FromStr for WindowFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clickThrough" => Ok(WindowFlag::ClickThrough),
            "flagNotFocusable" | "defaultFlag" => Ok(WindowFlag::NotFocusable),
            "focusPointer" => Ok(WindowFlag::FocusPointer),
            _ => Err(format!("unknown window flag '{s}'")),
        }
    }
}

/// One dimension of an overlay: a concrete pixel count or "fill available
/// space". The unit (logical or physical) depends on where it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extent {
    Px(u32),
    Fill,
}

impl Extent {
    /// Sentinel values overlay content uses for "match parent"
    pub const FILL_SENTINELS: [i32; 2] = [-1, -1999];

    /// Map a raw requested dimension onto an extent. Fill sentinels map to
    /// `Fill`; any other non-positive value becomes an empty extent and is
    /// clamped later.
    pub fn from_request(value: i32) -> Self {
        if Self::FILL_SENTINELS.contains(&value) {
            Extent::Fill
        } else {
            Extent::Px(value.max(0) as u32)
        }
    }

    pub fn is_fill(self) -> bool {
        matches!(self, Extent::Fill)
    }

    /// Concrete size given the extent of the screen along the same axis
    pub fn resolve(self, screen_extent: u32) -> u32 {
        match self {
            Extent::Px(px) => px,
            Extent::Fill => screen_extent,
        }
    }
}

impl Default for Extent {
    fn default() -> Self {
        Extent::Fill
    }
}

/// Integer offset in logical units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

/// Position reported back to callers, in logical units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Screen size reported back to callers, in logical units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlay Spec
// ─────────────────────────────────────────────────────────────────────────────

/// Everything needed to show an overlay. Dimensions and the start offset
/// are in logical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    #[serde(default)]
    pub width: Extent,
    #[serde(default)]
    pub height: Extent,
    #[serde(default)]
    pub gravity: Gravity,
    #[serde(default)]
    pub flag: WindowFlag,
    #[serde(default)]
    pub enable_drag: bool,
    #[serde(default)]
    pub snap_mode: SnapMode,
    /// Gravity-relative start offset; `None` places the overlay at offset 0,0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Offset>,
}

impl Default for OverlaySpec {
    fn default() -> Self {
        Self {
            width: Extent::Fill,
            height: Extent::Fill,
            gravity: Gravity::Center,
            flag: WindowFlag::NotFocusable,
            enable_drag: false,
            snap_mode: SnapMode::None,
            start: None,
        }
    }
}

impl OverlaySpec {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width: Extent::Px(width),
            height: Extent::Px(height),
            ..Self::default()
        }
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, snap_mode: SnapMode) -> Self {
        self.enable_drag = true;
        self.snap_mode = snap_mode;
        self
    }

    pub fn with_start(mut self, x: i32, y: i32) -> Self {
        self.start = Some(Offset { x, y });
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Settings
// ─────────────────────────────────────────────────────────────────────────────

fn default_tick_interval_ms() -> u64 {
    16
}
fn default_snap_interval_ms() -> u64 {
    25
}
fn default_snap_settle_px() -> u32 {
    2
}
fn default_drag_debounce_sq_px() -> f32 {
    25.0
}
fn default_close_target_size() -> u32 {
    80
}
fn default_close_target_margin() -> u32 {
    50
}
fn default_close_target_hysteresis() -> f64 {
    1.3
}
fn default_feedback_duration_ms() -> u64 {
    600
}
fn default_content_resize_duration_ms() -> u64 {
    500
}

/// Tunables for the geometry engine. Sizes are logical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_snap_interval_ms")]
    pub snap_interval_ms: u64,
    #[serde(default = "default_snap_settle_px")]
    pub snap_settle_px: u32,
    #[serde(default = "default_drag_debounce_sq_px")]
    pub drag_debounce_sq_px: f32,
    #[serde(default = "default_close_target_size")]
    pub close_target_size: u32,
    #[serde(default = "default_close_target_margin")]
    pub close_target_margin: u32,
    #[serde(default = "default_close_target_hysteresis")]
    pub close_target_hysteresis: f64,
    #[serde(default = "default_feedback_duration_ms")]
    pub feedback_duration_ms: u64,
    #[serde(default = "default_content_resize_duration_ms")]
    pub content_resize_duration_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            snap_interval_ms: default_snap_interval_ms(),
            snap_settle_px: default_snap_settle_px(),
            drag_debounce_sq_px: default_drag_debounce_sq_px(),
            close_target_size: default_close_target_size(),
            close_target_margin: default_close_target_margin(),
            close_target_hysteresis: default_close_target_hysteresis(),
            feedback_duration_ms: default_feedback_duration_ms(),
            content_resize_duration_ms: default_content_resize_duration_ms(),
        }
    }
}
