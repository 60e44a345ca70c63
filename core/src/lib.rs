//! Window-geometry coordination engine for floating overlays
//!
//! The engine decides where each overlay sits and how it moves. It never
//! draws: surfaces are created and placed by a [`WindowHost`].
//!
//! ```text
//! pointer events ─┐
//! content bridge ─┼─▶ ServiceHandle ─▶ OverlayService ─▶ OverlayRegistry
//! embedding app ──┘                                      │  per overlay:
//!                                                        │  config, geometry,
//!                                                        │  one interaction
//!                                                        │  (drag | resize | snap)
//!                                                        ▼
//!                                                    WindowHost
//! ```

pub mod animation;
pub mod bridge;
pub mod close_target;
pub mod config;
pub mod drag;
pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod normalize;
pub mod registry;
pub mod service;

pub use bridge::{ContentBridge, ContentReply, ContentRequest};
pub use config::EngineSettingsExt;
pub use drag::{PointerAction, PointerEvent};
pub use error::{ConfigError, HostError, OverlayError};
pub use events::OverlayEvent;
pub use geometry::{Density, OverlayGeometry, ScreenSize, SurfacePlacement};
pub use host::{HeadlessHost, SurfaceHandle, SurfaceRole, WindowHost};
pub use registry::{OverlayRegistry, ResizeRequest};
pub use service::{OverlayCommand, OverlayService, ServiceHandle};

pub use floatwin_types as types;
