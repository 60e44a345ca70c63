//! Host window-manager boundary
//!
//! The engine never draws anything. It asks a `WindowHost` to create, place
//! and destroy surfaces, and to report the screen it is placing them on.
//! Every call happens on the engine's mutation task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use floatwin_types::WindowFlag;
use hashbrown::HashMap;

use crate::error::HostError;
use crate::geometry::{ScreenSize, SurfacePlacement};

/// Opaque handle to a host surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// What a surface is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    /// An overlay rendering embedded content
    Overlay,
    /// The close-target drop zone; never touchable or focusable
    CloseTarget,
}

/// Trait that every host window manager must implement
pub trait WindowHost: Send + 'static {
    /// Create a surface at the given placement
    fn create_surface(
        &mut self,
        placement: SurfacePlacement,
        flags: WindowFlag,
        role: SurfaceRole,
    ) -> Result<SurfaceHandle, HostError>;

    /// Move and/or resize an existing surface
    fn update_surface(
        &mut self,
        handle: SurfaceHandle,
        placement: SurfacePlacement,
    ) -> Result<(), HostError>;

    /// Change the interaction flags of an existing surface
    fn update_surface_flags(
        &mut self,
        handle: SurfaceHandle,
        flags: WindowFlag,
    ) -> Result<(), HostError>;

    /// Tear a surface down
    fn destroy_surface(&mut self, handle: SurfaceHandle) -> Result<(), HostError>;

    /// Current screen size in physical pixels
    fn current_screen_size(&self) -> ScreenSize;

    /// Physical pixels per logical unit
    fn display_density(&self) -> f64 {
        1.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless Host
// ─────────────────────────────────────────────────────────────────────────────

/// A surface as tracked by the headless host
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSurface {
    pub placement: SurfacePlacement,
    pub flags: WindowFlag,
    pub role: SurfaceRole,
    /// Number of placement updates received since creation
    pub updates: usize,
}

/// Inspectable state behind a `HeadlessHost`
#[derive(Debug, Default)]
pub struct HeadlessState {
    pub screen: ScreenSize,
    pub density: f64,
    pub surfaces: HashMap<SurfaceHandle, HeadlessSurface>,
    /// Surfaces the "compositor" dropped behind the engine's back
    pub lost: Vec<SurfaceHandle>,
    /// When set, the next host call fails with this rejection
    pub reject_next: Option<String>,
    next_handle: u64,
}

impl HeadlessState {
    pub fn surfaces_with_role(&self, role: SurfaceRole) -> Vec<(SurfaceHandle, &HeadlessSurface)> {
        let mut found: Vec<_> = self
            .surfaces
            .iter()
            .filter(|(_, s)| s.role == role)
            .map(|(h, s)| (*h, s))
            .collect();
        found.sort_by_key(|(h, _)| h.0);
        found
    }

    fn check(&mut self, handle: SurfaceHandle) -> Result<&mut HeadlessSurface, HostError> {
        if let Some(reason) = self.reject_next.take() {
            return Err(HostError::Rejected(reason));
        }
        if self.lost.contains(&handle) {
            return Err(HostError::SurfaceGone);
        }
        self.surfaces.get_mut(&handle).ok_or(HostError::SurfaceGone)
    }
}

/// In-memory host used by tests and the CLI. Clones share state, so a
/// caller can keep one clone to inspect what the engine did with another.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessHost {
    pub fn new(screen: ScreenSize) -> Self {
        Self::with_density(screen, 1.0)
    }

    pub fn with_density(screen: ScreenSize, density: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState {
                screen,
                density,
                ..HeadlessState::default()
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate a rotation or display change
    pub fn set_screen(&self, screen: ScreenSize) {
        self.state().screen = screen;
    }

    /// Simulate the compositor dropping a surface
    pub fn lose_surface(&self, handle: SurfaceHandle) {
        let mut state = self.state();
        state.surfaces.remove(&handle);
        state.lost.push(handle);
    }

    /// Make the next host call fail with a rejection
    pub fn reject_next(&self, reason: &str) {
        self.state().reject_next = Some(reason.to_string());
    }

    pub fn surface(&self, handle: SurfaceHandle) -> Option<HeadlessSurface> {
        self.state().surfaces.get(&handle).cloned()
    }

    pub fn surface_count(&self) -> usize {
        self.state().surfaces.len()
    }
}

impl WindowHost for HeadlessHost {
    fn create_surface(
        &mut self,
        placement: SurfacePlacement,
        flags: WindowFlag,
        role: SurfaceRole,
    ) -> Result<SurfaceHandle, HostError> {
        let mut state = self.state();
        if let Some(reason) = state.reject_next.take() {
            return Err(HostError::Rejected(reason));
        }
        state.next_handle += 1;
        let handle = SurfaceHandle(state.next_handle);
        state.surfaces.insert(
            handle,
            HeadlessSurface {
                placement,
                flags,
                role,
                updates: 0,
            },
        );
        Ok(handle)
    }

    fn update_surface(
        &mut self,
        handle: SurfaceHandle,
        placement: SurfacePlacement,
    ) -> Result<(), HostError> {
        let mut state = self.state();
        let surface = state.check(handle)?;
        surface.placement = placement;
        surface.updates += 1;
        Ok(())
    }

    fn update_surface_flags(
        &mut self,
        handle: SurfaceHandle,
        flags: WindowFlag,
    ) -> Result<(), HostError> {
        let mut state = self.state();
        state.check(handle)?.flags = flags;
        Ok(())
    }

    fn destroy_surface(&mut self, handle: SurfaceHandle) -> Result<(), HostError> {
        let mut state = self.state();
        state.check(handle)?;
        state.surfaces.remove(&handle);
        Ok(())
    }

    fn current_screen_size(&self) -> ScreenSize {
        self.state().screen
    }

    fn display_density(&self) -> f64 {
        self.state().density
    }
}
