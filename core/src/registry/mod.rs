//! Overlay registry
//!
//! Owns every overlay's configuration, geometry, and the single interaction
//! (drag, resize, or snap) currently allowed to mutate it. All mutation goes
//! through `&mut self`, so callers serialize it by construction; the service
//! does that by owning the registry on one task.
//!
//! Coordinates crossing this API are logical units. Internally everything
//! is physical pixels in the absolute top-left frame.

mod pointer;
mod record;


pub use record::{Interaction, OverlayConfig, OverlayRecord};

use std::time::{Duration, Instant};

use floatwin_types::{
    EngineSettings, Extent, Gravity, LogicalSize, OverlayId, OverlaySpec, Position, SnapMode,
    WindowFlag,
};
use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::animation::ResizeAnimator;
use crate::close_target::CloseTarget;
use crate::error::{HostError, OverlayError};
use crate::events::OverlayEvent;
use crate::geometry::{Density, OverlayGeometry, ScreenSize, coord};
use crate::host::{SurfaceHandle, SurfaceRole, WindowHost};
use crate::normalize;

/// Programmatic resize. Sizes are logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeRequest {
    pub width: Extent,
    pub height: Extent,
    pub enable_drag: bool,
    pub enable_close_on_drag: bool,
    pub duration: Duration,
    /// Keep the right edge fixed
    pub anchor_left: bool,
    /// Keep the bottom edge fixed
    pub anchor_top: bool,
}

impl ResizeRequest {
    pub fn new(width: Extent, height: Extent) -> Self {
        Self {
            width,
            height,
            enable_drag: false,
            enable_close_on_drag: false,
            duration: Duration::ZERO,
            anchor_left: false,
            anchor_top: false,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_drag(mut self, enable_drag: bool, enable_close_on_drag: bool) -> Self {
        self.enable_drag = enable_drag;
        self.enable_close_on_drag = enable_close_on_drag;
        self
    }

    pub fn anchored(mut self, anchor_left: bool, anchor_top: bool) -> Self {
        self.anchor_left = anchor_left;
        self.anchor_top = anchor_top;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Host call helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Look up an overlay whose surface is still alive
fn live_record<'a>(
    overlays: &'a mut HashMap<OverlayId, OverlayRecord>,
    id: &OverlayId,
) -> Result<&'a mut OverlayRecord, OverlayError> {
    let record = overlays
        .get_mut(id)
        .ok_or_else(|| OverlayError::UnknownOverlay(id.clone()))?;
    if record.surface.is_none() {
        return Err(OverlayError::SurfaceGone(id.clone()));
    }
    Ok(record)
}

fn mark_lost(id: &OverlayId, record: &mut OverlayRecord, events: &mut Vec<OverlayEvent>) {
    warn!(id = %id, interaction = record.interaction.name(), "host surface lost");
    record.surface = None;
    record.interaction = Interaction::Idle;
    events.push(OverlayEvent::SurfaceLost { id: id.clone() });
}

/// Map a host result onto the overlay. A vanished surface stops the
/// overlay's interaction; a rejection is logged and ignored.
fn degrade(
    result: Result<(), HostError>,
    id: &OverlayId,
    record: &mut OverlayRecord,
    events: &mut Vec<OverlayEvent>,
) -> Result<(), OverlayError> {
    match result {
        Ok(()) => Ok(()),
        Err(HostError::SurfaceGone) => {
            mark_lost(id, record, events);
            Err(OverlayError::SurfaceGone(id.clone()))
        }
        Err(HostError::Rejected(reason)) => {
            warn!(id = %id, %reason, "host rejected overlay update");
            Ok(())
        }
    }
}

/// Push the record's current placement to the host
fn sync_surface<H: WindowHost>(
    host: &mut H,
    id: &OverlayId,
    record: &mut OverlayRecord,
    screen: ScreenSize,
    events: &mut Vec<OverlayEvent>,
) -> Result<(), OverlayError> {
    let Some(handle) = record.surface else {
        return Err(OverlayError::SurfaceGone(id.clone()));
    };
    let result = host.update_surface(handle, record.placement(screen));
    degrade(result, id, record, events)
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

pub struct OverlayRegistry<H: WindowHost> {
    host: H,
    settings: EngineSettings,
    /// Snapshot of the host screen, refreshed at session start
    screen: ScreenSize,
    density: Density,
    overlays: HashMap<OverlayId, OverlayRecord>,
    close_target: Option<CloseTarget>,
    events: Vec<OverlayEvent>,
}

impl<H: WindowHost> OverlayRegistry<H> {
    pub fn new(host: H, settings: EngineSettings) -> Self {
        let screen = host.current_screen_size();
        let density = Density::new(host.display_density());
        Self {
            host,
            settings,
            screen,
            density,
            overlays: HashMap::new(),
            close_target: None,
            events: Vec::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn density(&self) -> Density {
        self.density
    }

    fn refresh_screen(&mut self) {
        self.screen = self.host.current_screen_size();
        self.density = Density::new(self.host.display_density());
    }

    /// Hide the close target if `id`'s drag owns it
    fn release_close_target(&mut self, id: &OverlayId) {
        if let Some(mut target) = self.close_target.take_if(|t| t.owner() == id) {
            target.hide(&mut self.host);
        }
    }

    /// Hide the close target once its owner has stopped dragging without
    /// going through pointer up, e.g. after losing its surface
    fn drop_orphaned_close_target(&mut self) {
        let overlays = &self.overlays;
        if let Some(mut target) = self.close_target.take_if(|t| {
            !overlays
                .get(t.owner())
                .is_some_and(|r| matches!(r.interaction, Interaction::Dragging(_)))
        }) {
            debug!(owner = %target.owner(), "hiding orphaned close target");
            target.hide(&mut self.host);
        }
    }

    // ─── Lifecycle ──────────────────────────────────────────────────────────

    /// Show an overlay. Showing an id whose surface is alive is a no-op.
    pub fn show(&mut self, id: OverlayId, spec: &OverlaySpec) -> Result<(), OverlayError> {
        if self.overlays.get(&id).is_some_and(|r| r.surface.is_some()) {
            debug!(id = %id, "overlay already showing");
            return Ok(());
        }
        // replacing a record whose surface died
        self.release_close_target(&id);

        self.refresh_screen();
        let screen = self.screen;
        let density = self.density;

        let width = density.extent_to_px(spec.width);
        let height = density.extent_to_px(spec.height);
        let offset = spec
            .start
            .map(|o| (density.to_px(o.x), density.to_px(o.y)))
            .unwrap_or_default();
        let size = (
            coord(width.resolve(screen.width)),
            coord(height.resolve(screen.height)),
        );
        let (x, y) = normalize::to_absolute(spec.gravity, offset, size, screen);

        let mut record = OverlayRecord {
            config: OverlayConfig::from(spec),
            geometry: OverlayGeometry::new(x, y, width, height).clamped(screen),
            frame: spec.gravity,
            surface: None,
            interaction: Interaction::Idle,
        };

        match self
            .host
            .create_surface(record.placement(screen), spec.flag, SurfaceRole::Overlay)
        {
            Ok(handle) => record.surface = Some(handle),
            Err(e) => {
                warn!(id = %id, error = %e, "host refused overlay surface");
                return Err(OverlayError::SurfaceRejected(id));
            }
        }

        info!(
            id = %id,
            x = record.geometry.x,
            y = record.geometry.y,
            gravity = ?spec.gravity,
            "overlay shown"
        );
        self.events.push(OverlayEvent::Shown { id: id.clone() });
        self.overlays.insert(id, record);
        Ok(())
    }

    /// Tear an overlay down, cancelling whatever was driving it
    pub fn remove(&mut self, id: &OverlayId) -> Result<(), OverlayError> {
        let record = self
            .overlays
            .remove(id)
            .ok_or_else(|| OverlayError::UnknownOverlay(id.clone()))?;
        self.release_close_target(id);

        if let Some(handle) = record.surface
            && let Err(e) = self.host.destroy_surface(handle)
        {
            warn!(id = %id, error = %e, "failed to destroy overlay surface");
        }

        info!(id = %id, remaining = self.overlays.len(), "overlay removed");
        self.events.push(OverlayEvent::Removed { id: id.clone() });
        if self.overlays.is_empty() {
            info!("all overlays closed");
            self.events.push(OverlayEvent::AllClosed);
        }
        Ok(())
    }

    /// Remove every overlay. Returns how many were removed.
    pub fn remove_all(&mut self) -> usize {
        let mut ids: Vec<OverlayId> = self.overlays.keys().cloned().collect();
        ids.sort();
        let mut removed = 0;
        for id in &ids {
            if self.remove(id).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    // ─── Geometry mutation ──────────────────────────────────────────────────

    /// Place an overlay at an absolute logical position
    pub fn move_to(&mut self, id: &OverlayId, x: f64, y: f64) -> Result<(), OverlayError> {
        self.place(id, x, y, false)
    }

    /// Like `move_to`, and turns automatic snapping off for the overlay
    pub fn move_absolute(&mut self, id: &OverlayId, x: f64, y: f64) -> Result<(), OverlayError> {
        self.place(id, x, y, true)
    }

    fn place(&mut self, id: &OverlayId, x: f64, y: f64, pin: bool) -> Result<(), OverlayError> {
        let (screen, density) = (self.screen, self.density);
        let record = live_record(&mut self.overlays, id)?;

        let cancelled = std::mem::take(&mut record.interaction);
        if pin {
            record.config.snap_mode = SnapMode::None;
        }
        record.normalize_frame();
        record.geometry.x = density.px(x);
        record.geometry.y = density.px(y);
        record.geometry = record.geometry.clamped(screen);
        debug!(
            id = %id,
            x = record.geometry.x,
            y = record.geometry.y,
            cancelled = cancelled.name(),
            "overlay moved"
        );

        let result = sync_surface(&mut self.host, id, record, screen, &mut self.events);
        if matches!(cancelled, Interaction::Dragging(_)) {
            self.release_close_target(id);
        }
        result
    }

    /// Resize an overlay, animated unless the duration is zero
    pub fn resize(
        &mut self,
        id: &OverlayId,
        request: ResizeRequest,
        now: Instant,
    ) -> Result<(), OverlayError> {
        self.refresh_screen();
        let (screen, density) = (self.screen, self.density);
        let record = live_record(&mut self.overlays, id)?;

        record.config.enable_drag = request.enable_drag;
        record.config.enable_close_on_drag = request.enable_close_on_drag;
        record.config.width = request.width;
        record.config.height = request.height;

        let cancelled = std::mem::take(&mut record.interaction);
        record.normalize_frame();

        let animator = ResizeAnimator::new(
            record.geometry,
            density.extent_to_px(request.width),
            density.extent_to_px(request.height),
            request.anchor_left,
            request.anchor_top,
            now,
            request.duration,
        );
        if request.duration.is_zero() {
            record.geometry = animator.frame(now, screen).geometry;
        } else {
            record.interaction = Interaction::Resizing(animator);
        }
        debug!(
            id = %id,
            width = ?request.width,
            height = ?request.height,
            duration_ms = request.duration.as_millis() as u64,
            cancelled = cancelled.name(),
            "resize started"
        );

        let result = sync_surface(&mut self.host, id, record, screen, &mut self.events);
        if matches!(cancelled, Interaction::Dragging(_)) {
            self.release_close_target(id);
        }
        result
    }

    pub fn update_flag(&mut self, id: &OverlayId, flag: WindowFlag) -> Result<(), OverlayError> {
        let record = live_record(&mut self.overlays, id)?;
        record.config.flag = flag;
        let Some(handle) = record.surface else {
            return Err(OverlayError::SurfaceGone(id.clone()));
        };
        debug!(id = %id, ?flag, "updating window flag");
        let result = self.host.update_surface_flags(handle, flag);
        let result = degrade(result, id, record, &mut self.events);
        self.drop_orphaned_close_target();
        result
    }

    /// Re-read the screen after a rotation or display change and keep every
    /// overlay on it. Overlays still placed by gravity keep their offset.
    pub fn on_screen_changed(&mut self) {
        let previous = self.screen;
        self.refresh_screen();
        let screen = self.screen;
        info!(width = screen.width, height = screen.height, "screen changed");

        for (id, record) in self.overlays.iter_mut() {
            if record.surface.is_none() {
                continue;
            }
            if record.frame != Gravity::TopLeft {
                let placement = record.placement(previous);
                let size = (
                    record.geometry.resolved_width(screen),
                    record.geometry.resolved_height(screen),
                );
                let (x, y) =
                    normalize::to_absolute(record.frame, (placement.x, placement.y), size, screen);
                record.geometry.x = x;
                record.geometry.y = y;
            }
            record.geometry = record.geometry.clamped(screen);
            if let Err(e) = sync_surface(&mut self.host, id, record, screen, &mut self.events) {
                debug!(error = %e, "skipping overlay after screen change");
            }
        }
        self.drop_orphaned_close_target();
    }

    // ─── Scheduler ──────────────────────────────────────────────────────────

    /// Advance every running animator. Returns true while anything is
    /// still animating.
    pub fn tick(&mut self, now: Instant) -> bool {
        let (screen, density) = (self.screen, self.density);
        let mut animating = false;

        for (id, record) in self.overlays.iter_mut() {
            let frame = match &mut record.interaction {
                Interaction::Resizing(anim) => Some(anim.frame(now, screen)),
                Interaction::Snapping(anim) => anim.tick(now, record.geometry, screen),
                Interaction::Idle | Interaction::Dragging(_) => None,
            };
            if let Some(frame) = frame {
                record.geometry = frame.geometry;
                if frame.finished {
                    if let Interaction::Snapping(_) = record.interaction {
                        debug!(id = %id, x = frame.geometry.x, "snap finished");
                        self.events.push(OverlayEvent::SnapFinished {
                            id: id.clone(),
                            position: density.position(frame.geometry.x, frame.geometry.y),
                        });
                    }
                    record.interaction = Interaction::Idle;
                }
                if let Err(e) = sync_surface(&mut self.host, id, record, screen, &mut self.events)
                {
                    debug!(error = %e, "animation stopped");
                }
            }
            animating |= record.interaction.is_animating();
        }

        self.drop_orphaned_close_target();
        if let Some(target) = self.close_target.as_mut() {
            animating |= target.advance(&mut self.host, now);
        }
        animating
    }

    // ─── Reads ──────────────────────────────────────────────────────────────

    pub fn position(&self, id: &OverlayId) -> Option<Position> {
        let record = self.overlays.get(id)?;
        Some(self.density.position(record.geometry.x, record.geometry.y))
    }

    /// Physical geometry, absolute top-left frame
    pub fn geometry(&self, id: &OverlayId) -> Option<OverlayGeometry> {
        self.overlays.get(id).map(|r| r.geometry)
    }

    pub fn config(&self, id: &OverlayId) -> Option<&OverlayConfig> {
        self.overlays.get(id).map(|r| &r.config)
    }

    pub fn interaction(&self, id: &OverlayId) -> Option<&Interaction> {
        self.overlays.get(id).map(|r| &r.interaction)
    }

    pub fn surface(&self, id: &OverlayId) -> Option<SurfaceHandle> {
        self.overlays.get(id).and_then(|r| r.surface)
    }

    pub fn is_active(&self, id: &OverlayId) -> bool {
        self.surface(id).is_some()
    }

    /// Ids with a live surface, sorted
    pub fn list_active(&self) -> Vec<OverlayId> {
        let mut ids: Vec<OverlayId> = self
            .overlays
            .iter()
            .filter(|(_, r)| r.surface.is_some())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Current screen size in logical units
    pub fn screen_size(&self) -> LogicalSize {
        let density = Density::new(self.host.display_density());
        density.logical_size(self.host.current_screen_size())
    }

    pub fn close_target(&self) -> Option<&CloseTarget> {
        self.close_target.as_ref()
    }

    /// Take the notifications produced since the last call
    pub fn drain_events(&mut self) -> Vec<OverlayEvent> {
        std::mem::take(&mut self.events)
    }
}
