//! Pointer input: drives the drag session of one overlay

use std::time::{Duration, Instant};

use floatwin_types::OverlayId;
use tracing::{debug, info};

use super::{Interaction, OverlayRegistry, sync_surface};
use crate::animation::SnapAnimator;
use crate::close_target::CloseTarget;
use crate::drag::{DragRelease, DragSession, PointerAction, PointerEvent};
use crate::events::OverlayEvent;
use crate::geometry::OverlayGeometry;
use crate::host::WindowHost;

impl<H: WindowHost> OverlayRegistry<H> {
    /// Feed a raw pointer event for an overlay. Returns true if a drag
    /// session handled it. Events for unknown overlays, dead surfaces, or
    /// overlays without drag enabled are ignored.
    pub fn pointer(&mut self, id: &OverlayId, event: PointerEvent, now: Instant) -> bool {
        match event.action {
            PointerAction::Down => self.pointer_down(id, event),
            PointerAction::Move => self.pointer_move(id, event, now),
            PointerAction::Up | PointerAction::Cancel => self.pointer_up(id, now),
        }
    }

    fn pointer_down(&mut self, id: &OverlayId, event: PointerEvent) -> bool {
        let draggable = self
            .overlays
            .get(id)
            .is_some_and(|r| r.surface.is_some() && r.config.enable_drag);
        if !draggable {
            return false;
        }

        self.refresh_screen();
        let (screen, density) = (self.screen, self.density);
        let debounce = self.settings.drag_debounce_sq_px;
        let Some(record) = self.overlays.get_mut(id) else {
            return false;
        };

        let close_on_drag = record.config.enable_close_on_drag;
        let session = DragSession::begin(event.raw_x, event.raw_y, debounce, close_on_drag);
        let previous = std::mem::replace(&mut record.interaction, Interaction::Dragging(session));
        debug!(
            id = %id,
            x = record.geometry.x,
            y = record.geometry.y,
            interrupted = previous.name(),
            "drag armed"
        );

        let lost = record.normalize_frame()
            && sync_surface(&mut self.host, id, record, screen, &mut self.events).is_err();
        if lost || matches!(previous, Interaction::Dragging(_)) {
            self.release_close_target(id);
        }
        if lost {
            return false;
        }

        if close_on_drag && self.close_target.is_none() {
            let mut target = CloseTarget::new(id.clone(), screen, density, &self.settings);
            target.show(&mut self.host);
            self.close_target = Some(target);
        }
        true
    }

    fn pointer_move(&mut self, id: &OverlayId, event: PointerEvent, now: Instant) -> bool {
        let screen = self.screen;
        let Some(record) = self.overlays.get_mut(id) else {
            return false;
        };
        let Interaction::Dragging(session) = &mut record.interaction else {
            return false;
        };

        let was_committed = session.is_committed();
        let Some((dx, dy)) = session.on_move(event.raw_x, event.raw_y) else {
            return true;
        };
        let close_on_drag = session.close_on_drag();
        if !was_committed {
            debug!(id = %id, "drag committed");
            self.events.push(OverlayEvent::DragStarted { id: id.clone() });
        }

        record.geometry.x = record.geometry.x.saturating_add(dx);
        record.geometry.y = record.geometry.y.saturating_add(dy);
        record.geometry = record.geometry.clamped(screen);
        if sync_surface(&mut self.host, id, record, screen, &mut self.events).is_err() {
            self.release_close_target(id);
            return false;
        }

        let geometry = record.geometry;
        if close_on_drag {
            self.track_close_target(id, &geometry, now);
        }
        true
    }

    /// Highlight or reset the close target for the overlay's new position
    fn track_close_target(&mut self, id: &OverlayId, geometry: &OverlayGeometry, now: Instant) {
        let screen = self.screen;
        let Some(target) = self.close_target.as_mut().filter(|t| t.owner() == id) else {
            return;
        };
        let changed = if target.overlaps(geometry, screen) {
            target.highlight(now)
        } else {
            target.reset(&mut self.host)
        };
        if changed {
            let highlighted = target.is_highlighted();
            debug!(id = %id, highlighted, "close target state changed");
            self.events.push(OverlayEvent::CloseTargetHighlighted {
                id: id.clone(),
                highlighted,
            });
        }
    }

    fn pointer_up(&mut self, id: &OverlayId, now: Instant) -> bool {
        let screen = self.screen;
        let Some(record) = self.overlays.get_mut(id) else {
            return false;
        };
        if !matches!(record.interaction, Interaction::Dragging(_)) {
            return false;
        }
        let Interaction::Dragging(session) = std::mem::take(&mut record.interaction) else {
            return false;
        };
        let geometry = record.geometry;
        let snap_mode = record.config.snap_mode;

        let over_target = self
            .close_target
            .as_ref()
            .is_some_and(|t| t.owner() == id && t.overlaps(&geometry, screen));
        let release = session.release(over_target, snap_mode);
        self.release_close_target(id);

        if session.is_committed() {
            self.events.push(OverlayEvent::DragEnded {
                id: id.clone(),
                position: self.density.position(geometry.x, geometry.y),
            });
        }

        match release {
            DragRelease::ClosedByTarget => {
                info!(id = %id, "overlay dropped on close target");
                self.events
                    .push(OverlayEvent::ClosedByTarget { id: id.clone() });
                self.remove(id).is_ok()
            }
            DragRelease::Committed(mode) => {
                let interval = Duration::from_millis(self.settings.snap_interval_ms);
                let settle = self.settings.snap_settle_px;
                if let Some(snap) =
                    SnapAnimator::new(mode, &geometry, screen, settle, interval, now)
                    && let Some(record) = self.overlays.get_mut(id)
                {
                    debug!(id = %id, ?mode, destination = ?snap.destination(), "snap started");
                    record.interaction = Interaction::Snapping(snap);
                }
                true
            }
            DragRelease::Cancelled => {
                debug!(id = %id, x = geometry.x, y = geometry.y, "drag released");
                true
            }
        }
    }
}
