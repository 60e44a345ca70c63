//! Content bridge
//!
//! Requests originated by an overlay's own content arrive here, already
//! decoded into a closed `ContentRequest`. Each one maps onto exactly one
//! service operation for the overlay the bridge is bound to. Failures are
//! flattened to `false` at this boundary.

use std::time::Duration;

use floatwin_types::{EngineSettings, Extent, OverlayId, Position, WindowFlag};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OverlayError;
use crate::registry::ResizeRequest;
use crate::service::ServiceHandle;

/// Request sent by overlay content. Sizes use the fill sentinels of
/// `Extent::from_request`; positions are logical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "method",
    content = "arguments",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ContentRequest {
    ResizeOverlay {
        width: i32,
        height: i32,
        #[serde(default)]
        enable_drag: bool,
        #[serde(default)]
        enable_close_on_drag: bool,
        /// Milliseconds; the configured content default when absent
        #[serde(default)]
        duration: Option<u64>,
        #[serde(default)]
        anchor_left: bool,
        #[serde(default)]
        anchor_top: bool,
    },
    UpdateOverlayPosition {
        x: f64,
        y: f64,
    },
    MoveOverlayAbsolute {
        x: f64,
        y: f64,
    },
    UpdateFlag {
        #[serde(default)]
        flag: WindowFlag,
    },
    GetPosition,
    CloseOverlay,
    #[serde(alias = "isPlatformViewsReady")]
    IsReady,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentReply {
    Ok(bool),
    Position(Option<Position>),
}

/// Bridge between one overlay's content and the service
#[derive(Debug, Clone)]
pub struct ContentBridge {
    id: OverlayId,
    service: ServiceHandle,
    default_resize: Duration,
}

impl ContentBridge {
    pub fn new(id: OverlayId, service: ServiceHandle, settings: &EngineSettings) -> Self {
        Self {
            id,
            service,
            default_resize: Duration::from_millis(settings.content_resize_duration_ms),
        }
    }

    pub fn id(&self) -> &OverlayId {
        &self.id
    }

    pub async fn dispatch(&self, request: ContentRequest) -> ContentReply {
        let id = self.id.clone();
        let result = match request {
            ContentRequest::ResizeOverlay {
                width,
                height,
                enable_drag,
                enable_close_on_drag,
                duration,
                anchor_left,
                anchor_top,
            } => {
                let duration = duration.map_or(self.default_resize, Duration::from_millis);
                let request = ResizeRequest::new(Extent::from_request(width), Extent::from_request(height))
                    .with_drag(enable_drag, enable_close_on_drag)
                    .with_duration(duration)
                    .anchored(anchor_left, anchor_top);
                self.service.resize(id, request).await
            }
            ContentRequest::UpdateOverlayPosition { x, y } => self.service.move_to(id, x, y).await,
            ContentRequest::MoveOverlayAbsolute { x, y } => {
                self.service.move_absolute(id, x, y).await
            }
            ContentRequest::UpdateFlag { flag } => self.service.update_flag(id, flag).await,
            ContentRequest::CloseOverlay => self.service.remove(id).await,
            ContentRequest::GetPosition => {
                return ContentReply::Position(self.service.position(id).await.unwrap_or_default());
            }
            ContentRequest::IsReady => {
                return ContentReply::Ok(self.service.is_active(id).await.unwrap_or(false));
            }
        };
        ContentReply::Ok(self.flatten(result))
    }

    fn flatten(&self, result: Result<(), OverlayError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                debug!(id = %self.id, error = %e, "content request failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScreenSize;
    use crate::host::HeadlessHost;
    use crate::service::OverlayService;
    use floatwin_types::{Gravity, OverlaySpec};

    fn decode(raw: &str) -> ContentRequest {
        serde_json::from_str(raw).expect("valid request")
    }

    #[test]
    fn decodes_content_requests() {
        assert_eq!(
            decode(r#"{"method":"resizeOverlay","arguments":{"width":-1,"height":120,"enableDrag":true}}"#),
            ContentRequest::ResizeOverlay {
                width: -1,
                height: 120,
                enable_drag: true,
                enable_close_on_drag: false,
                duration: None,
                anchor_left: false,
                anchor_top: false,
            }
        );
        assert_eq!(
            decode(r#"{"method":"updateFlag","arguments":{"flag":"defaultFlag"}}"#),
            ContentRequest::UpdateFlag {
                flag: WindowFlag::NotFocusable
            }
        );
        assert_eq!(decode(r#"{"method":"getPosition"}"#), ContentRequest::GetPosition);
        assert_eq!(decode(r#"{"method":"isPlatformViewsReady"}"#), ContentRequest::IsReady);
        assert!(serde_json::from_str::<ContentRequest>(r#"{"method":"explode"}"#).is_err());
    }

    #[test]
    fn replies_serialize_flat() {
        assert_eq!(serde_json::to_string(&ContentReply::Ok(true)).ok().as_deref(), Some("true"));
        assert_eq!(
            serde_json::to_string(&ContentReply::Position(None)).ok().as_deref(),
            Some("null")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dispatches_onto_the_service() {
        let host = HeadlessHost::new(ScreenSize::new(1080, 1920));
        let settings = EngineSettings::default();
        let service = OverlayService::start(host.clone(), settings.clone());
        service
            .show("a", OverlaySpec::sized(100, 100).with_gravity(Gravity::TopLeft))
            .await
            .expect("show");

        let bridge = ContentBridge::new(OverlayId::new("a"), service.clone(), &settings);
        assert_eq!(bridge.dispatch(ContentRequest::IsReady).await, ContentReply::Ok(true));
        assert_eq!(
            bridge
                .dispatch(ContentRequest::UpdateOverlayPosition { x: 30.0, y: 40.0 })
                .await,
            ContentReply::Ok(true)
        );
        assert_eq!(
            bridge.dispatch(ContentRequest::GetPosition).await,
            ContentReply::Position(Some(Position { x: 30.0, y: 40.0 }))
        );
        assert_eq!(bridge.dispatch(ContentRequest::CloseOverlay).await, ContentReply::Ok(true));
        assert_eq!(bridge.dispatch(ContentRequest::CloseOverlay).await, ContentReply::Ok(false));
        assert_eq!(bridge.dispatch(ContentRequest::GetPosition).await, ContentReply::Position(None));
        assert_eq!(host.surface_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn resize_without_duration_uses_content_default() {
        let host = HeadlessHost::new(ScreenSize::new(1080, 1920));
        let settings = EngineSettings::default();
        let service = OverlayService::start(host.clone(), settings.clone());
        service
            .show("a", OverlaySpec::sized(100, 100).with_gravity(Gravity::TopLeft))
            .await
            .expect("show");
        let bridge = ContentBridge::new(OverlayId::new("a"), service, &settings);

        let reply = bridge
            .dispatch(ContentRequest::ResizeOverlay {
                width: 300,
                height: 100,
                enable_drag: true,
                enable_close_on_drag: false,
                duration: None,
                anchor_left: false,
                anchor_top: false,
            })
            .await;
        assert_eq!(reply, ContentReply::Ok(true));

        let width = || {
            let state = host.state();
            state
                .surfaces_with_role(crate::host::SurfaceRole::Overlay)
                .first()
                .map(|(_, s)| s.placement.width)
        };
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_ne!(width(), Some(Extent::Px(300)));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(width(), Some(Extent::Px(300)));
    }
}
