use floatwin_types::{LogicalSize, OverlayId, OverlaySpec, Position, WindowFlag};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::OverlayCommand;
use crate::drag::PointerEvent;
use crate::error::OverlayError;
use crate::events::OverlayEvent;
use crate::registry::ResizeRequest;

/// Cloneable handle for talking to a running `OverlayService`
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    cmd_tx: mpsc::Sender<OverlayCommand>,
    event_tx: broadcast::Sender<OverlayEvent>,
}

impl ServiceHandle {
    pub(super) fn new(
        cmd_tx: mpsc::Sender<OverlayCommand>,
        event_tx: broadcast::Sender<OverlayEvent>,
    ) -> Self {
        Self { cmd_tx, event_tx }
    }

    /// Send a command and wait for its reply
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> OverlayCommand,
    ) -> Result<T, OverlayError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .await
            .map_err(|_| OverlayError::ServiceStopped)?;
        rx.await.map_err(|_| OverlayError::ServiceStopped)
    }

    pub fn is_running(&self) -> bool {
        !self.cmd_tx.is_closed()
    }

    /// Receive every notification published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.event_tx.subscribe()
    }

    pub async fn show(&self, id: impl Into<OverlayId>, spec: OverlaySpec) -> Result<(), OverlayError> {
        let id = id.into();
        self.request(|reply| OverlayCommand::Show { id, spec, reply })
            .await?
    }

    /// Move to an absolute logical position
    pub async fn move_to(&self, id: impl Into<OverlayId>, x: f64, y: f64) -> Result<(), OverlayError> {
        let id = id.into();
        self.request(|reply| OverlayCommand::Move {
            id,
            x,
            y,
            absolute: false,
            reply,
        })
        .await?
    }

    /// Move to an absolute logical position and stop automatic snapping
    pub async fn move_absolute(
        &self,
        id: impl Into<OverlayId>,
        x: f64,
        y: f64,
    ) -> Result<(), OverlayError> {
        let id = id.into();
        self.request(|reply| OverlayCommand::Move {
            id,
            x,
            y,
            absolute: true,
            reply,
        })
        .await?
    }

    pub async fn resize(
        &self,
        id: impl Into<OverlayId>,
        request: ResizeRequest,
    ) -> Result<(), OverlayError> {
        let id = id.into();
        self.request(|reply| OverlayCommand::Resize { id, request, reply })
            .await?
    }

    pub async fn update_flag(
        &self,
        id: impl Into<OverlayId>,
        flag: WindowFlag,
    ) -> Result<(), OverlayError> {
        let id = id.into();
        self.request(|reply| OverlayCommand::UpdateFlag { id, flag, reply })
            .await?
    }

    pub async fn remove(&self, id: impl Into<OverlayId>) -> Result<(), OverlayError> {
        let id = id.into();
        self.request(|reply| OverlayCommand::Remove { id, reply })
            .await?
    }

    /// Remove every overlay; returns how many were removed
    pub async fn remove_all(&self) -> Result<usize, OverlayError> {
        self.request(|reply| OverlayCommand::RemoveAll { reply })
            .await
    }

    /// Forward a raw pointer event; returns whether a drag handled it
    pub async fn pointer(
        &self,
        id: impl Into<OverlayId>,
        event: PointerEvent,
    ) -> Result<bool, OverlayError> {
        let id = id.into();
        self.request(|reply| OverlayCommand::Pointer { id, event, reply })
            .await
    }

    pub async fn position(&self, id: impl Into<OverlayId>) -> Result<Option<Position>, OverlayError> {
        let id = id.into();
        self.request(|reply| OverlayCommand::Position { id, reply })
            .await
    }

    pub async fn is_active(&self, id: impl Into<OverlayId>) -> Result<bool, OverlayError> {
        let id = id.into();
        self.request(|reply| OverlayCommand::IsActive { id, reply })
            .await
    }

    pub async fn list_active(&self) -> Result<Vec<OverlayId>, OverlayError> {
        self.request(|reply| OverlayCommand::ListActive { reply })
            .await
    }

    pub async fn screen_size(&self) -> Result<LogicalSize, OverlayError> {
        self.request(|reply| OverlayCommand::ScreenSize { reply })
            .await
    }

    /// Tell the service the display changed (rotation, resolution)
    pub async fn screen_changed(&self) -> Result<(), OverlayError> {
        self.cmd_tx
            .send(OverlayCommand::ScreenChanged)
            .await
            .map_err(|_| OverlayError::ServiceStopped)
    }

    /// Tear down every overlay and stop the service task
    pub async fn stop(&self) -> Result<(), OverlayError> {
        self.request(|reply| OverlayCommand::Shutdown { reply })
            .await
    }
}
