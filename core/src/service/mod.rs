//! Overlay service
//!
//! Owns the registry on a single tokio task. Every external call, pointer
//! event and animation tick is funneled through that task, so geometry is
//! only ever mutated from one place:
//!
//! ```text
//! ServiceHandle ──mpsc──▶ OverlayService::run ──▶ OverlayRegistry ──▶ WindowHost
//!       ▲                        │    ▲
//!       └──────oneshot───────────┘    └── interval tick (animators)
//!                                │
//!                                └──broadcast──▶ OverlayEvent subscribers
//! ```

mod handler;

#[cfg(test)]
mod service_tests;

pub use handler::ServiceHandle;

use std::time::Duration;

use floatwin_types::{
    EngineSettings, LogicalSize, OverlayId, OverlaySpec, Position, WindowFlag,
};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::drag::PointerEvent;
use crate::error::OverlayError;
use crate::events::OverlayEvent;
use crate::host::WindowHost;
use crate::registry::{OverlayRegistry, ResizeRequest};

const COMMAND_CAPACITY: usize = 64;
const EVENT_CAPACITY: usize = 256;

type Reply<T> = oneshot::Sender<T>;

/// Commands sent to the service task
#[derive(Debug)]
pub enum OverlayCommand {
    Show {
        id: OverlayId,
        spec: OverlaySpec,
        reply: Reply<Result<(), OverlayError>>,
    },
    Move {
        id: OverlayId,
        x: f64,
        y: f64,
        /// Also turn automatic snapping off
        absolute: bool,
        reply: Reply<Result<(), OverlayError>>,
    },
    Resize {
        id: OverlayId,
        request: ResizeRequest,
        reply: Reply<Result<(), OverlayError>>,
    },
    UpdateFlag {
        id: OverlayId,
        flag: WindowFlag,
        reply: Reply<Result<(), OverlayError>>,
    },
    Remove {
        id: OverlayId,
        reply: Reply<Result<(), OverlayError>>,
    },
    RemoveAll {
        reply: Reply<usize>,
    },
    Pointer {
        id: OverlayId,
        event: PointerEvent,
        reply: Reply<bool>,
    },
    Position {
        id: OverlayId,
        reply: Reply<Option<Position>>,
    },
    IsActive {
        id: OverlayId,
        reply: Reply<bool>,
    },
    ListActive {
        reply: Reply<Vec<OverlayId>>,
    },
    ScreenSize {
        reply: Reply<LogicalSize>,
    },
    ScreenChanged,
    Shutdown {
        reply: Reply<()>,
    },
}

/// Engine clock. Follows tokio's clock so paused-time tests stay in step.
fn now() -> std::time::Instant {
    Instant::now().into_std()
}

/// Animation clock. Parked while nothing animates so an idle service only
/// wakes for commands.
struct FrameTicker {
    interval: time::Interval,
    active: bool,
}

impl FrameTicker {
    fn new(period: Duration) -> Self {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval,
            active: false,
        }
    }

    /// Resume ticking; the first tick lands one period from now
    fn wake(&mut self) {
        if !self.active {
            self.interval.reset();
            self.active = true;
        }
    }

    fn park(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}

pub struct OverlayService<H: WindowHost> {
    registry: OverlayRegistry<H>,
    cmd_rx: mpsc::Receiver<OverlayCommand>,
    event_tx: broadcast::Sender<OverlayEvent>,
    tick_interval: Duration,
}

impl<H: WindowHost> OverlayService<H> {
    pub fn new(host: H, settings: EngineSettings) -> (Self, ServiceHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let tick_interval = Duration::from_millis(settings.tick_interval_ms.max(1));

        let service = Self {
            registry: OverlayRegistry::new(host, settings),
            cmd_rx,
            event_tx: event_tx.clone(),
            tick_interval,
        };
        let handle = ServiceHandle::new(cmd_tx, event_tx);
        (service, handle)
    }

    /// Spawn the service on the current tokio runtime
    pub fn start(host: H, settings: EngineSettings) -> ServiceHandle {
        let (service, handle) = Self::new(host, settings);
        tokio::spawn(service.run());
        handle
    }

    /// Run the service event loop until shutdown or until every handle is gone
    pub async fn run(mut self) {
        info!(tick_ms = self.tick_interval.as_millis() as u64, "overlay service started");
        let mut ticker = FrameTicker::new(self.tick_interval);

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("all service handles dropped");
                        self.shutdown();
                        break;
                    };
                    if !self.handle(cmd) {
                        break;
                    }
                    // any command may have started an animation
                    ticker.wake();
                }
                _ = ticker.tick(), if ticker.is_active() => {
                    if !self.registry.tick(now()) {
                        debug!("animations settled, parking ticker");
                        ticker.park();
                    }
                }
            }
            self.publish_events();
        }
        info!("overlay service stopped");
    }

    /// Apply one command. Returns false once the service should stop.
    fn handle(&mut self, cmd: OverlayCommand) -> bool {
        match cmd {
            OverlayCommand::Show { id, spec, reply } => {
                let _ = reply.send(self.registry.show(id, &spec));
            }
            OverlayCommand::Move {
                id,
                x,
                y,
                absolute,
                reply,
            } => {
                let result = if absolute {
                    self.registry.move_absolute(&id, x, y)
                } else {
                    self.registry.move_to(&id, x, y)
                };
                let _ = reply.send(result);
            }
            OverlayCommand::Resize { id, request, reply } => {
                let _ = reply.send(self.registry.resize(&id, request, now()));
            }
            OverlayCommand::UpdateFlag { id, flag, reply } => {
                let _ = reply.send(self.registry.update_flag(&id, flag));
            }
            OverlayCommand::Remove { id, reply } => {
                let _ = reply.send(self.registry.remove(&id));
            }
            OverlayCommand::RemoveAll { reply } => {
                let _ = reply.send(self.registry.remove_all());
            }
            OverlayCommand::Pointer { id, event, reply } => {
                let _ = reply.send(self.registry.pointer(&id, event, now()));
            }
            OverlayCommand::Position { id, reply } => {
                let _ = reply.send(self.registry.position(&id));
            }
            OverlayCommand::IsActive { id, reply } => {
                let _ = reply.send(self.registry.is_active(&id));
            }
            OverlayCommand::ListActive { reply } => {
                let _ = reply.send(self.registry.list_active());
            }
            OverlayCommand::ScreenSize { reply } => {
                let _ = reply.send(self.registry.screen_size());
            }
            OverlayCommand::ScreenChanged => {
                self.registry.on_screen_changed();
            }
            OverlayCommand::Shutdown { reply } => {
                self.shutdown();
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    fn shutdown(&mut self) {
        let removed = self.registry.remove_all();
        info!(removed, "tearing down overlays");
        self.publish_events();
    }

    fn publish_events(&mut self) {
        for event in self.registry.drain_events() {
            // no subscribers is fine
            let _ = self.event_tx.send(event);
        }
    }
}
