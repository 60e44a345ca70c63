use std::time::Duration;

use floatwin_types::{EngineSettings, Extent, Gravity, OverlaySpec, Position, SnapMode};
use tokio::sync::broadcast::error::TryRecvError;

use super::*;
use crate::geometry::ScreenSize;
use crate::host::{HeadlessHost, SurfaceRole};

fn start() -> (HeadlessHost, ServiceHandle) {
    let host = HeadlessHost::new(ScreenSize::new(1080, 1920));
    let handle = OverlayService::start(host.clone(), EngineSettings::default());
    (host, handle)
}

fn corner_spec() -> OverlaySpec {
    OverlaySpec::sized(100, 100).with_gravity(Gravity::TopLeft)
}

/// Width of the only overlay surface on the host
fn overlay_width(host: &HeadlessHost) -> Option<Extent> {
    let state = host.state();
    let surfaces = state.surfaces_with_role(SurfaceRole::Overlay);
    surfaces.first().map(|(_, s)| s.placement.width)
}

#[tokio::test(start_paused = true)]
async fn show_move_and_query() {
    let (_host, service) = start();

    service.show("a", corner_spec()).await.expect("show");
    assert_eq!(service.position("a").await, Ok(Some(Position { x: 0.0, y: 0.0 })));
    assert_eq!(service.is_active("a").await, Ok(true));

    service.move_to("a", 40.0, 60.0).await.expect("move");
    assert_eq!(
        service.position("a").await,
        Ok(Some(Position { x: 40.0, y: 60.0 }))
    );
    assert_eq!(service.list_active().await, Ok(vec![OverlayId::new("a")]));

    let screen = service.screen_size().await.expect("screen");
    assert_eq!((screen.width, screen.height), (1080.0, 1920.0));
}

#[tokio::test(start_paused = true)]
async fn unknown_ids_are_reported() {
    let (_host, service) = start();
    assert_eq!(
        service.move_to("ghost", 0.0, 0.0).await,
        Err(OverlayError::UnknownOverlay(OverlayId::new("ghost")))
    );
    assert_eq!(service.position("ghost").await, Ok(None));
    assert_eq!(service.is_active("ghost").await, Ok(false));
}

#[tokio::test(start_paused = true)]
async fn animated_resize_runs_on_the_service_clock() {
    let (host, service) = start();
    service.show("a", corner_spec()).await.expect("show");

    service
        .resize(
            "a",
            ResizeRequest::new(Extent::Px(300), Extent::Px(100))
                .with_duration(Duration::from_millis(300)),
        )
        .await
        .expect("resize");

    time::sleep(Duration::from_millis(150)).await;
    let Some(Extent::Px(mid)) = overlay_width(&host) else {
        panic!("overlay surface missing");
    };
    assert!(mid > 100 && mid < 300, "mid-animation width {mid}");

    time::sleep(Duration::from_millis(300)).await;
    assert_eq!(overlay_width(&host), Some(Extent::Px(300)));
}

#[tokio::test(start_paused = true)]
async fn pointer_drag_snaps_to_edge() {
    let (_host, service) = start();
    service
        .show("a", corner_spec().with_drag(SnapMode::Right))
        .await
        .expect("show");

    assert_eq!(service.pointer("a", PointerEvent::down(10.0, 10.0)).await, Ok(true));
    service
        .pointer("a", PointerEvent::moved(210.0, 510.0))
        .await
        .expect("move");
    service
        .pointer("a", PointerEvent::up(210.0, 510.0))
        .await
        .expect("up");

    time::sleep(Duration::from_secs(1)).await;
    assert_eq!(
        service.position("a").await,
        Ok(Some(Position { x: 980.0, y: 500.0 }))
    );
}

#[tokio::test(start_paused = true)]
async fn events_are_broadcast() {
    let (_host, service) = start();
    let mut events = service.subscribe();

    service.show("a", corner_spec()).await.expect("show");
    service.remove("a").await.expect("remove");

    let a = OverlayId::new("a");
    assert_eq!(events.recv().await, Ok(OverlayEvent::Shown { id: a.clone() }));
    assert_eq!(events.recv().await, Ok(OverlayEvent::Removed { id: a }));
    assert_eq!(events.recv().await, Ok(OverlayEvent::AllClosed));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn screen_change_is_applied() {
    let (host, service) = start();
    service.show("a", corner_spec()).await.expect("show");
    service.move_to("a", 1000.0, 1800.0).await.expect("move");

    host.set_screen(ScreenSize::new(800, 600));
    service.screen_changed().await.expect("notify");
    assert_eq!(
        service.position("a").await,
        Ok(Some(Position { x: 700.0, y: 500.0 }))
    );
}

#[tokio::test(start_paused = true)]
async fn stop_tears_everything_down() {
    let (host, service) = start();
    service.show("a", corner_spec()).await.expect("show a");
    service.show("b", corner_spec()).await.expect("show b");
    assert_eq!(host.surface_count(), 2);

    service.stop().await.expect("stop");
    assert_eq!(host.surface_count(), 0);

    assert_eq!(
        service.show("c", corner_spec()).await,
        Err(OverlayError::ServiceStopped)
    );
    assert!(!service.is_running());
}

#[tokio::test(start_paused = true)]
async fn frame_ticker_parks_until_woken() {
    let period = Duration::from_millis(16);
    let mut ticker = FrameTicker::new(period);
    assert!(!ticker.is_active());

    ticker.wake();
    assert!(ticker.is_active());
    let woken = Instant::now();
    ticker.tick().await;
    assert!(woken.elapsed() >= period);

    ticker.park();
    assert!(!ticker.is_active());

    // a long idle stretch does not leave a burst of ticks behind
    time::sleep(Duration::from_secs(1)).await;
    ticker.wake();
    let woken = Instant::now();
    ticker.tick().await;
    assert!(woken.elapsed() >= period);
}

#[tokio::test(start_paused = true)]
async fn animations_resume_after_the_service_idles() {
    let (host, service) = start();
    service.show("a", corner_spec()).await.expect("show");
    service
        .resize(
            "a",
            ResizeRequest::new(Extent::Px(200), Extent::Px(100))
                .with_duration(Duration::from_millis(100)),
        )
        .await
        .expect("first resize");
    time::sleep(Duration::from_secs(1)).await;
    assert_eq!(overlay_width(&host), Some(Extent::Px(200)));

    service
        .resize(
            "a",
            ResizeRequest::new(Extent::Px(400), Extent::Px(100))
                .with_duration(Duration::from_millis(100)),
        )
        .await
        .expect("second resize");
    time::sleep(Duration::from_millis(500)).await;
    assert_eq!(overlay_width(&host), Some(Extent::Px(400)));
}
