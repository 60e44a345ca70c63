use floatwin_core::{
    ContentBridge, ContentReply, ContentRequest, OverlayError, PointerEvent, ResizeRequest,
    ScreenSize, SurfaceRole,
};
use floatwin_types::{Extent, OverlayId, OverlaySpec, WindowFlag};
use std::io::Write;

use crate::CliContext;

fn report(action: &str, id: &str, result: Result<(), OverlayError>) {
    match result {
        Ok(()) => println!("{action} {id}"),
        Err(e) => println!("{action} {id} failed: {e}"),
    }
}

fn extent(extent: Extent) -> String {
    match extent {
        Extent::Px(px) => px.to_string(),
        Extent::Fill => "fill".to_string(),
    }
}

pub async fn show(ctx: &CliContext, id: &str, spec: OverlaySpec) {
    report("shown", id, ctx.service.show(id, spec).await);
}

pub async fn move_overlay(ctx: &CliContext, id: &str, x: f64, y: f64, absolute: bool) {
    let result = if absolute {
        ctx.service.move_absolute(id, x, y).await
    } else {
        ctx.service.move_to(id, x, y).await
    };
    report("moved", id, result);
}

pub async fn resize(ctx: &CliContext, id: &str, request: ResizeRequest) {
    report("resizing", id, ctx.service.resize(id, request).await);
}

pub async fn remove(ctx: &CliContext, id: &str) {
    report("removed", id, ctx.service.remove(id).await);
}

pub async fn remove_all(ctx: &CliContext) {
    match ctx.service.remove_all().await {
        Ok(count) => println!("removed {count} overlay(s)"),
        Err(e) => println!("remove-all failed: {e}"),
    }
}

pub async fn update_flag(ctx: &CliContext, id: &str, flag: WindowFlag) {
    report("flag updated for", id, ctx.service.update_flag(id, flag).await);
}

/// Replay a straight-line pointer drag in raw screen pixels
pub async fn drag(ctx: &CliContext, id: &str, from: (f32, f32), to: (f32, f32), steps: u32) {
    let steps = steps.max(1);
    let mut events = vec![PointerEvent::down(from.0, from.1)];
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        events.push(PointerEvent::moved(
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
        ));
    }
    events.push(PointerEvent::up(to.0, to.1));

    for event in events {
        match ctx.service.pointer(id, event).await {
            Ok(true) => {}
            Ok(false) => {
                println!("{id} ignored {:?}", event.action);
                return;
            }
            Err(e) => {
                println!("drag failed: {e}");
                return;
            }
        }
    }
    println!("dragged {id}");
}

pub async fn position(ctx: &CliContext, id: &str) {
    match ctx.service.position(id).await {
        Ok(Some(pos)) => println!("{id}: x={:.1} y={:.1}", pos.x, pos.y),
        Ok(None) => println!("{id}: not found"),
        Err(e) => println!("position failed: {e}"),
    }
}

pub async fn list(ctx: &CliContext) {
    let ids = match ctx.service.list_active().await {
        Ok(ids) => ids,
        Err(e) => {
            println!("list failed: {e}");
            return;
        }
    };
    if ids.is_empty() {
        println!("No active overlays");
        return;
    }
    for id in ids {
        match ctx.service.position(id.clone()).await {
            Ok(Some(pos)) => println!("{:<20} x={:<8.1} y={:<8.1}", id.as_str(), pos.x, pos.y),
            _ => println!("{id}"),
        }
    }
}

pub async fn screen(ctx: &CliContext) {
    match ctx.service.screen_size().await {
        Ok(size) => println!("screen: {:.0}x{:.0} (logical)", size.width, size.height),
        Err(e) => println!("screen failed: {e}"),
    }
}

/// Simulate the display changing size, e.g. a rotation
pub async fn rotate(ctx: &CliContext, width: u32, height: u32) {
    ctx.host.set_screen(ScreenSize::new(width, height));
    match ctx.service.screen_changed().await {
        Ok(()) => println!("screen is now {width}x{height}"),
        Err(e) => println!("rotate failed: {e}"),
    }
}

/// Send a JSON request as the overlay's content would
pub async fn content(ctx: &CliContext, id: &str, raw: &str) {
    let request: ContentRequest = match serde_json::from_str(raw) {
        Ok(request) => request,
        Err(e) => {
            println!("invalid content request: {e}");
            return;
        }
    };
    let bridge = ContentBridge::new(OverlayId::new(id), ctx.service.clone(), &ctx.settings);
    match bridge.dispatch(request).await {
        ContentReply::Ok(ok) => println!("{ok}"),
        ContentReply::Position(pos) => match serde_json::to_string(&pos) {
            Ok(json) => println!("{json}"),
            Err(e) => println!("failed to encode reply: {e}"),
        },
    }
}

/// Dump what the headless host is currently showing
pub fn surfaces(ctx: &CliContext) {
    let state = ctx.host.state();
    println!(
        "{:<6} {:<12} {:<14} {:>8} {:>8} {:>8} {:>8}",
        "handle", "role", "gravity", "x", "y", "width", "height"
    );
    println!("{}", "-".repeat(70));
    for role in [SurfaceRole::Overlay, SurfaceRole::CloseTarget] {
        for (handle, surface) in state.surfaces_with_role(role) {
            let p = surface.placement;
            println!(
                "{:<6} {:<12} {:<14} {:>8} {:>8} {:>8} {:>8}",
                handle.0,
                format!("{role:?}"),
                format!("{:?}", p.gravity),
                p.x,
                p.y,
                extent(p.width),
                extent(p.height)
            );
        }
    }
}

pub fn show_settings(ctx: &CliContext) {
    println!("{:#?}", ctx.settings);
}

pub fn exit() {
    let mut stdout = std::io::stdout();
    if write!(stdout, "quitting...").is_ok() {
        let _ = stdout.flush();
    }
}
