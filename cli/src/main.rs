use clap::{Parser, Subcommand};
use floatwin_cli::{CliContext, commands, logging, readline};
use floatwin_core::ResizeRequest;
use floatwin_types::{Extent, Gravity, Offset, OverlaySpec, SnapMode, WindowFlag};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();

    // Optional path to an engine settings file; the user store is used otherwise
    let config = std::env::args_os().nth(1).map(PathBuf::from);
    let ctx = CliContext::new(config.as_deref())?;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    ctx.shutdown().await;
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "floatwin overlay engine console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an overlay; -1 for width or height fills the screen
    Show {
        id: String,
        #[arg(long, default_value_t = 200, allow_negative_numbers = true)]
        width: i32,
        #[arg(long, default_value_t = 200, allow_negative_numbers = true)]
        height: i32,
        #[arg(short, long, default_value = "center")]
        gravity: Gravity,
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
        #[arg(long)]
        drag: bool,
        #[arg(long, default_value = "none")]
        snap: SnapMode,
        #[arg(long, default_value = "flagNotFocusable")]
        flag: WindowFlag,
    },
    Move {
        id: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// Pin the overlay and stop snapping
        #[arg(short, long)]
        absolute: bool,
    },
    Resize {
        id: String,
        #[arg(allow_negative_numbers = true)]
        width: i32,
        #[arg(allow_negative_numbers = true)]
        height: i32,
        /// Animation length in milliseconds; 0 applies at once
        #[arg(short, long, default_value_t = 0)]
        duration: u64,
        #[arg(long)]
        drag: bool,
        #[arg(long)]
        close_on_drag: bool,
        #[arg(long)]
        anchor_left: bool,
        #[arg(long)]
        anchor_top: bool,
    },
    Remove {
        id: String,
    },
    RemoveAll,
    Flag {
        id: String,
        flag: WindowFlag,
    },
    /// Replay a pointer drag in raw pixels
    Drag {
        id: String,
        from_x: f32,
        from_y: f32,
        to_x: f32,
        to_y: f32,
        #[arg(short, long, default_value_t = 10)]
        steps: u32,
    },
    Position {
        id: String,
    },
    List,
    Screen,
    /// Change the simulated display size
    Rotate {
        width: u32,
        height: u32,
    },
    Surfaces,
    /// Send a JSON content request, e.g. '{"method":"getPosition"}'
    Content {
        id: String,
        json: String,
    },
    Settings,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "floatwin".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Show {
            id,
            width,
            height,
            gravity,
            x,
            y,
            drag,
            snap,
            flag,
        }) => {
            let spec = OverlaySpec {
                width: Extent::from_request(width),
                height: Extent::from_request(height),
                gravity,
                flag,
                enable_drag: drag,
                snap_mode: snap,
                start: Some(Offset { x, y }),
            };
            commands::show(ctx, &id, spec).await
        }
        Some(Commands::Move {
            id,
            x,
            y,
            absolute,
        }) => commands::move_overlay(ctx, &id, x, y, absolute).await,
        Some(Commands::Resize {
            id,
            width,
            height,
            duration,
            drag,
            close_on_drag,
            anchor_left,
            anchor_top,
        }) => {
            let request =
                ResizeRequest::new(Extent::from_request(width), Extent::from_request(height))
                    .with_duration(Duration::from_millis(duration))
                    .with_drag(drag, close_on_drag)
                    .anchored(anchor_left, anchor_top);
            commands::resize(ctx, &id, request).await
        }
        Some(Commands::Remove { id }) => commands::remove(ctx, &id).await,
        Some(Commands::RemoveAll) => commands::remove_all(ctx).await,
        Some(Commands::Flag { id, flag }) => commands::update_flag(ctx, &id, flag).await,
        Some(Commands::Drag {
            id,
            from_x,
            from_y,
            to_x,
            to_y,
            steps,
        }) => commands::drag(ctx, &id, (from_x, from_y), (to_x, to_y), steps).await,
        Some(Commands::Position { id }) => commands::position(ctx, &id).await,
        Some(Commands::List) => commands::list(ctx).await,
        Some(Commands::Screen) => commands::screen(ctx).await,
        Some(Commands::Rotate { width, height }) => commands::rotate(ctx, width, height).await,
        Some(Commands::Surfaces) => commands::surfaces(ctx),
        Some(Commands::Content { id, json }) => commands::content(ctx, &id, &json).await,
        Some(Commands::Settings) => commands::show_settings(ctx),
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
