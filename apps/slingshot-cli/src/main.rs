use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use slingshot_common::{Image, LayoutConfig, Rgba};
use slingshot_input::{PointerEvent, clamp_to_radius};
use slingshot_kernel::{BodyHandle, DiscBody, Viewport};
use slingshot_render::{DebugTextRenderer, DisplayList, HeadlessSurface};
use slingshot_surface::{EventChannel, GameEvent, GameSurface};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slingshot-cli", about = "CLI tool for the slingshot game view")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Layout overrides as JSON
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the active layout
    Info,
    /// Run a scripted headless session: mount, drag, launch, game over, reset
    Demo {
        #[arg(long, default_value = "2560")]
        width: u32,
        #[arg(long, default_value = "1440")]
        height: u32,
        /// Drag offset from the launcher anchor, in pixels
        #[arg(long, default_value = "-400.0", allow_hyphen_values = true)]
        drag_x: f32,
        #[arg(long, default_value = "150.0", allow_hyphen_values = true)]
        drag_y: f32,
        /// End the round as a loss instead of a win
        #[arg(long)]
        lose: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Evaluate the drag clamp for one pointer position
    Clamp {
        #[arg(long, default_value = "1000")]
        width: u32,
        #[arg(long, default_value = "1000")]
        height: u32,
        /// Height of the mounted body
        #[arg(long, default_value = "100.0")]
        body_height: f32,
        #[arg(long, allow_hyphen_values = true)]
        x: f32,
        #[arg(long, allow_hyphen_values = true)]
        y: f32,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<LayoutConfig> {
    let config = match path {
        Some(path) => LayoutConfig::from_json_file(path)
            .with_context(|| format!("loading layout from {}", path.display()))?,
        None => LayoutConfig::default(),
    };
    config.validate().context("invalid layout")?;
    Ok(config)
}

/// Wait for a frame painted entirely after the last scene change.
fn fresh_frame(display: &HeadlessSurface) -> anyhow::Result<DisplayList> {
    let seen = display.frames_posted();
    if !display.wait_for_frames(seen + 2, Duration::from_secs(2)) {
        anyhow::bail!("render loop produced no frame within 2s");
    }
    display.last_frame().context("no frame posted")
}

fn print_events(rx: &Receiver<GameEvent>, json: bool) -> anyhow::Result<()> {
    for event in rx.try_iter() {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("event: {event:?}");
        }
    }
    Ok(())
}

fn run_demo(
    config: LayoutConfig,
    width: u32,
    height: u32,
    drag: Vec2,
    won: bool,
    json: bool,
) -> anyhow::Result<()> {
    let display = Arc::new(HeadlessSurface::new(width, height));
    let background = Image::solid(16, 9, Rgba::rgb(0x87, 0xce, 0xeb));
    let surface = GameSurface::new(config, display.clone(), Some(background));
    let debug = DebugTextRenderer::new();

    let (channel, rx) = EventChannel::new();
    let channel = Arc::new(channel);
    surface.set_tap_listener(Some(channel.clone()));
    surface.set_created_listener(Some(channel.clone()));
    surface.set_destroyed_listener(Some(channel.clone()));
    surface.set_resumed_listener(Some(channel.clone()));

    tracing::info!(width, height, "creating headless surface");
    surface.surface_created(width, height)?;
    println!(
        "Viewport: {}x{}, ground_y={}",
        surface.viewport_width(),
        surface.viewport_height(),
        surface.ground_y()
    );

    let target = BodyHandle::new(DiscBody::new(60.0));
    target.set_position(Vec2::new(width as f32 * 0.8, surface.ground_y() as f32 - 60.0));
    surface.add_body(target);

    let projectile = BodyHandle::new(DiscBody::new(40.0));
    surface.mount_on_launcher(projectile.clone(), Some(channel));
    let anchor = projectile.position();
    println!("Mounted {} at ({:.1}, {:.1})", projectile.id().short(), anchor.x, anchor.y);

    tracing::info!(dx = drag.x, dy = drag.y, "dragging projectile");
    surface.on_pointer(PointerEvent::press(anchor.x, anchor.y));
    let pointer = anchor + drag;
    surface.on_pointer(PointerEvent::moved(pointer.x, pointer.y));
    let pulled = projectile.position();
    println!(
        "Dragged to ({:.1}, {:.1}), pulled to ({:.1}, {:.1}), distance {:.1}",
        pointer.x,
        pointer.y,
        pulled.x,
        pulled.y,
        pulled.distance(anchor)
    );
    print!("{}", debug.describe(&fresh_frame(&display)?));

    tracing::info!("releasing projectile, then tapping");
    surface.on_pointer(PointerEvent::release(pulled.x, pulled.y));
    surface.on_pointer(PointerEvent::release(10.0, 10.0));
    print_events(&rx, json)?;

    let status = surface.game_over(won)?;
    println!("Status: {status}");
    print!("{}", debug.describe(&fresh_frame(&display)?));

    tracing::info!("resetting and tearing down");
    surface.reset_game();
    println!("After reset: status={}, bodies={}", surface.status(), surface.scene_len());
    surface.surface_destroyed();
    print_events(&rx, json)?;
    println!("Frames posted: {}", display.frames_posted());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("slingshot-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", slingshot_input::crate_info());
            println!("render: {}", slingshot_render::crate_info());
            println!("surface: {}", slingshot_surface::crate_info());
            println!("layout: {}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Demo {
            width,
            height,
            drag_x,
            drag_y,
            lose,
            json,
        } => {
            println!("Headless session: {width}x{height}");
            run_demo(config, width, height, Vec2::new(drag_x, drag_y), !lose, json)?;
        }
        Commands::Clamp {
            width,
            height,
            body_height,
            x,
            y,
        } => {
            tracing::debug!(width, height, body_height, "evaluating drag clamp");
            let viewport = Viewport::new(width, height);
            let anchor = viewport.launcher_anchor(&config);
            let limit = viewport.drag_limit(&config, body_height);
            let pointer = Vec2::new(x, y);
            let clamped = clamp_to_radius(anchor, pointer, limit);
            println!("anchor: ({:.2}, {:.2})", anchor.x, anchor.y);
            println!("limit: {limit:.2}");
            println!(
                "pointer: ({:.2}, {:.2}) distance {:.2}",
                pointer.x,
                pointer.y,
                anchor.distance(pointer)
            );
            println!(
                "result: ({:.2}, {:.2}) distance {:.2}",
                clamped.x,
                clamped.y,
                anchor.distance(clamped)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn demo_session_runs_headless() {
        let config = LayoutConfig {
            frame_interval_ms: 5,
            ..LayoutConfig::default()
        };
        run_demo(config, 640, 360, Vec2::new(-200.0, 80.0), true, true).unwrap();
    }

    #[test]
    fn config_file_accepts_hex_colors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"{{ "stroke_color": "#102030" }}"##).unwrap();
        let path = file.path().to_path_buf();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.stroke_color, Rgba::rgb(0x10, 0x20, 0x30));
    }

    #[test]
    fn config_file_with_bad_layout_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "ground_ratio": 0.1 }}"#).unwrap();
        let path = file.path().to_path_buf();
        assert!(load_config(Some(&path)).is_err());
    }
}
