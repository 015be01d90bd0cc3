//! Sample game: a main menu, a small solar system and an intro modal.
//!
//! Runs headless against a fixed-rate host that replays a short scripted
//! session of clicks, then prints what was drawn.
//!
//! Usage: `template_game [config.toml|config.ron]`

mod assets;
mod config;
mod scenes;
mod solar;

use config::GameConfig;
use sprite_engine::audio::RecordingBackend;
use sprite_engine::foundation::math::Vec2;
use sprite_engine::input::{InputEvent, MouseButton};
use sprite_engine::render::HeadlessDevice;
use sprite_engine::scene::SceneManager;
use sprite_engine::{FixedRateHost, GameDriver, RunSummary, SceneGame};

/// Scripted clicks: (frame, screen position)
const SESSION: [(u64, [f32; 2]); 5] = [
    // bounce the demo button
    (20, [475.0, 275.0]),
    // start the game
    (40, [475.0, 475.0]),
    // dismiss the intro modal
    (120, [400.0, 345.0]),
    // fly towards Terra
    (150, [500.0, 500.0]),
    // recentre the camera
    (400, [100.0, 30.0]),
];

fn click(host: FixedRateHost, frame: u64, position: Vec2) -> FixedRateHost {
    let button = MouseButton::Left;
    host.with_input(frame, InputEvent::MouseDown { position, button })
        .with_input(frame, InputEvent::MouseUp { position, button })
}

fn run(config: &GameConfig) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let mut device = HeadlessDevice::new(config.engine.window.width, config.engine.window.height);
    let recorder = device.recorder();
    let loader = assets::build_loader(&mut device);

    let mut driver = GameDriver::new(
        config.engine.clone(),
        Box::new(device),
        Box::new(RecordingBackend::new()),
        Box::new(loader),
    );

    let mut scenes = SceneManager::new(config.engine.scenes.on_load_failure);
    scenes::register_all(&mut scenes, &config.gameplay);
    let mut game = SceneGame::new(scenes, scenes::MAIN_MENU);

    let mut host = FixedRateHost::new(config.run.frame_ms, config.run.frames);
    for (frame, [x, y]) in SESSION {
        host = click(host, frame, Vec2::new(x, y));
    }

    let summary = driver.run(&mut game, &mut host)?;
    log::info!(
        "{} submissions recorded, {} buffers still alive",
        recorder.submission_count(),
        recorder.live_buffers()
    );
    Ok(summary)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1);
    let config = GameConfig::load_or_default(path.as_deref())?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.engine.log_filter())).init();
    log::info!("Starting {}", config.engine.window.title);

    match run(&config) {
        Ok(summary) => {
            println!(
                "{} frames, {} inputs, {:.2}s simulated in {:.1}ms",
                summary.frames,
                summary.inputs,
                summary.total_time,
                summary.wall_time_us as f64 / 1000.0
            );
            println!(
                "last frame: {} draw calls, {} quads",
                summary.last_frame.draw_calls, summary.last_frame.quads
            );
            log::info!("Sample finished successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Sample failed: {e}");
            Err(e)
        }
    }
}
