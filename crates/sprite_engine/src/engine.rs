//! Frame-loop game driver
//!
//! The host (a browser animation callback, a window event loop, a test
//! script) is abstracted as a [`FrameSource`] yielding frames and input.
//! For every frame the driver advances the clock, runs the game-wide
//! scheduler, calls `on_update`, prepares the device and calls `on_render`.

use crate::application::{Game, GameError};
use crate::assets::AssetLoader;
use crate::audio::AudioBackend;
use crate::config::{ConfigError, EngineConfig};
use crate::context::GameContext;
use crate::foundation::time::{FrameClock, Stopwatch};
use crate::input::InputEvent;
use crate::render::{RenderDevice, RenderStats};
use std::collections::VecDeque;
use thiserror::Error;

/// Something the host delivers to the driver
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Animation frame at a host timestamp in milliseconds
    Frame(f64),
    /// User input
    Input(InputEvent),
    /// Stop the loop
    Shutdown,
}

/// Source of host events. Returning `None` ends the run.
pub trait FrameSource {
    /// Next event, in delivery order
    fn next_event(&mut self) -> Option<HostEvent>;
}

/// Host that replays a fixed list of events
#[derive(Debug, Default, Clone)]
pub struct ScriptedHost {
    events: VecDeque<HostEvent>,
}

impl ScriptedHost {
    /// Create a host replaying `events`
    pub fn new(events: impl IntoIterator<Item = HostEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Append an event
    pub fn push(&mut self, event: HostEvent) {
        self.events.push_back(event);
    }
}

impl FrameSource for ScriptedHost {
    fn next_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}

/// Host producing `frames` frames `frame_ms` apart, with optional input
/// delivered just before given frames
#[derive(Debug, Clone)]
pub struct FixedRateHost {
    frame_ms: f64,
    frames: u64,
    emitted: u64,
    inputs: Vec<(u64, InputEvent)>,
    queued: VecDeque<HostEvent>,
}

impl FixedRateHost {
    /// Create a host running `frames` frames at `frame_ms` intervals
    pub fn new(frame_ms: f64, frames: u64) -> Self {
        Self {
            frame_ms,
            frames,
            emitted: 0,
            inputs: Vec::new(),
            queued: VecDeque::new(),
        }
    }

    /// Deliver `event` before frame number `frame` (0-based)
    #[must_use]
    pub fn with_input(mut self, frame: u64, event: InputEvent) -> Self {
        self.inputs.push((frame, event));
        self
    }

    /// Frames produced so far
    pub fn frames_emitted(&self) -> u64 {
        self.emitted
    }
}

impl FrameSource for FixedRateHost {
    fn next_event(&mut self) -> Option<HostEvent> {
        if let Some(event) = self.queued.pop_front() {
            return Some(event);
        }
        if self.emitted >= self.frames {
            return None;
        }

        let frame = self.emitted;
        self.queued.extend(
            self.inputs
                .iter()
                .filter(|(at, _)| *at == frame)
                .map(|(_, event)| HostEvent::Input(*event)),
        );
        #[allow(clippy::cast_precision_loss)]
        self.queued.push_back(HostEvent::Frame(frame as f64 * self.frame_ms));
        self.emitted += 1;
        self.queued.pop_front()
    }
}

/// What a finished run did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    /// Frames processed
    pub frames: u64,
    /// Input events forwarded
    pub inputs: u64,
    /// Simulated time in seconds
    pub total_time: f64,
    /// Device statistics of the last rendered frame
    pub last_frame: RenderStats,
    /// Wall-clock time spent in the loop, in microseconds
    pub wall_time_us: u64,
}

/// Owns the game context and runs the frame loop
#[derive(Debug)]
pub struct GameDriver {
    context: GameContext,
    clock: FrameClock,
}

impl GameDriver {
    /// Create a driver over the given capabilities
    pub fn new(
        config: EngineConfig,
        device: Box<dyn RenderDevice>,
        audio: Box<dyn AudioBackend>,
        loader: Box<dyn AssetLoader>,
    ) -> Self {
        log::info!(
            "Initializing driver ({}x{}, '{}')",
            device.width(),
            device.height(),
            config.window.title
        );
        let clock = FrameClock::new(config.timing.max_frame_delta);
        Self {
            context: GameContext::new(config, device, audio, loader),
            clock,
        }
    }

    /// Create a driver with configuration read from `path`
    pub fn from_config_file(
        path: &str,
        device: Box<dyn RenderDevice>,
        audio: Box<dyn AudioBackend>,
        loader: Box<dyn AssetLoader>,
    ) -> Result<Self, EngineError> {
        use crate::config::Config;
        let config = EngineConfig::load_from_file(path)?;
        Ok(Self::new(config, device, audio, loader))
    }

    /// The game context
    pub fn context(&self) -> &GameContext {
        &self.context
    }

    /// The game context, mutably
    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.context
    }

    /// The frame clock
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Run `game` until the host runs out of events or asks to stop.
    ///
    /// An error from any game hook stops the loop; `on_shutdown` still runs
    /// before the error is returned.
    pub fn run<G: Game>(&mut self, game: &mut G, host: &mut dyn FrameSource) -> Result<RunSummary, EngineError> {
        let stopwatch = Stopwatch::start_new();
        game.on_init(&mut self.context).map_err(EngineError::Initialization)?;

        log::info!("Starting main loop...");
        let mut summary = RunSummary::default();
        let result = self.pump(game, host, &mut summary);

        game.on_shutdown(&mut self.context);
        self.context.actions.clear();
        summary.total_time = self.clock.total_time();
        summary.wall_time_us = stopwatch.elapsed_micros();

        match result {
            Ok(()) => {
                log::info!("Driver stopped after {} frames", summary.frames);
                Ok(summary)
            }
            Err(error) => {
                log::error!("Driver halted: {error}");
                Err(error)
            }
        }
    }

    fn pump<G: Game>(&mut self, game: &mut G, host: &mut dyn FrameSource, summary: &mut RunSummary) -> Result<(), EngineError> {
        while let Some(event) = host.next_event() {
            match event {
                HostEvent::Frame(timestamp) => {
                    self.frame(game, timestamp)?;
                    summary.frames += 1;
                    summary.last_frame = self.context.render.statistics();
                }
                HostEvent::Input(input) => {
                    self.input(game, &input)?;
                    summary.inputs += 1;
                }
                HostEvent::Shutdown => {
                    log::info!("Host requested shutdown");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Process one frame: update, then render
    pub fn frame<G: Game>(&mut self, game: &mut G, timestamp: f64) -> Result<(), EngineError> {
        let delta_time = self.clock.tick(timestamp);
        let ctx = &mut self.context;

        ctx.actions.update(delta_time);
        game.on_update(ctx, timestamp, delta_time).map_err(EngineError::Update)?;

        ctx.render.begin_frame();
        game.on_render(ctx).map_err(EngineError::Render)?;

        if self.clock.frame_count() % 600 == 0 {
            log::debug!("{:.1} fps", self.clock.current_fps());
        }
        Ok(())
    }

    /// Forward one input event
    pub fn input<G: Game>(&mut self, game: &mut G, event: &InputEvent) -> Result<(), EngineError> {
        self.context.input.apply(event);
        game.on_input(&mut self.context, event).map_err(EngineError::Input)
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// `on_init` failed
    #[error("Initialization failed: {0}")]
    Initialization(#[source] GameError),

    /// `on_update` failed
    #[error("Update failed: {0}")]
    Update(#[source] GameError),

    /// `on_render` failed
    #[error("Render failed: {0}")]
    Render(#[source] GameError),

    /// `on_input` failed
    #[error("Input handling failed: {0}")]
    Input(#[source] GameError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SceneGame;
    use crate::assets::{AssetBundle, MemoryLoader};
    use crate::audio::NullBackend;
    use crate::config::LoadFailurePolicy;
    use crate::foundation::math::Vec2;
    use crate::input::{KeyCode, MouseButton};
    use crate::render::{HeadlessDevice, HeadlessRecorder};
    use crate::scene::{Loadable, Scene, SceneContext, SceneManager, SceneResult, SceneState};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Trace = Rc<RefCell<Vec<String>>>;

    #[derive(Default)]
    struct TraceGame {
        trace: Trace,
        deltas: Vec<f32>,
        fail_on_frame: Option<usize>,
    }

    impl Game for TraceGame {
        fn on_init(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
            self.trace.borrow_mut().push("init".into());
            let trace = self.trace.clone();
            ctx.actions.add(move |_| trace.borrow_mut().push("global".into()), 0.0);
            Ok(())
        }

        fn on_update(&mut self, _ctx: &mut GameContext, _timestamp: f64, delta_time: f32) -> Result<(), GameError> {
            self.deltas.push(delta_time);
            self.trace.borrow_mut().push("update".into());
            if self.fail_on_frame == Some(self.deltas.len()) {
                return Err(GameError::Custom("bad frame".into()));
            }
            Ok(())
        }

        fn on_render(&mut self, _ctx: &mut GameContext) -> Result<(), GameError> {
            self.trace.borrow_mut().push("render".into());
            Ok(())
        }

        fn on_input(&mut self, ctx: &mut GameContext, event: &InputEvent) -> Result<(), GameError> {
            if let InputEvent::KeyDown(key) = event {
                assert!(ctx.input.is_key_down(*key));
            }
            self.trace.borrow_mut().push("input".into());
            Ok(())
        }

        fn on_shutdown(&mut self, _ctx: &mut GameContext) {
            self.trace.borrow_mut().push("shutdown".into());
        }
    }

    fn driver() -> (GameDriver, HeadlessRecorder) {
        let device = HeadlessDevice::new(640, 480);
        let recorder = device.recorder();
        let driver = GameDriver::new(
            EngineConfig::default(),
            Box::new(device),
            Box::new(NullBackend),
            Box::new(MemoryLoader::new()),
        );
        (driver, recorder)
    }

    #[test]
    fn test_update_then_render_per_frame() {
        let (mut driver, recorder) = driver();
        let mut game = TraceGame::default();
        let mut host = ScriptedHost::new([
            HostEvent::Frame(1000.0),
            HostEvent::Input(InputEvent::KeyDown(KeyCode::Space)),
            HostEvent::Frame(1016.0),
        ]);

        let summary = driver.run(&mut game, &mut host).unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.inputs, 1);
        assert_eq!(
            *game.trace.borrow(),
            vec!["init", "global", "update", "render", "input", "update", "render", "shutdown"]
        );
        assert_eq!(game.deltas[0], 0.0);
        assert!((game.deltas[1] - 0.016).abs() < 1e-6);
        assert_eq!(recorder.log().clears.len(), 2);
        assert_eq!(recorder.log().state_resets, 2);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let (mut driver, _) = driver();
        let mut game = TraceGame::default();
        let mut host = ScriptedHost::new([HostEvent::Frame(0.0), HostEvent::Frame(10_000.0)]);
        driver.run(&mut game, &mut host).unwrap();
        assert!((game.deltas[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_failed_update_halts_before_render() {
        let (mut driver, _) = driver();
        let mut game = TraceGame {
            fail_on_frame: Some(2),
            ..TraceGame::default()
        };
        let mut host = FixedRateHost::new(16.0, 10);

        let err = driver.run(&mut game, &mut host).unwrap_err();
        assert!(matches!(err, EngineError::Update(GameError::Custom(_))));
        assert_eq!(game.deltas.len(), 2);
        assert_eq!(host.frames_emitted(), 2);
        let trace = game.trace.borrow();
        assert_eq!(trace[trace.len() - 2], "update");
        assert_eq!(trace[trace.len() - 1], "shutdown");
    }

    #[test]
    fn test_shutdown_event_stops_the_loop() {
        let (mut driver, _) = driver();
        let mut game = TraceGame::default();
        let mut host = ScriptedHost::new([HostEvent::Frame(0.0), HostEvent::Shutdown, HostEvent::Frame(16.0)]);
        let summary = driver.run(&mut game, &mut host).unwrap();
        assert_eq!(summary.frames, 1);
    }

    #[test]
    fn test_fixed_rate_host_interleaves_input() {
        let click = InputEvent::MouseDown {
            position: Vec2::new(1.0, 2.0),
            button: MouseButton::Left,
        };
        let mut host = FixedRateHost::new(20.0, 2).with_input(1, click);
        assert_eq!(host.next_event(), Some(HostEvent::Frame(0.0)));
        assert_eq!(host.next_event(), Some(HostEvent::Input(click)));
        assert_eq!(host.next_event(), Some(HostEvent::Frame(20.0)));
        assert_eq!(host.next_event(), None);
    }

    struct Blank {
        updates: Rc<RefCell<u32>>,
    }

    impl Loadable for Blank {
        fn on_loaded(&mut self, _ctx: &mut SceneContext<'_>, _assets: &AssetBundle) -> SceneResult<()> {
            Ok(())
        }
    }

    impl Scene for Blank {
        fn name(&self) -> &str {
            "blank"
        }

        fn update(&mut self, _ctx: &mut SceneContext<'_>, _delta_time: f32) -> SceneResult<()> {
            *self.updates.borrow_mut() += 1;
            Ok(())
        }
    }

    #[test]
    fn test_scene_game_runs_initial_scene() {
        let (mut driver, recorder) = driver();
        let updates = Rc::new(RefCell::new(0));
        let counter = updates.clone();
        let mut scenes = SceneManager::new(LoadFailurePolicy::Abort);
        scenes.register("blank", move || {
            Box::new(Blank {
                updates: counter.clone(),
            })
        });
        let mut game = SceneGame::new(scenes, "blank");

        driver.run(&mut game, &mut FixedRateHost::new(16.0, 3)).unwrap();
        assert_eq!(*updates.borrow(), 3);
        assert_eq!(game.scenes().active_state(), None);
        assert_eq!(recorder.live_buffers(), 0);
    }

    #[test]
    fn test_unknown_initial_scene_fails_init() {
        let (mut driver, _) = driver();
        let mut game = SceneGame::new(SceneManager::new(LoadFailurePolicy::Abort), "missing");
        let err = driver.run(&mut game, &mut ScriptedHost::default()).unwrap_err();
        assert!(matches!(err, EngineError::Initialization(GameError::Scene(_))));
    }

    #[test]
    fn test_scene_state_is_ready_during_run() {
        let (mut driver, _) = driver();
        let mut scenes = SceneManager::new(LoadFailurePolicy::Abort);
        scenes.register("blank", || {
            Box::new(Blank {
                updates: Rc::default(),
            })
        });
        let mut game = SceneGame::new(scenes, "blank");
        game.on_init(driver.context_mut()).unwrap();
        driver.frame(&mut game, 0.0).unwrap();
        assert_eq!(game.scenes().active_state(), Some(SceneState::Ready));
    }
}
