//! Scripted sessions through the real driver

use super::main_menu::{BOUNCE_BUTTON, START_BUTTON};
use super::solar::{LAND_BUTTON, TO_PLAYER_BUTTON};
use super::start_modal::OK_BUTTON;
use super::*;
use crate::config::GameConfig;
use sprite_engine::audio::RecordingBackend;
use sprite_engine::foundation::math::Vec2;
use sprite_engine::input::{InputEvent, KeyCode, MouseButton};
use sprite_engine::render::{HeadlessDevice, HeadlessRecorder};
use sprite_engine::scene::{SceneManager, SceneSlot, SceneState};
use sprite_engine::{Game, GameDriver, SceneGame};

const FRAME_MS: f64 = 16.0;

struct Session {
    driver: GameDriver,
    game: SceneGame,
    recorder: HeadlessRecorder,
    audio: RecordingBackend,
    frame: u64,
}

impl Session {
    fn start() -> Self {
        let config = GameConfig::default();
        let mut device = HeadlessDevice::new(800, 600);
        let recorder = device.recorder();
        let loader = assets::build_loader(&mut device);
        let audio = RecordingBackend::new();
        let mut driver = GameDriver::new(
            config.engine.clone(),
            Box::new(device),
            Box::new(audio.clone()),
            Box::new(loader),
        );

        let mut scenes = SceneManager::new(config.engine.scenes.on_load_failure);
        register_all(&mut scenes, &config.gameplay);
        let mut game = SceneGame::new(scenes, MAIN_MENU);
        game.on_init(driver.context_mut()).unwrap();

        let mut session = Self {
            driver,
            game,
            recorder,
            audio,
            frame: 0,
        };
        session.frames(1);
        session
    }

    fn frames(&mut self, count: u64) {
        for _ in 0..count {
            #[allow(clippy::cast_precision_loss)]
            let timestamp = self.frame as f64 * FRAME_MS;
            self.driver.frame(&mut self.game, timestamp).unwrap();
            self.frame += 1;
        }
    }

    fn input(&mut self, event: InputEvent) {
        self.driver.input(&mut self.game, &event).unwrap();
    }

    fn click(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        let button = MouseButton::Left;
        self.input(InputEvent::MouseDown { position, button });
        self.input(InputEvent::MouseUp { position, button });
    }

    /// Click the middle of a GUI button of the topmost scene
    fn click_button(&mut self, name: &str) {
        let hit_box = self.top().resources().gui.button(name).unwrap().hit_box();
        self.click(hit_box.x + hit_box.width / 2.0, hit_box.y + hit_box.height / 2.0);
    }

    fn top(&self) -> &SceneSlot {
        let scenes = self.game.scenes();
        scenes.modals().last().or_else(|| scenes.active()).unwrap()
    }

    fn played(&self, clip: &str) -> usize {
        self.audio.played().iter().filter(|sound| sound.clip == clip).count()
    }

    /// Menu, then the solar system with the intro modal dismissed
    fn into_solar(&mut self) {
        self.click_button(START_BUTTON);
        self.frames(45);
        self.click_button(OK_BUTTON);
        self.frames(1);
    }
}

#[test]
fn test_menu_button_bounces_and_relabels() {
    let mut session = Session::start();
    assert_eq!(session.game.scenes().active_name(), Some(MAIN_MENU));
    let start_y = session.top().resources().gui.position(BOUNCE_BUTTON).unwrap().y;

    session.click(475.0, 275.0);
    session.frames(30);

    let gui = &session.top().resources().gui;
    assert!(gui.position(BOUNCE_BUTTON).unwrap().y > start_y);
    let label = gui.button(BOUNCE_BUTTON).and_then(|button| button.label_node()).unwrap();
    let text = gui.graph().get(label).unwrap().kind.as_text().unwrap().text().to_string();
    assert_eq!(text, "clicked: 475, 275");
    assert_eq!(session.played("click"), 1);

    // down and back up again
    session.frames(200);
    let end_y = session.top().resources().gui.position(BOUNCE_BUTTON).unwrap().y;
    approx::assert_relative_eq!(end_y, start_y);
}

#[test]
fn test_start_opens_solar_system_with_intro_modal() {
    let mut session = Session::start();
    session.click_button(START_BUTTON);
    session.frames(2);
    assert_eq!(session.game.scenes().active_name(), Some(SOLAR));
    assert_eq!(session.game.scenes().modal_count(), 0);

    session.frames(40);
    let scenes = session.game.scenes();
    assert_eq!(scenes.modal_count(), 1);
    assert_eq!(scenes.active_state(), Some(SceneState::Paused));
    assert_eq!(session.top().name(), START_MODAL);

    session.click_button(OK_BUTTON);
    session.frames(1);
    let scenes = session.game.scenes();
    assert_eq!(scenes.modal_count(), 0);
    assert_eq!(scenes.active_state(), Some(SceneState::Ready));
}

#[test]
fn test_flying_to_a_planet_enables_landing() {
    let mut session = Session::start();
    session.into_solar();
    let land_visible = |session: &Session| session.top().resources().gui.button(LAND_BUTTON).unwrap().is_visible();
    assert!(!land_visible(&session));

    // camera is centred on the ship, so the screen position is also Terra's world position
    session.click(500.0, 500.0);
    session.frames(90);
    assert!(land_visible(&session));

    session.click_button(LAND_BUTTON);
    assert_eq!(session.played("pickup"), 1);
}

#[test]
fn test_gui_click_does_not_move_the_ship() {
    let mut session = Session::start();
    session.into_solar();
    session.click_button(TO_PLAYER_BUTTON);
    session.frames(90);
    let land = session.top().resources().gui.button(LAND_BUTTON).unwrap();
    assert!(!land.is_visible());
}

#[test]
fn test_escape_returns_to_menu_and_releases_solar() {
    let mut session = Session::start();
    session.into_solar();
    let buffers_in_solar = session.recorder.live_buffers();

    session.input(InputEvent::KeyDown(KeyCode::Escape));
    session.frames(2);
    assert_eq!(session.game.scenes().active_name(), Some(MAIN_MENU));
    assert_eq!(session.recorder.live_buffers(), buffers_in_solar);
    assert!(!session.driver.context().audio.has_sound("pickup"));
    assert_eq!(session.recorder.log().clear_color, [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_scripted_session_runs_to_completion() {
    let config = GameConfig::default();
    let summary = crate::run(&config).unwrap();
    assert_eq!(summary.frames, config.run.frames);
    assert_eq!(summary.inputs, 10);
    assert!(summary.last_frame.draw_calls > 0);
}
