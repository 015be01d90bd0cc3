//! Title screen: a bouncing demo button and the way into the game

use super::{button_color, UiKit, SOLAR};
use crate::assets;
use sprite_engine::actions::{TweenOptions, TweenStyle};
use sprite_engine::assets::{AssetBundle, AssetRequest};
use sprite_engine::foundation::math::{Vec3, Vec4};
use sprite_engine::gui::GuiEvent;
use sprite_engine::input::KeyCode;
use sprite_engine::scene::{Loadable, Scene, SceneContext, SceneResult};
use std::cell::Cell;
use std::rc::Rc;

pub(crate) const BOUNCE_BUTTON: &str = "bounce";
pub(crate) const START_BUTTON: &str = "start";

const BUTTON_X: f32 = 350.0;
const BOUNCE_Y: f32 = 250.0;
const START_Y: f32 = 450.0;
const BOUNCE_HEIGHT: f32 = 100.0;
const BOUNCE_SECONDS: f32 = 1.5;

/// Main menu
pub struct MainMenuScene {
    bounce_y: Rc<Cell<f32>>,
    bouncing: Rc<Cell<bool>>,
}

impl MainMenuScene {
    /// New, unloaded menu
    pub fn new() -> Self {
        Self {
            bounce_y: Rc::new(Cell::new(BOUNCE_Y)),
            bouncing: Rc::new(Cell::new(false)),
        }
    }

    /// Drop the bounce button and tween it back up. Clicks during a bounce
    /// are ignored.
    fn bounce(&self, ctx: &SceneContext<'_>) {
        if self.bouncing.replace(true) {
            return;
        }

        let down = TweenOptions {
            style: TweenStyle::Bounce,
            start: BOUNCE_Y,
            finish: BOUNCE_Y + BOUNCE_HEIGHT,
            duration: BOUNCE_SECONDS,
            pause_on_start: 0.0,
        };
        let up = TweenOptions {
            start: down.finish,
            finish: down.start,
            ..down
        };

        let queue = ctx.queue();
        let y = self.bounce_y.clone();
        let back_y = self.bounce_y.clone();
        let bouncing = self.bouncing.clone();
        queue.tween(move |value| y.set(value), down).then(move || {
            queue
                .tween(move |value| back_y.set(value), up)
                .then(move || bouncing.set(false));
        });
    }
}

impl Default for MainMenuScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Loadable for MainMenuScene {
    fn request_assets(&self, request: &mut AssetRequest) {
        UiKit::request(request);
        request.sound("click", assets::CLICK_SOUND);
    }

    fn on_loaded(&mut self, ctx: &mut SceneContext<'_>, bundle: &AssetBundle) -> SceneResult<()> {
        let kit = UiKit::load(ctx, bundle)?;
        kit.add_button(&mut ctx.scene.gui, BOUNCE_BUTTON, "Bounce me", Vec3::new(BUTTON_X, BOUNCE_Y, 5.0))?;
        kit.add_button(&mut ctx.scene.gui, START_BUTTON, "Start", Vec3::new(BUTTON_X, START_Y, 5.0))?;
        ctx.add_sound(bundle.sound("click")?, "click");

        self.bounce_y.set(BOUNCE_Y);
        log::info!("Main menu ready");
        Ok(())
    }

    fn on_unload(&mut self, _ctx: &mut SceneContext<'_>) {
        self.bouncing.set(false);
    }
}

impl Scene for MainMenuScene {
    fn name(&self) -> &str {
        super::MAIN_MENU
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, _delta_time: f32) -> SceneResult<()> {
        ctx.scene
            .gui
            .set_position(BOUNCE_BUTTON, Vec3::new(BUTTON_X, self.bounce_y.get(), 5.0));
        Ok(())
    }

    fn on_gui_event(&mut self, ctx: &mut SceneContext<'_>, event: &GuiEvent) -> SceneResult<()> {
        match event {
            GuiEvent::Pressed(button) if *button == BOUNCE_BUTTON => {
                if let Some(sprite) = ctx.scene.gui.sprite_mut(BOUNCE_BUTTON) {
                    sprite.set_vertices_color(Vec4::new(1.0, 0.0, 0.0, 1.0));
                }
            }
            GuiEvent::Released(button) if *button == BOUNCE_BUTTON => {
                if let Some(sprite) = ctx.scene.gui.sprite_mut(BOUNCE_BUTTON) {
                    sprite.set_vertices_color(button_color());
                }
            }
            GuiEvent::Clicked { button, position } if *button == BOUNCE_BUTTON => {
                if let Some(label) = ctx.scene.gui.label_mut(BOUNCE_BUTTON) {
                    label.set_text(&format!("clicked: {:.0}, {:.0}", position.x, position.y));
                }
                ctx.play_sound("click")?;
                self.bounce(ctx);
            }
            GuiEvent::Clicked { button, .. } if *button == START_BUTTON => {
                ctx.play_sound("click")?;
                ctx.commands().switch_to(SOLAR);
            }
            _ => {}
        }
        Ok(())
    }

    fn on_key_down(&mut self, ctx: &mut SceneContext<'_>, key: KeyCode) -> SceneResult<()> {
        if key == KeyCode::Enter {
            ctx.commands().switch_to(SOLAR);
        }
        Ok(())
    }
}
