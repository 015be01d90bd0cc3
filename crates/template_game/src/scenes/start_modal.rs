//! Intro panel shown over the solar system

use super::{UiKit, START_MODAL};
use crate::assets::regions;
use sprite_engine::assets::{AssetBundle, AssetRequest};
use sprite_engine::foundation::math::{Transform2D, Vec3, Vec4};
use sprite_engine::gui::GuiEvent;
use sprite_engine::input::KeyCode;
use sprite_engine::scene::{Loadable, Scene, SceneContext, SceneResult, Sprite};

pub(crate) const OK_BUTTON: &str = "ok";

const PANEL_ORIGIN: [f32; 2] = [272.0, 220.0];
const MESSAGE: &str = "Click to fly.\nLand to trade.";

/// Modal with a short explanation and an OK button
#[derive(Debug, Default)]
pub struct StartModal;

impl StartModal {
    /// New, unloaded modal
    pub fn new() -> Self {
        Self
    }
}

impl Loadable for StartModal {
    fn request_assets(&self, request: &mut AssetRequest) {
        UiKit::request(request);
    }

    fn on_loaded(&mut self, ctx: &mut SceneContext<'_>, bundle: &AssetBundle) -> SceneResult<()> {
        let kit = UiKit::load(ctx, bundle)?;
        let (width, height) = (ctx.game.render.width() as f32, ctx.game.render.height() as f32);

        // dim whatever is below
        let mut shade = Sprite::new(kit.sprite_material, width, height);
        shade.set_vertices_color(Vec4::new(0.0, 0.0, 0.0, 0.5));
        let graph = &mut ctx.scene.graph;
        graph.add_root(shade, Transform2D::identity());

        let [x, y] = PANEL_ORIGIN;
        let panel = graph.add_root(kit.sprite(regions::PANEL)?, Transform2D::from_position(Vec3::new(x, y, 1.0)));
        graph.add_child(panel, kit.text(MESSAGE), Transform2D::from_position(Vec3::new(16.0, 16.0, 1.0)))?;

        kit.add_button(&mut ctx.scene.gui, OK_BUTTON, "OK", Vec3::new(x + 3.0, y + 100.0, 5.0))?;
        Ok(())
    }
}

impl Scene for StartModal {
    fn name(&self) -> &str {
        START_MODAL
    }

    fn on_gui_event(&mut self, ctx: &mut SceneContext<'_>, event: &GuiEvent) -> SceneResult<()> {
        if matches!(event, GuiEvent::Clicked { button, .. } if *button == OK_BUTTON) {
            ctx.commands().close_modal();
        }
        Ok(())
    }

    fn on_key_down(&mut self, ctx: &mut SceneContext<'_>, key: KeyCode) -> SceneResult<()> {
        if matches!(key, KeyCode::Escape | KeyCode::Enter) {
            ctx.commands().close_modal();
        }
        Ok(())
    }
}
