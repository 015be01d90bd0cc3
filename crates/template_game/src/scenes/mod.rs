//! The sample's scenes

mod main_menu;
mod solar;
mod start_modal;

pub use main_menu::MainMenuScene;
pub use solar::SolarScene;
pub use start_modal::StartModal;

use crate::assets::{self, regions};
use crate::config::GameplayConfig;
use sprite_engine::assets::{AssetBundle, AssetRequest, Font, TextureAtlas, TextureRegion};
use sprite_engine::foundation::math::{Vec3, Vec4};
use sprite_engine::gui::{ButtonId, GuiManager};
use sprite_engine::render::{BlendMode, MaterialId};
use sprite_engine::scene::{SceneContext, SceneError, SceneManager, SceneResult, Sprite, Text};
use std::rc::Rc;

/// Main menu scene name
pub const MAIN_MENU: &str = "main_menu";
/// Solar system scene name
pub const SOLAR: &str = "solar";
/// Intro modal scene name
pub const START_MODAL: &str = "start_modal";

/// Register every scene factory
pub fn register_all(scenes: &mut SceneManager, gameplay: &GameplayConfig) {
    scenes.register(MAIN_MENU, || Box::new(MainMenuScene::new()));
    let gameplay = gameplay.clone();
    scenes.register(SOLAR, move || Box::new(SolarScene::new(gameplay.clone())));
    scenes.register(START_MODAL, || Box::new(StartModal::new()));
}

const BUTTON_COLOR: [f32; 4] = [0.3, 0.5, 0.7, 1.0];

/// Sheet, font and the two materials every scene draws with
struct UiKit {
    atlas: Rc<TextureAtlas>,
    font: Rc<Font>,
    sprite_material: MaterialId,
    text_material: MaterialId,
}

impl UiKit {
    fn request(request: &mut AssetRequest) {
        request
            .texture("sheet", assets::SOLAR_TEXTURE)
            .atlas("atlas", assets::SOLAR_ATLAS)
            .font("font", assets::MAIN_FONT);
    }

    fn load(ctx: &mut SceneContext<'_>, bundle: &AssetBundle) -> SceneResult<Self> {
        let sheet = bundle.texture("sheet")?;
        let atlas = bundle.atlas("atlas")?;
        let font = bundle.font("font")?;

        let materials = &mut ctx.game.materials;
        let sprite_material = materials.register("solar", "sprite", Some(sheet.id), BlendMode::Alpha);
        let text_material = materials.register("font", "text", font.texture(), BlendMode::Alpha);

        Ok(Self {
            atlas,
            font,
            sprite_material,
            text_material,
        })
    }

    fn region(&self, name: &str) -> SceneResult<TextureRegion> {
        self.atlas
            .region(name)
            .ok_or_else(|| SceneError::Custom(format!("atlas has no region '{name}'")))
    }

    /// Sprite showing `region` at its natural size
    fn sprite(&self, region: &str) -> SceneResult<Sprite> {
        let region = self.region(region)?;
        Ok(Sprite::new(self.sprite_material, region.size.x, region.size.y).with_region(region))
    }

    fn text(&self, text: &str) -> Text {
        Text::new(self.font.clone(), self.text_material, text)
    }

    fn add_button(&self, gui: &mut GuiManager, name: &str, label: &str, position: Vec3) -> SceneResult<ButtonId> {
        let mut sprite = self.sprite(regions::BUTTON)?;
        sprite.set_vertices_color(button_color());
        Ok(gui.add_button(name, sprite, Some(self.text(label)), position)?)
    }
}

fn button_color() -> Vec4 {
    let [r, g, b, a] = BUTTON_COLOR;
    Vec4::new(r, g, b, a)
}

#[cfg(test)]
mod tests;
