//! Game asset definitions
//!
//! The sample runs headless, so assets are built in memory and served by a
//! [`MemoryLoader`] under the paths scenes request.

use sprite_engine::assets::{Asset, Font, MemoryLoader, TextureAtlas, TextureInfo};
use sprite_engine::audio::SoundClip;
use sprite_engine::foundation::math::{Rect, Vec2};
use sprite_engine::render::RenderDevice;
use std::rc::Rc;

/// Sprite sheet texture
pub const SOLAR_TEXTURE: &str = "textures/solar.png";
/// Named regions of the sprite sheet
pub const SOLAR_ATLAS: &str = "textures/solar.atlas";
/// Bitmap font
pub const MAIN_FONT: &str = "fonts/main.fnt";
/// Landing sound
pub const PICKUP_SOUND: &str = "sounds/pickup.ogg";
/// Button sound
pub const CLICK_SOUND: &str = "sounds/click.ogg";

/// Atlas region names
pub mod regions {
    /// Planet disc
    pub const PLANET: &str = "circle_bordered.png";
    /// Player ship
    pub const SHIP: &str = "ship.png";
    /// Move target marker
    pub const CURSOR: &str = "cursor.png";
    /// Nebula cloud
    pub const NEBULA: &str = "nebula.png";
    /// Button background
    pub const BUTTON: &str = "button.png";
    /// Modal panel
    pub const PANEL: &str = "panel.png";
}

const ATLAS_SIZE: u32 = 512;
const FONT_CELL: f32 = 16.0;
const FONT_COLUMNS: usize = 16;
const FONT_CHARS: &str = " !,.:-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Create the game's textures on `device` and a loader serving every asset
pub fn build_loader(device: &mut dyn RenderDevice) -> MemoryLoader {
    let sheet = device.create_texture(ATLAS_SIZE, ATLAS_SIZE);
    let mut atlas = TextureAtlas::new(sheet, ATLAS_SIZE, ATLAS_SIZE);
    atlas
        .add_region(regions::PLANET, Rect::new(0.0, 0.0, 128.0, 128.0))
        .add_region(regions::SHIP, Rect::new(128.0, 0.0, 32.0, 32.0))
        .add_region(regions::CURSOR, Rect::new(160.0, 0.0, 16.0, 16.0))
        .add_region(regions::NEBULA, Rect::new(256.0, 0.0, 256.0, 256.0))
        .add_region(regions::BUTTON, Rect::new(0.0, 128.0, 250.0, 50.0))
        .add_region(regions::PANEL, Rect::new(0.0, 256.0, 256.0, 160.0));

    let glyph_sheet = device.create_texture(256, 128);
    let font = Font::monospace("main", Some(glyph_sheet), Vec2::new(FONT_CELL, FONT_CELL), FONT_COLUMNS, FONT_CHARS);

    let mut loader = MemoryLoader::new();
    loader
        .insert(
            SOLAR_TEXTURE,
            Asset::Texture(TextureInfo {
                id: sheet,
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
            }),
        )
        .insert(SOLAR_ATLAS, Asset::Atlas(Rc::new(atlas)))
        .insert(MAIN_FONT, Asset::Font(Rc::new(font)))
        .insert(PICKUP_SOUND, Asset::Sound(Rc::new(SoundClip::new("pickup", 0.4))))
        .insert(CLICK_SOUND, Asset::Sound(Rc::new(SoundClip::new("click", 0.1))));
    log::debug!("Built in-memory assets on {}x{} device", device.width(), device.height());
    loader
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprite_engine::render::HeadlessDevice;

    #[test]
    fn test_every_path_is_served() {
        let mut device = HeadlessDevice::new(800, 600);
        let loader = build_loader(&mut device);
        for path in [SOLAR_TEXTURE, SOLAR_ATLAS, MAIN_FONT, PICKUP_SOUND, CLICK_SOUND] {
            assert!(loader.contains(path), "{path}");
        }
        assert_eq!(device.recorder().log().live_textures.len(), 2);
    }
}
