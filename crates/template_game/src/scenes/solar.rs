//! Solar system: fly the ship between planets and land to browse shops

use super::{UiKit, MAIN_MENU, START_MODAL};
use crate::assets::{self, regions};
use crate::config::GameplayConfig;
use crate::solar::{generate_shop, NebulaField, Planet, ShopItem, PLANETS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sprite_engine::actions::{ActionHandle, ActionStatus};
use sprite_engine::assets::{AssetBundle, AssetRequest};
use sprite_engine::foundation::math::{utils, Transform2D, Vec2, Vec3};
use sprite_engine::gui::GuiEvent;
use sprite_engine::input::{KeyCode, MouseButton};
use sprite_engine::scene::{Loadable, NodeId, Scene, SceneContext, SceneResult, Sprite};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub(crate) const TO_PLAYER_BUTTON: &str = "to_player";
pub(crate) const LAND_BUTTON: &str = "land";

const CLEAR_COLOR: [f32; 4] = [2.0 / 255.0, 4.0 / 255.0, 34.0 / 255.0, 1.0];
const PLAYER_START: [f32; 2] = [400.0, 300.0];
const ARRIVAL_DISTANCE: f32 = 1.0;

/// The playable system
pub struct SolarScene {
    settings: GameplayConfig,
    rng: StdRng,
    planets: Vec<Planet>,
    shops: Rc<RefCell<Vec<Vec<ShopItem>>>>,
    player: Option<NodeId>,
    cursor: Option<NodeId>,
    player_position: Rc<Cell<Vec2>>,
    movement: ActionHandle,
    nebulae: NebulaField,
    nebula_sprite: Option<Sprite>,
    landing: Option<usize>,
}

impl SolarScene {
    /// New, unloaded system
    pub fn new(settings: GameplayConfig) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// New system rolling shops and clouds from `rng`
    pub fn with_rng(settings: GameplayConfig, rng: StdRng) -> Self {
        let nebulae = NebulaField::new(settings.nebula_count, settings.nebula_field_radius);
        Self {
            settings,
            rng,
            planets: Vec::new(),
            shops: Rc::new(RefCell::new(Vec::new())),
            player: None,
            cursor: None,
            player_position: Rc::new(Cell::new(Vec2::new(PLAYER_START[0], PLAYER_START[1]))),
            movement: ActionHandle::inert(),
            nebulae,
            nebula_sprite: None,
            landing: None,
        }
    }

    /// Fly the player towards `target` (world units). Any previous flight is
    /// cancelled.
    fn move_player_to(&mut self, ctx: &mut SceneContext<'_>, target: Vec2) {
        self.movement.cancel();

        let from = self.player_position.get();
        if let Some(cursor) = self.cursor.and_then(|cursor| ctx.scene.graph.get_mut(cursor)) {
            cursor.transform.position = Vec3::new(target.x, target.y, 8.0);
            cursor.visible = true;
        }
        if let Some(player) = self.player.and_then(|player| ctx.scene.graph.get_mut(player)) {
            player.transform.rotation = utils::angle_of(target - from) + 90.0;
        }

        let position = self.player_position.clone();
        let speed = self.settings.player_speed;
        self.movement = ctx.actions().add(
            move |dt| {
                let to_target = target - position.get();
                let distance = to_target.norm();
                if distance < ARRIVAL_DISTANCE {
                    return true;
                }
                let step = (speed * dt).min(distance);
                position.set(position.get() + to_target / distance * step);
                false
            },
            0.0,
        );
    }

    fn stop(&mut self, ctx: &mut SceneContext<'_>) {
        self.movement.cancel();
        if let Some(cursor) = self.cursor.and_then(|cursor| ctx.scene.graph.get_mut(cursor)) {
            cursor.visible = false;
        }
    }

    fn nearest_planet(&self, position: Vec2) -> Option<usize> {
        self.planets
            .iter()
            .enumerate()
            .map(|(index, planet)| (index, (planet.position - position).norm()))
            .filter(|&(_, distance)| distance <= self.settings.landing_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    fn land(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult<()> {
        let Some(index) = self.landing else {
            return Ok(());
        };
        self.stop(ctx);
        ctx.play_sound("pickup")?;

        let shops = self.shops.borrow();
        let planet = &self.planets[index];
        let stock = shops.get(index).map_or(0, Vec::len);
        log::info!("Landed on {} ({stock} items for sale)", planet.name);
        for item in shops.get(index).into_iter().flatten() {
            log::debug!("  {} for {}", item.name, item.price);
        }
        Ok(())
    }
}

impl Loadable for SolarScene {
    fn request_assets(&self, request: &mut AssetRequest) {
        UiKit::request(request);
        request.sound("pickup", assets::PICKUP_SOUND);
    }

    fn on_loaded(&mut self, ctx: &mut SceneContext<'_>, bundle: &AssetBundle) -> SceneResult<()> {
        let kit = UiKit::load(ctx, bundle)?;
        ctx.game.render.set_clear_color(CLEAR_COLOR);

        let start = self.player_position.get();
        let nebula = kit.sprite(regions::NEBULA)?.with_pivot(Vec2::new(0.5, 0.5));
        let graph = &mut ctx.scene.graph;
        self.nebulae
            .populate(graph, &nebula, start, self.settings.nebula_count, &mut self.rng);
        self.nebula_sprite = Some(nebula);

        for def in &PLANETS {
            let planet = Planet::spawn(graph, def, kit.sprite(regions::PLANET)?, kit.text(def.name))?;
            self.planets.push(planet);
        }

        let ship = kit.sprite(regions::SHIP)?.with_pivot(Vec2::new(0.5, 0.5));
        self.player = Some(graph.add_root(ship, Transform2D::from_position(Vec3::new(start.x, start.y, 10.0))));
        let cursor = graph.add_root(
            kit.sprite(regions::CURSOR)?.with_pivot(Vec2::new(0.5, 0.5)),
            Transform2D::identity(),
        );
        if let Some(node) = graph.get_mut(cursor) {
            node.visible = false;
        }
        self.cursor = Some(cursor);
        ctx.scene.camera.center_on(start);

        kit.add_button(&mut ctx.scene.gui, TO_PLAYER_BUTTON, "To player", Vec3::new(10.0, 10.0, 5.0))?;
        kit.add_button(&mut ctx.scene.gui, LAND_BUTTON, "Land", Vec3::new(10.0, 70.0, 5.0))?;
        ctx.scene.gui.set_visible(LAND_BUTTON, false);
        ctx.add_sound(bundle.sound("pickup")?, "pickup");

        // shops restock on a timer
        let shop_size = self.settings.shop_size;
        let planet_count = self.planets.len();
        let mut restock_rng = StdRng::seed_from_u64(self.rng.gen());
        let shops = self.shops.clone();
        *shops.borrow_mut() = (0..planet_count).map(|_| generate_shop(&mut restock_rng, shop_size)).collect();
        ctx.actions().add_repeating(
            move |_| {
                *shops.borrow_mut() = (0..planet_count).map(|_| generate_shop(&mut restock_rng, shop_size)).collect();
                log::debug!("Shops restocked");
                ActionStatus::Continue
            },
            self.settings.shop_refresh_interval,
        );

        let commands = ctx.commands();
        ctx.actions()
            .add(move |_| commands.show_modal(START_MODAL, true), self.settings.start_modal_delay);

        log::info!("Solar system ready with {} planets", self.planets.len());
        Ok(())
    }

    fn on_unload(&mut self, ctx: &mut SceneContext<'_>) {
        ctx.game.render.set_clear_color(ctx.game.config.render.clear_color);
        self.planets.clear();
        self.player = None;
        self.cursor = None;
        self.landing = None;
    }
}

impl Scene for SolarScene {
    fn name(&self) -> &str {
        super::SOLAR
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, delta_time: f32) -> SceneResult<()> {
        let position = self.player_position.get();
        if let Some(player) = self.player.and_then(|player| ctx.scene.graph.get_mut(player)) {
            player.transform.position.x = position.x;
            player.transform.position.y = position.y;
        }
        if !self.movement.is_active() {
            if let Some(cursor) = self.cursor.and_then(|cursor| ctx.scene.graph.get_mut(cursor)) {
                cursor.visible = false;
            }
        }

        if let Some(template) = &self.nebula_sprite {
            self.nebulae
                .update(&mut ctx.scene.graph, template, position, delta_time, &mut self.rng);
        }

        let landing = self.nearest_planet(position);
        if landing != self.landing {
            ctx.scene.gui.set_visible(LAND_BUTTON, landing.is_some());
            self.landing = landing;
        }
        Ok(())
    }

    fn on_pause(&mut self, ctx: &mut SceneContext<'_>, paused: bool) {
        if paused {
            self.stop(ctx);
        }
        log::debug!("Solar system {}", if paused { "paused" } else { "resumed" });
    }

    fn on_gui_event(&mut self, ctx: &mut SceneContext<'_>, event: &GuiEvent) -> SceneResult<()> {
        let GuiEvent::Clicked { button, .. } = event else {
            return Ok(());
        };
        if *button == TO_PLAYER_BUTTON {
            self.stop(ctx);
            ctx.scene.camera.center_on(self.player_position.get());
        } else if *button == LAND_BUTTON {
            self.land(ctx)?;
        }
        Ok(())
    }

    fn on_mouse_down(&mut self, ctx: &mut SceneContext<'_>, position: Vec2, button: MouseButton) -> SceneResult<()> {
        if button == MouseButton::Left {
            let target = ctx.scene.camera.screen_to_world(position);
            self.move_player_to(ctx, target);
        }
        Ok(())
    }

    fn on_key_down(&mut self, ctx: &mut SceneContext<'_>, key: KeyCode) -> SceneResult<()> {
        if key == KeyCode::Escape {
            ctx.commands().switch_to(MAIN_MENU);
        }
        Ok(())
    }
}
