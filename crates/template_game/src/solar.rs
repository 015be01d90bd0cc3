//! Solar system objects: planets, their shops and the nebula field

use rand::Rng;
use sprite_engine::foundation::collections::{Pool, PoolIndex};
use sprite_engine::foundation::math::{utils, Transform2D, Vec2, Vec3, Vec4};
use sprite_engine::scene::{GraphError, NodeId, SceneGraph, Sprite, Text};

/// Something a planet shop sells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopItem {
    /// Display name
    pub name: String,
    /// Price in credits
    pub price: u32,
}

const ITEM_KINDS: [&str; 6] = ["Laser", "Shield", "Engine", "Hull plate", "Scanner", "Cargo pod"];
const ITEM_GRADES: [&str; 4] = ["Worn", "Standard", "Tuned", "Prototype"];

/// Roll a fresh shop inventory
pub fn generate_shop(rng: &mut impl Rng, size: usize) -> Vec<ShopItem> {
    (0..size)
        .map(|_| {
            let grade = rng.gen_range(0..ITEM_GRADES.len());
            let kind = ITEM_KINDS[rng.gen_range(0..ITEM_KINDS.len())];
            ShopItem {
                name: format!("{} {kind}", ITEM_GRADES[grade]),
                price: 50 * (grade as u32 + 1) + rng.gen_range(0..50),
            }
        })
        .collect()
}

/// Where a planet sits and how it looks
#[derive(Debug, Clone, Copy)]
pub struct PlanetDef {
    /// Planet name, shown under it
    pub name: &'static str,
    /// Centre in world units
    pub position: [f32; 2],
    /// Tint
    pub color: [f32; 4],
}

/// The planets of the sample system
pub const PLANETS: [PlanetDef; 2] = [
    PlanetDef {
        name: "Terra",
        position: [500.0, 500.0],
        color: [29.0 / 255.0, 172.0 / 255.0, 109.0 / 255.0, 1.0],
    },
    PlanetDef {
        name: "Ares",
        position: [1100.0, 250.0],
        color: [200.0 / 255.0, 90.0 / 255.0, 60.0 / 255.0, 1.0],
    },
];

/// A planet in the scene graph
#[derive(Debug, Clone)]
pub struct Planet {
    /// Planet name
    pub name: &'static str,
    /// Disc node
    pub node: NodeId,
    /// Name label node (child of the disc)
    pub label: NodeId,
    /// Centre in world units
    pub position: Vec2,
}

impl Planet {
    /// Add the disc and its label to `graph`
    pub fn spawn(graph: &mut SceneGraph, def: &PlanetDef, disc: Sprite, mut label: Text) -> Result<Self, GraphError> {
        let [r, g, b, a] = def.color;
        let mut disc = disc.with_pivot(Vec2::new(0.5, 0.5));
        disc.set_size(128.0, 128.0);
        disc.set_vertices_color(Vec4::new(r, g, b, a));

        let position = Vec2::new(def.position[0], def.position[1]);
        let node = graph.add_root(disc, Transform2D::from_position(Vec3::new(position.x, position.y, 5.0)));

        label.set_color(Vec4::new(0.9, 0.9, 0.9, 1.0));
        let width = label.measure().x;
        let label = graph.add_child(node, label, Transform2D::from_position(Vec3::new(-width / 2.0, 70.0, 1.0)))?;

        Ok(Self {
            name: def.name,
            node,
            label,
            position,
        })
    }
}

/// One cloud; kept by the pool when released so its node is reused
#[derive(Debug, Default)]
pub struct Nebula {
    node: Option<NodeId>,
    drift: Vec2,
}

/// Clouds drifting around the player. Clouds that drift too far are
/// released to the pool and respawned near the player.
pub struct NebulaField {
    pool: Pool<Nebula>,
    live: Vec<PoolIndex>,
    radius: f32,
}

impl NebulaField {
    /// Field with room for `capacity` clouds
    pub fn new(capacity: usize, radius: f32) -> Self {
        Self {
            pool: Pool::with_capacity(capacity, Nebula::default),
            live: Vec::with_capacity(capacity),
            radius,
        }
    }

    /// Spawn `count` clouds around `center`
    pub fn populate(&mut self, graph: &mut SceneGraph, template: &Sprite, center: Vec2, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            self.spawn(graph, template, center, rng);
        }
    }

    fn spawn(&mut self, graph: &mut SceneGraph, template: &Sprite, center: Vec2, rng: &mut impl Rng) {
        let index = self.pool.acquire();
        let Some(nebula) = self.pool.get_mut(index) else {
            return;
        };

        let offset = utils::from_angle(rng.gen_range(0.0..360.0)) * rng.gen_range(0.0..self.radius);
        let position = center + offset;
        let transform = Transform2D {
            position: Vec3::new(position.x, position.y, 1.0),
            rotation: rng.gen_range(0.0..360.0),
            scale: Vec2::repeat(rng.gen_range(0.5..1.5)),
        };
        nebula.drift = utils::from_angle(rng.gen_range(0.0..360.0)) * rng.gen_range(2.0..12.0);

        match nebula.node.filter(|&node| graph.contains(node)) {
            Some(node) => {
                if let Some(node) = graph.get_mut(node) {
                    node.transform = transform;
                    node.visible = true;
                }
            }
            None => {
                let mut sprite = template.clone();
                sprite.set_vertices_alpha(0.3);
                nebula.node = Some(graph.add_root(sprite, transform));
            }
        }
        self.live.push(index);
    }

    /// Drift every cloud and recycle the ones outside the field.
    /// Returns how many were recycled.
    pub fn update(&mut self, graph: &mut SceneGraph, template: &Sprite, center: Vec2, delta_time: f32, rng: &mut impl Rng) -> usize {
        let mut recycled = Vec::new();
        for &index in &self.live {
            let Some(nebula) = self.pool.get(index) else {
                continue;
            };
            let Some(node) = nebula.node.and_then(|node| graph.get_mut(node)) else {
                continue;
            };
            node.transform.position.x += nebula.drift.x * delta_time;
            node.transform.position.y += nebula.drift.y * delta_time;
            let position = node.transform.position.xy();
            if (position - center).norm() > self.radius {
                node.visible = false;
                recycled.push(index);
            }
        }

        self.live.retain(|index| !recycled.contains(index));
        for &index in &recycled {
            self.pool.release(index);
        }
        for _ in 0..recycled.len() {
            self.spawn(graph, template, center, rng);
        }
        recycled.len()
    }

    /// Clouds in the field
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether the field is empty
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Pool slots allocated so far
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sprite_engine::render::MaterialId;

    #[test]
    fn test_shop_rolls_are_reproducible() {
        let a = generate_shop(&mut StdRng::seed_from_u64(7), 6);
        let b = generate_shop(&mut StdRng::seed_from_u64(7), 6);
        assert_eq!(a.len(), 6);
        assert_eq!(a, b);
        assert!(a.iter().all(|item| item.price >= 50 && item.price < 250));
    }

    #[test]
    fn test_planet_label_is_child_of_disc() {
        let mut graph = SceneGraph::new();
        let font = std::rc::Rc::new(sprite_engine::assets::Font::monospace(
            "mono",
            None,
            Vec2::new(8.0, 8.0),
            16,
            "ATaers",
        ));
        let planet = Planet::spawn(
            &mut graph,
            &PLANETS[0],
            Sprite::new(MaterialId(0), 1.0, 1.0),
            Text::new(font, MaterialId(1), "Terra"),
        )
        .unwrap();
        assert_eq!(graph.get(planet.label).unwrap().parent(), Some(planet.node));
        let world = graph.world_transform(planet.label).unwrap();
        approx::assert_relative_eq!(world[(0, 3)], 500.0 - 20.0);
        approx::assert_relative_eq!(world[(1, 3)], 570.0);
    }

    #[test]
    fn test_far_clouds_are_recycled_through_the_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut graph = SceneGraph::new();
        let template = Sprite::new(MaterialId(0), 64.0, 64.0);
        let mut field = NebulaField::new(8, 100.0);
        field.populate(&mut graph, &template, Vec2::zeros(), 8, &mut rng);
        assert_eq!(field.len(), 8);
        assert_eq!(graph.len(), 8);

        // the player jumped far away: every cloud is now outside the field
        let recycled = field.update(&mut graph, &template, Vec2::new(10_000.0, 0.0), 0.016, &mut rng);
        assert_eq!(recycled, 8);
        assert_eq!(field.len(), 8);
        assert_eq!(field.capacity(), 8);
        assert_eq!(graph.len(), 8);
    }
}
