//! Materials: shader program, texture and blend mode bound for one batch

use super::device::TextureId;
use std::collections::HashMap;

/// Index of a material in a [`MaterialLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// How fragments are combined with the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// No blending
    Opaque,
    /// Standard alpha blending
    #[default]
    Alpha,
    /// Additive blending (glows, particles)
    Additive,
}

/// Material properties for sprite rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Library index
    pub id: MaterialId,

    /// Human readable name
    pub name: String,

    /// Shader program name, resolved by the device
    pub program: String,

    /// Bound texture (`None` draws vertex colors only)
    pub texture: Option<TextureId>,

    /// Blend mode
    pub blend: BlendMode,
}

/// Owns every material and hands out ids
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    by_name: HashMap<String, MaterialId>,
}

impl MaterialLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material. Registering an existing name replaces its definition
    /// and keeps the id.
    pub fn register(
        &mut self,
        name: &str,
        program: &str,
        texture: Option<TextureId>,
        blend: BlendMode,
    ) -> MaterialId {
        if let Some(&id) = self.by_name.get(name) {
            if let Some(material) = self.materials.get_mut(id.0 as usize) {
                material.program = program.to_string();
                material.texture = texture;
                material.blend = blend;
            }
            return id;
        }

        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(Material {
            id,
            name: name.to_string(),
            program: program.to_string(),
            texture,
            blend,
        });
        self.by_name.insert(name.to_string(), id);
        log::debug!("Registered material '{name}' as {id:?}");
        id
    }

    /// Look up by id
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// Look up by name
    pub fn find(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_replace() {
        let mut library = MaterialLibrary::new();
        let blank = library.register("blank", "sprite", None, BlendMode::Alpha);
        let glow = library.register("glow", "sprite", Some(TextureId(3)), BlendMode::Additive);
        assert_ne!(blank, glow);
        assert_eq!(library.find("glow"), Some(glow));

        let again = library.register("blank", "sprite_tinted", None, BlendMode::Opaque);
        assert_eq!(again, blank);
        assert_eq!(library.len(), 2);
        let material = library.get(blank).unwrap();
        assert_eq!(material.program, "sprite_tinted");
        assert_eq!(material.blend, BlendMode::Opaque);
    }
}
