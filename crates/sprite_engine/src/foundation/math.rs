//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the 2D transform used by scene nodes.
//! Rotations are expressed in degrees, counter-clockwise around +Z.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (also used for RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Local transform of a scene node: position, rotation (degrees) and scale.
///
/// The z component of `position` is the draw depth; it is carried through
/// the matrix untouched by rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Position (z is depth)
    pub position: Vec3,

    /// Rotation around +Z in degrees
    pub rotation: f32,

    /// Scale factors on X and Y
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix: `T * Rz * S`
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * Mat4::from_axis_angle(&Vec3::z_axis(), utils::deg_to_rad(self.rotation))
            * Mat4::new_nonuniform_scaling(&Vec3::new(self.scale.x, self.scale.y, 1.0))
    }
}

/// Axis-aligned rectangle in screen or world space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the point lies inside (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec2};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Angle of a direction vector in degrees
    pub fn angle_of(direction: Vec2) -> f32 {
        rad_to_deg(direction.y.atan2(direction.x))
    }

    /// Unit vector pointing at `degrees`
    pub fn from_angle(degrees: f32) -> Vec2 {
        let radians = deg_to_rad(degrees);
        Vec2::new(radians.cos(), radians.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Transform2D::identity().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_rotation_is_degrees() {
        let transform = Transform2D {
            rotation: 90.0,
            ..Default::default()
        };
        let p = transform.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_scale_then_translate() {
        let transform = Transform2D {
            position: Vec3::new(10.0, 5.0, 2.0),
            rotation: 0.0,
            scale: Vec2::new(2.0, 3.0),
        };
        let p = transform.to_matrix().transform_point(&Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(p.x, 12.0);
        assert_relative_eq!(p.y, 8.0);
        assert_relative_eq!(p.z, 2.0);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(60.0, 40.0)));
        assert!(!rect.contains(Vec2::new(5.0, 40.0)));
        assert!(!rect.contains(Vec2::new(60.0, 61.0)));
    }

    #[test]
    fn test_angle_round_trip() {
        assert_relative_eq!(utils::angle_of(utils::from_angle(30.0)), 30.0, epsilon = 1e-4);
    }
}
