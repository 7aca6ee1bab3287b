//! Placed block instances.
//!
//! An instance is a template placed in world space: a position, an orientation
//! about the vertical axis and a non-uniform (sign carrying) scale. The same
//! transform is used to build render buffers and to resolve ground height, so it
//! lives here and nowhere else.

use std::f32::consts::FRAC_PI_2;
use std::ops::Mul;

use cgmath::{ElementWise, Matrix3, Matrix4, Rad, Vector3};

use crate::data_structures::{block::TemplateId, rule::SubstitutionEntry};

/// Per-instance transformation: template id, position, yaw and scale.
///
/// Negative scale components encode mirroring and propagate multiplicatively
/// through decomposition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockInstance {
    pub id: TemplateId,
    pub position: Vector3<f32>,
    pub orientation: Rad<f32>,
    pub scale: Vector3<f32>,
}

impl BlockInstance {
    /// Create an instance of `id` with identity transformation.
    pub fn new(id: TemplateId) -> Self {
        Self {
            id,
            position: Vector3::new(0.0, 0.0, 0.0),
            orientation: Rad(0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// The size of one local unit, taken from the first scale axis.
    pub fn base_unit(&self) -> f32 {
        self.scale.x
    }

    /// `-1` when the instance is flipped upside down, `1` otherwise (`0` for a flat scale).
    pub fn mirror_sign(&self) -> f32 {
        sign(self.scale.y)
    }

    pub fn scale_sign(&self) -> Vector3<f32> {
        Vector3::new(sign(self.scale.x), sign(self.scale.y), sign(self.scale.z))
    }

    /// Rotation about the vertical axis.
    ///
    /// Maps `(x, z)` to `(x·cosθ + z·sinθ, -x·sinθ + z·cosθ)`.
    pub fn rotation(&self) -> Matrix3<f32> {
        Matrix3::from_angle_y(self.orientation)
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_y(self.orientation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Local template vertex to world space: scale, then rotate, then translate.
    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        self.rotation() * point.mul_element_wise(self.scale) + self.position
    }

    /// Local template normal to world orientation. Only the scale's sign is applied
    /// and the result is not translated.
    pub fn transform_normal(&self, normal: Vector3<f32>) -> Vector3<f32> {
        self.rotation() * normal.mul_element_wise(self.scale_sign())
    }

    /// Two instances are the same block when template and position match.
    ///
    /// Orientation and scale are not compared.
    pub fn is_same(&self, other: &BlockInstance) -> bool {
        self.id == other.id && self.position == other.position
    }
}

/**
 * Parent × entry yields the child block the entry describes.
 *
 * The offset is scaled by `unit_scale × parent.base_unit()`, its horizontal part is
 * rotated by the parent's orientation and its vertical part follows the parent's
 * mirror sign. Orientation advances in quarter turns and scale multiplies component-wise,
 * so sign patterns are inherited from the parent.
 */
impl<'a, 'b> Mul<&'b SubstitutionEntry> for &'a BlockInstance {
    type Output = BlockInstance;

    fn mul(self, entry: &'b SubstitutionEntry) -> Self::Output {
        let unit = self.base_unit() * entry.unit_scale;
        let offset = entry.position_offset;
        let horizontal = self.rotation() * Vector3::new(offset.x, 0.0, offset.z);
        let world_offset =
            Vector3::new(horizontal.x, offset.y * self.mirror_sign(), horizontal.z) * unit;

        BlockInstance {
            id: entry.id,
            position: self.position + world_offset,
            orientation: self.orientation + Rad(FRAC_PI_2 * entry.quarter_turns),
            scale: (self.scale * entry.scale_down).mul_element_wise(entry.extra_scale),
        }
    }
}

impl Mul<SubstitutionEntry> for BlockInstance {
    type Output = Self;

    fn mul(self, entry: SubstitutionEntry) -> Self::Output {
        &self * &entry
    }
}

impl Default for BlockInstance {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Sign with zero mapped to zero, unlike `f32::signum`.
pub(crate) fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
