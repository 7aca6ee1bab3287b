//! Ground height resolution.
//!
//! Finds the walkable surface directly below a camera by testing the camera's
//! horizontal position against every upward facing triangle of the nearby blocks,
//! viewed from above. Runs once per frame, so blocks further away than a small
//! multiple of their own size are culled before any face is transformed.

use cgmath::{Vector2, Vector3};

use crate::data_structures::{block::BlockLibrary, instance::BlockInstance};

/// Blocks whose centre is further away than this many base units are skipped.
pub const CULL_RADIUS: f32 = 1.5;
/// Eye height above the ground, in base units of the seed block.
pub const CLEARANCE: f32 = 2.5;

pub struct GroundResolver<'a> {
    library: &'a BlockLibrary,
    instances: &'a [BlockInstance],
    cull_radius: f32,
    clearance: f32,
}

impl<'a> GroundResolver<'a> {
    pub fn new(library: &'a BlockLibrary, instances: &'a [BlockInstance]) -> Self {
        Self {
            library,
            instances,
            cull_radius: CULL_RADIUS,
            clearance: CLEARANCE,
        }
    }

    pub fn with_cull_radius(mut self, cull_radius: f32) -> Self {
        self.cull_radius = cull_radius;
        self
    }

    pub fn with_clearance(mut self, clearance: f32) -> Self {
        self.clearance = clearance;
        self
    }

    pub fn clearance(&self) -> f32 {
        self.clearance
    }

    /// Elevations of every upward face containing `(x, z)` when seen from above,
    /// in instance and face order.
    pub fn surfaces_at(&self, x: f32, z: f32) -> Vec<f32> {
        let point = Vector2::new(x, z);
        let mut surfaces = Vec::new();
        for instance in self.instances {
            let reach = self.cull_radius * instance.scale.x.abs();
            let dx = instance.position.x - x;
            let dz = instance.position.z - z;
            if (dx * dx + dz * dz).sqrt() > reach {
                continue;
            }
            let Some(template) = self.library.get(instance.id) else {
                log::warn!(
                    "Skipping instance at {:?}: block template {} is not loaded",
                    instance.position,
                    instance.id
                );
                continue;
            };
            for face in template.faces() {
                if instance.transform_normal(face.normal).y <= 0.0 {
                    continue;
                }
                let [a, b, c] = face.vertices.map(|v| instance.transform_point(v));
                if triangle_contains(horizontal(a), horizontal(b), horizontal(c), point) {
                    surfaces.push(c.y);
                }
            }
        }
        surfaces
    }

    /// The highest surface below `camera`, or `None` if there is no ground there.
    pub fn ground_below(&self, camera: Vector3<f32>) -> Option<f32> {
        select_surface(&self.surfaces_at(camera.x, camera.z), camera.y)
    }

    /// Where the camera should settle: the ground below it plus the clearance,
    /// scaled by `base_unit`.
    pub fn target_height(&self, camera: Vector3<f32>, base_unit: f32) -> Option<f32> {
        self.ground_below(camera)
            .map(|surface| surface + self.clearance * base_unit)
    }
}

/**
 * Pick the highest surface strictly below `camera_y`.
 *
 * A camera at exactly `y == 0` has not been placed on the terrain yet. In that case
 * every surface is accepted in turn and the last one wins, which drops the camera onto
 * whatever it starts above.
 */
pub fn select_surface(surfaces: &[f32], camera_y: f32) -> Option<f32> {
    let unplaced = camera_y == 0.0;
    surfaces.iter().fold(None, |highest, &surface| {
        let above = camera_y > surface && highest.is_none_or(|h| surface > h);
        if unplaced || above {
            Some(surface)
        } else {
            highest
        }
    })
}

/// Boundary inclusive point in triangle test on the horizontal plane.
///
/// Works for either winding. A point on an edge, and any point tested against a
/// degenerate triangle's supporting line, counts as inside.
pub fn triangle_contains(
    a: Vector2<f32>,
    b: Vector2<f32>,
    c: Vector2<f32>,
    point: Vector2<f32>,
) -> bool {
    let sides = [edge_side(a, b, point), edge_side(b, c, point), edge_side(c, a, point)];
    let has_positive = sides.iter().any(|&s| s > 0.0);
    let has_negative = sides.iter().any(|&s| s < 0.0);
    !(has_positive && has_negative)
}

fn edge_side(from: Vector2<f32>, to: Vector2<f32>, point: Vector2<f32>) -> f32 {
    (to.x - from.x) * (point.y - from.y) - (to.y - from.y) * (point.x - from.x)
}

/// Project onto the `(x, z)` plane.
fn horizontal(v: Vector3<f32>) -> Vector2<f32> {
    Vector2::new(v.x, v.z)
}
