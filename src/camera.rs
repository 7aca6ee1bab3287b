//! Ground following for a first-person walker.
//!
//! The orientation side of the camera (yaw, pitch, view matrix) belongs to the
//! renderer. This module only owns the position: it applies a pending move, asks
//! the [`GroundResolver`] for the terrain below, rejects moves that would walk off
//! the generated geometry and eases the height toward the ground instead of
//! snapping.

use cgmath::Vector3;

use crate::ground::GroundResolver;

/// Default fraction divisor of the remaining height difference closed per step.
pub const EASING: f32 = 10.0;

/// What happened to the last requested move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// The walker is above ground at the given surface elevation.
    Grounded(f32),
    /// No ground below the new position; the move was undone.
    Blocked,
    /// Flying, no ground check was made.
    Flying,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundFollower {
    pub position: Vector3<f32>,
    /// Height the walker is easing toward.
    pub dest_y: f32,
    pub flying: bool,
    easing: f32,
}

impl GroundFollower {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            dest_y: position.y,
            flying: false,
            easing: EASING,
        }
    }

    pub fn with_easing(mut self, easing: f32) -> Self {
        self.easing = easing;
        self
    }

    pub fn toggle_flying(&mut self) {
        self.flying = !self.flying;
    }

    /// Apply `displacement` and settle one step toward the ground.
    ///
    /// While walking only the horizontal part of `displacement` is used. If there is
    /// no ground below the new position the walker stays where it was.
    pub fn step(
        &mut self,
        resolver: &GroundResolver,
        displacement: Vector3<f32>,
        base_unit: f32,
    ) -> MoveOutcome {
        if self.flying {
            self.position += displacement;
            return MoveOutcome::Flying;
        }

        let previous = self.position;
        self.position.x += displacement.x;
        self.position.z += displacement.z;

        let outcome = match resolver.ground_below(self.position) {
            Some(surface) => {
                self.dest_y = surface + resolver.clearance() * base_unit;
                MoveOutcome::Grounded(surface)
            }
            None => {
                self.position = previous;
                MoveOutcome::Blocked
            }
        };

        self.position.y += (self.dest_y - self.position.y) / self.easing;
        outcome
    }
}

/// Distance covered in `dt` seconds at `speed` base units per second.
pub fn travel(speed: f32, base_unit: f32, dt: f32) -> f32 {
    speed * base_unit * dt
}
