use std::path::PathBuf;

use anyhow::bail;

use crate::{camera, data_structures::block::TemplateId, ground};

/// Tunables for generating and walking a fractal.
#[derive(Clone, Debug, PartialEq)]
pub struct FractalConfig {
    /// Directory holding `<n>.txt` templates and `<n>rule.txt` rules.
    pub assets: PathBuf,
    /// Recursion depth.
    pub level: u32,
    /// Template the decomposition starts from.
    pub seed: TemplateId,
    pub cull_radius: f32,
    pub clearance: f32,
    pub easing: f32,
    /// Base units per second.
    pub walk_speed: f32,
    pub run_speed: f32,
}

impl FractalConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.cull_radius > 0.0) {
            bail!("cull radius must be positive, got {}", self.cull_radius);
        }
        if !(self.easing >= 1.0) {
            bail!("easing divisor must be at least 1, got {}", self.easing);
        }
        if self.walk_speed < 0.0 || self.run_speed < 0.0 {
            bail!("movement speeds must not be negative");
        }
        Ok(())
    }
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("assets"),
            level: 2,
            seed: 0,
            cull_radius: ground::CULL_RADIUS,
            clearance: ground::CLEARANCE,
            easing: camera::EASING,
            walk_speed: 3.0,
            run_speed: 6.0,
        }
    }
}
