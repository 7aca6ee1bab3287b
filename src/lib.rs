//! fractal-scape
//!
//! Procedural fractal landscapes built by recursive block substitution. A seed
//! block is replaced by smaller, rotated and mirrored copies according to its
//! template's rule, level after level, and the resulting blocks can be merged
//! into one render-ready mesh and walked on with a ground-following camera.
//!
//! High-level modules
//! - `camera`: ground-following walker that rejects moves over gaps
//! - `config`: tunables for generation and walking
//! - `data_structures`: templates, rules, placed instances and the merged mesh
//! - `decompose`: the recursive decomposition with first-seen-wins deduplication
//! - `ground`: per-frame ground height resolution from arbitrary block geometry
//! - `resources`: template/rule loading and wavefront export
//!

pub mod camera;
pub mod config;
pub mod data_structures;
pub mod decompose;
pub mod ground;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Rad, Vector2, Vector3};
