//! Engine data structures: templates, rules, instances and merged meshes.
//!
//! - `block` holds block templates and the read-only library of templates and rules
//! - `rule` holds substitution rules and their entries
//! - `instance` holds per-instance transformation data and the shared transform
//! - `mesh` flattens instances into interleaved vertex and edge buffers

pub mod block;
pub mod instance;
pub mod mesh;
pub mod rule;
