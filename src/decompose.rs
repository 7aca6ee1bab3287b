//! Recursive fractal decomposition.
//!
//! A block is replaced by the children its template's rule describes, and every
//! child is decomposed again until the requested level is reached. Only the leaves
//! of this tree are returned.
//!
//! Leaves that land on the same spot with the same template are merged: the first
//! one encountered wins and later duplicates are dropped, regardless of which branch
//! or rule entry produced them. Each call owns its result; sibling results are merged
//! explicitly, so decomposition has no shared state and is fully deterministic.

use std::collections::HashSet;

use anyhow::Context;

use crate::data_structures::{
    block::{BlockLibrary, TemplateId},
    instance::BlockInstance,
};

pub struct Decomposer<'a> {
    library: &'a BlockLibrary,
}

impl<'a> Decomposer<'a> {
    pub fn new(library: &'a BlockLibrary) -> Self {
        Self { library }
    }

    /// Expand `block` `level` times.
    ///
    /// Level 0 returns `[block]` untouched. Total work grows exponentially with
    /// `level`, so keep it small.
    pub fn decompose(&self, block: BlockInstance, level: u32) -> anyhow::Result<Vec<BlockInstance>> {
        self.library
            .template(block.id)
            .with_context(|| format!("cannot decompose block of template {}", block.id))?;
        let instances = self.expand(block, level)?;
        log::info!(
            "Decomposed template {} over {} levels into {} blocks",
            block.id,
            level,
            instances.len()
        );
        Ok(instances)
    }

    fn expand(&self, block: BlockInstance, level: u32) -> anyhow::Result<Vec<BlockInstance>> {
        if level == 0 {
            return Ok(vec![block]);
        }

        let rule = self
            .library
            .rule(block.id)
            .with_context(|| format!("decomposition failed at level {level}"))?;

        let mut placements = Placements::default();
        for entry in rule.entries() {
            let child = &block * entry;
            placements.extend(self.expand(child, level - 1)?);
        }
        log::debug!(
            "level {level}: template {} expanded into {} blocks",
            block.id,
            placements.len()
        );
        Ok(placements.into_vec())
    }
}

/// Shorthand for `Decomposer::new(library).decompose(block, level)`.
pub fn decompose(
    library: &BlockLibrary,
    block: BlockInstance,
    level: u32,
) -> anyhow::Result<Vec<BlockInstance>> {
    Decomposer::new(library).decompose(block, level)
}

/// Hash key equivalent to [`BlockInstance::is_same`] for finite positions.
///
/// `-0.0` and `0.0` compare equal as floats, so they share a key. A
/// [`BlockLibrary`] only holds finite rule entries, so every placed position is
/// finite too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PlacementKey {
    id: TemplateId,
    position: [u32; 3],
}

impl From<&BlockInstance> for PlacementKey {
    fn from(instance: &BlockInstance) -> Self {
        let bits = |v: f32| if v == 0.0 { 0.0f32.to_bits() } else { v.to_bits() };
        Self {
            id: instance.id,
            position: [
                bits(instance.position.x),
                bits(instance.position.y),
                bits(instance.position.z),
            ],
        }
    }
}

/// Insertion-ordered, first-seen-wins set of placed blocks.
#[derive(Default)]
struct Placements {
    instances: Vec<BlockInstance>,
    seen: HashSet<PlacementKey>,
}

impl Placements {
    fn insert(&mut self, instance: BlockInstance) -> bool {
        let inserted = self.seen.insert(PlacementKey::from(&instance));
        if inserted {
            self.instances.push(instance);
        }
        inserted
    }

    fn extend(&mut self, instances: Vec<BlockInstance>) {
        for instance in instances {
            self.insert(instance);
        }
    }

    fn len(&self) -> usize {
        self.instances.len()
    }

    fn into_vec(self) -> Vec<BlockInstance> {
        self.instances
    }
}
