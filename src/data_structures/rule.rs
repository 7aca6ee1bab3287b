//! Substitution rules: how one block is replaced by smaller, transformed copies.
//!
//! Every template owns exactly one [`SubstitutionRule`]. A rule is an ordered list
//! of [`SubstitutionEntry`] values, each describing a single child relative to the
//! parent's local unit frame.

use cgmath::Vector3;

use crate::data_structures::block::TemplateId;

/// One child produced from a parent during a single decomposition step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubstitutionEntry {
    /// Template the child is an instance of.
    pub id: TemplateId,
    /// Offset in the parent's local unit frame (before unit scaling and rotation).
    pub position_offset: Vector3<f32>,
    /// Rotation about the vertical axis in quarter turns.
    pub quarter_turns: f32,
    /// Uniform factor applied to the parent's scale.
    pub scale_down: f32,
    /// Per-axis multiplier applied after `scale_down`. Negative components mirror.
    pub extra_scale: Vector3<f32>,
    /// Factor applied to the parent's base unit when scaling `position_offset`.
    pub unit_scale: f32,
}

impl SubstitutionEntry {
    /// Entry with no scaling and no mirroring.
    pub fn new(id: TemplateId, position_offset: Vector3<f32>, quarter_turns: f32) -> Self {
        Self {
            id,
            position_offset,
            quarter_turns,
            scale_down: 1.0,
            extra_scale: Vector3::new(1.0, 1.0, 1.0),
            unit_scale: 1.0,
        }
    }

    pub fn with_scaling(mut self, scale_down: f32, unit_scale: f32) -> Self {
        self.scale_down = scale_down;
        self.unit_scale = unit_scale;
        self
    }

    pub fn with_extra_scale(mut self, extra_scale: Vector3<f32>) -> Self {
        self.extra_scale = extra_scale;
        self
    }

    /// `true` when every number in the entry is finite.
    pub fn is_finite(&self) -> bool {
        let vectors = [self.position_offset, self.extra_scale];
        let scalars = [self.quarter_turns, self.scale_down, self.unit_scale];
        vectors.iter().all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite())
            && scalars.iter().all(|s| s.is_finite())
    }
}

/**
 * An ordered list of entries for one template.
 *
 * The scale-down and unit constants behave like a directive in the rule file: once set
 * via [`SubstitutionRule::set_scaling`] they apply to every entry pushed afterwards,
 * until they are set again. Entries that were already pushed keep their constants.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct SubstitutionRule {
    entries: Vec<SubstitutionEntry>,
    scale_down: f32,
    unit_scale: f32,
}

impl SubstitutionRule {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            scale_down: 1.0,
            unit_scale: 1.0,
        }
    }

    /// Change the constants used by subsequently pushed entries.
    pub fn set_scaling(&mut self, scale_down: f32, unit_scale: f32) -> &mut Self {
        self.scale_down = scale_down;
        self.unit_scale = unit_scale;
        self
    }

    /// Append an entry using the constants currently in effect.
    pub fn push(
        &mut self,
        id: TemplateId,
        position_offset: Vector3<f32>,
        quarter_turns: f32,
        extra_scale: Option<Vector3<f32>>,
    ) -> &mut Self {
        let mut entry = SubstitutionEntry::new(id, position_offset, quarter_turns)
            .with_scaling(self.scale_down, self.unit_scale);
        if let Some(extra_scale) = extra_scale {
            entry = entry.with_extra_scale(extra_scale);
        }
        self.entries.push(entry);
        self
    }

    /// Append a fully specified entry, ignoring the current constants.
    pub fn push_entry(&mut self, entry: SubstitutionEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[SubstitutionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SubstitutionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<SubstitutionEntry> for SubstitutionRule {
    fn from_iter<T: IntoIterator<Item = SubstitutionEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            ..Self::new()
        }
    }
}
