use anyhow::{Context, anyhow, bail};
use cgmath::{InnerSpace, Vector3};

use crate::data_structures::{instance::BlockInstance, rule::SubstitutionRule};

/// Dense index into a [`BlockLibrary`].
pub type TemplateId = usize;

/**
 * A `BlockTemplate` is the reusable geometry of one kind of block.
 *
 * `vertices` is a plain triangle list (three entries per face) with a parallel
 * per-vertex `normals` list. `edges` holds line segments as vertex pairs and is only
 * used for the wireframe overlay.
 */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockTemplate {
    pub id: TemplateId,
    pub vertices: Vec<Vector3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub edges: Vec<Vector3<f32>>,
}

/// One triangle of a template together with the normal of its first vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub vertices: [Vector3<f32>; 3],
    pub normal: Vector3<f32>,
}

impl BlockTemplate {
    pub fn new(
        id: TemplateId,
        vertices: Vec<Vector3<f32>>,
        normals: Vec<Vector3<f32>>,
        edges: Vec<Vector3<f32>>,
    ) -> anyhow::Result<Self> {
        if vertices.len() % 3 != 0 {
            bail!(
                "template {id} has {} face vertices, which is not a multiple of three",
                vertices.len()
            );
        }
        if normals.len() != vertices.len() {
            bail!(
                "template {id} has {} normals for {} face vertices",
                normals.len(),
                vertices.len()
            );
        }
        if edges.len() % 2 != 0 {
            bail!("template {id} has an unpaired edge vertex");
        }
        Ok(Self {
            id,
            vertices,
            normals,
            edges,
        })
    }

    /// Build a template from a triangle list alone. Normals are taken from the
    /// winding of each face (counter-clockwise is front facing).
    pub fn from_triangles(
        id: TemplateId,
        vertices: Vec<Vector3<f32>>,
        edges: Vec<Vector3<f32>>,
    ) -> anyhow::Result<Self> {
        let normals = vertices
            .chunks(3)
            .flat_map(|face| {
                let normal = match face {
                    [a, b, c] => face_normal(*a, *b, *c),
                    _ => Vector3::new(0.0, 0.0, 0.0),
                };
                std::iter::repeat_n(normal, face.len())
            })
            .collect();
        Self::new(id, vertices, normals, edges)
    }

    pub fn faces(&self) -> impl Iterator<Item = Face> + '_ {
        self.vertices
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .map(|(v, n)| Face {
                vertices: [v[0], v[1], v[2]],
                normal: n[0],
            })
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

fn face_normal(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Vector3<f32> {
    let normal = (b - a).cross(c - a);
    if normal.magnitude2() > 0.0 {
        normal.normalize()
    } else {
        normal
    }
}

/**
 * The read-only template and rule tables.
 *
 * Both tables are indexed by the same dense [`TemplateId`]. Construction validates
 * every cross reference, so a library that exists never points outside itself.
 */
#[derive(Clone, Debug, Default)]
pub struct BlockLibrary {
    templates: Vec<BlockTemplate>,
    rules: Vec<SubstitutionRule>,
}

impl BlockLibrary {
    pub fn new(templates: Vec<BlockTemplate>, rules: Vec<SubstitutionRule>) -> anyhow::Result<Self> {
        if templates.len() != rules.len() {
            bail!(
                "{} block templates but {} substitution rules",
                templates.len(),
                rules.len()
            );
        }
        for (idx, template) in templates.iter().enumerate() {
            if template.id != idx {
                bail!("block template {} is stored at index {}", template.id, idx);
            }
        }
        for (idx, rule) in rules.iter().enumerate() {
            for (n, entry) in rule.entries().iter().enumerate() {
                if entry.id >= templates.len() {
                    bail!(
                        "rule of template {idx} (entry {}) refers to unknown block template {}",
                        n + 1,
                        entry.id
                    );
                }
                if !entry.is_finite() {
                    bail!(
                        "rule of template {idx} (entry {}) has a non-finite offset, turn or scale",
                        n + 1
                    );
                }
            }
        }
        Ok(Self { templates, rules })
    }

    pub fn template(&self, id: TemplateId) -> anyhow::Result<&BlockTemplate> {
        self.templates
            .get(id)
            .ok_or_else(|| anyhow!("unknown block template {id} ({} loaded)", self.templates.len()))
    }

    pub fn rule(&self, id: TemplateId) -> anyhow::Result<&SubstitutionRule> {
        self.rules
            .get(id)
            .ok_or_else(|| anyhow!("no substitution rule for block template {id}"))
    }

    /// Template lookup that never fails, for per-frame callers.
    pub fn get(&self, id: TemplateId) -> Option<&BlockTemplate> {
        self.templates.get(id)
    }

    /// Identity instance of template `id`, the usual starting point of a decomposition.
    pub fn seed(&self, id: TemplateId) -> anyhow::Result<BlockInstance> {
        self.template(id)
            .with_context(|| format!("cannot seed from block template {id}"))?;
        Ok(BlockInstance::new(id))
    }

    pub fn templates(&self) -> &[BlockTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
