#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use fractal_scape::{
    Vector3,
    data_structures::{
        block::{BlockLibrary, BlockTemplate, TemplateId},
        rule::SubstitutionRule,
    },
    resources,
};

pub fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

pub fn shipped_library() -> BlockLibrary {
    resources::load_library(assets_dir()).expect("shipped assets should load")
}

pub fn cube_template(id: TemplateId) -> BlockTemplate {
    let text = std::fs::read_to_string(assets_dir().join("0.txt")).expect("cube asset");
    resources::parse_template(id, "0.txt", &text).expect("cube asset should parse")
}

/// A unit square at height `y`, spanning `[-0.5, 0.5]` on x and z, wound so its
/// normal points up (or down when `facing_up` is false).
pub fn square_template(id: TemplateId, y: f32, facing_up: bool) -> BlockTemplate {
    let a = Vector3::new(-0.5, y, 0.5);
    let b = Vector3::new(0.5, y, 0.5);
    let c = Vector3::new(0.5, y, -0.5);
    let d = Vector3::new(-0.5, y, -0.5);
    let vertices = if facing_up {
        vec![a, b, c, a, c, d]
    } else {
        vec![a, c, b, a, d, c]
    };
    BlockTemplate::from_triangles(id, vertices, vec![a, b, b, c, c, d, d, a])
        .expect("square template")
}

pub fn library(templates: Vec<BlockTemplate>, rules: Vec<SubstitutionRule>) -> BlockLibrary {
    BlockLibrary::new(templates, rules).expect("test library should be valid")
}

/// Library of one template whose rule is `rule`.
pub fn single(template: BlockTemplate, rule: SubstitutionRule) -> BlockLibrary {
    library(vec![template], vec![rule])
}

/// An empty directory that is removed when the guard is dropped.
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().expect("scratch dir")
}
