use std::{
    collections::HashMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context;

use crate::data_structures::mesh::FractalMesh;

/**
 * Write a merged mesh as wavefront text.
 *
 * Positions and normals are deduplicated; every triangle uses the normal of its first
 * vertex. Hidden or intersecting faces are written as they are.
 */
pub fn write_obj<W: Write>(mesh: &FractalMesh, writer: &mut W) -> anyhow::Result<()> {
    let mut positions = Indexed::default();
    let mut normals = Indexed::default();
    let faces: Vec<([usize; 3], usize)> = mesh
        .vertices
        .chunks_exact(3)
        .map(|tri| {
            let normal = normals.index_of(tri[0].normal);
            let corners = [0, 1, 2].map(|j| positions.index_of(tri[j].position));
            (corners, normal)
        })
        .collect();

    for [x, y, z] in &positions.values {
        writeln!(writer, "v {x} {y} {z}")?;
    }
    for [x, y, z] in &normals.values {
        writeln!(writer, "vn {x} {y} {z}")?;
    }
    writeln!(writer, "s off")?;
    for ([a, b, c], n) in faces {
        writeln!(writer, "f {}//{n} {}//{n} {}//{n}", a + 1, b + 1, c + 1, n = n + 1)?;
    }
    Ok(())
}

pub fn export_obj(mesh: &FractalMesh, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;
    log::info!(
        "Exported {} triangles to {}",
        mesh.triangle_count(),
        path.display()
    );
    Ok(())
}

/// First-seen ordering of distinct vectors.
#[derive(Default)]
struct Indexed {
    values: Vec<[f32; 3]>,
    lookup: HashMap<[u32; 3], usize>,
}

impl Indexed {
    fn index_of(&mut self, v: [f32; 3]) -> usize {
        let key = v.map(|c| if c == 0.0 { 0.0f32.to_bits() } else { c.to_bits() });
        let values = &mut self.values;
        *self.lookup.entry(key).or_insert_with(|| {
            values.push(v);
            values.len() - 1
        })
    }
}
