use std::io::{BufReader, Cursor};

use anyhow::{Context, anyhow, bail};
use cgmath::Vector3;

use crate::data_structures::block::{BlockTemplate, TemplateId};

/**
 * Parse block geometry from wavefront text.
 *
 * Faces and normals go through tobj (triangulated, one index per face vertex). Edge
 * lines (`l a b ...`) are withheld from tobj, which would triangulate polylines of
 * three or more points into faces. They refer to raw vertex numbers and are read in
 * a second pass over the `v` records.
 *
 * Files without any `vn` record get normals from the face winding.
 */
pub fn parse_template(id: TemplateId, file_name: &str, text: &str) -> anyhow::Result<BlockTemplate> {
    let mut obj_reader = BufReader::new(Cursor::new(without_edges(text)));
    let (models, _) = tobj::load_obj_buf(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ignore_points: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .with_context(|| format!("failed to parse block template {file_name}"))?;

    let with_normals = models.iter().all(|m| !m.mesh.normals.is_empty());
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        for &idx in &mesh.indices {
            let i = idx as usize;
            vertices.push(
                vec3(&mesh.positions, i)
                    .ok_or_else(|| anyhow!("{file_name}: vertex {i} is out of range"))?,
            );
            if with_normals {
                normals.push(
                    vec3(&mesh.normals, i)
                        .ok_or_else(|| anyhow!("{file_name}: normal {i} is out of range"))?,
                );
            }
        }
    }

    let edges = parse_edges(text).with_context(|| format!("invalid edge in {file_name}"))?;
    let template = if with_normals {
        BlockTemplate::new(id, vertices, normals, edges)?
    } else {
        log::warn!("{file_name} has no normals, deriving them from face winding");
        BlockTemplate::from_triangles(id, vertices, edges)?
    };
    log::debug!(
        "Loaded block template {id} from {file_name}: {} faces, {} edges",
        template.face_count(),
        template.edges.len() / 2
    );
    Ok(template)
}

/// The geometry records of `text`, with every `l` line left out.
fn without_edges(text: &str) -> String {
    text.lines()
        .filter(|line| line.split_whitespace().next() != Some("l"))
        .fold(String::with_capacity(text.len()), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
}

fn vec3(data: &[f32], i: usize) -> Option<Vector3<f32>> {
    let v = data.get(i * 3..i * 3 + 3)?;
    Some(Vector3::new(v[0], v[1], v[2]))
}

/// Edge line vertex pairs. A polyline `l a b c` yields the segments `ab` and `bc`.
fn parse_edges(text: &str) -> anyhow::Result<Vec<Vector3<f32>>> {
    let mut positions = Vec::new();
    let mut edges = Vec::new();
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => {
                let coords = fields
                    .take(3)
                    .map(|f| f.parse::<f32>())
                    .collect::<Result<Vec<_>, _>>()?;
                if coords.len() != 3 {
                    bail!("vertex `{line}` needs three coordinates");
                }
                positions.push(Vector3::new(coords[0], coords[1], coords[2]));
            }
            Some("l") => {
                let points = fields
                    .map(|f| vertex_ref(f, &positions))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                if points.len() < 2 {
                    bail!("edge `{line}` needs at least two vertices");
                }
                for pair in points.windows(2) {
                    edges.push(pair[0]);
                    edges.push(pair[1]);
                }
            }
            _ => {}
        }
    }
    Ok(edges)
}

/// Resolve a 1-based (or negative, relative) vertex reference such as `3` or `3/1`.
fn vertex_ref(field: &str, positions: &[Vector3<f32>]) -> anyhow::Result<Vector3<f32>> {
    let raw = field.split('/').next().unwrap_or(field);
    let number: i64 = raw
        .parse()
        .with_context(|| format!("`{field}` is not a vertex reference"))?;
    let idx = if number < 0 {
        positions.len() as i64 + number
    } else {
        number - 1
    };
    usize::try_from(idx)
        .ok()
        .and_then(|i| positions.get(i).copied())
        .ok_or_else(|| anyhow!("vertex {number} is not defined before its use"))
}
