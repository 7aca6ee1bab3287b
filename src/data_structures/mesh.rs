//! Flattening of a decomposition into render-ready buffers.
//!
//! Every instance's template geometry is transformed into world space and appended
//! to one interleaved vertex buffer, so the whole fractal can be drawn with a
//! single call. Edge lines go into a separate buffer for the wireframe overlay.

use anyhow::Context;
use cgmath::Vector3;

use crate::data_structures::{block::BlockLibrary, instance::BlockInstance};

/**
 * The raw vertex as it is laid out in GPU memory: position followed by normal.
 */
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FractalVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FractalMesh {
    pub vertices: Vec<FractalVertex>,
    pub edges: Vec<[f32; 3]>,
}

impl FractalMesh {
    /// Merge all instances, in order, into one mesh.
    ///
    /// Normals are rounded per component, which keeps lighting flat on the
    /// axis-aligned faces these blocks are built from.
    pub fn from_instances(
        library: &BlockLibrary,
        instances: &[BlockInstance],
    ) -> anyhow::Result<Self> {
        let mut mesh = FractalMesh::default();
        for instance in instances {
            let template = library
                .template(instance.id)
                .context("cannot merge instance into mesh")?;
            mesh.vertices.extend(
                template
                    .vertices
                    .iter()
                    .zip(template.normals.iter())
                    .map(|(point, normal)| FractalVertex {
                        position: instance.transform_point(*point).into(),
                        normal: round(instance.transform_normal(*normal)).into(),
                    }),
            );
            mesh.edges.extend(
                template
                    .edges
                    .iter()
                    .map(|point| -> [f32; 3] { instance.transform_point(*point).into() }),
            );
        }
        log::info!(
            "Merged {} instances into {} triangles and {} edge lines",
            instances.len(),
            mesh.triangle_count(),
            mesh.edges.len() / 2
        );
        Ok(mesh)
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Sequential draw order for the triangle buffer.
    pub fn indices(&self) -> Vec<u32> {
        (0..self.vertices.len() as u32).collect()
    }

    /// Sequential draw order for the edge buffer.
    pub fn edge_indices(&self) -> Vec<u32> {
        (0..self.edges.len() as u32).collect()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn edge_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.edges)
    }
}

fn round(v: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.x.round(), v.y.round(), v.z.round())
}
