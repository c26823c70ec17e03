//! OBJ meshes expanded to non-indexed triangle lists.

use std::f32::consts::PI;
use std::io::BufRead;
use std::path::Path;

use glam::Vec3;

use crate::error::AssetError;

/// Stacks and slices of the sphere used when a mesh cannot be loaded.
const FALLBACK_STACKS: u32 = 32;
const FALLBACK_SLICES: u32 = 64;

/// A triangle soup: every three consecutive vertices form one triangle.
///
/// All three attribute arrays have the same length, a multiple of three.
/// UVs use a top-left origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

impl MeshData {
    /// Number of vertices to draw.
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn push(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) {
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
    }
}

/// Reads and expands an OBJ file.
pub fn load_obj(path: &Path) -> Result<MeshData, AssetError> {
    let file = std::fs::File::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = std::io::BufReader::new(file);
    parse_obj(&mut reader, path)
}

/// Parses OBJ text and expands every model into one triangle soup.
///
/// Polygons are triangulated. Texture V is flipped to `1 - v` since OBJ puts
/// the origin at the bottom-left of the image. Faces without normals get a
/// flat face normal; faces without UVs get `(0, 0)`. Material libraries are
/// not read. `origin` only labels errors.
pub fn parse_obj<R: BufRead>(reader: &mut R, origin: &Path) -> Result<MeshData, AssetError> {
    let (models, _materials) = tobj::load_obj_buf(
        reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )
    .map_err(|source| AssetError::Obj {
        path: origin.to_path_buf(),
        source,
    })?;

    let malformed = |reason: String| AssetError::Malformed {
        path: origin.to_path_buf(),
        reason,
    };

    let mut data = MeshData::default();
    for model in &models {
        let mesh = &model.mesh;
        let vertex_total = mesh.positions.len() / 3;
        let has_normals = mesh.normals.len() / 3 == vertex_total && vertex_total > 0;
        let has_uvs = mesh.texcoords.len() / 2 == vertex_total && vertex_total > 0;

        for triangle in mesh.indices.chunks_exact(3) {
            let mut corners = [(Vec3::ZERO, None, [0.0_f32; 2]); 3];
            for (corner, &index) in corners.iter_mut().zip(triangle) {
                let i = index as usize;
                if i >= vertex_total {
                    return Err(malformed(format!(
                        "model '{}' references vertex {i} of {vertex_total}",
                        model.name
                    )));
                }
                let position = Vec3::new(
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                );
                let normal = has_normals.then(|| {
                    [
                        mesh.normals[3 * i],
                        mesh.normals[3 * i + 1],
                        mesh.normals[3 * i + 2],
                    ]
                });
                let uv = if has_uvs {
                    [mesh.texcoords[2 * i], 1.0 - mesh.texcoords[2 * i + 1]]
                } else {
                    [0.0, 0.0]
                };
                *corner = (position, normal, uv);
            }

            let [a, b, c] = corners.map(|(p, _, _)| p);
            let face_normal = (b - a).cross(c - a).normalize_or_zero().to_array();
            for (position, normal, uv) in corners {
                data.push(position.to_array(), normal.unwrap_or(face_normal), uv);
            }
        }
    }

    if data.is_empty() {
        return Err(AssetError::Empty {
            path: origin.to_path_buf(),
        });
    }
    Ok(data)
}

/// Unit UV sphere centred on the origin, as a triangle soup.
///
/// `v` runs from 0 at the north pole to 1 at the south pole, `u` from 0 to 1
/// around +Y.
pub fn uv_sphere(stacks: u32, slices: u32) -> MeshData {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let point = |stack: u32, slice: u32| {
        let v = stack as f32 / stacks as f32;
        let u = slice as f32 / slices as f32;
        let theta = v * PI;
        let phi = u * 2.0 * PI;
        let p = [theta.sin() * phi.cos(), theta.cos(), -theta.sin() * phi.sin()];
        (p, [u, v])
    };

    let mut data = MeshData::default();
    for stack in 0..stacks {
        for slice in 0..slices {
            let (p00, t00) = point(stack, slice);
            let (p01, t01) = point(stack, slice + 1);
            let (p10, t10) = point(stack + 1, slice);
            let (p11, t11) = point(stack + 1, slice + 1);
            // Counter-clockwise seen from outside.
            for (p, t) in [(p00, t00), (p10, t10), (p11, t11), (p00, t00), (p11, t11), (p01, t01)] {
                data.push(p, p, t);
            }
        }
    }
    data
}

/// Loads an OBJ, or logs a warning and returns the fallback sphere.
pub fn load_mesh_or_fallback(path: &Path) -> MeshData {
    match load_obj(path) {
        Ok(mesh) => {
            tracing::debug!(
                path = %path.display(),
                triangles = mesh.triangle_count(),
                "loaded mesh"
            );
            mesh
        }
        Err(err) => {
            tracing::warn!(error = %err, "using fallback sphere");
            uv_sphere(FALLBACK_STACKS, FALLBACK_SLICES)
        }
    }
}
