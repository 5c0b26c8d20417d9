//! Wavefront OBJ loading into a flat triangle list.
//!
//! Only the subset the renderer needs: `v`, `vt`, `vn`, and `f` records.
//! Faces with more than three vertices are fan-triangulated. Every index
//! is validated against the arrays it references; a bad index is a
//! [`GlintError::MalformedMesh`], never a panic.

use std::path::Path;

use crate::error::GlintError;
use crate::scene::MeshVertex;

/// A flat, GPU-ready triangle list (3 vertices per triangle).
#[derive(Debug, Default, Clone)]
pub struct TriangleMesh {
    vertices: Vec<MeshVertex>,
}

impl TriangleMesh {
    /// The flattened vertex list.
    #[must_use]
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Number of vertices (always a multiple of 3).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Returns `true` for a mesh with no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Load and parse an OBJ file.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Io`] if the file cannot be read or
    /// [`GlintError::MalformedMesh`] on parse failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GlintError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Parse OBJ text.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::MalformedMesh`] for unparsable records or
    /// out-of-bounds indices.
    pub fn parse(source: &str) -> Result<Self, GlintError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut texcoords: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut vertices: Vec<MeshVertex> = Vec::new();

        for (line_no, line) in source.lines().enumerate() {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("v") => positions.push(parse_triple(fields, line_no)?),
                Some("vt") => texcoords.push(parse_triple(fields, line_no)?),
                Some("vn") => normals.push(parse_triple(fields, line_no)?),
                Some("f") => {
                    let corners: Vec<MeshVertex> = fields
                        .map(|spec| {
                            parse_corner(spec, line_no, &positions, &texcoords, &normals)
                        })
                        .collect::<Result<_, _>>()?;
                    if corners.len() < 3 {
                        return Err(GlintError::MalformedMesh(format!(
                            "face with {} vertices on line {}",
                            corners.len(),
                            line_no + 1
                        )));
                    }
                    // Fan triangulation for quads and larger faces.
                    for i in 1..corners.len() - 1 {
                        vertices.push(corners[0]);
                        vertices.push(corners[i]);
                        vertices.push(corners[i + 1]);
                    }
                }
                _ => {}
            }
        }

        Ok(Self { vertices })
    }
}

fn parse_triple<'a>(
    mut fields: impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<[f32; 3], GlintError> {
    let mut out = [0.0f32; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        match fields.next() {
            Some(field) => {
                *slot = field.parse().map_err(|_| {
                    GlintError::MalformedMesh(format!(
                        "bad float '{}' on line {}",
                        field,
                        line_no + 1
                    ))
                })?;
            }
            // z is optional (2D texture coordinates).
            None if i == 2 => {}
            None => {
                return Err(GlintError::MalformedMesh(format!(
                    "too few components on line {}",
                    line_no + 1
                )));
            }
        }
    }
    Ok(out)
}

fn lookup(
    index_field: &str,
    table: &[[f32; 3]],
    line_no: usize,
) -> Result<[f32; 3], GlintError> {
    let raw: i64 = index_field.parse().map_err(|_| {
        GlintError::MalformedMesh(format!(
            "bad index '{}' on line {}",
            index_field,
            line_no + 1
        ))
    })?;
    // OBJ indices are 1-based; negative indices count from the end.
    let resolved = if raw < 0 {
        table.len() as i64 + raw
    } else {
        raw - 1
    };
    usize::try_from(resolved)
        .ok()
        .and_then(|i| table.get(i).copied())
        .ok_or_else(|| {
            GlintError::MalformedMesh(format!(
                "index {} out of bounds on line {} (table has {} entries)",
                raw,
                line_no + 1,
                table.len()
            ))
        })
}

fn parse_corner(
    spec: &str,
    line_no: usize,
    positions: &[[f32; 3]],
    texcoords: &[[f32; 3]],
    normals: &[[f32; 3]],
) -> Result<MeshVertex, GlintError> {
    let mut parts = spec.split('/');
    let pos_field = parts.next().unwrap_or("");
    let tex_field = parts.next().unwrap_or("");
    let norm_field = parts.next().unwrap_or("");

    let position = lookup(pos_field, positions, line_no)?;
    let uv = if tex_field.is_empty() {
        [0.0; 3]
    } else {
        lookup(tex_field, texcoords, line_no)?
    };
    let normal = if norm_field.is_empty() {
        [0.0; 3]
    } else {
        lookup(norm_field, normals, line_no)?
    };

    Ok(MeshVertex {
        position: [position[0], position[1], position[2], 0.0],
        uv: [uv[0], uv[1], 0.0, 0.0],
        normal: [normal[0], normal[1], normal[2], 0.0],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn parses_single_triangle() {
        let mesh = TriangleMesh::parse(TRIANGLE).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertices()[1].position, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices()[2].uv, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices()[0].normal, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn fan_triangulates_quads() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = TriangleMesh::parse(obj).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn position_only_faces_fill_zeros() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";
        let mesh = TriangleMesh::parse(obj).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices()[0].uv, [0.0; 4]);
        assert_eq!(mesh.vertices()[0].normal, [0.0; 4]);
    }

    #[test]
    fn negative_indices_resolve_from_end() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let mesh = TriangleMesh::parse(obj).unwrap();
        assert_eq!(mesh.vertices()[2].position, [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn out_of_bounds_index_is_malformed() {
        let obj = "\
v 0 0 0
v 1 0 0
f 1 2 9
";
        let err = TriangleMesh::parse(obj).unwrap_err();
        assert!(matches!(err, GlintError::MalformedMesh(_)));
    }

    #[test]
    fn zero_index_is_malformed() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 0 1 2
";
        assert!(TriangleMesh::parse(obj).is_err());
    }

    #[test]
    fn bad_float_is_malformed() {
        let err = TriangleMesh::parse("v 0.0 oops 0.0\n").unwrap_err();
        assert!(matches!(err, GlintError::MalformedMesh(_)));
    }

    #[test]
    fn degenerate_face_is_malformed() {
        let obj = "\
v 0 0 0
v 1 0 0
f 1 2
";
        assert!(TriangleMesh::parse(obj).is_err());
    }

    #[test]
    fn ignores_comments_and_unknown_records() {
        let obj = format!("# comment\no name\ns off\n{TRIANGLE}");
        let mesh = TriangleMesh::parse(&obj).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }
}
