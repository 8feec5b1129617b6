//! OBJ file loader for 3D models
//!
//! Reads `v`, `vn`, `vt` and `f` records. Faces with more than three corners
//! are fan-triangulated; every face corner becomes its own vertex. Other
//! records (`o`, `g`, `s`, `usemtl`, ...) are ignored.

use crate::render::{Mesh, Vertex};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// OBJ loading errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// Underlying read failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A record contained a value that is not a number
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The file parsed but does not describe a usable mesh
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Wavefront OBJ reader
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse OBJ text from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<Mesh, ObjError> {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut tex_coords = Vec::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (line_index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = line_index + 1;
            let mut parts = line.split_whitespace();

            let Some(keyword) = parts.next() else {
                continue;
            };
            if keyword.starts_with('#') {
                continue;
            }

            match keyword {
                "v" => positions.push(parse_floats::<3>(parts, "vertex", line_no)?),
                "vn" => normals.push(parse_floats::<3>(parts, "normal", line_no)?),
                "vt" => tex_coords.push(parse_floats::<2>(parts, "tex coord", line_no)?),
                "f" => {
                    let mut face_indices = Vec::new();

                    for corner in parts {
                        let mut fields = corner.split('/');
                        let pos_idx = fields
                            .next()
                            .and_then(|s| resolve_index(s, positions.len()))
                            .ok_or_else(|| {
                                ObjError::InvalidFormat(format!(
                                    "line {line_no}: bad position index '{corner}'"
                                ))
                            })?;
                        let tex_idx = fields.next().and_then(|s| resolve_index(s, tex_coords.len()));
                        let normal_idx = fields.next().and_then(|s| resolve_index(s, normals.len()));

                        let tex_coord = tex_idx.map_or([0.0, 0.0], |i| tex_coords[i]);
                        let normal = normal_idx.map_or([0.0, 1.0, 0.0], |i| normals[i]);

                        face_indices.push(u32::try_from(vertices.len()).map_err(|_| {
                            ObjError::InvalidFormat("too many vertices".to_string())
                        })?);
                        vertices.push(Vertex::new(positions[pos_idx], normal, tex_coord));
                    }

                    if face_indices.len() < 3 {
                        return Err(ObjError::InvalidFormat(format!(
                            "line {line_no}: face needs at least 3 corners, got {}",
                            face_indices.len()
                        )));
                    }

                    // Fan triangulation
                    for pair in face_indices[1..].windows(2) {
                        indices.extend_from_slice(&[face_indices[0], pair[0], pair[1]]);
                    }
                }
                _ => {}
            }
        }

        if indices.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        log::debug!(
            "Parsed OBJ: {} positions, {} vertices, {} triangles",
            positions.len(),
            vertices.len(),
            indices.len() / 3
        );

        Ok(Mesh::new(vertices, indices))
    }
}

fn parse_floats<'a, const N: usize>(
    mut parts: impl Iterator<Item = &'a str>,
    what: &str,
    line_no: usize,
) -> Result<[f32; N], ObjError> {
    let mut out = [0.0; N];
    for value in &mut out {
        let field = parts.next().ok_or_else(|| {
            ObjError::ParseError(format!("line {line_no}: {what} needs {N} components"))
        })?;
        *value = field.parse().map_err(|_| {
            ObjError::ParseError(format!("line {line_no}: invalid {what} component '{field}'"))
        })?;
    }
    Ok(out)
}

/// Resolve a 1-based (or negative, relative) OBJ index against `len` entries
fn resolve_index(field: &str, len: usize) -> Option<usize> {
    let index: i64 = field.parse().ok()?;
    let len = i64::try_from(len).ok()?;
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => len + i,
        _ => return None,
    };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 1
f 1/1/1 2/1/1 3/2/1 4/2/1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = ObjLoader::parse(Cursor::new(QUAD)).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[2].tex_coord, [1.0, 1.0]);
    }

    #[test]
    fn test_position_only_and_normal_only_faces() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 1 0 0\nf 1 2 3\nf 1//1 2//1 3//1\n";
        let mesh = ObjLoader::parse(Cursor::new(text)).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[3].normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = ObjLoader::parse(Cursor::new(text)).unwrap();
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_bad_number_is_parse_error() {
        let err = ObjLoader::parse(Cursor::new("v 0 zero 0\n")).unwrap_err();
        assert!(matches!(err, ObjError::ParseError(_)));
    }

    #[test]
    fn test_out_of_range_index_is_invalid() {
        let err = ObjLoader::parse(Cursor::new("v 0 0 0\nf 1 2 3\n")).unwrap_err();
        assert!(matches!(err, ObjError::InvalidFormat(_)));
    }

    #[test]
    fn test_empty_file_is_invalid() {
        let err = ObjLoader::parse(Cursor::new("# nothing here\n")).unwrap_err();
        assert!(matches!(err, ObjError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ObjLoader::load_obj("definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, ObjError::Io(_)));
    }
}
