use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SetupError;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh has no vertices or no indices")]
    Empty,
    #[error("position array length {0} is not a multiple of 3")]
    PositionsNotVec3(usize),
    #[error("{normals} normal floats for {positions} position floats")]
    NormalCountMismatch { positions: usize, normals: usize },
    #[error("expected {expected} uv floats, found {found}")]
    UvCountMismatch { expected: usize, found: usize },
    #[error("index count {0} is not a multiple of 3")]
    NotTriangles(usize),
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("malformed mesh file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable CPU-side geometry as handed over by a mesh provider.
///
/// Attribute arrays are flat: three floats per position and normal, two per
/// uv. A value of this type has always passed [`MeshData::validate`], including
/// one deserialized directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMesh")]
pub struct MeshData {
    positions: Vec<f32>,
    normals: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uvs: Option<Vec<f32>>,
    indices: Vec<u32>,
}

/// Mesh JSON as written on disk, before validation.
#[derive(Deserialize)]
struct RawMesh {
    positions: Vec<f32>,
    normals: Vec<f32>,
    #[serde(default)]
    uvs: Option<Vec<f32>>,
    indices: Vec<u32>,
}

impl TryFrom<RawMesh> for MeshData {
    type Error = MeshError;

    fn try_from(raw: RawMesh) -> Result<Self, MeshError> {
        MeshData::new(raw.positions, raw.normals, raw.uvs, raw.indices)
    }
}

impl MeshData {
    pub fn new(
        positions: Vec<f32>,
        normals: Vec<f32>,
        uvs: Option<Vec<f32>>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshError> {
        let mesh = Self {
            positions,
            normals,
            uvs,
            indices,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Parses the `{ positions, normals, uvs?, indices }` JSON layout.
    pub fn from_json_str(json: &str) -> Result<Self, MeshError> {
        let raw: RawMesh = serde_json::from_str(json)?;
        MeshData::try_from(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        log::info!("Loading mesh: {:?}", path);

        let json = std::fs::read_to_string(path).map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&json).map_err(|source| SetupError::Mesh {
            name: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.positions.is_empty() || self.indices.is_empty() {
            return Err(MeshError::Empty);
        }
        if self.positions.len() % 3 != 0 {
            return Err(MeshError::PositionsNotVec3(self.positions.len()));
        }
        if self.normals.len() != self.positions.len() {
            return Err(MeshError::NormalCountMismatch {
                positions: self.positions.len(),
                normals: self.normals.len(),
            });
        }

        let vertex_count = self.vertex_count();
        if let Some(uvs) = &self.uvs {
            if uvs.len() != vertex_count * 2 {
                return Err(MeshError::UvCountMismatch {
                    expected: vertex_count * 2,
                    found: uvs.len(),
                });
            }
        }

        if self.indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangles(self.indices.len()));
        }
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&index| index as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn position(&self, vertex: usize) -> [f32; 3] {
        let i = vertex * 3;
        [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
    }

    pub fn normal(&self, vertex: usize) -> [f32; 3] {
        let i = vertex * 3;
        [self.normals[i], self.normals[i + 1], self.normals[i + 2]]
    }

    /// Missing uvs read as zero.
    pub fn uv(&self, vertex: usize) -> [f32; 2] {
        match &self.uvs {
            Some(uvs) => [uvs[vertex * 2], uvs[vertex * 2 + 1]],
            None => [0.0, 0.0],
        }
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_json(indices: &str) -> String {
        format!(
            r#"{{
                "positions": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "normals": [0, 0, 1, 0, 0, 1, 0, 0, 1],
                "indices": {indices}
            }}"#
        )
    }

    #[test]
    fn parses_mesh_without_uvs() {
        let mesh = MeshData::from_json_str(&triangle_json("[0, 1, 2]")).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.position(1), [1.0, 0.0, 0.0]);
        assert_eq!(mesh.uv(2), [0.0, 0.0]);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = MeshData::from_json_str(&triangle_json("[0, 1, 3]")).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }
        ));
    }

    #[test]
    fn rejects_partial_triangle() {
        let err = MeshData::from_json_str(&triangle_json("[0, 1]")).unwrap_err();
        assert!(matches!(err, MeshError::NotTriangles(2)));
    }

    #[test]
    fn rejects_empty_and_mismatched_arrays() {
        assert!(matches!(
            MeshData::new(vec![], vec![], None, vec![]),
            Err(MeshError::Empty)
        ));
        assert!(matches!(
            MeshData::new(vec![0.0; 9], vec![0.0; 6], None, vec![0, 1, 2]),
            Err(MeshError::NormalCountMismatch { .. })
        ));
        assert!(matches!(
            MeshData::new(vec![0.0; 9], vec![0.0; 9], Some(vec![0.0; 4]), vec![0, 1, 2]),
            Err(MeshError::UvCountMismatch {
                expected: 6,
                found: 4
            })
        ));
    }

    #[test]
    fn deserializing_directly_still_validates() {
        let err = serde_json::from_str::<MeshData>(&triangle_json("[0, 1, 7]")).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");

        let mesh: MeshData = serde_json::from_str(&triangle_json("[0, 1, 2]")).unwrap();
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn serialized_mesh_reads_back_through_validation() {
        let mesh = MeshData::from_json_str(&triangle_json("[0, 2, 1]")).unwrap();
        let json = serde_json::to_string(&mesh).unwrap();
        assert!(!json.contains("uvs"));
        assert_eq!(serde_json::from_str::<MeshData>(&json).unwrap(), mesh);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = MeshData::from_json_str("{ \"positions\": [").unwrap_err();
        assert!(matches!(err, MeshError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file_path() {
        let err = MeshData::load("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("exist.json"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triangle.json");
        std::fs::write(&path, triangle_json("[2, 1, 0]")).unwrap();

        let mesh = MeshData::load(&path).unwrap();
        assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[2, 1, 0]]);
    }
}
