use glam::Vec3;

use super::MeshData;

#[derive(Default)]
struct Builder {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
}

impl Builder {
    /// Appends a quad centred on `center` spanning `u` and `v` (half extents).
    /// `u × v` must point along the outward normal so the quad winds CCW.
    fn quad(&mut self, center: Vec3, u: Vec3, v: Vec3) {
        let normal = u.cross(v).normalize();
        let base = (self.positions.len() / 3) as u32;
        let corners = [
            (center - u - v, [0.0, 1.0]),
            (center + u - v, [1.0, 1.0]),
            (center + u + v, [1.0, 0.0]),
            (center - u + v, [0.0, 0.0]),
        ];
        for (pos, uv) in corners {
            self.positions.extend_from_slice(&pos.to_array());
            self.normals.extend_from_slice(&normal.to_array());
            self.uvs.extend_from_slice(&uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn build(self) -> MeshData {
        MeshData::new(self.positions, self.normals, Some(self.uvs), self.indices)
            .unwrap_or_else(|err| unreachable!("built-in primitive is invalid: {err}"))
    }
}

/// Unit cube centred on the origin with per-face normals.
pub fn cube() -> MeshData {
    let h = 0.5;
    let mut builder = Builder::default();
    builder.quad(Vec3::X * h, Vec3::NEG_Z * h, Vec3::Y * h);
    builder.quad(Vec3::NEG_X * h, Vec3::Z * h, Vec3::Y * h);
    builder.quad(Vec3::Y * h, Vec3::X * h, Vec3::NEG_Z * h);
    builder.quad(Vec3::NEG_Y * h, Vec3::X * h, Vec3::Z * h);
    builder.quad(Vec3::Z * h, Vec3::X * h, Vec3::Y * h);
    builder.quad(Vec3::NEG_Z * h, Vec3::NEG_X * h, Vec3::Y * h);
    builder.build()
}

/// Square in the XZ plane facing +Y.
pub fn plane(size: f32) -> MeshData {
    let h = size * 0.5;
    let mut builder = Builder::default();
    builder.quad(Vec3::ZERO, Vec3::X * h, Vec3::NEG_Z * h);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec3(a: [f32; 3]) -> Vec3 {
        Vec3::from_array(a)
    }

    #[test]
    fn cube_has_six_faces() {
        let mesh = cube();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn cube_triangles_wind_counter_clockwise_from_outside() {
        let mesh = cube();
        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (
                vec3(mesh.position(a as usize)),
                vec3(mesh.position(b as usize)),
                vec3(mesh.position(c as usize)),
            );
            let face_normal = (pb - pa).cross(pc - pa).normalize();
            let stored = vec3(mesh.normal(a as usize));
            assert!(face_normal.abs_diff_eq(stored, 1e-6), "{face_normal:?} vs {stored:?}");
            // outward: the centroid lies on the normal's side of the origin
            assert!(((pa + pb + pc) / 3.0).dot(stored) > 0.0);
        }
    }

    #[test]
    fn plane_faces_up() {
        let mesh = plane(10.0);
        assert_eq!(mesh.vertex_count(), 4);
        for i in 0..4 {
            assert_eq!(mesh.normal(i), [0.0, 1.0, 0.0]);
            assert_eq!(mesh.position(i)[1], 0.0);
        }
        let [a, b, c] = mesh.triangles().next().unwrap();
        let (pa, pb, pc) = (
            vec3(mesh.position(a as usize)),
            vec3(mesh.position(b as usize)),
            vec3(mesh.position(c as usize)),
        );
        assert!((pb - pa).cross(pc - pa).y > 0.0);
    }
}
