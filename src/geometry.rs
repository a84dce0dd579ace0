use crate::math::{Point3, Ray, Vec3};

/// Nearest-hit record. `normal` is the triangle's geometric normal, not
/// flipped toward the ray; `front` tells which side was struck.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    pub front: bool,
    pub point: Point3,
    pub normal: Vec3,
    pub dist: f32,
    pub triangle_id: usize,
}

#[derive(Debug, Clone)]
pub struct Triangle {
    pub id: usize,
    pub v: [Point3; 3],
    pub normal: Vec3,
    pub area: f32,
    pub material: usize,
}

impl Triangle {
    pub fn new(id: usize, v: [Point3; 3], material: usize) -> Self {
        let cross = (v[1] - v[0]).cross(v[2] - v[0]);
        let len = cross.length();
        Triangle {
            id,
            v,
            normal: if len > 0.0 { cross / len } else { Vec3::Z },
            area: 0.5 * len,
            material,
        }
    }

    /// Möller–Trumbore. Returns distance and whether the front face
    /// (the side the normal points toward) was hit.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, bool)> {
        let e1 = self.v[1] - self.v[0];
        let e2 = self.v[2] - self.v[0];
        let pvec = ray.dir.cross(e2);
        let det = e1.dot(pvec);
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = ray.origin - self.v[0];
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qvec = tvec.cross(e1);
        let v = ray.dir.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(qvec) * inv_det;
        if t < ray.t_min {
            return None;
        }
        Some((t, det > 0.0))
    }

    /// Uniform point on the triangle surface.
    pub fn sample_point(&self, u: f32, v: f32) -> Point3 {
        let su = u.sqrt();
        let b0 = 1.0 - su;
        let b1 = v * su;
        b0 * self.v[0] + b1 * self.v[1] + (1.0 - b0 - b1) * self.v[2]
    }

    /// Signed distance of `p` from the supporting plane; positive on the
    /// side the normal points toward.
    pub fn plane_side(&self, p: Point3) -> f32 {
        (p - self.v[0]).dot(self.normal)
    }
}
