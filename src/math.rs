use std::f32::consts::{PI, TAU};

pub use glam::Vec3;

/// World-space position.
pub type Point3 = Vec3;
/// Linear-RGB radiance or throughput.
pub type Color = Vec3;

/// Offset applied to continuation and shadow rays to avoid re-hitting the
/// surface they originate from.
pub const RAY_EPSILON: f32 = 1e-5;

/// Sampled pdfs below this are treated as degenerate and terminate the path.
pub const PDF_CUTOFF: f32 = 1e-20;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3,
    pub dir: Vec3,
    pub t_min: f32,
}

impl Ray {
    pub fn new(origin: Point3, dir: Vec3, t_min: f32) -> Self {
        Ray { origin, dir, t_min }
    }

    pub fn at(&self, t: f32) -> Point3 {
        self.origin + t * self.dir
    }
}

pub fn luminance(c: Color) -> f32 {
    c.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}

// also known as an orthonormal basis.
#[derive(Debug, Clone, Copy)]
pub struct TangentFrame {
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub normal: Vec3,
}

impl TangentFrame {
    /// Branchless ONB construction (Duff et al. 2017).
    pub fn from_normal(normal: Vec3) -> Self {
        let sign = 1.0f32.copysign(normal.z);
        let a = -1.0 / (sign + normal.z);
        let b = normal.x * normal.y * a;
        TangentFrame {
            tangent: Vec3::new(1.0 + sign * normal.x * normal.x * a, sign * b, -sign * normal.x),
            bitangent: Vec3::new(b, sign + normal.y * normal.y * a, -normal.y),
            normal,
        }
    }

    #[inline(always)]
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }

    #[inline(always)]
    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.tangent.dot(v), self.bitangent.dot(v), self.normal.dot(v))
    }
}

/// Cosine-weighted direction in the local +z hemisphere.
pub fn cosine_hemisphere(u: f32, v: f32) -> Vec3 {
    let r = u.sqrt();
    let phi = TAU * v;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(r * cos_phi, r * sin_phi, (1.0 - u).max(0.0).sqrt())
}

/// Uniform direction on the unit sphere.
pub fn uniform_sphere(u: f32, v: f32) -> Vec3 {
    let cos_theta = 1.0 - 2.0 * u;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = TAU * v;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

pub const INV_PI: f32 = 1.0 / PI;
