use super::SurfaceEvent;
use crate::math::{cosine_hemisphere, Color, Vec3, INV_PI};

#[derive(Debug, Clone)]
pub struct Lambertian {
    pub albedo: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Lambertian {
        Lambertian { albedo }
    }

    pub fn sample(&self, wi: Vec3, u: f32, v: f32) -> (Vec3, Color, f32, SurfaceEvent) {
        if wi.z <= 0.0 {
            return (Vec3::Z, Color::ZERO, 0.0, SurfaceEvent::Diffuse);
        }
        let wo = cosine_hemisphere(u, v);
        (
            wo,
            self.albedo * INV_PI,
            wo.z * INV_PI,
            SurfaceEvent::Diffuse,
        )
    }

    pub fn evaluate(&self, wi: Vec3, wo: Vec3) -> Color {
        if wi.z > 0.0 && wo.z > 0.0 {
            self.albedo * INV_PI
        } else {
            Color::ZERO
        }
    }

    pub fn probability_density(&self, wi: Vec3, wo: Vec3) -> f32 {
        if wi.z > 0.0 && wo.z > 0.0 {
            wo.z * INV_PI
        } else {
            0.0
        }
    }
}
