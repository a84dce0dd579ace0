use super::SurfaceEvent;
use crate::math::{Color, Vec3};

/// Ideal specular reflector. The sampled value carries 1/|cos| so that the
/// integrator's uniform `f * cos / pdf` update reproduces the reflectance.
#[derive(Debug, Clone)]
pub struct Mirror {
    pub reflectance: Color,
}

impl Mirror {
    pub fn new(reflectance: Color) -> Mirror {
        Mirror { reflectance }
    }

    pub fn sample(&self, wi: Vec3) -> (Vec3, Color, f32, SurfaceEvent) {
        let wo = Vec3::new(-wi.x, -wi.y, wi.z);
        if wo.z.abs() < 1e-7 {
            return (wo, Color::ZERO, 0.0, SurfaceEvent::SpecularReflect);
        }
        (
            wo,
            self.reflectance / wo.z.abs(),
            1.0,
            SurfaceEvent::SpecularReflect,
        )
    }
}
