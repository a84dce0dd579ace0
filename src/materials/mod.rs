use crate::geometry::Intersection;
use crate::math::{Color, TangentFrame, Vec3};
use crate::scene::Scene;

mod diffuse_light;
mod lambertian;
mod mirror;

pub use diffuse_light::DiffuseLight;
pub use lambertian::Lambertian;
pub use mirror::Mirror;

/// Classification of a sampled scattering event. Delta events have no
/// meaningful solid-angle density and are excluded from light-sample MIS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Diffuse,
    SpecularReflect,
}

impl SurfaceEvent {
    pub fn is_delta(self) -> bool {
        matches!(self, SurfaceEvent::SpecularReflect)
    }
}

#[derive(Debug, Clone)]
pub enum MaterialEnum {
    Lambertian(Lambertian),
    DiffuseLight(DiffuseLight),
    Mirror(Mirror),
}

impl MaterialEnum {
    pub fn is_emissive(&self) -> bool {
        matches!(self, MaterialEnum::DiffuseLight(_))
    }

    pub fn is_delta(&self) -> bool {
        matches!(self, MaterialEnum::Mirror(_))
    }

    /// Emitted radiance, for emissive materials.
    pub fn radiance(&self) -> Color {
        match self {
            MaterialEnum::DiffuseLight(light) => light.radiance,
            _ => Color::ZERO,
        }
    }
}

/// A material bound to a hit point: converts between world directions and
/// the local shading frame and dispatches to the material's lobes.
///
/// The shading frame is oriented toward the incoming side so opaque
/// materials shade correctly when struck from behind; emission queries use
/// the geometric normal.
pub struct Bsdf<'a> {
    material: &'a MaterialEnum,
    frame: TangentFrame,
    geometric_normal: Vec3,
}

impl<'a> Bsdf<'a> {
    pub fn new(scene: &'a Scene, info: &Intersection) -> Self {
        let triangle = &scene.triangles[info.triangle_id];
        let material = &scene.materials[triangle.material];
        let shading_normal = if info.front { info.normal } else { -info.normal };
        Bsdf {
            material,
            frame: TangentFrame::from_normal(shading_normal),
            geometric_normal: info.normal,
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.material.is_emissive()
    }

    pub fn is_delta(&self) -> bool {
        self.material.is_delta()
    }

    /// Radiance emitted toward `out_dir` (front side only).
    pub fn emitted_radiance(&self, out_dir: Vec3) -> Color {
        if self.geometric_normal.dot(out_dir) > 0.0 {
            self.material.radiance()
        } else {
            Color::ZERO
        }
    }

    /// Draw an outgoing direction for incoming `in_dir` (world space,
    /// pointing away from the surface). Returns the direction, the BSDF
    /// value, its solid-angle pdf, and the event classification.
    pub fn sample(&self, in_dir: Vec3, u: f32, v: f32) -> (Vec3, Color, f32, SurfaceEvent) {
        let wi = self.frame.to_local(in_dir);
        let (wo, f, pdf, event) = match self.material {
            MaterialEnum::Lambertian(m) => m.sample(wi, u, v),
            MaterialEnum::Mirror(m) => m.sample(wi),
            MaterialEnum::DiffuseLight(_) => (Vec3::Z, Color::ZERO, 0.0, SurfaceEvent::Diffuse),
        };
        (self.frame.to_world(wo), f, pdf, event)
    }

    pub fn evaluate(&self, in_dir: Vec3, out_dir: Vec3) -> Color {
        let wi = self.frame.to_local(in_dir);
        let wo = self.frame.to_local(out_dir);
        match self.material {
            MaterialEnum::Lambertian(m) => m.evaluate(wi, wo),
            _ => Color::ZERO,
        }
    }

    pub fn probability_density(&self, in_dir: Vec3, out_dir: Vec3) -> f32 {
        let wi = self.frame.to_local(in_dir);
        let wo = self.frame.to_local(out_dir);
        match self.material {
            MaterialEnum::Lambertian(m) => m.probability_density(wi, wo),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{cosine_hemisphere, INV_PI};
    use approx::assert_abs_diff_eq;

    #[test]
    fn lambertian_sample_agrees_with_pdf() {
        let m = Lambertian::new(Color::splat(0.7));
        let wi = Vec3::new(0.3, 0.2, 0.9).normalize();
        let (wo, f, pdf, event) = m.sample(wi, 0.4, 0.6);
        assert!(!event.is_delta());
        assert!(wo.z > 0.0);
        assert_abs_diff_eq!(pdf, m.probability_density(wi, wo), epsilon = 1e-6);
        assert_abs_diff_eq!(f.x, 0.7 * INV_PI, epsilon = 1e-6);
        assert_abs_diff_eq!(pdf, wo.z * INV_PI, epsilon = 1e-6);
        let expected = cosine_hemisphere(0.4, 0.6);
        assert_abs_diff_eq!(wo.x, expected.x, epsilon = 1e-6);
    }

    #[test]
    fn lambertian_rejects_lower_hemisphere() {
        let m = Lambertian::new(Color::splat(0.5));
        let up = Vec3::Z;
        let down = Vec3::new(0.1, 0.1, -0.9).normalize();
        assert_eq!(m.evaluate(up, down), Color::ZERO);
        assert_eq!(m.probability_density(up, down), 0.0);
        let (_, _, pdf, _) = m.sample(down, 0.5, 0.5);
        assert_eq!(pdf, 0.0);
    }

    #[test]
    fn mirror_reflects_with_unit_weight() {
        let m = Mirror::new(Color::splat(0.9));
        let wi = Vec3::new(0.5, 0.0, 0.5).normalize();
        let (wo, f, pdf, event) = m.sample(wi);
        assert!(event.is_delta());
        assert_abs_diff_eq!(pdf, 1.0);
        assert_abs_diff_eq!(wo.x, -wi.x, epsilon = 1e-6);
        assert_abs_diff_eq!(wo.z, wi.z, epsilon = 1e-6);
        // f * cos / pdf reproduces the reflectance
        assert_abs_diff_eq!(f.x * wo.z.abs() / pdf, 0.9, epsilon = 1e-5);
    }

    #[test]
    fn emission_is_front_sided() {
        let mut scene = Scene::new();
        let light = scene.add_material(MaterialEnum::DiffuseLight(DiffuseLight::new(
            Color::splat(4.0),
        )));
        scene.add_triangle(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            light,
        );
        let info = Intersection {
            front: true,
            point: Vec3::new(0.2, 0.2, 0.0),
            normal: Vec3::Z,
            dist: 1.0,
            triangle_id: 0,
        };
        let bsdf = Bsdf::new(&scene, &info);
        assert!(bsdf.is_emissive());
        assert_eq!(bsdf.emitted_radiance(Vec3::Z), Color::splat(4.0));
        assert_eq!(bsdf.emitted_radiance(-Vec3::Z), Color::ZERO);
    }
}
