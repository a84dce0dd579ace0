use crate::geometry::{Intersection, Triangle};
use crate::materials::MaterialEnum;
use crate::math::{luminance, Point3, Ray};
use crate::mediums::MediumEnum;

/// Triangle soup plus the material table and the optional atmosphere
/// medium. Emissive triangles are indexed with a power-proportional prefix
/// sum so light sampling is O(log n).
///
/// Intersection is a linear scan over the triangle list; acceleration
/// structures live outside this crate.
pub struct Scene {
    pub triangles: Vec<Triangle>,
    pub materials: Vec<MaterialEnum>,
    pub atmosphere: Option<MediumEnum>,
    emissive: Vec<usize>,
    emissive_cdf: Vec<f32>,
    emissive_total: f32,
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            triangles: Vec::new(),
            materials: Vec::new(),
            atmosphere: None,
            emissive: Vec::new(),
            emissive_cdf: Vec::new(),
            emissive_total: 0.0,
        }
    }

    pub fn add_material(&mut self, material: MaterialEnum) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_triangle(&mut self, vertices: [Point3; 3], material: usize) -> usize {
        let id = self.triangles.len();
        let triangle = Triangle::new(id, vertices, material);
        if self.materials[material].is_emissive() {
            let power = luminance(self.materials[material].radiance()) * triangle.area;
            self.emissive.push(id);
            self.emissive_total += power;
            self.emissive_cdf.push(self.emissive_total);
        }
        self.triangles.push(triangle);
        id
    }

    /// Two triangles covering the quad `corners[0..4]` (given in winding
    /// order; the shared normal follows the winding).
    pub fn add_quad(&mut self, corners: [Point3; 4], material: usize) {
        self.add_triangle([corners[0], corners[1], corners[2]], material);
        self.add_triangle([corners[0], corners[2], corners[3]], material);
    }

    pub fn set_atmosphere(&mut self, medium: MediumEnum) {
        self.atmosphere = Some(medium);
    }

    pub fn emissive_triangles(&self) -> &[usize] {
        &self.emissive
    }

    /// Nearest intersection along `ray`, honoring `ray.t_min`.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let mut nearest: Option<Intersection> = None;
        for triangle in &self.triangles {
            if let Some((dist, front)) = triangle.intersect(ray) {
                if nearest.map_or(true, |n| dist < n.dist) {
                    nearest = Some(Intersection {
                        front,
                        point: ray.at(dist),
                        normal: triangle.normal,
                        dist,
                        triangle_id: triangle.id,
                    });
                }
            }
        }
        nearest
    }

    /// Pick an emissive triangle with probability proportional to its
    /// emitted power. Returns the triangle id and the pick pdf.
    pub fn sample_light_emission(&self, u: f32) -> Option<(usize, f32)> {
        if self.emissive.is_empty() || self.emissive_total <= 0.0 {
            return None;
        }
        let target = u * self.emissive_total;
        let slot = self.emissive_cdf.partition_point(|&c| c <= target);
        let slot = slot.min(self.emissive.len() - 1);
        let lower = if slot == 0 {
            0.0
        } else {
            self.emissive_cdf[slot - 1]
        };
        let pdf = (self.emissive_cdf[slot] - lower) / self.emissive_total;
        Some((self.emissive[slot], pdf))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::materials::{DiffuseLight, Lambertian};
    use crate::math::{Color, Vec3};
    use approx::assert_abs_diff_eq;

    fn two_light_scene() -> Scene {
        let mut scene = Scene::new();
        let dim = scene.add_material(MaterialEnum::DiffuseLight(DiffuseLight::new(
            Color::splat(1.0),
        )));
        let bright = scene.add_material(MaterialEnum::DiffuseLight(DiffuseLight::new(
            Color::splat(3.0),
        )));
        let grey = scene.add_material(MaterialEnum::Lambertian(Lambertian::new(
            Color::splat(0.5),
        )));
        // equal-area triangles, 1:3 power ratio
        scene.add_triangle(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            dim,
        );
        scene.add_triangle(
            [
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(6.0, 0.0, 0.0),
                Vec3::new(5.0, 1.0, 0.0),
            ],
            bright,
        );
        scene.add_triangle(
            [
                Vec3::new(9.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(9.0, 1.0, 0.0),
            ],
            grey,
        );
        scene
    }

    #[test]
    fn emissive_index_skips_non_lights() {
        let scene = two_light_scene();
        assert_eq!(scene.emissive_triangles(), &[0, 1]);
    }

    #[test]
    fn light_sampling_is_power_proportional() {
        let scene = two_light_scene();
        let (id_low, pdf_low) = scene.sample_light_emission(0.1).unwrap();
        assert_eq!(id_low, 0);
        assert_abs_diff_eq!(pdf_low, 0.25, epsilon = 1e-5);
        let (id_high, pdf_high) = scene.sample_light_emission(0.9).unwrap();
        assert_eq!(id_high, 1);
        assert_abs_diff_eq!(pdf_high, 0.75, epsilon = 1e-5);
    }

    #[test]
    fn sampling_without_lights_is_none() {
        let mut scene = Scene::new();
        let grey = scene.add_material(MaterialEnum::Lambertian(Lambertian::new(
            Color::splat(0.5),
        )));
        scene.add_triangle(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            grey,
        );
        assert!(scene.sample_light_emission(0.5).is_none());
    }

    #[test]
    fn intersect_returns_nearest() {
        let scene = two_light_scene();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), -Vec3::Z, 0.0);
        let hit = scene.intersect(&ray).unwrap();
        assert_eq!(hit.triangle_id, 0);
        assert_abs_diff_eq!(hit.dist, 5.0, epsilon = 1e-5);
        assert!(hit.front);
        let miss = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::Z, 0.0);
        assert!(scene.intersect(&miss).is_none());
    }
}
