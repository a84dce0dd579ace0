use crate::math::{Point3, Ray, Vec3};

/// Perspective pinhole camera. `sample` maps film coordinates in [0, 1)²
/// (origin at the top-left corner) to a primary ray.
#[derive(Debug, Clone)]
pub struct PinholeCamera {
    origin: Point3,
    lower_left: Point3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl PinholeCamera {
    pub fn new(look_from: Point3, look_at: Point3, v_up: Vec3, vfov: f32, aspect: f32) -> Self {
        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = aspect * half_height;
        let w = (look_from - look_at).normalize();
        let u = v_up.cross(w).normalize();
        let v = w.cross(u);
        PinholeCamera {
            origin: look_from,
            lower_left: look_from - half_width * u - half_height * v - w,
            horizontal: 2.0 * half_width * u,
            vertical: 2.0 * half_height * v,
        }
    }

    pub fn sample(&self, offset: (f32, f32), _pixel_size: (f32, f32)) -> Ray {
        let target =
            self.lower_left + offset.0 * self.horizontal + (1.0 - offset.1) * self.vertical;
        Ray::new(self.origin, (target - self.origin).normalize(), 0.0)
    }
}
