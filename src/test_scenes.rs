//! Small hand-built scenes shared by the transport tests.

use crate::materials::{DiffuseLight, Lambertian, MaterialEnum, Mirror};
use crate::math::{Color, Point3, Ray, Vec3};
use crate::mediums::{HomogeneousMedium, MediumEnum};
use crate::scene::Scene;

pub const WALL_RADIANCE: f32 = 5.0;

/// Large emissive quad in the z = 0 plane, facing +z.
pub fn emissive_wall() -> Scene {
    let mut scene = Scene::new();
    let light = scene.add_material(MaterialEnum::DiffuseLight(DiffuseLight::new(Color::splat(
        WALL_RADIANCE,
    ))));
    let s = 4.0;
    scene.add_quad(
        [
            Point3::new(-s, -s, 0.0),
            Point3::new(s, -s, 0.0),
            Point3::new(s, s, 0.0),
            Point3::new(-s, s, 0.0),
        ],
        light,
    );
    scene
}

pub fn emissive_wall_in_fog(sigma_a: f32) -> Scene {
    let mut scene = emissive_wall();
    scene.set_atmosphere(MediumEnum::Homogeneous(HomogeneousMedium::new(0.0, sigma_a)));
    scene
}

/// Diffuse floor in the y = 0 plane under a 2x2 ceiling light at y = 3.
pub fn lit_floor() -> Scene {
    let mut scene = Scene::new();
    let grey = scene.add_material(MaterialEnum::Lambertian(Lambertian::new(Color::splat(0.8))));
    let light = scene.add_material(MaterialEnum::DiffuseLight(DiffuseLight::new(Color::splat(
        5.0,
    ))));
    let s = 10.0;
    scene.add_quad(
        [
            Point3::new(-s, 0.0, -s),
            Point3::new(-s, 0.0, s),
            Point3::new(s, 0.0, s),
            Point3::new(s, 0.0, -s),
        ],
        grey,
    );
    let a = 1.0;
    scene.add_quad(
        [
            Point3::new(-a, 3.0, -a),
            Point3::new(a, 3.0, -a),
            Point3::new(a, 3.0, a),
            Point3::new(-a, 3.0, a),
        ],
        light,
    );
    scene
}

/// Primary ray hitting the floor of `lit_floor` (and of
/// `small_light_high_above`) at the origin.
pub fn lit_floor_camera_ray() -> Ray {
    let origin = Point3::new(0.0, 1.0, 3.0);
    Ray::new(origin, (Point3::ZERO - origin).normalize(), 0.0)
}

const SMALL_LIGHT_HALF: f32 = 0.05;
const SMALL_LIGHT_HEIGHT: f32 = 2.0;
const SMALL_LIGHT_RADIANCE: f32 = 10.0;
const FLOOR_ALBEDO: f32 = 0.8;

/// Diffuse floor with a tiny light directly above the origin; close to the
/// point-light limit, so direct lighting has a closed form.
pub fn small_light_high_above() -> Scene {
    let mut scene = Scene::new();
    let grey = scene.add_material(MaterialEnum::Lambertian(Lambertian::new(Color::splat(
        FLOOR_ALBEDO,
    ))));
    let light = scene.add_material(MaterialEnum::DiffuseLight(DiffuseLight::new(Color::splat(
        SMALL_LIGHT_RADIANCE,
    ))));
    let s = 10.0;
    scene.add_quad(
        [
            Point3::new(-s, 0.0, -s),
            Point3::new(-s, 0.0, s),
            Point3::new(s, 0.0, s),
            Point3::new(s, 0.0, -s),
        ],
        grey,
    );
    let a = SMALL_LIGHT_HALF;
    let h = SMALL_LIGHT_HEIGHT;
    scene.add_quad(
        [
            Point3::new(-a, h, -a),
            Point3::new(a, h, -a),
            Point3::new(a, h, a),
            Point3::new(-a, h, a),
        ],
        light,
    );
    scene
}

/// Point-light approximation of the direct radiance at the origin of
/// `small_light_high_above`: L_e * (albedo/pi) * A / h^2, both cosines 1.
pub fn small_light_analytic_direct() -> f32 {
    let area = (2.0 * SMALL_LIGHT_HALF) * (2.0 * SMALL_LIGHT_HALF);
    SMALL_LIGHT_RADIANCE * (FLOOR_ALBEDO / std::f32::consts::PI) * area
        / (SMALL_LIGHT_HEIGHT * SMALL_LIGHT_HEIGHT)
}

/// Mirror in the z = 0 plane facing +z, with an emissive quad behind the
/// camera at z = 5 facing -z. The only transport is the double-delta chain
/// camera -> mirror -> light.
pub fn mirror_and_light() -> Scene {
    let mut scene = Scene::new();
    let mirror = scene.add_material(MaterialEnum::Mirror(Mirror::new(Color::splat(0.9))));
    let light = scene.add_material(MaterialEnum::DiffuseLight(DiffuseLight::new(Color::splat(
        2.0,
    ))));
    let s = 2.0;
    scene.add_quad(
        [
            Point3::new(-s, -s, 0.0),
            Point3::new(s, -s, 0.0),
            Point3::new(s, s, 0.0),
            Point3::new(-s, s, 0.0),
        ],
        mirror,
    );
    scene.add_quad(
        [
            Point3::new(-s, -s, 5.0),
            Point3::new(-s, s, 5.0),
            Point3::new(s, s, 5.0),
            Point3::new(s, -s, 5.0),
        ],
        light,
    );
    scene
}

pub fn mirror_camera_ray() -> Ray {
    Ray::new(Point3::new(0.0, 0.0, 3.0), -Vec3::Z, 0.0)
}
