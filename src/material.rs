use enum_dispatch::enum_dispatch;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    intersection::SurfaceHit,
    ray::Ray,
    vec3::{Float, Vec3, Vec3Ext},
};

#[enum_dispatch]
pub trait Scatter {
    /// Outgoing ray leaving `hit` for a ray arriving along `ray_in`.
    /// Absorption is expressed through the struck object's tint, so a ray is always produced.
    fn scatter(&self, ray_in: &Ray, hit: &SurfaceHit, rng: &mut dyn RngCore) -> Ray;
}

/// The three surface behaviours. Shared by value between spheres.
#[enum_dispatch(Scatter)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    Lambertian(Lambertian),
    Metallic(Metallic),
    Dielectric(Dielectric),
}

impl Default for Material {
    fn default() -> Self {
        Lambertian::new().into()
    }
}

/// Refract unit vector `incoming_direction` through a surface with unit `surface_normal`
/// facing against it, using vector Snell's law.
pub fn refract(incoming_direction: &Vec3, surface_normal: &Vec3, refraction_ratio: Float) -> Vec3 {
    let cos_theta = (-incoming_direction.dot(surface_normal)).min(1.0);
    let r_out_perp = (incoming_direction + surface_normal * cos_theta) * refraction_ratio;
    let r_out_parallel = surface_normal * -((1.0 - r_out_perp.norm_squared()).abs().sqrt());
    r_out_perp + r_out_parallel
}

/// Returns Schlick's approximation for reflectance at a given angle.
pub fn reflectance(cosine: Float, refraction_ratio: Float) -> Float {
    let r0 = (1.0 - refraction_ratio) / (1.0 + refraction_ratio);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Diffuse surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lambertian {}

impl Lambertian {
    pub fn new() -> Self {
        Lambertian {}
    }
}

impl Scatter for Lambertian {
    fn scatter(&self, _ray_in: &Ray, hit: &SurfaceHit, rng: &mut dyn RngCore) -> Ray {
        // Target is a random point on the unit sphere sitting on the surface
        let target = hit.point + hit.normal + Vec3::random_unit(rng);
        let mut scatter_dir = target - hit.point;
        if scatter_dir.near_zero() {
            scatter_dir = hit.normal;
        }
        Ray::new(hit.point, scatter_dir)
    }
}

/// Mirror-like surface. `fuzz` of 0 is a perfect mirror.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metallic {
    pub fuzz: Float,
}

impl Metallic {
    pub fn new(fuzz: Float) -> Self {
        Metallic { fuzz }
    }
}

impl Scatter for Metallic {
    fn scatter(&self, ray_in: &Ray, hit: &SurfaceHit, rng: &mut dyn RngCore) -> Ray {
        let mut reflected = ray_in.direction.normalize().reflect(&hit.normal);
        if self.fuzz > 0.0 {
            reflected += Vec3::random_unit(rng) * self.fuzz;
        }
        Ray::new(hit.point, reflected)
    }
}

/// Transparent surface that refracts, or reflects when refraction is impossible.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dielectric {
    /// Refractive index relative to the surrounding medium (air)
    pub refractive_index: Float,
}

impl Dielectric {
    pub fn new(refractive_index: Float) -> Self {
        Dielectric { refractive_index }
    }

    pub fn refraction_ratio(&self, is_front_face: bool) -> Float {
        if is_front_face {
            1.0 / self.refractive_index
        } else {
            self.refractive_index
        }
    }
}

impl Scatter for Dielectric {
    fn scatter(&self, ray_in: &Ray, hit: &SurfaceHit, rng: &mut dyn RngCore) -> Ray {
        let ri = self.refraction_ratio(hit.is_front_face);
        let unit_direction = ray_in.direction.normalize();

        let cos_theta = (-unit_direction.dot(&hit.normal)).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let cannot_refract = ri * sin_theta > 1.0;

        let direction = if cannot_refract || reflectance(cos_theta, ri) > rng.gen::<Float>() {
            unit_direction.reflect(&hit.normal)
        } else {
            refract(&unit_direction, &hit.normal, ri)
        };
        Ray::new(hit.point, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{
        rngs::{mock::StepRng, StdRng},
        SeedableRng,
    };

    // Every uniform draw from this generator is 0.75 in [0, 1) and 0.5 in [-1, 1)
    fn fixed_rng() -> StepRng {
        StepRng::new(0xC000_0000, 0)
    }

    fn hit_at_origin(normal: Vec3, is_front_face: bool) -> SurfaceHit {
        SurfaceHit {
            t: 1.0,
            point: Vec3::zeros(),
            normal,
            is_front_face,
        }
    }

    #[test]
    fn test_mirror_obeys_reflection_law() {
        let mut rng = StdRng::seed_from_u64(42);
        let metal = Material::from(Metallic::new(0.0));
        for _ in 0..200 {
            let n = Vec3::random_unit(&mut rng);
            let mut d = Vec3::random_unit(&mut rng);
            if d.dot(&n) > 0.0 {
                d = -d;
            }
            let ray_in = Ray::new(n * 2.0, d);
            let out = metal.scatter(&ray_in, &hit_at_origin(n, true), &mut rng);
            assert_abs_diff_eq!(out.direction.dot(&n), -d.dot(&n), epsilon = 1e-5);
            assert_abs_diff_eq!(out.origin, Vec3::zeros());
        }
    }

    #[test]
    fn test_mirror_normalizes_incoming() {
        let n = Vec3::new(0.0, 1.0, 0.0);
        let ray_in = Ray::new(Vec3::new(-3.0, 3.0, 0.0), Vec3::new(3.0, -3.0, 0.0));
        let out = Metallic::new(0.0).scatter(&ray_in, &hit_at_origin(n, true), &mut fixed_rng());
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_abs_diff_eq!(out.direction, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_fuzz_stays_within_radius() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = Vec3::new(0.0, 1.0, 0.0);
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let mirror = d.reflect(&n);
        let metal = Metallic::new(0.3);
        for _ in 0..200 {
            let out = metal.scatter(&Ray::new(-d, d), &hit_at_origin(n, true), &mut rng);
            assert!((out.direction - mirror).norm() <= 0.3 + 1e-5);
        }
    }

    #[test]
    fn test_lambertian_fixed_direction() {
        let n = Vec3::new(0.0, 1.0, 0.0);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let out = Lambertian::new().scatter(&ray_in, &hit_at_origin(n, true), &mut fixed_rng());
        let expected = n + Vec3::repeat(1.0).normalize();
        assert_abs_diff_eq!(out.direction, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_lambertian_stays_above_surface() {
        let mut rng = StdRng::seed_from_u64(9);
        let n = Vec3::new(0.0, 0.0, 1.0);
        let ray_in = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        for _ in 0..500 {
            let out = Lambertian::new().scatter(&ray_in, &hit_at_origin(n, true), &mut rng);
            assert!(out.direction.dot(&n) >= 0.0);
            assert!(!out.direction.near_zero());
        }
    }

    #[test]
    fn test_total_internal_reflection() {
        // Leaving glass at a grazing angle: 1.5 * sin(60 deg) > 1
        let n = Vec3::new(0.0, 1.0, 0.0);
        let d = Vec3::new(3.0_f32.sqrt(), -1.0, 0.0).normalize();
        let glass = Dielectric::new(1.5);
        assert!(glass.refraction_ratio(false) * (1.0 - d.dot(&n).powi(2)).sqrt() > 1.0);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let out = glass.scatter(&Ray::new(-d, d), &hit_at_origin(n, false), &mut rng);
            assert_abs_diff_eq!(out.direction, d.reflect(&n), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_normal_incidence_passes_straight_through() {
        let n = Vec3::new(0.0, 0.0, 1.0);
        let d = Vec3::new(0.0, 0.0, -2.0);
        // Schlick gives 0.04 here, below the fixed 0.75 draw
        let out = Dielectric::new(1.5).scatter(&Ray::new(-d, d), &hit_at_origin(n, true), &mut fixed_rng());
        assert_abs_diff_eq!(out.direction, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        let n = Vec3::new(0.0, 1.0, 0.0);
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let ratio = 1.0 / 1.5;
        let r = refract(&d, &n, ratio);
        assert_abs_diff_eq!(r.norm(), 1.0, epsilon = 1e-5);
        // Snell: sin(out) = ratio * sin(in)
        let sin_in = d.x.abs();
        let sin_out = r.x.abs() / r.norm();
        assert_abs_diff_eq!(sin_out, ratio * sin_in, epsilon = 1e-5);
        assert!(r.y < 0.0);
    }

    #[test]
    fn test_reflectance() {
        assert_abs_diff_eq!(reflectance(1.0, 1.5), 0.04, epsilon = 1e-6);
        assert_abs_diff_eq!(reflectance(0.0, 1.5), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&Material::from(Metallic::new(0.25))).unwrap();
        assert_eq!(json, r#"{"type":"metallic","fuzz":0.25}"#);

        let glass: Material =
            serde_json::from_str(r#"{"type":"dielectric","refractive_index":1.5}"#).unwrap();
        assert_eq!(glass, Dielectric::new(1.5).into());

        let diffuse: Material = serde_json::from_str(r#"{"type":"lambertian"}"#).unwrap();
        assert_eq!(diffuse, Material::default());
    }
}
