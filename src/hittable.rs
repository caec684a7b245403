use crate::{
    intersection::{Intersection, SurfaceHit},
    material::Material,
    ray::Ray,
    vec3::{Color, Float, Point3},
};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub trait Hit: Send + Sync {
    /// Nearest intersection of `ray` with parameter inside `range`
    fn hit(&self, ray: &Ray, range: &Range<Float>) -> Option<Intersection<'_>>;
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point3,
    pub radius: Float,
    #[serde(default)]
    pub material: Material,
    /// Per-channel factor applied to light leaving the surface
    pub tint: Color,
}

impl Sphere {
    pub fn new(center: Point3, radius: Float, material: impl Into<Material>, tint: Color) -> Self {
        Sphere {
            center,
            radius,
            material: material.into(),
            tint,
        }
    }

    /// Closed-form ray/sphere test using the half-b form of the quadratic.
    /// Spheres without a positive radius are never hit.
    pub fn intersect(&self, ray: &Ray, range: &Range<Float>) -> Option<SurfaceHit> {
        if self.radius <= 0.0 {
            return None;
        }
        let oc = ray.origin - self.center;
        let a = ray.direction.norm_squared();
        let half_b = oc.dot(&ray.direction);
        let c = oc.norm_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None; // no point hit on the sphere
        }

        let sqrt_disc = discriminant.sqrt();
        // Find either root (hit point) in range
        let mut t = (-half_b - sqrt_disc) / a; // min root
        if !range.contains(&t) {
            t = (-half_b + sqrt_disc) / a; // max root if min is out of range
            if !range.contains(&t) {
                return None; // both out of range
            }
        }

        let point = ray.at(t);
        let outward_normal = (point - self.center) / self.radius;
        Some(SurfaceHit::new(ray, t, point, outward_normal))
    }
}

impl Hit for Sphere {
    fn hit(&self, ray: &Ray, range: &Range<Float>) -> Option<Intersection<'_>> {
        self.intersect(ray, range)
            .map(|surface| Intersection::new(surface, &self.material, self.tint))
    }
}
