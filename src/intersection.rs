use crate::{
    material::Material,
    ray::Ray,
    vec3::{Color, Float, Point3, Vec3},
};

/// Geometric part of a ray/surface intersection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceHit {
    pub t: Float,
    pub point: Point3,
    /// Unit normal facing against the incoming ray
    pub normal: Vec3,
    /// Whether the ray approached from outside the surface
    pub is_front_face: bool,
}

impl SurfaceHit {
    /// Builds a hit from the outward normal, flipping it to face the ray when
    /// the ray started inside the surface.
    pub fn new(ray: &Ray, t: Float, point: Point3, outward_normal: Vec3) -> Self {
        let is_front_face = Self::is_front_face(ray, &outward_normal);
        let normal = if is_front_face {
            outward_normal
        } else {
            -outward_normal
        };
        SurfaceHit {
            t,
            point,
            normal,
            is_front_face,
        }
    }

    pub fn is_front_face(ray: &Ray, outward_normal: &Vec3) -> bool {
        ray.direction.dot(outward_normal) < 0.0
    }
}

/// A surface hit together with what was struck. Lives for one bounce only.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    pub surface: SurfaceHit,
    pub material: &'a Material,
    pub tint: Color,
}

impl<'a> Intersection<'a> {
    pub fn new(surface: SurfaceHit, material: &'a Material, tint: Color) -> Self {
        Intersection {
            surface,
            material,
            tint,
        }
    }

    pub fn t(&self) -> Float {
        self.surface.t
    }

    pub fn point(&self) -> Point3 {
        self.surface.point
    }
}
