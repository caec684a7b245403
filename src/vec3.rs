use nalgebra::Vector3;
use rand::Rng;

pub type Float = f32;

/// x: red, right
///
/// y: green, up
///
/// z: blue, backward (cameras look down -z by default)
pub type Vec3 = Vector3<Float>;
pub type Point3 = Vec3;
pub type Color = Vec3;

pub trait Vec3Ext {
    fn random<R: Rng + ?Sized>(rng: &mut R, min: Float, max: Float) -> Self;
    fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn random_in_unit_disc<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn reflect(&self, normal: &Self) -> Self;
    fn near_zero(&self) -> bool;
    fn all_finite(&self) -> bool;
    fn in_unit_range(&self) -> bool;
}

impl Vec3Ext for Vec3 {
    fn random<R: Rng + ?Sized>(rng: &mut R, min: Float, max: Float) -> Self {
        Vec3::new(
            rng.gen_range(min..max),
            rng.gen_range(min..max),
            rng.gen_range(min..max),
        )
    }

    /// Rejection-samples a point strictly inside the unit sphere.
    /// Points at the origin are rejected too so the result can always be normalized.
    fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let v = Self::random(rng, -1.0, 1.0);
            let len_sq = v.norm_squared();
            if len_sq < 1.0 && len_sq > Float::EPSILON {
                return v;
            }
        }
    }

    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::random_in_unit_sphere(rng).normalize()
    }

    /// Returns random point in the x-y unit disc
    fn random_in_unit_disc<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut v = Vec3::repeat(1.0);
        while v.norm_squared() >= 1.0 {
            v = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        }
        v
    }

    /// Mirror `self` about the plane with the given unit `normal`.
    fn reflect(&self, normal: &Self) -> Self {
        self - normal * (2.0 * self.dot(normal))
    }

    fn near_zero(&self) -> bool {
        // sqrt of machine epsilon
        let e = Float::EPSILON.sqrt();
        self.iter().all(|c| c.abs() < e)
    }

    fn all_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }

    fn in_unit_range(&self) -> bool {
        self.iter().all(|c| (0.0..=1.0).contains(c))
    }
}
