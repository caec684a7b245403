use crate::vec3::{Float, Point3, Vec3};

/// A half-line `origin + t * direction`. The direction is not necessarily unit length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: Float) -> Point3 {
        self.origin + self.direction * t
    }
}
