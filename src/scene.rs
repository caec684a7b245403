use crate::{
    error::SceneError,
    hittable::{Hit, Sphere},
    intersection::Intersection,
    material::Material,
    ray::Ray,
    vec3::{Float, Vec3Ext},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fs, ops::Range, path::Path};

/// Ordered collection of spheres. Order only matters for breaking exact ties.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Scene { spheres }
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Checks every sphere for a positive finite radius, a finite center,
    /// a tint within [0, 1] and sane material parameters.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !(sphere.radius > 0.0 && sphere.radius.is_finite()) {
                return Err(SceneError::NonPositiveRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            if !sphere.center.all_finite() {
                return Err(SceneError::NonFiniteCenter {
                    index,
                    center: sphere.center,
                });
            }
            if !sphere.tint.in_unit_range() {
                return Err(SceneError::TintOutOfRange {
                    index,
                    tint: sphere.tint,
                });
            }
            match sphere.material {
                Material::Metallic(m) if !(m.fuzz >= 0.0) => {
                    return Err(SceneError::NegativeFuzz {
                        index,
                        fuzz: m.fuzz,
                    });
                }
                Material::Dielectric(d) if !(d.refractive_index > 0.0) => {
                    return Err(SceneError::NonPositiveRefractiveIndex {
                        index,
                        refractive_index: d.refractive_index,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes and validates a `{"spheres": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validate()?;
        debug!("decoded scene with {} spheres", scene.len());
        Ok(scene)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Hit for Scene {
    /// Returns nearest hit to camera for the given ray within the given view range
    fn hit(&self, ray: &Ray, range: &Range<Float>) -> Option<Intersection<'_>> {
        // Shrinking the upper bound means a later sphere at the same distance never replaces an earlier one
        let mut nearest_hit_dist = range.end;
        let mut nearest_hit = None;

        for sphere in self.spheres.iter() {
            if let Some(hit) = sphere.hit(ray, &(range.start..nearest_hit_dist)) {
                nearest_hit_dist = hit.t();
                nearest_hit = Some(hit);
            }
        }

        nearest_hit
    }
}

impl FromIterator<Sphere> for Scene {
    fn from_iter<I: IntoIterator<Item = Sphere>>(iter: I) -> Self {
        Scene::new(iter.into_iter().collect())
    }
}
