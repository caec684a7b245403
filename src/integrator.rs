use crate::{
    error::RenderError,
    hittable::Hit,
    material::Scatter,
    ray::Ray,
    vec3::{Color, Float, Vec3, Vec3Ext},
};
use rand::RngCore;
use std::ops::Range;

/// Sky gradient seen by rays that leave the scene: white at the horizon
/// below, blue straight up.
pub fn background(ray: &Ray) -> Color {
    let white = Color::repeat(1.0);
    let sky_blue = Color::new(0.5, 0.7, 1.0);
    let unit_dir = ray.direction.normalize();
    let a = 0.5 * (unit_dir.y + 1.0);
    // Written as an offset from white so no channel can round above 1
    white + (sky_blue - white) * a
}

/// Recursive path integrator with a hard bounce limit.
#[derive(Clone, Debug, PartialEq)]
pub struct Integrator {
    pub max_depth: u32,
    pub t_range: Range<Float>,
}

impl Integrator {
    pub fn new(max_depth: u32, t_range: Range<Float>) -> Self {
        Integrator { max_depth, t_range }
    }

    /// Color carried back along `ray`.
    pub fn ray_color(
        &self,
        world: &impl Hit,
        ray: &Ray,
        rng: &mut dyn RngCore,
    ) -> Result<Color, RenderError> {
        self.trace(world, ray, 0, rng)
    }

    fn trace(
        &self,
        world: &impl Hit,
        ray: &Ray,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Result<Color, RenderError> {
        if depth >= self.max_depth {
            return Ok(Color::zeros()); // Bounce limit reached, no more light gathered
        }

        let Some(hit) = world.hit(ray, &self.t_range) else {
            return Ok(background(ray));
        };

        if !ray.direction.all_finite() || ray.direction == Vec3::zeros() {
            return Err(RenderError::NonFiniteDirection {
                direction: ray.direction,
                point: hit.point(),
            });
        }

        let scattered = hit.material.scatter(ray, &hit.surface, rng);
        let incoming = self.trace(world, &scattered, depth + 1, rng)?;
        Ok(incoming.component_mul(&hit.tint))
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Integrator::new(50, 0.001..1000.0)
    }
}
