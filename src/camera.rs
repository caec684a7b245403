use crate::{
    error::ConfigError,
    ray::Ray,
    vec3::{Float, Point3, Vec3, Vec3Ext},
};
use log::debug;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// User-facing camera description.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub origin: Point3,
    pub look_direction: Vec3,
    pub up: Vec3,
    /// Degrees
    pub vertical_fov: Float,
    pub image_width: u32,
    pub image_height: u32,
    /// 0 disables defocus blur
    pub lens_radius: Float,
    /// Distance from the origin to the plane of perfect focus
    pub focus_distance: Float,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            origin: Point3::zeros(),
            look_direction: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            vertical_fov: 90.0,
            image_width: 400,
            image_height: 225,
            lens_radius: 0.0,
            focus_distance: 1.0,
        }
    }
}

/// Camera with its derived basis and image plane, ready to emit primary rays.
#[derive(Clone, Debug)]
pub struct Camera {
    pub center: Point3,
    image_width: u32,
    image_height: u32,
    // Orthonormal basis: u right, v up, w backward (opposite the look direction)
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: Float,
    pixel00_loc: Point3,
    pixel_du: Vec3,
    pixel_dv: Vec3,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Result<Self, ConfigError> {
        let CameraConfig {
            origin,
            look_direction,
            up,
            vertical_fov,
            image_width,
            image_height,
            lens_radius,
            focus_distance,
        } = *config;

        if image_width == 0 || image_height == 0 {
            return Err(ConfigError::ZeroResolution {
                width: image_width,
                height: image_height,
            });
        }
        if !(vertical_fov > 0.0 && vertical_fov < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(vertical_fov));
        }
        if !(focus_distance > 0.0 && focus_distance.is_finite()) {
            return Err(ConfigError::NonPositiveFocusDistance(focus_distance));
        }
        if !(lens_radius >= 0.0 && lens_radius.is_finite()) {
            return Err(ConfigError::NegativeLensRadius(lens_radius));
        }

        let degenerate = ConfigError::DegenerateBasis {
            look: look_direction,
            up,
        };
        let w = (-look_direction)
            .try_normalize(Float::EPSILON)
            .ok_or_else(|| degenerate.clone())?;
        let u = up.cross(&w).try_normalize(Float::EPSILON).ok_or(degenerate)?;
        let v = w.cross(&u);

        let h = (vertical_fov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * focus_distance;
        let aspect_ratio = image_width as Float / image_height as Float;
        let viewport_width = viewport_height * aspect_ratio;

        // Displacement vectors from left to right and top to bottom of viewport
        let viewport_u = u * viewport_width; // Left to right across horizontal edge
        let viewport_v = -v * viewport_height; // Down vertical edge

        let pixel_du = viewport_u / image_width as Float;
        let pixel_dv = viewport_v / image_height as Float;

        let vp_upper_left = origin - w * focus_distance - viewport_u / 2.0 - viewport_v / 2.0;

        // Top left pixel center
        let pixel00_loc = vp_upper_left + (pixel_du + pixel_dv) / 2.0;

        debug!("camera basis u={u:?} v={v:?} w={w:?}, pixel00 at {pixel00_loc:?}");

        Ok(Camera {
            center: origin,
            image_width,
            image_height,
            u,
            v,
            w,
            lens_radius,
            pixel00_loc,
            pixel_du,
            pixel_dv,
        })
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Direction the camera looks along.
    pub fn forward(&self) -> Vec3 {
        -self.w
    }

    /// Point on the focus plane at fractional pixel coordinates, where integer
    /// coordinates are pixel centers.
    fn focus_point(&self, x: Float, y: Float) -> Point3 {
        self.pixel00_loc + self.pixel_du * x + self.pixel_dv * y
    }

    /// Return a camera ray originating from the defocus disk and directed at a random
    /// point inside pixel `x, y`.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        // Uniform [0, 1) offsets from the pixel corner cover the pixel with no overlap
        let x_offset: Float = rng.gen();
        let y_offset: Float = rng.gen();
        let pixel_sample = self.focus_point(
            x as Float + x_offset - 0.5,
            y as Float + y_offset - 0.5,
        );
        let ray_origin = if self.lens_radius <= 0.0 {
            self.center // no blur
        } else {
            self.defocus_disk_sample(rng) // random blur
        };
        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Ray from the lens center through the exact center of pixel `x, y`.
    pub fn center_ray(&self, x: u32, y: u32) -> Ray {
        let target = self.focus_point(x as Float, y as Float);
        Ray::new(self.center, target - self.center)
    }

    /// Returns a random point in the camera's defocus disk
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = Vec3::random_in_unit_disc(rng);
        self.center + (self.u * p.x + self.v * p.y) * self.lens_radius
    }
}
