use crate::{
    camera::Camera,
    error::{ConfigError, RenderError},
    hittable::Hit,
    integrator::Integrator,
    output::Image,
    vec3::{Color, Float, Vec3Ext},
};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::info;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub gamma: Float,
    /// Base seed for the per-row generators. A random one is picked (and logged) when absent.
    pub seed: Option<u64>,
    pub t_min: Float,
    pub t_max: Float,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            samples_per_pixel: 100,
            max_depth: 50,
            gamma: 2.0,
            seed: None,
            t_min: 0.001,
            t_max: 1000.0,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.gamma > 0.0 && self.gamma.is_finite()) {
            return Err(ConfigError::NonPositiveGamma(self.gamma));
        }
        if !(self.t_min > 0.0) {
            return Err(ConfigError::NonPositiveRayStart(self.t_min));
        }
        if !(self.t_min < self.t_max) {
            return Err(ConfigError::EmptyRayRange {
                t_min: self.t_min,
                t_max: self.t_max,
            });
        }
        Ok(())
    }

    pub fn integrator(&self) -> Integrator {
        Integrator::new(self.max_depth, self.t_min..self.t_max)
    }
}

/// Take a color channel in linear space from 0.0 to 1.0 and encode it with the given gamma
pub fn linear_to_gamma(linear_color_value: Float, gamma: Float) -> Float {
    linear_color_value.powf(1.0 / gamma)
}

/// Average of `samples` jittered primary rays through pixel `x, y`, still in linear space.
pub fn render_pixel(
    camera: &Camera,
    world: &impl Hit,
    integrator: &Integrator,
    x: u32,
    y: u32,
    samples: u32,
    rng: &mut dyn RngCore,
) -> Result<Color, RenderError> {
    let mut sum = Color::zeros();
    for _ in 0..samples {
        let ray = camera.get_ray(x, y, rng);
        sum += integrator.ray_color(world, &ray, rng)?;
    }
    Ok(sum / samples as Float)
}

/// Rejects averaged colors outside [0, 1] and applies gamma to the rest.
pub fn finish_pixel(color: Color, x: u32, y: u32, gamma: Float) -> Result<Color, RenderError> {
    if !color.in_unit_range() {
        return Err(RenderError::ColorOutOfRange { x, y, color });
    }
    Ok(color.map(|c| linear_to_gamma(c, gamma)))
}

/// Generator for one image row. Depends only on the base seed and the row, so
/// results do not change with thread count or scheduling.
pub fn row_rng(seed: u64, row: u32) -> StdRng {
    StdRng::seed_from_u64(seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

pub fn progress_bar(rows: u32, message: &str) -> Result<ProgressBar, ConfigError> {
    let style = ProgressStyle::default_bar()
        .template(
            "{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .map_err(|e| ConfigError::ProgressTemplate(e.to_string()))?
        .progress_chars("#>-");
    Ok(ProgressBar::new(rows as u64)
        .with_style(style)
        .with_message(message.to_owned()))
}

/// Renders every pixel in parallel, one row per task, into a row-major gamma-encoded image.
pub fn render(
    camera: &Camera,
    world: &impl Hit,
    settings: &RenderSettings,
    progress_bar: ProgressBar,
) -> Result<Image, RenderError> {
    settings.validate()?;
    let width = camera.image_width();
    let height = camera.image_height();
    let seed = settings.seed.unwrap_or_else(rand::random);
    let integrator = settings.integrator();
    info!(
        "rendering {width}x{height}, {} samples per pixel, max depth {}, seed {seed}",
        settings.samples_per_pixel, settings.max_depth
    );

    let mut pixels = vec![Color::zeros(); width as usize * height as usize];
    pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .progress_with(progress_bar.clone())
        .try_for_each(|(y, row)| -> Result<(), RenderError> {
            let y = y as u32;
            let mut rng = row_rng(seed, y);
            for (x, pixel) in row.iter_mut().enumerate() {
                let x = x as u32;
                let color = render_pixel(
                    camera,
                    world,
                    &integrator,
                    x,
                    y,
                    settings.samples_per_pixel,
                    &mut rng,
                )?;
                *pixel = finish_pixel(color, x, y, settings.gamma)?;
            }
            Ok(())
        })?;
    progress_bar.finish_with_message("Image ready");

    Image::from_pixels(width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::CameraConfig,
        hittable::Sphere,
        material::{Dielectric, Lambertian, Metallic},
        scene::Scene,
        vec3::Vec3,
    };
    use approx::assert_abs_diff_eq;

    fn small_camera() -> Camera {
        Camera::new(&CameraConfig {
            image_width: 16,
            image_height: 9,
            ..Default::default()
        })
        .unwrap()
    }

    fn settings(seed: u64) -> RenderSettings {
        RenderSettings {
            samples_per_pixel: 4,
            max_depth: 10,
            seed: Some(seed),
            ..Default::default()
        }
    }

    fn demo_scene() -> Scene {
        Scene::new(vec![
            Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, Lambertian::new(), Vec3::new(0.8, 0.8, 0.0)),
            Sphere::new(Vec3::new(0.0, 0.0, -1.2), 0.5, Lambertian::new(), Vec3::new(0.1, 0.2, 0.5)),
            Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, Dielectric::new(1.5), Vec3::repeat(1.0)),
            Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, Metallic::new(0.2), Vec3::new(0.8, 0.6, 0.2)),
        ])
    }

    #[test]
    fn test_gamma() {
        assert_abs_diff_eq!(linear_to_gamma(0.25, 2.0), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(linear_to_gamma(0.25, 1.0), 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(linear_to_gamma(1.0, 2.2), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(linear_to_gamma(0.0, 2.2), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_finish_pixel_rejects_out_of_range() {
        let err = finish_pixel(Color::new(0.5, 1.1, 0.5), 3, 4, 2.0).unwrap_err();
        assert!(matches!(err, RenderError::ColorOutOfRange { x: 3, y: 4, .. }));
        assert!(finish_pixel(Color::new(-0.1, 0.5, 0.5), 0, 0, 2.0).is_err());
        let ok = finish_pixel(Color::new(0.25, 1.0, 0.0), 0, 0, 2.0).unwrap();
        assert_abs_diff_eq!(ok, Color::new(0.5, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_render_is_deterministic_per_seed() {
        let camera = small_camera();
        let scene = demo_scene();
        let a = render(&camera, &scene, &settings(99), ProgressBar::hidden()).unwrap();
        let b = render(&camera, &scene, &settings(99), ProgressBar::hidden()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width(), 16);
        assert_eq!(a.height(), 9);
        assert!(a.pixels().iter().all(|p| p.in_unit_range()));
    }

    #[test]
    fn test_render_is_independent_of_thread_count() {
        let camera = small_camera();
        let scene = demo_scene();
        let render_with = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| render(&camera, &scene, &settings(9), ProgressBar::hidden()).unwrap())
        };
        assert_eq!(render_with(1), render_with(4));
    }

    #[test]
    fn test_row_rng_streams_differ() {
        let mut first = row_rng(5, 0);
        let mut second = row_rng(5, 1);
        assert_ne!(first.next_u64(), second.next_u64());
        assert_eq!(row_rng(5, 3).next_u64(), row_rng(5, 3).next_u64());
    }

    #[test]
    fn test_empty_scene_shows_sky_gradient() {
        let camera = small_camera();
        let image = render(
            &camera,
            &Scene::default(),
            &RenderSettings { gamma: 1.0, ..settings(1) },
            ProgressBar::hidden(),
        )
        .unwrap();
        // Looking up, red fades toward the 0.5 of sky blue; blue stays 1
        let top = image.get(8, 0);
        let bottom = image.get(8, 8);
        assert!(top.x < bottom.x);
        assert_abs_diff_eq!(top.z, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bottom.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_overbright_tint_is_fatal() {
        // Diffuse light leaving the sphere always reaches the sky, doubling it past 1
        let scene = Scene::new(vec![Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            2.5,
            Lambertian::new(),
            Vec3::repeat(2.0),
        )]);
        let result = render(&small_camera(), &scene, &settings(3), ProgressBar::hidden());
        assert!(matches!(result, Err(RenderError::ColorOutOfRange { .. })));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let camera = small_camera();
        let scene = Scene::default();
        let zero = RenderSettings { samples_per_pixel: 0, ..settings(1) };
        assert!(matches!(
            render(&camera, &scene, &zero, ProgressBar::hidden()),
            Err(RenderError::Config(ConfigError::ZeroSamples))
        ));
        let flat = RenderSettings { gamma: 0.0, ..settings(1) };
        assert!(matches!(flat.validate(), Err(ConfigError::NonPositiveGamma(_))));
        let empty = RenderSettings { t_min: 1.0, t_max: 1.0, ..settings(1) };
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyRayRange { .. })));
        let behind = RenderSettings { t_min: -100.0, ..settings(1) };
        assert_eq!(behind.validate(), Err(ConfigError::NonPositiveRayStart(-100.0)));
        let touching = RenderSettings { t_min: 0.0, ..settings(1) };
        assert_eq!(touching.validate(), Err(ConfigError::NonPositiveRayStart(0.0)));
        assert!(matches!(
            render(&camera, &scene, &behind, ProgressBar::hidden()),
            Err(RenderError::Config(ConfigError::NonPositiveRayStart(_)))
        ));
    }

    #[test]
    fn test_render_pixel_averages_samples() {
        let camera = small_camera();
        let integrator = Integrator::default();
        let mut rng = row_rng(0, 0);
        let color = render_pixel(&camera, &Scene::default(), &integrator, 8, 4, 16, &mut rng).unwrap();
        // The center row looks near the horizon
        assert!(color.in_unit_range());
        assert_abs_diff_eq!(color.z, 1.0, epsilon = 1e-6);
        assert!(color.x > 0.7 && color.x < 0.8);
    }
}
