use crate::{
    camera::CameraConfig,
    config::SceneFile,
    error::ConfigError,
    hittable::Sphere,
    material::{Dielectric, Lambertian, Material, Metallic},
    render::RenderSettings,
    scene::Scene,
    vec3::{Color, Float, Vec3, Vec3Ext},
};
use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const SCENE_NAMES: [&str; 3] = ["three_spheres", "glass", "cover"];

pub fn by_name(name: &str) -> Result<SceneFile, ConfigError> {
    match name {
        "three_spheres" => Ok(three_spheres()),
        "glass" => Ok(glass()),
        "cover" => Ok(cover(11, 0)),
        _ => Err(ConfigError::UnknownScene(name.to_owned())),
    }
}

fn wide_camera() -> CameraConfig {
    CameraConfig {
        image_width: 400,
        image_height: 225,
        ..Default::default()
    }
}

/// Diffuse, glass and metal spheres resting on a large diffuse ground sphere.
pub fn three_spheres() -> SceneFile {
    let spheres = vec![
        Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, Lambertian::new(), Color::new(0.8, 0.8, 0.0)),
        Sphere::new(Vec3::new(0.0, 0.0, -1.2), 0.5, Lambertian::new(), Color::new(0.1, 0.2, 0.5)),
        Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, Dielectric::new(1.5), Color::repeat(1.0)),
        Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, Metallic::new(0.3), Color::new(0.8, 0.6, 0.2)),
    ];
    SceneFile::new(wide_camera(), RenderSettings::default(), Scene::new(spheres))
}

/// Hollow glass sphere (an air bubble inside glass) next to a mirror.
pub fn glass() -> SceneFile {
    let spheres = vec![
        Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, Lambertian::new(), Color::new(0.5, 0.5, 0.5)),
        Sphere::new(Vec3::new(-0.6, 0.0, -1.0), 0.5, Dielectric::new(1.5), Color::repeat(1.0)),
        // Inverse index models the air pocket
        Sphere::new(Vec3::new(-0.6, 0.0, -1.0), 0.4, Dielectric::new(1.0 / 1.5), Color::repeat(1.0)),
        Sphere::new(Vec3::new(0.6, 0.0, -1.0), 0.5, Metallic::new(0.0), Color::new(0.9, 0.9, 0.9)),
    ];
    let camera = CameraConfig {
        origin: Vec3::new(0.0, 0.5, 1.0),
        look_direction: Vec3::new(0.0, -0.5, -2.0),
        vertical_fov: 50.0,
        ..wide_camera()
    };
    SceneFile::new(camera, RenderSettings::default(), Scene::new(spheres))
}

/// Field of small random spheres around three large ones, seen through a defocused lens.
pub fn cover(grid: i16, seed: u64) -> SceneFile {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut spheres = vec![Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(),
        Color::new(0.5, 0.5, 0.5),
    )];

    let big_radius = 1.0;
    let big = [
        (Vec3::new(0.0, 1.0, 0.0), Material::from(Dielectric::new(1.5)), Color::repeat(1.0)),
        (Vec3::new(-4.0, 1.0, 0.0), Lambertian::new().into(), Color::new(0.4, 0.2, 0.1)),
        (Vec3::new(4.0, 1.0, 0.0), Metallic::new(0.0).into(), Color::new(0.7, 0.6, 0.5)),
    ];

    for (i, j) in (-grid..grid).cartesian_product(-grid..grid) {
        let radius = 0.2;
        let center = Vec3::new(
            i as Float + rng.gen_range(0.0..0.9),
            radius,
            j as Float + rng.gen_range(0.0..0.9),
        );

        // Don't put it too close to the big boys
        if big.iter().any(|(c, _, _)| (center - c).norm() < big_radius + radius + 0.3) {
            continue;
        }

        let choose: Float = rng.gen();
        let sphere = if choose < 0.8 {
            let albedo = Color::random(&mut rng, 0.0, 1.0).component_mul(&Color::random(&mut rng, 0.0, 1.0));
            Sphere::new(center, radius, Lambertian::new(), albedo)
        } else if choose < 0.95 {
            let albedo = Color::random(&mut rng, 0.5, 1.0);
            Sphere::new(center, radius, Metallic::new(rng.gen_range(0.0..0.5)), albedo)
        } else {
            Sphere::new(center, radius, Dielectric::new(1.5), Color::repeat(1.0))
        };
        spheres.push(sphere);
    }

    spheres.extend(
        big.into_iter()
            .map(|(center, material, tint)| Sphere::new(center, big_radius, material, tint)),
    );

    let origin = Vec3::new(13.0, 2.0, 3.0);
    let camera = CameraConfig {
        origin,
        look_direction: -origin,
        vertical_fov: 20.0,
        image_width: 600,
        image_height: 400,
        lens_radius: 0.05,
        focus_distance: 10.0,
        ..Default::default()
    };
    let render = RenderSettings {
        samples_per_pixel: 50,
        ..Default::default()
    };
    SceneFile::new(camera, render, Scene::new(spheres))
}
