pub mod camera;
pub mod config;
pub mod error;
pub mod hittable;
pub mod integrator;
pub mod intersection;
pub mod material;
pub mod output;
pub mod ray;
pub mod render;
pub mod scene;
pub mod scenes;
pub mod vec3;
