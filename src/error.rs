use crate::vec3::{Color, Float, Point3, Vec3};
use thiserror::Error;

/// Failures that abort a render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("ray direction {direction:?} is not usable at surface point {point:?}")]
    NonFiniteDirection { direction: Vec3, point: Point3 },

    #[error("pixel ({x}, {y}) averaged to {color:?}, which lies outside [0, 1]")]
    ColorOutOfRange { x: u32, y: u32, color: Color },

    #[error("image of {width}x{height} needs {expected} pixels, got {actual}")]
    PixelCount {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Invalid scene content, reported with the index of the offending sphere.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("sphere {index}: radius must be positive, got {radius}")]
    NonPositiveRadius { index: usize, radius: Float },

    #[error("sphere {index}: center {center:?} is not finite")]
    NonFiniteCenter { index: usize, center: Point3 },

    #[error("sphere {index}: tint {tint:?} has channels outside [0, 1]")]
    TintOutOfRange { index: usize, tint: Color },

    #[error("sphere {index}: metallic fuzz must be non-negative, got {fuzz}")]
    NegativeFuzz { index: usize, fuzz: Float },

    #[error("sphere {index}: refractive index must be positive, got {refractive_index}")]
    NonPositiveRefractiveIndex { index: usize, refractive_index: Float },

    #[error("malformed scene description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Camera or render settings that cannot produce an image.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("image resolution must be at least 1x1, got {width}x{height}")]
    ZeroResolution { width: u32, height: u32 },

    #[error("vertical field of view must lie in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(Float),

    #[error("look direction {look:?} and up vector {up:?} do not span a plane")]
    DegenerateBasis { look: Vec3, up: Vec3 },

    #[error("focus distance must be positive, got {0}")]
    NonPositiveFocusDistance(Float),

    #[error("lens radius must be non-negative, got {0}")]
    NegativeLensRadius(Float),

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("gamma must be positive, got {0}")]
    NonPositiveGamma(Float),

    #[error("rays must start past their origin, got t_min = {0}")]
    NonPositiveRayStart(Float),

    #[error("ray parameter range {t_min}..{t_max} is empty")]
    EmptyRayRange { t_min: Float, t_max: Float },

    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("progress bar template: {0}")]
    ProgressTemplate(String),
}
