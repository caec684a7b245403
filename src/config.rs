use crate::{
    camera::CameraConfig, error::SceneError, render::RenderSettings, scene::Scene, vec3::Float,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Everything needed to produce an image: camera, render settings and the spheres.
/// `camera` and `render` fall back to their defaults, so a plain scene document
/// is also a valid scene file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(flatten)]
    pub scene: Scene,
}

impl SceneFile {
    pub fn new(camera: CameraConfig, render: RenderSettings, scene: Scene) -> Self {
        SceneFile {
            camera,
            render,
            scene,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let file: SceneFile = serde_json::from_str(json)?;
        file.scene.validate()?;
        Ok(file)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let file = Self::from_json(&fs::read_to_string(path)?)?;
        info!("loaded {} spheres from {}", file.scene.len(), path.display());
        Ok(file)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Command-line overrides layered on top of a scene file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub gamma: Option<Float>,
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, file: &mut SceneFile) {
        if let Some(width) = self.width {
            file.camera.image_width = width;
        }
        if let Some(height) = self.height {
            file.camera.image_height = height;
        }
        if let Some(samples) = self.samples_per_pixel {
            file.render.samples_per_pixel = samples;
        }
        if let Some(depth) = self.max_depth {
            file.render.max_depth = depth;
        }
        if let Some(gamma) = self.gamma {
            file.render.gamma = gamma;
        }
        if self.seed.is_some() {
            file.render.seed = self.seed;
        }
    }
}
