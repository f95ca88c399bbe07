//! JSON scene descriptions and the renderer that drives a compositor through them.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::decode::load_image;
use crate::compositor::{KernelKind, create_compositor};
use crate::effects::halo::Halo;
use crate::foundation::core::{PixelImage, PlacedImage, Position};
use crate::foundation::error::{BlendError, BlendResult};

/// One foreground image placed on the background.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForegroundConfig {
    /// Image file, relative paths resolve against the scene's base directory.
    pub path: PathBuf,
    /// Top-left corner on the background.
    #[serde(default)]
    pub pos: Position,
}

/// JSON-facing description of a composite: a background, foregrounds blended in order, then halos.
///
/// ```json
/// {
///   "background": "bg.png",
///   "foreground": [{ "path": "logo.png", "pos": { "x": 16, "y": 8 } }],
///   "halos": [{ "center": { "x": 64, "y": 64 }, "radius": 20, "color": [255, 255, 255, 128] }],
///   "kernel": "wide"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    /// Background image file.
    pub background: PathBuf,
    /// Foregrounds, blended in list order.
    #[serde(default)]
    pub foreground: Vec<ForegroundConfig>,
    /// Halos, applied in list order after every foreground.
    #[serde(default)]
    pub halos: Vec<Halo>,
    /// Kernel used for every operation in the scene.
    #[serde(default)]
    pub kernel: KernelKind,
}

impl SceneConfig {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BlendResult<Self> {
        serde_json::from_reader(r).map_err(|e| BlendError::config(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON string.
    pub fn from_json_str(s: &str) -> BlendResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BlendResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BlendError::config(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject scenes that cannot possibly render. Bounds are checked at render time, once image
    /// sizes are known.
    pub fn validate(&self) -> BlendResult<()> {
        if self.background.as_os_str().is_empty() {
            return Err(BlendError::config("background path must not be empty"));
        }
        for (i, fg) in self.foreground.iter().enumerate() {
            if fg.path.as_os_str().is_empty() {
                return Err(BlendError::config(format!(
                    "foreground[{i}] path must not be empty"
                )));
            }
        }
        Ok(())
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Load every image named by `config` and composite the scene.
///
/// Foregrounds are blended in order, then halos are added in order. The first failing step aborts
/// the render; the returned error names the step.
#[tracing::instrument(level = "debug", skip_all, fields(kernel = %config.kernel))]
pub fn render_scene(config: &SceneConfig, base_dir: &Path) -> BlendResult<PixelImage> {
    config.validate()?;
    let compositor = create_compositor(config.kernel);

    let mut canvas = load_image(&resolve(base_dir, &config.background))?;

    for (i, fg) in config.foreground.iter().enumerate() {
        let img = load_image(&resolve(base_dir, &fg.path))?;
        compositor
            .blend_region(&mut canvas, &PlacedImage::new(&img, fg.pos))
            .map_err(|e| step_error(e, format!("foreground[{i}] '{}'", fg.path.display())))?;
    }

    for (i, halo) in config.halos.iter().enumerate() {
        compositor
            .add_halo(&mut canvas, halo)
            .map_err(|e| step_error(e, format!("halos[{i}]")))?;
    }

    tracing::debug!(
        width = canvas.width(),
        height = canvas.height(),
        foregrounds = config.foreground.len(),
        halos = config.halos.len(),
        "scene rendered"
    );
    Ok(canvas)
}

fn step_error(err: BlendError, step: String) -> BlendError {
    match err {
        BlendError::InvalidArgument(msg) => BlendError::InvalidArgument(format!("{step}: {msg}")),
        BlendError::OutOfBounds(msg) => BlendError::OutOfBounds(format!("{step}: {msg}")),
        BlendError::Config(msg) => BlendError::Config(format!("{step}: {msg}")),
        BlendError::Other(e) => BlendError::Other(e.context(step)),
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
