use std::str::FromStr;

use fearless_simd::Level;

use crate::blend::{scalar, wide};
use crate::effects::halo::{Halo, add_halo_scalar, add_halo_wide_with_level};
use crate::foundation::core::{PixelImage, PlacedImage};
use crate::foundation::error::{BlendError, BlendResult};

/// Available compositing kernels.
///
/// Both kernels honor the same contract. Region blends produce identical bytes; halos may differ
/// by one alpha step per pixel.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    /// Reference per-pixel kernel.
    Scalar,
    /// Block kernel, 16 pixels per step with a scalar tail.
    #[default]
    Wide,
}

impl KernelKind {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            KernelKind::Scalar => "scalar",
            KernelKind::Wide => "wide",
        }
    }
}

impl std::fmt::Display for KernelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelKind {
    type Err = BlendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "simple" => Ok(KernelKind::Scalar),
            "wide" | "simd" | "optimized" => Ok(KernelKind::Wide),
            _ => Err(BlendError::invalid_argument(format!(
                "unknown kernel '{s}' (expected scalar or wide)"
            ))),
        }
    }
}

/// One compositing strategy: region blend plus halo synthesis.
pub trait Compositor {
    /// Which kernel this is.
    fn kind(&self) -> KernelKind;

    /// Composite `foreground` onto `background` in place. All-or-nothing.
    fn blend_region(
        &self,
        background: &mut PixelImage,
        foreground: &PlacedImage<'_>,
    ) -> BlendResult<()>;

    /// Add a glow to `background` in place. All-or-nothing.
    fn add_halo(&self, background: &mut PixelImage, halo: &Halo) -> BlendResult<()>;
}

/// Per-pixel reference kernel.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarCompositor;

impl Compositor for ScalarCompositor {
    fn kind(&self) -> KernelKind {
        KernelKind::Scalar
    }

    fn blend_region(
        &self,
        background: &mut PixelImage,
        foreground: &PlacedImage<'_>,
    ) -> BlendResult<()> {
        scalar::blend_region(background, foreground)
    }

    fn add_halo(&self, background: &mut PixelImage, halo: &Halo) -> BlendResult<()> {
        add_halo_scalar(background, halo)
    }
}

/// Block kernel, bound to one SIMD level.
#[derive(Clone, Copy, Debug)]
pub struct WideCompositor {
    level: Level,
}

impl WideCompositor {
    /// Kernel for the best SIMD level the running CPU supports.
    pub fn new() -> Self {
        Self::with_level(Level::new())
    }

    /// Kernel pinned to `level`. [`Level::fallback`] runs the same lanes without target features.
    pub fn with_level(level: Level) -> Self {
        Self { level }
    }

    /// The SIMD level every call runs at.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for WideCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor for WideCompositor {
    fn kind(&self) -> KernelKind {
        KernelKind::Wide
    }

    fn blend_region(
        &self,
        background: &mut PixelImage,
        foreground: &PlacedImage<'_>,
    ) -> BlendResult<()> {
        wide::blend_region_with_level(self.level, background, foreground)
    }

    fn add_halo(&self, background: &mut PixelImage, halo: &Halo) -> BlendResult<()> {
        add_halo_wide_with_level(self.level, background, halo)
    }
}

/// Create the compositor for `kind`.
pub fn create_compositor(kind: KernelKind) -> Box<dyn Compositor> {
    match kind {
        KernelKind::Scalar => Box::new(ScalarCompositor),
        KernelKind::Wide => Box::new(WideCompositor::new()),
    }
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
