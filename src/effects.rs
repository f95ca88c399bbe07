//! Procedural effects composited through the blend kernels.

pub mod halo;
