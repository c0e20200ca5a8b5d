//! mutate produces randomized variants of images for dataset augmentation.
//!
//! Each variant is a chain of operations picked at random from a [`Registry`]
//! and applied with chaos-scaled parameters:
//!
//! - [`MutationExecutor`] runs one chain on a private copy of the source
//! - [`reconcile`] crops shrunken results back toward the original size
//! - [`BatchController`] fans inputs and variants out and writes the results
#![forbid(unsafe_code)]

mod foundation;

/// Batch orchestration, output naming, settings, and the image store seam.
pub mod batch;
/// The image-handle capability the engine drives.
pub mod canvas;
/// Operations, sampling, chain execution, and dimension reconciliation.
pub mod mutation;
/// RGBA8 raster backend and filesystem store.
pub mod raster;

pub use crate::foundation::core::{Chaos, Dims};
pub use crate::foundation::error::{MutateError, MutateResult};

pub use crate::batch::controller::{
    BatchController, BatchReport, InputReport, StepReport, VariantReport,
};
pub use crate::batch::settings::{BatchSettings, Threading};
pub use crate::batch::store::ImageStore;
pub use crate::canvas::{Canvas, Transform, TransformError};
pub use crate::mutation::executor::{ChainResult, ChainStep, MutationExecutor};
pub use crate::mutation::operation::Operation;
pub use crate::mutation::reconcile::reconcile;
pub use crate::mutation::registry::Registry;
pub use crate::mutation::sampler::{Bounds, RngSampler, Sampler};
pub use crate::raster::RasterImage;
pub use crate::raster::io::FsImageStore;
