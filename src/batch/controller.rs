use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{
    batch::{
        naming::{normalize_extension, unique_stems, variant_path},
        settings::BatchSettings,
        store::{ImageStore, ensure_output_dir},
    },
    canvas::{Canvas, Transform},
    foundation::{
        core::{Chaos, Dims},
        error::{MutateError, MutateResult},
    },
    mutation::{
        executor::{ChainResult, MutationExecutor},
        reconcile::reconcile,
        registry::Registry,
        sampler::RngSampler,
    },
};

/// One attempted operation as it appears in a report.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StepReport {
    pub op: String,
    pub transform: Transform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    fn from_chain(chain: &ChainResult) -> Vec<Self> {
        chain
            .steps
            .iter()
            .map(|s| Self {
                op: s.op.to_owned(),
                transform: s.transform.clone(),
                error_code: s.outcome.as_ref().err().map(|e| e.code()),
                error: s.outcome.as_ref().err().map(|e| e.to_string()),
            })
            .collect()
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VariantReport {
    pub input: PathBuf,
    /// Output name without extension: `<stem>-<index>`.
    pub name: String,
    pub index: u32,
    pub output: PathBuf,
    pub steps: Vec<StepReport>,
    /// Whether the dimension reconciler cropped the result.
    pub reconciled: bool,
    pub dims: Dims,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_error: Option<String>,
}

impl VariantReport {
    /// True when every planned operation ran.
    pub fn chain_complete(&self) -> bool {
        self.steps.iter().all(StepReport::succeeded)
    }

    pub fn written(&self) -> bool {
        self.write_error.is_none()
    }
}

/// `cat-0: blur, wave [error 1: wave length must be > 0]`
impl std::fmt::Display for VariantReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.name)?;
        for (i, step) in self.steps.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            f.write_str(&step.op)?;
            if let (Some(code), Some(msg)) = (step.error_code, &step.error) {
                write!(f, " [error {code}: {msg}]")?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct InputReport {
    pub input: PathBuf,
    pub stem: String,
    /// Dimensions as loaded; absent when loading failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dims: Option<Dims>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    pub variants: Vec<VariantReport>,
}

impl InputReport {
    pub fn loaded(&self) -> bool {
        self.load_error.is_none()
    }
}

/// Outcome of a whole batch, serializable as the `--report` document.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BatchReport {
    pub seed: u64,
    pub chaos: Chaos,
    pub count: u32,
    pub depth: u32,
    pub inputs: Vec<InputReport>,
}

impl BatchReport {
    pub fn variants(&self) -> impl Iterator<Item = &VariantReport> {
        self.inputs.iter().flat_map(|i| i.variants.iter())
    }

    pub fn written(&self) -> usize {
        self.variants().filter(|v| v.written()).count()
    }

    pub fn failed_inputs(&self) -> usize {
        self.inputs.iter().filter(|i| !i.loaded()).count()
    }

    pub fn aborted_chains(&self) -> usize {
        self.variants().filter(|v| !v.chain_complete()).count()
    }

    pub fn write_failures(&self) -> usize {
        self.variants().filter(|v| !v.written()).count()
    }

    pub fn to_json_pretty(&self) -> MutateResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MutateError::serde(e.to_string()))
    }
}

/// Drives executor, reconciler, and store over every input and variant.
#[derive(Clone, Debug)]
pub struct BatchController {
    registry: Registry,
    settings: BatchSettings,
    extension: String,
    seed: u64,
}

impl BatchController {
    /// Validates `settings` and fixes the run seed, drawing one when unset.
    pub fn new(settings: BatchSettings) -> MutateResult<Self> {
        settings.validate()?;
        let registry = settings.registry()?;
        let extension = normalize_extension(&settings.extension)?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        Ok(Self {
            registry,
            settings,
            extension,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutate every input `count` times, writing each variant as it finishes.
    ///
    /// Only an unusable output directory (checked before anything is loaded)
    /// or a thread-pool failure aborts the batch. Load, operation, and write
    /// failures are recorded in the report. `on_variant` runs once per variant,
    /// from worker threads in parallel mode.
    #[tracing::instrument(skip_all, fields(inputs = inputs.len(), seed = self.seed))]
    pub fn run<S, F>(&self, inputs: &[PathBuf], store: &S, on_variant: F) -> MutateResult<BatchReport>
    where
        S: ImageStore,
        F: Fn(&VariantReport) + Sync,
    {
        ensure_output_dir(&self.settings.output_dir)?;
        let stems = unique_stems(inputs);
        let threading = &self.settings.threading;

        let reports = if threading.parallel {
            let pool = build_thread_pool(threading.threads)?;
            pool.install(|| {
                inputs
                    .par_iter()
                    .zip(stems.par_iter())
                    .enumerate()
                    .map(|(idx, (path, stem))| {
                        self.process_input(store, idx, path, stem, true, &on_variant)
                    })
                    .collect::<Vec<_>>()
            })
        } else {
            inputs
                .iter()
                .zip(stems.iter())
                .enumerate()
                .map(|(idx, (path, stem))| {
                    self.process_input(store, idx, path, stem, false, &on_variant)
                })
                .collect()
        };

        let report = BatchReport {
            seed: self.seed,
            chaos: self.settings.chaos,
            count: self.settings.count,
            depth: self.settings.depth,
            inputs: reports,
        };
        tracing::info!(
            written = report.written(),
            failed_inputs = report.failed_inputs(),
            aborted_chains = report.aborted_chains(),
            "batch finished"
        );
        Ok(report)
    }

    fn process_input<S, F>(
        &self,
        store: &S,
        idx: usize,
        path: &Path,
        stem: &MutateResult<String>,
        parallel: bool,
        on_variant: &F,
    ) -> InputReport
    where
        S: ImageStore,
        F: Fn(&VariantReport) + Sync,
    {
        let skip = |stem: &str, e: &MutateError| {
            tracing::warn!(input = %path.display(), error = %e, "skipping input");
            InputReport {
                input: path.to_path_buf(),
                stem: stem.to_owned(),
                dims: None,
                load_error: Some(e.to_string()),
                variants: Vec::new(),
            }
        };
        let stem = match stem {
            Ok(stem) => stem.as_str(),
            Err(e) => return skip("", e),
        };
        let source = match store.load(path) {
            Ok(img) => img,
            Err(e) => return skip(stem, &e),
        };
        let original = source.dims();
        tracing::debug!(input = %path.display(), dims = %original, "loaded");

        let run_one = |variant: u32| {
            let report = self.process_variant(store, &source, idx, variant, path, stem);
            on_variant(&report);
            report
        };
        let variants: Vec<VariantReport> = if parallel {
            (0..self.settings.count).into_par_iter().map(run_one).collect()
        } else {
            (0..self.settings.count).map(run_one).collect()
        };

        InputReport {
            input: path.to_path_buf(),
            stem: stem.to_owned(),
            dims: Some(original),
            load_error: None,
            variants,
        }
    }

    fn process_variant<S: ImageStore>(
        &self,
        store: &S,
        source: &S::Image,
        idx: usize,
        variant: u32,
        path: &Path,
        stem: &str,
    ) -> VariantReport {
        let mut sampler = RngSampler::for_variant(self.seed, idx, variant);
        let executor = MutationExecutor::new(&self.registry, self.settings.chaos);
        let name = format!("{stem}-{variant}");
        let (mut image, chain) = executor.run_with(
            source,
            self.settings.depth as usize,
            &mut sampler,
            |i, step| {
                if step.succeeded() {
                    tracing::info!(variant = %name, step = i, op = step.op, "applied");
                }
            },
        );
        let reconciled = reconcile(source.dims(), &mut image);

        let output = variant_path(&self.settings.output_dir, stem, variant, &self.extension);
        let write_error = match store.write(&image, &output) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(output = %output.display(), error = %e, "variant not written");
                Some(e.to_string())
            }
        };

        let report = VariantReport {
            input: path.to_path_buf(),
            name,
            index: variant,
            output,
            steps: StepReport::from_chain(&chain),
            reconciled,
            dims: image.dims(),
            write_error,
        };
        tracing::info!(variant = %report.name, ops = %chain, "variant done");
        report
    }
}

fn build_thread_pool(threads: Option<usize>) -> MutateResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MutateError::validation(
            "batch threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MutateError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/controller.rs"]
mod tests;
