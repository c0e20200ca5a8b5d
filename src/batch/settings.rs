use std::path::{Path, PathBuf};

use crate::{
    batch::naming::normalize_extension,
    foundation::{
        core::Chaos,
        error::{MutateError, MutateResult},
    },
    mutation::registry::Registry,
    raster::io::DEFAULT_JPEG_QUALITY,
};

/// How inputs and variants are scheduled.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Threading {
    pub parallel: bool,
    /// Worker count for the dedicated pool; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Everything a batch run needs besides its inputs.
///
/// Loadable from JSON; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchSettings {
    pub chaos: Chaos,
    /// Variants per input.
    pub count: u32,
    /// Operations per chain.
    pub depth: u32,
    pub output_dir: PathBuf,
    pub extension: String,
    /// Fixed seed for reproducible runs; drawn at random when unset.
    pub seed: Option<u64>,
    /// Restrict the registry to these operation names.
    pub operations: Option<Vec<String>>,
    pub threading: Threading,
    pub jpeg_quality: u8,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            chaos: Chaos::DEFAULT,
            count: 1,
            depth: 10,
            output_dir: PathBuf::from("."),
            extension: "jpg".to_owned(),
            seed: None,
            operations: None,
            threading: Threading::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl BatchSettings {
    pub fn from_json_file(path: &Path) -> MutateResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            MutateError::validation(format!("read settings '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    pub fn from_json_str(s: &str) -> MutateResult<Self> {
        serde_json::from_str(s).map_err(|e| MutateError::serde(format!("settings JSON: {e}")))
    }

    pub fn validate(&self) -> MutateResult<()> {
        normalize_extension(&self.extension)?;
        if let Some(0) = self.threading.threads {
            return Err(MutateError::validation(
                "batch threading 'threads' must be >= 1 when set",
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(MutateError::validation("jpeg quality must be within 1..=100"));
        }
        self.registry()?;
        Ok(())
    }

    /// The operation registry these settings select.
    pub fn registry(&self) -> MutateResult<Registry> {
        match &self.operations {
            Some(names) => Registry::select(names),
            None => Ok(Registry::standard()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/settings.rs"]
mod tests;
