use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use crate::foundation::error::{MutateError, MutateResult};

/// Base name of `path` without directories or its final extension.
pub fn input_stem(path: &Path) -> MutateResult<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            MutateError::validation(format!("input '{}' has no file name", path.display()))
        })
}

/// Output extension without a leading dot, lowercased.
pub fn normalize_extension(ext: &str) -> MutateResult<String> {
    let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(MutateError::validation(format!(
            "output extension '{ext}' must be a non-empty alphanumeric suffix"
        )));
    }
    Ok(ext)
}

pub fn variant_file_name(stem: &str, index: u32, ext: &str) -> String {
    format!("{stem}-{index}.{ext}")
}

pub fn variant_path(out_dir: &Path, stem: &str, index: u32, ext: &str) -> PathBuf {
    out_dir.join(variant_file_name(stem, index, ext))
}

/// One output stem per input, made unique so no two inputs share an output name.
///
/// The first input with a given stem keeps it; later ones get `_1`, `_2`, ...
/// An input without a usable name gets its own error and reserves nothing.
pub fn unique_stems(inputs: &[PathBuf]) -> Vec<MutateResult<String>> {
    let mut used: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, u32> = HashMap::new();
    let mut out = Vec::with_capacity(inputs.len());
    for path in inputs {
        let stem = match input_stem(path) {
            Ok(stem) => stem,
            Err(e) => {
                out.push(Err(e));
                continue;
            }
        };
        let mut candidate = stem.clone();
        while used.contains(&candidate) {
            let n = suffixes.entry(stem.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{stem}_{n}");
        }
        used.insert(candidate.clone());
        out.push(Ok(candidate));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/batch/naming.rs"]
mod tests;
