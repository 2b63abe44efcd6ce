//! Collision-free names for data and figure exports.
//!
//! Exports are named `<stem>_point_count_<n>.<ext>` with `n` counting up from
//! 1 past any files that already exist. The paired variant keeps the data and
//! figure counters in lockstep so a human can match a data file to its figure
//! by number alone.

use std::path::{Path, PathBuf};

use thiserror::Error;

const INFIX: &str = "_point_count_";

/// Upper bound on candidate numbers before giving up.
const MAX_CANDIDATES: u32 = 999;

#[derive(Debug, Error)]
pub enum NamingError {
    #[error("no free export name for '{base}' within {MAX_CANDIDATES} candidates")]
    Exhausted { base: String },
}

fn candidate(base: &Path, ext: &str, n: u32) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.with_file_name(format!("{stem}{INFIX}{n}.{ext}"))
}

fn exhausted(base: &Path) -> NamingError {
    NamingError::Exhausted {
        base: base.display().to_string(),
    }
}

/// First non-existing `<stem>_point_count_<n>.<ext>` next to `base`.
///
/// `ext = None` means the export is disabled; no path is produced.
pub fn unique_export_path(base: &Path, ext: Option<&str>) -> Result<Option<PathBuf>, NamingError> {
    let Some(ext) = ext else {
        return Ok(None);
    };
    for n in 1..=MAX_CANDIDATES {
        let path = candidate(base, ext, n);
        if !path.exists() {
            return Ok(Some(path));
        }
    }
    Err(exhausted(base))
}

/// Non-existing name pair for a data export and a figure export.
///
/// Both candidates carry the same counter, and the counter bumps whenever
/// *either* candidate collides, so surviving pairs always match by number.
/// Identical extensions cannot be told apart and yield `(None, None)`; a
/// disabled side (`None` extension) falls back to [`unique_export_path`] for
/// the other.
pub fn paired_export_paths(
    base: &Path,
    data_ext: Option<&str>,
    figure_ext: Option<&str>,
) -> Result<(Option<PathBuf>, Option<PathBuf>), NamingError> {
    let (data_ext, figure_ext) = match (data_ext, figure_ext) {
        (Some(d), Some(f)) if d == f => return Ok((None, None)),
        (Some(d), Some(f)) => (d, f),
        (d, None) => return Ok((unique_export_path(base, d)?, None)),
        (None, f) => return Ok((None, unique_export_path(base, f)?)),
    };
    for n in 1..=MAX_CANDIDATES {
        let data = candidate(base, data_ext, n);
        let figure = candidate(base, figure_ext, n);
        if !data.exists() && !figure.exists() {
            return Ok((Some(data), Some(figure)));
        }
    }
    Err(exhausted(base))
}
