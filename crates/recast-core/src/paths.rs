//! Output path derivation
//!
//! Each source file is converted into a sibling file next to it. The sibling
//! keeps the source's directory and stem and gets a `.js` extension, unless
//! the stem itself already ends in `jsx`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension appended to converted files
pub const OUTPUT_EXTENSION: &str = "js";

/// Stem suffix that suppresses the output extension
const JSX_SUFFIX: &str = "jsx";

/// Compute the output path for a source file.
///
/// The source extension is stripped first. Only when the remaining stem ends
/// with `jsx` is it used as-is; otherwise `.js` is appended. Note that
/// `foo.jsx` strips to `foo` and therefore becomes `foo.js`, while
/// `thing.jsx.jsx` strips to `thing.jsx` and stays `thing.jsx`.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use recast_core::output_path;
///
/// assert_eq!(output_path(Path::new("src/app.coffee")), Path::new("src/app.js"));
/// assert_eq!(output_path(Path::new("src/view.jsx.cjsx")), Path::new("src/view.jsx"));
/// ```
pub fn output_path(source: &Path) -> PathBuf {
    let dir = source.parent().unwrap_or(Path::new(""));
    let stem = source.file_stem().unwrap_or_default();

    let mut name = OsString::from(stem);
    if !stem.to_string_lossy().ends_with(JSX_SUFFIX) {
        name.push(".");
        name.push(OUTPUT_EXTENSION);
    }

    dir.join(name)
}

/// A single source file scheduled for conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathJob {
    /// Position of this path in the batch
    pub index: usize,

    /// File being converted
    pub source_path: PathBuf,

    /// Sibling file the converted text is written to
    pub output_path: PathBuf,
}

impl PathJob {
    /// Create a job for the path at `index`, deriving its output path
    pub fn new(index: usize, source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let output_path = output_path(&source_path);
        Self {
            index,
            source_path,
            output_path,
        }
    }
}
