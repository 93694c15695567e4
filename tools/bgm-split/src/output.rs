//! Output file naming and writing

use anyhow::{Context, Result};
use seqvab::SplitContainer;
use std::path::{Path, PathBuf};

/// Extension for sequence files
pub const SEQ_EXT: &str = "SEQ";

/// Extension for bank header files
pub const VH_EXT: &str = "VH";

/// Output paths derived from an input container path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    dir: PathBuf,
    stem: String,
}

impl OutputNames {
    /// Outputs go to `output_dir`, or next to the input when not given
    pub fn for_input(input: &Path, output_dir: Option<&Path>) -> Result<Self> {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Input path has no usable file name: {:?}", input))?
            .to_string();
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        Ok(Self { dir, stem })
    }

    /// Path of sequence `index` out of `count`
    ///
    /// A lone sequence is `<stem>.SEQ`; several are `<stem>_00.SEQ`,
    /// `<stem>_01.SEQ`, ...
    pub fn sequence(&self, index: usize, count: usize) -> PathBuf {
        if count == 1 {
            self.dir.join(format!("{}.{}", self.stem, SEQ_EXT))
        } else {
            self.dir.join(format!("{}_{:02}.{}", self.stem, index, SEQ_EXT))
        }
    }

    /// Path of the bank header
    pub fn vab_header(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.stem, VH_EXT))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Write every sequence and the bank header, returning the paths written
pub fn write_outputs(names: &OutputNames, split: &SplitContainer) -> Result<Vec<PathBuf>> {
    if !names.dir().as_os_str().is_empty() {
        std::fs::create_dir_all(names.dir())
            .with_context(|| format!("Failed to create output directory {:?}", names.dir()))?;
    }

    let count = split.sequences.len();
    let mut written = Vec::with_capacity(count + 1);

    for (index, seq) in split.sequences.iter().enumerate() {
        let path = names.sequence(index, count);
        std::fs::write(&path, seq).with_context(|| format!("Failed to write {:?}", path))?;
        written.push(path);
    }

    let path = names.vab_header();
    std::fs::write(&path, &split.vab_header)
        .with_context(|| format!("Failed to write {:?}", path))?;
    written.push(path);

    Ok(written)
}
