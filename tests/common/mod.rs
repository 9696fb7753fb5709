#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Path for a database file under the workspace (not created yet).
    pub fn db_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// Minimal two-country World Bank sample: 2 identifier rows x 3 year
/// columns, with one empty value cell.
pub const WORLD_BANK_SAMPLE: &str = "\
Data Source,World Development Indicators\n\
Last Updated Date,2024-06-28\n\
\n\
\n\
Country Name,Country Code,Indicator Name,Indicator Code,1960,1961,1962\n\
Aruba,ABW,\"Life expectancy at birth, total (years)\",SP.DYN.LE00.IN,64.049,64.215,\n\
Afghanistan,AFG,\"Life expectancy at birth, total (years)\",SP.DYN.LE00.IN,32.799,33.272,33.743\n";
