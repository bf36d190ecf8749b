//! Engine configuration.
//!
//! [`EngineConfig`] carries the filesystem locations the distance engine
//! needs (currently the root of the tabulated-distance store). It is handed
//! to a model when the model is built, so two models in the same process
//! may read their tables from different places.

use std::path::{Path, PathBuf};

/// Environment variable consulted by [`EngineConfig::default`].
pub const TABLE_DIR_ENV: &str = "COSMODIST_TABLE_DIR";

/// Sub-directory of the table root holding comoving-distance tables.
pub const COMOVING_TABLE_SUBDIR: &str = "table_dc";

/// Configuration shared by the models built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    table_dir: PathBuf,
}

impl EngineConfig {
    /// Create a configuration rooted at `table_dir`.
    pub fn new(table_dir: impl Into<PathBuf>) -> Self {
        Self {
            table_dir: table_dir.into(),
        }
    }

    /// Replace the table root.
    pub fn with_table_dir(mut self, table_dir: impl Into<PathBuf>) -> Self {
        self.table_dir = table_dir.into();
        self
    }

    /// Root of the tabulated-distance store.
    pub fn table_dir(&self) -> &Path {
        &self.table_dir
    }

    /// Full path of a comoving-distance table file named `file_name`.
    pub fn comoving_table_path(&self, file_name: &str) -> PathBuf {
        self.table_dir.join(COMOVING_TABLE_SUBDIR).join(file_name)
    }
}

impl Default for EngineConfig {
    /// Reads [`TABLE_DIR_ENV`], falling back to `./tables`.
    fn default() -> Self {
        let dir = std::env::var_os(TABLE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("tables"));
        Self::new(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comoving_table_path_layout() {
        let cfg = EngineConfig::new("/data/cosmo");
        assert_eq!(
            cfg.comoving_table_path("LCDM-wmap7-comovingdist.dat"),
            PathBuf::from("/data/cosmo/table_dc/LCDM-wmap7-comovingdist.dat")
        );
    }

    #[test]
    fn with_table_dir_replaces_root() {
        let cfg = EngineConfig::new("a").with_table_dir("b");
        assert_eq!(cfg.table_dir(), Path::new("b"));
    }
}
