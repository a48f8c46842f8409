use std::path::{Path, PathBuf};

use plc_config::Config;

/// Configuration together with the directory it was loaded from.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn load(dir: Option<&Path>) -> Self {
        let root = dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let config = plc_config::load_config(Some(&root));
        Self { root, config }
    }

    /// Resolves a configured path against the project directory.
    pub fn path(&self, configured: &Path) -> PathBuf {
        self.root.join(configured)
    }
}
