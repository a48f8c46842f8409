use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "plc.toml";

/// Artifact locations and stage settings of a project.
///
/// Artifact paths are relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ast: PathBuf,
    pub annotated_ast: PathBuf,
    pub symbol_table: PathBuf,
    pub semantic_errors: PathBuf,
    pub program: PathBuf,
    pub target: String,
    pub symbol_buckets: usize,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl From<RawConfig> for Config {
    fn from(raw_config: RawConfig) -> Self {
        let defaults = Config::default();

        Self {
            ast: raw_config.ast.map(Into::into).unwrap_or(defaults.ast),
            annotated_ast: raw_config
                .annotated_ast
                .map(Into::into)
                .unwrap_or(defaults.annotated_ast),
            symbol_table: raw_config
                .symbol_table
                .map(Into::into)
                .unwrap_or(defaults.symbol_table),
            semantic_errors: raw_config
                .semantic_errors
                .map(Into::into)
                .unwrap_or(defaults.semantic_errors),
            program: raw_config.program.map(Into::into).unwrap_or(defaults.program),
            target: raw_config.target.unwrap_or(defaults.target),
            symbol_buckets: raw_config
                .symbol_buckets
                .filter(|buckets| *buckets > 0)
                .unwrap_or(defaults.symbol_buckets),
            log_filter: raw_config.log_filter.unwrap_or(defaults.log_filter),
            log_file: raw_config.log_file.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawConfig {
    ast: Option<String>,
    annotated_ast: Option<String>,
    symbol_table: Option<String>,
    semantic_errors: Option<String>,
    program: Option<String>,
    target: Option<String>,
    symbol_buckets: Option<usize>,
    log_filter: Option<String>,
    log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ast: "ast.txt".into(),
            annotated_ast: "annotated_ast.txt".into(),
            symbol_table: "symbol_table.txt".into(),
            semantic_errors: "semantic_errors.txt".into(),
            program: "program.s".into(),
            target: "x86_64".into(),
            symbol_buckets: 101,
            log_filter: "info".into(),
            log_file: None,
        }
    }
}

fn load_project_config<P: AsRef<Path>>(root_dir: P) -> Option<Config> {
    let config_path = root_dir.as_ref().join(CONFIG_FILE);
    if !config_path.exists() {
        return None;
    };

    let config = std::fs::read_to_string(config_path).ok()?;

    convert_from_toml(&config)
}

fn convert_from_toml(config: &str) -> Option<Config> {
    let raw_config: RawConfig = toml::from_str(config).ok()?;
    Some(raw_config.into())
}

/// Reads `plc.toml` from `root_dir`. Falls back to the defaults when there
/// is no directory, no file, or the file does not parse.
pub fn load_config<P: AsRef<Path>>(root_dir: Option<P>) -> Config {
    match root_dir {
        Some(root_dir) => load_project_config(root_dir).unwrap_or_default(),
        None => Config::default(),
    }
}
