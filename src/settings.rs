use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_SUMMARY_CSV: &str = "resumo_lattes.csv";
pub const DEFAULT_MISSING_NAME: &str = "[Sem nome]";

/// Runtime settings: built-in defaults, then `lattes.toml` if present,
/// then `LATTES_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub summary_csv: PathBuf,
    pub missing_name_label: String,
    pub progress: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::build(File::with_name("lattes").required(false), Environment::with_prefix("LATTES"))
    }

    fn build(file: File<config::FileSourceFile, config::FileFormat>, env: Environment) -> Result<Self> {
        Config::builder()
            .set_default("summary_csv", DEFAULT_SUMMARY_CSV)?
            .set_default("missing_name_label", DEFAULT_MISSING_NAME)?
            .set_default("progress", true)?
            .add_source(file)
            .add_source(env)
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}
