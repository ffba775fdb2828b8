//! Build configuration.
//!
//! A `jsduck-dts.toml` file lists one `[[target]]` per documented library
//! version:
//!
//! ```toml
//! [[target]]
//! name = "extjs-4.2.5"
//! docs = "docs/4.2.5/output"
//! doc_url = "http://docs.sencha.com/extjs/4.2.5/#!/api/"
//! output = "build/extjs-4.2.5.d.ts"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::jsduck::RegistryOptions;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "jsduck-dts.toml";

/// One documentation export to turn into a declaration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    pub name: String,
    /// Directory of JSON class records.
    pub docs: PathBuf,
    #[serde(default)]
    pub doc_url: String,
    /// Declaration file to write.
    pub output: PathBuf,
    /// Overrides the default file-name prefix.
    #[serde(default)]
    pub prefix: Option<String>,
}

impl Target {
    pub fn registry_options(&self) -> RegistryOptions {
        let mut options = RegistryOptions::default();
        if let Some(prefix) = &self.prefix {
            options.prefix.clone_from(prefix);
        }
        options
    }
}

/// Parsed `jsduck-dts.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default, rename = "target")]
    pub targets: Vec<Target>,
}

impl BuildConfig {
    /// Read and validate a config file, resolving its paths.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&contents, base_dir).map_err(|reason| Error::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse config text, resolving relative paths against `base_dir`.
    pub fn parse(contents: &str, base_dir: &Path) -> std::result::Result<Self, String> {
        let mut config: Self =
            toml::from_str(contents).map_err(|err| format!("Failed to parse config: {err}"))?;

        if config.targets.is_empty() {
            return Err("no [[target]] tables defined".to_string());
        }
        let mut names = HashSet::new();
        for target in &mut config.targets {
            if !names.insert(target.name.clone()) {
                return Err(format!("duplicate target name '{}'", target.name));
            }
            target.docs = base_dir.join(&target.docs);
            target.output = base_dir.join(&target.output);
        }
        Ok(config)
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|target| target.name == name)
    }
}
