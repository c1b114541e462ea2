//! `dombind.toml` loading.
//!
//! Lookup order: an explicit `--config` path, `./dombind.toml`, then
//! `dombind.toml` in the platform config directory. A missing file means
//! defaults; `DOMBIND_CORPUS` overrides the configured corpus source.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use dombind_index::CorpusSource;
use dombind_resolver::BindingRequest;
use dombind_typemap::TypeMapper;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::output::OutputFormat;

pub const CONFIG_FILE: &str = "dombind.toml";
pub const CORPUS_ENV: &str = "DOMBIND_CORPUS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub bridge: BridgeConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
    /// Extra declared-type -> target-type entries layered over the built-in table.
    pub type_map: BTreeMap<String, String>,
    #[serde(rename = "binding")]
    pub bindings: Vec<BindingRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub source: CorpusSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub namespace: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            namespace: dombind_resolver::DEFAULT_BRIDGE_NAMESPACE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            dir: PathBuf::from("bindings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid dombind configuration")
    }

    pub fn read_from_toml(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Loads the first config found, or defaults. An explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                Self::read_from_toml(path)?
            }
            None => match discover() {
                Some(path) => {
                    debug!(config = %path.display(), "using discovered config");
                    Self::read_from_toml(&path)?
                }
                None => Self::default(),
            },
        };
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = env::var(CORPUS_ENV) {
            self.corpus.source = value
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {CORPUS_ENV}"))?;
        }
        Ok(())
    }

    pub fn type_mapper(&self) -> TypeMapper {
        TypeMapper::new().with_overrides(&self.type_map)
    }

    /// A binding request with the configured bridge namespace filled in.
    pub fn request_for(&self, request: &BindingRequest) -> BindingRequest {
        let mut request = request.clone();
        if request.namespace.is_none() {
            request.namespace = Some(self.bridge.namespace.clone());
        }
        request
    }
}

fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    ProjectDirs::from("", "", "dombind")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_section() {
        let config = Config::from_toml(
            r#"
[corpus]
source = "https://example.com/lib.dom.d.ts"

[bridge]
namespace = "blazorators"

[output]
format = "yaml"
dir = "generated"

[log]
level = "debug"

[type_map]
"DOMHighResTimeStamp" = "TimeSpan"

[[binding]]
type = "Geolocation"
implementation = "window.navigator.geolocation"

[[binding]]
type = "Storage"
only_pure = true
"#,
        )
        .expect("config parses");

        assert_eq!(
            config.corpus.source,
            CorpusSource::Url("https://example.com/lib.dom.d.ts".into())
        );
        assert_eq!(config.bridge.namespace, "blazorators");
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert_eq!(config.output.dir, PathBuf::from("generated"));
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.bindings.len(), 2);
        assert!(config.bindings[1].only_pure);
        assert_eq!(config.type_mapper().map("DOMHighResTimeStamp"), "TimeSpan");

        let request = config.request_for(&config.bindings[0]);
        assert_eq!(request.namespace.as_deref(), Some("blazorators"));
    }

    #[test]
    fn empty_config_means_defaults() {
        let config = Config::from_toml("").expect("empty config parses");
        assert_eq!(config, Config::default());
        assert_eq!(config.corpus.source, CorpusSource::Embedded);
        assert_eq!(config.bridge.namespace, "dombind");
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(Config::from_toml("[surprise]\nvalue = 1").is_err());
    }
}
