use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stable identity of a corpus: `embedded`, `file:<path>` or `url:<url>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceKey(pub Arc<str>);

impl SourceKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where declaration text comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CorpusSource {
    /// The `lib.dom` subset bundled with this crate.
    #[default]
    Embedded,
    File(PathBuf),
    Url(String),
}

impl CorpusSource {
    pub fn key(&self) -> SourceKey {
        let key = match self {
            CorpusSource::Embedded => "embedded".to_string(),
            CorpusSource::File(path) => format!("file:{}", path.display()),
            CorpusSource::Url(url) => format!("url:{url}"),
        };
        SourceKey(key.into())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, CorpusSource::Url(_))
    }
}

impl FromStr for CorpusSource {
    type Err = String;

    /// `embedded`, an `http(s)://` URL, or a file path (optionally `file:`-prefixed).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err("corpus source must not be empty".to_string());
        }
        if value.eq_ignore_ascii_case("embedded") {
            return Ok(CorpusSource::Embedded);
        }
        if value.starts_with("http://") || value.starts_with("https://") {
            return Ok(CorpusSource::Url(value.to_string()));
        }
        let path = value.strip_prefix("file:").unwrap_or(value);
        Ok(CorpusSource::File(PathBuf::from(path)))
    }
}

impl TryFrom<String> for CorpusSource {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CorpusSource> for String {
    fn from(source: CorpusSource) -> Self {
        match source {
            CorpusSource::Embedded => "embedded".to_string(),
            CorpusSource::File(path) => path.display().to_string(),
            CorpusSource::Url(url) => url,
        }
    }
}

impl fmt::Display for CorpusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(self.clone()))
    }
}
