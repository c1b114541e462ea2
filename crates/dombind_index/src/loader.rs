use std::fs;

use tracing::debug;

use crate::error::CorpusError;
use crate::source::CorpusSource;

/// The `lib.dom` subset compiled into the crate.
pub const EMBEDDED_CORPUS: &str = include_str!("../data/lib.dom.d.ts");

/// Fetches raw corpus text for a source.
pub trait CorpusLoader: Send + Sync {
    fn load(&self, source: &CorpusSource) -> Result<String, CorpusError>;
}

/// Reads the embedded corpus, local files, and `http(s)` URLs.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCorpusLoader;

impl CorpusLoader for DefaultCorpusLoader {
    fn load(&self, source: &CorpusSource) -> Result<String, CorpusError> {
        match source {
            CorpusSource::Embedded => Ok(EMBEDDED_CORPUS.to_string()),
            CorpusSource::File(path) => {
                debug!(path = %path.display(), "reading corpus file");
                fs::read_to_string(path).map_err(|source| CorpusError::Io {
                    path: path.clone(),
                    source,
                })
            }
            CorpusSource::Url(url) => {
                debug!(%url, "fetching corpus");
                let response = ureq::get(url).call().map_err(|err| CorpusError::Http {
                    url: url.clone(),
                    message: err.to_string(),
                })?;
                response.into_string().map_err(|err| CorpusError::Http {
                    url: url.clone(),
                    message: err.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_embedded_and_file_sources() {
        let embedded = DefaultCorpusLoader
            .load(&CorpusSource::Embedded)
            .expect("embedded corpus");
        assert!(embedded.contains("interface Geolocation"));

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "interface Local {{ a: string; }}").expect("write corpus");
        let text = DefaultCorpusLoader
            .load(&CorpusSource::File(file.path().to_path_buf()))
            .expect("file corpus");
        assert!(text.contains("interface Local"));
    }

    #[test]
    fn missing_files_are_io_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("missing.d.ts");
        let err = DefaultCorpusLoader
            .load(&CorpusSource::File(missing))
            .unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
