use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use dombind::index::{
    CorpusError, CorpusLoader, CorpusRegistry, CorpusSource, DeclarationSource,
    DefaultCorpusLoader,
};

struct CountingLoader {
    calls: AtomicUsize,
}

impl CorpusLoader for CountingLoader {
    fn load(&self, source: &CorpusSource) -> Result<String, CorpusError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        DefaultCorpusLoader.load(source)
    }
}

#[test]
fn embedded_corpus_contains_the_geolocation_family() -> Result<()> {
    let registry = CorpusRegistry::new();
    let index = registry.load(&CorpusSource::Embedded)?;
    for name in [
        "Geolocation",
        "PositionCallback",
        "PositionErrorCallback",
        "PositionOptions",
        "GeolocationPosition",
        "GeolocationCoordinates",
    ] {
        assert!(index.try_get_declaration(name).is_some(), "{name} not indexed");
    }
    assert!(index.try_get_alias("PermissionState").is_some());
    assert!(index.try_get_declaration("navigator").is_none());
    Ok(())
}

#[test]
fn file_corpus_is_built_once() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "interface Local {{\n    value: string;\n}}\ntype Mode = \"a\" | \"b\";")?;
    let source = CorpusSource::File(file.path().to_path_buf());

    let loader = Arc::new(CountingLoader {
        calls: AtomicUsize::new(0),
    });
    let registry = CorpusRegistry::with_loader(loader.clone());

    let first = registry.load(&source)?;
    let second = registry.load(&source)?;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.fetch_count(&source.key()), 1);
    assert_eq!(first.interface_names(), vec!["Local"]);
    Ok(())
}

#[test]
fn missing_file_degrades_to_an_empty_index() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = CorpusSource::File(dir.path().join("absent.d.ts"));
    let registry = CorpusRegistry::new();

    let (index, err) = registry.load_or_empty(&source);
    assert!(index.is_empty());
    assert!(index.try_get_declaration("Geolocation").is_none());
    let err = err.expect("load error reported");
    assert_eq!(err.key(), Some(&source.key()));
    Ok(())
}
