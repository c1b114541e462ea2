//! Declaration corpora: where declaration text comes from, the name index built
//! over it, and a registry that builds each index once.

pub mod error;
pub mod index;
pub mod loader;
pub mod registry;
pub mod source;

pub use error::CorpusError;
pub use index::{DeclarationIndex, DeclarationSource};
pub use loader::{CorpusLoader, DefaultCorpusLoader, EMBEDDED_CORPUS};
pub use registry::CorpusRegistry;
pub use source::{CorpusSource, SourceKey};
