//! Diagnostics rendering, logging setup and name suggestions shared by the
//! dombind crates.

pub mod errors;
pub mod logger;
pub mod suggest;

pub use errors::{Diagnostic, DiagnosticSeverity, emit_diagnostics, render_diagnostics};
pub use logger::init_logging;
pub use suggest::find_best_match;
