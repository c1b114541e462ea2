//! dombind: parses browser API declarations and assembles typed interop binding
//! surfaces from them.

pub mod cli;
pub mod config;
pub mod output;
pub mod utils;
pub mod version;

pub use dombind_ast as ast;
pub use dombind_index as index;
pub use dombind_lexer as lexer;
pub use dombind_parser as parser;
pub use dombind_resolver as resolver;
pub use dombind_span as span;
pub use dombind_typemap as typemap;
pub use dombind_utils as diagnostics;
