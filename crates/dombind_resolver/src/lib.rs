//! Dependent type resolution, purity classification and binding surface
//! assembly over a [`DeclarationSource`](dombind_index::DeclarationSource).

pub mod classify;
pub mod error;
pub mod graph;
pub mod surface;

pub use classify::{DEFAULT_BRIDGE_NAMESPACE, PurityClassifier, camel_case, classify};
pub use error::ResolveError;
pub use graph::{DependentTypeGraph, ResolveOptions, resolve, resolve_with};
pub use surface::{
    BindingRequest, BindingSurface, SurfaceCallback, SurfaceInterface, SurfaceMethod,
    SurfaceParameter, SurfaceProperty,
};
