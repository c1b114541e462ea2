use dombind_ast::{
    AliasDescriptor, CallSignature, InterfaceDescriptor, JavaScriptMethodDescriptor,
    MethodDescriptor, ParameterDescriptor, PropertyDescriptor,
};
use dombind_index::DeclarationSource;
use dombind_typemap::TypeMapper;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::classify::{PurityClassifier, camel_case};
use crate::error::ResolveError;
use crate::graph::{DependentTypeGraph, ResolveOptions, resolve_with};

/// One binding to generate: the root interface and how it is reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingRequest {
    #[serde(rename = "type")]
    pub type_name: String,
    /// JavaScript path from `window`, e.g. `window.navigator.geolocation`.
    pub implementation: Option<String>,
    /// Leave impure methods out of the root interface.
    pub only_pure: bool,
    pub pure_overrides: Vec<String>,
    /// Bridge namespace for impure methods; the classifier default when unset.
    pub namespace: Option<String>,
    #[serde(flatten)]
    pub resolve: ResolveOptions,
}

impl BindingRequest {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn implementation_path(&self) -> String {
        self.implementation
            .clone()
            .unwrap_or_else(|| format!("window.{}", camel_case(&self.type_name)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceProperty {
    pub name: String,
    pub declared_type: String,
    pub target_type: String,
    pub is_nullable: bool,
    pub is_readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceParameter {
    pub name: String,
    pub declared_type: String,
    pub target_type: String,
    pub is_nullable: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_variadic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_callback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceMethod {
    pub name: String,
    pub parameters: Vec<SurfaceParameter>,
    pub declared_return_type: String,
    pub return_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javascript: Option<JavaScriptMethodDescriptor>,
}

impl SurfaceMethod {
    pub fn is_pure(&self) -> Option<bool> {
        self.javascript.as_ref().map(JavaScriptMethodDescriptor::is_pure)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceCallback {
    pub parameters: Vec<SurfaceParameter>,
    pub return_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceInterface {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub is_root: bool,
    pub properties: Vec<SurfaceProperty>,
    pub methods: Vec<SurfaceMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<SurfaceCallback>,
}

impl SurfaceInterface {
    pub fn method(&self, name: &str) -> Option<&SurfaceMethod> {
        self.methods
            .iter()
            .find(|method| method.name.eq_ignore_ascii_case(name))
    }

    pub fn property(&self, name: &str) -> Option<&SurfaceProperty> {
        self.properties
            .iter()
            .find(|property| property.name.eq_ignore_ascii_case(name))
    }
}

/// Everything needed to emit one binding: the root and its dependents with
/// target types applied, plus aliases and names that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSurface {
    pub type_name: String,
    pub implementation: String,
    pub interfaces: Vec<SurfaceInterface>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<AliasDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

impl BindingSurface {
    /// Resolves, classifies and maps one request.
    pub fn assemble(
        request: &BindingRequest,
        source: &dyn DeclarationSource,
        mapper: &TypeMapper,
    ) -> Result<Self, ResolveError> {
        let span = info_span!("assemble", type_name = %request.type_name);
        let _guard = span.enter();

        let mut graph = resolve_with(&request.type_name, source, mapper, request.resolve)?;

        let mut classifier =
            PurityClassifier::new(source).with_pure_overrides(&request.pure_overrides);
        if let Some(namespace) = &request.namespace {
            classifier = classifier.with_namespace(namespace.clone());
        }
        let root = graph.root.clone();
        let impure = classifier.classify_interface(&root, &mut graph);

        if request.only_pure && impure > 0 {
            if let Some(descriptor) = graph.interfaces.get_mut(&root) {
                descriptor
                    .methods
                    .retain(|method| method.is_pure() != Some(false));
            }
            debug!(dropped = impure, "impure methods left out of the surface");
        }

        Ok(Self::from_graph(request, &graph, mapper))
    }

    fn from_graph(request: &BindingRequest, graph: &DependentTypeGraph, mapper: &TypeMapper) -> Self {
        let interfaces = graph
            .interfaces
            .values()
            .map(|descriptor| surface_interface(descriptor, descriptor.name == graph.root, graph, mapper))
            .collect();

        Self {
            type_name: graph.root.clone(),
            implementation: request.implementation_path(),
            interfaces,
            aliases: graph.aliases.values().cloned().collect(),
            unresolved: graph.unresolved.iter().cloned().collect(),
        }
    }

    pub fn root(&self) -> Option<&SurfaceInterface> {
        self.interfaces.iter().find(|interface| interface.is_root)
    }

    pub fn interface(&self, name: &str) -> Option<&SurfaceInterface> {
        self.interfaces.iter().find(|interface| interface.name == name)
    }
}

fn surface_interface(
    descriptor: &InterfaceDescriptor,
    is_root: bool,
    graph: &DependentTypeGraph,
    mapper: &TypeMapper,
) -> SurfaceInterface {
    SurfaceInterface {
        name: descriptor.name.clone(),
        extends: descriptor.extends_name().map(str::to_string),
        is_root,
        properties: descriptor
            .properties
            .iter()
            .map(|property| surface_property(property, mapper))
            .collect(),
        methods: descriptor
            .methods
            .iter()
            .map(|method| surface_method(method, graph, mapper))
            .collect(),
        callback: descriptor
            .call_signature
            .as_ref()
            .map(|call| surface_callback(call, graph, mapper)),
    }
}

fn surface_property(property: &PropertyDescriptor, mapper: &TypeMapper) -> SurfaceProperty {
    SurfaceProperty {
        name: property.name.clone(),
        declared_type: property.type_name.clone(),
        target_type: mapper.map_with_nullability(&property.type_name, property.is_nullable),
        is_nullable: property.is_nullable,
        is_readonly: property.is_readonly,
    }
}

fn surface_method(
    method: &MethodDescriptor,
    graph: &DependentTypeGraph,
    mapper: &TypeMapper,
) -> SurfaceMethod {
    let callbacks = method
        .javascript
        .as_ref()
        .map(|js| js.callback_parameters.as_slice())
        .unwrap_or_default();
    SurfaceMethod {
        name: method.name.clone(),
        parameters: method
            .parameters
            .iter()
            .map(|parameter| {
                let is_callback = callbacks.contains(&parameter.name)
                    || graph.get(&parameter.type_name).is_some_and(InterfaceDescriptor::is_callback);
                surface_parameter(parameter, is_callback, mapper)
            })
            .collect(),
        declared_return_type: method.return_type_name.clone(),
        return_type: mapper.map_with_nullability(&method.return_type_name, method.return_is_nullable),
        javascript: method.javascript.clone(),
    }
}

fn surface_callback(
    call: &CallSignature,
    graph: &DependentTypeGraph,
    mapper: &TypeMapper,
) -> SurfaceCallback {
    SurfaceCallback {
        parameters: call
            .parameters
            .iter()
            .map(|parameter| {
                let is_callback = graph
                    .get(&parameter.type_name)
                    .is_some_and(InterfaceDescriptor::is_callback);
                surface_parameter(parameter, is_callback, mapper)
            })
            .collect(),
        return_type: mapper.map(&call.return_type_name),
    }
}

fn surface_parameter(
    parameter: &ParameterDescriptor,
    is_callback: bool,
    mapper: &TypeMapper,
) -> SurfaceParameter {
    SurfaceParameter {
        name: parameter.name.clone(),
        declared_type: parameter.type_name.clone(),
        target_type: mapper.map_with_nullability(&parameter.type_name, parameter.is_nullable),
        is_nullable: parameter.is_nullable,
        is_variadic: parameter.is_variadic,
        is_callback,
    }
}
