use std::collections::BTreeSet;

use dombind_ast::{AliasKind, JavaScriptMethodDescriptor, MethodDescriptor, ParameterDescriptor};
use dombind_index::DeclarationSource;
use dombind_lexer::split_top_level;
use dombind_parser::{parse_alias, parse_interface};
use dombind_typemap::is_function_type;
use tracing::{debug, trace};

use crate::graph::DependentTypeGraph;

pub const DEFAULT_BRIDGE_NAMESPACE: &str = "dombind";

/// Alias chains longer than this are not followed when looking for callbacks.
const MAX_ALIAS_DEPTH: usize = 4;

/// Decides whether methods can be invoked directly or need callback bridging.
///
/// A parameter is callback-shaped when its type is an inline function type or
/// names an interface whose only member is a call signature (directly or through
/// a union alias). Methods without callback parameters are pure.
pub struct PurityClassifier<'a> {
    source: &'a dyn DeclarationSource,
    namespace: String,
    pure_overrides: BTreeSet<String>,
}

impl<'a> PurityClassifier<'a> {
    pub fn new(source: &'a dyn DeclarationSource) -> Self {
        Self {
            source,
            namespace: DEFAULT_BRIDGE_NAMESPACE.to_string(),
            pure_overrides: BTreeSet::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Methods listed here (as `method` or `Owner.method`, any case) are always
    /// classified pure.
    pub fn with_pure_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pure_overrides
            .extend(overrides.into_iter().map(|name| name.as_ref().to_lowercase()));
        self
    }

    pub fn classify(
        &self,
        owner: &str,
        method: &MethodDescriptor,
        graph: &mut DependentTypeGraph,
    ) -> JavaScriptMethodDescriptor {
        if self.is_overridden(owner, &method.name) {
            trace!(owner, method = %method.name, "purity forced by override");
            return JavaScriptMethodDescriptor::pure(&method.name);
        }

        let callbacks: Vec<String> = method
            .parameters
            .iter()
            .filter(|parameter| self.is_callback_parameter(parameter, graph))
            .map(|parameter| parameter.name.clone())
            .collect();

        if callbacks.is_empty() {
            return JavaScriptMethodDescriptor::pure(&method.name);
        }

        let invokable = format!("{}.{}.{}", self.namespace, camel_case(owner), method.name);
        debug!(owner, method = %method.name, invokable = %invokable, "method needs callback bridging");
        JavaScriptMethodDescriptor::bridged(&method.name, invokable, callbacks)
    }

    /// Classifies every method of `owner` in place and returns how many are impure.
    pub fn classify_interface(&self, owner: &str, graph: &mut DependentTypeGraph) -> usize {
        let Some(methods) = graph
            .get(owner)
            .map(|descriptor| descriptor.methods.iter().cloned().collect::<Vec<_>>())
        else {
            return 0;
        };

        let mut impure = 0usize;
        for method in methods {
            let javascript = self.classify(owner, &method, graph);
            if !javascript.is_pure() {
                impure += 1;
            }
            if let Some(target) = graph
                .interfaces
                .get_mut(owner)
                .and_then(|descriptor| descriptor.methods.get_mut(&method.name))
            {
                target.javascript = Some(javascript);
            }
        }
        impure
    }

    fn is_overridden(&self, owner: &str, method: &str) -> bool {
        let method = method.to_lowercase();
        self.pure_overrides.contains(&method)
            || self
                .pure_overrides
                .contains(&format!("{}.{}", owner.to_lowercase(), method))
    }

    fn is_callback_parameter(
        &self,
        parameter: &ParameterDescriptor,
        graph: &mut DependentTypeGraph,
    ) -> bool {
        self.is_callback_type(&parameter.type_name, graph, 0)
    }

    fn is_callback_type(
        &self,
        type_text: &str,
        graph: &mut DependentTypeGraph,
        depth: usize,
    ) -> bool {
        if is_function_type(type_text) {
            return true;
        }
        let members = split_top_level(type_text, b'|');
        if members.len() > 1 {
            return members
                .iter()
                .any(|member| self.is_callback_type(member.text, graph, depth));
        }

        let name = type_text.trim();
        if !is_plain_name(name) {
            return false;
        }
        if let Some(descriptor) = graph.get(name) {
            return descriptor.is_callback();
        }

        if let Some(raw) = self.source.try_get_declaration(name) {
            return match parse_interface(raw) {
                Ok(descriptor) if descriptor.is_callback() => {
                    debug!(callback = %name, "callback interface added to graph");
                    graph.insert(descriptor);
                    true
                }
                _ => false,
            };
        }

        if depth >= MAX_ALIAS_DEPTH {
            return false;
        }
        let aliased = match graph.aliases.get(name) {
            Some(alias) => Some(alias.kind.clone()),
            None => self
                .source
                .try_get_alias(name)
                .and_then(|raw| parse_alias(raw).ok())
                .map(|alias| alias.kind),
        };
        match aliased {
            Some(AliasKind::Type { type_name }) => self.is_callback_type(&type_name, graph, depth + 1),
            _ => false,
        }
    }
}

/// Classifies one method with the default bridge namespace.
pub fn classify(
    owner: &str,
    method: &MethodDescriptor,
    graph: &mut DependentTypeGraph,
    source: &dyn DeclarationSource,
) -> JavaScriptMethodDescriptor {
    PurityClassifier::new(source).classify(owner, method, graph)
}

fn is_plain_name(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$')
}

/// `Geolocation` -> `geolocation`, `HTMLMediaElement` -> `hTMLMediaElement`.
pub fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use dombind_index::{DeclarationIndex, SourceKey};

    use super::*;
    use crate::graph::resolve;

    const CORPUS: &str = r#"
interface Geolocation {
    clearWatch(watchId: number): void;
    getCurrentPosition(successCallback: PositionCallback, errorCallback?: PositionErrorCallback | null, options?: PositionOptions): void;
}
interface PositionCallback {
    (position: GeolocationPosition): void;
}
interface PositionErrorCallback {
    (positionError: GeolocationPositionError): void;
}
interface PositionOptions {
    timeout?: number;
}
interface MediaQueryList {
    addListener(callback: ((this: MediaQueryList, ev: Event) => any) | null): void;
}
interface EventTarget {
    addEventListener(type: string, callback: EventListenerOrEventListenerObject | null): void;
}
interface EventListener {
    (evt: Event): void;
}
interface EventListenerObject {
    handleEvent(object: Event): void;
}
type EventListenerOrEventListenerObject = EventListener | EventListenerObject;
"#;

    fn index() -> DeclarationIndex {
        DeclarationIndex::build(SourceKey("test".into()), CORPUS)
    }

    #[test]
    fn geolocation_methods_split_into_pure_and_bridged() {
        let index = index();
        let mut graph = resolve("Geolocation", &index).expect("Geolocation resolves");
        let impure = PurityClassifier::new(&index).classify_interface("Geolocation", &mut graph);
        assert_eq!(impure, 1);

        let root = graph.root_descriptor().expect("root");
        let clear = root.methods.get("clearWatch").expect("clearWatch");
        assert_eq!(clear.is_pure(), Some(true));

        let current = root
            .methods
            .get("getCurrentPosition")
            .and_then(|m| m.javascript.clone())
            .expect("getCurrentPosition classified");
        assert_eq!(current.invokable_method_name, "dombind.geolocation.getCurrentPosition");
        assert_eq!(current.callback_parameters, vec!["successCallback", "errorCallback"]);
        for name in ["PositionCallback", "PositionErrorCallback", "PositionOptions"] {
            assert!(graph.get(name).is_some(), "{name} missing from graph");
        }
    }

    #[test]
    fn inline_function_types_and_callback_aliases_are_callbacks() {
        let index = index();
        let mut graph = resolve("MediaQueryList", &index).expect("MediaQueryList resolves");
        let method = graph
            .get("MediaQueryList")
            .and_then(|d| d.methods.get("addListener").cloned())
            .expect("addListener");
        let javascript = classify("MediaQueryList", &method, &mut graph, &index);
        assert_eq!(javascript.callback_parameters, vec!["callback"]);

        let mut graph = resolve("EventTarget", &index).expect("EventTarget resolves");
        let method = graph
            .get("EventTarget")
            .and_then(|d| d.methods.get("addEventListener").cloned())
            .expect("addEventListener");
        let javascript = classify("EventTarget", &method, &mut graph, &index);
        assert!(!javascript.is_pure());
        assert_eq!(
            javascript.invokable_method_name,
            "dombind.eventTarget.addEventListener"
        );
    }

    #[test]
    fn callback_interfaces_missing_from_the_graph_are_pulled_in() {
        let index = index();
        let mut graph = resolve("PositionOptions", &index).expect("PositionOptions resolves");
        let method = MethodDescriptor::new(
            "watch",
            vec![ParameterDescriptor::new("cb", "PositionCallback", false)],
            "void",
        );
        let javascript = classify("PositionOptions", &method, &mut graph, &index);
        assert!(!javascript.is_pure());
        assert!(graph.get("PositionCallback").is_some());
    }

    #[test]
    fn overrides_and_namespace() {
        let index = index();
        let mut graph = resolve("Geolocation", &index).expect("Geolocation resolves");
        let method = graph
            .get("Geolocation")
            .and_then(|d| d.methods.get("getCurrentPosition").cloned())
            .expect("getCurrentPosition");

        let forced = PurityClassifier::new(&index)
            .with_pure_overrides(["Geolocation.GetCurrentPosition"])
            .classify("Geolocation", &method, &mut graph);
        assert!(forced.is_pure());

        let bridged = PurityClassifier::new(&index)
            .with_namespace("blazor")
            .classify("Geolocation", &method, &mut graph);
        assert_eq!(bridged.invokable_method_name, "blazor.geolocation.getCurrentPosition");
    }

    #[test]
    fn camel_case_lowers_the_first_character() {
        assert_eq!(camel_case("Geolocation"), "geolocation");
        assert_eq!(camel_case(""), "");
    }
}
