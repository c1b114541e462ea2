use serde::Serialize;

use crate::members::{MemberMap, Named};

/// A property signature: `[readonly] name[?]: Type;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub type_name: String,
    pub is_nullable: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_readonly: bool,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_nullable,
            is_readonly: false,
        }
    }
}

impl Named for PropertyDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_name: String,
    pub is_nullable: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_variadic: bool,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_nullable,
            is_variadic: false,
        }
    }
}

/// How a method reaches the browser API from generated code.
///
/// A pure method is invoked under its own name; an impure one goes through a
/// bridge entry point that receives an object handle plus the names of the
/// callback methods to invoke on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavaScriptMethodDescriptor {
    pub api_method_name: String,
    pub invokable_method_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub callback_parameters: Vec<String>,
}

impl JavaScriptMethodDescriptor {
    pub fn pure(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            api_method_name: name.clone(),
            invokable_method_name: name,
            callback_parameters: Vec::new(),
        }
    }

    pub fn bridged(
        api_method_name: impl Into<String>,
        invokable_method_name: impl Into<String>,
        callback_parameters: Vec<String>,
    ) -> Self {
        Self {
            api_method_name: api_method_name.into(),
            invokable_method_name: invokable_method_name.into(),
            callback_parameters,
        }
    }

    pub fn is_pure(&self) -> bool {
        self.api_method_name == self.invokable_method_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type_name: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub return_is_nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javascript: Option<JavaScriptMethodDescriptor>,
}

impl MethodDescriptor {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
        return_type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type_name: return_type_name.into(),
            return_is_nullable: false,
            javascript: None,
        }
    }

    /// `None` until the method has been classified.
    pub fn is_pure(&self) -> Option<bool> {
        self.javascript.as_ref().map(JavaScriptMethodDescriptor::is_pure)
    }
}

impl Named for MethodDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An anonymous `(params): ReturnType;` member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSignature {
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    pub properties: MemberMap<PropertyDescriptor>,
    pub methods: MemberMap<MethodDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_signature: Option<CallSignature>,
}

impl InterfaceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The first base interface, if the declaration has an `extends` clause.
    pub fn extends_name(&self) -> Option<&str> {
        self.extends.first().map(String::as_str)
    }

    /// Callback-shaped: a call signature and nothing else.
    pub fn is_callback(&self) -> bool {
        self.call_signature.is_some() && self.properties.is_empty() && self.methods.is_empty()
    }

    /// Every type name written in a member signature, in declaration order.
    pub fn member_type_names(&self) -> impl Iterator<Item = &str> {
        let properties = self.properties.iter().map(|p| p.type_name.as_str());
        let methods = self.methods.iter().flat_map(|m| {
            m.parameters
                .iter()
                .map(|p| p.type_name.as_str())
                .chain(std::iter::once(m.return_type_name.as_str()))
        });
        let call = self.call_signature.iter().flat_map(|c| {
            c.parameters
                .iter()
                .map(|p| p.type_name.as_str())
                .chain(std::iter::once(c.return_type_name.as_str()))
        });
        properties.chain(methods).chain(call)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AliasKind {
    /// `type X = "a" | "b";`
    StringLiterals { variants: Vec<String> },
    /// Any other right-hand side, kept as written.
    Type { type_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: AliasKind,
}

impl AliasDescriptor {
    pub fn string_variants(&self) -> Option<&[String]> {
        match &self.kind {
            AliasKind::StringLiterals { variants } => Some(variants),
            AliasKind::Type { .. } => None,
        }
    }
}
