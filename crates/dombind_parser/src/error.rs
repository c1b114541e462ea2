use std::fmt;

use dombind_span::Span;
use dombind_utils::Diagnostic;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected an `interface <Name>` header, found `{found}`")]
    MissingHeader { found: String },
    #[error("interface `{name}` has no `{{ ... }}` body")]
    MissingBody { name: String },
    #[error("expected a `type <Name> = ...` alias, found `{found}`")]
    NotAnAlias { found: String },
}

/// Why a member was left out of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    IndexSignature,
    ConstructSignature,
    Accessor,
    Unrecognized,
    Lexing(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::IndexSignature => f.write_str("index signatures are not bound"),
            SkipReason::ConstructSignature => f.write_str("construct signatures are not bound"),
            SkipReason::Accessor => f.write_str("get/set accessors are not bound"),
            SkipReason::Unrecognized => {
                f.write_str("matches neither the property nor the method shape")
            }
            SkipReason::Lexing(message) => write!(f, "could not be tokenized: {message}"),
        }
    }
}

/// A member that was skipped while parsing an interface body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// Span of the member in the text handed to the parser.
    pub span: Span,
    pub text: String,
    pub reason: SkipReason,
}

impl ParseWarning {
    pub fn to_diagnostic(&self, source_id: &str) -> Diagnostic {
        Diagnostic::warning(source_id, self.span, "interface member skipped")
            .with_label(self.reason.to_string())
    }
}
