use dombind_parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no interface named `{name}` in the corpus{hint}", hint = did_you_mean(.suggestion))]
    DeclarationNotFound {
        name: String,
        suggestion: Option<String>,
    },
    #[error("interface `{name}` could not be parsed")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },
}

impl ResolveError {
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ResolveError::DeclarationNotFound { suggestion, .. } => suggestion.as_deref(),
            ResolveError::Parse { .. } => None,
        }
    }
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|name| format!("; did you mean `{name}`?"))
        .unwrap_or_default()
}
