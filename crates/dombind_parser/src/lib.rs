//! Signature parser: turns the raw text of one `interface` declaration into an
//! [`InterfaceDescriptor`].
//!
//! Only property signatures, method signatures and call signatures are
//! understood. Everything else in a body is skipped, and
//! [`parse_interface_with_warnings`] reports what was skipped and where.

pub mod alias;
pub mod error;
pub mod header;
pub mod members;
pub mod params;

use dombind_ast::InterfaceDescriptor;
use dombind_lexer::{blank_comments, matching_close};
use dombind_span::Span;
use tracing::trace;

pub use alias::parse_alias;
pub use error::{ParseError, ParseWarning, SkipReason};
pub use header::{DeclarationHead, DeclarationKind, parse_head};
pub use members::{Member, parse_member, split_members};
pub use params::parse_parameters;

use alias::first_line;

/// A descriptor plus the members that were left out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInterface {
    pub descriptor: InterfaceDescriptor,
    pub warnings: Vec<ParseWarning>,
}

/// Parses one interface declaration, silently skipping members it cannot bind.
pub fn parse_interface(raw: &str) -> Result<InterfaceDescriptor, ParseError> {
    parse_interface_with_warnings(raw).map(|parsed| parsed.descriptor)
}

/// Parses one interface declaration and reports skipped members. Warning spans
/// are byte offsets into `raw`.
pub fn parse_interface_with_warnings(raw: &str) -> Result<ParsedInterface, ParseError> {
    let text = blank_comments(raw);
    let leading = text.len() - text.trim_start().len();
    let trimmed = &text[leading..];

    let head = parse_head(trimmed)
        .filter(|head| head.kind == DeclarationKind::Interface)
        .ok_or_else(|| ParseError::MissingHeader {
            found: first_line(trimmed),
        })?;

    if trimmed.as_bytes().get(head.end) != Some(&b'{') {
        return Err(ParseError::MissingBody { name: head.name });
    }
    let open = head.end;
    // An unclosed body is read to the end of the text.
    let close = matching_close(trimmed, open).unwrap_or(trimmed.len());
    let body = &trimmed[open + 1..close];
    let body_offset = leading + open + 1;

    let mut descriptor = InterfaceDescriptor::new(head.name);
    descriptor.extends = head.extends;
    let mut warnings = Vec::new();

    for segment in split_members(body) {
        match parse_member(segment.text) {
            Ok(Member::Property(property)) => {
                if let Some(previous) = descriptor.properties.insert(property) {
                    trace!(interface = %descriptor.name, member = %previous.name, "property redeclared");
                }
            }
            Ok(Member::Method(method)) => {
                if let Some(previous) = descriptor.methods.insert(method) {
                    trace!(interface = %descriptor.name, member = %previous.name, "method overload replaced");
                }
            }
            Ok(Member::Call(call)) => descriptor.call_signature = Some(call),
            Err(reason) => {
                let span: Span = segment.span.shifted(body_offset);
                trace!(interface = %descriptor.name, %span, %reason, "member skipped");
                warnings.push(ParseWarning {
                    span,
                    text: segment.text.to_string(),
                    reason,
                });
            }
        }
    }

    Ok(ParsedInterface {
        descriptor,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITION_OPTIONS: &str = r#"
interface PositionOptions {
    enableHighAccuracy?: boolean;
    maximumAge?: number;
    timeout?: number;
}"#;

    const GEOLOCATION: &str = r#"
/** An object able to obtain the position of the device. */
interface Geolocation {
    clearWatch(watchId: number): void;
    getCurrentPosition(successCallback: PositionCallback, errorCallback?: PositionErrorCallback | null, options?: PositionOptions): void;
    watchPosition(successCallback: PositionCallback, errorCallback?: PositionErrorCallback | null, options?: PositionOptions): number;
}"#;

    #[test]
    fn position_options_properties_are_all_nullable() {
        let descriptor = parse_interface(POSITION_OPTIONS).expect("PositionOptions parses");
        assert_eq!(descriptor.name, "PositionOptions");
        let summary: Vec<(&str, &str, bool)> = descriptor
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str(), p.is_nullable))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("enableHighAccuracy", "boolean", true),
                ("maximumAge", "number", true),
                ("timeout", "number", true),
            ]
        );
        assert!(descriptor.methods.is_empty());
    }

    #[test]
    fn geolocation_methods_keep_parameters() {
        let descriptor = parse_interface(GEOLOCATION).expect("Geolocation parses");
        let names: Vec<&str> = descriptor.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["clearWatch", "getCurrentPosition", "watchPosition"]);

        let current = descriptor
            .methods
            .get("getCurrentPosition")
            .expect("getCurrentPosition");
        assert_eq!(current.parameters.len(), 3);
        assert_eq!(current.parameters[1].type_name, "PositionErrorCallback");
        assert!(current.parameters[1].is_nullable);
        assert_eq!(current.return_type_name, "void");
    }

    #[test]
    fn repeated_members_overwrite_case_insensitively() {
        let descriptor = parse_interface(
            "interface Dup {\n    value: string;\n    other: number;\n    Value?: boolean;\n}",
        )
        .expect("Dup parses");
        assert_eq!(descriptor.properties.len(), 2);
        let value = descriptor.properties.get("value").expect("value");
        assert_eq!(value.type_name, "boolean");
        assert!(value.is_nullable);
    }

    #[test]
    fn callback_interfaces_record_their_call_signature() {
        let descriptor =
            parse_interface("interface PositionCallback {\n    (position: GeolocationPosition): void;\n}")
                .expect("callback parses");
        assert!(descriptor.is_callback());
    }

    #[test]
    fn skipped_members_are_reported_with_spans() {
        let raw = "interface Storage {\n    [name: string]: any;\n    readonly length: number;\n    getItem(key: string): string | null;\n}";
        let parsed = parse_interface_with_warnings(raw).expect("Storage parses");
        assert_eq!(parsed.descriptor.properties.len(), 1);
        assert_eq!(parsed.descriptor.methods.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);

        let warning = &parsed.warnings[0];
        assert_eq!(warning.reason, SkipReason::IndexSignature);
        assert_eq!(warning.span.slice(raw), "[name: string]: any");
        assert_eq!(parse_interface(raw).map(|d| d.properties.len()), Ok(1));
    }

    #[test]
    fn header_and_body_errors() {
        assert!(matches!(
            parse_interface("declare var navigator: Navigator;"),
            Err(ParseError::MissingHeader { .. })
        ));
        assert_eq!(
            parse_interface("interface Empty"),
            Err(ParseError::MissingBody {
                name: "Empty".into()
            })
        );
    }

    #[test]
    fn extends_and_unclosed_bodies() {
        let descriptor = parse_interface(
            "interface PermissionStatus extends EventTarget {\n    readonly state: PermissionState;\n",
        )
        .expect("unclosed body still parses");
        assert_eq!(descriptor.extends_name(), Some("EventTarget"));
        assert_eq!(descriptor.properties.len(), 1);
    }
}
