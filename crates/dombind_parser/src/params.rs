use dombind_ast::ParameterDescriptor;
use dombind_lexer::{find_top_level, split_top_level};
use dombind_typemap::split_nullable;

/// Splits a parenthesized parameter list (without the parentheses) into
/// descriptors. A `this:` pseudo-parameter is dropped; a parameter with no
/// annotation is typed `any`.
pub fn parse_parameters(text: &str) -> Vec<ParameterDescriptor> {
    split_top_level(text, b',')
        .into_iter()
        .filter_map(|segment| parse_parameter(segment.text))
        .collect()
}

fn parse_parameter(chunk: &str) -> Option<ParameterDescriptor> {
    let (is_variadic, chunk) = match chunk.strip_prefix("...") {
        Some(rest) => (true, rest.trim_start()),
        None => (false, chunk),
    };

    let (name_part, type_part) = match find_top_level(chunk, b':') {
        Some(colon) => (chunk[..colon].trim(), chunk[colon + 1..].trim()),
        None => (chunk.trim(), "any"),
    };

    let (name, optional) = match name_part.strip_suffix('?') {
        Some(stripped) => (stripped.trim_end(), true),
        None => (name_part, false),
    };
    if name.is_empty() || name == "this" {
        return None;
    }

    let (type_name, nullable_type) = split_nullable(type_part);
    Some(ParameterDescriptor {
        name: name.to_string(),
        type_name,
        is_nullable: optional || nullable_type,
        is_variadic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_top_level_commas() {
        let params = parse_parameters(
            "successCallback: PositionCallback, errorCallback?: PositionErrorCallback | null, options?: PositionOptions",
        );
        let summary: Vec<(&str, &str, bool)> = params
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str(), p.is_nullable))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("successCallback", "PositionCallback", false),
                ("errorCallback", "PositionErrorCallback", true),
                ("options", "PositionOptions", true),
            ]
        );
    }

    #[test]
    fn nested_commas_stay_inside_their_parameter() {
        let params = parse_parameters(
            "listener: (this: Window, ev: Event) => any, options?: boolean | AddEventListenerOptions",
        );
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].type_name, "(this: Window, ev: Event) => any");
        assert_eq!(params[1].type_name, "boolean | AddEventListenerOptions");
        assert!(params[1].is_nullable);
    }

    #[test]
    fn rest_this_and_untyped_parameters() {
        let params = parse_parameters("this: Window, ...items: string[], raw");
        assert_eq!(params.len(), 2);
        assert!(params[0].is_variadic);
        assert_eq!(params[0].name, "items");
        assert_eq!(params[0].type_name, "string[]");
        assert_eq!(params[1].type_name, "any");
        assert!(parse_parameters("   ").is_empty());
    }
}
