//! Descriptor model for parsed declarations.

pub mod descriptors;
pub mod members;

pub use descriptors::{
    AliasDescriptor, AliasKind, CallSignature, InterfaceDescriptor, JavaScriptMethodDescriptor,
    MethodDescriptor, ParameterDescriptor, PropertyDescriptor,
};
pub use members::{MemberMap, Named};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_map_is_case_insensitive_and_last_wins() {
        let mut properties = MemberMap::new();
        properties.insert(PropertyDescriptor::new("timeout", "number", false));
        properties.insert(PropertyDescriptor::new("maximumAge", "number", true));
        let replaced = properties.insert(PropertyDescriptor::new("Timeout", "string", true));

        assert_eq!(properties.len(), 2);
        assert_eq!(replaced.map(|p| p.type_name), Some("number".to_string()));
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Timeout", "maximumAge"]);
        assert_eq!(
            properties.get("TIMEOUT").map(|p| p.type_name.as_str()),
            Some("string")
        );
    }

    #[test]
    fn purity_follows_name_equality() {
        assert!(JavaScriptMethodDescriptor::pure("clearWatch").is_pure());
        let bridged = JavaScriptMethodDescriptor::bridged(
            "getCurrentPosition",
            "dombind.geolocation.getCurrentPosition",
            vec!["successCallback".into()],
        );
        assert!(!bridged.is_pure());
    }

    #[test]
    fn callback_interfaces_have_only_a_call_signature() {
        let mut callback = InterfaceDescriptor::new("PositionCallback");
        callback.call_signature = Some(CallSignature {
            parameters: vec![ParameterDescriptor::new(
                "position",
                "GeolocationPosition",
                false,
            )],
            return_type_name: "void".into(),
        });
        assert!(callback.is_callback());
        assert_eq!(
            callback.member_type_names().collect::<Vec<_>>(),
            vec!["GeolocationPosition", "void"]
        );

        callback
            .properties
            .insert(PropertyDescriptor::new("extra", "string", false));
        assert!(!callback.is_callback());
    }

    #[test]
    fn descriptors_serialize_members_as_lists() {
        let mut descriptor = InterfaceDescriptor::new("PositionOptions");
        descriptor
            .properties
            .insert(PropertyDescriptor::new("timeout", "number", true));
        let json = serde_json::to_value(&descriptor).expect("descriptor serializes");
        assert_eq!(json["name"], "PositionOptions");
        assert_eq!(json["properties"][0]["name"], "timeout");
        assert_eq!(json["properties"][0]["is_nullable"], true);
        assert!(json.get("extends").is_none());
    }
}
