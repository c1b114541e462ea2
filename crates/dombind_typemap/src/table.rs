use ahash::AHashMap;
use once_cell::sync::Lazy;

/// Source primitive -> target primitive. Each row is registered in its bare,
/// `| null` and `| undefined` spellings.
const PRIMITIVES: &[(&str, &str)] = &[
    ("number", "double"),
    ("string", "string"),
    ("boolean", "bool"),
    ("bigint", "long"),
    ("enum", "enum"),
    ("Date", "DateTime"),
    ("DOMTimeStamp", "long"),
    ("EpochTimeStamp", "long"),
    ("DOMHighResTimeStamp", "double"),
    ("BufferSource", "byte[]"),
    ("ArrayBuffer", "byte[]"),
    ("ArrayBufferView", "byte[]"),
    ("Uint8Array", "byte[]"),
    ("URL", "Uri"),
    ("string | URL", "Uri"),
    ("any", "object"),
    ("unknown", "object"),
    ("object", "object"),
    ("void", "void"),
];

/// Generic containers and global builtins that never resolve to a declaration in
/// a DOM corpus.
pub(crate) const BUILTIN_CONTAINERS: &[&str] = &[
    "Array",
    "ReadonlyArray",
    "Promise",
    "PromiseLike",
    "Record",
    "Partial",
    "Required",
    "Readonly",
    "Pick",
    "Omit",
    "Exclude",
    "Extract",
    "NonNullable",
    "Iterable",
    "IterableIterator",
    "Map",
    "Set",
    "ReadonlyMap",
    "ReadonlySet",
    "Function",
    "Object",
    "String",
    "Number",
    "Boolean",
    "Error",
    "null",
    "undefined",
    "never",
];

pub(crate) fn nullable_target(target: &str) -> String {
    if target == "void" || target.ends_with('?') {
        target.to_string()
    } else {
        format!("{target}?")
    }
}

pub(crate) fn insert_forms(table: &mut AHashMap<String, String>, source: &str, target: &str) {
    table.insert(source.to_string(), target.to_string());
    let nullable = nullable_target(target);
    table
        .entry(format!("{source} | null"))
        .or_insert_with(|| nullable.clone());
    table
        .entry(format!("{source} | undefined"))
        .or_insert(nullable);
}

pub(crate) static BUILTIN: Lazy<AHashMap<String, String>> = Lazy::new(|| {
    let mut table = AHashMap::with_capacity(PRIMITIVES.len() * 3);
    for (source, target) in PRIMITIVES {
        insert_forms(&mut table, source, target);
    }
    table
});
