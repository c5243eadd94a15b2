//! Kind classification for type references.
//!
//! Maps a [`TypeRef`] to the [`PropertyKind`] that best describes it in the
//! documentation output. Recognizing special types (UUIDs, temporal types,
//! byte buffers, URIs) keeps the generated schemas precise instead of
//! flattening everything into strings and objects.

use crate::descriptor::{TypeCatalog, TypeRef};
use crate::schema::PropertyKind;

/// Determines the schema kind for the given type reference.
///
/// Total and pure: every input maps to a defined kind, the catalog is only
/// consulted to recognize registered enumerations, and no state is touched.
pub fn classify(ty: &TypeRef, catalog: &TypeCatalog) -> PropertyKind {
    let name = ty.name.as_str();

    // Boolean / character / unit specializations
    match name {
        "bool" | "Boolean" => return PropertyKind::Boolean,
        "char" => return PropertyKind::String,
        "()" | "Void" => return PropertyKind::Null,
        _ => {}
    }

    if is_numeric(name) {
        return PropertyKind::Number;
    }

    // Character-sequence types
    if matches!(name, "String" | "str" | "OsString" | "PathBuf") {
        return PropertyKind::String;
    }

    // Raw binary payloads, including byte-element sequences like Vec<u8>
    if is_byte_buffer(ty) {
        return PropertyKind::Binary;
    }

    if is_sequence(name) {
        return PropertyKind::Array;
    }

    if is_associative(name) {
        return PropertyKind::Map;
    }

    // Registered enumerations
    if catalog.get(name).is_some_and(|def| def.is_enum()) {
        return PropertyKind::Enum;
    }

    // Identifier / temporal / URI specializations
    match name {
        "Uuid" => PropertyKind::Uuid,
        "NaiveDate" => PropertyKind::Date,
        "NaiveTime" => PropertyKind::Time,
        "NaiveDateTime" | "DateTime" | "OffsetDateTime" | "Instant" | "SystemTime" => {
            PropertyKind::DateTime
        }
        "Duration" => PropertyKind::Duration,
        "Period" => PropertyKind::Period,
        "Uri" | "Url" => PropertyKind::Uri,
        // Anything else, known or unknown, documents as a complex object
        _ => PropertyKind::Object,
    }
}

fn is_numeric(name: &str) -> bool {
    matches!(
        name,
        "i8" | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "f32"
            | "f64"
    )
}

fn is_sequence(name: &str) -> bool {
    matches!(
        name,
        "Vec" | "VecDeque" | "HashSet" | "BTreeSet" | "LinkedList" | "List" | "Set"
    )
}

fn is_associative(name: &str) -> bool {
    matches!(name, "HashMap" | "BTreeMap" | "Map")
}

fn is_byte_buffer(ty: &TypeRef) -> bool {
    if matches!(ty.name.as_str(), "Bytes" | "BytesMut") {
        return true;
    }

    is_sequence(&ty.name)
        && ty.args.len() == 1
        && matches!(ty.args[0].name.as_str(), "u8" | "i8")
}
