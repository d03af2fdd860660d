use crate::{
    descriptor::{FieldSpec, PrimitiveKind, StorageRequest, TypeRef},
    Result,
};

/// The literal flag token that requests default-value semantics for a field.
const DEFAULT_VALUE_FLAG: &str = "value";

/// Parse a single field descriptor of the form `name ":" typeCode [ ":" flag ]`.
///
/// `typeCode` is either a single-letter primitive code (`Z`, `B`, `S`, `C`, `I`,
/// `J`, `F`, `D`) or `<marker><className>;` where the marker is `L` (boxed
/// reference storage) or `Q` (flattened inline storage). The optional flag is the
/// literal `value` token requesting default-value semantics.
///
/// Parsing never resolves the named class; it only records the requested marker
/// and name. Uniqueness of field names across a descriptor list is a planning-time
/// check, not a parse-time one.
///
/// # Example
///
/// ```rust
/// use aggregen::descriptor::{parse_field_descriptor, StorageRequest, TypeRef};
///
/// let spec = parse_field_descriptor("en:LPoint2D;")?;
/// assert_eq!(spec.type_ref, TypeRef::Named("Point2D".to_string()));
/// assert_eq!(spec.storage, StorageRequest::Reference);
/// # Ok::<(), aggregen::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`crate::Error::Parse`] if the descriptor is malformed: empty or
/// non-identifier name, unknown type code, missing `;` terminator, empty class
/// name, an unknown flag token, or trailing segments.
pub fn parse_field_descriptor(spec: &str) -> Result<FieldSpec> {
    let mut parts = spec.splitn(3, ':');

    let name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(parse_error!("Field descriptor has no name - '{}'", spec)),
    };

    if !is_identifier(name) {
        return Err(parse_error!(
            "Field name is not a valid identifier - '{}'",
            name
        ));
    }

    let Some(type_code) = parts.next() else {
        return Err(parse_error!("Field descriptor has no type code - '{}'", spec));
    };

    let (type_ref, storage) = parse_type_code(type_code)?;

    let default_value = match parts.next() {
        None => false,
        Some(DEFAULT_VALUE_FLAG) => true,
        Some(flag) => {
            return Err(parse_error!(
                "Unknown flag '{}' in field descriptor - '{}'",
                flag,
                spec
            ))
        }
    };

    Ok(FieldSpec {
        name: name.to_string(),
        type_ref,
        storage,
        default_value,
    })
}

/// Parse a whole descriptor list in declaration order.
///
/// Fails fast on the first malformed entry. Duplicate-name detection is left to
/// the layout planner so that the error surfaces as [`crate::Error::DuplicateField`]
/// rather than a parse failure.
///
/// # Errors
///
/// Returns [`crate::Error::Parse`] for the first malformed descriptor encountered.
pub fn parse_field_descriptors(specs: &[&str]) -> Result<Vec<FieldSpec>> {
    specs.iter().map(|spec| parse_field_descriptor(spec)).collect()
}

/// Parse the `typeCode` production: a primitive code or `<marker><className>;`.
fn parse_type_code(type_code: &str) -> Result<(TypeRef, StorageRequest)> {
    let mut chars = type_code.chars();
    let Some(marker) = chars.next() else {
        return Err(parse_error!("Field descriptor has an empty type code"));
    };

    let storage = match marker {
        'L' => StorageRequest::Reference,
        'Q' => StorageRequest::FlattenedValue,
        code => {
            if chars.next().is_some() {
                return Err(parse_error!(
                    "Trailing characters after primitive code - '{}'",
                    type_code
                ));
            }
            return match PrimitiveKind::from_code(code) {
                Some(kind) => Ok((TypeRef::Primitive(kind), StorageRequest::Direct)),
                None => Err(parse_error!("Unknown primitive code - '{}'", code)),
            };
        }
    };

    let rest = &type_code[1..];
    let Some(class_name) = rest.strip_suffix(';') else {
        return Err(parse_error!(
            "Named type code is missing the ';' terminator - '{}'",
            type_code
        ));
    };

    if class_name.is_empty() || !is_class_name(class_name) {
        return Err(parse_error!(
            "Named type code has an invalid class name - '{}'",
            type_code
        ));
    }

    Ok((TypeRef::Named(class_name.to_string()), storage))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Qualified class names may be dotted (`a.b.C`) or slashed (`java/lang/Object`).
fn is_class_name(name: &str) -> bool {
    !name.starts_with(['.', '/'])
        && !name.ends_with(['.', '/'])
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '/'))
}
