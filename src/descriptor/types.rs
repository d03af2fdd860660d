//! Structured representation of parsed field descriptors.
//!
//! A descriptor list is the declarative input to generation: each entry names one
//! field, its type (primitive code or named aggregate), the requested storage mode,
//! and whether default-value semantics were requested. Parsing never resolves named
//! classes; it only records what was requested.

use strum::Display;

/// The fixed enumeration of primitive field kinds.
///
/// Each kind corresponds to a single-letter descriptor code. Narrow kinds occupy
/// one 32-bit storage unit; [`PrimitiveKind::Int64`] and [`PrimitiveKind::Float64`]
/// are wide and occupy two consecutive units.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `Z` - boolean, 1 unit
    #[strum(serialize = "bool")]
    Bool,
    /// `B` - 8-bit signed integer, 1 unit
    #[strum(serialize = "int8")]
    Int8,
    /// `S` - 16-bit signed integer, 1 unit
    #[strum(serialize = "int16")]
    Int16,
    /// `C` - 16-bit unsigned character, 1 unit
    #[strum(serialize = "char16")]
    Char,
    /// `I` - 32-bit signed integer, 1 unit
    #[strum(serialize = "int32")]
    Int32,
    /// `J` - 64-bit signed integer, 2 units
    #[strum(serialize = "int64")]
    Int64,
    /// `F` - 32-bit float, 1 unit
    #[strum(serialize = "float32")]
    Float32,
    /// `D` - 64-bit float, 2 units
    #[strum(serialize = "float64")]
    Float64,
}

impl PrimitiveKind {
    /// Map a single-letter descriptor code to its primitive kind.
    #[must_use]
    pub fn from_code(code: char) -> Option<PrimitiveKind> {
        match code {
            'Z' => Some(PrimitiveKind::Bool),
            'B' => Some(PrimitiveKind::Int8),
            'S' => Some(PrimitiveKind::Int16),
            'C' => Some(PrimitiveKind::Char),
            'I' => Some(PrimitiveKind::Int32),
            'J' => Some(PrimitiveKind::Int64),
            'F' => Some(PrimitiveKind::Float32),
            'D' => Some(PrimitiveKind::Float64),
            _ => None,
        }
    }

    /// The single-letter descriptor code for this kind.
    #[must_use]
    pub fn code(&self) -> char {
        match self {
            PrimitiveKind::Bool => 'Z',
            PrimitiveKind::Int8 => 'B',
            PrimitiveKind::Int16 => 'S',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Int32 => 'I',
            PrimitiveKind::Int64 => 'J',
            PrimitiveKind::Float32 => 'F',
            PrimitiveKind::Float64 => 'D',
        }
    }

    /// Width of this kind in 32-bit storage units (1 for narrow, 2 for wide).
    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            PrimitiveKind::Int64 | PrimitiveKind::Float64 => 2,
            _ => 1,
        }
    }
}

/// The storage mode requested by a field descriptor.
///
/// The marker in the descriptor decides the request: primitive codes imply
/// [`StorageRequest::Direct`], `Q<name>;` requests [`StorageRequest::FlattenedValue`]
/// and `L<name>;` requests [`StorageRequest::Reference`]. Whether a request is
/// admissible is decided later, during layout planning.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum StorageRequest {
    /// Primitive stored inline by its own width
    Direct,
    /// Named value type stored inline, its slot list spliced into the container
    FlattenedValue,
    /// Named type stored as an opaque, identity-preserving handle (1 unit)
    Reference,
}

/// A field's type as recorded by the parser: a primitive kind or a named
/// aggregate that has not been resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// One of the fixed primitive kinds
    Primitive(PrimitiveKind),
    /// A named aggregate; resolution is deferred to the type resolver
    Named(String),
}

/// One parsed field description. Immutable after parsing.
///
/// # Examples
///
/// ```rust
/// use aggregen::descriptor::{parse_field_descriptor, StorageRequest};
///
/// let spec = parse_field_descriptor("st:QPoint2D;:value")?;
/// assert_eq!(spec.name, "st");
/// assert_eq!(spec.storage, StorageRequest::FlattenedValue);
/// assert!(spec.default_value);
/// # Ok::<(), aggregen::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, unique within one descriptor list
    pub name: String,
    /// The field's type as written in the descriptor
    pub type_ref: TypeRef,
    /// Requested storage mode
    pub storage: StorageRequest,
    /// Default-value semantics were requested via the `value` flag
    pub default_value: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_code_round_trip() {
        for code in ['Z', 'B', 'S', 'C', 'I', 'J', 'F', 'D'] {
            let kind = PrimitiveKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert!(PrimitiveKind::from_code('Q').is_none());
        assert!(PrimitiveKind::from_code('L').is_none());
        assert!(PrimitiveKind::from_code('x').is_none());
    }

    #[test]
    fn test_primitive_widths() {
        assert_eq!(PrimitiveKind::Int32.width(), 1);
        assert_eq!(PrimitiveKind::Float32.width(), 1);
        assert_eq!(PrimitiveKind::Bool.width(), 1);
        assert_eq!(PrimitiveKind::Int64.width(), 2);
        assert_eq!(PrimitiveKind::Float64.width(), 2);
    }
}
