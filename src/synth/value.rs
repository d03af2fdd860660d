use crate::{
    descriptor::PrimitiveKind,
    synth::Instance,
    Error::TypeMismatch,
    Result,
};

/// The uniform (boxed) value representation used by generic operations.
///
/// Every primitive kind has one variant; aggregates travel as
/// [`Value::Instance`] and absent references as [`Value::Null`]. Equality is
/// structural, with float comparison done on bit patterns so that values round
/// trip bit-for-bit through storage.
///
/// # Examples
///
/// ```rust
/// use aggregen::Value;
///
/// assert_eq!(Value::from(7i32), Value::Int32(7));
/// assert_ne!(Value::Int32(7), Value::Int64(7));
/// assert_eq!(Value::Float64(f64::NAN), Value::Float64(f64::NAN));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent reference
    Null,
    /// `Z` boolean
    Bool(bool),
    /// `B` 8-bit signed integer
    Int8(i8),
    /// `S` 16-bit signed integer
    Int16(i16),
    /// `C` 16-bit unsigned character
    Char(u16),
    /// `I` 32-bit signed integer
    Int32(i32),
    /// `J` 64-bit signed integer
    Int64(i64),
    /// `F` 32-bit float
    Float32(f32),
    /// `D` 64-bit float
    Float64(f64),
    /// A value or reference aggregate instance
    Instance(Instance),
}

impl Value {
    /// `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type name for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Char(_) => "char16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::Instance(_) => "aggregate",
        }
    }

    /// Encode this value into raw storage units for a primitive field.
    ///
    /// The variant must match the field's kind exactly; no widening or
    /// truncation is ever performed.
    pub(crate) fn to_slots(&self, kind: PrimitiveKind) -> Result<Vec<Slot>> {
        let slots = match (kind, self) {
            (PrimitiveKind::Bool, Value::Bool(v)) => vec![Slot::Unit(u32::from(*v))],
            (PrimitiveKind::Int8, Value::Int8(v)) => vec![Slot::Unit(u32::from(*v as u8))],
            (PrimitiveKind::Int16, Value::Int16(v)) => vec![Slot::Unit(u32::from(*v as u16))],
            (PrimitiveKind::Char, Value::Char(v)) => vec![Slot::Unit(u32::from(*v))],
            (PrimitiveKind::Int32, Value::Int32(v)) => vec![Slot::Unit(*v as u32)],
            (PrimitiveKind::Float32, Value::Float32(v)) => vec![Slot::Unit(v.to_bits())],
            (PrimitiveKind::Int64, Value::Int64(v)) => split_wide(*v as u64),
            (PrimitiveKind::Float64, Value::Float64(v)) => split_wide(v.to_bits()),
            (kind, value) => {
                return Err(TypeMismatch {
                    expected: kind.to_string(),
                    found: value.type_name().to_string(),
                })
            }
        };
        Ok(slots)
    }

    /// Decode raw storage units back into a boxed value of the given kind.
    pub(crate) fn from_slots(kind: PrimitiveKind, slots: &[Slot]) -> Result<Value> {
        let value = match kind {
            PrimitiveKind::Bool => Value::Bool(unit(&slots[0])? != 0),
            PrimitiveKind::Int8 => Value::Int8(unit(&slots[0])? as u8 as i8),
            PrimitiveKind::Int16 => Value::Int16(unit(&slots[0])? as u16 as i16),
            PrimitiveKind::Char => Value::Char(unit(&slots[0])? as u16),
            PrimitiveKind::Int32 => Value::Int32(unit(&slots[0])? as i32),
            PrimitiveKind::Float32 => Value::Float32(f32::from_bits(unit(&slots[0])?)),
            PrimitiveKind::Int64 => Value::Int64(join_wide(slots)? as i64),
            PrimitiveKind::Float64 => Value::Float64(f64::from_bits(join_wide(slots)?)),
        };
        Ok(value)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int8(a), Value::Int8(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::Instance(a), Value::Instance(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int16(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Value::Instance(v)
    }
}

/// One 32-bit storage unit of an aggregate's layout.
///
/// Wide primitives span two consecutive `Unit` slots; reference fields occupy
/// a single `Handle` slot holding an opaque, nullable instance handle.
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    /// Raw 32 bits of primitive storage
    Unit(u32),
    /// Opaque reference cell
    Handle(Option<Instance>),
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Slot::Unit(a), Slot::Unit(b)) => a == b,
            (Slot::Handle(a), Slot::Handle(b)) => a == b,
            _ => false,
        }
    }
}

fn split_wide(bits: u64) -> Vec<Slot> {
    vec![Slot::Unit(bits as u32), Slot::Unit((bits >> 32) as u32)]
}

fn join_wide(slots: &[Slot]) -> Result<u64> {
    let lo = u64::from(unit(&slots[0])?);
    let hi = u64::from(unit(&slots[1])?);
    Ok(lo | (hi << 32))
}

fn unit(slot: &Slot) -> Result<u32> {
    match slot {
        Slot::Unit(bits) => Ok(*bits),
        Slot::Handle(_) => Err(TypeMismatch {
            expected: "primitive slot".to_string(),
            found: "handle slot".to_string(),
        }),
    }
}

/// Narrowing bridge between concrete Rust types and the boxed [`Value`]
/// representation, used by the typed variants of every generated operation.
///
/// Typed and generic operations are observably equivalent:
/// `get::<T>` is `get_generic` followed by narrowing, and `with::<T>(v)` is
/// `with_generic(box(v))`.
pub trait FieldValue: Sized {
    /// Box this concrete value into the uniform representation.
    fn into_value(self) -> Value;
    /// Narrow a boxed value back to the concrete type, or `None` if the
    /// dynamic type is incompatible.
    fn from_value(value: Value) -> Option<Self>;
    /// Short type name for diagnostics.
    fn type_name() -> &'static str;
}

macro_rules! impl_field_value {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl FieldValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn type_name() -> &'static str {
                $name
            }
        }
    };
}

impl_field_value!(bool, Bool, "bool");
impl_field_value!(i8, Int8, "int8");
impl_field_value!(i16, Int16, "int16");
impl_field_value!(u16, Char, "char16");
impl_field_value!(i32, Int32, "int32");
impl_field_value!(i64, Int64, "int64");
impl_field_value!(f32, Float32, "float32");
impl_field_value!(f64, Float64, "float64");
impl_field_value!(Instance, Instance, "aggregate");
