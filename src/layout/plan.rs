use crate::{
    descriptor::{FieldSpec, PrimitiveKind},
    synth::GeneratedTypeRc,
    typesystem::AggregateKind,
};

/// A contiguous span of 32-bit storage units within an aggregate's layout.
///
/// Ranges of all fields in a plan are disjoint and contiguous: each field
/// starts where the previous one ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    /// First storage unit occupied by the field
    pub offset: u32,
    /// Number of storage units the field occupies
    pub width: u32,
}

impl SlotRange {
    /// One past the last storage unit of this range.
    #[must_use]
    pub fn end(&self) -> u32 {
        self.offset + self.width
    }
}

/// A field's storage mode after resolution and admissibility checking.
#[derive(Debug, Clone)]
pub enum ResolvedStorage {
    /// Primitive stored inline by its own width (1 or 2 units)
    Primitive(PrimitiveKind),
    /// Nested value type stored inline; its slot list is spliced into the
    /// container with no indirection and no shared identity
    Flattened(GeneratedTypeRc),
    /// Named type stored as an opaque, identity-preserving handle (1 unit)
    Reference {
        /// Qualified name the descriptor referenced
        name: String,
        /// Kind the name resolved to at planning time
        kind: AggregateKind,
        /// The generated type behind the name, when the registry owns one;
        /// loader-declared names have no plan and accept any instance
        target: Option<GeneratedTypeRc>,
    },
}

impl ResolvedStorage {
    /// Width of this storage in 32-bit units.
    ///
    /// Flattened storage is the recursive sum of the nested type's field widths.
    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            ResolvedStorage::Primitive(kind) => kind.width(),
            ResolvedStorage::Flattened(nested) => nested.plan().width(),
            ResolvedStorage::Reference { .. } => 1,
        }
    }
}

/// One field of a finished plan: the parsed spec, its resolved storage, and
/// its slot assignment.
#[derive(Debug, Clone)]
pub struct PlannedField {
    /// The parsed field description
    pub spec: FieldSpec,
    /// Storage mode after resolution
    pub storage: ResolvedStorage,
    /// Assigned slot range
    pub range: SlotRange,
}

/// The complete, immutable layout of a generated aggregate.
///
/// A plan is deterministic given the same descriptor sequence and resolver
/// outcomes. Once synthesis succeeds the plan never changes.
#[derive(Debug, Clone)]
pub struct ClassPlan {
    name: String,
    kind: AggregateKind,
    fields: Vec<PlannedField>,
    width: u32,
}

impl ClassPlan {
    pub(crate) fn new(
        name: String,
        kind: AggregateKind,
        fields: Vec<PlannedField>,
        width: u32,
    ) -> Self {
        ClassPlan {
            name,
            kind,
            fields,
            width,
        }
    }

    /// Name of the aggregate this plan describes.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The aggregate kind this plan was requested for.
    #[must_use]
    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[PlannedField] {
        &self.fields
    }

    /// Total width of the layout in 32-bit storage units.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of top-level fields (the factory arity).
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Index of the field with this name, if present.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.spec.name == name)
    }
}
